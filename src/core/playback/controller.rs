//! 播放控制器 - 协调播放/暂停与抓帧、识别周期

use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::session::{MediaSource, PlaybackSession};
use super::state_machine::{PlaybackAction, PlaybackEvent, PlaybackState};
use crate::api::models::{DetectedObject, OverlayView};
use crate::core::detection::ObjectDetector;
use crate::core::overlay::{mapper, view, Surface};
use crate::core::video::{FrameCapturer, VideoSurface};

/// 平台媒体元素主动上报的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Played,
    Paused,
}

impl From<MediaEvent> for PlaybackEvent {
    fn from(event: MediaEvent) -> Self {
        match event {
            MediaEvent::Played => PlaybackEvent::MediaPlayed,
            MediaEvent::Paused => PlaybackEvent::MediaPaused,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Ignored,
    Resumed,
    Detected { objects: usize },
    /// 识别完成时会话已离开 Detecting，结果被丢弃
    Superseded,
}

pub struct PlaybackController<V: VideoSurface, D: ObjectDetector> {
    surface: V,
    capturer: FrameCapturer,
    detector: D,
    session: Mutex<PlaybackSession>,
}

impl<V: VideoSurface, D: ObjectDetector> PlaybackController<V, D> {
    pub fn new(session: PlaybackSession, surface: V, capturer: FrameCapturer, detector: D) -> Self {
        Self {
            surface,
            capturer,
            detector,
            session: Mutex::new(session),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn position(&self) -> Duration {
        self.lock().position
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    pub fn detected_objects(&self) -> Vec<DetectedObject> {
        self.lock().last_detection_result.clone()
    }

    pub fn media_source(&self) -> MediaSource {
        self.lock().media_source.clone()
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn overlay(&self, surface: Surface) -> OverlayView {
        let session = self.lock();
        view::build_view(
            session.state,
            session.position,
            &session.last_detection_result,
            surface,
        )
    }

    /// 首次播放
    pub fn play(&self) -> RequestOutcome {
        self.request_playback()
    }

    /// 从当前位置继续播放（不 seek）
    pub fn resume(&self) -> RequestOutcome {
        self.request_playback()
    }

    /// 暂停并识别当前帧，识别结束后返回
    pub async fn pause(&self) -> RequestOutcome {
        self.run_cycle(PlaybackEvent::PauseRequested).await
    }

    /// 在同一帧上重新识别
    pub async fn retry(&self) -> RequestOutcome {
        self.run_cycle(PlaybackEvent::RetryRequested).await
    }

    /// 点击画面：播放中则暂停识别，否则继续播放
    pub async fn toggle(&self) -> RequestOutcome {
        match self.state() {
            PlaybackState::Playing => self.pause().await,
            PlaybackState::Detecting => RequestOutcome::Ignored,
            PlaybackState::Idle | PlaybackState::Paused => self.resume(),
        }
    }

    pub fn handle_media_event(&self, event: MediaEvent) {
        let mut session = self.lock();
        let previous = session.state;
        let (next, action) = previous.transition(event.into());

        match action {
            PlaybackAction::SyncPlaying => {
                session.state = next;
                session.clear_results();
                session.advance_generation();
                if previous.is_detecting() {
                    info!("⏩ media resumed during detection, pending result superseded");
                }
            }
            PlaybackAction::SyncPaused => {
                session.state = next;
                session.clear_results();
            }
            _ => debug!("media event {:?} ignored in {:?}", event, previous),
        }
        session.position = self.surface.position();
    }

    fn request_playback(&self) -> RequestOutcome {
        {
            let mut session = self.lock();
            let (next, action) = session.state.transition(PlaybackEvent::PlayRequested);
            if action != PlaybackAction::StartPlayback {
                debug!("play request ignored in {:?}", session.state);
                return RequestOutcome::Ignored;
            }
            session.state = next;
            session.clear_results();
            session.advance_generation();
        }

        // 平台可能同步回调 handle_media_event，此处不能持锁
        self.surface.play();
        let position = self.surface.position();
        self.lock().position = position;
        info!("▶️ playback from {:?}", position);
        RequestOutcome::Resumed
    }

    async fn run_cycle(&self, event: PlaybackEvent) -> RequestOutcome {
        let Some(cycle) = self.begin_cycle(event) else {
            return RequestOutcome::Ignored;
        };

        let objects = match self.capturer.capture(&self.surface) {
            Ok(frame) => self.detector.detect(&frame).await,
            Err(e) => {
                warn!("⚠️ frame capture failed: {}", e);
                Vec::new()
            }
        };

        cycle.settle(objects)
    }

    fn begin_cycle(&self, event: PlaybackEvent) -> Option<CycleGuard<'_>> {
        let (action, generation) = {
            let mut session = self.lock();
            if session.is_in_flight() {
                debug!("{:?} ignored: detection still in flight", event);
                return None;
            }

            let (next, action) = session.state.transition(event);
            if !matches!(
                action,
                PlaybackAction::BeginDetection | PlaybackAction::RetryDetection
            ) {
                debug!("{:?} ignored in {:?}", event, session.state);
                return None;
            }

            session.state = next;
            session.clear_results();
            session.set_in_flight(true);
            (action, session.advance_generation())
        };

        if action == PlaybackAction::BeginDetection {
            self.surface.pause();
        }
        let position = self.surface.position();
        self.lock().position = position;
        info!("⏸️ detection cycle #{} at {:?}", generation, position);

        Some(CycleGuard {
            session: &self.session,
            generation,
            settled: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackSession> {
        lock_session(&self.session)
    }
}

impl<V: VideoSurface, D: ObjectDetector> Drop for PlaybackController<V, D> {
    fn drop(&mut self) {
        info!("🗑️ PlaybackController: session released");
    }
}

fn lock_session(session: &Mutex<PlaybackSession>) -> MutexGuard<'_, PlaybackSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 一个识别周期；被提前丢弃时按空结果结算，避免会话卡在 in-flight
struct CycleGuard<'a> {
    session: &'a Mutex<PlaybackSession>,
    generation: u64,
    settled: bool,
}

impl CycleGuard<'_> {
    fn settle(mut self, objects: Vec<DetectedObject>) -> RequestOutcome {
        self.settled = true;
        settle_cycle(self.session, self.generation, objects)
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("detection cycle #{} dropped before settling", self.generation);
            settle_cycle(self.session, self.generation, Vec::new());
        }
    }
}

fn settle_cycle(
    session: &Mutex<PlaybackSession>,
    generation: u64,
    objects: Vec<DetectedObject>,
) -> RequestOutcome {
    let mut session = lock_session(session);
    session.set_in_flight(false);

    if session.generation() != generation || !session.state.is_detecting() {
        debug!(
            "discarding stale detection result from cycle #{} (now #{}, {:?})",
            generation,
            session.generation(),
            session.state
        );
        return RequestOutcome::Superseded;
    }

    let objects = mapper::retain_renderable(objects);
    let (next, _) = session.state.transition(PlaybackEvent::DetectionSettled);
    session.state = next;
    session.last_detection_result = objects;

    let count = session.last_detection_result.len();
    info!("✅ detection cycle #{} settled with {} objects", generation, count);
    RequestOutcome::Detected { objects: count }
}
