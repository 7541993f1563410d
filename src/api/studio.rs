//! 视频工作室 - 每个打开的视频一个会话，暂停即识别可购买物品

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::models::{DetectedObject, OverlayView};
use crate::core::config::StudioConfig;
use crate::core::detection::{DetectionClient, DetectionError, GeminiVisionService, ObjectDetector};
use crate::core::overlay::Surface;
use crate::core::playback::{
    MediaEvent, MediaSource, PlaybackController, PlaybackSession, PlaybackState, RequestOutcome,
    SessionError,
};
use crate::core::video::{FrameCapturer, VideoSurface};

/// 工作室 API 错误，宿主友好的设计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioApiError {
    pub error_type: String,
    pub message: String,
}

impl From<SessionError> for StudioApiError {
    fn from(e: SessionError) -> Self {
        Self {
            error_type: "InvalidMediaSource".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<DetectionError> for StudioApiError {
    fn from(e: DetectionError) -> Self {
        Self {
            error_type: "DetectionSetup".to_string(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for StudioApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl std::error::Error for StudioApiError {}

/// 视频工作室会话
///
/// ```ignore
/// let studio = VideoStudio::open("blob:https://app/4f2c", surface, &StudioConfig::from_env())?;
/// studio.play();
/// studio.pause().await;
/// let overlay = studio.overlay(Surface::new(1280.0, 720.0));
/// ```
pub struct VideoStudio<V: VideoSurface, D: ObjectDetector = DetectionClient<GeminiVisionService>> {
    controller: PlaybackController<V, D>,
}

impl<V: VideoSurface> VideoStudio<V> {
    /// 使用 Gemini 识别服务打开视频
    pub fn open(source: &str, surface: V, config: &StudioConfig) -> Result<Self, StudioApiError> {
        crate::init_logging();

        if config.detection.api_key.is_none() {
            warn!("⚠️ no vision API key configured, detection will return no objects");
        }
        let service = GeminiVisionService::new(&config.detection)?;
        let client = DetectionClient::new(service, &config.detection, &config.commerce)?;
        Self::with_detector(source, surface, config, client)
    }
}

impl<V: VideoSurface, D: ObjectDetector> VideoStudio<V, D> {
    pub fn with_detector(
        source: &str,
        surface: V,
        config: &StudioConfig,
        detector: D,
    ) -> Result<Self, StudioApiError> {
        let media_source = MediaSource::parse(source)?;
        info!("🎬 VideoStudio: opened {:?}", media_source);

        let controller = PlaybackController::new(
            PlaybackSession::new(media_source),
            surface,
            FrameCapturer::with_config(config.capture.clone()),
            detector,
        );
        Ok(Self { controller })
    }

    pub fn play(&self) -> RequestOutcome {
        self.controller.play()
    }

    pub async fn pause(&self) -> RequestOutcome {
        self.controller.pause().await
    }

    pub fn resume(&self) -> RequestOutcome {
        self.controller.resume()
    }

    pub async fn retry(&self) -> RequestOutcome {
        self.controller.retry().await
    }

    pub async fn toggle(&self) -> RequestOutcome {
        self.controller.toggle().await
    }

    pub fn on_media_event(&self, event: MediaEvent) {
        self.controller.handle_media_event(event)
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn media_source(&self) -> MediaSource {
        self.controller.media_source()
    }

    pub fn detected_objects(&self) -> Vec<DetectedObject> {
        self.controller.detected_objects()
    }

    /// 渲染层数据契约
    pub fn overlay(&self, surface: Surface) -> OverlayView {
        self.controller.overlay(surface)
    }

    pub fn disclaimer(&self) -> &'static str {
        OverlayView::DISCLAIMER
    }

    /// 关闭工作室视图，销毁会话
    pub fn close(self) {
        let surface = self.controller.surface();
        if !surface.is_paused() {
            surface.pause();
        }
        info!("🎬 VideoStudio: closing in {:?}", self.controller.state());
    }
}

impl<V: VideoSurface, D: ObjectDetector> Drop for VideoStudio<V, D> {
    fn drop(&mut self) {
        info!("🗑️ VideoStudio: released");
    }
}
