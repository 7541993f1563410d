//! 测试替身：可控视频元素与带闸门的识别器

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::api::models::DetectedObject;
use crate::core::detection::ObjectDetector;
use crate::core::video::{CapturedFrame, Frame, VideoSurface};

pub fn sample_frame() -> Frame {
    Frame::new(64, 36, vec![90u8; 64 * 36 * 4], 0)
}

#[derive(Debug, Default)]
struct SurfaceState {
    frame: Option<Frame>,
    native_size: Option<(u32, u32)>,
    paused: bool,
    position: Duration,
    play_calls: usize,
    pause_calls: usize,
}

/// 内存中的视频元素，初始为暂停（与浏览器一致）
#[derive(Clone, Default)]
pub struct MockSurface {
    inner: Arc<Mutex<SurfaceState>>,
}

impl MockSurface {
    pub fn loaded(frame: Frame) -> Self {
        let surface = Self::unloaded();
        {
            let mut state = surface.inner.lock().unwrap();
            state.frame = Some(frame);
        }
        surface
    }

    pub fn unloaded() -> Self {
        let surface = Self::default();
        surface.inner.lock().unwrap().paused = true;
        surface
    }

    /// 原生尺寸与解码帧尺寸不同（如按显示尺寸解码）
    pub fn with_native_size(self, width: u32, height: u32) -> Self {
        self.inner.lock().unwrap().native_size = Some((width, height));
        self
    }

    /// 模拟播放推进
    pub fn advance(&self, by: Duration) {
        self.inner.lock().unwrap().position += by;
    }

    pub fn play_calls(&self) -> usize {
        self.inner.lock().unwrap().play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.inner.lock().unwrap().pause_calls
    }
}

impl VideoSurface for MockSurface {
    fn native_size(&self) -> Option<(u32, u32)> {
        let state = self.inner.lock().unwrap();
        let frame = state.frame.as_ref()?;
        Some(state.native_size.unwrap_or((frame.width, frame.height)))
    }

    fn current_frame(&self) -> Option<Frame> {
        self.inner.lock().unwrap().frame.clone()
    }

    fn position(&self) -> Duration {
        self.inner.lock().unwrap().position
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    fn play(&self) {
        let mut state = self.inner.lock().unwrap();
        state.paused = false;
        state.play_calls += 1;
    }

    fn pause(&self) {
        let mut state = self.inner.lock().unwrap();
        state.paused = true;
        state.pause_calls += 1;
    }
}

struct GateState {
    objects: Vec<DetectedObject>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: Notify,
    gate: Notify,
}

/// 每次识别都停在闸门处，直到测试调用 `release`
#[derive(Clone)]
pub struct GatedDetector {
    inner: Arc<GateState>,
}

impl GatedDetector {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self {
            inner: Arc::new(GateState {
                objects,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                started: Notify::new(),
                gate: Notify::new(),
            }),
        }
    }

    pub async fn wait_started(&self) {
        self.inner.started.notified().await;
    }

    pub fn release(&self) {
        self.inner.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectDetector for GatedDetector {
    async fn detect(&self, _frame: &CapturedFrame) -> Vec<DetectedObject> {
        let inner = &self.inner;
        inner.calls.fetch_add(1, Ordering::SeqCst);
        let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&inner.in_flight);

        inner.started.notify_one();
        inner.gate.notified().await;
        inner.objects.clone()
    }
}
