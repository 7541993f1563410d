use std::time::Duration;

/// 解码后的视频帧（原生分辨率）
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    pub timestamp: Duration,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, timestamp_ms: u64) -> Self {
        Self {
            width,
            height,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() == self.pixel_count() * 4
    }

    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixel_count() * 3);
        for chunk in self.data.chunks_exact(4) {
            rgb.push(chunk[0]); // R
            rgb.push(chunk[1]); // G
            rgb.push(chunk[2]); // B
        }
        rgb
    }

    /// 缩放到目标尺寸，缓冲区不完整时返回 None
    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Option<Frame> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())?;
        let resized = image::imageops::resize(
            &img,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Some(Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
            timestamp: self.timestamp,
        })
    }
}

/// 一次识别周期内的暂停帧快照（JPEG），从不落盘
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub image_bytes: Vec<u8>,
    pub position: Duration,
}

impl CapturedFrame {
    pub const MIME_TYPE: &'static str = "image/jpeg";
}

/// 平台视频元素
///
/// 只有播放控制器会调用 `play`/`pause`，抽帧器只读。
pub trait VideoSurface: Send + Sync {
    /// 媒体原生像素尺寸，未加载时为 None
    fn native_size(&self) -> Option<(u32, u32)>;

    /// 当前位置已解码的帧
    fn current_frame(&self) -> Option<Frame>;

    fn position(&self) -> Duration;

    fn is_paused(&self) -> bool;

    fn play(&self);

    fn pause(&self);
}
