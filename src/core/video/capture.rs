//! 暂停帧抓取 - 原生分辨率 + JPEG 压缩

use super::frame::{CapturedFrame, Frame, VideoSurface};
use crate::core::config::CaptureConfig;
use image::{ImageOutputFormat, RgbImage};
use log::debug;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no decoded frame available at the current position")]
    NoFrameAvailable,
    #[error("media is still playing")]
    MediaPlaying,
    #[error("frame buffer has {actual} bytes, expected {expected}")]
    CorruptFrame { expected: usize, actual: usize },
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// 暂停帧抓取器，对播放位置没有副作用
pub struct FrameCapturer {
    config: CaptureConfig,
}

impl FrameCapturer {
    pub fn new() -> Self {
        Self::with_config(CaptureConfig::default())
    }

    pub fn with_config(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn capture(&self, surface: &dyn VideoSurface) -> Result<CapturedFrame, CaptureError> {
        if !surface.is_paused() {
            return Err(CaptureError::MediaPlaying);
        }

        // 尚未加载的媒体没有原生尺寸
        let (native_width, native_height) =
            surface.native_size().ok_or(CaptureError::NoFrameAvailable)?;
        let frame = surface
            .current_frame()
            .ok_or(CaptureError::NoFrameAvailable)?;

        let frame = if frame.width != native_width || frame.height != native_height {
            debug!(
                "decoded frame {}x{} scaled to native size {}x{}",
                frame.width, frame.height, native_width, native_height
            );
            self.scale_to_native(&frame, native_width, native_height)?
        } else {
            frame
        };

        let image_bytes = self.encode_jpeg(&frame)?;
        debug!(
            "📸 captured {}x{} frame at {:?} ({} bytes)",
            frame.width,
            frame.height,
            frame.timestamp,
            image_bytes.len()
        );

        Ok(CapturedFrame {
            pixel_width: frame.width,
            pixel_height: frame.height,
            image_bytes,
            position: surface.position(),
        })
    }

    fn scale_to_native(&self, frame: &Frame, width: u32, height: u32) -> Result<Frame, CaptureError> {
        if width == 0 || height == 0 || frame.width == 0 || frame.height == 0 {
            return Err(CaptureError::NoFrameAvailable);
        }
        frame
            .resize_to(width, height)
            .ok_or(CaptureError::CorruptFrame {
                expected: frame.pixel_count() * 4,
                actual: frame.data.len(),
            })
    }

    fn encode_jpeg(&self, frame: &Frame) -> Result<Vec<u8>, CaptureError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(CaptureError::NoFrameAvailable);
        }
        if !frame.is_complete() {
            return Err(CaptureError::CorruptFrame {
                expected: frame.pixel_count() * 4,
                actual: frame.data.len(),
            });
        }

        let img = RgbImage::from_raw(frame.width, frame.height, frame.to_rgb()).ok_or(
            CaptureError::CorruptFrame {
                expected: frame.pixel_count() * 3,
                actual: frame.data.len(),
            },
        )?;

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageOutputFormat::Jpeg(self.config.jpeg_quality))?;
        Ok(buffer.into_inner())
    }
}

impl Default for FrameCapturer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::MockSurface;
    use image::GenericImageView;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        Frame::new(width, height, data, 4_200)
    }

    #[test]
    fn test_capture_native_resolution_jpeg() {
        let surface = MockSurface::loaded(gradient_frame(320, 180));
        surface.pause();

        let captured = FrameCapturer::new().capture(&surface).expect("应该能抓取暂停帧");

        assert_eq!(captured.pixel_width, 320);
        assert_eq!(captured.pixel_height, 180);
        // JPEG SOI marker
        assert_eq!(&captured.image_bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&captured.image_bytes).expect("JPEG 应可解码");
        assert_eq!(decoded.width(), 320);
        assert_eq!(decoded.height(), 180);
    }

    #[test]
    fn test_capture_scales_decoded_frame_to_native_size() {
        let surface = MockSurface::loaded(gradient_frame(640, 360)).with_native_size(1920, 1080);
        surface.pause();

        let captured = FrameCapturer::new().capture(&surface).expect("应该能抓取暂停帧");

        assert_eq!((captured.pixel_width, captured.pixel_height), (1920, 1080));
        let decoded = image::load_from_memory(&captured.image_bytes).expect("JPEG 应可解码");
        assert_eq!(decoded.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_capture_does_not_move_playback() {
        let surface = MockSurface::loaded(gradient_frame(64, 64));
        surface.pause();
        let before = surface.position();

        FrameCapturer::new().capture(&surface).expect("应该能抓取");

        assert_eq!(surface.position(), before);
        assert!(surface.is_paused());
        assert_eq!(surface.play_calls(), 0);
    }

    #[test]
    fn test_capture_without_frame_fails() {
        let surface = MockSurface::unloaded();
        surface.pause();

        let result = FrameCapturer::new().capture(&surface);
        assert!(matches!(result, Err(CaptureError::NoFrameAvailable)));
    }

    #[test]
    fn test_capture_while_playing_fails() {
        let surface = MockSurface::loaded(gradient_frame(64, 64));
        surface.play();

        let result = FrameCapturer::new().capture(&surface);
        assert!(matches!(result, Err(CaptureError::MediaPlaying)));
    }

    #[test]
    fn test_capture_truncated_buffer_is_corrupt() {
        let frame = Frame::new(64, 64, vec![0u8; 100], 0);
        let surface = MockSurface::loaded(frame);
        surface.pause();

        let result = FrameCapturer::new().capture(&surface);
        assert!(matches!(result, Err(CaptureError::CorruptFrame { .. })));
    }

    #[test]
    fn test_lower_quality_shrinks_payload() {
        let surface = MockSurface::loaded(gradient_frame(256, 256));
        surface.pause();

        let high = FrameCapturer::new().capture(&surface).unwrap();
        let low = FrameCapturer::with_config(CaptureConfig { jpeg_quality: 10 })
            .capture(&surface)
            .unwrap();

        assert!(low.image_bytes.len() < high.image_bytes.len());
    }
}
