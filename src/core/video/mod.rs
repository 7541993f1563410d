pub mod capture;
pub mod frame;

pub use capture::{CaptureError, FrameCapturer};
pub use frame::{CapturedFrame, Frame, VideoSurface};
