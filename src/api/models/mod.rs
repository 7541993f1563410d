pub mod detection;
pub mod overlay;

pub use detection::{DetectedObject, NormalizedBox};
pub use overlay::{DisplayBox, OverlayRegion, OverlayStatus, OverlayView};
