use std::time::Duration;

use super::mapper::{to_regions, Surface};
use crate::api::models::{DetectedObject, OverlayStatus, OverlayView};
use crate::core::playback::PlaybackState;

/// 只有暂停时才产出可交互区域
pub fn build_view(
    state: PlaybackState,
    position: Duration,
    objects: &[DetectedObject],
    surface: Surface,
) -> OverlayView {
    let (status, regions) = match state {
        PlaybackState::Idle | PlaybackState::Playing => (OverlayStatus::Hidden, Vec::new()),
        PlaybackState::Detecting => (OverlayStatus::Scanning, Vec::new()),
        PlaybackState::Paused => {
            let regions = to_regions(objects, surface);
            if regions.is_empty() {
                (OverlayStatus::Empty, regions)
            } else {
                (OverlayStatus::Ready, regions)
            }
        }
    };

    OverlayView {
        status,
        position,
        regions,
        can_resume: state == PlaybackState::Paused,
    }
}
