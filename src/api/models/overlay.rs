use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// 叠加层几何信息，均为渲染面尺寸的百分比
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBox {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayBox {
    /// 绝对定位叠加元素的内联样式
    pub fn css(&self) -> String {
        format!(
            "top: {}%; left: {}%; width: {}%; height: {}%;",
            self.top, self.left, self.width, self.height
        )
    }
}

/// 单个可交互区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRegion {
    pub name: String,
    pub confidence: f32,
    pub shop_link: Url,
    pub display_box: DisplayBox,
}

/// 叠加层状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayStatus {
    /// 播放中或尚未开始播放
    #[default]
    Hidden,
    /// 识别进行中
    Scanning,
    /// 已暂停但未识别到物品
    Empty,
    /// 已暂停且有可渲染区域
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayView {
    pub status: OverlayStatus,
    pub position: Duration,
    pub regions: Vec<OverlayRegion>,
    /// 仅在暂停且不在识别时可恢复播放
    pub can_resume: bool,
}

impl OverlayView {
    pub const EMPTY_HINT: &'static str = "No items found in this scene. Try another frame.";
    pub const DISCLAIMER: &'static str =
        "Product links are AI-based suggestions and may not match the exact item shown.";

    pub fn hint(&self) -> Option<&'static str> {
        match self.status {
            OverlayStatus::Empty => Some(Self::EMPTY_HINT),
            _ => None,
        }
    }
}
