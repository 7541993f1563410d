use serde::{Deserialize, Serialize};
use url::Url;

/// 归一化边界框，`[ymin, xmin, ymax, xmax]`，每个坐标为 0-1000 的整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u16; 4]", into = "[u16; 4]")]
pub struct NormalizedBox {
    pub y_min: u16,
    pub x_min: u16,
    pub y_max: u16,
    pub x_max: u16,
}

impl NormalizedBox {
    /// 坐标满量程（对应整帧宽/高）
    pub const SCALE: u16 = 1000;

    pub fn new(y_min: u16, x_min: u16, y_max: u16, x_max: u16) -> Self {
        Self {
            y_min,
            x_min,
            y_max,
            x_max,
        }
    }

    /// 零面积或坐标倒置的框不会被渲染
    pub fn is_degenerate(&self) -> bool {
        self.y_min >= self.y_max || self.x_min >= self.x_max
    }

    pub fn as_box_2d(&self) -> [u16; 4] {
        [self.y_min, self.x_min, self.y_max, self.x_max]
    }
}

impl From<[u16; 4]> for NormalizedBox {
    fn from(raw: [u16; 4]) -> Self {
        Self::new(raw[0], raw[1], raw[2], raw[3])
    }
}

impl From<NormalizedBox> for [u16; 4] {
    fn from(bbox: NormalizedBox) -> Self {
        bbox.as_box_2d()
    }
}

/// 识别出的可购买物品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    #[serde(rename = "box_2d")]
    pub bbox: NormalizedBox,
    pub confidence: f32,
    /// 本地根据 name 生成，从不信任识别服务返回的链接
    pub shop_link: Url,
}
