//! 坐标映射 - 把归一化框转换为渲染面百分比

use crate::api::models::{DetectedObject, DisplayBox, NormalizedBox, OverlayRegion};

/// 渲染面尺寸（像素）
///
/// 映射结果与尺寸无关：渲染面保持源画面宽高比，信箱/裁剪不在此处理。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

const PERCENT_DIVISOR: f32 = NormalizedBox::SCALE as f32 / 100.0;

/// 0-1000 坐标除以 10 得到百分比；宽或高不为正时返回 None
pub fn to_display_box(bbox: &NormalizedBox, _surface: Surface) -> Option<DisplayBox> {
    if bbox.is_degenerate() {
        return None;
    }

    let top = bbox.y_min as f32 / PERCENT_DIVISOR;
    let left = bbox.x_min as f32 / PERCENT_DIVISOR;
    let width = (bbox.x_max as f32 - bbox.x_min as f32) / PERCENT_DIVISOR;
    let height = (bbox.y_max as f32 - bbox.y_min as f32) / PERCENT_DIVISOR;

    Some(DisplayBox {
        top,
        left,
        width,
        height,
    })
}

/// 渲染面上的像素矩形 `[x, y, w, h]`
pub fn to_pixel_rect(display: &DisplayBox, surface: Surface) -> [f32; 4] {
    [
        display.left * surface.width / 100.0,
        display.top * surface.height / 100.0,
        display.width * surface.width / 100.0,
        display.height * surface.height / 100.0,
    ]
}

/// 保留可渲染的物品，丢弃退化框
pub fn retain_renderable(objects: Vec<DetectedObject>) -> Vec<DetectedObject> {
    objects
        .into_iter()
        .filter(|obj| to_display_box(&obj.bbox, Surface::new(100.0, 100.0)).is_some())
        .collect()
}

pub fn to_regions(objects: &[DetectedObject], surface: Surface) -> Vec<OverlayRegion> {
    objects
        .iter()
        .filter_map(|obj| {
            to_display_box(&obj.bbox, surface).map(|display_box| OverlayRegion {
                name: obj.name.clone(),
                confidence: obj.confidence,
                shop_link: obj.shop_link.clone(),
                display_box,
            })
        })
        .collect()
}
