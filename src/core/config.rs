//! 配置 - 默认值 + 预设 + 环境变量覆盖

use log::warn;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// JPEG 质量 (1-100)，限制上传体积
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { jpeg_quality: 80 }
    }
}

impl CaptureConfig {
    pub fn for_low_bandwidth() -> Self {
        Self { jpeg_quality: 60 }
    }
}

pub const DEFAULT_INSTRUCTION: &str = "Analyze this video frame. Identify 3-5 high-confidence shoppable objects like watches, phones, laptops, shoes, glasses, bags, or specific clothing. For each item, provide its name, its bounding box [ymin, xmin, ymax, xmax] as integers between 0-1000, and a confidence score.";

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub instruction: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout: Duration::from_secs(12),
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommerceConfig {
    pub search_base: String,
    pub query_param: String,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            search_base: "https://www.amazon.com/s".to_string(),
            query_param: "k".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudioConfig {
    pub capture: CaptureConfig,
    pub detection: DetectionConfig,
    pub commerce: CommerceConfig,
}

impl StudioConfig {
    /// 从环境变量读取，缺失或非法值回退到默认
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.detection.api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(model) = lookup("SHOP_LENS_MODEL") {
            config.detection.model = model;
        }
        if let Some(endpoint) = lookup("SHOP_LENS_ENDPOINT") {
            config.detection.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("SHOP_LENS_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.detection.timeout = Duration::from_millis(ms),
                _ => warn!("ignoring invalid SHOP_LENS_TIMEOUT_MS={:?}", raw),
            }
        }

        config
    }
}
