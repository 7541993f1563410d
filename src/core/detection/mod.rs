//! 识别客户端 - 单次提交暂停帧，校验结果，失败时退化为空

use async_trait::async_trait;
use log::{info, warn};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::api::models::DetectedObject;
use crate::core::config::{CommerceConfig, DetectionConfig};
use crate::core::video::CapturedFrame;

pub mod gemini;
pub mod parser;
pub mod service;
pub mod shop_link;

pub use gemini::GeminiVisionService;
pub use parser::RecordError;
pub use service::{MockVisionService, VisionRequest, VisionService};
pub use shop_link::ShopLinkBuilder;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("no API key configured for the vision service")]
    MissingApiKey,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("vision service timed out after {0:?}")]
    Timeout(Duration),
    #[error("vision service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid commerce base URL: {0}")]
    ShopLink(#[from] url::ParseError),
}

/// 播放控制器看到的识别接口：永不失败，失败即空结果
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect(&self, frame: &CapturedFrame) -> Vec<DetectedObject>;
}

/// 无状态、无缓存、无自动重试的识别客户端
pub struct DetectionClient<S: VisionService> {
    service: S,
    links: ShopLinkBuilder,
    instruction: String,
    timeout: Duration,
}

impl<S: VisionService> DetectionClient<S> {
    pub fn new(
        service: S,
        detection: &DetectionConfig,
        commerce: &CommerceConfig,
    ) -> Result<Self, DetectionError> {
        Ok(Self {
            service,
            links: ShopLinkBuilder::new(commerce)?,
            instruction: detection.instruction.clone(),
            timeout: detection.timeout,
        })
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// 单次识别；错误原样返回，供日志/测试使用
    pub async fn try_detect(
        &self,
        frame: &CapturedFrame,
    ) -> Result<Vec<DetectedObject>, DetectionError> {
        let request = VisionRequest {
            image: frame.image_bytes.clone(),
            mime_type: CapturedFrame::MIME_TYPE,
            instruction: self.instruction.clone(),
        };

        let payload = tokio::time::timeout(self.timeout, self.service.generate(&request))
            .await
            .map_err(|_| DetectionError::Timeout(self.timeout))??;

        parser::parse_detections(&payload, &self.links)
    }
}

#[async_trait]
impl<S: VisionService> ObjectDetector for DetectionClient<S> {
    async fn detect(&self, frame: &CapturedFrame) -> Vec<DetectedObject> {
        let started = Instant::now();
        match self.try_detect(frame).await {
            Ok(objects) => {
                info!(
                    "🔍 {} found {} objects in {:?}",
                    self.service.name(),
                    objects.len(),
                    started.elapsed()
                );
                objects
            }
            Err(e) => {
                warn!("⚠️ detection via {} failed: {}", self.service.name(), e);
                Vec::new()
            }
        }
    }
}
