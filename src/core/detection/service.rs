use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::DetectionError;

/// 发往识别服务的请求：图片 + 固定指令
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub image: Vec<u8>,
    pub mime_type: &'static str,
    pub instruction: String,
}

/// 外部视觉识别服务边界
///
/// 返回模型输出的 JSON 文本（`[{name, box_2d, confidence}]`），解析与校验由客户端负责。
/// 任何实现该形状的服务都可替换。
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn generate(&self, request: &VisionRequest) -> Result<String, DetectionError>;

    /// 服务名（日志用）
    fn name(&self) -> &str;
}

/// 返回固定结果的识别服务（测试和离线演示）
pub struct MockVisionService {
    response: Result<String, String>,
    calls: AtomicUsize,
}

impl MockVisionService {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            response: Ok(payload.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// 模拟传输失败
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionService for MockVisionService {
    async fn generate(&self, _request: &VisionRequest) -> Result<String, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(payload) => Ok(payload.clone()),
            Err(message) => Err(DetectionError::Service {
                status: 503,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
