use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::state_machine::PlaybackState;
use crate::api::models::DetectedObject;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("invalid media source: {0:?}")]
    InvalidMediaSource(String),
}

/// 可播放媒体引用，解码交给平台
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Remote(Url),
    Blob(String),
    Local(PathBuf),
}

impl MediaSource {
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SessionError::InvalidMediaSource(raw.to_string()));
        }
        if raw.starts_with("blob:") {
            return Ok(MediaSource::Blob(raw.to_string()));
        }

        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(MediaSource::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(MediaSource::Local)
                .map_err(|_| SessionError::InvalidMediaSource(raw.to_string())),
            _ => Ok(MediaSource::Local(PathBuf::from(raw))),
        }
    }
}

/// 单个工作室视图的播放会话，由播放控制器独占
#[derive(Debug)]
pub struct PlaybackSession {
    pub media_source: MediaSource,
    pub position: Duration,
    pub state: PlaybackState,
    pub last_detection_result: Vec<DetectedObject>,
    generation: u64,
    in_flight: bool,
}

impl PlaybackSession {
    pub fn new(media_source: MediaSource) -> Self {
        Self {
            media_source,
            position: Duration::ZERO,
            state: PlaybackState::Idle,
            last_detection_result: Vec::new(),
            generation: 0,
            in_flight: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 上一个识别 future 是否尚未结束（即使已被作废）
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// 开始新周期或离开识别时调用，使旧结果失效
    pub(crate) fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    pub(crate) fn clear_results(&mut self) {
        self.last_detection_result.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let source = MediaSource::parse("https://cdn.example.com/clip.mp4").unwrap();
        assert!(matches!(source, MediaSource::Remote(url) if url.host_str() == Some("cdn.example.com")));
    }

    #[test]
    fn test_parse_blob() {
        let source = MediaSource::parse("blob:https://app.example.com/4f2c").unwrap();
        assert_eq!(source, MediaSource::Blob("blob:https://app.example.com/4f2c".to_string()));
    }

    #[test]
    fn test_parse_local() {
        assert_eq!(
            MediaSource::parse("videos/demo.mp4").unwrap(),
            MediaSource::Local(PathBuf::from("videos/demo.mp4"))
        );
        assert_eq!(
            MediaSource::parse("file:///tmp/demo.mp4").unwrap(),
            MediaSource::Local(PathBuf::from("/tmp/demo.mp4"))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(MediaSource::parse("   ").is_err());
    }

    #[test]
    fn test_new_session_idle() {
        let session = PlaybackSession::new(MediaSource::Blob("blob:x".to_string()));
        assert_eq!(session.state, PlaybackState::Idle);
        assert!(session.last_detection_result.is_empty());
        assert_eq!(session.generation(), 0);
        assert!(!session.is_in_flight());
    }
}
