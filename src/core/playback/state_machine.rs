use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// 首次播放之前
    #[default]
    Idle,
    Playing,
    Detecting,
    Paused,
}

/// 用户请求、识别完成、平台媒体事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    PlayRequested,
    PauseRequested,
    RetryRequested,
    DetectionSettled,
    /// 平台报告媒体已开始播放（原生控件等）
    MediaPlayed,
    /// 平台报告媒体已暂停
    MediaPaused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Ignore,
    /// 调用 surface.play()，清空结果
    StartPlayback,
    /// 暂停媒体，清空结果，抓帧并识别
    BeginDetection,
    /// 同一帧重新识别，不改变播放位置
    RetryDetection,
    PublishResults,
    /// 媒体已在平台侧开始播放：清空结果，作废进行中的识别
    SyncPlaying,
    /// 媒体已在平台侧暂停：不触发识别
    SyncPaused,
}

impl PlaybackState {
    pub fn transition(&self, event: PlaybackEvent) -> (PlaybackState, PlaybackAction) {
        use PlaybackAction as A;
        use PlaybackEvent as E;
        use PlaybackState as S;

        match (self, event) {
            (S::Idle, E::PlayRequested) => (S::Playing, A::StartPlayback),
            (S::Idle, E::MediaPlayed) => (S::Playing, A::SyncPlaying),

            (S::Playing, E::PauseRequested) => (S::Detecting, A::BeginDetection),
            (S::Playing, E::MediaPaused) => (S::Paused, A::SyncPaused),

            // 识别中只接受完成或平台侧的播放
            (S::Detecting, E::DetectionSettled) => (S::Paused, A::PublishResults),
            (S::Detecting, E::MediaPlayed) => (S::Playing, A::SyncPlaying),

            (S::Paused, E::PlayRequested) => (S::Playing, A::StartPlayback),
            (S::Paused, E::RetryRequested) => (S::Detecting, A::RetryDetection),
            (S::Paused, E::MediaPlayed) => (S::Playing, A::SyncPlaying),

            (state, _) => (*state, A::Ignore),
        }
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self, PlaybackState::Detecting)
    }
}
