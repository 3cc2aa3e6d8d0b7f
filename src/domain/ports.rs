use crate::domain::model::{FeedbackRecord, Mode, TranscriptRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Instructions sent to the external model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPrompt {
    pub system: String,
    pub user: String,
}

/// Narrow adapter over the external generative API. Returns the raw text
/// payload; shaping it is the caller's job.
#[async_trait]
pub trait InterpretationClient: Send + Sync {
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String>;

    fn model(&self) -> &str;
}

/// Result of a best-effort append. Callers may ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    Written,
    Skipped,
    Failed(String),
}

/// Append-only interaction journal. Implementations never return errors.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn append_transcript(&self, record: &TranscriptRecord) -> LogOutcome;

    async fn append_feedback(&self, record: &FeedbackRecord) -> LogOutcome;
}

pub trait ConfigProvider: Send + Sync {
    fn mode(&self) -> Mode;
    fn log_to_disk(&self) -> bool;
    fn is_production(&self) -> bool;
    fn reversals(&self) -> bool;
    fn request_timeout(&self) -> Duration;
}
