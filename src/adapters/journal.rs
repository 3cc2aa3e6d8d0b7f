use crate::domain::model::{FeedbackRecord, TranscriptRecord};
use crate::domain::ports::{InteractionLog, LogOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub const TRANSCRIPT_FILE: &str = "premium_logs.jsonl";
pub const FEEDBACK_FILE: &str = "premium_feedback.jsonl";

/// Append-only JSON Lines journal under a data directory.
///
/// Each record is serialized first and written with a single `write_all`
/// while holding the file's lock, so concurrent appends never interleave.
#[derive(Debug, Clone)]
pub struct JsonlJournal {
    data_dir: PathBuf,
    transcripts: Arc<Mutex<()>>,
    feedback: Arc<Mutex<()>>,
}

impl JsonlJournal {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            transcripts: Arc::new(Mutex::new(())),
            feedback: Arc::new(Mutex::new(())),
        }
    }

    pub fn transcript_path(&self) -> PathBuf {
        self.data_dir.join(TRANSCRIPT_FILE)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join(FEEDBACK_FILE)
    }

    async fn append_line<T: Serialize>(
        &self,
        lock: &Mutex<()>,
        path: &Path,
        record: &T,
    ) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = lock.lock().await;
        fs::create_dir_all(&self.data_dir).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    fn outcome(path: &Path, result: Result<()>) -> LogOutcome {
        match result {
            Ok(()) => {
                tracing::debug!("📝 Appended to {}", path.display());
                LogOutcome::Written
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not append to {}: {}", path.display(), e);
                LogOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl InteractionLog for JsonlJournal {
    async fn append_transcript(&self, record: &TranscriptRecord) -> LogOutcome {
        let path = self.transcript_path();
        let result = self.append_line(&self.transcripts, &path, record).await;
        Self::outcome(&path, result)
    }

    async fn append_feedback(&self, record: &FeedbackRecord) -> LogOutcome {
        let path = self.feedback_path();
        let result = self.append_line(&self.feedback, &path, record).await;
        Self::outcome(&path, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Language, StructuredInterpretation};
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn feedback(vote: i8) -> FeedbackRecord {
        FeedbackRecord {
            ts: Utc::now(),
            vote,
            lang: Language::En,
            question: "Work?".to_string(),
            cards: json!([{"name": "La Force"}]),
        }
    }

    #[tokio::test]
    async fn test_creates_directory_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let journal = JsonlJournal::new(temp_dir.path().join("nested/data"));

        assert_eq!(journal.append_feedback(&feedback(1)).await, LogOutcome::Written);
        assert_eq!(journal.append_feedback(&feedback(-1)).await, LogOutcome::Written);

        let content = std::fs::read_to_string(journal.feedback_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["vote"], 1);
        assert_eq!(first["lang"], "en");
        assert!(first["ts"].is_string());
    }

    #[tokio::test]
    async fn test_transcript_goes_to_its_own_file() {
        let temp_dir = TempDir::new().unwrap();
        let journal = JsonlJournal::new(temp_dir.path());
        let record = TranscriptRecord {
            ts: Utc::now(),
            lang: Language::Fr,
            question: String::new(),
            cards: Vec::new(),
            model: "gpt-4o-mini".to_string(),
            parsed: StructuredInterpretation::from_raw_text("texte"),
        };

        assert_eq!(journal.append_transcript(&record).await, LogOutcome::Written);
        assert!(journal.transcript_path().exists());
        assert!(!journal.feedback_path().exists());

        let line = std::fs::read_to_string(journal.transcript_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["parsed"]["overview"], "texte");
    }

    #[tokio::test]
    async fn test_concurrent_appends_stay_line_aligned() {
        let temp_dir = TempDir::new().unwrap();
        let journal = JsonlJournal::new(temp_dir.path());

        let mut handles = Vec::new();
        for i in 0..32 {
            let journal = journal.clone();
            handles.push(tokio::spawn(async move {
                journal.append_feedback(&feedback(if i % 2 == 0 { 1 } else { -1 })).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), LogOutcome::Written);
        }

        let content = std::fs::read_to_string(journal.feedback_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 32);
        for line in lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }

    #[tokio::test]
    async fn test_unwritable_directory_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();
        let journal = JsonlJournal::new(&blocker);

        let outcome = journal.append_feedback(&feedback(1)).await;
        assert!(matches!(outcome, LogOutcome::Failed(_)));
    }
}
