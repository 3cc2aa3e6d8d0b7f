use crate::core::demo::canned_interpretation;
use crate::core::normalize::parse_model_output;
use crate::core::pretty::render_pretty;
use crate::core::prompt::{build_prompt, prompt_cards};
use crate::domain::model::{
    FeedbackRecord, FeedbackRequest, Interpretation, InterpretationMeta, Language,
    Mode, PromptCard, ReadingRequest, SpreadSize, StructuredInterpretation, TranscriptRecord,
    Vote,
};
use crate::domain::ports::{ConfigProvider, InteractionLog, InterpretationClient, LogOutcome};
use crate::utils::error::{Result, TarotError};
use chrono::Utc;
use std::sync::Arc;

/// Upper bound on failure text echoed back in `meta.reason`.
pub const FAILURE_REASON_LIMIT: usize = 300;
pub const MISSING_KEY_REASON: &str = "missing API key";

/// Decides between the external model and the canned reading, then
/// normalizes and renders whatever came back.
pub struct Orchestrator<C: ConfigProvider, L: InteractionLog> {
    config: C,
    client: Option<Arc<dyn InterpretationClient>>,
    journal: L,
}

impl<C: ConfigProvider, L: InteractionLog> Orchestrator<C, L> {
    /// `client` is `None` when no credential is configured.
    pub fn new(config: C, client: Option<Arc<dyn InterpretationClient>>, journal: L) -> Self {
        Self {
            config,
            client,
            journal,
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.client.as_deref().map(|client| client.model())
    }

    pub async fn interpret(&self, request: &ReadingRequest) -> Result<Interpretation> {
        if request.cards.is_empty() {
            return Err(TarotError::invalid_request("cards must not be empty"));
        }

        let spread = request.spread_size();
        let cards = request.spread_cards();
        let lang = request.lang;
        let mode = self.config.mode();

        if request.dropped_cards() > 0 {
            tracing::warn!(
                "⚠️ {} card(s) submitted, reading the first {} as a {}-card spread ({} dropped)",
                request.cards.len(),
                cards.len(),
                spread.count(),
                request.dropped_cards()
            );
        }

        let (parsed, meta) = match (mode, self.client.as_deref()) {
            (Mode::Demo, _) => {
                tracing::info!("🎴 Demo mode, serving canned reading");
                (
                    canned_interpretation(cards, spread, lang),
                    InterpretationMeta::demo(None),
                )
            }
            (Mode::Auto, None) => {
                tracing::info!("🎴 No API key configured, serving canned reading");
                (
                    canned_interpretation(cards, spread, lang),
                    InterpretationMeta::demo(Some(MISSING_KEY_REASON.to_string())),
                )
            }
            (Mode::Live, None) => {
                tracing::error!("❌ Live mode requested without OPENAI_API_KEY");
                return Err(TarotError::MissingCredential {
                    mode: mode.to_string(),
                });
            }
            (_, Some(client)) => {
                let model_cards = prompt_cards(cards);
                match self
                    .call_model(client, &model_cards, &request.question, lang, spread)
                    .await
                {
                    Ok(parsed) => {
                        if request.consent {
                            self.log_transcript(client.model(), request, model_cards, &parsed)
                                .await;
                        }
                        (parsed, InterpretationMeta::live())
                    }
                    Err(e) if mode == Mode::Auto => {
                        tracing::warn!("⚠️ AI request failed, falling back to canned reading: {}", e);
                        (
                            canned_interpretation(cards, spread, lang),
                            InterpretationMeta::demo(Some(self.failure_reason(&e))),
                        )
                    }
                    Err(e) => {
                        tracing::error!("❌ AI request failed in live mode: {}", e);
                        return Err(e);
                    }
                }
            }
        };

        let pretty = render_pretty(&parsed, lang, Some(&meta));
        Ok(Interpretation {
            parsed,
            pretty,
            meta,
        })
    }

    /// Single attempt, bounded by the configured timeout.
    async fn call_model(
        &self,
        client: &dyn InterpretationClient,
        cards: &[PromptCard],
        question: &str,
        lang: Language,
        spread: SpreadSize,
    ) -> Result<StructuredInterpretation> {
        let prompt = build_prompt(cards, question, lang, spread)?;
        let timeout = self.config.request_timeout();

        tracing::debug!("📡 Calling model '{}' for a {}-card spread", client.model(), spread.count());
        let raw = tokio::time::timeout(timeout, client.complete(&prompt))
            .await
            .map_err(|_| TarotError::UpstreamTimeout {
                seconds: timeout.as_secs(),
            })??;

        Ok(parse_model_output(&raw))
    }

    fn failure_reason(&self, error: &TarotError) -> String {
        if self.config.is_production() {
            return error.user_friendly_message();
        }
        let detail = format!("{}: {}", error.user_friendly_message(), error);
        detail.chars().take(FAILURE_REASON_LIMIT).collect()
    }

    async fn log_transcript(
        &self,
        model: &str,
        request: &ReadingRequest,
        cards: Vec<PromptCard>,
        parsed: &StructuredInterpretation,
    ) -> LogOutcome {
        if !self.config.log_to_disk() {
            return LogOutcome::Skipped;
        }
        let record = TranscriptRecord {
            ts: Utc::now(),
            lang: request.lang,
            question: request.question.clone(),
            cards,
            model: model.to_string(),
            parsed: parsed.clone(),
        };
        let outcome = self.journal.append_transcript(&record).await;
        if let LogOutcome::Failed(reason) = &outcome {
            tracing::warn!("⚠️ Transcript not written: {}", reason);
        }
        outcome
    }

    /// Best effort; the caller always answers `ok`.
    pub async fn record_feedback(&self, request: &FeedbackRequest) -> LogOutcome {
        if !self.config.log_to_disk() {
            return LogOutcome::Skipped;
        }
        let record = FeedbackRecord {
            ts: Utc::now(),
            vote: Vote::parse(request.vote.as_deref()).score(),
            lang: request.lang,
            question: request.question.clone(),
            cards: request.cards.clone(),
        };
        let outcome = self.journal.append_feedback(&record).await;
        if let LogOutcome::Failed(reason) = &outcome {
            tracing::warn!("⚠️ Feedback not written: {}", reason);
        }
        outcome
    }
}
