use crate::domain::ports::{InterpretationClient, ModelPrompt};
use crate::utils::error::{Result, TarotError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream error bodies are cut to this many characters.
pub const DETAIL_LIMIT: usize = 1000;
const TEMPERATURE: f64 = 0.6;

/// Client for the OpenAI Responses endpoint (`POST {base}/responses`).
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    input: [ApiMessage<'a>; 2],
    text: ApiTextOptions,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiTextOptions {
    format: ApiFormat,
}

#[derive(Debug, Serialize)]
struct ApiFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiResponse {
    output: Vec<ApiOutput>,
    output_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiOutput {
    content: Vec<ApiContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiContent {
    text: Option<String>,
}

impl ApiResponse {
    /// First content block of the first output, else the `output_text` shortcut.
    fn into_text(self) -> Option<String> {
        let first = self
            .output
            .into_iter()
            .next()
            .and_then(|output| output.content.into_iter().next())
            .and_then(|content| content.text);

        first
            .or(self.output_text)
            .filter(|text| !text.trim().is_empty())
    }
}

impl ResponsesClient {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/responses", self.api_base)
    }
}

#[async_trait]
impl InterpretationClient for ResponsesClient {
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String> {
        let payload = ApiRequest {
            model: &self.model,
            input: [
                ApiMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ApiMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            text: ApiTextOptions {
                format: ApiFormat {
                    kind: "json_object",
                },
            },
            temperature: TEMPERATURE,
        };

        tracing::debug!("Making Responses API request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Responses API status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TarotError::UpstreamStatus {
                status: status.as_u16(),
                body: body.chars().take(DETAIL_LIMIT).collect(),
            });
        }

        let body: ApiResponse = response.json().await?;
        body.into_text().ok_or(TarotError::EmptyUpstreamOutput)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
