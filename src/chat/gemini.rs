use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;

/// The one external completion service the app talks to, behind a trait so
/// unit tests can stand in a canned implementation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

/// First candidate's text, trimmed. `None` when the response carries no
/// usable candidate at all.
pub(crate) fn first_candidate_text(resp: &GenerateContentResponse) -> Option<String> {
    let part = resp.candidates.first()?.content.as_ref()?.parts.first()?;
    let text = part.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("completion request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("completion service returned {status}: {body}");
        }

        let parsed: GenerateContentResponse =
            resp.json().await.context("malformed completion response")?;
        first_candidate_text(&parsed).context("completion response had no candidates")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_trimmed() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "  Eat more vegetables.\n" } ] } },
                { "content": { "parts": [ { "text": "second candidate" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(
            first_candidate_text(&resp).as_deref(),
            Some("Eat more vegetables.")
        );
    }

    #[test]
    fn empty_candidates_yield_none() {
        let resp: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(first_candidate_text(&resp).is_none());

        let resp: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(first_candidate_text(&resp).is_none());
    }

    #[test]
    fn candidate_without_content_yields_none() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [ { "finishReason": "SAFETY" } ]
        }))
        .unwrap();
        assert!(first_candidate_text(&resp).is_none());
    }

    #[test]
    fn whitespace_only_text_yields_none() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [ { "content": { "parts": [ { "text": "   \n" } ] } } ]
        }))
        .unwrap();
        assert!(first_candidate_text(&resp).is_none());
    }
}
