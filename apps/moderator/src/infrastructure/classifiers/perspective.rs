use super::traits::ToxicityClassifier;
use crate::domain::errors::ClassifierError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const PERSPECTIVE_DEFAULT_URL: &str = "https://commentanalyzer.googleapis.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    attribute_scores: Option<AttributeScores>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AttributeScores {
    toxicity: Option<AttributeScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: Option<SummaryScore>,
}

#[derive(Debug, Deserialize)]
struct SummaryScore {
    value: Option<f64>,
}

/// Google Perspective API, TOXICITY attribute only.
pub struct PerspectiveClient {
    client: Client,
    base_url: String,
    api_key: String,
    languages: Vec<String>,
}

impl PerspectiveClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            languages,
        }
    }
}

#[async_trait]
impl ToxicityClassifier for PerspectiveClient {
    async fn score(&self, text: &str) -> Result<f64, ClassifierError> {
        let url = format!("{}/v1alpha1/comments:analyze", self.base_url);
        let mut body = json!({
            "comment": { "text": text },
            "requestedAttributes": { "TOXICITY": {} },
            "doNotStore": true,
        });
        // Without a language hint Perspective detects it itself.
        if !self.languages.is_empty() {
            body["languages"] = json!(self.languages);
        }

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnalyzeResponse = res
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let value = parsed
            .attribute_scores
            .and_then(|s| s.toxicity)
            .and_then(|t| t.summary_score)
            .and_then(|s| s.value)
            .ok_or_else(|| {
                ClassifierError::Malformed("missing TOXICITY summaryScore".to_string())
            })?;

        if !(0.0..=1.0).contains(&value) {
            return Err(ClassifierError::Malformed(format!(
                "toxicity {} outside [0, 1]",
                value
            )));
        }
        Ok(value)
    }
}
