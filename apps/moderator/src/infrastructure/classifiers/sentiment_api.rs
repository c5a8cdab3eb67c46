use super::traits::{SentimentClassifier, SentimentOutcome};
use crate::domain::errors::ClassifierError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    language: Option<String>,
    sentiment_score: Option<f64>,
}

/// JSON sentiment endpoint: `POST {"text"}` answering `{"language", "sentiment_score"}`.
///
/// HTTP 422 and languages outside `supported_languages` are reported as
/// [`SentimentOutcome::Unsupported`].
pub struct SentimentApiClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    supported_languages: Vec<String>,
}

impl SentimentApiClient {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        api_key: Option<String>,
        supported_languages: Vec<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
            supported_languages: supported_languages
                .into_iter()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    fn is_supported(&self, language: &str) -> bool {
        let language = language.to_lowercase();
        // "en-US" is supported when "en" is.
        let primary = language.split(['-', '_']).next().unwrap_or_default();
        self.supported_languages
            .iter()
            .any(|l| *l == language || l == primary)
    }
}

#[async_trait]
impl SentimentClassifier for SentimentApiClient {
    async fn analyze(&self, text: &str) -> Result<SentimentOutcome, ClassifierError> {
        let mut request = self.client.post(&self.url).json(&SentimentRequest { text });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let res = request.send().await?;

        let status = res.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(SentimentOutcome::Unsupported { language: None });
        }
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SentimentResponse = res
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let language = match body.language.filter(|l| !l.trim().is_empty()) {
            Some(language) if self.is_supported(&language) => language,
            other => return Ok(SentimentOutcome::Unsupported { language: other }),
        };

        let score = body
            .sentiment_score
            .ok_or_else(|| ClassifierError::Malformed("missing sentiment_score".to_string()))?;
        if !(-1.0..=1.0).contains(&score) {
            return Err(ClassifierError::Malformed(format!(
                "sentiment_score {} outside [-1, 1]",
                score
            )));
        }

        Ok(SentimentOutcome::Supported { language, score })
    }
}
