use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use trivia_core::model::RawQuestion;

use crate::error::FetchError;

/// Contract for a remote question bank.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch a batch of `amount` questions.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, a non-success status, a
    /// source-side error code, a malformed payload, or an empty batch.
    async fn fetch_questions(&self, amount: u8) -> Result<Vec<RawQuestion>, FetchError>;
}

/// Open Trivia DB HTTP client.
#[derive(Clone)]
pub struct OpenTriviaClient {
    client: Client,
    base_url: String,
}

impl OpenTriviaClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    response_code: u8,
    results: Vec<RawQuestion>,
}

#[async_trait]
impl QuestionSource for OpenTriviaClient {
    async fn fetch_questions(&self, amount: u8) -> Result<Vec<RawQuestion>, FetchError> {
        let url = format!("{}/api.php", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("amount", u32::from(amount))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body: BatchResponse = response.json().await?;
        if body.response_code != 0 {
            return Err(FetchError::Api(body.response_code));
        }
        if body.results.is_empty() {
            return Err(FetchError::EmptyBatch);
        }

        Ok(body.results)
    }
}
