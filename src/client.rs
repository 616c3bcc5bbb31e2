use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::types::{
    question::{QuestionId, QuestionWrapper},
    response::Response,
};

/// What the quiz service needs from the question service.
///
/// Calls are single blocking requests. Timeouts or retries belong in an
/// implementation, not in the callers.
#[async_trait]
pub trait QuestionClient: Send + Sync + 'static {
    async fn generate(&self, category: &str, count: u32) -> Result<Vec<QuestionId>, Error>;
    async fn resolve(&self, ids: &[QuestionId]) -> Result<Vec<QuestionWrapper>, Error>;
    async fn score(&self, responses: &[Response]) -> Result<u32, Error>;
}

#[derive(Clone)]
pub struct HttpQuestionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpQuestionClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    async fn send<T>(&self, request: reqwest::RequestBuilder) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let request_id = Uuid::new_v4();
        let request = request.header("x-request-id", request_id.to_string()).build()?;
        log::debug!("[{}] {} {}", request_id, request.method(), request.url());

        let res = self.client.execute(request).await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            log::warn!("[{}] question service answered {}", request_id, status);
            return Err(Error::UpstreamStatus(status.as_u16(), body));
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl QuestionClient for HttpQuestionClient {
    async fn generate(&self, category: &str, count: u32) -> Result<Vec<QuestionId>, Error> {
        let request = self
            .client
            .get(self.url("generate"))
            .query(&[("category", category.to_string()), ("noOfQuestions", count.to_string())]);
        self.send(request).await
    }

    async fn resolve(&self, ids: &[QuestionId]) -> Result<Vec<QuestionWrapper>, Error> {
        let request = self.client.post(self.url("getQuestions")).json(ids);
        self.send(request).await
    }

    async fn score(&self, responses: &[Response]) -> Result<u32, Error> {
        let request = self.client.post(self.url("getScore")).json(responses);
        self.send(request).await
    }
}
