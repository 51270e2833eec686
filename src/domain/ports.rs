use crate::domain::model::{GenerationRequest, GenerationResponse, ModelAttempt};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn web_search(&self) -> bool;
    fn attempts(&self) -> &[ModelAttempt];
}

/// A remote multimodal model. One call per attempt; failures of any kind are
/// reported through the error and never retried here.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        credential: &str,
    ) -> Result<GenerationResponse>;
}
