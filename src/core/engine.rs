use crate::core::analyzer::Analyzer;
use crate::core::Storage;
use crate::domain::model::{AnalysisOutcome, AnalysisResult, ImagePayload};
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{LocaError, Result};
use crate::utils::validation::validate_image_type;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Load an image from storage, analyze it, and optionally persist the result.
pub struct LocateEngine<S: Storage, M: GenerativeModel> {
    storage: S,
    analyzer: Analyzer<M>,
}

impl<S: Storage, M: GenerativeModel> LocateEngine<S, M> {
    pub fn new(storage: S, analyzer: Analyzer<M>) -> Self {
        Self { storage, analyzer }
    }

    pub async fn load_image(&self, path: &str) -> Result<ImagePayload> {
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .ok_or_else(|| {
                LocaError::encoding(format!("cannot determine the image type of '{}'", path))
            })?;
        validate_image_type(&mime_type)?;

        let bytes = self.storage.read_file(path).await?;
        tracing::debug!("Loaded {} ({} bytes, {})", path, bytes.len(), mime_type);
        Ok(ImagePayload::new(bytes, mime_type))
    }

    pub async fn run(
        &self,
        image_path: &str,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        tracing::info!("📷 Analyzing {}", image_path);

        let image = self.load_image(image_path).await?;
        let outcome = self
            .analyzer
            .analyze_with_cancellation(&image, credential, cancel)
            .await?;

        tracing::info!(
            "📍 Located {} via {} in {:?}",
            image_path,
            outcome.label,
            started.elapsed()
        );
        Ok(outcome)
    }

    pub async fn save_result(&self, path: &str, result: &AnalysisResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result)?;
        self.storage.write_file(path, json.as_bytes()).await?;
        tracing::info!("📁 Result saved to {}", path);
        Ok(())
    }
}
