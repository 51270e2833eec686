use crate::core::attempts::AttemptList;
use crate::core::citations::dedup_sources;
use crate::core::encoder::encode_image;
use crate::core::normalizer::normalize;
use crate::core::prompt::PromptTemplate;
use crate::domain::model::{
    AnalysisOutcome, AnalysisResult, GenerationRequest, GenerationResponse, ImagePayload,
    InlineImage, ModelAttempt,
};
use crate::domain::ports::{ConfigProvider, GenerativeModel};
use crate::utils::error::{ErrorCategory, LocaError, Result, ALL_MODELS_UNAVAILABLE};
use tokio_util::sync::CancellationToken;

/// Runs one photograph through the attempt list, strictly in order, stopping at
/// the first attempt that yields a parsable result.
pub struct Analyzer<M: GenerativeModel> {
    model: M,
    attempts: AttemptList,
    prompt: PromptTemplate,
    web_search: bool,
}

impl<M: GenerativeModel> Analyzer<M> {
    pub fn new(model: M, attempts: AttemptList) -> Self {
        Self {
            model,
            attempts,
            prompt: PromptTemplate::default(),
            web_search: true,
        }
    }

    pub fn from_config<C: ConfigProvider>(model: M, config: &C) -> Result<Self> {
        let attempts = AttemptList::new(config.attempts().to_vec())?;
        Ok(Self::new(model, attempts).with_web_search(config.web_search()))
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn attempts(&self) -> &AttemptList {
        &self.attempts
    }

    pub async fn analyze(&self, image: &ImagePayload, credential: &str) -> Result<AnalysisResult> {
        let outcome = self
            .analyze_with_cancellation(image, credential, &CancellationToken::new())
            .await?;
        Ok(outcome.result)
    }

    pub async fn analyze_with_cancellation(
        &self,
        image: &ImagePayload,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome> {
        if credential.trim().is_empty() {
            return Err(LocaError::MissingCredential);
        }

        let encoded = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LocaError::Cancelled),
            encoded = encode_image(image) => encoded?,
        };
        let prompt = self.prompt.render();

        let mut last_error: Option<LocaError> = None;

        for (index, attempt) in self.attempts.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(LocaError::Cancelled);
            }

            tracing::info!(
                "🔎 Attempt {}/{}: {} ({})",
                index + 1,
                self.attempts.len(),
                attempt.model,
                attempt.label
            );

            let request = GenerationRequest {
                model: &attempt.model,
                prompt: &prompt,
                image: InlineImage {
                    mime_type: image.mime_type(),
                    data: &encoded,
                },
                web_search: self.web_search,
                reasoning_budget: attempt.reasoning_budget(),
            };

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("Analysis cancelled while waiting on {}", attempt.model);
                    return Err(LocaError::Cancelled);
                }
                response = self.model.generate(&request, credential) => response,
            };

            match response.and_then(interpret_response) {
                Ok(result) => {
                    tracing::info!(
                        "✅ {} returned {} guesses and {} sources",
                        attempt.model,
                        result.guesses.len(),
                        result.sources.len()
                    );
                    return Ok(AnalysisOutcome {
                        result,
                        model: attempt.model.clone(),
                        label: attempt.label.clone(),
                        attempts_made: index + 1,
                    });
                }
                Err(LocaError::Cancelled) => return Err(LocaError::Cancelled),
                Err(e) => {
                    log_attempt_failure(attempt, &e);
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| ALL_MODELS_UNAVAILABLE.to_string());
        tracing::error!("❌ All {} model attempts failed", self.attempts.len());

        Err(LocaError::AllAttemptsExhausted {
            attempts: self.attempts.len(),
            last_error,
        })
    }
}

fn interpret_response(response: GenerationResponse) -> Result<AnalysisResult> {
    let mut result: AnalysisResult = normalize(&response.text)?;
    if result.guesses.is_empty() {
        return Err(LocaError::malformed("response contained no location guesses"));
    }
    result.sources = dedup_sources(response.citations);
    Ok(result)
}

fn log_attempt_failure(attempt: &ModelAttempt, error: &LocaError) {
    if error.category() == ErrorCategory::Response {
        // answered, but not in the expected shape; may be a prompt/schema mismatch
        tracing::warn!(
            "⚠️ {} answered with an unusable response: {}",
            attempt.model,
            error
        );
    } else {
        tracing::warn!("⚠️ {} failed: {}", attempt.model, error);
    }
}
