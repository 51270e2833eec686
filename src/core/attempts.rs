use crate::domain::model::ModelAttempt;
use crate::utils::error::{LocaError, Result};

/// Ordered, non-empty fallback list of model configurations, most capable first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptList {
    attempts: Vec<ModelAttempt>,
}

impl AttemptList {
    pub fn new(attempts: Vec<ModelAttempt>) -> Result<Self> {
        if attempts.is_empty() {
            return Err(LocaError::MissingConfigError {
                field: "attempts".to_string(),
            });
        }
        Ok(Self { attempts })
    }

    /// A single fixed model; the degenerate one-element list.
    pub fn single(attempt: ModelAttempt) -> Self {
        Self {
            attempts: vec![attempt],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelAttempt> {
        self.attempts.iter()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn as_slice(&self) -> &[ModelAttempt] {
        &self.attempts
    }
}

impl Default for AttemptList {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
        }
    }
}

impl<'a> IntoIterator for &'a AttemptList {
    type Item = &'a ModelAttempt;
    type IntoIter = std::slice::Iter<'a, ModelAttempt>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub fn default_attempts() -> Vec<ModelAttempt> {
    vec![
        ModelAttempt::new("gemini-2.5-flash", 24576, "High Reasoning (Flash 2.5)"),
        ModelAttempt::new(
            "gemini-2.5-flash-lite-latest",
            16000,
            "Fast Reasoning (Flash Lite)",
        ),
        // no thinking support on 2.0
        ModelAttempt::new("gemini-2.0-flash", 0, "Standard (Flash 2.0)"),
    ]
}
