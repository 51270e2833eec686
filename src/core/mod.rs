pub mod analyzer;
pub mod attempts;
pub mod citations;
pub mod encoder;
pub mod engine;
pub mod normalizer;
pub mod prompt;

pub use crate::domain::model::{AnalysisOutcome, AnalysisResult, ImagePayload, ModelAttempt};
pub use crate::domain::ports::{ConfigProvider, GenerativeModel, Storage};
pub use crate::utils::error::Result;
