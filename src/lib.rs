pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use adapters::GeminiClient;
pub use config::toml_config::LocaConfig;
pub use crate::core::{analyzer::Analyzer, attempts::AttemptList, engine::LocateEngine};
pub use domain::model::{
    AnalysisOutcome, AnalysisResult, Artifact, ImagePayload, LocationGuess, ModelAttempt, Source,
};
pub use utils::error::{LocaError, Result};
pub use tokio_util::sync::CancellationToken;
