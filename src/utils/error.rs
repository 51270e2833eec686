use thiserror::Error;

pub const ALL_MODELS_UNAVAILABLE: &str =
    "All AI models are currently overloaded or unavailable. Please try again later.";

#[derive(Error, Debug)]
pub enum LocaError {
    #[error("API Key is missing. Please provide your Gemini API key (--api-key or GEMINI_API_KEY).")]
    MissingCredential,

    #[error("Image encoding failed: {message}")]
    EncodingError { message: String },

    #[error("Model {model} failed{}: {message}", status_suffix(.status))]
    RemoteCallError {
        model: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to analyze image after multiple attempts. Last error: {last_error}")]
    AllAttemptsExhausted { attempts: usize, last_error: String },

    #[error("Analysis was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Input,
    Remote,
    Response,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocaError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential => ErrorCategory::Credential,
            Self::EncodingError { .. } => ErrorCategory::Input,
            Self::RemoteCallError { .. } | Self::AllAttemptsExhausted { .. } => {
                ErrorCategory::Remote
            }
            Self::MalformedResponse { .. } | Self::Serialization(_) => ErrorCategory::Response,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Cancelled | Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Low,
            Self::RemoteCallError { .. }
            | Self::MalformedResponse { .. }
            | Self::AllAttemptsExhausted { .. } => ErrorSeverity::Medium,
            Self::MissingCredential
            | Self::EncodingError { .. }
            | Self::Serialization(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Credential => "Pass --api-key or export GEMINI_API_KEY, then retry",
            ErrorCategory::Input => "Use a PNG, JPEG or WEBP photograph that is not empty",
            ErrorCategory::Remote => {
                "The model service may be overloaded or rejecting the key; wait a moment and retry"
            }
            ErrorCategory::Response => {
                "The model answered in an unexpected shape; retry or adjust the prompt file"
            }
            ErrorCategory::Configuration => "Check the configuration file and command-line flags",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingCredential | Self::AllAttemptsExhausted { .. } => self.to_string(),
            Self::EncodingError { message } => format!("Could not read the image: {}", message),
            Self::Cancelled => "Analysis cancelled.".to_string(),
            Self::Io(e) => format!("File error: {}", e),
            other => format!("Analysis failed: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocaError>;
