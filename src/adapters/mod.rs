// Adapters layer: concrete clients for external services.

pub mod gemini;

pub use gemini::GeminiClient;
