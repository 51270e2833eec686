#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use self::toml_config::LocaConfig;

#[cfg(feature = "cli")]
#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "localens")]
#[command(about = "Pinpoint where a photograph was taken using a multimodal model")]
pub struct CliConfig {
    /// Path to the photograph (PNG, JPEG or WEBP)
    pub image: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Override the per-request timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Disable the web-search tool
    #[arg(long)]
    pub no_web_search: bool,

    /// Write the result as JSON to this path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

// 金鑰不得出現在日誌中
#[cfg(feature = "cli")]
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("image", &self.image)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("no_web_search", &self.no_web_search)
            .field("output", &self.output)
            .field("json", &self.json)
            .field("verbose", &self.verbose)
            .field("log_json", &self.log_json)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut LocaConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.service.timeout_seconds = timeout;
        }
        if self.no_web_search {
            config.service.web_search = false;
        }
    }

    /// 命令列金鑰優先，其次為設定檔
    pub fn credential(&self, config: &LocaConfig) -> String {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or_else(|| config.api_key())
            .unwrap_or_default()
            .to_string()
    }
}
