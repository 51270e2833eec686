use crate::adapters::gemini::DEFAULT_ENDPOINT;
use crate::core::attempts::default_attempts;
use crate::core::prompt::PromptTemplate;
use crate::core::ConfigProvider;
use crate::domain::model::ModelAttempt;
use crate::utils::error::{LocaError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// 思考預算上限 (Gemini 2.5 系列)
pub const MAX_THINKING_BUDGET: u32 = 32768;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub prompt: Option<PromptConfig>,
    #[serde(default = "default_attempts")]
    pub attempts: Vec<ModelAttempt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_web_search")]
    pub web_search: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub file: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_web_search() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            web_search: default_web_search(),
        }
    }
}

impl Default for LocaConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            prompt: None,
            attempts: default_attempts(),
        }
    }
}

impl LocaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LocaError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LocaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.endpoint", &self.service.endpoint)?;
        validation::validate_positive_number(
            "service.timeout_seconds",
            self.service.timeout_seconds,
            1,
        )?;

        if self.attempts.is_empty() {
            return Err(LocaError::MissingConfigError {
                field: "attempts".to_string(),
            });
        }

        for (index, attempt) in self.attempts.iter().enumerate() {
            validation::validate_non_empty_string(
                &format!("attempts[{}].model", index),
                &attempt.model,
            )?;
            validation::validate_non_empty_string(
                &format!("attempts[{}].label", index),
                &attempt.label,
            )?;
            validation::validate_range(
                &format!("attempts[{}].thinking_budget", index),
                attempt.thinking_budget,
                0,
                MAX_THINKING_BUDGET,
            )?;
        }

        if let Some(prompt) = &self.prompt {
            validation::validate_non_empty_string("prompt.file", &prompt.file)?;
        }

        Ok(())
    }

    /// 取得 API 金鑰；未設定或環境變數未解析時回傳 None
    pub fn api_key(&self) -> Option<&str> {
        self.service
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !ENV_PLACEHOLDER.is_match(key))
    }

    /// 取得提示詞模板 (自訂檔案或內建)
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        match &self.prompt {
            Some(prompt) => PromptTemplate::from_file(&prompt.file),
            None => Ok(PromptTemplate::default()),
        }
    }
}

impl ConfigProvider for LocaConfig {
    fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds
    }

    fn web_search(&self) -> bool {
        self.service.web_search
    }

    fn attempts(&self) -> &[ModelAttempt] {
        &self.attempts
    }
}

impl Validate for LocaConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[service]
endpoint = "https://proxy.example.com/v1beta"
api_key = "abc123"
timeout_seconds = 45
web_search = false

[[attempts]]
model = "gemini-2.5-pro"
thinking_budget = 32768
label = "Pro"

[[attempts]]
model = "gemini-2.0-flash"
label = "Standard"
"#;

        let config = LocaConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.endpoint(), "https://proxy.example.com/v1beta");
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.timeout_seconds(), 45);
        assert!(!config.web_search());
        assert_eq!(config.attempts().len(), 2);
        assert_eq!(config.attempts()[1].thinking_budget, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_builtin_defaults() {
        let config = LocaConfig::from_toml_str("").unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert!(config.web_search());
        assert_eq!(config.timeout_seconds(), 120);
        assert_eq!(config.attempts(), default_attempts().as_slice());
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOCALENS_TEST_KEY", "from-env");

        let toml_content = r#"
[service]
api_key = "${LOCALENS_TEST_KEY}"
"#;

        let config = LocaConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("LOCALENS_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_is_absent() {
        let toml_content = r#"
[service]
api_key = "${LOCALENS_DEFINITELY_UNSET_VAR}"
"#;

        let config = LocaConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.service.api_key.as_deref(),
            Some("${LOCALENS_DEFINITELY_UNSET_VAR}")
        );
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_url = LocaConfig::from_toml_str("[service]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let zero_timeout = LocaConfig::from_toml_str("[service]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let no_attempts = LocaConfig::from_toml_str("attempts = []\n").unwrap();
        assert!(matches!(
            no_attempts.validate(),
            Err(LocaError::MissingConfigError { .. })
        ));

        let huge_budget = LocaConfig::from_toml_str(
            "[[attempts]]\nmodel = \"m\"\nthinking_budget = 100000\nlabel = \"l\"\n",
        )
        .unwrap();
        assert!(huge_budget.validate().is_err());

        let blank_model =
            LocaConfig::from_toml_str("[[attempts]]\nmodel = \" \"\nlabel = \"l\"\n").unwrap();
        assert!(blank_model.validate().is_err());
    }

    #[test]
    fn test_config_from_file_with_prompt() {
        let mut prompt_file = NamedTempFile::new().unwrap();
        prompt_file.write_all(b"Name the country only.").unwrap();
        let prompt_path = prompt_file.path().to_str().unwrap().replace('\\', "/");

        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = format!("[prompt]\nfile = \"{}\"\n", prompt_path);
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = LocaConfig::from_file(temp_file.path()).unwrap();
        let template = config.prompt_template().unwrap();
        assert_eq!(template.instructions(), "Name the country only.");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = LocaConfig::from_toml_str("[service\nendpoint = 1").unwrap_err();
        assert!(matches!(err, LocaError::ConfigValidationError { .. }));
    }
}
