use localens::config::toml_config::LocaConfig;
use localens::core::attempts::default_attempts;
use localens::core::ConfigProvider;
use localens::utils::validation::Validate;
use localens::{Analyzer, GeminiClient};

#[test]
fn test_example_config_matches_builtin_defaults() {
    let config = LocaConfig::from_toml_str(include_str!("../localens.example.toml")).unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.attempts(), default_attempts().as_slice());
    assert_eq!(config.endpoint(), LocaConfig::default().endpoint());
    assert!(config.prompt.is_none());
}

#[test]
fn test_analyzer_built_from_config_keeps_order() {
    let config = LocaConfig::from_toml_str(
        r#"
[[attempts]]
model = "gemini-2.5-pro"
thinking_budget = 2048
label = "Pro"

[[attempts]]
model = "gemini-2.0-flash"
label = "Standard"
"#,
    )
    .unwrap();

    let client = GeminiClient::from_config(&config);
    assert_eq!(client.endpoint(), "https://generativelanguage.googleapis.com/v1beta");

    let analyzer = Analyzer::from_config(client, &config).unwrap();
    let models: Vec<&str> = analyzer.attempts().iter().map(|a| a.model.as_str()).collect();
    assert_eq!(models, vec!["gemini-2.5-pro", "gemini-2.0-flash"]);
}

#[test]
fn test_analyzer_rejects_empty_attempts() {
    let config = LocaConfig::from_toml_str("attempts = []\n").unwrap();
    let client = GeminiClient::from_config(&config);
    assert!(Analyzer::from_config(client, &config).is_err());
}
