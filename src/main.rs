use anyhow::Context;
use clap::Parser;
use localens::app::report::render_report;
use localens::utils::error::ErrorSeverity;
use localens::utils::{logger, validation::Validate};
use localens::{
    Analyzer, CancellationToken, CliConfig, GeminiClient, LocaConfig, LocalStorage, LocateEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting localens");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入配置 (檔案或內建預設)
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            LocaConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => LocaConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let prompt = config.prompt_template().context("failed to load prompt file")?;
    let client = GeminiClient::from_config(&config);
    let analyzer = Analyzer::from_config(client, &config)?.with_prompt(prompt);
    let engine = LocateEngine::new(LocalStorage::new("."), analyzer);

    // Ctrl-C 取消目前的分析
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling analysis");
            ctrl_c.cancel();
        }
    });

    let credential = cli.credential(&config);

    match engine.run(&cli.image, &credential, &cancel).await {
        Ok(outcome) => {
            if let Some(output) = &cli.output {
                engine.save_result(output, &outcome.result).await?;
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome.result)?);
            } else {
                print!("{}", render_report(&outcome));
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 130,     // 使用者取消
                ErrorSeverity::Medium => 2,    // 服務端錯誤，可重試
                ErrorSeverity::High => 1,      // 輸入或設定錯誤
                ErrorSeverity::Critical => 3,  // 系統錯誤
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
