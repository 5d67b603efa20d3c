use clap::Parser;
use copa_etl::core::ConfigProvider;
use copa_etl::utils::error::ErrorSeverity;
use copa_etl::utils::{logger, validation::Validate};
use copa_etl::{CliConfig, CopaPipeline, EtlEngine, EtlError, LocalStorage, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::info!("Starting copa-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    1
                }
            }
        }
        None => run(cli).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: C) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        return 1;
    }

    let pipeline = match CopaPipeline::new(LocalStorage::new("."), config) {
        Ok(pipeline) => pipeline,
        Err(e) => return report(&e),
    };

    match EtlEngine::new(pipeline).run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Wrote {} rows x {} columns to {}",
                summary.rows,
                summary.columns,
                summary.output_path
            );
            0
        }
        Err(e) => report(&e),
    }
}

fn report(e: &EtlError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    // HTTP errors were already printed with their body by the engine.
    if !matches!(e, EtlError::HttpError { .. }) {
        println!("Error: {}", e.user_friendly_message());
    }
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
