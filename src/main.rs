use anyhow::Context;
use clap::Parser;
use septa_bids::config::Command;
use septa_bids::utils::error::ErrorSeverity;
use septa_bids::utils::{logger, validation::Validate};
use septa_bids::{BidPipeline, CliConfig, EtlEngine, EtlError, HttpFetcher, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    let config = cli
        .scrape_config()
        .with_context(|| format!("loading configuration from {:?}", cli.config))?;

    if let Err(e) = config.validate() {
        tracing::debug!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::from_config(&config);
    let fetcher = HttpFetcher::new(&config).context("building HTTP client")?;
    let engine = EtlEngine::new(BidPipeline::new(storage, config, fetcher));

    let outcome = match cli.command.unwrap_or(Command::Run) {
        Command::Run => engine.run().await.map(|report| {
            tracing::info!(
                "✅ {} listings saved to {} and {}",
                report.rows,
                report.csv_path,
                report.json_path
            );
        }),
        Command::Convert => engine.convert_only().await.map(|summary| {
            tracing::info!("✅ {} rows saved to {}", summary.rows, summary.json_path);
        }),
    };

    if let Err(e) = outcome {
        report_failure(&e);

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn report_failure(e: &EtlError) {
    tracing::debug!(
        "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // The two expected failures print their diagnostic verbatim.
    match e {
        EtlError::HttpStatus { .. } | EtlError::ContainerNotFound { .. } => println!("{}", e),
        _ => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
    }
}
