pub mod toml_config;

pub use toml_config::{ExtractConfig, LoadConfig, ScrapeConfig, SourceConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "septa-bids")]
#[command(about = "Scrape SEPTA open quotes into CSV and JSON")]
pub struct CliConfig {
    #[arg(long, help = "TOML file overriding the built-in defaults")]
    pub config: Option<String>,

    #[arg(long, help = "Directory for the CSV and JSON files")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch, extract and convert (the default)
    Run,
    /// Convert an existing CSV hand-off file to JSON
    Convert,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Resolves the effective run configuration: defaults, then the TOML file, then flags.
    pub fn scrape_config(&self) -> crate::utils::error::Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::from_file(path)?,
            None => ScrapeConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.load.output_dir = dir.clone();
        }
        Ok(config)
    }
}
