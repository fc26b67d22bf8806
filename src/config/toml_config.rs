use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_URL: &str =
    "https://www.septa.org/procurement/bids/?bid_category=quotes&bid_status=open";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
pub const DEFAULT_CSV_FILE: &str = "septa_open_quotes.csv";
pub const DEFAULT_JSON_FILE: &str = "septa_open_quotes.json";

/// Full run configuration. `ScrapeConfig::default()` is the stock SEPTA open-quotes scrape;
/// a TOML file only needs the keys it wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Listing page to GET.
    pub url: String,
    /// Sent as `User-Agent`; the site rejects obvious bots.
    pub user_agent: String,
    /// Additional request headers.
    pub headers: BTreeMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Element holding all listings (`ul#filterList`).
    pub container_selector: String,
    /// Tag of the direct children that are listings (`li`).
    pub item_tag: String,
    /// First match inside a listing gives the bid number (`span.bid-number`).
    pub bid_number_selector: String,
    /// First match inside a listing gives title text and `href` (`a`).
    pub link_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            container_selector: "ul#filterList".to_string(),
            item_tag: "li".to_string(),
            bid_number_selector: "span.bid-number".to_string(),
            link_selector: "a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Directory both output files are written to, relative to the working directory.
    pub output_dir: String,
    pub csv_file: String,
    pub json_file: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            json_file: DEFAULT_JSON_FILE.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Loads a config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown variables as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Checks URL, headers, selectors and output paths.
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_header("source.user_agent", "User-Agent", &self.source.user_agent)?;
        for (name, value) in &self.source.headers {
            validation::validate_header("source.headers", name, value)?;
        }

        validation::validate_selector("extract.container_selector", &self.extract.container_selector)?;
        validation::validate_selector("extract.item_tag", &self.extract.item_tag)?;
        validation::validate_selector(
            "extract.bid_number_selector",
            &self.extract.bid_number_selector,
        )?;
        validation::validate_selector("extract.link_selector", &self.extract.link_selector)?;

        validation::validate_path("load.output_dir", &self.load.output_dir)?;
        validation::validate_path("load.csv_file", &self.load.csv_file)?;
        validation::validate_path("load.json_file", &self.load.json_file)?;

        if self.load.csv_file == self.load.json_file {
            return Err(EtlError::InvalidConfigValueError {
                field: "load.json_file".to_string(),
                value: self.load.json_file.clone(),
                reason: "JSON output would overwrite the CSV hand-off file".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ScrapeConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn user_agent(&self) -> &str {
        &self.source.user_agent
    }

    fn extra_headers(&self) -> &BTreeMap<String, String> {
        &self.source.headers
    }

    fn extract_rules(&self) -> &ExtractConfig {
        &self.extract
    }

    fn output_dir(&self) -> &str {
        &self.load.output_dir
    }

    fn csv_file(&self) -> &str {
        &self.load.csv_file
    }

    fn json_file(&self) -> &str {
        &self.load.json_file
    }
}

impl Validate for ScrapeConfig {
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
    fn test_default_config_matches_fixed_literals() {
        let config = ScrapeConfig::default();

        assert_eq!(
            config.source_url(),
            "https://www.septa.org/procurement/bids/?bid_category=quotes&bid_status=open"
        );
        assert!(config.user_agent().starts_with("Mozilla/5.0"));
        assert_eq!(config.extract.container_selector, "ul#filterList");
        assert_eq!(config.extract.item_tag, "li");
        assert_eq!(config.extract.bid_number_selector, "span.bid-number");
        assert_eq!(config.extract.link_selector, "a");
        assert_eq!(config.output_dir(), ".");
        assert_eq!(config.csv_file(), "septa_open_quotes.csv");
        assert_eq!(config.json_file(), "septa_open_quotes.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_content = r#"
[source]
url = "https://example.com/bids"

[load]
output_dir = "./out"
"#;

        let config = ScrapeConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.url, "https://example.com/bids");
        assert_eq!(config.source.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.extract, ExtractConfig::default());
        assert_eq!(config.load.output_dir, "./out");
        assert_eq!(config.load.csv_file, DEFAULT_CSV_FILE);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ScrapeConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SEPTA_BIDS_TEST_URL", "https://test.example.com/bids");

        let toml_content = r#"
[source]
url = "${SEPTA_BIDS_TEST_URL}"
"#;

        let config = ScrapeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.url, "https://test.example.com/bids");

        std::env::remove_var("SEPTA_BIDS_TEST_URL");
    }

    #[test]
    fn test_unknown_env_var_is_left_as_written() {
        let toml_content = r#"
[load]
csv_file = "${SEPTA_BIDS_SURELY_UNSET}.csv"
"#;

        let config = ScrapeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.load.csv_file, "${SEPTA_BIDS_SURELY_UNSET}.csv");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = ScrapeConfig::from_toml_str("[source]\nurl = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_selector =
            ScrapeConfig::from_toml_str("[extract]\ncontainer_selector = \"ul[\"\n").unwrap();
        assert!(bad_selector.validate().is_err());

        let clash = ScrapeConfig::from_toml_str(
            "[load]\ncsv_file = \"same.out\"\njson_file = \"same.out\"\n",
        )
        .unwrap();
        assert!(clash.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ScrapeConfig::from_toml_str("[source\nurl = 1").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
url = "https://example.com/procurement"

[source.headers]
Accept-Language = "en-US"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ScrapeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.url, "https://example.com/procurement");
        assert_eq!(
            config.extra_headers().get("Accept-Language").map(String::as_str),
            Some("en-US")
        );
        assert!(config.validate().is_ok());
    }
}
