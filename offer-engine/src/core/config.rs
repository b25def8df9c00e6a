use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | OFFER_DATA_DIR | ./data | directory holding the offer database |
/// | OFFER_DB_FILE | offers.redb | database file name |
/// | SUMMARY_DEBOUNCE_MS | 300 | delay before totals are recomputed after an edit |
/// | DEFAULT_VAT_RATE | 23 | VAT used when the entered rate cannot be parsed |
/// | DEFAULT_UNIT | szt. | unit label for products without one |
/// | CURRENCY_SYMBOL | zł | currency suffix in exported documents |
/// | DOCUMENT_WIDTH | 80 | text document width in characters |
/// | DOCUMENT_PAGE_LINES | 60 | lines per document page |
/// | LOG_LEVEL | info | tracing max level |
/// | LOG_DIR | (unset) | daily rolling log files when set |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// OFFER_DATA_DIR=/srv/offers SUMMARY_DEBOUNCE_MS=500 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the offer database
    pub data_dir: String,
    /// Database file name inside `data_dir`
    pub db_file: String,
    /// Debounce window for totals recomputation (millis)
    pub summary_debounce_ms: u64,
    /// Fallback VAT rate for unparsable input
    pub default_vat_rate: Decimal,
    /// Unit label for products without one
    pub default_unit: String,
    /// Currency suffix used by document formatting
    pub currency_symbol: String,
    /// Text document width (characters)
    pub document_width: usize,
    /// Lines per rendered page
    pub document_page_lines: usize,
    /// tracing max level
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

impl EngineConfig {
    /// Load configuration from the environment
    ///
    /// Missing or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("OFFER_DATA_DIR").unwrap_or_else(|_| "./data".into()),
            db_file: std::env::var("OFFER_DB_FILE").unwrap_or_else(|_| "offers.redb".into()),
            summary_debounce_ms: std::env::var("SUMMARY_DEBOUNCE_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            default_vat_rate: std::env::var("DEFAULT_VAT_RATE")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(Decimal::from(23)),
            default_unit: std::env::var("DEFAULT_UNIT")
                .unwrap_or_else(|_| shared::models::DEFAULT_UNIT.into()),
            currency_symbol: std::env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "zł".into()),
            document_width: std::env::var("DOCUMENT_WIDTH")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(80),
            document_page_lines: std::env::var("DOCUMENT_PAGE_LINES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the data directory
    ///
    /// Mostly used by tests that point the store at a temp dir.
    pub fn with_overrides(data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config
    }

    /// Full path of the offer database
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.db_file)
    }

    pub fn summary_debounce(&self) -> Duration {
        Duration::from_millis(self.summary_debounce_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Make sure the data and log directories exist and install the logger
///
/// `.env` is loaded by the caller before the config is read.
pub fn setup_environment(config: &EngineConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    crate::utils::logger::init_logger_with_file(
        Some(config.log_level.as_str()),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(())
}
