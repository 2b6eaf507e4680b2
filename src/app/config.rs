use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::domain::VenueId;
use crate::core::{EngineConfig, SchedulerConfig};
use crate::error::{Error, Result};

/// Optional per-venue API credentials (spec.md §6). Read-only endpoints work
/// without them; nothing in this crate's core pipeline requires them, but a
/// real `ExchangeAdapter` wired in downstream would read them here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueCredentials {
    pub api_key: Option<String>,
    pub secret: Option<String>,
    pub passphrase: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Pretty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSpec {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSpec {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}

/// The on-disk/TOML shape (spec.md §6's configuration table, grouped into
/// sections). Every field is optional; a missing file is not an error, only
/// an unreadable/unparseable one is (spec.md §7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSpec {
    #[serde(default)]
    pub trade_size_usdt: Option<Decimal>,
    #[serde(default)]
    pub min_raw_spread_pct: Option<Decimal>,
    #[serde(default)]
    pub min_trade_usdt: Option<Decimal>,
    #[serde(default)]
    pub scan_interval_ms: Option<u64>,
    #[serde(default)]
    pub scan_batch_size: Option<usize>,
    #[serde(default)]
    pub scan_venues: Option<Vec<String>>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub logging: Option<LoggingSpec>,
    #[serde(default)]
    pub status_file: Option<PathBuf>,
}

/// The fully-resolved, validated configuration the rest of the crate
/// consumes (file < env < CLI flags, spec.md §6.1 precedence).
#[derive(Debug, Clone)]
pub struct Config {
    pub trade_size_usdt: Decimal,
    pub min_raw_spread_pct: Decimal,
    pub min_trade_usdt: Decimal,
    pub scan_interval_ms: u64,
    pub scan_batch_size: usize,
    pub scan_venues: Vec<VenueId>,
    pub debug: bool,
    pub logging: LoggingSpec,
    pub status_file: PathBuf,
    pub credentials: BTreeMap<VenueId, VenueCredentials>,
}

/// Default operator status-file path (spec.md §9 ambient addition): a
/// per-process temp location works out of the box without requiring root or
/// a pre-created service directory.
fn default_status_file() -> PathBuf {
    std::env::temp_dir().join("arbiscan").join("status.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trade_size_usdt: Decimal::from(25),
            min_raw_spread_pct: Decimal::ZERO,
            min_trade_usdt: Decimal::ONE,
            scan_interval_ms: 3000,
            scan_batch_size: 30,
            scan_venues: VenueId::ALL.to_vec(),
            debug: false,
            logging: LoggingSpec::default(),
            status_file: default_status_file(),
            credentials: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads `path` (TOML) if it exists, applies `.env` + process environment
    /// overrides, and validates. `.env` is loaded once, ahead of everything
    /// else, so exported vars are visible to the environment overrides below.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Config::default();
        let path = path.as_ref();
        if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            let spec: ConfigSpec = toml::from_str(&raw)?;
            config.apply_spec(spec)?;
        }
        config.apply_env()?;
        config.load_credentials_from_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_spec(&mut self, spec: ConfigSpec) -> Result<()> {
        if let Some(value) = spec.trade_size_usdt {
            self.trade_size_usdt = value;
        }
        if let Some(value) = spec.min_raw_spread_pct {
            self.min_raw_spread_pct = value;
        }
        if let Some(value) = spec.min_trade_usdt {
            self.min_trade_usdt = value;
        }
        if let Some(value) = spec.scan_interval_ms {
            self.scan_interval_ms = value;
        }
        if let Some(value) = spec.scan_batch_size {
            self.scan_batch_size = value;
        }
        if let Some(venues) = spec.scan_venues {
            self.scan_venues = parse_venues(&venues)?;
        }
        if let Some(value) = spec.debug {
            self.debug = value;
        }
        if let Some(logging) = spec.logging {
            self.logging = logging;
        }
        if let Some(status_file) = spec.status_file {
            self.status_file = status_file;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("TRADE_SIZE_USDT") {
            self.trade_size_usdt = parse_decimal(&value, "TRADE_SIZE_USDT")?;
        }
        if let Ok(value) = std::env::var("MIN_RAW_SPREAD_PCT") {
            self.min_raw_spread_pct = parse_decimal(&value, "MIN_RAW_SPREAD_PCT")?;
        }
        if let Ok(value) = std::env::var("MIN_TRADE_USDT") {
            self.min_trade_usdt = parse_decimal(&value, "MIN_TRADE_USDT")?;
        }
        if let Ok(value) = std::env::var("SCAN_INTERVAL_MS") {
            self.scan_interval_ms = value
                .parse()
                .map_err(|_| Error::Config(format!("SCAN_INTERVAL_MS is not a valid integer: {value}")))?;
        }
        if let Ok(value) = std::env::var("SCAN_BATCH_SIZE") {
            self.scan_batch_size = value
                .parse()
                .map_err(|_| Error::Config(format!("SCAN_BATCH_SIZE is not a valid integer: {value}")))?;
        }
        if let Ok(value) = std::env::var("SCAN_VENUES") {
            let venues: Vec<String> = value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
            self.scan_venues = parse_venues(&venues)?;
        }
        if let Ok(value) = std::env::var("ARB_DEBUG") {
            self.debug = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    fn load_credentials_from_env(&mut self) {
        for venue in VenueId::ALL {
            let prefix = venue.as_str().to_ascii_uppercase();
            let api_key = std::env::var(format!("{prefix}_API_KEY")).ok();
            let secret = std::env::var(format!("{prefix}_SECRET")).ok();
            let passphrase = std::env::var(format!("{prefix}_PASSPHRASE")).ok();
            if api_key.is_some() || secret.is_some() || passphrase.is_some() {
                self.credentials.insert(venue, VenueCredentials { api_key, secret, passphrase });
            }
        }
    }

    /// CLI-flag overrides, applied last (highest precedence, spec.md §6.1).
    pub fn apply_overrides(
        &mut self,
        trade_size_usdt: Option<Decimal>,
        min_raw_spread_pct: Option<Decimal>,
        min_trade_usdt: Option<Decimal>,
        scan_interval_ms: Option<u64>,
        scan_batch_size: Option<usize>,
        debug: Option<bool>,
        json_logs: bool,
        status_file: Option<PathBuf>,
    ) {
        if let Some(value) = trade_size_usdt {
            self.trade_size_usdt = value;
        }
        if let Some(value) = min_raw_spread_pct {
            self.min_raw_spread_pct = value;
        }
        if let Some(value) = min_trade_usdt {
            self.min_trade_usdt = value;
        }
        if let Some(value) = scan_interval_ms {
            self.scan_interval_ms = value;
        }
        if let Some(value) = scan_batch_size {
            self.scan_batch_size = value;
        }
        if let Some(value) = debug {
            self.debug = value;
        }
        if json_logs {
            self.logging.format = LogFormat::Json;
        }
        if let Some(value) = status_file {
            self.status_file = value;
        }
    }

    /// Initializes the global `tracing` subscriber from `self.logging`
    /// (spec.md §9 ambient addition). `RUST_LOG` takes precedence over the
    /// configured level, matching the teacher's `Config::init_logging`.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format {
            LogFormat::Json => {
                fmt().json().with_env_filter(filter).init();
            }
            LogFormat::Pretty => {
                fmt().with_env_filter(filter).init();
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scan_venues.is_empty() {
            return Err(Error::EmptyVenueRegistry);
        }
        if self.trade_size_usdt <= Decimal::ZERO {
            return Err(Error::Config("trade_size_usdt must be > 0".to_string()));
        }
        if self.min_trade_usdt <= Decimal::ZERO {
            return Err(Error::Config("min_trade_usdt must be > 0".to_string()));
        }
        if self.scan_interval_ms == 0 {
            return Err(Error::Config("scan_interval_ms must be > 0".to_string()));
        }
        if self.scan_batch_size == 0 {
            return Err(Error::Config("scan_batch_size must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            trade_size_usdt: self.trade_size_usdt,
            min_raw_spread_pct: self.min_raw_spread_pct,
            min_trade_usdt: self.min_trade_usdt,
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            scan_interval_ms: self.scan_interval_ms,
            batch_size: self.scan_batch_size,
            scan_venues: self.scan_venues.clone(),
            ..Default::default()
        }
    }
}

fn parse_venues(raw: &[String]) -> Result<Vec<VenueId>> {
    raw.iter()
        .map(|s| s.parse::<VenueId>().map_err(|_| Error::Config(format!("unsupported venue: {s}"))))
        .collect()
}

fn parse_decimal(raw: &str, key: &str) -> Result<Decimal> {
    raw.parse::<Decimal>().map_err(|_| Error::Config(format!("{key} is not a valid decimal: {raw}")))
}
