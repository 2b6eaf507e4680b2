use std::path::Path;

use crate::app::Config;
use crate::cli::output;
use crate::error::Result;

/// Validates the configuration file without starting the scanner.
pub fn execute_config(config_path: &Path) -> Result<()> {
    output::section("Configuration Check");
    output::field("config", config_path.display());

    let config = Config::load(config_path)?;
    output::success("configuration file is valid");

    output::section("Summary");
    output::field("venues", format!("{:?}", config.scan_venues));
    output::field("trade size", format!("${} USDT", config.trade_size_usdt));
    output::field("min raw spread", format!("{}%", config.min_raw_spread_pct));
    output::field("min trade", format!("${} USDT", config.min_trade_usdt));
    output::field("scan interval", format!("{} ms", config.scan_interval_ms));
    output::field("batch size", config.scan_batch_size);
    output::field("debug", config.debug);
    output::field("status file", config.status_file.display());

    if config.credentials.is_empty() {
        output::warning("no per-venue credentials configured (read-only endpoints still work)");
    } else {
        output::success(&format!("credentials configured for {} venue(s)", config.credentials.len()));
    }

    output::success("configuration check complete");
    Ok(())
}
