use std::path::Path;

use crate::app::{health_check, Config, HealthStatus};
use crate::error::{Error, Result};

/// Runs local (non-network) health checks against a loaded configuration.
pub fn execute_health(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let report = health_check(&config);

    println!("Health check:");
    for check in report.checks() {
        let status = match check.status() {
            HealthStatus::Healthy => "\u{2713}",
            HealthStatus::Unhealthy(_) => "\u{2717}",
        };
        println!("  {status} {}{}", check.name(), if check.critical() { " (critical)" } else { "" });
        if let HealthStatus::Unhealthy(reason) = check.status() {
            println!("      {reason}");
        }
    }

    if !report.is_healthy() {
        return Err(Error::Config("health check failed".to_string()));
    }
    println!("\u{2713} health check passed");
    Ok(())
}
