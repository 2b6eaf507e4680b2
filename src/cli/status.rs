//! Handler for the `status` command: renders the operator status file
//! written by the `run` command's tick loop (spec.md §9 ambient addition;
//! the `GET opportunities`/`GET snapshot` read endpoints themselves are the
//! out-of-scope web server's job, spec.md §1).

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;

use crate::app::{Config, StatusFile};
use crate::cli::output;
use crate::error::Result;

const STALE_AFTER: Duration = Duration::minutes(5);

pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    match try_read_status_file(&config.status_file) {
        Some(status) => display_status(&status),
        None => display_not_running(&config.status_file),
    }

    Ok(())
}

fn try_read_status_file(path: &Path) -> Option<StatusFile> {
    let content = fs::read_to_string(path).ok()?;
    let status: StatusFile = serde_json::from_str(&content).ok()?;

    if !is_pid_alive(status.pid) {
        return None;
    }
    if status.updated_at < Utc::now() - STALE_AFTER {
        return None;
    }
    Some(status)
}

fn is_pid_alive(pid: u32) -> bool {
    let result = unsafe { libc::kill(pid as i32, 0) };
    if result == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

fn format_uptime(started_at: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(started_at);
    let total_minutes = duration.num_minutes();
    if total_minutes < 0 {
        return "just started".to_string();
    }

    let days = duration.num_days();
    let hours = duration.num_hours() % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn display_status(status: &StatusFile) {
    let uptime = format_uptime(status.started_at);
    let venues = status.config.scan_venues.join(", ");

    println!();
    println!("{} v{}", "arbiscan".bold(), env!("CARGO_PKG_VERSION").dimmed());
    output::field("status", format!("{} running (pid {})", "\u{25cf}".green(), status.pid));
    output::field("uptime", uptime);
    output::field("venues", venues);
    output::field("trade size", format!("${} USDT", status.config.trade_size_usdt));
    println!();
    output::field("universe", status.runtime.symbols_in_universe);
    output::field("last tick", format!("{} ms", status.runtime.last_tick_duration_ms));
    output::field(
        "today",
        format!(
            "{} ticks, {} pairs checked, {} opportunities",
            status.today.ticks_completed, status.today.pairs_checked, status.today.opportunities_published
        ),
    );
    println!();
}

fn display_not_running(status_path: &Path) {
    println!();
    println!("{} v{}", "arbiscan".bold(), env!("CARGO_PKG_VERSION").dimmed());
    output::field("status", format!("{} not running", "\u{25cb}".dimmed()));
    output::field("status file", status_path.display());
    println!();
    output::note("run `arbiscan run` to start scanning");
    println!();
}
