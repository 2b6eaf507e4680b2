//! Integration tests for configuration loading (spec.md §6, §7): file <
//! env < CLI-flag precedence and startup validation, exercised against real
//! temp files via `tempfile` rather than the unit-level defaults test in
//! `app::config`.

use std::io::Write;
use std::sync::Mutex;

use arbiscan::app::Config;
use arbiscan::error::Error;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

/// `Config::load` reads process environment variables, which are global
/// state shared by every test in this binary; two tests in this file set
/// different keys, but a third loading a file that relies on *no* override
/// being present would be racy against them under cargo's default
/// multi-threaded test runner. Every test takes this lock first so the file
/// behaves as if run with `--test-threads=1`, without imposing that on the
/// rest of the suite.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").expect("create temp config file");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_values_from_toml_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let file = config_file(
        r#"
trade_size_usdt = 500
min_raw_spread_pct = 0.1
scan_interval_ms = 5000
scan_batch_size = 10
scan_venues = ["binance", "kucoin"]
"#,
    );

    let config = Config::load(file.path()).expect("valid config loads");
    assert_eq!(config.trade_size_usdt, dec!(500));
    assert_eq!(config.min_raw_spread_pct, dec!(0.1));
    assert_eq!(config.scan_interval_ms, 5000);
    assert_eq!(config.scan_batch_size, 10);
    assert_eq!(config.scan_venues.len(), 2);
}

#[test]
fn missing_file_falls_back_to_documented_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let config = Config::load("/nonexistent/arbiscan-integration-test.toml").expect("missing file is not an error");
    assert_eq!(config.trade_size_usdt, dec!(25));
    assert_eq!(config.scan_venues.len(), 6);
}

#[test]
fn unparseable_toml_is_a_fatal_config_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    let file = config_file("this is not valid [[[ toml");
    let result = Config::load(file.path());
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn unknown_venue_in_file_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    let file = config_file(r#"scan_venues = ["binance", "definitely-not-a-venue"]"#);
    let result = Config::load(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn env_override_takes_precedence_over_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let file = config_file("trade_size_usdt = 100\n");

    std::env::set_var("TRADE_SIZE_USDT", "777");
    let config = Config::load(file.path()).expect("valid config loads");
    std::env::remove_var("TRADE_SIZE_USDT");

    assert_eq!(config.trade_size_usdt, dec!(777));
}

#[test]
fn scan_venues_env_override_is_comma_separated() {
    let _guard = ENV_LOCK.lock().unwrap();
    let file = config_file("");
    std::env::set_var("SCAN_VENUES", "gate, bybit");
    let config = Config::load(file.path()).expect("valid config loads");
    std::env::remove_var("SCAN_VENUES");

    assert_eq!(config.scan_venues.len(), 2);
}
