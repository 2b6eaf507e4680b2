use thiserror::Error;

/// Fatal, crate-level errors. Everything transient or per-pair is modeled as
/// a typed outcome (see `core::exchange::AdapterFail`, `core::fetch::PairFetchError`)
/// that never surfaces here -- this enum only covers what aborts the process.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no venues configured: the venue registry must be non-empty")]
    EmptyVenueRegistry,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
