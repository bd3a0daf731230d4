use thiserror::Error;

/// Failures that can only come from a bad setup, reported before any
/// chunk is streamed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unload radius {unload} is smaller than load radius {load}")]
    UnloadInsideLoad { load: i32, unload: i32 },

    #[error("{name} must not be negative (got {value})")]
    NegativeRadius { name: &'static str, value: i32 },

    #[error("{0} must be at least 1")]
    ZeroBudget(&'static str),

    #[error("worker pool needs at least one thread")]
    ZeroWorkers,

    #[error("invalid noise setting: {0}")]
    InvalidNoise(&'static str),

    #[error("base height {0} is outside the chunk")]
    InvalidBaseHeight(i32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}
