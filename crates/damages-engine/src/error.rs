//! Error types for damages-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DamagesError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Cannot solve for rate: {0}")]
    DegenerateSolve(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown rate preset: {0}")]
    UnknownPreset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DamagesError>;
