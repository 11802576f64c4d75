//! Error types for sushi-desk

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Invalid zone table: {0}")]
    InvalidZoneTable(String),

    #[error("Invalid shift capacity: {0}")]
    InvalidCapacity(String),
}

/// Persistence-related errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflicting state: {0}")]
    Conflict(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Store data corrupted: {0}")]
    Corrupted(String),
}

/// Input validation errors raised by workflows
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid RUT: {0}")]
    InvalidRut(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(String),

    #[error("Menu item not available: {0}")]
    UnavailableMenuItem(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Import error: {0}")]
    Import(String),
}

pub type Result<T> = std::result::Result<T, Error>;
