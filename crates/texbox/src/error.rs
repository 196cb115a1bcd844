//! Error types for the texbox crate

use thiserror::Error;

/// Errors that can occur while configuring fonts or constructing atoms
#[derive(Error, Debug)]
pub enum MathError {
    /// Malformed or inconsistent font, glue or symbol tables
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error decoding a JSON configuration document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No symbol with this name is known to the font
    #[error("Unknown symbol: {0}")]
    SymbolNotFound(String),

    /// No text style with this name is known to the font
    #[error("Unknown text style: {0}")]
    TextStyleNotFound(String),

    /// A spacing unit name that does not map to a unit
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// A symbol used in a position that requires a different kind of symbol
    #[error("Symbol '{name}' cannot be used as {expected}")]
    InvalidSymbolType { name: String, expected: &'static str },

    /// A formula or row without any atoms where one is required
    #[error("Empty formula")]
    EmptyFormula,
}

/// Result type for texbox operations
pub type MathResult<T> = Result<T, MathError>;
