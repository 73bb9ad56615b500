//! Error types for the core library
//!
//! This module defines the errors surfaced while generating forecasts.
//! Store operations never fail; an unknown or expired session simply
//! behaves as a fresh empty one.

use thiserror::Error;

/// Errors produced while generating forecasts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Not enough sales history to fit a model
    #[error("not enough historical data to generate forecast: have {actual} sale(s), need at least {required}")]
    InsufficientHistory { required: usize, actual: usize },

    /// A zero-month horizon was requested
    #[error("forecast horizon must span at least one month")]
    InvalidHorizon,

    /// A projected month falls outside the representable calendar range
    #[error("forecast dates exceed the supported calendar range")]
    DateOutOfRange,
}

/// Type alias for Result with ForecastError
pub type ForecastResult<T> = Result<T, ForecastError>;
