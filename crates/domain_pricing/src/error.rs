//! Pricing domain errors
//!
//! This module defines all error types that can occur while loading rate
//! configuration or pricing a quote.

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the pricing domain
#[derive(Debug, Error)]
pub enum PricingError {
    /// Rate table or stamp duty table is malformed or out of range
    ///
    /// Fatal at startup: no calculation may be served until it is fixed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Per-call input is malformed (negative fee, no children, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Jurisdiction code has no stamp duty entry
    #[error("Unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),

    /// Money arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl PricingError {
    /// Creates a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        PricingError::Config(message.into())
    }

    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PricingError::Validation(message.into())
    }

    /// Creates an unknown jurisdiction error
    pub fn unknown_jurisdiction(code: impl Into<String>) -> Self {
        PricingError::UnknownJurisdiction(code.into())
    }

    /// Returns true if the caller can recover by correcting its input
    ///
    /// Overflow is only reachable from out-of-range amounts, so it counts as
    /// an input problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PricingError::Validation(_)
                | PricingError::UnknownJurisdiction(_)
                | PricingError::Money(MoneyError::Overflow)
        )
    }
}

impl From<config::ConfigError> for PricingError {
    fn from(err: config::ConfigError) -> Self {
        PricingError::Config(err.to_string())
    }
}
