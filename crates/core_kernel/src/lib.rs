//! Core Kernel - Foundational value types for the pricing engine
//!
//! This crate provides the numeric building blocks used by the pricing domain:
//! - Money with precise decimal arithmetic and minor-unit rounding
//! - Rate for fractional factors (discounts, loadings, tax rates)

pub mod money;

pub use money::{Money, Currency, MoneyError, Rate};
