//! School Fee Protection Pricing Domain
//!
//! This crate implements the premium calculation and insurance tax engine
//! for school fee protection cover. It is infrastructure-agnostic: every
//! calculator is a pure function of a validated, read-only rate table and
//! the caller's request.
//!
//! # Components
//!
//! - **Rate table**: product rates, loadings, discounts, GST, commission and
//!   stamp duty, validated once at load
//! - **Premium calculator**: gross premium and itemised breakdown
//! - **Insurance tax calculator**: GST, stamp duty and commission split
//! - **Pricing service**: both calculators in one call
//! - **Quote session**: caller-side state holder caching the latest pricing
//! - **Portfolio report**: GWP, commission and duty totals over past policies
//!
//! # Products
//!
//! ```text
//! A  Parent Continuity    fee-rated, minimum premium, optional full term loading
//! B  Student Continuity   fee-rated add-on
//! C  School Expenses      flat premium per child
//! D  Tiered cover levels  fixed premium per level (display only)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_pricing::{PricingService, QuoteRequest, RateTable, PaymentFrequency};
//!
//! let rates = RateTable::global()?;
//! let request = QuoteRequest::new(Money::aud(dec!(25000)), 2, PaymentFrequency::Annual)
//!     .with_jurisdiction("NSW");
//!
//! let pricing = PricingService::new(rates).price_quote(&request)?;
//! println!("{}", pricing.taxes.total_payable);
//! ```

pub mod error;
pub mod rates;
pub mod quote;
pub mod premium;
pub mod tax;
pub mod services;
pub mod session;
pub mod reporting;

pub use error::PricingError;
pub use rates::{RateConfig, RateSettings, RateTable, StampDutyEntry, StampDutyTable};
pub use quote::{Child, PaymentFrequency, ProductSelection, QuoteRequest};
pub use premium::{PremiumBreakdown, PremiumCalculator};
pub use tax::{CommissionSplit, InsuranceTaxCalculator, TaxBreakdown};
pub use services::{PricingService, QuotePricing};
pub use session::{QuoteOutcome, QuoteSession};
pub use reporting::{JurisdictionSummary, PolicyRecord, PortfolioReport, PremiumTotals};
