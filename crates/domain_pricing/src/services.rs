//! Pricing domain services
//!
//! This module orchestrates the premium and tax calculators into a single
//! full pricing of a quote request.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PricingError;
use crate::premium::{PremiumBreakdown, PremiumCalculator};
use crate::quote::QuoteRequest;
use crate::rates::RateTable;
use crate::tax::{CommissionSplit, InsuranceTaxCalculator, TaxBreakdown};

/// Complete pricing of one quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePricing {
    pub premium: PremiumBreakdown,
    pub taxes: TaxBreakdown,
    pub commission: CommissionSplit,
}

/// Service for pricing quote requests end to end
///
/// Runs the premium breakdown, takes the gross premium for the chosen
/// payment frequency, then applies taxes and the commission split.
#[derive(Debug, Clone, Copy)]
pub struct PricingService<'a> {
    premiums: PremiumCalculator<'a>,
    taxes: InsuranceTaxCalculator<'a>,
}

impl<'a> PricingService<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self {
            premiums: PremiumCalculator::new(rates),
            taxes: InsuranceTaxCalculator::new(rates),
        }
    }

    /// Prices a quote request
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` for malformed input and
    /// `PricingError::UnknownJurisdiction` if the request's jurisdiction has
    /// no stamp duty entry.
    pub fn price_quote(&self, request: &QuoteRequest) -> Result<QuotePricing, PricingError> {
        let premium = self.premiums.calculate_premium_breakdown(request)?;
        let taxes = self
            .taxes
            .calculate_insurance_taxes(premium.gross_premium, &request.jurisdiction)?;
        let commission = self.taxes.calculate_commission(premium.gross_premium)?;

        info!(
            jurisdiction = %taxes.jurisdiction,
            child_count = request.child_count,
            gross = %premium.gross_premium.amount(),
            total_payable = %taxes.total_payable.amount(),
            "Quote priced"
        );

        Ok(QuotePricing {
            premium,
            taxes,
            commission,
        })
    }

    pub fn premiums(&self) -> &PremiumCalculator<'a> {
        &self.premiums
    }

    pub fn taxes(&self) -> &InsuranceTaxCalculator<'a> {
        &self.taxes
    }
}
