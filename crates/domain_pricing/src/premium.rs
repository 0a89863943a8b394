//! Premium calculation
//!
//! This module turns a household's school fees, selected add-ons and child
//! count into a gross annual premium.
//!
//! # Order of operations
//!
//! ```text
//! base          = max(fee * product_a.rate, product_a.minimum_premium)
//! full term     = base * (1 + full_term_loading)            if upgraded
//! student cover = + fee * product_b.rate                    if selected
//! expenses      = + product_c.flat_rate * children          if selected
//! multi child   = running total * (1 - multi_child)         if children > 1
//! annual        = running total * (1 - annual_payment)      if paid annually
//! round half-up to cents, once
//! ```
//!
//! The multi-child discount is a blanket household discount on the running
//! total including add-ons, not a discount on the base premium alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Money;
use crate::error::PricingError;
use crate::quote::{validate_inputs, validate_premium, PaymentFrequency, ProductSelection, QuoteRequest};
use crate::rates::RateTable;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Itemised premium for one household
///
/// Line items are shown before the household discount. Every figure is
/// rounded independently from unrounded intermediates, so line items may
/// not sum to `annual_total` to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    /// Parent Continuity premium after the minimum premium floor
    pub product_a: Money,
    /// Amount the full term upgrade adds to `product_a`
    pub full_term_upgrade: Money,
    /// Student Continuity premium
    pub product_b: Money,
    /// School Expenses premium
    pub product_c: Money,
    /// Amount removed by the multi-child discount
    pub multi_child_discount: Money,
    /// Annual premium after the multi-child discount
    pub annual_total: Money,
    /// `annual_total` less the annual payment discount
    pub annual_with_discount: Money,
    /// `annual_total` spread over twelve months
    pub monthly_total: Money,
    /// `annual_total` per day of the year
    pub daily_equivalent: Money,
    pub payment_frequency: PaymentFrequency,
    /// Premium for the year at the chosen payment frequency
    pub gross_premium: Money,
}

impl PremiumBreakdown {
    /// Amount collected per payment at the chosen frequency
    pub fn payable_per_instalment(&self) -> Money {
        match self.payment_frequency {
            PaymentFrequency::Monthly => self.monthly_total,
            PaymentFrequency::Annual => self.annual_with_discount,
        }
    }
}

/// Unrounded running figures
struct PremiumLines {
    product_a: Money,
    full_term_upgrade: Money,
    product_b: Money,
    product_c: Money,
    multi_child_discount: Money,
    annual_total: Money,
}

/// Stateless premium calculator over a loaded rate table
#[derive(Debug, Clone, Copy)]
pub struct PremiumCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> PremiumCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Calculates the gross annual premium for a household
    ///
    /// # Arguments
    ///
    /// * `fee` - Household annual school fee in AUD
    /// * `child_count` - Number of children covered
    /// * `products` - Selected add-ons
    /// * `payment_frequency` - Monthly or annual payment
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if the fee is negative or not in
    /// AUD, or fewer than one child is covered. Returns
    /// `PricingError::Money` with `MoneyError::Overflow` if the premium
    /// exceeds the representable decimal range.
    pub fn calculate_gross_premium(
        &self,
        fee: Money,
        child_count: u32,
        products: ProductSelection,
        payment_frequency: PaymentFrequency,
    ) -> Result<Money, PricingError> {
        validate_inputs(fee, child_count)?;
        let lines = self.price_lines(fee, child_count, products)?;
        let gross = self
            .apply_payment_discount(lines.annual_total, payment_frequency)?
            .round_half_up();

        debug!(
            fee = %fee.amount(),
            child_count,
            frequency = %payment_frequency,
            gross = %gross.amount(),
            "Gross premium calculated"
        );

        Ok(gross)
    }

    /// Calculates the itemised premium for a quote request
    ///
    /// # Errors
    ///
    /// Same as [`PremiumCalculator::calculate_gross_premium`].
    pub fn calculate_premium_breakdown(
        &self,
        request: &QuoteRequest,
    ) -> Result<PremiumBreakdown, PricingError> {
        request.validate()?;
        let lines = self.price_lines(request.annual_fee, request.child_count, request.products)?;

        let annual_payment = self.rates.rates().discounts.annual_payment;
        let annual_with_discount = lines.annual_total.checked_multiply(annual_payment.discount_factor())?;
        let monthly_total = lines.annual_total.divide(MONTHS_PER_YEAR)?;
        let daily_equivalent = lines.annual_total.divide(DAYS_PER_YEAR)?;
        let gross = self.apply_payment_discount(lines.annual_total, request.payment_frequency)?;

        let breakdown = PremiumBreakdown {
            product_a: lines.product_a.round_half_up(),
            full_term_upgrade: lines.full_term_upgrade.round_half_up(),
            product_b: lines.product_b.round_half_up(),
            product_c: lines.product_c.round_half_up(),
            multi_child_discount: lines.multi_child_discount.round_half_up(),
            annual_total: lines.annual_total.round_half_up(),
            annual_with_discount: annual_with_discount.round_half_up(),
            monthly_total: monthly_total.round_half_up(),
            daily_equivalent: daily_equivalent.round_half_up(),
            payment_frequency: request.payment_frequency,
            gross_premium: gross.round_half_up(),
        };

        debug!(
            annual_total = %breakdown.annual_total.amount(),
            monthly_total = %breakdown.monthly_total.amount(),
            frequency = %breakdown.payment_frequency,
            "Premium breakdown calculated"
        );

        Ok(breakdown)
    }

    /// Premium for the next policy year given this year's premium
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if the previous premium is negative,
    /// or `PricingError::Money` if the loaded premium overflows.
    pub fn calculate_renewal_premium(&self, previous: Money) -> Result<Money, PricingError> {
        validate_premium(previous)?;
        let loading = self.rates.rates().renewal.annual_loading;
        Ok(previous.checked_multiply(loading.loading_factor())?.round_half_up())
    }

    fn price_lines(
        &self,
        fee: Money,
        child_count: u32,
        products: ProductSelection,
    ) -> Result<PremiumLines, PricingError> {
        let rates = self.rates.rates();
        let a = &rates.product_a;

        let rated = a.rate.apply(&fee)?;
        let base = rated.max(&Money::aud(a.minimum_premium))?;

        let full_term_upgrade = if products.full_term_upgrade {
            a.full_term_loading.apply(&base)?
        } else {
            Money::aud(Decimal::ZERO)
        };
        let product_a = base;

        let product_b = if products.student_cover {
            rates.product_b.rate.apply(&fee)?
        } else {
            Money::aud(Decimal::ZERO)
        };

        let product_c = if products.expenses_cover {
            Money::aud(rates.product_c.flat_rate).checked_multiply(Decimal::from(child_count))?
        } else {
            Money::aud(Decimal::ZERO)
        };

        let subtotal = product_a
            .checked_add(&full_term_upgrade)?
            .checked_add(&product_b)?
            .checked_add(&product_c)?;

        let multi_child_discount = if child_count > 1 {
            rates.discounts.multi_child.apply(&subtotal)?
        } else {
            Money::aud(Decimal::ZERO)
        };
        let annual_total = subtotal.checked_sub(&multi_child_discount)?;

        Ok(PremiumLines {
            product_a,
            full_term_upgrade,
            product_b,
            product_c,
            multi_child_discount,
            annual_total,
        })
    }

    fn apply_payment_discount(
        &self,
        annual_total: Money,
        frequency: PaymentFrequency,
    ) -> Result<Money, PricingError> {
        match frequency {
            PaymentFrequency::Annual => {
                let factor = self.rates.rates().discounts.annual_payment.discount_factor();
                Ok(annual_total.checked_multiply(factor)?)
            }
            PaymentFrequency::Monthly => Ok(annual_total),
        }
    }
}
