//! Quote requests
//!
//! Caller-constructed inputs to the calculators. A request is built per
//! calculation and never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use crate::error::PricingError;

/// How the policyholder pays for the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    /// Twelve instalments, no payment discount
    Monthly,
    /// One up-front payment, attracts the annual payment discount
    Annual,
}

impl PaymentFrequency {
    /// Returns the number of payments per year
    pub fn payments_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Annual => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Annual => "annual",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "annual" => Ok(PaymentFrequency::Annual),
            other => Err(PricingError::validation(format!(
                "Unsupported payment frequency '{}': expected monthly or annual",
                other
            ))),
        }
    }
}

/// Optional add-ons on top of Parent Continuity cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSelection {
    /// Extend death/terminal illness cover to the full school term
    pub full_term_upgrade: bool,
    /// Student Continuity cover
    pub student_cover: bool,
    /// School Expenses cover
    pub expenses_cover: bool,
}

impl ProductSelection {
    /// Parent Continuity cover only
    pub fn base() -> Self {
        Self::default()
    }

    /// Every add-on selected
    pub fn all() -> Self {
        Self {
            full_term_upgrade: true,
            student_cover: true,
            expenses_cover: true,
        }
    }
}

/// A child enrolled at the school
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub name: String,
    pub annual_fee: Money,
}

impl Child {
    pub fn new(name: impl Into<String>, annual_fee: Money) -> Self {
        Self {
            name: name.into(),
            annual_fee,
        }
    }
}

/// Everything needed to price one household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Household total of annual school fees
    pub annual_fee: Money,
    pub child_count: u32,
    pub products: ProductSelection,
    pub payment_frequency: PaymentFrequency,
    /// State or territory code, only read by the tax step
    pub jurisdiction: String,
}

impl QuoteRequest {
    /// Creates a request for Parent Continuity cover only
    pub fn new(annual_fee: Money, child_count: u32, payment_frequency: PaymentFrequency) -> Self {
        Self {
            annual_fee,
            child_count,
            products: ProductSelection::base(),
            payment_frequency,
            jurisdiction: String::new(),
        }
    }

    /// Builds a request from a list of children
    ///
    /// The household fee is the sum of each child's annual fee and the
    /// child count is the length of the list.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if any child's fee is negative or
    /// fees are declared in different currencies.
    pub fn for_children(
        children: &[Child],
        products: ProductSelection,
        payment_frequency: PaymentFrequency,
    ) -> Result<Self, PricingError> {
        let currency = children
            .first()
            .map(|c| c.annual_fee.currency())
            .unwrap_or(Currency::AUD);
        let mut total = Money::zero(currency);
        for child in children {
            if child.annual_fee.is_negative() {
                return Err(PricingError::validation(format!(
                    "Annual fee for {} must not be negative",
                    child.name
                )));
            }
            total = total
                .checked_add(&child.annual_fee)
                .map_err(|e| PricingError::validation(e.to_string()))?;
        }

        let child_count = u32::try_from(children.len())
            .map_err(|_| PricingError::validation("Too many children on one quote"))?;

        Ok(Self {
            annual_fee: total,
            child_count,
            products,
            payment_frequency,
            jurisdiction: String::new(),
        })
    }

    pub fn with_products(mut self, products: ProductSelection) -> Self {
        self.products = products;
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    /// Checks the inputs every calculator relies on
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` for a negative fee, a fee not in
    /// AUD, or fewer than one child.
    pub fn validate(&self) -> Result<(), PricingError> {
        validate_inputs(self.annual_fee, self.child_count)
    }
}

pub(crate) fn validate_inputs(fee: Money, child_count: u32) -> Result<(), PricingError> {
    if fee.is_negative() {
        return Err(PricingError::validation(format!(
            "Annual fee must not be negative, got {}",
            fee.amount()
        )));
    }
    if fee.currency() != Currency::AUD {
        return Err(PricingError::validation(format!(
            "Annual fee must be in AUD, got {}",
            fee.currency()
        )));
    }
    if child_count < 1 {
        return Err(PricingError::validation("At least one child must be covered"));
    }
    Ok(())
}

/// Rejects negative amounts and non-AUD currencies
pub(crate) fn validate_premium(premium: Money) -> Result<(), PricingError> {
    if premium.is_negative() {
        return Err(PricingError::validation(format!(
            "Gross premium must not be negative, got {}",
            premium.amount()
        )));
    }
    if premium.currency() != Currency::AUD {
        return Err(PricingError::validation(format!(
            "Gross premium must be in AUD, got {}",
            premium.currency()
        )));
    }
    Ok(())
}
