//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::Money;
use domain_pricing::{PaymentFrequency, PolicyRecord, ProductSelection, QuoteRequest};
use rust_decimal::Decimal;

use crate::fixtures::MoneyFixtures;

/// Builder for quote requests
///
/// Defaults to one child on the typical fee, Parent Continuity only,
/// monthly payment, in NSW.
pub struct QuoteRequestBuilder {
    annual_fee: Money,
    child_count: u32,
    products: ProductSelection,
    payment_frequency: PaymentFrequency,
    jurisdiction: String,
}

impl Default for QuoteRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteRequestBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            annual_fee: MoneyFixtures::typical_fee(),
            child_count: 1,
            products: ProductSelection::base(),
            payment_frequency: PaymentFrequency::Monthly,
            jurisdiction: "NSW".to_string(),
        }
    }

    /// Sets the household annual fee in AUD
    pub fn fee(mut self, amount: Decimal) -> Self {
        self.annual_fee = Money::aud(amount);
        self
    }

    pub fn children(mut self, count: u32) -> Self {
        self.child_count = count;
        self
    }

    pub fn full_term_upgrade(mut self) -> Self {
        self.products.full_term_upgrade = true;
        self
    }

    pub fn student_cover(mut self) -> Self {
        self.products.student_cover = true;
        self
    }

    pub fn expenses_cover(mut self) -> Self {
        self.products.expenses_cover = true;
        self
    }

    pub fn products(mut self, products: ProductSelection) -> Self {
        self.products = products;
        self
    }

    pub fn annual(mut self) -> Self {
        self.payment_frequency = PaymentFrequency::Annual;
        self
    }

    pub fn monthly(mut self) -> Self {
        self.payment_frequency = PaymentFrequency::Monthly;
        self
    }

    pub fn jurisdiction(mut self, code: impl Into<String>) -> Self {
        self.jurisdiction = code.into();
        self
    }

    /// Builds the request
    pub fn build(self) -> QuoteRequest {
        QuoteRequest::new(self.annual_fee, self.child_count, self.payment_frequency)
            .with_products(self.products)
            .with_jurisdiction(self.jurisdiction)
    }
}

/// Builder for historical policy records
pub struct PolicyRecordBuilder {
    sequence: u32,
    jurisdiction: String,
    gross_premium: Money,
}

impl Default for PolicyRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRecordBuilder {
    pub fn new() -> Self {
        Self {
            sequence: 1,
            jurisdiction: "NSW".to_string(),
            gross_premium: MoneyFixtures::gross_premium(),
        }
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn jurisdiction(mut self, code: impl Into<String>) -> Self {
        self.jurisdiction = code.into();
        self
    }

    pub fn premium(mut self, amount: Decimal) -> Self {
        self.gross_premium = Money::aud(amount);
        self
    }

    pub fn build(self) -> PolicyRecord {
        PolicyRecord {
            policy_number: format!("SFP-{:06}", self.sequence),
            jurisdiction: self.jurisdiction,
            gross_premium: self.gross_premium,
        }
    }
}
