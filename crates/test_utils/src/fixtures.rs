//! Pre-built Test Fixtures
//!
//! Provides ready-to-use rate tables and amounts for pricing tests.
//! These fixtures are designed to be consistent and predictable.

use core_kernel::{Money, Rate};
use domain_pricing::{RateSettings, RateTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for rate tables
pub struct RateFixtures;

impl RateFixtures {
    /// The standard compiled-in rate table
    pub fn standard() -> RateTable {
        RateTable::standard().expect("Standard rates must load")
    }

    /// Standard settings with an adjustment applied before validation
    pub fn with(adjust: impl FnOnce(&mut RateSettings)) -> RateTable {
        let mut settings = RateSettings::standard();
        adjust(&mut settings);
        RateTable::load(settings).expect("Adjusted rates must load")
    }

    /// Standard table with a different commission rate
    pub fn with_commission(rate: Decimal) -> RateTable {
        Self::with(|s| s.rates.taxes.commission_rate = Rate::new(rate))
    }

    /// Standard table where one jurisdiction levies the given duty rate
    pub fn with_stamp_duty(code: &str, rate: Decimal) -> RateTable {
        let code = code.to_string();
        Self::with(move |s| {
            let mut entry = s
                .stamp_duty
                .get(&code)
                .cloned()
                .expect("Jurisdiction must exist in standard rates");
            entry.rate = Rate::new(rate);
            s.stamp_duty.insert(&code, entry);
        })
    }
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A low fee where the minimum premium applies
    pub fn low_fee() -> Money {
        Money::aud(dec!(1000))
    }

    /// A typical single-child private school fee
    pub fn typical_fee() -> Money {
        Money::aud(dec!(25000))
    }

    /// A high fee where the rated premium exceeds the minimum
    pub fn high_fee() -> Money {
        Money::aud(dec!(40000))
    }

    /// A round gross premium for tax tests
    pub fn gross_premium() -> Money {
        Money::aud(dec!(1000))
    }
}
