//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating pricing inputs that satisfy
//! the engine's preconditions.

use core_kernel::Money;
use domain_pricing::rates::REQUIRED_JURISDICTIONS;
use domain_pricing::{PaymentFrequency, ProductSelection, QuoteRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for annual school fees from A$0 to A$100,000 in whole cents
pub fn fee_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|cents| Money::aud(Decimal::new(cents, 2)))
}

/// Strategy for gross premiums from A$0 to A$50,000 in whole cents
pub fn gross_premium_strategy() -> impl Strategy<Value = Money> {
    (0i64..5_000_000i64).prop_map(|cents| Money::aud(Decimal::new(cents, 2)))
}

/// Strategy for household sizes
pub fn child_count_strategy() -> impl Strategy<Value = u32> {
    1u32..8u32
}

/// Strategy for any combination of add-ons
pub fn product_selection_strategy() -> impl Strategy<Value = ProductSelection> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(full_term_upgrade, student_cover, expenses_cover)| {
        ProductSelection {
            full_term_upgrade,
            student_cover,
            expenses_cover,
        }
    })
}

pub fn frequency_strategy() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Monthly),
        Just(PaymentFrequency::Annual),
    ]
}

/// Strategy for every jurisdiction the standard rates cover
pub fn jurisdiction_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(REQUIRED_JURISDICTIONS.to_vec())
}

/// Strategy for fractional rates from 0 to 1 in basis points, edges included
pub fn fraction_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::ONE),
        (0i64..=10_000i64).prop_map(|bps| Decimal::new(bps, 4)),
    ]
}

/// Strategy for complete, valid quote requests
pub fn quote_request_strategy() -> impl Strategy<Value = QuoteRequest> {
    (
        fee_strategy(),
        child_count_strategy(),
        product_selection_strategy(),
        frequency_strategy(),
        jurisdiction_strategy(),
    )
        .prop_map(|(fee, children, products, frequency, jurisdiction)| {
            QuoteRequest::new(fee, children, frequency)
                .with_products(products)
                .with_jurisdiction(jurisdiction)
        })
}
