//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for pricing results that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_pricing::{CommissionSplit, PremiumBreakdown, TaxBreakdown};
use rust_decimal::Decimal;

/// Asserts that a Money value equals an AUD amount exactly
pub fn assert_aud(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.currency().code(),
        "AUD",
        "Expected an AUD amount, got {}",
        actual.currency()
    );
    assert_eq!(
        actual.amount(),
        expected,
        "Expected A$ {}, got A$ {}",
        expected,
        actual.amount()
    );
}

/// Asserts that a Money value is a whole number of cents
pub fn assert_whole_cents(money: &Money) {
    assert_eq!(
        money.amount(),
        money.amount().round_dp(2),
        "Expected whole cents, got {}",
        money.amount()
    );
}

/// Asserts that commission and the underwriter's share sum to the gross premium
pub fn assert_split_sums_to(split: &CommissionSplit, gross: &Money) {
    let sum = split.commission.amount() + split.net_to_underwriter.amount();
    assert_eq!(
        sum,
        gross.round_half_up().amount(),
        "Commission {} + net {} does not equal gross {}",
        split.commission.amount(),
        split.net_to_underwriter.amount(),
        gross.amount()
    );
}

/// Asserts that total payable is the sum of premium, GST and stamp duty
pub fn assert_total_payable_adds_up(taxes: &TaxBreakdown) {
    let sum = taxes.gross_premium.amount() + taxes.gst.amount() + taxes.stamp_duty.amount();
    assert_eq!(
        taxes.total_payable.amount(),
        sum,
        "Total payable {} is not premium {} + GST {} + duty {}",
        taxes.total_payable.amount(),
        taxes.gross_premium.amount(),
        taxes.gst.amount(),
        taxes.stamp_duty.amount()
    );
}

/// Asserts that every figure in a breakdown is non-negative whole cents
pub fn assert_breakdown_well_formed(breakdown: &PremiumBreakdown) {
    for (name, money) in [
        ("product_a", &breakdown.product_a),
        ("full_term_upgrade", &breakdown.full_term_upgrade),
        ("product_b", &breakdown.product_b),
        ("product_c", &breakdown.product_c),
        ("multi_child_discount", &breakdown.multi_child_discount),
        ("annual_total", &breakdown.annual_total),
        ("annual_with_discount", &breakdown.annual_with_discount),
        ("monthly_total", &breakdown.monthly_total),
        ("daily_equivalent", &breakdown.daily_equivalent),
        ("gross_premium", &breakdown.gross_premium),
    ] {
        assert!(!money.is_negative(), "{} is negative: {}", name, money.amount());
        assert_whole_cents(money);
    }
}
