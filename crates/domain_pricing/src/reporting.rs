//! Portfolio reporting
//!
//! Aggregates historical policy records into gross written premium,
//! commission, GST and stamp duty totals for the admin financial views.
//!
//! Each jurisdiction row carries an `effective_duty_rate` derived after the
//! fact as collected duty over GST-inclusive premium. It is for display
//! only; the tax calculator always reads the configured rate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Money, Rate};
use crate::error::PricingError;
use crate::tax::InsuranceTaxCalculator;

/// A written policy as held by the caller's records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy_number: String,
    pub jurisdiction: String,
    pub gross_premium: Money,
}

/// Running totals for one group of policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumTotals {
    pub policy_count: u32,
    pub gross_written_premium: Money,
    pub gst: Money,
    pub stamp_duty: Money,
    pub total_payable: Money,
    pub commission: Money,
    pub net_to_underwriter: Money,
}

impl Default for PremiumTotals {
    fn default() -> Self {
        Self {
            policy_count: 0,
            gross_written_premium: Money::aud(Decimal::ZERO),
            gst: Money::aud(Decimal::ZERO),
            stamp_duty: Money::aud(Decimal::ZERO),
            total_payable: Money::aud(Decimal::ZERO),
            commission: Money::aud(Decimal::ZERO),
            net_to_underwriter: Money::aud(Decimal::ZERO),
        }
    }
}

/// Totals for one state or territory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    pub jurisdiction: String,
    pub totals: PremiumTotals,
    /// Collected duty over GST-inclusive premium, `None` when nothing was written
    pub effective_duty_rate: Option<Rate>,
}

/// Portfolio-wide totals plus a row per jurisdiction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub totals: PremiumTotals,
    pub by_jurisdiction: Vec<JurisdictionSummary>,
}

impl PortfolioReport {
    /// Builds the report by re-running taxes and commission on every record
    ///
    /// # Errors
    ///
    /// Fails on the first record with a negative premium or an unknown
    /// jurisdiction, naming the policy.
    pub fn from_records(
        records: &[PolicyRecord],
        calculator: &InsuranceTaxCalculator<'_>,
    ) -> Result<Self, PricingError> {
        let mut totals = PremiumTotals::default();
        let mut groups: BTreeMap<String, PremiumTotals> = BTreeMap::new();

        for record in records {
            let taxes = calculator
                .calculate_insurance_taxes(record.gross_premium, &record.jurisdiction)
                .map_err(|e| with_policy(e, &record.policy_number))?;
            let split = calculator
                .calculate_commission(record.gross_premium)
                .map_err(|e| with_policy(e, &record.policy_number))?;

            for group in [&mut totals, groups.entry(taxes.jurisdiction.clone()).or_default()] {
                group.policy_count += 1;
                group.gross_written_premium = group.gross_written_premium.checked_add(&taxes.gross_premium)?;
                group.gst = group.gst.checked_add(&taxes.gst)?;
                group.stamp_duty = group.stamp_duty.checked_add(&taxes.stamp_duty)?;
                group.total_payable = group.total_payable.checked_add(&taxes.total_payable)?;
                group.commission = group.commission.checked_add(&split.commission)?;
                group.net_to_underwriter = group.net_to_underwriter.checked_add(&split.net_to_underwriter)?;
            }
        }

        let by_jurisdiction = groups
            .into_iter()
            .map(|(jurisdiction, totals)| JurisdictionSummary {
                effective_duty_rate: effective_duty_rate(&totals),
                jurisdiction,
                totals,
            })
            .collect::<Vec<_>>();

        debug!(
            policies = totals.policy_count,
            jurisdictions = by_jurisdiction.len(),
            gwp = %totals.gross_written_premium.amount(),
            "Portfolio report built"
        );

        Ok(Self {
            totals,
            by_jurisdiction,
        })
    }

    pub fn jurisdiction(&self, code: &str) -> Option<&JurisdictionSummary> {
        let code = code.trim().to_ascii_uppercase();
        self.by_jurisdiction.iter().find(|row| row.jurisdiction == code)
    }
}

fn effective_duty_rate(totals: &PremiumTotals) -> Option<Rate> {
    let base = totals.gross_written_premium.checked_add(&totals.gst).ok()?;
    let rate = totals.stamp_duty.amount().checked_div(base.amount())?;
    Some(Rate::new(rate.round_dp(4)))
}

fn with_policy(err: PricingError, policy_number: &str) -> PricingError {
    match err {
        PricingError::Validation(msg) => {
            PricingError::Validation(format!("policy {}: {}", policy_number, msg))
        }
        other => other,
    }
}
