//! Insurance taxes and commission
//!
//! GST, state stamp duty and the commission split are all computed from a
//! gross premium, downstream of and independent from premium calculation.
//!
//! Stamp duty is levied on the GST-inclusive premium:
//!
//! ```text
//! gst           = gross * gst_rate
//! stamp_duty    = (gross + gst) * duty_rate(jurisdiction)
//! total_payable = gross + gst + stamp_duty
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Money, Rate};
use crate::error::PricingError;
use crate::quote::validate_premium;
use crate::rates::RateTable;

/// Taxes payable on one premium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross_premium: Money,
    /// Normalised jurisdiction code the duty rate was read for
    pub jurisdiction: String,
    pub gst: Money,
    pub stamp_duty: Money,
    pub stamp_duty_rate: Rate,
    pub total_payable: Money,
}

/// Split of a gross premium between distributor and underwriter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub commission_rate: Rate,
    pub commission: Money,
    pub net_to_underwriter: Money,
}

/// Stateless tax and commission calculator over a loaded rate table
#[derive(Debug, Clone, Copy)]
pub struct InsuranceTaxCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> InsuranceTaxCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Calculates GST, stamp duty and total payable
    ///
    /// GST is rounded to the cent first; duty is then charged on the gross
    /// premium plus that GST and rounded in turn, so `total_payable` is the
    /// exact sum of the three printed figures.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` for a negative premium,
    /// `PricingError::UnknownJurisdiction` for an unmapped code, and
    /// `PricingError::Money` when the taxed total overflows.
    pub fn calculate_insurance_taxes(
        &self,
        gross_premium: Money,
        jurisdiction: &str,
    ) -> Result<TaxBreakdown, PricingError> {
        validate_premium(gross_premium)?;
        let gross = gross_premium.round_half_up();

        let gst = self.rates.rates().taxes.gst_rate.apply(&gross)?.round_half_up();
        let duty = self.rates.stamp_duty(jurisdiction)?;

        let dutiable = gross.checked_add(&gst)?;
        let stamp_duty = duty.rate.apply(&dutiable)?.round_half_up();
        let total_payable = dutiable.checked_add(&stamp_duty)?;

        let code = jurisdiction.trim().to_ascii_uppercase();
        debug!(
            jurisdiction = %code,
            gross = %gross.amount(),
            gst = %gst.amount(),
            stamp_duty = %stamp_duty.amount(),
            "Insurance taxes calculated"
        );

        Ok(TaxBreakdown {
            gross_premium: gross,
            jurisdiction: code,
            gst,
            stamp_duty,
            stamp_duty_rate: duty.rate,
            total_payable,
        })
    }

    /// Splits a gross premium into commission and the underwriter's share
    ///
    /// Commission is rounded half-up to the cent and the underwriter takes
    /// the exact remainder, so the two always sum to the gross premium.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` for a negative premium.
    pub fn calculate_commission(&self, gross_premium: Money) -> Result<CommissionSplit, PricingError> {
        validate_premium(gross_premium)?;
        let commission_rate = self.rates.rates().taxes.commission_rate;
        let (commission, net_to_underwriter) = gross_premium.split_at(commission_rate)?;

        Ok(CommissionSplit {
            commission_rate,
            commission,
            net_to_underwriter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stamp_duty_on_gst_inclusive_premium() {
        let rates = RateTable::standard().unwrap();
        let calc = InsuranceTaxCalculator::new(&rates);

        // NSW duty is 9%: (1000 + 100) * 0.09 = 99
        let taxes = calc.calculate_insurance_taxes(Money::aud(dec!(1000)), "NSW").unwrap();
        assert_eq!(taxes.gst.amount(), dec!(100.00));
        assert_eq!(taxes.stamp_duty.amount(), dec!(99.00));
        assert_eq!(taxes.total_payable.amount(), dec!(1199.00));
    }

    #[test]
    fn test_unknown_jurisdiction() {
        let rates = RateTable::standard().unwrap();
        let calc = InsuranceTaxCalculator::new(&rates);
        let result = calc.calculate_insurance_taxes(Money::aud(dec!(1000)), "ZZ");
        assert!(matches!(result, Err(PricingError::UnknownJurisdiction(ref code)) if code == "ZZ"));
    }

    #[test]
    fn test_commission_split() {
        let rates = RateTable::standard().unwrap();
        let calc = InsuranceTaxCalculator::new(&rates);
        let split = calc.calculate_commission(Money::aud(dec!(787.50))).unwrap();
        assert_eq!(split.commission.amount(), dec!(275.63));
        assert_eq!(split.net_to_underwriter.amount(), dec!(511.87));
    }
}
