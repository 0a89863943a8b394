//! Quote session state
//!
//! A caller-side holder for a quote being edited field by field. It keeps
//! the current inputs and the latest derived pricing, and delegates every
//! calculation to [`PricingService`]. No pricing rule lives here.

use std::sync::Arc;

use core_kernel::Money;

use crate::error::PricingError;
use crate::quote::{Child, PaymentFrequency, ProductSelection, QuoteRequest};
use crate::rates::RateTable;
use crate::services::{PricingService, QuotePricing};

/// Result of the most recent recalculation
#[derive(Debug)]
pub enum QuoteOutcome {
    /// Nothing has been priced yet
    Empty,
    Priced(QuotePricing),
    Invalid(PricingError),
}

/// Quote wizard state with a cached pricing
#[derive(Debug)]
pub struct QuoteSession {
    rates: Arc<RateTable>,
    children: Vec<Child>,
    products: ProductSelection,
    payment_frequency: PaymentFrequency,
    jurisdiction: String,
    outcome: QuoteOutcome,
}

impl QuoteSession {
    /// Starts an empty session, monthly payment, no add-ons
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self {
            rates,
            children: Vec::new(),
            products: ProductSelection::base(),
            payment_frequency: PaymentFrequency::Monthly,
            jurisdiction: String::new(),
            outcome: QuoteOutcome::Empty,
        }
    }

    pub fn set_children(&mut self, children: Vec<Child>) -> &QuoteOutcome {
        self.children = children;
        self.refresh()
    }

    pub fn add_child(&mut self, child: Child) -> &QuoteOutcome {
        self.children.push(child);
        self.refresh()
    }

    /// Changes the annual school fee of the child at `index`
    ///
    /// An index with no child leaves the inputs unchanged and reports a
    /// validation error as the outcome.
    pub fn set_annual_fee(&mut self, index: usize, fee: Money) -> &QuoteOutcome {
        match self.children.get_mut(index) {
            Some(child) => {
                child.annual_fee = fee;
                self.refresh()
            }
            None => {
                self.outcome = QuoteOutcome::Invalid(PricingError::validation(format!(
                    "No child at position {}",
                    index
                )));
                &self.outcome
            }
        }
    }

    /// Removes a child by position; out of range is ignored
    pub fn remove_child(&mut self, index: usize) -> &QuoteOutcome {
        if index < self.children.len() {
            self.children.remove(index);
        }
        self.refresh()
    }

    pub fn set_products(&mut self, products: ProductSelection) -> &QuoteOutcome {
        self.products = products;
        self.refresh()
    }

    pub fn set_payment_frequency(&mut self, frequency: PaymentFrequency) -> &QuoteOutcome {
        self.payment_frequency = frequency;
        self.refresh()
    }

    pub fn set_jurisdiction(&mut self, jurisdiction: impl Into<String>) -> &QuoteOutcome {
        self.jurisdiction = jurisdiction.into();
        self.refresh()
    }

    /// The request the current inputs describe
    pub fn request(&self) -> Result<QuoteRequest, PricingError> {
        Ok(QuoteRequest::for_children(&self.children, self.products, self.payment_frequency)?
            .with_jurisdiction(self.jurisdiction.clone()))
    }

    pub fn outcome(&self) -> &QuoteOutcome {
        &self.outcome
    }

    /// Latest successful pricing, if the current inputs are valid
    pub fn pricing(&self) -> Option<&QuotePricing> {
        match &self.outcome {
            QuoteOutcome::Priced(pricing) => Some(pricing),
            _ => None,
        }
    }

    /// Why the current inputs cannot be priced, if they cannot
    pub fn error(&self) -> Option<&PricingError> {
        match &self.outcome {
            QuoteOutcome::Invalid(err) => Some(err),
            _ => None,
        }
    }

    fn refresh(&mut self) -> &QuoteOutcome {
        let service = PricingService::new(&self.rates);
        self.outcome = match self.request().and_then(|req| service.price_quote(&req)) {
            Ok(pricing) => QuoteOutcome::Priced(pricing),
            Err(err) => QuoteOutcome::Invalid(err),
        };
        &self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session() -> QuoteSession {
        QuoteSession::new(Arc::new(RateTable::standard().unwrap()))
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = session();
        assert!(matches!(session.outcome(), QuoteOutcome::Empty));
        assert!(session.pricing().is_none());
    }

    #[test]
    fn test_missing_jurisdiction_surfaces_error() {
        let mut session = session();
        session.add_child(Child::new("Ava", Money::aud(dec!(20000))));
        assert!(matches!(session.error(), Some(PricingError::UnknownJurisdiction(_))));

        session.set_jurisdiction("VIC");
        assert!(session.pricing().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_set_annual_fee_reprices_child() {
        let mut session = session();
        session.set_jurisdiction("NSW");
        session.add_child(Child::new("Ava", Money::aud(dec!(20000))));

        session.set_annual_fee(0, Money::aud(dec!(40000)));
        let gross = session.pricing().unwrap().premium.gross_premium;
        assert_eq!(gross.amount(), dec!(1000.00));

        let outcome = session.set_annual_fee(3, Money::aud(dec!(1)));
        assert!(matches!(outcome, QuoteOutcome::Invalid(PricingError::Validation(_))));
        assert_eq!(session.request().unwrap().annual_fee.amount(), dec!(40000));
    }
}
