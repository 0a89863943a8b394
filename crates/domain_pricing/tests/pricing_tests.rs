//! End-to-end Pricing Tests
//!
//! These tests verify workflows that run the premium and tax calculators
//! together: full quote pricing, the quote session state holder, and
//! portfolio reporting, plus properties over generated quotes.

use std::sync::Arc;

use core_kernel::Money;
use domain_pricing::{
    Child, PaymentFrequency, PortfolioReport, PremiumCalculator, PricingError, PricingService,
    ProductSelection, QuoteOutcome, QuoteSession,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;
use test_utils::{
    assert_aud, assert_breakdown_well_formed, assert_split_sums_to, assert_total_payable_adds_up,
    quote_request_strategy, PolicyRecordBuilder, QuoteRequestBuilder, RateFixtures,
};

mod quote_pricing {
    use super::*;

    /// Two children, student cover, monthly, NSW
    #[test]
    fn test_price_quote_end_to_end() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let request = QuoteRequestBuilder::new()
            .children(2)
            .student_cover()
            .jurisdiction("NSW")
            .build();

        let pricing = service.price_quote(&request).unwrap();

        assert_aud(&pricing.premium.gross_premium, dec!(787.50));
        assert_aud(&pricing.taxes.gst, dec!(78.75));
        // (787.50 + 78.75) * 0.09 = 77.9625
        assert_aud(&pricing.taxes.stamp_duty, dec!(77.96));
        assert_aud(&pricing.taxes.total_payable, dec!(944.21));
        assert_aud(&pricing.commission.commission, dec!(275.63));
        assert_aud(&pricing.commission.net_to_underwriter, dec!(511.87));
    }

    /// Taxes are charged on the discounted annual premium when paying annually
    #[test]
    fn test_annual_quote_taxes_discounted_premium() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let request = QuoteRequestBuilder::new()
            .fee(dec!(40000))
            .annual()
            .jurisdiction("ACT")
            .build();

        let pricing = service.price_quote(&request).unwrap();

        assert_aud(&pricing.premium.gross_premium, dec!(950.00));
        assert_aud(&pricing.taxes.gross_premium, dec!(950.00));
        assert_aud(&pricing.taxes.total_payable, dec!(1045.00));
    }

    #[test]
    fn test_unknown_jurisdiction_fails_quote() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let request = QuoteRequestBuilder::new().jurisdiction("ZZ").build();

        assert!(matches!(
            service.price_quote(&request),
            Err(PricingError::UnknownJurisdiction(_))
        ));
    }

    #[test]
    fn test_validation_checked_before_jurisdiction() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let request = QuoteRequestBuilder::new().fee(dec!(-1)).jurisdiction("ZZ").build();

        assert!(matches!(
            service.price_quote(&request),
            Err(PricingError::Validation(_))
        ));
    }
}

mod session {
    use super::*;

    fn new_session() -> QuoteSession {
        QuoteSession::new(Arc::new(RateFixtures::standard()))
    }

    #[test]
    fn test_session_reprices_on_every_change() {
        let mut session = new_session();
        session.set_jurisdiction("NSW");
        session.add_child(Child::new("Ava", Money::aud(dec!(12500))));

        let single = session.pricing().unwrap().premium.gross_premium;
        assert_aud(&single, dec!(312.50));

        session.add_child(Child::new("Noah", Money::aud(dec!(12500))));
        session.set_products(ProductSelection {
            student_cover: true,
            ..ProductSelection::base()
        });
        assert_aud(&session.pricing().unwrap().premium.gross_premium, dec!(787.50));

        session.set_payment_frequency(PaymentFrequency::Annual);
        assert_aud(&session.pricing().unwrap().premium.gross_premium, dec!(748.13));
    }

    #[test]
    fn test_session_reports_validation_errors() {
        let mut session = new_session();
        session.set_jurisdiction("VIC");

        let outcome = session.set_children(Vec::new());
        assert!(matches!(outcome, QuoteOutcome::Invalid(PricingError::Validation(_))));

        session.add_child(Child::new("Ava", Money::aud(dec!(-5))));
        assert!(matches!(session.error(), Some(PricingError::Validation(_))));
        assert!(session.pricing().is_none());

        session.remove_child(0);
        session.add_child(Child::new("Ava", Money::aud(dec!(20000))));
        assert!(session.pricing().is_some());
    }

    #[test]
    fn test_session_fee_edit_matches_pure_calculator() {
        let rates = Arc::new(RateFixtures::standard());
        let mut session = QuoteSession::new(Arc::clone(&rates));
        session.set_jurisdiction("SA");
        session.set_children(vec![
            Child::new("Ava", Money::aud(dec!(10000))),
            Child::new("Noah", Money::aud(dec!(15000))),
        ]);

        // Household fee moves from 25000 to 30000
        session.set_annual_fee(1, Money::aud(dec!(20000)));

        let gross = PremiumCalculator::new(&rates)
            .calculate_gross_premium(
                Money::aud(dec!(30000)),
                2,
                ProductSelection::base(),
                PaymentFrequency::Monthly,
            )
            .unwrap();
        assert_eq!(session.pricing().unwrap().premium.gross_premium, gross);
        // max(750, 250) * 0.9
        assert_aud(&gross, dec!(675.00));

        let negative = session.set_annual_fee(0, Money::aud(dec!(-1)));
        assert!(matches!(negative, QuoteOutcome::Invalid(PricingError::Validation(_))));
    }

    #[test]
    fn test_session_matches_pure_calculator() {
        let rates = Arc::new(RateFixtures::standard());
        let mut session = QuoteSession::new(Arc::clone(&rates));
        session.set_jurisdiction("QLD");
        session.set_children(vec![
            Child::new("Ava", Money::aud(dec!(21000))),
            Child::new("Noah", Money::aud(dec!(19000))),
        ]);
        session.set_products(ProductSelection::all());

        let request = session.request().unwrap();
        let direct = PremiumCalculator::new(&rates)
            .calculate_premium_breakdown(&request)
            .unwrap();

        assert_eq!(session.pricing().unwrap().premium, direct);
    }
}

mod reporting {
    use super::*;

    #[test]
    fn test_portfolio_totals() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let records = vec![
            PolicyRecordBuilder::new().sequence(1).jurisdiction("NSW").premium(dec!(1000)).build(),
            PolicyRecordBuilder::new().sequence(2).jurisdiction("SA").premium(dec!(1000)).build(),
            PolicyRecordBuilder::new().sequence(3).jurisdiction("SA").premium(dec!(500)).build(),
        ];

        let report = PortfolioReport::from_records(&records, service.taxes()).unwrap();

        assert_eq!(report.totals.policy_count, 3);
        assert_aud(&report.totals.gross_written_premium, dec!(2500.00));
        assert_aud(&report.totals.gst, dec!(250.00));
        // NSW 99 + SA 121 + SA 60.50
        assert_aud(&report.totals.stamp_duty, dec!(280.50));
        assert_aud(&report.totals.commission, dec!(875.00));
        assert_aud(&report.totals.net_to_underwriter, dec!(1625.00));

        let sa = report.jurisdiction("SA").unwrap();
        assert_eq!(sa.totals.policy_count, 2);
        assert_eq!(sa.effective_duty_rate.unwrap().as_decimal(), dec!(0.11));
    }

    #[test]
    fn test_negative_record_names_policy() {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);
        let records = vec![PolicyRecordBuilder::new().sequence(42).premium(dec!(-1)).build()];

        let err = PortfolioReport::from_records(&records, service.taxes()).unwrap_err();
        assert!(matches!(err, PricingError::Validation(ref msg) if msg.contains("SFP-000042")));
    }
}

proptest! {
    #[test]
    fn priced_quotes_are_well_formed(request in quote_request_strategy()) {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);

        let pricing = service.price_quote(&request).unwrap();

        assert_breakdown_well_formed(&pricing.premium);
        assert_total_payable_adds_up(&pricing.taxes);
        assert_split_sums_to(&pricing.commission, &pricing.premium.gross_premium);
    }

    #[test]
    fn pricing_is_deterministic(request in quote_request_strategy()) {
        let rates = RateFixtures::standard();
        let service = PricingService::new(&rates);

        prop_assert_eq!(
            service.price_quote(&request).unwrap(),
            service.price_quote(&request).unwrap()
        );
    }

    #[test]
    fn gross_premium_respects_discounted_minimum(request in quote_request_strategy()) {
        let rates = RateFixtures::standard();
        let calc = PremiumCalculator::new(&rates);

        let breakdown = calc.calculate_premium_breakdown(&request).unwrap();

        // Floor of 250 less at most 10% household and 5% annual discount
        prop_assert!(breakdown.gross_premium.amount() >= dec!(213.75));
        prop_assert!(breakdown.annual_with_discount.amount() <= breakdown.annual_total.amount());
    }
}
