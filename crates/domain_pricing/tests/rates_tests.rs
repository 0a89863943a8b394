//! Rate Table Tests
//!
//! Covers loading and validating rate settings, layered configuration,
//! stamp duty lookups and the product eligibility helpers.

use chrono::NaiveDate;
use core_kernel::Rate;
use domain_pricing::rates::REQUIRED_JURISDICTIONS;
use domain_pricing::{PricingError, RateSettings, RateTable};
use rust_decimal_macros::dec;
use test_utils::RateFixtures;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod loading {
    use super::*;

    #[test]
    fn test_standard_rates() {
        let table = RateFixtures::standard();
        let rates = table.rates();

        assert_eq!(rates.product_a.rate.as_decimal(), dec!(0.025));
        assert_eq!(rates.product_a.minimum_premium, dec!(250.00));
        assert_eq!(rates.product_a.full_term_loading.as_decimal(), dec!(0.15));
        assert_eq!(rates.product_b.rate.as_decimal(), dec!(0.01));
        assert_eq!(rates.discounts.multi_child.as_decimal(), dec!(0.10));
        assert_eq!(rates.taxes.gst_rate.as_decimal(), dec!(0.10));
        assert_eq!(rates.taxes.commission_rate.as_decimal(), dec!(0.35));
    }

    #[test]
    fn test_every_required_jurisdiction_present() {
        let table = RateFixtures::standard();
        for code in REQUIRED_JURISDICTIONS {
            assert!(table.stamp_duty(code).is_ok(), "{} missing", code);
        }
        assert_eq!(
            table.jurisdictions(),
            vec!["ACT", "NSW", "NT", "QLD", "SA", "TAS", "VIC", "WA"]
        );
    }

    #[test]
    fn test_global_table_is_loaded_once() {
        let first = RateTable::global().unwrap();
        let second = RateTable::global().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_missing_jurisdiction_is_config_error() {
        let mut settings = RateSettings::standard();
        settings.stamp_duty.remove("TAS");

        let err = RateTable::load(settings).unwrap_err();
        assert!(matches!(err, PricingError::Config(ref msg) if msg.contains("TAS")));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_stamp_duty_rate_out_of_range() {
        let mut settings = RateSettings::standard();
        let mut entry = settings.stamp_duty.get("WA").cloned().unwrap();
        entry.rate = Rate::new(dec!(10));
        settings.stamp_duty.insert("WA", entry);

        let err = RateTable::load(settings).unwrap_err();
        assert!(matches!(err, PricingError::Config(ref msg) if msg.contains("stamp_duty.WA.rate")));
    }

    #[test]
    fn test_negative_currency_is_config_error() {
        let mut settings = RateSettings::standard();
        settings.rates.product_c.flat_rate = dec!(-120);

        let err = RateTable::load(settings).unwrap_err();
        assert!(matches!(err, PricingError::Config(ref msg) if msg.contains("product_c.flat_rate")));
    }

    #[test]
    fn test_negative_rate_is_config_error() {
        let mut settings = RateSettings::standard();
        settings.rates.product_b.rate = Rate::new(dec!(-0.01));

        assert!(matches!(
            RateTable::load(settings),
            Err(PricingError::Config(_))
        ));
    }

    #[test]
    fn test_lower_case_codes_are_normalised() {
        let mut settings = RateSettings::standard();
        let nsw = settings.stamp_duty.remove("NSW").unwrap();
        settings.stamp_duty.insert("nsw", nsw);

        let table = RateTable::load(settings).unwrap();
        assert!(table.stamp_duty("NSW").is_ok());
    }

    #[test]
    fn test_edge_rates_zero_and_one_accepted() {
        let table = RateFixtures::with(|s| {
            s.rates.taxes.commission_rate = Rate::new(dec!(1));
            s.rates.discounts.annual_payment = Rate::new(dec!(0));
        });
        assert_eq!(table.rates().taxes.commission_rate.as_decimal(), dec!(1));
    }
}

mod configuration {
    use super::*;
    use std::sync::Mutex;

    /// Serialises tests that mutate `PRICING__*` environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_json_round_trip() {
        let json = serde_json::to_string(&RateSettings::standard()).unwrap();
        let settings = RateSettings::from_json(&json).unwrap();

        assert_eq!(settings, RateSettings::standard());
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        let result = RateSettings::from_json(r#"{ "rates": { "product_a": 1 } }"#);
        assert!(matches!(result, Err(PricingError::Config(_))));
    }

    #[test]
    fn test_overrides_layer_over_standard_rates() {
        let settings =
            RateSettings::with_overrides(r#"{ "rates": { "discounts": { "multi_child": "0.12" } } }"#)
                .unwrap();
        let table = RateTable::load(settings).unwrap();

        assert_eq!(table.rates().discounts.multi_child.as_decimal(), dec!(0.12));
        assert_eq!(table.rates().discounts.annual_payment.as_decimal(), dec!(0.05));
        assert_eq!(table.rates().product_a.waiting_period_days, 90);
        assert!(table.stamp_duty("SA").is_ok());
    }

    #[test]
    fn test_environment_overrides_layer_over_standard_rates() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("PRICING__RATES__DISCOUNTS__MULTI_CHILD", "0.12");
        std::env::set_var("PRICING__STAMP_DUTY__NSW__RATE", "0.08");

        let settings = RateSettings::from_sources(None);

        std::env::remove_var("PRICING__RATES__DISCOUNTS__MULTI_CHILD");
        std::env::remove_var("PRICING__STAMP_DUTY__NSW__RATE");

        let table = RateTable::load(settings.unwrap()).unwrap();
        assert_eq!(table.rates().discounts.multi_child.as_decimal(), dec!(0.12));
        assert_eq!(table.stamp_duty("NSW").unwrap().rate.as_decimal(), dec!(0.08));
        assert_eq!(table.stamp_duty("NSW").unwrap().name, "New South Wales");
        assert_eq!(table.stamp_duty("VIC").unwrap().rate.as_decimal(), dec!(0.10));
        assert_eq!(table.rates().discounts.annual_payment.as_decimal(), dec!(0.05));
    }

    #[test]
    fn test_file_layer_then_environment() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.toml");
        std::fs::write(
            &path,
            r#"
[rates.taxes]
commission_rate = "0.30"

[rates.discounts]
multi_child = "0.15"
"#,
        )
        .unwrap();

        let from_file = RateTable::load(RateSettings::from_sources(Some(path.as_path())).unwrap()).unwrap();
        assert_eq!(from_file.rates().taxes.commission_rate.as_decimal(), dec!(0.30));
        assert_eq!(from_file.rates().discounts.multi_child.as_decimal(), dec!(0.15));
        assert_eq!(from_file.rates().taxes.gst_rate.as_decimal(), dec!(0.10));

        std::env::set_var("PRICING__RATES__DISCOUNTS__MULTI_CHILD", "0.12");
        let layered = RateSettings::from_sources(Some(path.as_path()));
        std::env::remove_var("PRICING__RATES__DISCOUNTS__MULTI_CHILD");

        let layered = RateTable::load(layered.unwrap()).unwrap();
        assert_eq!(layered.rates().discounts.multi_child.as_decimal(), dec!(0.12));
        assert_eq!(layered.rates().taxes.commission_rate.as_decimal(), dec!(0.30));
    }

    #[test]
    fn test_missing_settings_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = RateSettings::from_sources(Some(path.as_path()));
        assert!(matches!(result, Err(PricingError::Config(_))));
    }

    #[test]
    fn test_out_of_range_override_fails_at_load() {
        let settings =
            RateSettings::with_overrides(r#"{ "rates": { "taxes": { "gst_rate": "1.5" } } }"#)
                .unwrap();

        let err = RateTable::load(settings).unwrap_err();
        assert!(matches!(err, PricingError::Config(ref msg) if msg.contains("taxes.gst_rate")));
    }
}

mod eligibility {
    use super::*;

    #[test]
    fn test_waiting_period_ends_ninety_days_after_inception() {
        let table = RateFixtures::standard();
        let a = &table.rates().product_a;

        assert_eq!(a.waiting_period_ends(date(2025, 1, 1)), date(2025, 4, 1));
    }

    #[test]
    fn test_moratorium_lookback_window() {
        let table = RateFixtures::standard();
        let a = &table.rates().product_a;
        let inception = date(2025, 1, 1);

        assert_eq!(a.moratorium_lookback_start(inception), date(2020, 1, 1));
        assert!(!a.is_pre_existing(date(2019, 12, 31), inception));
        assert!(a.is_pre_existing(date(2020, 1, 1), inception));
        assert!(a.is_pre_existing(date(2022, 6, 1), inception));
        assert!(!a.is_pre_existing(inception, inception));
    }

    #[test]
    fn test_moratorium_from_leap_day() {
        let table = RateFixtures::standard();
        let a = &table.rates().product_a;

        assert_eq!(a.moratorium_lookback_start(date(2024, 2, 29)), date(2019, 2, 28));
    }

    #[test]
    fn test_student_absence_threshold() {
        let table = RateFixtures::standard();
        let b = &table.rates().product_b;

        assert!(b.absence_qualifies(Rate::new(dec!(0.25))));
        assert!(b.absence_qualifies(Rate::new(dec!(0.20))));
        assert!(!b.absence_qualifies(Rate::new(dec!(0.10))));
    }

    #[test]
    fn test_expenses_benefit_capped() {
        let table = RateFixtures::standard();
        let c = &table.rates().product_c;

        assert_eq!(c.components.total(), dec!(1000.00));
        assert_eq!(c.capped_benefit(dec!(1500)), dec!(1000.00));
        assert_eq!(c.capped_benefit(dec!(400)), dec!(400));
    }
}
