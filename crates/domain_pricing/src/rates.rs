//! Rate tables
//!
//! This module holds every numeric constant the pricing engine reads:
//! per-product rates, minimum premiums, loadings, discounts, GST and
//! commission, and the per-jurisdiction stamp duty table.
//!
//! Settings are plain serde structs so they can be layered with the
//! `config` crate (compiled-in standard rates, an optional file, then
//! `PRICING__*` environment overrides). A [`RateTable`] only exists once
//! those settings have been validated; nothing on the calculation path
//! can observe an out-of-range rate.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_pricing::rates::{RateSettings, RateTable};
//!
//! let settings = RateSettings::from_sources(Some(Path::new("rates.toml")))?;
//! let table = RateTable::load(settings)?;
//! let nsw = table.stamp_duty("nsw")?;
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, Months, NaiveDate};
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::Rate;
use crate::error::PricingError;

/// Prefix for environment overrides, e.g. `PRICING__RATES__DISCOUNTS__MULTI_CHILD`
pub const ENV_PREFIX: &str = "PRICING";

/// Jurisdiction codes every stamp duty table must cover
pub const REQUIRED_JURISDICTIONS: [&str; 8] =
    ["NSW", "VIC", "QLD", "SA", "WA", "TAS", "NT", "ACT"];

/// Parent Continuity cover (product A)
///
/// Pays the school fees if a parent dies or becomes unable to work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentContinuityRates {
    /// Premium as a fraction of the annual school fee
    pub rate: Rate,
    /// Floor applied before any loading or discount
    pub minimum_premium: Decimal,
    /// Loading for the full term (death/terminal illness) upgrade
    pub full_term_loading: Rate,
    /// Days after inception before a claim can be made
    pub waiting_period_days: u32,
    /// Look-back window for pre-existing conditions
    pub moratorium_years: u32,
}

impl ParentContinuityRates {
    /// First day a claim can be lodged for a policy incepting on `inception`
    pub fn waiting_period_ends(&self, inception: NaiveDate) -> NaiveDate {
        inception + Duration::days(i64::from(self.waiting_period_days))
    }

    /// Start of the moratorium look-back window
    pub fn moratorium_lookback_start(&self, inception: NaiveDate) -> NaiveDate {
        inception
            .checked_sub_months(Months::new(self.moratorium_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Whether a condition diagnosed on `diagnosed` is excluded as pre-existing
    pub fn is_pre_existing(&self, diagnosed: NaiveDate, inception: NaiveDate) -> bool {
        diagnosed >= self.moratorium_lookback_start(inception) && diagnosed < inception
    }
}

/// Student Continuity cover (product B)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentContinuityRates {
    /// Premium as a fraction of the annual school fee
    pub rate: Rate,
    /// Fraction of the school year a student must miss before cover responds
    pub minimum_absence_threshold: Rate,
}

impl StudentContinuityRates {
    pub fn absence_qualifies(&self, absence: Rate) -> bool {
        absence >= self.minimum_absence_threshold
    }
}

/// Itemised limits inside the school expenses benefit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseComponents {
    pub books_and_study_aids: Decimal,
    pub school_transport: Decimal,
    pub uniform_cover: Decimal,
}

impl ExpenseComponents {
    pub fn total(&self) -> Decimal {
        self.books_and_study_aids + self.school_transport + self.uniform_cover
    }
}

/// School Expenses cover (product C), priced flat per child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolExpensesRates {
    /// Annual premium per covered child
    pub flat_rate: Decimal,
    pub components: ExpenseComponents,
    pub max_benefit: Decimal,
}

impl SchoolExpensesRates {
    /// Benefit payable on a claim, capped at the maximum benefit
    pub fn capped_benefit(&self, claimed: Decimal) -> Decimal {
        claimed.max(Decimal::ZERO).min(self.max_benefit)
    }
}

/// One tier of product D
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLevel {
    pub label: String,
    pub limit: Decimal,
    pub premium: Decimal,
    pub description: String,
}

/// The three tiers of product D
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLevels {
    pub level1: CoverLevel,
    pub level2: CoverLevel,
    pub level3: CoverLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDRates {
    pub levels: CoverLevels,
}

/// Household and payment discounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRates {
    /// Blanket discount when more than one child is covered
    pub multi_child: Rate,
    /// Discount for paying the year up front
    pub annual_payment: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalRates {
    pub annual_loading: Rate,
}

/// Jurisdiction-independent tax and distribution constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub gst_rate: Rate,
    /// Share of gross premium paid away as commission
    pub commission_rate: Rate,
}

/// Every product rate, discount and tax constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    pub product_a: ParentContinuityRates,
    pub product_b: StudentContinuityRates,
    pub product_c: SchoolExpensesRates,
    pub product_d: ProductDRates,
    pub discounts: DiscountRates,
    pub renewal: RenewalRates,
    pub taxes: TaxRates,
}

/// Stamp duty levied by one state or territory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampDutyEntry {
    pub rate: Rate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Stamp duty rates keyed by upper-case jurisdiction code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampDutyTable {
    entries: BTreeMap<String, StampDutyEntry>,
}

impl StampDutyTable {
    /// Looks up a jurisdiction, ignoring case and surrounding whitespace
    pub fn get(&self, code: &str) -> Option<&StampDutyEntry> {
        self.entries.get(&normalize_code(code))
    }

    pub fn insert(&mut self, code: &str, entry: StampDutyEntry) {
        self.entries.insert(normalize_code(code), entry);
    }

    pub fn remove(&mut self, code: &str) -> Option<StampDutyEntry> {
        self.entries.remove(&normalize_code(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StampDutyEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Unvalidated settings as read from configuration sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSettings {
    pub rates: RateConfig,
    pub stamp_duty: StampDutyTable,
}

impl RateSettings {
    /// The compiled-in standard rates
    pub fn standard() -> Self {
        Self {
            rates: RateConfig {
                product_a: ParentContinuityRates {
                    rate: Rate::new(dec!(0.025)),
                    minimum_premium: dec!(250.00),
                    full_term_loading: Rate::new(dec!(0.15)),
                    waiting_period_days: 90,
                    moratorium_years: 5,
                },
                product_b: StudentContinuityRates {
                    rate: Rate::new(dec!(0.01)),
                    minimum_absence_threshold: Rate::new(dec!(0.20)),
                },
                product_c: SchoolExpensesRates {
                    flat_rate: dec!(120.00),
                    components: ExpenseComponents {
                        books_and_study_aids: dec!(500.00),
                        school_transport: dec!(300.00),
                        uniform_cover: dec!(200.00),
                    },
                    max_benefit: dec!(1000.00),
                },
                product_d: ProductDRates {
                    levels: CoverLevels {
                        level1: CoverLevel {
                            label: "Essential".to_string(),
                            limit: dec!(5000.00),
                            premium: dec!(95.00),
                            description: "Core cover for a single term of fees".to_string(),
                        },
                        level2: CoverLevel {
                            label: "Enhanced".to_string(),
                            limit: dec!(10000.00),
                            premium: dec!(165.00),
                            description: "Cover for two terms of fees".to_string(),
                        },
                        level3: CoverLevel {
                            label: "Comprehensive".to_string(),
                            limit: dec!(20000.00),
                            premium: dec!(295.00),
                            description: "Cover for a full school year of fees".to_string(),
                        },
                    },
                },
                discounts: DiscountRates {
                    multi_child: Rate::new(dec!(0.10)),
                    annual_payment: Rate::new(dec!(0.05)),
                },
                renewal: RenewalRates {
                    annual_loading: Rate::new(dec!(0.03)),
                },
                taxes: TaxRates {
                    gst_rate: Rate::new(dec!(0.10)),
                    commission_rate: Rate::new(dec!(0.35)),
                },
            },
            stamp_duty: standard_stamp_duty(),
        }
    }

    /// Parses a complete settings document from JSON
    pub fn from_json(json: &str) -> Result<Self, PricingError> {
        serde_json::from_str(json)
            .map_err(|e| PricingError::config(format!("Invalid rate settings: {}", e)))
    }

    /// Standard rates, layered with an optional file and `PRICING__*` environment overrides
    pub fn from_sources(path: Option<&Path>) -> Result<Self, PricingError> {
        let mut builder = Self::defaults_builder()?;
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(PricingError::from)
    }

    /// Standard rates with a partial JSON document layered on top
    pub fn with_overrides(overrides: &str) -> Result<Self, PricingError> {
        Self::defaults_builder()?
            .add_source(config::File::from_str(overrides, config::FileFormat::Json))
            .build()?
            .try_deserialize()
            .map_err(PricingError::from)
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, PricingError> {
        let defaults = serde_json::to_string(&Self::standard())
            .map_err(|e| PricingError::config(format!("Cannot serialise standard rates: {}", e)))?;
        Ok(config::Config::builder()
            .add_source(config::File::from_str(&defaults, config::FileFormat::Json)))
    }
}

fn standard_stamp_duty() -> StampDutyTable {
    let mut table = StampDutyTable::default();
    let rows: [(&str, Decimal, &str, Option<&str>); 8] = [
        ("NSW", dec!(0.09), "New South Wales", None),
        ("VIC", dec!(0.10), "Victoria", None),
        ("QLD", dec!(0.09), "Queensland", None),
        ("SA", dec!(0.11), "South Australia", None),
        ("WA", dec!(0.10), "Western Australia", None),
        ("TAS", dec!(0.10), "Tasmania", None),
        ("NT", dec!(0.10), "Northern Territory", None),
        ("ACT", dec!(0), "Australian Capital Territory", Some("Insurance duty abolished")),
    ];
    for (code, rate, name, notes) in rows {
        table.insert(
            code,
            StampDutyEntry {
                rate: Rate::new(rate),
                name: name.to_string(),
                notes: notes.map(str::to_string),
            },
        );
    }
    table
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

static GLOBAL: OnceCell<RateTable> = OnceCell::new();

/// Validated, read-only rate configuration
///
/// Built once at startup and shared by reference (or `Arc`) with every
/// calculator. There is no way to mutate a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: RateConfig,
    stamp_duty: StampDutyTable,
}

impl RateTable {
    /// Validates settings and builds the table
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Config` if any rate lies outside [0, 1], any
    /// currency amount is negative, or a required jurisdiction is missing.
    pub fn load(settings: RateSettings) -> Result<Self, PricingError> {
        let mut checks = Checks::default();
        checks.validate_rates(&settings.rates);

        let mut stamp_duty = StampDutyTable::default();
        for (code, entry) in settings.stamp_duty.entries {
            let normalized = normalize_code(&code);
            if normalized.is_empty() {
                checks.fail("stamp_duty has an empty jurisdiction code".to_string());
                continue;
            }
            checks.fraction(&format!("stamp_duty.{}.rate", normalized), entry.rate);
            if stamp_duty.entries.insert(normalized.clone(), entry).is_some() {
                checks.fail(format!("stamp_duty.{} is defined more than once", normalized));
            }
        }
        for code in REQUIRED_JURISDICTIONS {
            if stamp_duty.get(code).is_none() {
                checks.fail(format!("stamp_duty is missing required jurisdiction {}", code));
            }
        }

        checks.finish()?;

        info!(
            jurisdictions = stamp_duty.len(),
            gst_rate = %settings.rates.taxes.gst_rate,
            commission_rate = %settings.rates.taxes.commission_rate,
            "Rate table loaded"
        );

        Ok(Self {
            rates: settings.rates,
            stamp_duty,
        })
    }

    /// Loads the compiled-in standard rates
    pub fn standard() -> Result<Self, PricingError> {
        Self::load(RateSettings::standard())
    }

    /// Process-wide table, loaded from the standard rates on first use
    pub fn global() -> Result<&'static RateTable, PricingError> {
        GLOBAL.get_or_try_init(Self::standard)
    }

    pub fn rates(&self) -> &RateConfig {
        &self.rates
    }

    pub fn stamp_duty_table(&self) -> &StampDutyTable {
        &self.stamp_duty
    }

    /// Configured stamp duty for a jurisdiction
    ///
    /// # Errors
    ///
    /// Returns `PricingError::UnknownJurisdiction` if the code has no entry.
    pub fn stamp_duty(&self, jurisdiction: &str) -> Result<&StampDutyEntry, PricingError> {
        self.stamp_duty
            .get(jurisdiction)
            .ok_or_else(|| PricingError::unknown_jurisdiction(jurisdiction.trim()))
    }

    /// Product D tier by number (1 to 3)
    pub fn product_d_level(&self, level: u8) -> Option<&CoverLevel> {
        let levels = &self.rates.product_d.levels;
        match level {
            1 => Some(&levels.level1),
            2 => Some(&levels.level2),
            3 => Some(&levels.level3),
            _ => None,
        }
    }

    /// Jurisdiction codes in display order
    pub fn jurisdictions(&self) -> Vec<&str> {
        self.stamp_duty.iter().map(|(code, _)| code).collect()
    }
}

/// Collects every configuration problem before failing
#[derive(Default)]
struct Checks {
    problems: Vec<String>,
}

impl Checks {
    fn fail(&mut self, problem: String) {
        self.problems.push(problem);
    }

    fn fraction(&mut self, field: &str, rate: Rate) {
        if !rate.is_fraction() {
            self.fail(format!("{} must lie between 0 and 1, got {}", field, rate.as_decimal()));
        }
    }

    fn currency(&mut self, field: &str, amount: Decimal) {
        if amount.is_sign_negative() && !amount.is_zero() {
            self.fail(format!("{} must not be negative, got {}", field, amount));
        }
    }

    fn validate_rates(&mut self, rates: &RateConfig) {
        let a = &rates.product_a;
        self.fraction("product_a.rate", a.rate);
        self.currency("product_a.minimum_premium", a.minimum_premium);
        self.fraction("product_a.full_term_loading", a.full_term_loading);

        let b = &rates.product_b;
        self.fraction("product_b.rate", b.rate);
        self.fraction("product_b.minimum_absence_threshold", b.minimum_absence_threshold);

        let c = &rates.product_c;
        self.currency("product_c.flat_rate", c.flat_rate);
        self.currency("product_c.components.books_and_study_aids", c.components.books_and_study_aids);
        self.currency("product_c.components.school_transport", c.components.school_transport);
        self.currency("product_c.components.uniform_cover", c.components.uniform_cover);
        self.currency("product_c.max_benefit", c.max_benefit);

        let levels = &rates.product_d.levels;
        for (name, level) in [
            ("level1", &levels.level1),
            ("level2", &levels.level2),
            ("level3", &levels.level3),
        ] {
            self.currency(&format!("product_d.levels.{}.limit", name), level.limit);
            self.currency(&format!("product_d.levels.{}.premium", name), level.premium);
        }

        self.fraction("discounts.multi_child", rates.discounts.multi_child);
        self.fraction("discounts.annual_payment", rates.discounts.annual_payment);
        self.fraction("renewal.annual_loading", rates.renewal.annual_loading);
        self.fraction("taxes.gst_rate", rates.taxes.gst_rate);
        self.fraction("taxes.commission_rate", rates.taxes.commission_rate);
    }

    fn finish(self) -> Result<(), PricingError> {
        if self.problems.is_empty() {
            return Ok(());
        }
        debug!(problems = self.problems.len(), "Rate settings rejected");
        Err(PricingError::config(self.problems.join("; ")))
    }
}
