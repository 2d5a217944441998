use std::collections::BTreeMap;

use serde::Serialize;

use super::engine::{MAX_HORIZON_YEARS, ProjectionOptions, project_rate};
use super::normalize::{
    CalculatorInputs, FastFoodInputs, FeeSpec, LotteryInputs, PerUnitInputs, SmokingInputs,
    normalize,
};
use super::reflection::{Band, FactSeed, Thresholds, select_band};
use super::sanitize::{FieldRule, SanitizedValue, sanitize};
use super::scenario::{audit_scenario, derive_scenarios};
use super::subscription::{
    LineItemId, SubscriptionInputs, SubscriptionLedger, SubscriptionLineItem, SubscriptionMode,
};
use super::types::{BillingPeriod, CanonicalRate, FeeKind, ProjectionResult, Scenario};

/// Field name → text as typed.
pub type RawInput = BTreeMap<String, String>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Coffee,
    EnergyDrink,
    Smoking,
    FastFood,
    Lottery,
    Subscriptions,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
    pub default: &'static str,
}

const fn field(name: &'static str, rule: FieldRule, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        rule,
        default,
    }
}

const MONEY: FieldRule = FieldRule::decimal();
const WEEKDAYS: FieldRule = FieldRule::integer().bounded(1.0, 7.0);
const ANY_WEEKDAYS: FieldRule = FieldRule::integer().bounded(0.0, 7.0);
const HORIZON: FieldRule = FieldRule::decimal().bounded(0.0, MAX_HORIZON_YEARS);

const COFFEE_FIELDS: &[FieldSpec] = &[
    field("cost", MONEY, "5"),
    field("perDay", MONEY, "1"),
    field("daysPerWeek", WEEKDAYS, "5"),
];

const ENERGY_DRINK_FIELDS: &[FieldSpec] = &[
    field("cost", MONEY, "3.50"),
    field("perDay", MONEY, "1"),
    field("daysPerWeek", WEEKDAYS, "5"),
];

const SMOKING_FIELDS: &[FieldSpec] = &[
    field("costPerPack", MONEY, "12.00"),
    field("cigsPerDay", MONEY, "10"),
    field("cigsPerPack", MONEY, "20"),
    field("daysPerWeek", ANY_WEEKDAYS, "7"),
];

const FAST_FOOD_FIELDS: &[FieldSpec] = &[
    field("foodCost", MONEY, "15"),
    field("timesPerWeek", MONEY, "3"),
    field("deliveryFee", MONEY, "0"),
    field("taxValue", MONEY, "8"),
    field("tipValue", MONEY, "15"),
];

const LOTTERY_FIELDS: &[FieldSpec] = &[
    field("costPerTicket", MONEY, "2.00"),
    field("ticketsPerWeek", MONEY, "5"),
    field("weeksPerYear", MONEY, "52"),
    field("scratchCardCost", MONEY, "0"),
    field("scratchCardsPerWeek", MONEY, "0"),
];

const SUBSCRIPTION_FIELDS: &[FieldSpec] = &[
    field("totalMonthly", MONEY, "50"),
    field("projectionYears", HORIZON, "10"),
];

const COFFEE_FACTS: &[&str] = &[
    "The average daily coffee drinker spends roughly $1,100 to $1,500 per year on their habit.",
    "Coffee prices have seen a steady historical growth of about 3% per year over the last decade.",
    "Switching from a café latte to home-brewed coffee can save the average person over $1,200 annually.",
    "Inflation quietly adds up: a daily $5 habit today will likely cost closer to $6.50 in ten years.",
];

const SMOKING_FACTS: &[&str] = &[
    "The average smoker in the U.S. spends between $2,000 and $4,000 per year on cigarettes.",
    "Cigarette prices have historically increased faster than the general rate of inflation.",
    "Many long-term smokers find that the financial cost is one of the most surprising metrics when viewed over a decade.",
    "The cost of a pack varies significantly by region, but the long-term compounding effect remains consistent.",
];

const LOTTERY_FACTS: &[&str] = &[
    "Lottery ticket sales in the United States exceeded $100 billion in recent years.",
    "The odds of winning a major Powerball or Mega Millions jackpot are typically around 1 in 292 million or 1 in 302 million.",
    "Historically, lottery spending is often viewed as a form of low-cost entertainment with a high-upside dream.",
    "Many players find that tracking their total spending over a decade provides a new perspective on the 'cost of hope'.",
];

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 6] = [
        CalculatorKind::Coffee,
        CalculatorKind::EnergyDrink,
        CalculatorKind::Smoking,
        CalculatorKind::FastFood,
        CalculatorKind::Lottery,
        CalculatorKind::Subscriptions,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            CalculatorKind::Coffee => "how-much-coffee-costs",
            CalculatorKind::EnergyDrink => "how-much-energy-drinks-cost",
            CalculatorKind::Smoking => "how-much-smoking-costs",
            CalculatorKind::FastFood => "how-much-fast-food-costs",
            CalculatorKind::Lottery => "how-much-lottery-costs",
            CalculatorKind::Subscriptions => "how-much-subscriptions-cost",
        }
    }

    /// Accepts the route slug or the short kebab-case name.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim_matches('/');
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug || kind.short_name() == slug)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            CalculatorKind::Coffee => "coffee",
            CalculatorKind::EnergyDrink => "energy-drink",
            CalculatorKind::Smoking => "smoking",
            CalculatorKind::FastFood => "fast-food",
            CalculatorKind::Lottery => "lottery",
            CalculatorKind::Subscriptions => "subscriptions",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CalculatorKind::Coffee => "Coffee Calculator",
            CalculatorKind::EnergyDrink => "Energy Drink Calculator",
            CalculatorKind::Smoking => "Smoking Calculator",
            CalculatorKind::FastFood => "Fast Food Calculator",
            CalculatorKind::Lottery => "Lottery Calculator",
            CalculatorKind::Subscriptions => "Subscription Calculator",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CalculatorKind::Coffee => "What if those morning lattes were working for you instead?",
            CalculatorKind::EnergyDrink => {
                "Curious about the long-term spark of your daily energy boost?"
            }
            CalculatorKind::Smoking => "Exploring the quiet cost of a pack over the years.",
            CalculatorKind::FastFood => "A gentle look at the math behind those quick bites.",
            CalculatorKind::Lottery => "Wondering what those weekly tickets add up to?",
            CalculatorKind::Subscriptions => "A simple check-in on those monthly auto-pays.",
        }
    }

    pub fn thresholds(self) -> Thresholds {
        match self {
            CalculatorKind::Coffee => Thresholds::new(1000.0, 3000.0),
            CalculatorKind::EnergyDrink => Thresholds::new(800.0, 2500.0),
            CalculatorKind::Smoking => Thresholds::new(2000.0, 5000.0),
            CalculatorKind::FastFood => Thresholds::new(1500.0, 4000.0),
            CalculatorKind::Lottery => Thresholds::new(500.0, 2000.0),
            CalculatorKind::Subscriptions => Thresholds::new(500.0, 1500.0),
        }
    }

    pub fn facts(self) -> &'static [&'static str] {
        match self {
            CalculatorKind::Coffee => COFFEE_FACTS,
            CalculatorKind::Smoking => SMOKING_FACTS,
            CalculatorKind::Lottery => LOTTERY_FACTS,
            CalculatorKind::EnergyDrink
            | CalculatorKind::FastFood
            | CalculatorKind::Subscriptions => &[],
        }
    }

    /// Non-numeric form keys: switches and mode selectors.
    pub fn toggles(self) -> &'static [&'static str] {
        match self {
            CalculatorKind::Coffee | CalculatorKind::EnergyDrink | CalculatorKind::Smoking => &[],
            CalculatorKind::FastFood => &["taxType", "tipType"],
            CalculatorKind::Lottery => &["playEveryWeek"],
            CalculatorKind::Subscriptions => &["mode", "isTotalAnnual"],
        }
    }

    /// Whether `name` is a form key this calculator reads.
    pub fn accepts(self, name: &str) -> bool {
        self.fields().iter().any(|spec| spec.name == name)
            || self.toggles().iter().any(|toggle| *toggle == name)
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            CalculatorKind::Coffee => COFFEE_FIELDS,
            CalculatorKind::EnergyDrink => ENERGY_DRINK_FIELDS,
            CalculatorKind::Smoking => SMOKING_FIELDS,
            CalculatorKind::FastFood => FAST_FOOD_FIELDS,
            CalculatorKind::Lottery => LOTTERY_FIELDS,
            CalculatorKind::Subscriptions => SUBSCRIPTION_FIELDS,
        }
    }
}

/// A calculator's sanitized form state plus the inputs it reduces to.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorForm {
    pub kind: CalculatorKind,
    pub fields: BTreeMap<&'static str, SanitizedValue>,
    /// What each field shows: the sanitized text for submitted fields, the
    /// default as written for the rest.
    pub text: BTreeMap<&'static str, String>,
    pub inputs: CalculatorInputs,
}

impl CalculatorForm {
    /// Swaps a subscription form into itemized mode over `ledger`. No-op for
    /// the other calculators.
    pub fn with_ledger(mut self, ledger: SubscriptionLedger) -> Self {
        if let CalculatorInputs::Subscriptions(subscriptions) = &mut self.inputs {
            subscriptions.mode = SubscriptionMode::Itemized(ledger);
        }
        self
    }
}

/// Sanitizes every numeric field (missing ones take their default) and
/// resolves toggles, then assembles the calculator's inputs.
pub fn parse_inputs(kind: CalculatorKind, raw: &RawInput) -> CalculatorForm {
    let mut fields: BTreeMap<&'static str, SanitizedValue> = BTreeMap::new();
    let mut text: BTreeMap<&'static str, String> = BTreeMap::new();
    for spec in kind.fields() {
        let value = match raw.get(spec.name) {
            Some(submitted) => {
                let value = sanitize(submitted, spec.rule);
                text.insert(spec.name, value.display());
                value
            }
            None => {
                text.insert(spec.name, spec.default.to_string());
                sanitize(spec.default, spec.rule)
            }
        };
        fields.insert(spec.name, value);
    }
    let get = |name: &str| fields.get(name).copied().unwrap_or_default();

    let inputs = match kind {
        CalculatorKind::Coffee | CalculatorKind::EnergyDrink => {
            let per_unit = PerUnitInputs {
                unit_cost: get("cost"),
                units_per_day: get("perDay"),
                days_per_week: get("daysPerWeek"),
            };
            if kind == CalculatorKind::Coffee {
                CalculatorInputs::Coffee(per_unit)
            } else {
                CalculatorInputs::EnergyDrink(per_unit)
            }
        }
        CalculatorKind::Smoking => CalculatorInputs::Smoking(SmokingInputs {
            cost_per_pack: get("costPerPack"),
            cigarettes_per_day: get("cigsPerDay"),
            cigarettes_per_pack: get("cigsPerPack"),
            days_per_week: get("daysPerWeek"),
        }),
        CalculatorKind::FastFood => CalculatorInputs::FastFood(FastFoodInputs {
            food_cost: get("foodCost"),
            orders_per_week: get("timesPerWeek"),
            delivery_fee: get("deliveryFee"),
            tax: FeeSpec {
                kind: fee_kind(raw.get("taxType"), FeeKind::Percent),
                amount: get("taxValue"),
            },
            tip: FeeSpec {
                kind: fee_kind(raw.get("tipType"), FeeKind::Percent),
                amount: get("tipValue"),
            },
        }),
        CalculatorKind::Lottery => CalculatorInputs::Lottery(LotteryInputs {
            ticket_cost: get("costPerTicket"),
            tickets_per_week: get("ticketsPerWeek"),
            play_every_week: toggle(raw.get("playEveryWeek"), true),
            weeks_per_year: get("weeksPerYear"),
            scratch_cost: get("scratchCardCost"),
            scratch_per_week: get("scratchCardsPerWeek"),
        }),
        CalculatorKind::Subscriptions => {
            let itemized = raw
                .get("mode")
                .is_some_and(|mode| matches!(mode.trim(), "expanded" | "itemized"));
            let mode = if itemized {
                SubscriptionMode::Itemized(SubscriptionLedger::with_defaults())
            } else {
                SubscriptionMode::Simple {
                    total: get("totalMonthly"),
                    billing_period: if toggle(raw.get("isTotalAnnual"), false) {
                        BillingPeriod::Annual
                    } else {
                        BillingPeriod::Monthly
                    },
                }
            };
            CalculatorInputs::Subscriptions(SubscriptionInputs {
                mode,
                years: get("projectionYears"),
            })
        }
    };

    CalculatorForm {
        kind,
        fields,
        text,
        inputs,
    }
}

fn toggle(raw: Option<&String>, default: bool) -> bool {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1" | "on" | "yes") => true,
        Some("false" | "0" | "off" | "no") => false,
        _ => default,
    }
}

fn fee_kind(raw: Option<&String>, default: FeeKind) -> FeeKind {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("flat") => FeeKind::Flat,
        Some("percent" | "%") => FeeKind::Percent,
        _ => default,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub calculator: CalculatorKind,
    pub fields: BTreeMap<&'static str, String>,
    pub canonical_rate: CanonicalRate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_per_order: Option<f64>,
    pub projection: ProjectionResult,
    pub scenarios: Vec<Scenario>,
    pub band: Band,
    pub band_index: usize,
    pub fact: Option<&'static str>,
    pub fact_seed: FactSeed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<SubscriptionLineItem>>,
}

/// Runs the full pipeline for one form. `cancelled` only matters for an
/// itemized subscription form, where it drives the audit scenario.
pub fn evaluate(form: &CalculatorForm, seed: FactSeed, cancelled: &[LineItemId]) -> Evaluation {
    let mut options = ProjectionOptions::default();
    if let CalculatorInputs::Subscriptions(subscriptions) = &form.inputs {
        options = options.with_years(subscriptions.horizon_years());
    }

    let rate = normalize(&form.inputs);
    let projection = project_rate(&rate, &options);
    let mut scenarios = derive_scenarios(&projection);
    if let CalculatorInputs::Subscriptions(subscriptions) = &form.inputs {
        scenarios.push(audit_scenario(subscriptions, cancelled, &options));
    }

    let band = select_band(projection.annual, form.kind.thresholds());
    log::debug!(
        "evaluated {:?}: weekly={:.2} annual={:.2} band={:?}",
        form.kind,
        projection.weekly,
        projection.annual,
        band
    );

    Evaluation {
        calculator: form.kind,
        fields: form.text.clone(),
        canonical_rate: rate,
        daily_cost: match &form.inputs {
            CalculatorInputs::Smoking(smoking) => Some(smoking.daily_cost()),
            _ => None,
        },
        total_per_order: match &form.inputs {
            CalculatorInputs::FastFood(fast_food) => Some(fast_food.total_per_order()),
            _ => None,
        },
        projection,
        scenarios,
        band,
        band_index: band.index(),
        fact: seed.pick(form.kind.facts()),
        fact_seed: seed,
        line_items: match &form.inputs {
            CalculatorInputs::Subscriptions(subscriptions) => {
                subscriptions.ledger().map(|ledger| ledger.items().to_vec())
            }
            _ => None,
        },
    }
}
