mod calculator;
mod engine;
mod normalize;
mod reflection;
mod sanitize;
mod scenario;
mod subscription;
mod types;

pub use calculator::{
    CalculatorForm, CalculatorKind, Evaluation, FieldSpec, RawInput, evaluate, parse_inputs,
};
pub use engine::{
    DEFAULT_GROWTH_RATE, DEFAULT_HORIZON_YEARS, MAX_HORIZON_YEARS, ProjectionOptions,
    WEEKS_PER_MONTH, WEEKS_PER_YEAR, future_value_of_annuity, project, project_rate,
};
pub use normalize::{
    CalculatorInputs, DEFAULT_CIGARETTES_PER_PACK, FastFoodInputs, FeeSpec, LotteryInputs,
    PerUnitInputs, SmokingInputs, normalize,
};
pub use reflection::{Band, FactSeed, Thresholds, select_band};
pub use sanitize::{FieldRule, NumberKind, SanitizedValue, sanitize};
pub use scenario::{audit_scenario, derive_scenarios};
pub use subscription::{
    LineItemEdit, LineItemId, SubscriptionInputs, SubscriptionLedger, SubscriptionLineItem,
    SubscriptionMode, aggregate_monthly,
};
pub use types::{
    Annualization, BillingPeriod, CanonicalRate, FeeKind, Framing, ProjectionResult, Scenario,
    ScenarioKind,
};
