use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub weekly: f64,
    pub monthly: f64,
    pub annual: f64,
    pub n_year: f64,
    pub invested: f64,
    pub years: f64,
}

impl ProjectionResult {
    /// Every amount is linear in weekly spend, so scaling the result is the
    /// same as projecting a scaled spend. The horizon is not an amount.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weekly: self.weekly * factor,
            monthly: self.monthly * factor,
            annual: self.annual * factor,
            n_year: self.n_year * factor,
            invested: self.invested * factor,
            years: self.years,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Keep,
    Half,
    Quit,
    Audit,
}

impl ScenarioKind {
    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::Keep => "Keep as is",
            ScenarioKind::Half => "Cut in half",
            ScenarioKind::Quit => "Quit entirely",
            ScenarioKind::Audit => "Audit & trim",
        }
    }
}

/// Whether a scenario's amounts are money still spent or money freed up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    Spend,
    Savings,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub label: &'static str,
    pub framing: Framing,
    pub projection: ProjectionResult,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    Flat,
    Percent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Annual,
}

impl BillingPeriod {
    pub fn monthly_amount(self, cost: f64) -> f64 {
        match self {
            BillingPeriod::Monthly => cost,
            BillingPeriod::Annual => cost / 12.0,
        }
    }
}

/// How a weekly spend turns into monthly and annual figures.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Annualization {
    /// `annual = weekly × 52`, `monthly = weekly × 4.33`.
    FiftyTwoWeeks,
    /// `annual = weekly × weeks`, `monthly = annual / 12`.
    WeeksPerYear(f64),
    /// `annual = monthly × 12` for an already-monthly aggregate.
    MonthlyTimesTwelve(f64),
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum CanonicalRate {
    #[serde(rename_all = "camelCase")]
    PerOccurrence {
        cost_per_occurrence: f64,
        occurrences_per_week: f64,
    },
    #[serde(rename_all = "camelCase")]
    WeeklySpend {
        weekly: f64,
        annualization: Annualization,
    },
}

impl CanonicalRate {
    pub fn weekly_spend(&self) -> f64 {
        match *self {
            CanonicalRate::PerOccurrence {
                cost_per_occurrence,
                occurrences_per_week,
            } => cost_per_occurrence * occurrences_per_week,
            CanonicalRate::WeeklySpend { weekly, .. } => weekly,
        }
    }

    pub fn annualization(&self) -> Annualization {
        match *self {
            CanonicalRate::PerOccurrence { .. } => Annualization::FiftyTwoWeeks,
            CanonicalRate::WeeklySpend { annualization, .. } => annualization,
        }
    }
}
