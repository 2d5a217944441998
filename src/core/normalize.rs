use super::engine::WEEKS_PER_YEAR;
use super::sanitize::SanitizedValue;
use super::subscription::{SubscriptionInputs, aggregate_monthly};
use super::types::{Annualization, CanonicalRate, FeeKind};

pub const DEFAULT_CIGARETTES_PER_PACK: f64 = 20.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeeSpec {
    pub kind: FeeKind,
    pub amount: SanitizedValue,
}

impl FeeSpec {
    pub fn flat(amount: f64) -> Self {
        Self {
            kind: FeeKind::Flat,
            amount: SanitizedValue::Value(amount),
        }
    }

    pub fn percent(amount: f64) -> Self {
        Self {
            kind: FeeKind::Percent,
            amount: SanitizedValue::Value(amount),
        }
    }

    /// Absolute contribution of this fee on top of `base`.
    pub fn resolve(&self, base: f64) -> f64 {
        let amount = self.amount.value();
        match self.kind {
            FeeKind::Flat => amount,
            FeeKind::Percent => base * (amount / 100.0),
        }
    }
}

/// Coffee and energy drinks: a unit price bought a few times a day.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerUnitInputs {
    pub unit_cost: SanitizedValue,
    pub units_per_day: SanitizedValue,
    pub days_per_week: SanitizedValue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmokingInputs {
    pub cost_per_pack: SanitizedValue,
    pub cigarettes_per_day: SanitizedValue,
    pub cigarettes_per_pack: SanitizedValue,
    pub days_per_week: SanitizedValue,
}

impl SmokingInputs {
    pub fn packs_per_day(&self) -> f64 {
        let per_pack = self
            .cigarettes_per_pack
            .nonzero_or(DEFAULT_CIGARETTES_PER_PACK);
        self.cigarettes_per_day.value() / per_pack
    }

    pub fn daily_cost(&self) -> f64 {
        self.packs_per_day() * self.cost_per_pack.value()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FastFoodInputs {
    pub food_cost: SanitizedValue,
    pub orders_per_week: SanitizedValue,
    pub delivery_fee: SanitizedValue,
    pub tax: FeeSpec,
    pub tip: FeeSpec,
}

impl FastFoodInputs {
    pub fn total_per_order(&self) -> f64 {
        let food = self.food_cost.value();
        food + self.delivery_fee.value() + self.tax.resolve(food) + self.tip.resolve(food)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LotteryInputs {
    pub ticket_cost: SanitizedValue,
    pub tickets_per_week: SanitizedValue,
    pub play_every_week: bool,
    pub weeks_per_year: SanitizedValue,
    pub scratch_cost: SanitizedValue,
    pub scratch_per_week: SanitizedValue,
}

impl LotteryInputs {
    /// The every-week toggle pins the year to 52 weeks.
    pub fn resolved_weeks_per_year(&self) -> f64 {
        if self.play_every_week {
            WEEKS_PER_YEAR
        } else {
            self.weeks_per_year.value()
        }
    }

    pub fn weekly_spend(&self) -> f64 {
        self.ticket_cost.value() * self.tickets_per_week.value()
            + self.scratch_cost.value() * self.scratch_per_week.value()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalculatorInputs {
    Coffee(PerUnitInputs),
    EnergyDrink(PerUnitInputs),
    Smoking(SmokingInputs),
    FastFood(FastFoodInputs),
    Lottery(LotteryInputs),
    Subscriptions(SubscriptionInputs),
}

pub fn normalize(inputs: &CalculatorInputs) -> CanonicalRate {
    match inputs {
        CalculatorInputs::Coffee(per_unit) | CalculatorInputs::EnergyDrink(per_unit) => {
            CanonicalRate::PerOccurrence {
                cost_per_occurrence: per_unit.unit_cost.value(),
                occurrences_per_week: per_unit.units_per_day.value()
                    * per_unit.days_per_week.value(),
            }
        }
        CalculatorInputs::Smoking(smoking) => CanonicalRate::WeeklySpend {
            weekly: smoking.daily_cost() * smoking.days_per_week.value(),
            annualization: Annualization::FiftyTwoWeeks,
        },
        CalculatorInputs::FastFood(fast_food) => CanonicalRate::PerOccurrence {
            cost_per_occurrence: fast_food.total_per_order(),
            occurrences_per_week: fast_food.orders_per_week.value(),
        },
        CalculatorInputs::Lottery(lottery) => CanonicalRate::WeeklySpend {
            weekly: lottery.weekly_spend(),
            annualization: Annualization::WeeksPerYear(lottery.resolved_weeks_per_year()),
        },
        CalculatorInputs::Subscriptions(subscriptions) => {
            let monthly = aggregate_monthly(subscriptions);
            CanonicalRate::WeeklySpend {
                weekly: monthly * 12.0 / WEEKS_PER_YEAR,
                annualization: Annualization::MonthlyTimesTwelve(monthly),
            }
        }
    }
}
