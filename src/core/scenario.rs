use super::engine::{ProjectionOptions, project_rate};
use super::normalize::{CalculatorInputs, normalize};
use super::subscription::{LineItemEdit, LineItemId, SubscriptionInputs, SubscriptionMode};
use super::types::{Framing, ProjectionResult, Scenario, ScenarioKind};

/// Keep, half and quit, in that order. Quit restates the base as the amount
/// freed up rather than a zero projection.
pub fn derive_scenarios(base: &ProjectionResult) -> Vec<Scenario> {
    vec![
        scenario(ScenarioKind::Keep, Framing::Spend, *base),
        scenario(ScenarioKind::Half, Framing::Spend, base.scaled(0.5)),
        scenario(ScenarioKind::Quit, Framing::Savings, *base),
    ]
}

/// Re-runs the aggregate with `cancelled` items switched off. Simple-mode
/// subscriptions have no items to cancel and audit to the base projection.
pub fn audit_scenario(
    inputs: &SubscriptionInputs,
    cancelled: &[LineItemId],
    options: &ProjectionOptions,
) -> Scenario {
    let mut trimmed = inputs.clone();
    if let SubscriptionMode::Itemized(ledger) = &mut trimmed.mode {
        for id in cancelled {
            ledger.update(
                id,
                LineItemEdit {
                    active: Some(false),
                    ..LineItemEdit::default()
                },
            );
        }
    }

    let options = options.with_years(trimmed.horizon_years());
    let rate = normalize(&CalculatorInputs::Subscriptions(trimmed));
    scenario(
        ScenarioKind::Audit,
        Framing::Spend,
        project_rate(&rate, &options),
    )
}

fn scenario(kind: ScenarioKind, framing: Framing, projection: ProjectionResult) -> Scenario {
    Scenario {
        kind,
        label: kind.label(),
        framing,
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project;
    use crate::core::sanitize::SanitizedValue;
    use crate::core::subscription::SubscriptionLedger;
    use crate::core::types::BillingPeriod;
    use proptest::prelude::{prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn itemized() -> SubscriptionInputs {
        SubscriptionInputs {
            mode: SubscriptionMode::Itemized(SubscriptionLedger::with_defaults()),
            years: SanitizedValue::Value(10.0),
        }
    }

    #[test]
    fn scenarios_come_in_keep_half_quit_order() {
        let base = project(25.0, &ProjectionOptions::default());
        let scenarios = derive_scenarios(&base);
        let kinds: Vec<_> = scenarios.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ScenarioKind::Keep, ScenarioKind::Half, ScenarioKind::Quit]);
        assert_eq!(scenarios[0].projection, base);
        assert_approx(scenarios[1].projection.annual, 650.0);
        assert_approx(scenarios[1].projection.weekly, 12.5);
        assert_approx(scenarios[1].projection.years, 10.0);
    }

    #[test]
    fn quit_is_the_base_framed_as_savings() {
        let base = project(25.0, &ProjectionOptions::default());
        let quit = &derive_scenarios(&base)[2];
        assert_eq!(quit.framing, Framing::Savings);
        assert_eq!(quit.projection, base);
    }

    #[test]
    fn audit_drops_cancelled_items_from_the_aggregate() {
        let inputs = itemized();
        let audit = audit_scenario(&inputs, &[LineItemId::from("3")], &ProjectionOptions::default());
        assert_eq!(audit.kind, ScenarioKind::Audit);
        assert_approx(audit.projection.monthly, 15.49 + 10.99);
        assert_approx(audit.projection.annual, (15.49 + 10.99) * 12.0);
        // The caller's ledger is untouched.
        let ledger = inputs.ledger().expect("itemized");
        assert!(ledger.items().iter().all(|item| item.active));
    }

    #[test]
    fn audit_honours_projection_horizon() {
        let mut inputs = itemized();
        inputs.years = SanitizedValue::Value(5.0);
        let audit = audit_scenario(&inputs, &[], &ProjectionOptions::default());
        assert_approx(audit.projection.years, 5.0);
        assert_approx(audit.projection.n_year, audit.projection.annual * 5.0);
    }

    #[test]
    fn audit_of_simple_mode_matches_base() {
        let inputs = SubscriptionInputs {
            mode: SubscriptionMode::Simple {
                total: SanitizedValue::Value(50.0),
                billing_period: BillingPeriod::Monthly,
            },
            years: SanitizedValue::Unset,
        };
        let audit = audit_scenario(&inputs, &[LineItemId::from("1")], &ProjectionOptions::default());
        assert_approx(audit.projection.annual, 600.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_half_scenario_is_exactly_half(weekly_cents in 0u32..5_000_000) {
            let base = project(weekly_cents as f64 / 100.0, &ProjectionOptions::default());
            let half = &derive_scenarios(&base)[1];
            prop_assert_eq!(half.projection.annual, base.annual / 2.0);
            prop_assert_eq!(half.projection.invested, base.invested / 2.0);
        }
    }
}
