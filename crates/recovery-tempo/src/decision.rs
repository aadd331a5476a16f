//! Tempo gate

use crate::tempo::{forecast_execution_tempo, ExecutionTempo};
use recovery_model::numeric::round2;
use recovery_model::{Clock, RecoveryPlan};
use serde::{Deserialize, Serialize};

/// Safety margin the gate requires
pub const MIN_SAFETY_MARGIN: f64 = 0.82;

/// Whether a plan fits a tempo budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoDecision {
    pub allowed: bool,
    pub safety_margin: f64,
    pub average_capacity_usage: f64,
    pub high_risk_windows: usize,
}

impl TempoDecision {
    /// Gate an already computed forecast against `budget_minutes`
    #[must_use]
    pub fn evaluate(tempo: &ExecutionTempo, budget_minutes: f64) -> Self {
        let average = tempo.average_capacity_usage();
        // floored at 1, so only high-risk windows can deny
        let safety_margin = (1.0 + (budget_minutes - average) / 100.0).max(1.0);
        let high_risk_windows = tempo.high_risk_windows();

        Self {
            allowed: safety_margin > MIN_SAFETY_MARGIN && high_risk_windows == 0,
            safety_margin: round2(safety_margin),
            average_capacity_usage: round2(average),
            high_risk_windows,
        }
    }
}

/// Forecast a plan and gate it against `budget_minutes`
#[must_use]
pub fn can_run_with_tempo(plan: &RecoveryPlan, budget_minutes: f64, clock: &dyn Clock) -> TempoDecision {
    let decision = TempoDecision::evaluate(&forecast_execution_tempo(plan, clock), budget_minutes);
    tracing::debug!(
        plan_id = %plan.plan_id,
        allowed = decision.allowed,
        safety_margin = decision.safety_margin,
        "evaluated tempo gate"
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo::{TempoRisk, TempoWindow};
    use recovery_model::PlanMode;
    use recovery_test_utils::{create_action, create_calm_plan, create_plan, fixed_clock, fixed_time};

    fn tempo_with(risks: &[TempoRisk], capacity: f64) -> ExecutionTempo {
        ExecutionTempo {
            plan_id: "p".to_string(),
            window_length_minutes: 30,
            concurrency_target: 2,
            throughput: 1.0,
            windows: risks
                .iter()
                .enumerate()
                .map(|(index, risk)| TempoWindow {
                    index,
                    start_at: fixed_time(),
                    end_at: fixed_time(),
                    action_ids: vec![],
                    cumulative_minutes: 0.0,
                    capacity_usage: capacity,
                    risk: *risk,
                })
                .collect(),
        }
    }

    #[test]
    fn calm_plan_fits_budget() {
        let decision = can_run_with_tempo(&create_calm_plan(), 60.0, &fixed_clock());
        assert!(decision.allowed);
        assert_eq!(decision.average_capacity_usage, 34.09);
        assert_eq!(decision.safety_margin, 1.26);
        assert_eq!(decision.high_risk_windows, 0);
    }

    #[test]
    fn margin_is_floored_at_one() {
        let decision = TempoDecision::evaluate(&tempo_with(&[TempoRisk::Low], 100.0), 0.0);
        assert_eq!(decision.safety_margin, 1.0);
        assert!(decision.allowed);
    }

    #[test]
    fn high_risk_window_denies_any_budget() {
        let tempo = tempo_with(&[TempoRisk::Low, TempoRisk::High], 10.0);
        for budget in [0.0, 60.0, 1_000.0] {
            assert!(!TempoDecision::evaluate(&tempo, budget).allowed);
        }
    }

    #[test]
    fn critical_long_actions_are_high_risk() {
        // 35 + 0 + 60 * 0.6 = 71 for each action
        let plan = create_plan(
            "hot",
            PlanMode::Automated,
            vec![
                create_action("a", "eu", 60).with_tag("critical"),
                create_action("b", "eu", 60).with_tag("critical"),
            ],
        );
        let decision = can_run_with_tempo(&plan, 500.0, &fixed_clock());
        assert!(!decision.allowed);
        assert_eq!(decision.high_risk_windows, 1);
    }

    #[test]
    fn empty_plan_is_allowed() {
        let plan = create_plan("empty", PlanMode::Semi, vec![]);
        let decision = can_run_with_tempo(&plan, 60.0, &fixed_clock());
        assert!(decision.allowed);
        assert_eq!(decision.average_capacity_usage, 0.0);
        assert_eq!(decision.safety_margin, 1.6);
    }
}
