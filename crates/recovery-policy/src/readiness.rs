//! Readiness engine
//!
//! Folds a plan's shape and its policy profile into one readiness score and
//! a run state. Recomputed on every call.

use crate::contract::ContractEvaluator;
use crate::policy::{build_policy_profile, PolicyDecision, PolicyProfile};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use recovery_model::numeric::{clamp, round2};
use recovery_model::{Clock, RecoveryPlan};
use serde::{Deserialize, Serialize};

/// Readiness at or above which a plan is ready
pub const READY_THRESHOLD: f64 = 85.0;

/// Readiness at or above which a plan is queued
pub const QUEUED_THRESHOLD: f64 = 55.0;

/// Lifecycle state of a scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    Queued,
    Ready,
    Blocked,
    /// Set by executors; never derived here
    Running,
    NeedsReview,
}

impl RunState {
    /// Map a gate outcome and readiness score to a state
    #[must_use]
    pub fn classify(policy_allowed: bool, readiness: f64) -> Self {
        if !policy_allowed {
            RunState::NeedsReview
        } else if readiness >= READY_THRESHOLD {
            RunState::Ready
        } else if readiness >= QUEUED_THRESHOLD {
            RunState::Queued
        } else {
            RunState::Blocked
        }
    }
}

/// Readiness snapshot of one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRunState {
    pub plan_id: String,
    pub state: RunState,
    /// `[10,100]`
    pub readiness_score: f64,
    pub policy_allowed: bool,
    pub risk_score: f64,
    /// Deduplicated gate reasons, first-seen order
    pub policy_recommendations: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Compute the run state of a plan
#[must_use]
pub fn build_scenario_run_state(
    plan: &RecoveryPlan,
    evaluator: &dyn ContractEvaluator,
    clock: &dyn Clock,
) -> ScenarioRunState {
    let profile = build_policy_profile(plan, evaluator);
    let decision = PolicyDecision::from_profile(&profile);
    run_state_for(plan, &profile, &decision, clock)
}

/// Compute the run state from an already evaluated profile and decision
#[must_use]
pub fn run_state_for(
    plan: &RecoveryPlan,
    profile: &PolicyProfile,
    decision: &PolicyDecision,
    clock: &dyn Clock,
) -> ScenarioRunState {
    let readiness = round2(clamp(
        (plan_baseline(plan) + risk_band(profile)) / 2.0,
        10.0,
        100.0,
    ));
    let state = RunState::classify(decision.allowed, readiness);

    let recommendations: IndexSet<&str> = decision.reasons.iter().map(String::as_str).collect();

    tracing::debug!(
        plan_id = %plan.plan_id,
        readiness,
        ?state,
        "computed run state"
    );

    ScenarioRunState {
        plan_id: plan.plan_id.clone(),
        state,
        readiness_score: readiness,
        policy_allowed: decision.allowed,
        risk_score: profile.risk_score,
        policy_recommendations: recommendations.into_iter().map(str::to_string).collect(),
        evaluated_at: clock.now(),
    }
}

fn plan_baseline(plan: &RecoveryPlan) -> f64 {
    let shape_penalty = (plan.actions.len() as f64 * 1.5 + plan.region_count() as f64 * 4.0).min(30.0);
    let sla_penalty = (f64::from(plan.sla_minutes) - 120.0).max(0.0) * 0.15;
    let safety_bonus = if plan.is_safe { 40.0 } else { 0.0 };
    100.0 - shape_penalty - sla_penalty + safety_bonus
}

fn risk_band(profile: &PolicyProfile) -> f64 {
    if profile.constraints.is_empty() {
        return 100.0;
    }
    (profile.score + (90.0 - profile.risk_score) + profile.lane_count as f64 * 2.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::StandardContract;
    use crate::policy::GATE_BLOCKED_REASON;
    use recovery_model::PlanMode;
    use recovery_test_utils::{
        create_action, create_calm_plan, create_incident_plan, create_plan, fixed_clock, fixed_time,
    };

    #[test]
    fn calm_plan_is_ready() {
        let state = build_scenario_run_state(&create_calm_plan(), &StandardContract::new(), &fixed_clock());
        assert_eq!(state.state, RunState::Ready);
        assert_eq!(state.readiness_score, 100.0);
        assert!(state.policy_allowed);
        assert_eq!(state.risk_score, 98.5);
        assert!(state.policy_recommendations.is_empty());
        assert_eq!(state.evaluated_at, fixed_time());
    }

    #[test]
    fn blocked_gate_needs_review() {
        let state = build_scenario_run_state(&create_incident_plan(), &StandardContract::new(), &fixed_clock());
        assert_eq!(state.state, RunState::NeedsReview);
        assert!(!state.policy_allowed);
        assert_eq!(
            state.policy_recommendations.last().map(String::as_str),
            Some(GATE_BLOCKED_REASON)
        );
    }

    #[test]
    fn allowed_plan_with_loose_sla_is_blocked() {
        // baseline 100 - 8.5 - 132 + 40 = -0.5, risk band 100 - 8 + 2 = 94
        let plan = create_plan(
            "loose",
            PlanMode::Automated,
            vec![
                create_action("a", "eu", 10),
                create_action("b", "eu", 10),
                create_action("c", "eu", 10),
            ],
        )
        .with_safety(true)
        .with_sla(1000);
        let state = build_scenario_run_state(&plan, &StandardContract::new(), &fixed_clock());
        assert!(state.policy_allowed);
        assert_eq!(state.readiness_score, 46.75);
        assert_eq!(state.state, RunState::Blocked);
    }

    #[test]
    fn unsafe_plan_needs_review() {
        let plan = create_plan("unsafe", PlanMode::Automated, vec![create_action("a", "eu", 10)]);
        let state = build_scenario_run_state(&plan, &StandardContract::new(), &fixed_clock());
        assert!(!state.policy_allowed);
        assert_eq!(state.state, RunState::NeedsReview);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(RunState::classify(false, 100.0), RunState::NeedsReview);
        assert_eq!(RunState::classify(true, 85.0), RunState::Ready);
        assert_eq!(RunState::classify(true, 84.99), RunState::Queued);
        assert_eq!(RunState::classify(true, 55.0), RunState::Queued);
        assert_eq!(RunState::classify(true, 54.0), RunState::Blocked);
    }

    #[test]
    fn readiness_is_floored_at_ten() {
        let plan = create_calm_plan();
        let mut profile = build_policy_profile(&plan, &StandardContract::new());
        profile.score = -500.0;
        let decision = PolicyDecision::from_profile(&profile);
        let state = run_state_for(&plan, &profile, &decision, &fixed_clock());
        assert_eq!(state.readiness_score, 10.0);
        assert_eq!(state.state, RunState::Blocked);
    }

    #[test]
    fn recommendations_are_deduplicated() {
        let plan = create_calm_plan();
        let profile = build_policy_profile(&plan, &StandardContract::new());
        let decision = PolicyDecision {
            plan_id: plan.plan_id.clone(),
            allowed: false,
            reasons: vec!["x".into(), "y".into(), "x".into()],
        };
        let state = run_state_for(&plan, &profile, &decision, &fixed_clock());
        assert_eq!(state.policy_recommendations, vec!["x", "y"]);
    }

    #[test]
    fn running_serializes_but_is_never_derived() {
        assert_eq!(serde_json::to_string(&RunState::Running).unwrap(), "\"running\"");
        assert_eq!(serde_json::to_string(&RunState::NeedsReview).unwrap(), "\"needs-review\"");
    }
}
