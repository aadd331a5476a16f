//! Policy evaluator
//!
//! Merges the contract verdict with topology-derived constraints into a
//! [`PolicyProfile`], then gates execution on it.

use crate::constraint::{PolicyConstraint, PolicyLevel, Recommendation};
use crate::contract::{ClauseOutcome, ContractEvaluator, PlanContract};
use recovery_model::numeric::{clamp, mean_or, round2};
use recovery_model::{RecoveryAction, RecoveryPlan};
use recovery_topology::{build_scenario_topology, topology_risk_profile, NodeRisk, ScenarioTopology};
use serde::{Deserialize, Serialize};

/// Key of the bottleneck density constraint
pub const TOPOLOGY_DENSITY_KEY: &str = "topology-density";

/// Key of the total readiness window constraint
pub const TIMELINE_WINDOW_KEY: &str = "timeline-window";

/// Reason appended whenever the gate denies execution
pub const GATE_BLOCKED_REASON: &str = "Risk policy gate blocked execution";

/// Lowest action risk score the gate accepts
pub const MIN_RISK_SCORE: f64 = 30.0;

/// Readiness window above which the timeline turns amber
const TIMELINE_AMBER_MINUTES: u64 = 240;

/// Policy view of one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyProfile {
    pub plan_id: String,
    pub contract: PlanContract,
    /// Rounded contract score
    pub score: f64,
    /// 0-100, higher is safer
    pub risk_score: f64,
    pub constraints: Vec<PolicyConstraint>,
    pub risk_profile: Vec<NodeRisk>,
    /// Regional lanes available to the plan
    pub lane_count: usize,
}

impl PolicyProfile {
    /// Constraints that block execution
    pub fn blocking_constraints(&self) -> impl Iterator<Item = &PolicyConstraint> {
        self.constraints.iter().filter(|c| c.is_blocking())
    }
}

/// Allow/deny gate outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    pub plan_id: String,
    pub allowed: bool,
    pub reasons: Vec<String>,
}

impl PolicyDecision {
    /// Gate a computed profile
    #[must_use]
    pub fn from_profile(profile: &PolicyProfile) -> Self {
        let mut reasons: Vec<String> = profile
            .blocking_constraints()
            .map(|c| c.message.clone())
            .collect();
        let allowed = !profile.contract.is_violation()
            && profile.risk_score >= MIN_RISK_SCORE
            && reasons.is_empty();
        if !allowed {
            reasons.push(GATE_BLOCKED_REASON.to_string());
        }

        Self {
            plan_id: profile.plan_id.clone(),
            allowed,
            reasons,
        }
    }
}

/// Build the policy profile of a plan
#[must_use]
pub fn build_policy_profile(plan: &RecoveryPlan, evaluator: &dyn ContractEvaluator) -> PolicyProfile {
    let topology = build_scenario_topology(plan);
    policy_profile_for(plan, &topology, evaluator)
}

/// Build the policy profile from an already computed topology
#[must_use]
pub fn policy_profile_for(
    plan: &RecoveryPlan,
    topology: &ScenarioTopology,
    evaluator: &dyn ContractEvaluator,
) -> PolicyProfile {
    let contract = evaluator.evaluate(plan);
    let score = contract.score.round();
    let level = PolicyLevel::from_score(score);

    let mut constraints: Vec<PolicyConstraint> = contract
        .clauses
        .iter()
        .map(|outcome| clause_constraint(outcome, level))
        .collect();
    constraints.push(density_constraint(topology));
    constraints.push(timeline_constraint(topology));

    let risk_score = derive_action_risk_score(plan);

    tracing::debug!(
        plan_id = %plan.plan_id,
        score,
        risk_score,
        constraints = constraints.len(),
        "built policy profile"
    );

    PolicyProfile {
        plan_id: plan.plan_id.clone(),
        contract,
        score,
        risk_score,
        constraints,
        risk_profile: topology_risk_profile(topology),
        lane_count: topology.regional_concurrency.len(),
    }
}

/// Action-level risk score, 100 for an empty plan
#[must_use]
pub fn derive_action_risk_score(plan: &RecoveryPlan) -> f64 {
    if plan.actions.is_empty() {
        return 100.0;
    }
    let penalties: Vec<f64> = plan.actions.iter().map(action_penalty).collect();
    round2(clamp(100.0 - mean_or(&penalties, 0.0), 0.0, 100.0))
}

/// Gate a plan
#[must_use]
pub fn enforce_policy(plan: &RecoveryPlan, evaluator: &dyn ContractEvaluator) -> PolicyDecision {
    let decision = PolicyDecision::from_profile(&build_policy_profile(plan, evaluator));
    if !decision.allowed {
        tracing::debug!(plan_id = %plan.plan_id, reasons = decision.reasons.len(), "policy gate denied plan");
    }
    decision
}

fn action_penalty(action: &RecoveryAction) -> f64 {
    let critical_boost = if action.is_critical() { 15.0 } else { 0.0 };
    let duration = (action.duration() * 0.2).min(25.0);
    critical_boost + duration + 2.0 * action.dependencies.len() as f64
}

fn clause_constraint(outcome: &ClauseOutcome, level: PolicyLevel) -> PolicyConstraint {
    let (message, recommendation) = if outcome.pass {
        (format!("{}: satisfied", outcome.clause.title), Recommendation::Proceed)
    } else if outcome.reasons.is_empty() {
        (format!("{}: failed", outcome.clause.title), Recommendation::AddressBeforeRun)
    } else {
        (
            format!("{}: {}", outcome.clause.title, outcome.reasons.join("; ")),
            Recommendation::AddressBeforeRun,
        )
    };

    PolicyConstraint {
        key: format!("contract:{}", outcome.clause.kind),
        level,
        message,
        recommendation,
    }
}

fn density_constraint(topology: &ScenarioTopology) -> PolicyConstraint {
    let density = topology.bottleneck_density();
    let level = if density > 0.7 {
        PolicyLevel::Red
    } else if density > 0.35 {
        PolicyLevel::Amber
    } else {
        PolicyLevel::Green
    };

    PolicyConstraint {
        key: TOPOLOGY_DENSITY_KEY.to_string(),
        level,
        message: format!(
            "{} of {} nodes flagged as bottlenecks (density {:.2})",
            topology.bottlenecks.len(),
            topology.node_count(),
            density
        ),
        recommendation: Recommendation::for_level(level),
    }
}

fn timeline_constraint(topology: &ScenarioTopology) -> PolicyConstraint {
    let minutes = topology.readiness_window_minutes.total();
    let level = if minutes > TIMELINE_AMBER_MINUTES {
        PolicyLevel::Amber
    } else {
        PolicyLevel::Green
    };

    PolicyConstraint {
        key: TIMELINE_WINDOW_KEY.to_string(),
        level,
        message: format!("Readiness window spans {minutes} minutes"),
        recommendation: Recommendation::for_level(level),
    }
}
