//! Plan contract evaluation
//!
//! The contract verdict is produced outside the policy evaluator and consumed
//! through [`ContractEvaluator`]. [`StandardContract`] is the stock clause set.

use recovery_model::numeric::round2;
use recovery_model::RecoveryPlan;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Overall contract verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractResult {
    Pass,
    Warning,
    Violation,
}

/// Clause identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractClause {
    pub kind: String,
    pub title: String,
}

impl ContractClause {
    /// Create clause
    #[must_use]
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
        }
    }
}

/// Clause-level outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseOutcome {
    pub clause: ContractClause,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl ClauseOutcome {
    /// Passing outcome
    #[must_use]
    pub fn passed(clause: ContractClause) -> Self {
        Self {
            clause,
            pass: true,
            reasons: Vec::new(),
        }
    }

    /// Failing outcome with reasons
    #[must_use]
    pub fn failed(clause: ContractClause, reasons: Vec<String>) -> Self {
        Self {
            clause,
            pass: false,
            reasons,
        }
    }
}

/// Verdict over a whole plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanContract {
    pub result: ContractResult,
    /// 0-100
    pub score: f64,
    pub clauses: Vec<ClauseOutcome>,
}

impl PlanContract {
    /// Check if the verdict is a violation
    #[inline]
    #[must_use]
    pub fn is_violation(&self) -> bool {
        self.result == ContractResult::Violation
    }
}

/// Produces a contract verdict for a plan
#[cfg_attr(test, mockall::automock)]
pub trait ContractEvaluator: Send + Sync {
    /// Evaluate the plan against the contract
    fn evaluate(&self, plan: &RecoveryPlan) -> PlanContract;
}

/// Stock four-clause contract
///
/// `safety` and `dependencies` failures are violations; any other failure
/// downgrades the verdict to a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardContract;

impl StandardContract {
    /// Create evaluator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn safety(plan: &RecoveryPlan) -> ClauseOutcome {
        let clause = ContractClause::new("safety", "Plan is flagged safe");
        if plan.is_safe {
            ClauseOutcome::passed(clause)
        } else {
            ClauseOutcome::failed(clause, vec![format!("plan {} is not flagged safe", plan.plan_id)])
        }
    }

    fn sla(plan: &RecoveryPlan) -> ClauseOutcome {
        let clause = ContractClause::new("sla", "Serial duration fits the SLA");
        let total = plan.total_minutes();
        if total <= u64::from(plan.sla_minutes) {
            ClauseOutcome::passed(clause)
        } else {
            ClauseOutcome::failed(
                clause,
                vec![format!(
                    "{total} serial minutes exceed the {} minute SLA",
                    plan.sla_minutes
                )],
            )
        }
    }

    fn dependencies(plan: &RecoveryPlan) -> ClauseOutcome {
        let clause = ContractClause::new("dependencies", "Dependencies resolve to known actions");
        let known: HashSet<&str> = plan.actions.iter().map(|a| a.id.as_str()).collect();
        let mut reasons = Vec::new();
        for action in &plan.actions {
            for dependency in &action.dependencies {
                if dependency == &action.id {
                    reasons.push(format!("{} depends on itself", action.id));
                } else if !known.contains(dependency.as_str()) {
                    reasons.push(format!("{} depends on unknown action {dependency}", action.id));
                }
            }
        }
        if reasons.is_empty() {
            ClauseOutcome::passed(clause)
        } else {
            ClauseOutcome::failed(clause, reasons)
        }
    }

    fn retries(plan: &RecoveryPlan) -> ClauseOutcome {
        let clause = ContractClause::new("retries", "Critical actions allow retries");
        let reasons: Vec<String> = plan
            .actions
            .iter()
            .filter(|a| a.is_critical() && a.retries_allowed == 0)
            .map(|a| format!("critical action {} allows no retries", a.id))
            .collect();
        if reasons.is_empty() {
            ClauseOutcome::passed(clause)
        } else {
            ClauseOutcome::failed(clause, reasons)
        }
    }
}

impl ContractEvaluator for StandardContract {
    fn evaluate(&self, plan: &RecoveryPlan) -> PlanContract {
        let clauses = vec![
            Self::safety(plan),
            Self::sla(plan),
            Self::dependencies(plan),
            Self::retries(plan),
        ];

        let passed = clauses.iter().filter(|c| c.pass).count();
        let score = round2(passed as f64 / clauses.len() as f64 * 100.0);

        let blocking = clauses
            .iter()
            .any(|c| !c.pass && matches!(c.clause.kind.as_str(), "safety" | "dependencies"));
        let result = if blocking {
            ContractResult::Violation
        } else if passed < clauses.len() {
            ContractResult::Warning
        } else {
            ContractResult::Pass
        };

        tracing::debug!(plan_id = %plan.plan_id, ?result, score, "evaluated plan contract");

        PlanContract {
            result,
            score,
            clauses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_model::{PlanMode, RecoveryAction};
    use recovery_test_utils::{create_calm_plan, create_incident_plan};

    #[test]
    fn calm_plan_passes_every_clause() {
        let contract = StandardContract::new().evaluate(&create_calm_plan());
        assert_eq!(contract.result, ContractResult::Pass);
        assert_eq!(contract.score, 100.0);
        assert!(contract.clauses.iter().all(|c| c.pass));
    }

    #[test]
    fn unsafe_plan_is_a_violation() {
        // incident plan is unsafe and overruns its SLA
        let contract = StandardContract::new().evaluate(&create_incident_plan());
        assert_eq!(contract.result, ContractResult::Violation);
        assert_eq!(contract.score, 50.0);
        let failed: Vec<_> = contract
            .clauses
            .iter()
            .filter(|c| !c.pass)
            .map(|c| c.clause.kind.as_str())
            .collect();
        assert_eq!(failed, vec!["safety", "sla"]);
    }

    #[test]
    fn missing_retries_only_warns() {
        let plan = RecoveryPlan::new("p", PlanMode::Automated)
            .with_safety(true)
            .with_sla(60)
            .with_action(RecoveryAction::new("a", "svc", "eu").with_duration(5).with_tag("critical"));
        let contract = StandardContract::new().evaluate(&plan);
        assert_eq!(contract.result, ContractResult::Warning);
        assert_eq!(contract.score, 75.0);
        assert_eq!(contract.clauses[3].reasons, vec!["critical action a allows no retries"]);
    }

    #[test]
    fn unknown_and_self_dependencies_are_reported() {
        let plan = RecoveryPlan::new("p", PlanMode::Automated)
            .with_safety(true)
            .with_action(RecoveryAction::new("a", "svc", "eu").depends_on("a").depends_on("zzz"));
        let contract = StandardContract::new().evaluate(&plan);
        assert!(contract.is_violation());
        assert_eq!(
            contract.clauses[2].reasons,
            vec!["a depends on itself", "a depends on unknown action zzz"]
        );
    }
}
