//! Recovery advisor facade
//!
//! Wires the components together behind one entry point that owns the
//! contract evaluator, clock and id source.

use crate::config::AdvisorConfig;
use recovery_intent::{simulate_intent_recovery, SimulationReport};
use recovery_model::{
    Clock, FixedClock, IdSource, RandomIdSource, RecoveryIntent, RecoveryPlan, SeededIdSource,
    SystemClock,
};
use recovery_policy::{
    policy_profile_for, run_state_for, ContractEvaluator, PolicyDecision, PolicyProfile,
    ScenarioRunState, StandardContract,
};
use recovery_tempo::{forecast_execution_tempo, ExecutionTempo, TempoDecision};
use recovery_topology::{build_scenario_topology, ScenarioTopology};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Every plan-side artifact for one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAssessment {
    pub topology: ScenarioTopology,
    pub policy: PolicyProfile,
    pub decision: PolicyDecision,
    pub run_state: ScenarioRunState,
    pub tempo: ExecutionTempo,
    pub tempo_decision: TempoDecision,
}

impl PlanAssessment {
    /// Both the policy gate and the tempo gate allow the plan
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.decision.allowed && self.tempo_decision.allowed
    }
}

/// Entry point over plans and intents
#[derive(Clone)]
pub struct RecoveryAdvisor {
    config: AdvisorConfig,
    evaluator: Arc<dyn ContractEvaluator>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl RecoveryAdvisor {
    /// Create advisor with the standard contract and config-derived seams
    #[must_use]
    pub fn new(config: AdvisorConfig) -> Self {
        let clock: Arc<dyn Clock> = match config.fixed_time {
            Some(at) => Arc::new(FixedClock::new(at)),
            None => Arc::new(SystemClock),
        };
        let ids: Arc<dyn IdSource> = match config.id_seed {
            Some(seed) => Arc::new(SeededIdSource::new(seed)),
            None => Arc::new(RandomIdSource),
        };
        Self {
            config,
            evaluator: Arc::new(StandardContract::new()),
            clock,
            ids,
        }
    }

    /// Create advisor from explicit seams
    #[must_use]
    pub fn with_parts(
        config: AdvisorConfig,
        evaluator: Arc<dyn ContractEvaluator>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            config,
            evaluator,
            clock,
            ids,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Clock used for every timestamp
    #[inline]
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Source of generated id suffixes
    #[inline]
    #[must_use]
    pub fn id_source(&self) -> &dyn IdSource {
        self.ids.as_ref()
    }

    /// Contract evaluator
    #[inline]
    #[must_use]
    pub fn evaluator(&self) -> &dyn ContractEvaluator {
        self.evaluator.as_ref()
    }

    /// Topology only
    #[must_use]
    pub fn topology(&self, plan: &RecoveryPlan) -> ScenarioTopology {
        build_scenario_topology(plan)
    }

    /// Assess a plan with every plan-side component
    #[must_use]
    pub fn assess_plan(&self, plan: &RecoveryPlan) -> PlanAssessment {
        let topology = build_scenario_topology(plan);
        let policy = policy_profile_for(plan, &topology, self.evaluator());
        let decision = PolicyDecision::from_profile(&policy);
        let run_state = run_state_for(plan, &policy, &decision, self.clock());
        let tempo = forecast_execution_tempo(plan, self.clock());
        let tempo_decision = TempoDecision::evaluate(&tempo, self.config.tempo_budget_minutes);

        tracing::info!(
            plan_id = %plan.plan_id,
            allowed = decision.allowed,
            state = ?run_state.state,
            readiness = run_state.readiness_score,
            tempo_allowed = tempo_decision.allowed,
            "assessed recovery plan"
        );

        PlanAssessment {
            topology,
            policy,
            decision,
            run_state,
            tempo,
            tempo_decision,
        }
    }

    /// Simulate an intent
    #[must_use]
    pub fn assess_intent(&self, intent: &RecoveryIntent) -> SimulationReport {
        let report = simulate_intent_recovery(intent, self.clock(), self.id_source());

        tracing::info!(
            intent_id = %intent.intent_id,
            report_id = %report.report_id,
            composite = report.assessment.composite_score,
            selected = %report.selected_scenario_id,
            "assessed recovery intent"
        );

        report
    }
}

impl Default for RecoveryAdvisor {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}

impl std::fmt::Debug for RecoveryAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryAdvisor")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_model::SequentialIdSource;
    use recovery_test_utils::{create_calm_plan, create_platform_intent, fixed_time};

    fn pinned() -> RecoveryAdvisor {
        RecoveryAdvisor::with_parts(
            AdvisorConfig::default(),
            Arc::new(StandardContract::new()),
            Arc::new(FixedClock::new(fixed_time())),
            Arc::new(SequentialIdSource::new()),
        )
    }

    #[test]
    fn fixed_time_config_pins_clock() {
        let advisor = RecoveryAdvisor::new(AdvisorConfig::new().with_fixed_time(fixed_time()));
        assert_eq!(advisor.clock().now(), fixed_time());
    }

    #[test]
    fn seeded_config_repeats_ids() {
        let a = RecoveryAdvisor::new(AdvisorConfig::new().with_id_seed(42));
        let b = RecoveryAdvisor::new(AdvisorConfig::new().with_id_seed(42));
        assert_eq!(a.id_source().next_suffix(), b.id_source().next_suffix());
    }

    #[test]
    fn calm_plan_is_allowed_end_to_end() {
        let assessment = pinned().assess_plan(&create_calm_plan());
        assert!(assessment.is_allowed());
        assert_eq!(assessment.run_state.evaluated_at, fixed_time());
        assert_eq!(assessment.tempo.windows[0].start_at, fixed_time());
    }

    #[test]
    fn intent_ids_come_from_id_source() {
        let report = pinned().assess_intent(&create_platform_intent());
        assert_eq!(report.report_id, "sim-intent-platform-0001");
    }
}
