//! Advisor Integration Tests
//!
//! End-to-end assessments over the shared fixtures, config loading from disk
//! and the JSON shape of reports.

use pretty_assertions::assert_eq;
use recovery_core::policy::{ClauseOutcome, ContractClause, ContractResult, PlanContract};
use recovery_core::prelude::*;
use recovery_core::topology::ScenarioPhase;
use recovery_core::model::SequentialIdSource;
use recovery_test_utils::{
    create_calm_plan, create_incident_plan, create_platform_intent, create_service_intent,
    fixed_time,
};
use std::io::Write;
use std::sync::Arc;

/// Evaluator that passes every plan with a fixed score
struct FixedVerdict(f64);

impl ContractEvaluator for FixedVerdict {
    fn evaluate(&self, _plan: &RecoveryPlan) -> PlanContract {
        PlanContract {
            result: ContractResult::Pass,
            score: self.0,
            clauses: vec![ClauseOutcome::passed(ContractClause::new("external", "External review"))],
        }
    }
}

fn advisor_with(evaluator: Arc<dyn ContractEvaluator>) -> RecoveryAdvisor {
    RecoveryAdvisor::with_parts(
        AdvisorConfig::default(),
        evaluator,
        Arc::new(FixedClock::new(fixed_time())),
        Arc::new(SequentialIdSource::new()),
    )
}

fn pinned_advisor() -> RecoveryAdvisor {
    advisor_with(Arc::new(StandardContract::new()))
}

#[test]
fn test_calm_plan_assessment() {
    let assessment = pinned_advisor().assess_plan(&create_calm_plan());

    assert_eq!(assessment.topology.bottlenecks, vec!["step-7", "step-6", "step-0", "step-1"]);
    assert_eq!(assessment.topology.readiness_window_minutes.total(), 60);
    assert_eq!(assessment.policy.score, 100.0);
    assert_eq!(assessment.policy.risk_score, 98.5);
    assert!(assessment.decision.allowed);
    assert_eq!(assessment.run_state.state, RunState::Ready);
    assert_eq!(assessment.run_state.readiness_score, 100.0);
    assert_eq!(assessment.tempo.windows.len(), 2);
    assert!(assessment.tempo_decision.allowed);
    assert!(assessment.is_allowed());
}

#[test]
fn test_incident_plan_assessment() {
    let assessment = pinned_advisor().assess_plan(&create_incident_plan());

    assert_eq!(assessment.topology.nodes[0].action_id, "failover-db");
    assert_eq!(assessment.topology.nodes[0].phase, ScenarioPhase::Preflight);
    assert_eq!(assessment.policy.contract.result, ContractResult::Violation);
    assert_eq!(assessment.policy.score, 50.0);
    assert!(!assessment.decision.allowed);
    assert_eq!(assessment.run_state.state, RunState::NeedsReview);
    assert_eq!(assessment.run_state.policy_recommendations, assessment.decision.reasons);
    // tempo alone would let it through
    assert!(assessment.tempo_decision.allowed);
    assert!(!assessment.is_allowed());
}

#[test]
fn test_external_evaluator_sets_clause_level() {
    let assessment = advisor_with(Arc::new(FixedVerdict(45.0))).assess_plan(&create_calm_plan());
    let clause = &assessment.policy.constraints[0];
    assert_eq!(clause.key, "contract:external");
    assert_eq!(clause.level, PolicyLevel::Amber);
    assert_eq!(clause.message, "External review: satisfied");
    // amber clause still recommends proceeding, so the gate is open
    assert!(assessment.decision.allowed);
}

#[test]
fn test_intent_reports() {
    let advisor = pinned_advisor();

    let platform = advisor.assess_intent(&create_platform_intent());
    assert_eq!(platform.assessment.recommendation, IntentRecommendation::Throttle);
    assert_eq!(
        platform.selected().map(|s| s.profile),
        Some(ScenarioProfile::Balanced)
    );

    let service = advisor.assess_intent(&create_service_intent());
    assert_eq!(service.report_id, "sim-intent-service-0005");
    assert_eq!(service.assessment.recommendation, IntentRecommendation::Block);
}

#[test]
fn test_budget_from_config_reaches_tempo_gate() {
    let advisor = RecoveryAdvisor::new(
        AdvisorConfig::new()
            .with_tempo_budget(0.0)
            .with_fixed_time(fixed_time()),
    );
    let assessment = advisor.assess_plan(&create_calm_plan());
    // the margin never drops below 1 so a zero budget still passes
    assert_eq!(assessment.tempo_decision.safety_margin, 1.0);
    assert!(assessment.tempo_decision.allowed);
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "tempo_budget_minutes = 30.0").unwrap();
    writeln!(file, "fixed_time = \"2026-04-01T12:00:00Z\"").unwrap();
    writeln!(file, "id_seed = 11").unwrap();

    let config = AdvisorConfig::load(file.path()).unwrap();
    assert_eq!(config.tempo_budget_minutes, 30.0);
    assert_eq!(config.fixed_time, Some(fixed_time()));

    let advisor = RecoveryAdvisor::new(config);
    assert_eq!(advisor.clock().now(), fixed_time());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdvisorConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_plan_json_round_trip_through_advisor() {
    let json = r#"{
        "planId": "from-json",
        "mode": "manual",
        "isSafe": true,
        "slaMinutes": 30,
        "actions": [
            {"id": "a", "serviceCode": "api", "region": "eu", "expectedDurationMinutes": 10},
            {"id": "b", "serviceCode": "api", "region": "eu", "expectedDurationMinutes": 5, "dependencies": ["a"]}
        ]
    }"#;
    let plan = RecoveryPlan::from_json(json).unwrap();
    assert_eq!(plan.mode, PlanMode::Other("manual".to_string()));

    let assessment = pinned_advisor().assess_plan(&plan);
    assert_eq!(assessment.tempo.concurrency_target, 2);

    let value = serde_json::to_value(&assessment).unwrap();
    assert_eq!(value["runState"]["planId"], "from-json");
    assert_eq!(value["tempoDecision"]["allowed"], true);
    assert!(value["policy"]["constraints"].is_array());
}

#[test]
fn test_report_json_shape() {
    let report = pinned_advisor().assess_intent(&create_platform_intent());
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["intentId"], "intent-platform");
    assert_eq!(value["scenarios"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["scenarios"][1]["profile"], "balanced");
    assert_eq!(value["assessment"]["vector"]["dimensions"][0]["category"], "capacity");
}
