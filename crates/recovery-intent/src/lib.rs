//! Recovery Intent
//!
//! Risk assessment and multi-speed timing simulation of
//! [`RecoveryIntent`](recovery_model::RecoveryIntent)s.
//!
//! # Core Concepts
//!
//! - [`RiskVector`]: six [`RiskCategory`] levels plus priority and scope weights
//! - [`RiskAssessment`]: composite score and [`IntentRecommendation`]
//! - [`SimulationReport`]: fast, balanced and safe [`SimulationScenario`]s
//!
//! # Example
//!
//! ```rust
//! use recovery_intent::{simulate_intent_recovery, ScenarioProfile};
//! use recovery_model::{
//!     FixedClock, IntentPriority, IntentScope, RecoveryIntent, RecoveryStep, SequentialIdSource,
//! };
//!
//! let now = chrono::Utc::now();
//! let intent = RecoveryIntent::new("i-1", "Restart api", IntentScope::Service, IntentPriority::High, now)
//!     .with_step(RecoveryStep::new("restart", "Restart api pods").with_minutes(15));
//!
//! let report = simulate_intent_recovery(&intent, &FixedClock::new(now), &SequentialIdSource::new());
//! assert_eq!(report.scenarios.len(), 3);
//! assert!(report.scenario(ScenarioProfile::Safe).is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod risk;
mod simulation;

pub use risk::{
    evaluate_risk, evaluate_risk_vector, IntentRecommendation, RiskAssessment, RiskCategory,
    RiskDimension, RiskVector, APPROVAL_TAGS, TELEMETRY_CAPABILITY,
};
pub use simulation::{
    estimate_score, pick_best_scenario, simulate_intent_recovery, step_eta, step_jitter,
    ScenarioProfile, ScenarioRecommendation, SimulationReport, SimulationScenario, StepProjection,
    TrajectoryPoint, BASELINE_LABEL, INFLIGHT_LABEL, POST_LABEL,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
