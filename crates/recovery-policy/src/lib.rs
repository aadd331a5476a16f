//! Recovery Policy
//!
//! Contract verdicts, the allow/deny policy gate and readiness scoring.
//!
//! # Core Concepts
//!
//! - [`ContractEvaluator`]: external verdict seam, [`StandardContract`] is the stock clause set
//! - [`PolicyProfile`]: contract clauses plus topology-derived constraints
//! - [`enforce_policy`]: the gate, with the reasons it blocked
//! - [`ScenarioRunState`]: one readiness score and one [`RunState`]
//!
//! # Example
//!
//! ```rust
//! use recovery_model::{FixedClock, PlanMode, RecoveryAction, RecoveryPlan};
//! use recovery_policy::{build_scenario_run_state, enforce_policy, RunState, StandardContract};
//!
//! let plan = RecoveryPlan::new("p", PlanMode::Automated)
//!     .with_safety(true)
//!     .with_sla(60)
//!     .with_action(RecoveryAction::new("a", "api", "eu").with_duration(10))
//!     .with_action(RecoveryAction::new("b", "api", "eu").with_duration(10))
//!     .with_action(RecoveryAction::new("c", "api", "eu").with_duration(10));
//!
//! let contract = StandardContract::new();
//! assert!(enforce_policy(&plan, &contract).allowed);
//!
//! let clock = FixedClock::new(chrono::Utc::now());
//! let state = build_scenario_run_state(&plan, &contract, &clock);
//! assert_eq!(state.state, RunState::Ready);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod constraint;
mod contract;
mod policy;
mod readiness;

pub use constraint::{PolicyConstraint, PolicyLevel, Recommendation};
pub use contract::{
    ClauseOutcome, ContractClause, ContractEvaluator, ContractResult, PlanContract,
    StandardContract,
};
pub use policy::{
    build_policy_profile, derive_action_risk_score, enforce_policy, policy_profile_for,
    PolicyDecision, PolicyProfile, GATE_BLOCKED_REASON, MIN_RISK_SCORE, TIMELINE_WINDOW_KEY,
    TOPOLOGY_DENSITY_KEY,
};
pub use readiness::{
    build_scenario_run_state, run_state_for, RunState, ScenarioRunState, QUEUED_THRESHOLD,
    READY_THRESHOLD,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
