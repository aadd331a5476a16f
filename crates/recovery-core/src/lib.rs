//! Recovery Core - decision support for incident-recovery automation
//!
//! The facade over the recovery components:
//! - Builds the dependency and region aware topology of a plan
//! - Gates the plan on contract, topology and action risk
//! - Scores readiness and forecasts the concurrency tempo
//! - Assesses and simulates recovery intents
//!
//! # Example
//!
//! ```rust
//! use recovery_core::prelude::*;
//!
//! let advisor = RecoveryAdvisor::new(AdvisorConfig::new().with_id_seed(7));
//! let plan = RecoveryPlan::new("plan-1", PlanMode::Automated)
//!     .with_safety(true)
//!     .with_sla(60)
//!     .with_action(RecoveryAction::new("drain", "api", "eu-west-1").with_duration(10))
//!     .with_action(RecoveryAction::new("restart", "api", "eu-west-1").with_duration(12))
//!     .with_action(RecoveryAction::new("verify", "api", "eu-west-1").with_duration(5));
//!
//! let assessment = advisor.assess_plan(&plan);
//! assert!(assessment.decision.allowed);
//! assert_eq!(assessment.run_state.state, RunState::Ready);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod advisor;
pub mod config;
pub mod error;

pub use advisor::{PlanAssessment, RecoveryAdvisor};
pub use config::{AdvisorConfig, DEFAULT_TEMPO_BUDGET_MINUTES};
pub use error::{ConfigError, ConfigResult};

pub use recovery_intent as intent;
pub use recovery_model as model;
pub use recovery_policy as policy;
pub use recovery_tempo as tempo;
pub use recovery_topology as topology;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the recovery advisor
    pub use crate::{AdvisorConfig, ConfigError, PlanAssessment, RecoveryAdvisor};
    pub use recovery_intent::{
        IntentRecommendation, RiskAssessment, ScenarioProfile, ScenarioRecommendation,
        SimulationReport,
    };
    pub use recovery_model::{
        Clock, FixedClock, IdSource, IntentPriority, IntentScope, PlanMode, RecoveryAction,
        RecoveryIntent, RecoveryPlan, RecoveryStep,
    };
    pub use recovery_policy::{
        ContractEvaluator, PolicyDecision, PolicyLevel, RunState, StandardContract,
    };
    pub use recovery_tempo::{ExecutionTempo, TempoDecision, TempoRisk};
    pub use recovery_topology::ScenarioTopology;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
