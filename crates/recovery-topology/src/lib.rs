//! Recovery Topology
//!
//! Turns a flat [`RecoveryPlan`](recovery_model::RecoveryPlan) into a
//! dependency- and region-aware graph view.
//!
//! # Core Concepts
//!
//! - [`ScenarioTopology`]: nodes sorted by duration, phases, regional budgets
//! - [`ScenarioNode`]: one node per action with a `[0,1]` risk factor
//! - [`topology_risk_profile`]: trailing moving average over node risk
//!
//! # Example
//!
//! ```rust
//! use recovery_model::{PlanMode, RecoveryAction, RecoveryPlan};
//! use recovery_topology::build_scenario_topology;
//!
//! let plan = RecoveryPlan::new("p", PlanMode::Semi)
//!     .with_action(RecoveryAction::new("drain", "lb", "eu-west-1").with_duration(20))
//!     .with_action(RecoveryAction::new("restart", "api", "eu-west-1").with_duration(45).depends_on("drain"));
//!
//! let topology = build_scenario_topology(&plan);
//! assert_eq!(topology.nodes[0].action_id, "restart");
//! assert_eq!(topology.readiness_window_minutes.total(), 65);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod node;
mod risk_profile;
mod topology;

pub use node::{PhaseWindows, RegionalConcurrency, ScenarioNode, ScenarioPhase};
pub use risk_profile::{topology_risk_profile, NodeRisk, SMOOTHING_WINDOW};
pub use topology::{build_scenario_topology, ScenarioTopology};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
