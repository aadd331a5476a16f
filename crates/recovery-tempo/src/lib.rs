//! Recovery Tempo
//!
//! Windowed concurrency schedule of a recovery plan and the tempo gate.
//! Independent of the topology view: windows follow plan order, not
//! dependencies.
//!
//! # Example
//!
//! ```rust
//! use recovery_model::{FixedClock, PlanMode, RecoveryAction, RecoveryPlan};
//! use recovery_tempo::{can_run_with_tempo, forecast_execution_tempo};
//!
//! let plan = RecoveryPlan::new("p", PlanMode::Semi)
//!     .with_action(RecoveryAction::new("a", "api", "eu").with_duration(12))
//!     .with_action(RecoveryAction::new("b", "api", "eu").with_duration(18));
//! let clock = FixedClock::new(chrono::Utc::now());
//!
//! let tempo = forecast_execution_tempo(&plan, &clock);
//! assert_eq!(tempo.windows.len(), 1);
//! assert!(can_run_with_tempo(&plan, 60.0, &clock).allowed);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod decision;
mod tempo;

pub use decision::{can_run_with_tempo, TempoDecision, MIN_SAFETY_MARGIN};
pub use tempo::{
    action_tempo_risk, concurrency_target, forecast_execution_tempo, window_length_minutes,
    ExecutionTempo, TempoRisk, TempoWindow, MIN_WINDOW_MINUTES, TEMPO_HORIZON_MINUTES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
