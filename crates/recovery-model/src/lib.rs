//! Recovery Model
//!
//! Input snapshots and ambient seams shared by every recovery component.
//!
//! # Core Concepts
//!
//! - [`RecoveryPlan`] / [`RecoveryAction`]: declarative remediation plans
//! - [`RecoveryIntent`] / [`RecoveryStep`]: higher-level ordered requests
//! - [`Clock`] and [`IdSource`]: injectable time and id generation
//! - [`numeric`]: the shared rounding and clamping convention
//!
//! # Example
//!
//! ```rust
//! use recovery_model::{PlanMode, RecoveryAction, RecoveryPlan};
//!
//! let plan = RecoveryPlan::new("plan-1", PlanMode::Automated)
//!     .with_action(RecoveryAction::new("drain", "api", "us-east-1").with_duration(30));
//!
//! assert_eq!(plan.total_minutes(), 30);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod clock;
mod error;
mod ids;
mod intent;
pub mod numeric;
mod plan;

pub use clock::{offset_minutes, Clock, FixedClock, SystemClock};
pub use error::{ModelError, ModelResult};
pub use ids::{IdSource, RandomIdSource, SeededIdSource, SequentialIdSource};
pub use intent::{IntentPriority, IntentScope, RecoveryIntent, RecoveryStep};
pub use plan::{PlanMode, RecoveryAction, RecoveryPlan, CRITICAL_TAG};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
