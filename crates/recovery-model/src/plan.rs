//! Recovery plans and actions
//!
//! A plan is a flat, ordered list of remediation actions. Dependencies are
//! plain action ids; nothing here checks that they resolve.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Tag marking an action as critical
pub const CRITICAL_TAG: &str = "critical";

/// Single remediation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryAction {
    pub id: String,
    pub service_code: String,
    pub region: String,
    #[serde(default)]
    pub desired_state: String,
    #[serde(default)]
    pub expected_duration_minutes: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub retries_allowed: u32,
}

impl RecoveryAction {
    /// Create action with no duration, dependencies or tags
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        service_code: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_code: service_code.into(),
            region: region.into(),
            desired_state: "healthy".to_string(),
            expected_duration_minutes: 0,
            dependencies: Vec::new(),
            tags: Vec::new(),
            retries_allowed: 0,
        }
    }

    /// With expected duration in minutes
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.expected_duration_minutes = minutes;
        self
    }

    /// Add prerequisite action id
    #[inline]
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Add tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// With retry allowance
    #[inline]
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries_allowed = retries;
        self
    }

    /// With desired end state
    #[inline]
    #[must_use]
    pub fn with_desired_state(mut self, state: impl Into<String>) -> Self {
        self.desired_state = state.into();
        self
    }

    /// Check if action carries the `critical` tag
    #[inline]
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.tags.iter().any(|t| t == CRITICAL_TAG)
    }

    /// Duration as float for scoring arithmetic
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        f64::from(self.expected_duration_minutes)
    }
}

/// How much of the plan runs without a human in the loop.
///
/// Unknown modes are kept verbatim so they round-trip through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanMode {
    Automated,
    Semi,
    Other(String),
}

impl PlanMode {
    /// Wire name of the mode
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PlanMode::Automated => "automated",
            PlanMode::Semi => "semi",
            PlanMode::Other(mode) => mode,
        }
    }
}

impl From<String> for PlanMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "automated" => PlanMode::Automated,
            "semi" => PlanMode::Semi,
            _ => PlanMode::Other(value),
        }
    }
}

impl From<PlanMode> for String {
    fn from(value: PlanMode) -> Self {
        match value {
            PlanMode::Other(mode) => mode,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PlanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative recovery plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub plan_id: String,
    #[serde(default)]
    pub actions: Vec<RecoveryAction>,
    #[serde(default)]
    pub is_safe: bool,
    #[serde(default)]
    pub sla_minutes: u32,
    pub mode: PlanMode,
}

impl RecoveryPlan {
    /// Create empty plan
    #[must_use]
    pub fn new(plan_id: impl Into<String>, mode: PlanMode) -> Self {
        Self {
            plan_id: plan_id.into(),
            actions: Vec::new(),
            is_safe: false,
            sla_minutes: 0,
            mode,
        }
    }

    /// Append action
    #[inline]
    #[must_use]
    pub fn with_action(mut self, action: RecoveryAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Mark plan safe or unsafe
    #[inline]
    #[must_use]
    pub fn with_safety(mut self, is_safe: bool) -> Self {
        self.is_safe = is_safe;
        self
    }

    /// With SLA in minutes
    #[inline]
    #[must_use]
    pub fn with_sla(mut self, minutes: u32) -> Self {
        self.sla_minutes = minutes;
        self
    }

    /// Decode plan from JSON
    ///
    /// # Errors
    /// Returns `ModelError::Decode` if the input does not match the plan shape
    pub fn from_json(input: &str) -> ModelResult<Self> {
        serde_json::from_str(input).map_err(|e| ModelError::decode("plan", e))
    }

    /// Look up action by id
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&RecoveryAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Sum of expected durations
    #[must_use]
    pub fn total_minutes(&self) -> u64 {
        self.actions
            .iter()
            .map(|a| u64::from(a.expected_duration_minutes))
            .sum()
    }

    /// Number of distinct regions, in any order
    #[must_use]
    pub fn region_count(&self) -> usize {
        let mut regions: Vec<&str> = self.actions.iter().map(|a| a.region.as_str()).collect();
        regions.sort_unstable();
        regions.dedup();
        regions.len()
    }
}
