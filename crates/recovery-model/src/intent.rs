//! Recovery intents
//!
//! Intents come from a separate authoring surface and are independent of the
//! plan/action model: an ordered list of steps with operators and capability
//! requirements.

use crate::error::{ModelError, ModelResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blast radius of an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentScope {
    Service,
    Zone,
    Region,
    Platform,
}

impl IntentScope {
    /// Risk multiplier applied to the composite score
    #[inline]
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            IntentScope::Service => 1.0,
            IntentScope::Zone => 1.5,
            IntentScope::Region => 2.0,
            IntentScope::Platform => 3.0,
        }
    }
}

/// Requested priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl IntentPriority {
    /// Weight applied to the mean dimension level
    #[inline]
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            IntentPriority::Low => 0.8,
            IntentPriority::Medium => 1.0,
            IntentPriority::High => 1.2,
            IntentPriority::Critical => 1.4,
        }
    }

    /// Urgency on a 0-100 scale
    #[inline]
    #[must_use]
    pub fn urgency(self) -> u32 {
        match self {
            IntentPriority::Low => 25,
            IntentPriority::Medium => 50,
            IntentPriority::High => 75,
            IntentPriority::Critical => 95,
        }
    }
}

/// One ordered step of an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStep {
    pub key: String,
    pub action: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub expected_minutes: u32,
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    /// Operator-supplied risk nudge, 0-100
    #[serde(default)]
    pub risk_adjustment: u32,
}

impl RecoveryStep {
    /// Create step with no capabilities and no risk adjustment
    #[must_use]
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
            operator: String::new(),
            service: String::new(),
            expected_minutes: 0,
            required_capabilities: Vec::new(),
            risk_adjustment: 0,
        }
    }

    /// With expected minutes
    #[inline]
    #[must_use]
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.expected_minutes = minutes;
        self
    }

    /// Add required capability
    #[inline]
    #[must_use]
    pub fn requires(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.push(capability.into());
        self
    }

    /// With risk adjustment (clamped to 100)
    #[inline]
    #[must_use]
    pub fn with_risk_adjustment(mut self, adjustment: u32) -> Self {
        self.risk_adjustment = adjustment.min(100);
        self
    }

    /// With target service
    #[inline]
    #[must_use]
    pub fn on_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Check if step requires the named capability
    #[inline]
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.required_capabilities.iter().any(|c| c == capability)
    }
}

/// Higher-level recovery request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryIntent {
    pub intent_id: String,
    pub title: String,
    pub scope: IntentScope,
    pub priority: IntentPriority,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub zone: String,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<RecoveryStep>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl RecoveryIntent {
    /// Create intent with no steps
    #[must_use]
    pub fn new(
        intent_id: impl Into<String>,
        title: impl Into<String>,
        scope: IntentScope,
        priority: IntentPriority,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            intent_id: intent_id.into(),
            title: title.into(),
            scope,
            priority,
            mode: "manual".to_string(),
            status: "draft".to_string(),
            operator: String::new(),
            zone: String::new(),
            requested_at,
            start_at: None,
            steps: Vec::new(),
            tags: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Append step
    #[inline]
    #[must_use]
    pub fn with_step(mut self, step: RecoveryStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Add tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Schedule start time
    #[inline]
    #[must_use]
    pub fn starting_at(mut self, at: DateTime<Utc>) -> Self {
        self.start_at = Some(at);
        self
    }

    /// Decode intent from JSON
    ///
    /// # Errors
    /// Returns `ModelError::Decode` if the input does not match the intent shape
    pub fn from_json(input: &str) -> ModelResult<Self> {
        serde_json::from_str(input).map_err(|e| ModelError::decode("intent", e))
    }

    /// Check if intent carries the tag
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Sum of expected step minutes
    #[must_use]
    pub fn total_expected_minutes(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.expected_minutes)).sum()
    }
}
