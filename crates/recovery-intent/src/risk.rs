//! Intent risk assessment
//!
//! Six independent dimensions, each clamped to `[1,100]`, folded into one
//! composite score weighted by priority and scope.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use recovery_model::numeric::{clamp, mean_or, round2};
use recovery_model::{Clock, RecoveryIntent};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Step actions that destroy state or credentials
static DESTRUCTIVE_ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)revoke|reimage|wipe").expect("valid destructive action regex"));

/// Capability that earns the observability credit
pub const TELEMETRY_CAPABILITY: &str = "telemetry";

/// Tags that raise the policy dimension
pub const APPROVAL_TAGS: [&str; 2] = ["needs-approval", "hotfix"];

/// Lead time beyond which a start counts as scheduled
const SCHEDULED_LEAD_MINUTES: i64 = 60;

/// Level at which a dimension lists mitigations
const MITIGATION_THRESHOLD: f64 = 40.0;

/// Risk dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Capacity,
    Dependency,
    Security,
    Observability,
    Policy,
    Timing,
}

impl RiskCategory {
    /// Every category in report order
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Capacity,
        RiskCategory::Dependency,
        RiskCategory::Security,
        RiskCategory::Observability,
        RiskCategory::Policy,
        RiskCategory::Timing,
    ];

    fn mitigation(self) -> &'static str {
        match self {
            RiskCategory::Capacity => "Split long steps or pre-scale capacity",
            RiskCategory::Dependency => "Confirm required capabilities are provisioned",
            RiskCategory::Security => "Require a second operator for destructive steps",
            RiskCategory::Observability => "Attach telemetry to every step",
            RiskCategory::Policy => "Obtain change approval before start",
            RiskCategory::Timing => "Schedule the start with more lead time",
        }
    }
}

/// One scored dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDimension {
    pub category: RiskCategory,
    /// `[1,100]`
    pub level: f64,
    pub rationale: String,
    pub mitigations: Vec<String>,
}

impl RiskDimension {
    fn scored(category: RiskCategory, raw: f64, rationale: String) -> Self {
        let level = round2(clamp(raw, 1.0, 100.0));
        let mitigations = if level >= MITIGATION_THRESHOLD {
            vec![category.mitigation().to_string()]
        } else {
            Vec::new()
        };
        Self {
            category,
            level,
            rationale,
            mitigations,
        }
    }
}

/// All dimensions plus the weights applied to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskVector {
    pub dimensions: Vec<RiskDimension>,
    pub priority_weight: f64,
    pub scope_multiplier: f64,
    /// `[0,1]`
    pub confidence: f64,
}

impl RiskVector {
    /// Level of one category
    #[must_use]
    pub fn level(&self, category: RiskCategory) -> Option<f64> {
        self.dimensions
            .iter()
            .find(|d| d.category == category)
            .map(|d| d.level)
    }

    /// Mean level across dimensions
    #[must_use]
    pub fn mean_level(&self) -> f64 {
        let levels: Vec<f64> = self.dimensions.iter().map(|d| d.level).collect();
        mean_or(&levels, 0.0)
    }
}

/// Verdict on an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentRecommendation {
    Execute,
    Throttle,
    Escalate,
    Block,
}

impl IntentRecommendation {
    /// Recommendation for a composite score
    #[inline]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            IntentRecommendation::Execute
        } else if score >= 60.0 {
            IntentRecommendation::Throttle
        } else if score >= 40.0 {
            IntentRecommendation::Escalate
        } else {
            IntentRecommendation::Block
        }
    }
}

/// Scored risk of an intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub intent_id: String,
    pub vector: RiskVector,
    /// `[0,100]`
    pub composite_score: f64,
    pub recommendation: IntentRecommendation,
    pub assessed_at: DateTime<Utc>,
}

/// Score the six risk dimensions of an intent
#[must_use]
pub fn evaluate_risk_vector(intent: &RecoveryIntent, clock: &dyn Clock) -> RiskVector {
    let now = clock.now();
    let dimensions = RiskCategory::ALL
        .iter()
        .map(|category| score_dimension(*category, intent, now))
        .collect();

    RiskVector {
        dimensions,
        priority_weight: intent.priority.weight(),
        scope_multiplier: intent.scope.multiplier(),
        confidence: capability_confidence(intent),
    }
}

/// Composite risk assessment of an intent
#[must_use]
pub fn evaluate_risk(intent: &RecoveryIntent, clock: &dyn Clock) -> RiskAssessment {
    let vector = evaluate_risk_vector(intent, clock);
    let scope_factor = if intent.steps.is_empty() {
        1.0
    } else {
        (1.0 + vector.scope_multiplier).log2()
    };
    let composite_score = round2(clamp(
        vector.mean_level() * vector.priority_weight * scope_factor,
        0.0,
        100.0,
    ));
    let recommendation = IntentRecommendation::from_score(composite_score);

    tracing::debug!(
        intent_id = %intent.intent_id,
        composite_score,
        ?recommendation,
        "assessed intent risk"
    );

    RiskAssessment {
        intent_id: intent.intent_id.clone(),
        vector,
        composite_score,
        recommendation,
        assessed_at: clock.now(),
    }
}

fn score_dimension(category: RiskCategory, intent: &RecoveryIntent, now: DateTime<Utc>) -> RiskDimension {
    let steps = &intent.steps;
    match category {
        RiskCategory::Capacity => {
            let minutes = intent.total_expected_minutes();
            RiskDimension::scored(
                category,
                15.0 + minutes as f64 / 8.0,
                format!("{minutes} expected minutes across {} steps", steps.len()),
            )
        }
        RiskCategory::Dependency => {
            let widest = steps
                .iter()
                .map(|s| s.required_capabilities.len())
                .max()
                .unwrap_or(0);
            RiskDimension::scored(
                category,
                16.0 * widest as f64,
                format!("widest step requires {widest} capabilities"),
            )
        }
        RiskCategory::Security => {
            let destructive = steps
                .iter()
                .filter(|s| DESTRUCTIVE_ACTION.is_match(&s.action))
                .count();
            RiskDimension::scored(
                category,
                25.0 * destructive as f64,
                format!("{destructive} destructive steps"),
            )
        }
        RiskCategory::Observability => {
            // holds for an intent with no steps
            let instrumented = steps.iter().all(|s| s.has_capability(TELEMETRY_CAPABILITY));
            let credit = if instrumented { 35.0 } else { 0.0 };
            RiskDimension::scored(
                category,
                (100.0 - steps.len() as f64 * 2.0 - credit).max(10.0),
                if instrumented {
                    "every step emits telemetry".to_string()
                } else {
                    "telemetry coverage is incomplete".to_string()
                },
            )
        }
        RiskCategory::Policy => {
            let gated = APPROVAL_TAGS.iter().any(|tag| intent.has_tag(tag));
            RiskDimension::scored(
                category,
                if gated { 30.0 } else { 5.0 },
                if gated {
                    "intent is tagged for approval".to_string()
                } else {
                    "no approval tags".to_string()
                },
            )
        }
        RiskCategory::Timing => {
            let start = intent.start_at.unwrap_or(now);
            let scheduled = start - now > Duration::minutes(SCHEDULED_LEAD_MINUTES);
            RiskDimension::scored(
                category,
                if scheduled { 12.0 } else { 55.0 },
                if scheduled {
                    "start is scheduled ahead".to_string()
                } else {
                    "start is imminent".to_string()
                },
            )
        }
    }
}

fn capability_confidence(intent: &RecoveryIntent) -> f64 {
    if intent.steps.is_empty() {
        return 0.4;
    }
    let covered = intent
        .steps
        .iter()
        .filter(|s| !s.required_capabilities.is_empty())
        .count();
    round2(0.4 + 0.6 * covered as f64 / intent.steps.len() as f64)
}
