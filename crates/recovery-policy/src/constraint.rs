//! Policy constraints

use serde::{Deserialize, Serialize};

/// Traffic-light severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyLevel {
    Green,
    Yellow,
    Amber,
    Red,
}

impl PolicyLevel {
    /// Level for a rounded 0-100 contract score
    #[inline]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = score.round();
        if score >= 75.0 {
            PolicyLevel::Green
        } else if score >= 60.0 {
            PolicyLevel::Yellow
        } else if score >= 40.0 {
            PolicyLevel::Amber
        } else {
            PolicyLevel::Red
        }
    }
}

/// What the operator should do about a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Proceed,
    Monitor,
    AddressBeforeRun,
}

impl Recommendation {
    /// Recommendation implied by a topology-derived level
    #[inline]
    #[must_use]
    pub fn for_level(level: PolicyLevel) -> Self {
        match level {
            PolicyLevel::Green => Recommendation::Proceed,
            PolicyLevel::Yellow | PolicyLevel::Amber => Recommendation::Monitor,
            PolicyLevel::Red => Recommendation::AddressBeforeRun,
        }
    }
}

/// One line of the policy profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConstraint {
    pub key: String,
    pub level: PolicyLevel,
    pub message: String,
    pub recommendation: Recommendation,
}

impl PolicyConstraint {
    /// Check if this constraint blocks execution
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.level == PolicyLevel::Red || self.recommendation == Recommendation::AddressBeforeRun
    }
}
