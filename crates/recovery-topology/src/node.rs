//! Topology node types

use serde::{Deserialize, Serialize};

/// Execution phase, assigned by ordinal position in the duration-sorted list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioPhase {
    /// First quarter
    Preflight,
    /// Middle half
    Critical,
    /// Last quarter
    Stabilization,
}

impl ScenarioPhase {
    /// Phase for position `index` of `total` sorted nodes
    #[inline]
    #[must_use]
    pub fn for_position(index: usize, total: usize) -> Self {
        if index * 4 < total {
            ScenarioPhase::Preflight
        } else if index * 4 < total * 3 {
            ScenarioPhase::Critical
        } else {
            ScenarioPhase::Stabilization
        }
    }
}

/// One node per plan action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioNode {
    pub action_id: String,
    pub region: String,
    /// Blended risk in `[0,1]`, three decimals
    pub risk_factor: f64,
    pub duration_minutes: u32,
    pub depends_on: Vec<String>,
    pub dependents: Vec<String>,
    pub phase: ScenarioPhase,
    pub tags: Vec<String>,
}

/// Load and concurrency budget of one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalConcurrency {
    pub region: String,
    pub action_count: usize,
    pub total_minutes: u64,
    /// `min(3, sqrt(total/count))`, two decimals
    pub budget: f64,
}

/// Duration totals per phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseWindows {
    pub preflight: u64,
    pub critical: u64,
    pub stabilization: u64,
}

impl PhaseWindows {
    /// Add minutes to a phase bucket
    #[inline]
    pub fn add(&mut self, phase: ScenarioPhase, minutes: u32) {
        let bucket = match phase {
            ScenarioPhase::Preflight => &mut self.preflight,
            ScenarioPhase::Critical => &mut self.critical,
            ScenarioPhase::Stabilization => &mut self.stabilization,
        };
        *bucket += u64::from(minutes);
    }

    /// Minutes in a phase bucket
    #[inline]
    #[must_use]
    pub fn get(&self, phase: ScenarioPhase) -> u64 {
        match phase {
            ScenarioPhase::Preflight => self.preflight,
            ScenarioPhase::Critical => self.critical,
            ScenarioPhase::Stabilization => self.stabilization,
        }
    }

    /// Sum over all phases
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.preflight + self.critical + self.stabilization
    }
}
