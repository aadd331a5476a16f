//! Scenario simulation
//!
//! Projects an intent at three execution speeds from one base projection.
//! The trajectory is a synthetic progress curve for reporting, not a model
//! of real progress.

use crate::risk::{evaluate_risk, RiskAssessment};
use chrono::{DateTime, Utc};
use recovery_model::numeric::{clamp, mean_or, round2, round3};
use recovery_model::{offset_minutes, Clock, IdSource, RecoveryIntent, RecoveryStep};
use serde::{Deserialize, Serialize};

/// Urgency at or above which a low-risk scenario executes
const EXECUTE_URGENCY: u32 = 70;

/// Trajectory label of the origin point
pub const BASELINE_LABEL: &str = "plan-baseline";

/// Trajectory label of per-step points
pub const INFLIGHT_LABEL: &str = "inflight";

/// Trajectory label of the final point
pub const POST_LABEL: &str = "post";

/// Execution speed profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioProfile {
    Fast,
    Balanced,
    Safe,
}

impl ScenarioProfile {
    /// Every profile, fastest first
    pub const ALL: [ScenarioProfile; 3] = [
        ScenarioProfile::Fast,
        ScenarioProfile::Balanced,
        ScenarioProfile::Safe,
    ];

    /// Duration multiplier
    #[inline]
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            ScenarioProfile::Fast => 1.0,
            ScenarioProfile::Balanced => 1.22,
            ScenarioProfile::Safe => 1.55,
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioProfile::Fast => "fast",
            ScenarioProfile::Balanced => "balanced",
            ScenarioProfile::Safe => "safe",
        }
    }
}

impl std::fmt::Display for ScenarioProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scenario verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioRecommendation {
    Execute,
    Delay,
    Stagger,
}

impl ScenarioRecommendation {
    /// Verdict from intent urgency and scenario risk
    #[must_use]
    pub fn classify(urgency: u32, risk: f64) -> Self {
        if urgency >= EXECUTE_URGENCY && risk < 70.0 {
            ScenarioRecommendation::Execute
        } else if risk >= 85.0 {
            ScenarioRecommendation::Delay
        } else {
            ScenarioRecommendation::Stagger
        }
    }
}

/// Projected timing of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProjection {
    pub step_key: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub eta_minutes: f64,
}

/// One point of the progress curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub at: DateTime<Utc>,
    pub label: String,
    /// Percent complete
    pub value: f64,
}

/// One projected execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationScenario {
    pub scenario_id: String,
    pub profile: ScenarioProfile,
    pub multiplier: f64,
    pub confidence: f64,
    pub risk: f64,
    pub projected_minutes: f64,
    pub steps: Vec<StepProjection>,
    pub trajectory: Vec<TrajectoryPoint>,
    pub recommendation: ScenarioRecommendation,
}

/// Simulation output for one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub report_id: String,
    pub intent_id: String,
    pub generated_at: DateTime<Utc>,
    pub assessment: RiskAssessment,
    pub scenarios: Vec<SimulationScenario>,
    pub selected_scenario_id: String,
}

impl SimulationReport {
    /// The selected scenario
    #[must_use]
    pub fn selected(&self) -> Option<&SimulationScenario> {
        self.scenarios
            .iter()
            .find(|s| s.scenario_id == self.selected_scenario_id)
    }

    /// Scenario of a profile
    #[must_use]
    pub fn scenario(&self, profile: ScenarioProfile) -> Option<&SimulationScenario> {
        self.scenarios.iter().find(|s| s.profile == profile)
    }
}

/// Deterministic jitter in `[0, 0.9]` for a step
#[must_use]
pub fn step_jitter(step: &RecoveryStep, index: usize) -> f64 {
    let seed = format!("{}|{}|{}", step.key, index, step.expected_minutes);
    let hash = blake3::hash(seed.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    (u64::from_le_bytes(head) % 10) as f64 / 10.0
}

/// Unscaled eta of a step in whole minutes
#[must_use]
pub fn step_eta(step: &RecoveryStep, index: usize) -> f64 {
    let jitter = step_jitter(step, index);
    (f64::from(step.expected_minutes) + jitter * 6.0 - 3.0 + f64::from(step.risk_adjustment) * 0.03)
        .round()
        .max(0.0)
}

/// Simulate an intent at every profile
#[must_use]
pub fn simulate_intent_recovery(
    intent: &RecoveryIntent,
    clock: &dyn Clock,
    ids: &dyn IdSource,
) -> SimulationReport {
    let assessment = evaluate_risk(intent, clock);
    let origin = intent.start_at.unwrap_or_else(|| clock.now());
    let base = base_projection(intent, origin);
    let report_id = format!("sim-{}-{}", intent.intent_id, ids.next_suffix());

    let scenarios: Vec<SimulationScenario> = ScenarioProfile::ALL
        .iter()
        .map(|profile| {
            let scenario_id = format!("{}-{}-{}", intent.intent_id, profile, ids.next_suffix());
            build_scenario(scenario_id, *profile, &base, origin, intent, &assessment)
        })
        .collect();

    let selected_scenario_id = scenarios
        .iter()
        .find(|s| s.recommendation == ScenarioRecommendation::Execute)
        .or_else(|| scenarios.iter().find(|s| s.profile == ScenarioProfile::Balanced))
        .map(|s| s.scenario_id.clone())
        .unwrap_or_default();

    tracing::debug!(
        intent_id = %intent.intent_id,
        %report_id,
        selected = %selected_scenario_id,
        "simulated intent recovery"
    );

    SimulationReport {
        report_id,
        intent_id: intent.intent_id.clone(),
        generated_at: clock.now(),
        assessment,
        scenarios,
        selected_scenario_id,
    }
}

/// Ranking score of a scenario
#[must_use]
pub fn estimate_score(scenario: &SimulationScenario, composite_risk: f64) -> f64 {
    let values: Vec<f64> = scenario.trajectory.iter().map(|p| p.value).collect();
    mean_or(&values, 0.0) - composite_risk - scenario.projected_minutes + scenario.confidence * 100.0
}

/// Highest-scoring scenario; the first wins ties
#[must_use]
pub fn pick_best_scenario(
    scenarios: &[SimulationScenario],
    composite_risk: f64,
) -> Option<&SimulationScenario> {
    let mut best: Option<(&SimulationScenario, f64)> = None;
    for scenario in scenarios {
        let score = estimate_score(scenario, composite_risk);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((scenario, score));
        }
    }
    best.map(|(scenario, _)| scenario)
}

fn base_projection(intent: &RecoveryIntent, origin: DateTime<Utc>) -> Vec<StepProjection> {
    let mut elapsed = 0.0;
    intent
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let eta = step_eta(step, index);
            let start_at = offset_minutes(origin, elapsed);
            elapsed += eta;
            StepProjection {
                step_key: step.key.clone(),
                start_at,
                end_at: offset_minutes(origin, elapsed),
                eta_minutes: eta,
            }
        })
        .collect()
}

fn build_scenario(
    scenario_id: String,
    profile: ScenarioProfile,
    base: &[StepProjection],
    origin: DateTime<Utc>,
    intent: &RecoveryIntent,
    assessment: &RiskAssessment,
) -> SimulationScenario {
    let multiplier = profile.multiplier();
    let steps: Vec<StepProjection> = base
        .iter()
        .map(|step| {
            let shift = step.eta_minutes * (multiplier - 1.0);
            StepProjection {
                step_key: step.step_key.clone(),
                start_at: offset_minutes(step.start_at, shift),
                end_at: offset_minutes(step.end_at, shift),
                eta_minutes: round2(step.eta_minutes * multiplier),
            }
        })
        .collect();

    let projected_minutes = round2(steps.iter().map(|s| s.eta_minutes).sum());
    let risk = round2(assessment.composite_score / multiplier);
    let confidence = round3(clamp(
        assessment.vector.confidence + (multiplier - 1.0) * 0.3,
        0.0,
        1.0,
    ));

    SimulationScenario {
        trajectory: trajectory(&steps, origin),
        recommendation: ScenarioRecommendation::classify(intent.priority.urgency(), risk),
        scenario_id,
        profile,
        multiplier,
        confidence,
        risk,
        projected_minutes,
        steps,
    }
}

fn trajectory(steps: &[StepProjection], origin: DateTime<Utc>) -> Vec<TrajectoryPoint> {
    let total = steps.len() as f64;
    let mut points = Vec::with_capacity(steps.len() * 2 + 2);
    points.push(TrajectoryPoint {
        at: origin,
        label: BASELINE_LABEL.to_string(),
        value: 0.0,
    });

    for (index, step) in steps.iter().enumerate() {
        let position = index as f64;
        points.push(TrajectoryPoint {
            at: offset_minutes(step.start_at, 2.0),
            label: INFLIGHT_LABEL.to_string(),
            value: round2((100.0 * position / total).min(99.0)),
        });
        points.push(TrajectoryPoint {
            at: offset_minutes(step.end_at, -1.0),
            label: INFLIGHT_LABEL.to_string(),
            value: round2((100.0 * (position + 1.0) / total).min(99.0)),
        });
    }

    points.push(TrajectoryPoint {
        at: steps.last().map_or(origin, |s| s.end_at),
        label: POST_LABEL.to_string(),
        value: 100.0,
    });
    points
}
