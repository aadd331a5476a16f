//! Tempo forecasting
//!
//! Buckets actions, in plan order, into windows of at most
//! `concurrency_target` actions each. Windows run back to back: each lasts
//! its group's average duration.

use chrono::{DateTime, Utc};
use recovery_model::numeric::{mean_or, round2};
use recovery_model::{offset_minutes, Clock, PlanMode, RecoveryAction, RecoveryPlan};
use serde::{Deserialize, Serialize};

/// Total horizon split across the plan's actions
pub const TEMPO_HORIZON_MINUTES: u32 = 180;

/// Shortest window length
pub const MIN_WINDOW_MINUTES: u32 = 5;

/// Floor applied to a window's average duration
const MIN_WINDOW_DURATION: f64 = 2.0;

/// Risk class of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempoRisk {
    Low,
    Medium,
    High,
}

impl TempoRisk {
    /// Classify an average per-action risk
    #[inline]
    #[must_use]
    pub fn from_average(risk: f64) -> Self {
        if risk >= 70.0 {
            TempoRisk::High
        } else if risk >= 45.0 {
            TempoRisk::Medium
        } else {
            TempoRisk::Low
        }
    }
}

/// A batch of actions executed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoWindow {
    pub index: usize,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub action_ids: Vec<String>,
    /// Running total of window durations up to and including this one
    pub cumulative_minutes: f64,
    /// `[0,100]`
    pub capacity_usage: f64,
    pub risk: TempoRisk,
}

/// Windowed execution forecast of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTempo {
    pub plan_id: String,
    pub window_length_minutes: u32,
    pub concurrency_target: usize,
    /// Actions per hour of cumulative window time
    pub throughput: f64,
    pub windows: Vec<TempoWindow>,
}

impl ExecutionTempo {
    /// Mean capacity usage, `0` with no windows
    #[must_use]
    pub fn average_capacity_usage(&self) -> f64 {
        let usage: Vec<f64> = self.windows.iter().map(|w| w.capacity_usage).collect();
        mean_or(&usage, 0.0)
    }

    /// Number of high-risk windows
    #[must_use]
    pub fn high_risk_windows(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| w.risk == TempoRisk::High)
            .count()
    }

    /// Total minutes across all windows
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.windows.last().map_or(0.0, |w| w.cumulative_minutes)
    }
}

/// Actions executed concurrently for a plan mode
#[inline]
#[must_use]
pub fn concurrency_target(mode: &PlanMode) -> usize {
    match mode {
        PlanMode::Automated => 4,
        PlanMode::Semi => 3,
        PlanMode::Other(_) => 2,
    }
}

/// Window length for `action_count` actions
#[inline]
#[must_use]
pub fn window_length_minutes(action_count: usize) -> u32 {
    let count = u32::try_from(action_count.max(1)).unwrap_or(u32::MAX);
    (TEMPO_HORIZON_MINUTES / count).max(MIN_WINDOW_MINUTES)
}

/// Per-action risk on a `[0,100]` scale
#[must_use]
pub fn action_tempo_risk(action: &RecoveryAction) -> f64 {
    let base = if action.is_critical() { 35.0 } else { 10.0 };
    (base + f64::from(action.retries_allowed) * 5.0 + action.duration() * 0.6).min(100.0)
}

/// Forecast the windowed execution tempo of a plan
#[must_use]
pub fn forecast_execution_tempo(plan: &RecoveryPlan, clock: &dyn Clock) -> ExecutionTempo {
    let origin = clock.now();
    let window_length = window_length_minutes(plan.actions.len());
    let target = concurrency_target(&plan.mode);

    let mut cumulative = 0.0;
    let windows: Vec<TempoWindow> = plan
        .actions
        .chunks(target)
        .enumerate()
        .map(|(index, group)| {
            let durations: Vec<f64> = group.iter().map(RecoveryAction::duration).collect();
            let average = mean_or(&durations, 0.0).max(MIN_WINDOW_DURATION);
            let risks: Vec<f64> = group.iter().map(action_tempo_risk).collect();

            let start_at = offset_minutes(origin, cumulative);
            cumulative += average;

            TempoWindow {
                index,
                start_at,
                end_at: offset_minutes(origin, cumulative),
                action_ids: group.iter().map(|a| a.id.clone()).collect(),
                cumulative_minutes: round2(cumulative),
                capacity_usage: round2((average / f64::from(window_length) * 100.0).min(100.0)),
                risk: TempoRisk::from_average(mean_or(&risks, 0.0)),
            }
        })
        .collect();

    let throughput = round2(plan.actions.len() as f64 / (cumulative / 60.0).max(1.0));

    tracing::debug!(
        plan_id = %plan.plan_id,
        windows = windows.len(),
        window_length,
        throughput,
        "forecast execution tempo"
    );

    ExecutionTempo {
        plan_id: plan.plan_id.clone(),
        window_length_minutes: window_length,
        concurrency_target: target,
        throughput,
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recovery_test_utils::{
        create_action, create_calm_plan, create_incident_plan, create_plan, fixed_clock, fixed_time,
    };

    #[test]
    fn calm_plan_windows() {
        let tempo = forecast_execution_tempo(&create_calm_plan(), &fixed_clock());
        assert_eq!(tempo.window_length_minutes, 22);
        assert_eq!(tempo.concurrency_target, 4);
        assert_eq!(tempo.windows.len(), 2);

        let first = &tempo.windows[0];
        assert_eq!(first.action_ids, vec!["step-0", "step-1", "step-2", "step-3"]);
        assert_eq!(first.capacity_usage, 25.0);
        assert_eq!(first.cumulative_minutes, 5.5);
        assert_eq!(first.start_at, fixed_time());
        assert_eq!(first.end_at, fixed_time() + chrono::Duration::seconds(330));

        let second = &tempo.windows[1];
        assert_eq!(second.capacity_usage, 43.18);
        assert_eq!(second.cumulative_minutes, 15.0);
        assert_eq!(second.start_at, first.end_at);
        assert_eq!(tempo.throughput, 8.0);
        assert_eq!(tempo.total_minutes(), 15.0);
    }

    #[test]
    fn incident_plan_is_semi_and_medium_risk() {
        let tempo = forecast_execution_tempo(&create_incident_plan(), &fixed_clock());
        assert_eq!(tempo.window_length_minutes, 36);
        assert_eq!(tempo.concurrency_target, 3);
        let risks: Vec<_> = tempo.windows.iter().map(|w| w.risk).collect();
        assert_eq!(risks, vec![TempoRisk::Medium, TempoRisk::Low]);
        assert_eq!(tempo.windows[0].capacity_usage, 100.0);
        assert_eq!(tempo.high_risk_windows(), 0);
    }

    #[test]
    fn empty_plan_has_no_windows() {
        let plan = create_plan("empty", PlanMode::Automated, vec![]);
        let tempo = forecast_execution_tempo(&plan, &fixed_clock());
        assert!(tempo.windows.is_empty());
        assert_eq!(tempo.window_length_minutes, 180);
        assert_eq!(tempo.throughput, 0.0);
        assert_eq!(tempo.average_capacity_usage(), 0.0);
    }

    #[test]
    fn short_windows_are_floored() {
        let actions = (0..50).map(|i| create_action(&format!("a{i}"), "eu", 0)).collect();
        let plan = create_plan("many", PlanMode::from("manual".to_string()), actions);
        let tempo = forecast_execution_tempo(&plan, &fixed_clock());
        assert_eq!(tempo.window_length_minutes, MIN_WINDOW_MINUTES);
        assert_eq!(tempo.concurrency_target, 2);
        assert_eq!(tempo.windows.len(), 25);
        // zero-minute actions still occupy the floor duration
        assert_eq!(tempo.windows[0].cumulative_minutes, 2.0);
        assert_eq!(tempo.windows[0].capacity_usage, 40.0);
    }

    #[test]
    fn action_risk_is_capped() {
        let action = create_action("x", "eu", 300).with_tag("critical").with_retries(3);
        assert_eq!(action_tempo_risk(&action), 100.0);
        assert!((action_tempo_risk(&create_action("y", "eu", 10)) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn risk_thresholds() {
        assert_eq!(TempoRisk::from_average(70.0), TempoRisk::High);
        assert_eq!(TempoRisk::from_average(45.0), TempoRisk::Medium);
        assert_eq!(TempoRisk::from_average(44.9), TempoRisk::Low);
    }
}
