//! Scenario topology builder
//!
//! Builds the graph view of a plan in one pass:
//! 1. Inverse dependency index (`dependents_by_id`)
//! 2. Stable descending-duration sort, phase and risk per position
//! 3. Regional load and concurrency budgets
//! 4. Bottleneck triage
//!
//! The bottleneck set is a triage heuristic (top two by three unrelated
//! criteria), not a critical-path computation.

use crate::node::{PhaseWindows, RegionalConcurrency, ScenarioNode, ScenarioPhase};
use indexmap::{IndexMap, IndexSet};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use recovery_model::numeric::{mean_or, round2, round3};
use recovery_model::{RecoveryAction, RecoveryPlan};
use serde::{Deserialize, Serialize};

/// Maximum concurrency budget of any region
const MAX_REGION_BUDGET: f64 = 3.0;

/// Entries taken from each bottleneck criterion
const BOTTLENECKS_PER_CRITERION: usize = 2;

/// Duration at which the duration risk term saturates
const DURATION_SATURATION_MINUTES: f64 = 180.0;

/// Tag count at which the complexity risk term saturates
const TAG_SATURATION: f64 = 4.0;

/// Dependency- and region-aware view of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTopology {
    pub plan_id: String,
    /// Nodes by descending duration; ties keep plan order
    pub nodes: Vec<ScenarioNode>,
    /// Action ids in plan order
    pub order: Vec<String>,
    /// Deduplicated action ids flagged by triage
    pub bottlenecks: Vec<String>,
    /// Regions whose heaviest action was flagged
    pub hot_regions: Vec<String>,
    pub regional_concurrency: Vec<RegionalConcurrency>,
    pub readiness_window_minutes: PhaseWindows,
}

impl ScenarioTopology {
    /// Look up node by action id
    #[must_use]
    pub fn node(&self, action_id: &str) -> Option<&ScenarioNode> {
        self.nodes.iter().find(|n| n.action_id == action_id)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bottlenecks per node, 0 for an empty topology
    #[must_use]
    pub fn bottleneck_density(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.bottlenecks.len() as f64 / self.nodes.len() as f64
    }
}

/// Build the scenario topology for a plan
#[must_use]
pub fn build_scenario_topology(plan: &RecoveryPlan) -> ScenarioTopology {
    let dependents_by_id = dependents_index(&plan.actions);

    let mut sorted: Vec<&RecoveryAction> = plan.actions.iter().collect();
    // `sort_by` is stable, so equal durations keep plan order
    sorted.sort_by(|a, b| b.expected_duration_minutes.cmp(&a.expected_duration_minutes));

    let total = sorted.len();
    let mut readiness_window_minutes = PhaseWindows::default();
    let nodes: Vec<ScenarioNode> = sorted
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let phase = ScenarioPhase::for_position(index, total);
            readiness_window_minutes.add(phase, action.expected_duration_minutes);
            ScenarioNode {
                action_id: action.id.clone(),
                region: action.region.clone(),
                risk_factor: node_risk_factor(action, index, total),
                duration_minutes: action.expected_duration_minutes,
                depends_on: action.dependencies.clone(),
                dependents: dependents_by_id
                    .get(action.id.as_str())
                    .map(|ids| ids.iter().map(|id| (*id).to_string()).collect())
                    .unwrap_or_default(),
                phase,
                tags: action.tags.clone(),
            }
        })
        .collect();

    let regional_concurrency = regional_concurrency(&plan.actions);
    let (bottlenecks, hot_regions) = detect_bottlenecks(plan, &nodes, &regional_concurrency);

    tracing::debug!(
        plan_id = %plan.plan_id,
        nodes = nodes.len(),
        bottlenecks = bottlenecks.len(),
        regions = regional_concurrency.len(),
        "built scenario topology"
    );

    ScenarioTopology {
        plan_id: plan.plan_id.clone(),
        nodes,
        order: plan.actions.iter().map(|a| a.id.clone()).collect(),
        bottlenecks,
        hot_regions,
        regional_concurrency,
        readiness_window_minutes,
    }
}

/// Map each dependency id to the actions that depend on it, in scan order
fn dependents_index(actions: &[RecoveryAction]) -> IndexMap<&str, IndexSet<&str>> {
    let mut index: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for action in actions {
        for dependency in &action.dependencies {
            index
                .entry(dependency.as_str())
                .or_default()
                .insert(action.id.as_str());
        }
    }
    index
}

/// Mean of criticality, duration, tag complexity and ordinal bias
fn node_risk_factor(action: &RecoveryAction, index: usize, total: usize) -> f64 {
    let criticality = if action.is_critical() { 0.9 } else { 0.4 };
    let duration = (action.duration() / DURATION_SATURATION_MINUTES).min(1.0);
    let complexity = (action.tags.len() as f64 / TAG_SATURATION).min(1.0);
    let ordinal = index as f64 / total.max(1) as f64;
    round3(mean_or(&[criticality, duration, complexity, ordinal], 0.0))
}

/// Group actions by region in first-seen order
fn regional_concurrency(actions: &[RecoveryAction]) -> Vec<RegionalConcurrency> {
    let mut groups: IndexMap<&str, (usize, u64)> = IndexMap::new();
    for action in actions {
        let entry = groups.entry(action.region.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(action.expected_duration_minutes);
    }

    groups
        .into_iter()
        .map(|(region, (action_count, total_minutes))| {
            let per_action = total_minutes as f64 / action_count.max(1) as f64;
            RegionalConcurrency {
                region: region.to_string(),
                action_count,
                total_minutes,
                budget: round2(per_action.sqrt().min(MAX_REGION_BUDGET)),
            }
        })
        .collect()
}

/// Union of region load, dependency count and fan-out triage
fn detect_bottlenecks(
    plan: &RecoveryPlan,
    nodes: &[ScenarioNode],
    regions: &[RegionalConcurrency],
) -> (Vec<String>, Vec<String>) {
    let mut flagged: IndexSet<String> = IndexSet::new();

    // (a) heaviest regions, each represented by its longest action
    let mut by_load: Vec<&RegionalConcurrency> = regions.iter().collect();
    by_load.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    let hot_regions: Vec<String> = by_load
        .iter()
        .take(BOTTLENECKS_PER_CRITERION)
        .map(|r| r.region.clone())
        .collect();
    for region in &hot_regions {
        if let Some(anchor) = nodes.iter().find(|n| &n.region == region) {
            flagged.insert(anchor.action_id.clone());
        }
    }

    // (b) actions waiting on more than one prerequisite
    let mut fan_in: Vec<&RecoveryAction> = plan
        .actions
        .iter()
        .filter(|a| a.dependencies.len() > 1)
        .collect();
    fan_in.sort_by(|a, b| b.dependencies.len().cmp(&a.dependencies.len()));
    for action in fan_in.iter().take(BOTTLENECKS_PER_CRITERION) {
        flagged.insert(action.id.clone());
    }

    // (c) actions with the widest fan-out
    for id in widest_fan_out(plan) {
        flagged.insert(id);
    }

    (flagged.into_iter().collect(), hot_regions)
}

/// First actions, in plan order, whose out-degree equals the maximum
fn widest_fan_out(plan: &RecoveryPlan) -> Vec<String> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for action in &plan.actions {
        graph.add_node(action.id.as_str());
    }
    for action in &plan.actions {
        for dependency in &action.dependencies {
            if dependency != &action.id && graph.contains_node(dependency.as_str()) {
                graph.add_edge(dependency.as_str(), action.id.as_str(), ());
            }
        }
    }

    let degrees: Vec<(&str, usize)> = plan
        .actions
        .iter()
        .map(|a| {
            let id = a.id.as_str();
            (id, graph.neighbors_directed(id, Direction::Outgoing).count())
        })
        .collect();
    // with no dependents anywhere the maximum is 0 and every action reaches it
    let max = degrees.iter().map(|(_, d)| *d).max().unwrap_or(0);
    degrees
        .into_iter()
        .filter(|(_, d)| *d == max)
        .take(BOTTLENECKS_PER_CRITERION)
        .map(|(id, _)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recovery_model::PlanMode;

    fn action(id: &str, region: &str, minutes: u32) -> RecoveryAction {
        RecoveryAction::new(id, "svc", region).with_duration(minutes)
    }

    fn plan(actions: Vec<RecoveryAction>) -> RecoveryPlan {
        actions
            .into_iter()
            .fold(RecoveryPlan::new("plan", PlanMode::Automated), |p, a| p.with_action(a))
    }

    #[test]
    fn nodes_sorted_by_duration_stable() {
        let topology = build_scenario_topology(&plan(vec![
            action("a", "eu", 10),
            action("b", "eu", 30),
            action("c", "eu", 10),
            action("d", "eu", 30),
        ]));
        let ids: Vec<_> = topology.nodes.iter().map(|n| n.action_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert_eq!(topology.order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn dependents_invert_depends_on() {
        let topology = build_scenario_topology(&plan(vec![
            action("drain", "eu", 5),
            action("restart", "eu", 10).depends_on("drain"),
            action("verify", "eu", 3).depends_on("drain").depends_on("restart"),
        ]));
        assert_eq!(topology.node("drain").unwrap().dependents, vec!["restart", "verify"]);
        assert_eq!(topology.node("restart").unwrap().dependents, vec!["verify"]);
        assert!(topology.node("verify").unwrap().dependents.is_empty());
    }

    #[test]
    fn risk_factor_blends_four_terms() {
        // critical 0.9, 90/180 = 0.5, 2 tags / 4 = 0.5, first of two = 0.0
        let topology = build_scenario_topology(&plan(vec![
            action("big", "eu", 90).with_tag("critical").with_tag("db"),
            action("small", "eu", 18),
        ]));
        assert_eq!(topology.node("big").unwrap().risk_factor, 0.475);
        // 0.4, 0.1, 0.0, 1/2
        assert_eq!(topology.node("small").unwrap().risk_factor, 0.25);
    }

    #[test]
    fn regional_budget_is_capped() {
        let topology = build_scenario_topology(&plan(vec![
            action("a", "eu", 100),
            action("b", "us", 4),
            action("c", "us", 5),
        ]));
        let eu = &topology.regional_concurrency[0];
        assert_eq!(eu.region, "eu");
        assert_eq!(eu.budget, 3.0);
        let us = &topology.regional_concurrency[1];
        assert_eq!(us.action_count, 2);
        assert_eq!(us.total_minutes, 9);
        assert_eq!(us.budget, 2.12);
    }

    #[test]
    fn bottlenecks_union_three_criteria() {
        let topology = build_scenario_topology(&plan(vec![
            action("root", "eu", 5),
            action("x", "eu", 40).depends_on("root"),
            action("y", "us", 30).depends_on("root"),
            action("join", "ap", 1).depends_on("x").depends_on("y"),
        ]));
        // regions: eu 45 -> x, us 30 -> y; fan-in: join; fan-out: root
        assert_eq!(topology.bottlenecks, vec!["x", "y", "join", "root"]);
        assert_eq!(topology.hot_regions, vec!["eu", "us"]);
    }

    #[test]
    fn unknown_dependencies_do_not_become_bottlenecks() {
        let topology = build_scenario_topology(&plan(vec![
            action("a", "eu", 5).depends_on("ghost"),
            action("b", "eu", 5).depends_on("ghost"),
        ]));
        assert!(!topology.bottlenecks.contains(&"ghost".to_string()));
        // neither action has known dependents, so both tie at fan-out 0
        assert_eq!(topology.bottlenecks, vec!["a", "b"]);
    }

    #[test]
    fn independent_actions_tie_on_zero_fan_out() {
        let topology = build_scenario_topology(&plan(vec![
            action("a", "eu", 10),
            action("b", "eu", 5),
            action("c", "eu", 1),
        ]));
        // region anchor a, then the first two actions in plan order
        assert_eq!(topology.bottlenecks, vec!["a", "b"]);
        assert!((topology.bottleneck_density() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn readiness_windows_sum_to_total() {
        let topology = build_scenario_topology(&plan(vec![
            action("a", "eu", 50),
            action("b", "eu", 40),
            action("c", "eu", 30),
            action("d", "eu", 20),
        ]));
        let windows = topology.readiness_window_minutes;
        assert_eq!(windows.preflight, 50);
        assert_eq!(windows.critical, 70);
        assert_eq!(windows.stabilization, 20);
        assert_eq!(windows.total(), 140);
    }

    #[test]
    fn empty_plan_builds_empty_topology() {
        let topology = build_scenario_topology(&plan(vec![]));
        assert!(topology.nodes.is_empty());
        assert!(topology.bottlenecks.is_empty());
        assert_eq!(topology.bottleneck_density(), 0.0);
        assert_eq!(topology.readiness_window_minutes.total(), 0);
    }
}
