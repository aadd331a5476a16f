//! Smoothed per-node risk
//!
//! Trailing moving average over `risk_factor * 100` in topology node order.
//! Until the window fills, a node keeps its own raw value.

use crate::topology::ScenarioTopology;
use recovery_model::numeric::{mean_or, round3};
use serde::{Deserialize, Serialize};

/// Moving average window size
pub const SMOOTHING_WINDOW: usize = 4;

/// Raw and smoothed risk of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRisk {
    pub action_id: String,
    /// `risk_factor * 100`
    pub raw: f64,
    /// Smoothed value scaled back into `[0,1]`
    pub smoothed: f64,
}

/// Smooth node risk across the topology
///
/// Walks `nodes` (descending duration), not the plan-order `order` list.
#[must_use]
pub fn topology_risk_profile(topology: &ScenarioTopology) -> Vec<NodeRisk> {
    let raw: Vec<f64> = topology.nodes.iter().map(|n| n.risk_factor * 100.0).collect();

    topology
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let value = if i + 1 < SMOOTHING_WINDOW {
                raw[i]
            } else {
                mean_or(&raw[i + 1 - SMOOTHING_WINDOW..=i], raw[i])
            };
            NodeRisk {
                action_id: node.action_id.clone(),
                raw: raw[i],
                smoothed: round3(value / 100.0),
            }
        })
        .collect()
}
