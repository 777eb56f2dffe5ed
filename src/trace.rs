//! Upstream network tracing.
//!
//! Breadth-first expansion from an outlet against the network's upstream
//! index. Every code placed in the result is remembered; reaching one a
//! second time can only happen through a cycle in `downstream_of`, which is
//! reported as `TraceError::CycleDetected` instead of looping forever.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::TraceError;
use crate::network::DrainageNetwork;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Order in which the upstream units of a single parent are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingOrder {
    /// Lexicographic by code. Reproducible regardless of input row order.
    #[default]
    Sorted,
    /// The order in which units were supplied to the network.
    Insertion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceOptions {
    #[serde(default)]
    pub sibling_order: SiblingOrder,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Returns `outlet` followed by every unit that drains through it, in
/// breadth-first order, siblings sorted by code.
///
/// An outlet that is not in the network yields `[outlet]`.
pub fn trace_upstream(network: &DrainageNetwork, outlet: &str) -> Result<Vec<String>, TraceError> {
    trace_upstream_with(network, outlet, &TraceOptions::default())
}

/// As `trace_upstream`, with explicit options.
pub fn trace_upstream_with(
    network: &DrainageNetwork,
    outlet: &str,
    options: &TraceOptions,
) -> Result<Vec<String>, TraceError> {
    let levels = trace_upstream_levels(network, outlet, options)?;
    Ok(levels.into_iter().flatten().collect())
}

/// Upstream trace grouped by distance from the outlet.
///
/// Level 0 is `[outlet]`; level k holds the units exactly k `downstream_of`
/// hops above it. Within a level, units are grouped by parent in the order
/// the parents appear in the previous level.
pub fn trace_upstream_levels(
    network: &DrainageNetwork,
    outlet: &str,
    options: &TraceOptions,
) -> Result<Vec<Vec<String>>, TraceError> {
    if !network.contains(outlet) {
        debug!(outlet, "outlet is not a unit of the network");
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(network.len() + 1);
    visited.insert(outlet);

    let mut levels = vec![vec![outlet.to_string()]];
    let mut frontier = upstream_siblings(network, outlet, options.sibling_order);

    while !frontier.is_empty() {
        for &code in &frontier {
            if !visited.insert(code) {
                warn!(outlet, revisited = code, "cycle in drainage network");
                return Err(TraceError::CycleDetected {
                    start: outlet.to_string(),
                    revisited: code.to_string(),
                });
            }
        }

        let next: Vec<&str> = frontier
            .iter()
            .flat_map(|code| upstream_siblings(network, code, options.sibling_order))
            .collect();

        debug!(outlet, depth = levels.len(), units = frontier.len(), "traced upstream level");
        levels.push(frontier.iter().map(|c| c.to_string()).collect());
        frontier = next;
    }

    Ok(levels)
}

fn upstream_siblings<'a>(network: &'a DrainageNetwork, code: &str, order: SiblingOrder) -> Vec<&'a str> {
    let mut siblings: Vec<&str> = network.upstream_of(code).iter().map(String::as_str).collect();
    if order == SiblingOrder::Sorted {
        siblings.sort_unstable();
    }
    siblings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
