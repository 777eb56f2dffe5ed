/// Drainage network with a precomputed upstream index.
///
/// Units are stored once in insertion order. Building the network inverts
/// the `downstream_of` relation so that looking up the immediate upstream
/// units of any code is a single hash lookup instead of a scan of the
/// whole unit table.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::model::{HruRecord, HydrologicUnit, NetworkError, TraceError, DEFAULT_TERMINAL_CODE};

#[derive(Debug, Clone, Default)]
pub struct DrainageNetwork {
    /// Units in the order they were supplied.
    units: Vec<HydrologicUnit>,
    /// Code -> position in `units`.
    index: HashMap<String, usize>,
    /// Code -> codes of units draining directly into it, in insertion order.
    /// Keys may name codes outside the network (out-of-area receivers).
    upstream: HashMap<String, Vec<String>>,
}

impl DrainageNetwork {
    /// Builds a network from units, rejecting duplicate or empty codes.
    pub fn from_units<I>(units: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = HydrologicUnit>,
    {
        let mut network = DrainageNetwork::default();

        for unit in units {
            if unit.code.is_empty() {
                return Err(NetworkError::EmptyCode {
                    downstream: unit.downstream_of,
                });
            }
            if network.index.contains_key(&unit.code) {
                warn!(code = %unit.code, "duplicate unit code in drainage network");
                return Err(NetworkError::DuplicateUnit(unit.code));
            }

            if let Some(down) = &unit.downstream_of {
                network
                    .upstream
                    .entry(down.clone())
                    .or_default()
                    .push(unit.code.clone());
            }
            network.index.insert(unit.code.clone(), network.units.len());
            network.units.push(unit);
        }

        debug!(
            units = network.units.len(),
            receivers = network.upstream.len(),
            "built drainage network"
        );
        Ok(network)
    }

    /// Builds a network from `(code, downstream)` pairs. Any downstream value
    /// listed in `terminal_codes`, or an empty string, marks a terminal unit.
    pub fn from_pairs<'a, I>(pairs: I, terminal_codes: &[&str]) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_units(
            pairs
                .into_iter()
                .map(|(code, down)| HydrologicUnit::new(code, normalize_downstream(down, terminal_codes))),
        )
    }

    /// Builds a network from HRU attribute rows (`HUC12 -> ToHUC`).
    pub fn from_hru_records(records: &[HruRecord], terminal_codes: &[&str]) -> Result<Self, NetworkError> {
        Self::from_pairs(
            records.iter().map(|r| (r.huc12.as_str(), r.to_huc.as_str())),
            terminal_codes,
        )
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Looks up a unit by code. Returns `None` if not found.
    pub fn get(&self, code: &str) -> Option<&HydrologicUnit> {
        self.index.get(code).map(|&i| &self.units[i])
    }

    /// All unit codes, in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.code.as_str())
    }

    pub fn units(&self) -> &[HydrologicUnit] {
        &self.units
    }

    /// The code a unit drains into, or `None` for terminal and unknown units.
    pub fn downstream_of(&self, code: &str) -> Option<&str> {
        self.get(code).and_then(|u| u.downstream_of.as_deref())
    }

    /// Codes of units that drain directly into `code`, in insertion order.
    /// Empty for headwaters and for codes with no upstream units.
    pub fn upstream_of(&self, code: &str) -> &[String] {
        self.upstream.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Units with no upstream units.
    pub fn headwaters(&self) -> Vec<&str> {
        self.codes()
            .filter(|code| self.upstream_of(code).is_empty())
            .collect()
    }

    /// Units that are terminal or drain to a code outside the network.
    pub fn outlets(&self) -> Vec<&str> {
        self.units
            .iter()
            .filter(|u| match &u.downstream_of {
                None => true,
                Some(down) => !self.contains(down),
            })
            .map(|u| u.code.as_str())
            .collect()
    }

    /// Follows `downstream_of` from `code` until a terminal unit or a code
    /// outside the network. The result starts with `code`; an out-of-network
    /// receiver is included as the last element.
    pub fn downstream_path(&self, code: &str) -> Result<Vec<String>, TraceError> {
        if !self.contains(code) {
            return Err(TraceError::UnitNotFound(code.to_string()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut path = vec![code.to_string()];
        seen.insert(code);

        let mut current = code;
        while let Some(next) = self.downstream_of(current) {
            if !seen.insert(next) {
                warn!(start = code, revisited = next, "cycle in downstream path");
                return Err(TraceError::CycleDetected {
                    start: code.to_string(),
                    revisited: next.to_string(),
                });
            }
            path.push(next.to_string());
            if !self.contains(next) {
                break;
            }
            current = next;
        }

        Ok(path)
    }
}

fn normalize_downstream<'a>(down: &'a str, terminal_codes: &[&str]) -> Option<&'a str> {
    let down = down.trim();
    if down.is_empty() || terminal_codes.contains(&down) {
        None
    } else {
        Some(down)
    }
}

/// Terminal codes used when the caller supplies none.
pub fn default_terminal_codes() -> Vec<&'static str> {
    vec![DEFAULT_TERMINAL_CODE]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
