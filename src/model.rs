/// Core data types for hydrologic network tracing.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small constructors and no I/O: units, the
/// attribute-table rows a caller materializes, and the error enums.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Downstream code used by HUC attribute tables for units that drain out of
/// the study area (basin outlets).
pub const DEFAULT_TERMINAL_CODE: &str = "0";

// ---------------------------------------------------------------------------
// Unit types
// ---------------------------------------------------------------------------

/// A node in a drainage network, identified by a unique code (e.g. a HUC-12).
///
/// `downstream_of` is `None` for a terminal unit. A `Some` code that is not
/// itself a unit of the network means the unit drains outside the modeled
/// area; that is legal and treated as terminal for tracing purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrologicUnit {
    pub code: String,
    pub downstream_of: Option<String>,
}

impl HydrologicUnit {
    pub fn new(code: impl Into<String>, downstream_of: Option<&str>) -> Self {
        Self {
            code: code.into(),
            downstream_of: downstream_of.map(String::from),
        }
    }

    /// Unit with no downstream target.
    pub fn terminal(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            downstream_of: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute-table rows
// ---------------------------------------------------------------------------

/// One row of an HRU attribute table.
///
/// Field names follow the columns of the national HRU/HUC-12 tables
/// (`HUC12`, `ToHUC`, `hru_id`, `hru_segmen`) so a caller can deserialize
/// rows straight from CSV, JSON, or a GIS export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HruRecord {
    #[serde(rename = "HUC12")]
    pub huc12: String,
    #[serde(rename = "ToHUC")]
    pub to_huc: String,
    pub hru_id: u64,
    #[serde(rename = "hru_segmen")]
    pub hru_segment: u64,
}

/// One stream segment of the routing network. Geometry stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub seg_id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building a `DrainageNetwork`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Two units share the same code.
    #[error("duplicate unit code: {0}")]
    DuplicateUnit(String),
    /// A unit was supplied with an empty code.
    #[error("unit with empty code (downstream of {downstream:?})")]
    EmptyCode { downstream: Option<String> },
}

/// Errors raised by upstream and downstream traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The requested unit is not part of the network.
    ///
    /// `trace_upstream` treats a missing outlet as a headwater and never
    /// returns this; it is raised by callers that need the unit's own row.
    #[error("unit not found: {0}")]
    UnitNotFound(String),
    /// A traversal started at `start` reached `revisited` a second time,
    /// meaning the `downstream_of` relation contains a cycle.
    #[error("cycle detected tracing from {start}: {revisited} was reached twice")]
    CycleDetected { start: String, revisited: String },
}

/// Errors raised while selecting the features of an upstream network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Errors raised by the standardization routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No values were supplied.
    #[error("cannot standardize an empty series")]
    Empty,
    /// The estimator needs more observations than were supplied.
    #[error("need at least {needed} values, got {got}")]
    TooFewValues { needed: usize, got: usize },
    /// A NaN or infinite value at the given index.
    #[error("non-finite value at index {0}")]
    NonFinite(usize),
    /// All values are identical, so the spread is zero.
    #[error("series has zero spread")]
    ZeroSpread,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
