//! Helpers for hydrologic time-series and drainage network analysis.
//!
//! - `network` / `trace` — drainage networks and upstream tracing from an outlet.
//! - `selection` — the HRUs and stream segments to draw for a traced network.
//! - `water_year` — water-year calendar conversions.
//! - `standardize` — mean/std and L-moment standardization.
//! - `config` / `logging` — TOML settings and `tracing` subscriber setup.

pub mod config;
pub mod logging;
pub mod model;
pub mod network;
pub mod selection;
pub mod standardize;
pub mod trace;
pub mod water_year;

pub use model::{
    HruRecord, HydrologicUnit, NetworkError, SegmentRecord, SelectionError, StatsError, TraceError,
};
pub use network::DrainageNetwork;
pub use selection::{select_network, NetworkSelection};
pub use trace::{trace_upstream, trace_upstream_levels, trace_upstream_with, SiblingOrder, TraceOptions};
pub use water_year::WaterYearConvention;
