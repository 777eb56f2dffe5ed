//! Feature selection for upstream network maps.
//!
//! A plot of the network upstream of an outlet needs three things: the HRU
//! polygons to fill, the outlet polygon to highlight, and the stream
//! segments those HRUs drain into. This module computes that subset as plain
//! data; drawing it is left to whatever graphics library the caller uses.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::logging::log_trace_summary;
use crate::model::{HruRecord, SegmentRecord, SelectionError, TraceError};
use crate::network::DrainageNetwork;
use crate::trace::{trace_upstream_levels, TraceOptions};

/// Features to draw for the network upstream of one outlet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSelection {
    pub outlet: String,
    /// HRU id of the outlet row, used to label the plot.
    pub outlet_hru_id: u64,
    /// Plot title, `"Segment: {outlet_hru_id}"`.
    pub title: String,
    /// Traced unit codes, outlet first.
    pub hru_codes: Vec<String>,
    /// Distinct segment ids of the traced HRUs, in trace order.
    pub segment_ids: Vec<u64>,
    /// Segment records whose id is in `segment_ids`, in input order.
    pub segments: Vec<SegmentRecord>,
}

impl NetworkSelection {
    /// HRU rows belonging to the selection, in input order.
    pub fn hru_rows<'a>(&self, hrus: &'a [HruRecord]) -> Vec<&'a HruRecord> {
        let codes: HashSet<&str> = self.hru_codes.iter().map(String::as_str).collect();
        hrus.iter().filter(|r| codes.contains(r.huc12.as_str())).collect()
    }

    /// The outlet's own row, drawn with a distinct style.
    pub fn outlet_row<'a>(&self, hrus: &'a [HruRecord]) -> Option<&'a HruRecord> {
        hrus.iter().find(|r| r.huc12 == self.outlet)
    }
}

/// Traces upstream from `outlet` over the HRU table and selects the
/// segments to draw.
///
/// Fails with `TraceError::UnitNotFound` when the outlet has no HRU row,
/// since the selection is labelled by the outlet's HRU id.
pub fn select_network(
    outlet: &str,
    hrus: &[HruRecord],
    segments: &[SegmentRecord],
    terminal_codes: &[&str],
    options: &TraceOptions,
) -> Result<NetworkSelection, SelectionError> {
    let outlet_row = hrus
        .iter()
        .find(|r| r.huc12 == outlet)
        .ok_or_else(|| TraceError::UnitNotFound(outlet.to_string()))?;

    let network = DrainageNetwork::from_hru_records(hrus, terminal_codes)?;
    let levels = trace_upstream_levels(&network, outlet, options)?;
    log_trace_summary(outlet, &levels);
    let hru_codes: Vec<String> = levels.into_iter().flatten().collect();

    let by_code: HashMap<&str, &HruRecord> =
        hrus.iter().map(|r| (r.huc12.as_str(), r)).collect();

    let mut seen = HashSet::new();
    let segment_ids: Vec<u64> = hru_codes
        .iter()
        .filter_map(|code| by_code.get(code.as_str()))
        .map(|r| r.hru_segment)
        .filter(|id| seen.insert(*id))
        .collect();

    let selected: Vec<SegmentRecord> = segments
        .iter()
        .filter(|s| seen.contains(&s.seg_id))
        .cloned()
        .collect();

    debug!(
        outlet,
        hrus = hru_codes.len(),
        segments = selected.len(),
        "selected upstream network"
    );

    Ok(NetworkSelection {
        outlet: outlet.to_string(),
        outlet_hru_id: outlet_row.hru_id,
        title: format!("Segment: {}", outlet_row.hru_id),
        hru_codes,
        segment_ids,
        segments: selected,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn hru(huc12: &str, to_huc: &str, hru_id: u64, segment: u64) -> HruRecord {
        HruRecord {
            huc12: huc12.to_string(),
            to_huc: to_huc.to_string(),
            hru_id,
            hru_segment: segment,
        }
    }

    fn seg(id: u64) -> SegmentRecord {
        SegmentRecord { seg_id: id, name: None }
    }

    /// A and D drain into B (segment 2), B into C (segment 3).
    /// A and D share segment 1; E is a separate basin on segment 9.
    fn table() -> Vec<HruRecord> {
        vec![
            hru("A", "B", 11, 1),
            hru("B", "C", 12, 2),
            hru("D", "B", 14, 1),
            hru("C", "0", 13, 3),
            hru("E", "0", 15, 9),
        ]
    }

    fn segments() -> Vec<SegmentRecord> {
        vec![seg(1), seg(2), seg(3), seg(9)]
    }

    #[test]
    fn test_selection_from_confluence() {
        let selection =
            select_network("B", &table(), &segments(), &["0"], &TraceOptions::default()).unwrap();
        assert_eq!(selection.hru_codes, vec!["B", "A", "D"]);
        assert_eq!(selection.segment_ids, vec![2, 1]);
        assert_eq!(selection.segments, vec![seg(1), seg(2)]);
        assert_eq!(selection.outlet_hru_id, 12);
        assert_eq!(selection.title, "Segment: 12");
    }

    #[test]
    fn test_selection_excludes_other_basins() {
        let selection =
            select_network("C", &table(), &segments(), &["0"], &TraceOptions::default()).unwrap();
        assert!(!selection.hru_codes.contains(&"E".to_string()));
        assert!(!selection.segment_ids.contains(&9));
        assert_eq!(selection.segment_ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_selection_for_missing_outlet_fails() {
        let err = select_network("Q", &table(), &segments(), &["0"], &TraceOptions::default())
            .unwrap_err();
        assert_eq!(err, SelectionError::Trace(TraceError::UnitNotFound("Q".to_string())));
    }

    #[test]
    fn test_selection_surfaces_cycles() {
        let hrus = vec![hru("A", "B", 1, 1), hru("B", "A", 2, 2)];
        let err = select_network("A", &hrus, &[], &["0"], &TraceOptions::default()).unwrap_err();
        assert!(matches!(err, SelectionError::Trace(TraceError::CycleDetected { .. })));
    }

    #[test]
    fn test_selection_surfaces_duplicate_rows() {
        let hrus = vec![hru("A", "0", 1, 1), hru("A", "0", 2, 2)];
        let err = select_network("A", &hrus, &[], &["0"], &TraceOptions::default()).unwrap_err();
        assert!(matches!(err, SelectionError::Network(_)));
    }

    #[test]
    fn test_row_helpers_filter_the_table() {
        let hrus = table();
        let selection =
            select_network("B", &hrus, &segments(), &["0"], &TraceOptions::default()).unwrap();
        let rows: Vec<_> = selection.hru_rows(&hrus).iter().map(|r| r.hru_id).collect();
        assert_eq!(rows, vec![11, 12, 14]);
        assert_eq!(selection.outlet_row(&hrus).map(|r| r.hru_id), Some(12));
    }

    #[test]
    fn test_selection_serializes_to_json() {
        let selection =
            select_network("A", &table(), &segments(), &["0"], &TraceOptions::default()).unwrap();
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["title"], "Segment: 11");
        assert_eq!(json["hru_codes"], serde_json::json!(["A"]));
    }
}
