//! Rectangular region filter

use contracts::{DetectionRecord, Region, RegionBounds};
use tracing::debug;

/// Drops records outside the configured region; `None` passes everything
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    bounds: Option<RegionBounds>,
}

impl RegionFilter {
    pub fn new(region: Option<Region>) -> Self {
        Self {
            bounds: region.map(|r| r.bounds()),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        self.bounds.is_none()
    }

    /// Inclusive on every edge
    pub fn retains(&self, record: &DetectionRecord) -> bool {
        self.bounds
            .as_ref()
            .is_none_or(|b| b.contains(record.latitude, record.longitude))
    }

    /// Keep retained records in input order; returns `(kept, dropped_count)`
    pub fn apply(&self, records: Vec<DetectionRecord>) -> (Vec<DetectionRecord>, usize) {
        let total = records.len();
        let kept: Vec<DetectionRecord> = records.into_iter().filter(|r| self.retains(r)).collect();
        let dropped = total - kept.len();
        debug!(total, kept = kept.len(), dropped, "Region filter applied");
        (kept, dropped)
    }
}
