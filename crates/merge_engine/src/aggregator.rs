//! Grouping by rounded coordinate key

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use contracts::{Cluster, ClusterKey, DetectionRecord};

use crate::precision::Precision;

/// Groups records sharing a rounded `(lat, lon)` key
#[derive(Debug, Clone, Copy)]
pub struct ClusterAggregator {
    precision: Precision,
}

impl ClusterAggregator {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn key_for(&self, record: &DetectionRecord) -> ClusterKey {
        ClusterKey {
            lat_units: self.precision.round_units(record.latitude),
            lon_units: self.precision.round_units(record.longitude),
            precision: self.precision.decimal_places,
        }
    }

    /// Group `records`; clusters come back in key order
    ///
    /// The earliest member is replaced only by a strictly smaller timestamp,
    /// so among equal timestamps the first one encountered is kept.
    pub fn aggregate(&self, records: Vec<DetectionRecord>) -> Vec<Cluster> {
        let mut clusters: BTreeMap<ClusterKey, Cluster> = BTreeMap::new();

        for record in records {
            let key = self.key_for(&record);
            match clusters.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(Cluster::new(key, record));
                }
                Entry::Occupied(mut slot) => slot.get_mut().push(record),
            }
        }

        clusters.into_values().collect()
    }
}
