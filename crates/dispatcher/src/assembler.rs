//! Ranked clusters → feature collection

use contracts::{Cluster, Feature, FeatureCollection, FireProperties, Geometry, RepresentativePoint};
use tracing::debug;

/// Builds the external feature collection from ranked clusters
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler {
    policy: RepresentativePoint,
}

impl FeatureAssembler {
    pub fn new(policy: RepresentativePoint) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RepresentativePoint {
        self.policy
    }

    /// One feature per cluster, in the given order
    ///
    /// Geometry follows the representative-point policy; properties always
    /// describe the earliest member.
    pub fn assemble(&self, ranked: &[Cluster]) -> FeatureCollection {
        let features: Vec<Feature> = ranked.iter().map(|c| self.feature(c)).collect();
        debug!(features = features.len(), policy = ?self.policy, "Features assembled");
        FeatureCollection::new(features)
    }

    fn feature(&self, cluster: &Cluster) -> Feature {
        let (latitude, longitude) = cluster.representative(self.policy);
        let earliest = cluster.earliest_member();
        Feature::new(
            Geometry::point(latitude, longitude),
            FireProperties {
                latitude: earliest.latitude,
                longitude: earliest.longitude,
                acq_date: earliest.acq_date,
                acq_time: earliest.acq_time,
            },
        )
    }
}
