//! Presentation order of clusters

use std::cmp::Ordering;

use contracts::{Cluster, RepresentativePoint, ReportRow};

/// Total order: count descending, earliest timestamp ascending, key ascending
pub fn compare(a: &Cluster, b: &Cluster) -> Ordering {
    b.count()
        .cmp(&a.count())
        .then_with(|| a.earliest_timestamp().cmp(&b.earliest_timestamp()))
        .then_with(|| a.key().cmp(&b.key()))
}

/// Sort clusters into report order; contents are untouched
pub fn rank(mut clusters: Vec<Cluster>) -> Vec<Cluster> {
    clusters.sort_by(compare);
    clusters
}

/// Report rows for already-ranked clusters
pub fn report_rows(ranked: &[Cluster], policy: RepresentativePoint) -> Vec<ReportRow> {
    ranked.iter().map(|c| c.report_row(policy)).collect()
}
