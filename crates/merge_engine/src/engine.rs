//! Filter → aggregate → rank facade

use contracts::{Cluster, DetectionRecord, Region, RepresentativePoint, ReportRow};
use tracing::{info, instrument};

use crate::aggregator::ClusterAggregator;
use crate::error::MergeError;
use crate::filter::RegionFilter;
use crate::precision::{Sensitivity, DEFAULT_SENSITIVITY};
use crate::ranker;

/// Merge engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    /// Raw sensitivity; validated by [`MergeEngine::new`]
    pub sensitivity: i64,

    /// `None` disables filtering
    pub region: Option<Region>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            sensitivity: i64::from(DEFAULT_SENSITIVITY),
            region: None,
        }
    }
}

/// Result of one merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub sensitivity: Sensitivity,

    /// Records handed to the engine
    pub input_records: usize,

    /// Records surviving the region filter
    pub retained_records: usize,

    /// Records outside the region
    pub filtered_out: usize,

    /// Clusters in rank order
    pub clusters: Vec<Cluster>,
}

impl MergeOutcome {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn report_rows(&self, policy: RepresentativePoint) -> Vec<ReportRow> {
        ranker::report_rows(&self.clusters, policy)
    }
}

/// Spatial deduplication engine
#[derive(Debug, Clone)]
pub struct MergeEngine {
    sensitivity: Sensitivity,
    filter: RegionFilter,
    aggregator: ClusterAggregator,
}

impl MergeEngine {
    /// Resolve precision before anything touches the data
    ///
    /// # Errors
    /// `InvalidSensitivity` outside `[0, 8]`
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        let sensitivity = Sensitivity::new(config.sensitivity)?;
        Ok(Self {
            sensitivity,
            filter: RegionFilter::new(config.region),
            aggregator: ClusterAggregator::new(sensitivity.precision()),
        })
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    #[instrument(
        name = "merge_run",
        skip(self, records),
        fields(sensitivity = self.sensitivity.level(), records = records.len())
    )]
    pub fn run(&self, records: Vec<DetectionRecord>) -> MergeOutcome {
        let input_records = records.len();
        let (retained, filtered_out) = self.filter.apply(records);
        let retained_records = retained.len();

        let clusters = ranker::rank(self.aggregator.aggregate(retained));

        info!(
            input = input_records,
            retained = retained_records,
            filtered_out,
            clusters = clusters.len(),
            threshold = %self.sensitivity.distance_threshold(),
            "Merge complete"
        );

        MergeOutcome {
            sensitivity: self.sensitivity,
            input_records,
            retained_records,
            filtered_out,
            clusters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::{AcquisitionTime, AcquisitionTimestamp, ClusterKey, SourceTag};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn rec(lat: f64, lon: f64, day: u32, hour: u8, minute: u8) -> DetectionRecord {
        DetectionRecord::new(
            lat,
            lon,
            NaiveDate::from_ymd_opt(2020, 12, day).unwrap(),
            AcquisitionTime::new(hour, minute).unwrap(),
            SourceTag::new("test"),
        )
        .unwrap()
    }

    fn engine(sensitivity: i64, region: Option<Region>) -> MergeEngine {
        MergeEngine::new(MergeConfig {
            sensitivity,
            region,
        })
        .unwrap()
    }

    /// Canonical view of a cluster set
    fn summary(outcome: &MergeOutcome) -> Vec<(ClusterKey, usize, AcquisitionTimestamp)> {
        let mut view: Vec<_> = outcome
            .clusters
            .iter()
            .map(|c| (c.key(), c.count(), c.earliest_timestamp()))
            .collect();
        view.sort_by_key(|(key, _, _)| *key);
        view
    }

    #[test]
    fn test_invalid_sensitivity_rejected() {
        for bad in [-1, 9, 100] {
            let err = MergeEngine::new(MergeConfig {
                sensitivity: bad,
                region: None,
            })
            .unwrap_err();
            assert_eq!(err, MergeError::InvalidSensitivity { value: bad });
        }
    }

    #[test]
    fn test_default_config() {
        let engine = MergeEngine::new(MergeConfig::default()).unwrap();
        assert_eq!(engine.sensitivity().level(), 2);
    }

    #[test]
    fn test_merge_and_no_merge_examples() {
        let records = vec![
            rec(9.16880, -79.53730, 13, 6, 36),
            rec(9.16883, -79.53727, 13, 7, 0),
        ];

        let merged = engine(3, None).run(records.clone());
        assert_eq!(merged.cluster_count(), 1);
        assert_eq!(merged.clusters[0].count(), 2);
        assert_eq!(
            merged.clusters[0].earliest_timestamp().to_string(),
            "2020-12-13 06:36:00"
        );

        let split = engine(8, None).run(records);
        assert_eq!(split.cluster_count(), 2);
        assert!(split.clusters.iter().all(|c| c.count() == 1));
    }

    #[test]
    fn test_ranked_report_rows() {
        // Six well-separated sites with counts [4, 4, 3, 3, 2, 2]
        let mut records = Vec::new();
        let sites = [(1.0, 4, 20), (2.0, 4, 10), (3.0, 3, 15), (4.0, 3, 5), (5.0, 2, 25), (6.0, 2, 1)];
        for (lat, count, day) in sites {
            for i in 0..count {
                records.push(rec(lat, 10.0, day + i, 12, 0));
            }
        }

        let outcome = engine(0, None).run(records);
        let rows = outcome.report_rows(RepresentativePoint::Earliest);
        let view: Vec<(usize, String)> = rows
            .iter()
            .map(|r| (r.count, r.earliest.date.to_string()))
            .collect();
        assert_eq!(
            view,
            vec![
                (4, "2020-12-10".to_string()),
                (4, "2020-12-20".to_string()),
                (3, "2020-12-05".to_string()),
                (3, "2020-12-15".to_string()),
                (2, "2020-12-01".to_string()),
                (2, "2020-12-25".to_string()),
            ]
        );
    }

    #[test]
    fn test_region_filter_counts() {
        let region = Region::new(10.0, -77.0, 7.0, -83.0);
        let outcome = engine(2, Some(region)).run(vec![
            rec(7.0, -83.0, 13, 1, 0),
            rec(10.0, -77.0, 13, 2, 0),
            rec(40.0, -77.0, 13, 3, 0),
        ]);
        assert_eq!(outcome.input_records, 3);
        assert_eq!(outcome.retained_records, 2);
        assert_eq!(outcome.filtered_out, 1);
        assert_eq!(outcome.cluster_count(), 2);
    }

    #[test]
    fn test_monotonic_on_nested_dataset() {
        // Level p separates exactly the first p + 1 points
        let offsets = [0.0, 0.3, 0.03, 0.003, 0.0003, 0.00003, 0.000003, 0.0000003, 0.00000003];
        let records: Vec<_> = offsets.iter().map(|d| rec(10.0 + d, -80.0, 13, 0, 0)).collect();

        let counts: Vec<usize> = (0..=8)
            .map(|level| engine(level, None).run(records.clone()).cluster_count())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_cells_straddle_across_levels() {
        // Share a cell at two places, fall on opposite sides of 0.15 at one
        let records = vec![rec(0.146, 0.0, 13, 0, 0), rec(0.154, 0.0, 13, 0, 0)];
        assert_eq!(engine(2, None).run(records.clone()).cluster_count(), 1);
        assert_eq!(engine(1, None).run(records).cluster_count(), 2);
    }

    #[test]
    fn test_shuffled_input_same_clusters() {
        let mut records = Vec::new();
        for i in 0..60u32 {
            let lat = 9.0 + f64::from(i % 7) * 0.01 + f64::from(i % 3) * 0.0001;
            let lon = -79.0 - f64::from(i % 5) * 0.01;
            records.push(rec(lat, lon, 1 + i % 28, (i % 24) as u8, (i % 60) as u8));
        }

        let engine = engine(2, None);
        let baseline = engine.run(records.clone());
        let mut rng = rand::rng();
        for _ in 0..10 {
            records.shuffle(&mut rng);
            let shuffled = engine.run(records.clone());
            assert_eq!(summary(&shuffled), summary(&baseline));
        }
    }

    fn arb_record() -> impl Strategy<Value = DetectionRecord> {
        (-900i32..=900, -1800i32..=1800, 1u32..=28, 0u8..24, 0u8..60).prop_map(
            |(lat, lon, day, hour, minute)| {
                rec(f64::from(lat) / 10.0, f64::from(lon) / 10.0, day, hour, minute)
            },
        )
    }

    /// `base + 0.d1d2...d8` with every digit ≤ 4, so no level sits on a half boundary
    fn low_digit_coordinate(base: f64) -> impl Strategy<Value = f64> {
        proptest::collection::vec(0u8..=4, 8).prop_map(move |digits| {
            let tail = digits
                .iter()
                .fold(0i64, |acc, d| acc * 10 + i64::from(*d));
            base + tail as f64 / 1e8
        })
    }

    proptest! {
        #[test]
        fn prop_permutation_invariance(
            records in proptest::collection::vec(arb_record(), 0..40),
            level in 0i64..=8,
            seed in any::<u64>(),
        ) {
            let engine = engine(level, None);
            let mut shuffled = records.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            shuffled.shuffle(&mut rng);
            prop_assert_eq!(summary(&engine.run(records)), summary(&engine.run(shuffled)));
        }

        #[test]
        fn prop_count_conservation(
            records in proptest::collection::vec(arb_record(), 0..40),
            level in 0i64..=8,
            corners in (-90.0f64..=90.0, -180.0f64..=180.0, -90.0f64..=90.0, -180.0f64..=180.0),
        ) {
            let region = Region::new(corners.0, corners.1, corners.2, corners.3);
            let outcome = engine(level, Some(region)).run(records);
            let total: usize = outcome.clusters.iter().map(Cluster::count).sum();
            prop_assert_eq!(total, outcome.retained_records);
            prop_assert_eq!(outcome.retained_records + outcome.filtered_out, outcome.input_records);
        }

        #[test]
        fn prop_sensitivity_monotonic(
            points in proptest::collection::vec((low_digit_coordinate(10.0), low_digit_coordinate(-80.0)), 1..30),
        ) {
            let records: Vec<_> = points.iter().map(|(lat, lon)| rec(*lat, *lon, 13, 0, 0)).collect();
            let counts: Vec<usize> = (0..=8)
                .map(|level| engine(level, None).run(records.clone()).cluster_count())
                .collect();
            prop_assert!(counts.windows(2).all(|w| w[0] <= w[1]), "counts {:?}", counts);
        }
    }
}
