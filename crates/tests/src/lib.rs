//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 → 合约快照测试
//! - 端到端测试：CSV 文件 → 合并引擎 → GeoJSON 文件（无需网络）

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::Region;

    const PANAMA: &str = r#"{
        "country_bounding_box": [7.2205414901, -82.9657830472, 9.61161001224, -77.2425664944],
        "csv_urls": [
            "https://firms.modaps.eosdis.nasa.gov/data/active_fire/noaa-20-viirs-c2/csv/J1_VIIRS_C2_Global_7d.csv",
            "https://firms.modaps.eosdis.nasa.gov/data/active_fire/suomi-npp-viirs-c2/csv/SUOMI_VIIRS_C2_Global_7d.csv"
        ],
        "csv_output_directory": "csvs"
    }"#;

    #[test]
    fn test_json_and_toml_agree() {
        let from_json = ConfigLoader::load_from_str(PANAMA, ConfigFormat::Json).unwrap();
        let toml = ConfigLoader::to_toml(&from_json).unwrap();
        let from_toml = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(from_json, from_toml);

        assert_eq!(
            from_json.country_bounding_box,
            Region::new(7.2205414901, -82.9657830472, 9.61161001224, -77.2425664944)
        );
        assert_eq!(from_json.download_timeout_secs, 30);
        assert!(!from_json.allow_partial_download);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    use bytes::Bytes;
    use contracts::{
        cache_file_name, ContractError, FeatureCollection, FetchedSource, Region,
        RepresentativePoint, SourceFetcher,
    };
    use dispatcher::{ConsoleReport, Dispatcher, FeatureAssembler, SinkConfig};
    use ingestion::{download_sources, DownloadConfig, SourceSet};
    use merge_engine::{MergeConfig, MergeEngine};
    use observability::RunMetricsAggregator;

    const HEADER: &str = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,confidence,version,bright_ti5,frp,daynight\n";

    /// NOAA-20 pass: one fire seen twice, one seen once, one outside Panama
    const J1: &str = "\
9.16883,-79.53727,340.0,0.39,0.36,2020-12-13,0700,1,high,2.0NRT,291.5,5.1,N
9.16880,-79.53730,333.2,0.39,0.36,2020-12-13,0636,1,nominal,2.0NRT,290.1,3.4,N
8.50000,-80.10000,330.0,0.39,0.36,2020-12-14,1805,1,low,2.0NRT,289.0,1.2,D
19.4326,-99.13320,330.0,0.39,0.36,2020-12-14,1805,1,low,2.0NRT,289.0,1.2,D
";

    /// Suomi-NPP pass: same fire again plus a malformed row
    const SUOMI: &str = "\
9.16890,-79.53710,338.0,0.39,0.36,2020-12-12,2350,N,nominal,2.0NRT,290.7,4.0,N
not-a-lat,-79.5,330.0,0.39,0.36,2020-12-13,0636,N,nominal,2.0NRT,290.1,3.4,N
";

    fn seed(dir: &Path) {
        fs::write(dir.join("J1_VIIRS_C2_Global_7d.csv"), format!("{HEADER}{J1}")).unwrap();
        fs::write(dir.join("SUOMI_VIIRS_C2_Global_7d.csv"), format!("{HEADER}{SUOMI}")).unwrap();
    }

    fn panama() -> Region {
        Region::new(7.2205414901, -82.9657830472, 9.61161001224, -77.2425664944)
    }

    /// End-to-end test: CSV cache -> MergeEngine -> Dispatcher -> GeoJSON
    #[tokio::test]
    async fn test_e2e_cached_csvs_to_geojson() {
        let cache = tempfile::tempdir().unwrap();
        seed(cache.path());
        let out = tempfile::tempdir().unwrap();
        let output = out.path().join("fires.geojson");

        let batch = SourceSet::discover(cache.path()).unwrap().load().unwrap();
        assert_eq!(batch.records.len(), 5);
        assert_eq!(batch.stats.skipped(), 1);

        let engine = MergeEngine::new(MergeConfig {
            sensitivity: 3,
            region: Some(panama()),
        })
        .unwrap();
        let outcome = engine.run(batch.records);
        assert_eq!(outcome.filtered_out, 1);
        assert_eq!(outcome.cluster_count(), 2);

        // Earliest detection comes from the second source
        let top = &outcome.clusters[0];
        assert_eq!(top.count(), 3);
        assert_eq!(top.earliest_member().source.as_str(), "SUOMI_VIIRS_C2_Global_7d.csv");
        assert_eq!(top.earliest_timestamp().to_string(), "2020-12-12 23:50:00");

        let collection = FeatureAssembler::default().assemble(&outcome.clusters);
        Dispatcher::from_configs(&[SinkConfig::log("console"), SinkConfig::file("geojson", &output)])
            .unwrap()
            .dispatch(&collection)
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "MultiPoint");
        assert_eq!(features[0]["geometry"]["coordinates"][0][0], 9.1689);
        assert_eq!(features[0]["geometry"]["coordinates"][0][1], -79.5371);
        assert_eq!(features[0]["properties"]["ACQ_DATE"], "2020-12-12");
        assert_eq!(features[0]["properties"]["ACQ_TIME"], "2350");
        assert_eq!(features[1]["properties"]["LATITUDE"], 8.5);

        let back: FeatureCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back, collection);

        let report = ConsoleReport::new(
            outcome.report_rows(RepresentativePoint::Earliest),
            outcome.sensitivity.distance_threshold(),
            outcome.retained_records,
            "config.json",
            &output,
        );
        assert_eq!(
            report.threshold_line(),
            "Fires must be within 111 m of one another to be merged."
        );
        assert_eq!(report.merge_line(), "Using this method to merge 4 into 2 wildfires.");
    }

    #[test]
    fn test_representative_point_is_uniform() {
        let cache = tempfile::tempdir().unwrap();
        seed(cache.path());
        let batch = SourceSet::discover(cache.path()).unwrap().load().unwrap();
        let outcome = MergeEngine::new(MergeConfig {
            sensitivity: 3,
            region: Some(panama()),
        })
        .unwrap()
        .run(batch.records);

        for policy in [
            RepresentativePoint::Earliest,
            RepresentativePoint::FirstSeen,
            RepresentativePoint::Rounded,
            RepresentativePoint::Centroid,
        ] {
            let collection = FeatureAssembler::new(policy).assemble(&outcome.clusters);
            let rows = outcome.report_rows(policy);
            for (feature, row) in collection.features.iter().zip(&rows) {
                assert_eq!(feature.geometry, contracts::Geometry::point(row.latitude, row.longitude));
            }
        }
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_output() {
        let out = tempfile::tempdir().unwrap();
        let output = out.path().join("fires.geojson");
        fs::write(&output, "previous run").unwrap();

        // Destination directory disappears between runs
        let missing = out.path().join("gone/fires.geojson");
        let result = Dispatcher::from_configs(&[SinkConfig::file("geojson", &missing)])
            .unwrap()
            .dispatch(&FeatureCollection::default())
            .await;
        assert!(result.is_err());
        assert!(!missing.exists());
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous run");
    }

    /// Serves canned CSV bodies
    struct CannedFetcher {
        bodies: HashMap<String, String>,
    }

    impl SourceFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedSource, ContractError> {
            let body = self
                .bodies
                .get(url)
                .ok_or_else(|| ContractError::source_fetch(url, "HTTP 503 Service Unavailable"))?;
            Ok(FetchedSource {
                url: url.to_string(),
                file_name: cache_file_name(url).unwrap_or_default(),
                body: Bytes::from(body.clone()),
            })
        }
    }

    /// Download -> cache -> merge, with one feed down and partial coverage allowed
    #[tokio::test]
    async fn test_e2e_download_then_merge() {
        let cache = tempfile::tempdir().unwrap();
        fs::write(cache.path().join("retired_feed.csv"), HEADER).unwrap();

        let j1 = "https://example.org/csv/J1_VIIRS_C2_Global_7d.csv".to_string();
        let suomi = "https://example.org/csv/SUOMI_VIIRS_C2_Global_7d.csv".to_string();
        let fetcher = CannedFetcher {
            bodies: HashMap::from([(j1.clone(), format!("{HEADER}{J1}"))]),
        };
        let policy = DownloadConfig {
            allow_partial: true,
            ..Default::default()
        };

        let report = download_sources(&fetcher, &[j1, suomi.clone()], cache.path(), &policy)
            .await
            .unwrap();
        assert_eq!(report.failed, vec![suomi]);
        assert_eq!(report.pruned, vec!["retired_feed.csv".to_string()]);

        let mut metrics = RunMetricsAggregator::new();
        let batch = SourceSet::discover(cache.path()).unwrap().load().unwrap();
        for source in &batch.stats.sources {
            metrics.update_source(source.source.as_str(), source.records, source.skipped);
        }

        let outcome = MergeEngine::new(MergeConfig::default()).unwrap().run(batch.records);
        metrics.update_merge(outcome.retained_records, outcome.filtered_out, &outcome.clusters);

        let summary = metrics.summary();
        assert_eq!(summary.records_ingested, 4);
        assert_eq!(summary.clusters, 3);
        assert_eq!(outcome.clusters[0].count(), 2);
    }
}
