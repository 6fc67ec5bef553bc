//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use contracts::RepresentativePoint;
use merge_engine::DEFAULT_SENSITIVITY;

/// Fire Finder - merge satellite fire detections into distinct wildfires
#[derive(Parser, Debug)]
#[command(
    name = "fire-finder",
    author,
    version,
    about = "Merge VIIRS fire detections into ranked wildfires",
    long_about = "Reads cached satellite fire-detection CSVs, keeps detections inside the \n\
                  configured bounding box, merges detections that round to the same \n\
                  coordinate, and writes the ranked wildfires as a GeoJSON feature collection."
)]
pub struct Cli {
    /// The path to where the GeoJSON file will be written
    #[arg(required_unless_present = "dry_run")]
    pub output_file: Option<PathBuf>,

    /// Download new CSV files and remove stale ones before merging
    #[arg(long, env = "FIRE_FINDER_DOWNLOAD_CSVS")]
    pub download_csvs: bool,

    /// Path to configuration file (JSON or TOML)
    #[arg(long, default_value = "config.json", env = "FIRE_FINDER_CONFIG_FILE")]
    pub config_file: PathBuf,

    /// Value between 0 and 8: 0=111 km; 1=11.1 km; 2=1.11 km; 3=111 m; 4=11.1 m;
    /// 5=1.11 m; 6=0.111 m; 7=1.11 cm; 8=1.11 mm
    #[arg(
        long,
        default_value_t = i64::from(DEFAULT_SENSITIVITY),
        allow_negative_numbers = true,
        env = "FIRE_FINDER_MERGE_SENSITIVITY"
    )]
    pub merge_sensitivity: i64,

    /// Which coordinate represents a merged wildfire
    #[arg(
        long,
        value_enum,
        default_value = "earliest",
        env = "FIRE_FINDER_REPRESENTATIVE_POINT"
    )]
    pub representative_point: RepresentativePointArg,

    /// Keep detections outside the configured bounding box
    #[arg(long, env = "FIRE_FINDER_IGNORE_BOUNDING_BOX")]
    pub ignore_bounding_box: bool,

    /// Continue when some (but not all) CSV downloads fail
    #[arg(long, env = "FIRE_FINDER_ALLOW_PARTIAL_DOWNLOAD")]
    pub allow_partial_download: bool,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run result as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "FIRE_FINDER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        env = "FIRE_FINDER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(value: LogFormat) -> Self {
        match value {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Representative point of a merged wildfire
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepresentativePointArg {
    /// Coordinates of the earliest detection
    #[default]
    Earliest,
    /// Coordinates of the first detection read
    FirstSeen,
    /// The rounded merge key
    Rounded,
    /// Mean of all merged detections
    Centroid,
}

impl From<RepresentativePointArg> for RepresentativePoint {
    fn from(value: RepresentativePointArg) -> Self {
        match value {
            RepresentativePointArg::Earliest => Self::Earliest,
            RepresentativePointArg::FirstSeen => Self::FirstSeen,
            RepresentativePointArg::Rounded => Self::Rounded,
            RepresentativePointArg::Centroid => Self::Centroid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fire-finder", "out.geojson"]).unwrap();
        assert_eq!(cli.output_file, Some(PathBuf::from("out.geojson")));
        assert_eq!(cli.config_file, PathBuf::from("config.json"));
        assert_eq!(cli.merge_sensitivity, 2);
        assert_eq!(cli.representative_point, RepresentativePointArg::Earliest);
        assert!(!cli.download_csvs);
        assert!(!cli.ignore_bounding_box);
    }

    #[test]
    fn test_out_of_range_sensitivity_parses() {
        let cli = Cli::try_parse_from(["fire-finder", "out.geojson", "--merge-sensitivity", "-1"])
            .unwrap();
        assert_eq!(cli.merge_sensitivity, -1);
        let cli = Cli::try_parse_from(["fire-finder", "out.geojson", "--merge-sensitivity", "12"])
            .unwrap();
        assert_eq!(cli.merge_sensitivity, 12);
    }

    #[test]
    fn test_output_required_unless_dry_run() {
        assert!(Cli::try_parse_from(["fire-finder"]).is_err());
        let cli = Cli::try_parse_from(["fire-finder", "--dry-run"]).unwrap();
        assert!(cli.output_file.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "fire-finder",
            "out.geojson",
            "--download-csvs",
            "--config-file",
            "panama.toml",
            "--representative-point",
            "first-seen",
            "--ignore-bounding-box",
            "--allow-partial-download",
            "-vv",
        ])
        .unwrap();
        assert!(cli.download_csvs);
        assert_eq!(cli.config_file, PathBuf::from("panama.toml"));
        assert_eq!(
            RepresentativePoint::from(cli.representative_point),
            RepresentativePoint::FirstSeen
        );
        assert!(cli.ignore_bounding_box);
        assert!(cli.allow_partial_download);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["fire-finder", "o.json", "-q", "-v"]).is_err());
    }
}
