//! Dry-run (`--dry-run`) implementation.

use anyhow::{Context, Result};
use contracts::FireFinderConfig;
use merge_engine::Sensitivity;
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    bounding_box: [f64; 4],
    csv_url_count: usize,
    csv_output_directory: String,
    download_timeout_secs: u64,
    allow_partial_download: bool,
    merge_sensitivity: i64,
    merge_threshold: String,
}

/// Execute `--dry-run`
pub fn run_validate(cli: &Cli) -> Result<()> {
    info!(config = %cli.config_file.display(), "Validating configuration");

    let result = validate_config(cli);

    if cli.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(cli: &Cli) -> ValidationResult {
    let config_path = cli.config_file.display().to_string();
    let invalid = |error: String| ValidationResult {
        valid: false,
        config_path: config_path.clone(),
        error: Some(error),
        warnings: None,
        summary: None,
    };

    // Check file exists
    if !cli.config_file.exists() {
        return invalid(format!("File not found: {}", cli.config_file.display()));
    }

    let sensitivity = match Sensitivity::new(cli.merge_sensitivity) {
        Ok(s) => s,
        Err(e) => return invalid(e.to_string()),
    };

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&cli.config_file) {
        Ok(settings) => {
            let warnings = collect_warnings(&settings, cli);
            ValidationResult {
                valid: true,
                config_path: config_path.clone(),
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    bounding_box: settings.country_bounding_box.into(),
                    csv_url_count: settings.csv_urls.len(),
                    csv_output_directory: settings.csv_output_directory.display().to_string(),
                    download_timeout_secs: settings.download_timeout_secs,
                    allow_partial_download: settings.allow_partial_download
                        || cli.allow_partial_download,
                    merge_sensitivity: cli.merge_sensitivity,
                    merge_threshold: sensitivity.distance_threshold().to_string(),
                }),
            }
        }
        Err(e) => invalid(e.to_string()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(settings: &FireFinderConfig, cli: &Cli) -> Vec<String> {
    let mut warnings = Vec::new();

    let bounds = settings.country_bounding_box.bounds();
    if bounds.lat_min == bounds.lat_max || bounds.lon_min == bounds.lon_max {
        warnings.push("country_bounding_box has zero area - only exact edge points pass".to_string());
    }

    if cli.ignore_bounding_box {
        warnings.push("--ignore-bounding-box set - country_bounding_box is unused".to_string());
    }

    if !cli.download_csvs && !settings.csv_output_directory.is_dir() {
        warnings.push(format!(
            "{} does not exist - run with --download-csvs first",
            settings.csv_output_directory.display()
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            let [lat_a, lon_a, lat_b, lon_b] = summary.bounding_box;
            println!("\n  Bounding box: ({lat_a}, {lon_a}) - ({lat_b}, {lon_b})");
            println!("  CSV URLs: {}", summary.csv_url_count);
            println!("  CSV directory: {}", summary.csv_output_directory);
            println!("  Download timeout: {}s", summary.download_timeout_secs);
            println!("  Partial downloads: {}", summary.allow_partial_download);
            println!(
                "  Merge sensitivity: {} ({})",
                summary.merge_sensitivity, summary.merge_threshold
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
