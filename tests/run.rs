//! Integration tests for the `run` command.
use flexmarket::cli::{RunOpts, ScenarioOverrides, handle_run_command};
use flexmarket::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the example scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/belgium")
}

/// Read the data rows of an output CSV file
fn read_rows(file_path: &Path) -> Vec<csv::StringRecord> {
    csv::Reader::from_path(file_path)
        .unwrap()
        .records()
        .collect::<Result<_, _>>()
        .unwrap()
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("FLEXMARKET_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };
    let overrides = ScenarioOverrides {
        households: Some(1_000),
        penetration_rate: Some(0.5),
        aggregator: Some(false),
    };
    handle_run_command(
        &get_scenario_dir(),
        &opts,
        &overrides,
        Some(Settings::default()),
    )
    .unwrap();

    for file_name in [
        "devices.csv",
        "markets.csv",
        "summary.csv",
        "metadata.toml",
        "flexmarket_info.log",
        "flexmarket_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "Missing {file_name}");
    }

    // No aggregator stage was run
    assert!(!output_dir.join("aggregator.csv").exists());

    assert_eq!(read_rows(&output_dir.join("devices.csv")).len(), 3);
    assert_eq!(read_rows(&output_dir.join("markets.csv")).len(), 5);

    // 1,000 households at 50% penetration
    let summary = read_rows(&output_dir.join("summary.csv"));
    assert_eq!(summary.len(), 1);
    assert_eq!(&summary[0][0], "500");
    assert_eq!(&summary[0][3], "false");

    // Second time will fail because the logging is already initialised
    fs::remove_dir_all(&output_dir).unwrap();
    assert_eq!(
        handle_run_command(
            &get_scenario_dir(),
            &opts,
            &ScenarioOverrides::default(),
            Some(Settings::default())
        )
        .unwrap_err()
        .chain()
        .next()
        .unwrap()
        .to_string(),
        "Failed to initialise logging."
    );
}
