//! Common routines for handling input data.
use crate::scenario::Scenario;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod device;
use device::read_devices;
pub mod market;
use market::read_markets;
pub mod parameters;
use parameters::ScenarioParameters;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec: Vec<T> = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;

    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a scenario from the specified directory.
///
/// The scenario is not validated here, as overrides may still be applied to it.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
pub fn load_scenario<P: AsRef<Path>>(scenario_dir: P) -> Result<Scenario> {
    let scenario_dir = scenario_dir.as_ref();
    let parameters = ScenarioParameters::from_path(scenario_dir)?;
    let devices = read_devices(scenario_dir)?;
    let markets = read_markets(scenario_dir)?;

    Ok(Scenario {
        households: parameters.households,
        penetration_rate: parameters.penetration_rate,
        loads_per_household: parameters.loads_per_household,
        devices,
        cost_of_capital: parameters.cost_of_capital,
        aggregator_present: parameters.aggregator_present,
        aggregator: parameters.aggregator,
        utility: parameters.utility,
        markets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,1\nworld,2\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // File with no data (only column headers)
        let file_path = create_csv_file(dir.path(), "id,value\n");
        assert!(read_csv::<Record>(&file_path).is_err());

        // Missing file
        assert!(read_csv::<Record>(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_load_scenario_bundled() {
        let scenario_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/belgium");
        let scenario = load_scenario(scenario_dir).unwrap();
        scenario.validate().unwrap();
        assert_eq!(scenario.devices.len(), 3);
        assert_eq!(scenario.markets.len(), 5);
    }

    #[test]
    fn test_load_scenario_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(load_scenario(dir.path().join("missing")).is_err());
    }
}
