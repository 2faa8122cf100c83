//! Defines the `ScenarioParameters` struct, which represents the contents of `scenario.toml`.
use crate::input::read_toml;
use crate::scenario::{AggregatorParams, UtilityParams};
use crate::units::Dimensionless;
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

const SCENARIO_PARAMETERS_FILE_NAME: &str = "scenario.toml";

/// An aggregator takes part unless stated otherwise
fn default_aggregator_present() -> bool {
    true
}

/// Represents the contents of the entire scenario file.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioParameters {
    /// Total number of households in the market area
    pub households: u64,
    /// The proportion of households taking part
    pub penetration_rate: Dimensionless,
    /// The number of flexible loads in each participating household
    pub loads_per_household: u32,
    /// The consumers' annual discount rate
    pub cost_of_capital: Dimensionless,
    /// Whether an aggregator takes part
    #[serde(default = "default_aggregator_present")]
    pub aggregator_present: bool,
    /// Aggregator parameters
    pub aggregator: AggregatorParams,
    /// Utility parameters
    pub utility: UtilityParams,
}

impl ScenarioParameters {
    /// Read a scenario file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario configuration files
    ///
    /// # Returns
    ///
    /// The file contents as a [`ScenarioParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<ScenarioParameters> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_PARAMETERS_FILE_NAME);
        read_toml(&file_path)
    }
}
