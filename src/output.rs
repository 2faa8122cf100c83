//! The module responsible for writing output data to disk.
use crate::simulation::SimulationResult;
use crate::simulation::aggregator::AggregatorOutcome;
use crate::simulation::consumer::{ConsumerOutcome, DeviceOutcome};
use crate::simulation::utility::MarketOutcome;
use crate::units::Power;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "flexmarket_results";

/// The output file name for device outcomes
const DEVICES_FILE_NAME: &str = "devices.csv";

/// The output file name for market outcomes
const MARKETS_FILE_NAME: &str = "markets.csv";

/// The output file name for the aggregator outcome
const AGGREGATOR_FILE_NAME: &str = "aggregator.csv";

/// The output file name for the run summary
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// Get the default output directory for the scenario at the specified path
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Get the scenario name from the dir path, canonicalising in case the user has specified "."
    let scenario_dir = scenario_dir
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory at `output_dir`.
///
/// An existing directory is only reused if it is empty or `allow_overwrite` is true, in which case
/// its contents are deleted.
///
/// # Returns
///
/// Whether an existing non-empty directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Empty, so we can just use it
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use the --overwrite option to \
            replace its contents."
        );

        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row of the summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SummaryRow {
    participating_households: u64,
    total_devices: u64,
    total_flexibility_kw: Power,
    aggregator_present: bool,
}

impl SummaryRow {
    fn new(consumer: &ConsumerOutcome, aggregator_present: bool) -> Self {
        Self {
            participating_households: consumer.participating_households,
            total_devices: consumer.total_devices,
            total_flexibility_kw: consumer.total_flexibility,
            aggregator_present,
        }
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    output_path: PathBuf,
    devices_writer: csv::Writer<File>,
    markets_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    aggregator_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// The aggregator file is only created if there is an aggregator outcome to write.
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Could not create {}", file_path.display()))
        };

        Ok(Self {
            output_path: output_path.to_path_buf(),
            devices_writer: new_writer(DEVICES_FILE_NAME)?,
            markets_writer: new_writer(MARKETS_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            aggregator_writer: None,
        })
    }

    /// Write device outcomes to a CSV file
    pub fn write_devices<'a, I>(&mut self, devices: I) -> Result<()>
    where
        I: Iterator<Item = &'a DeviceOutcome>,
    {
        for device in devices {
            self.devices_writer.serialize(device)?;
        }

        Ok(())
    }

    /// Write market outcomes to a CSV file
    pub fn write_markets<'a, I>(&mut self, markets: I) -> Result<()>
    where
        I: Iterator<Item = &'a MarketOutcome>,
    {
        for market in markets {
            self.markets_writer.serialize(market)?;
        }

        Ok(())
    }

    /// Write the aggregator outcome to a CSV file
    pub fn write_aggregator(&mut self, outcome: &AggregatorOutcome) -> Result<()> {
        if self.aggregator_writer.is_none() {
            let file_path = self.output_path.join(AGGREGATOR_FILE_NAME);
            let writer = csv::Writer::from_path(&file_path)
                .with_context(|| format!("Could not create {}", file_path.display()))?;
            self.aggregator_writer = Some(writer);
        }

        if let Some(writer) = &mut self.aggregator_writer {
            writer.serialize(outcome)?;
        }

        Ok(())
    }

    /// Write a summary of the run to a CSV file
    pub fn write_summary(
        &mut self,
        consumer: &ConsumerOutcome,
        aggregator_present: bool,
    ) -> Result<()> {
        self.summary_writer
            .serialize(SummaryRow::new(consumer, aggregator_present))?;

        Ok(())
    }

    /// Write all results of a simulation run
    pub fn write_result(&mut self, result: &SimulationResult) -> Result<()> {
        self.write_devices(result.consumer.devices.iter())?;
        self.write_markets(result.markets.iter())?;
        if let Some(aggregator) = &result.aggregator {
            self.write_aggregator(aggregator)?;
        }
        self.write_summary(&result.consumer, result.aggregator.is_some())?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.devices_writer.flush()?;
        self.markets_writer.flush()?;
        self.summary_writer.flush()?;
        if let Some(wtr) = &mut self.aggregator_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Write the results of a simulation run, along with run metadata, to `output_path`
pub fn write_results(
    output_path: &Path,
    scenario_path: &Path,
    result: &SimulationResult,
) -> Result<()> {
    write_metadata(output_path, scenario_path).context("Failed to save metadata")?;

    let mut writer = DataWriter::create(output_path)?;
    writer.write_result(result)?;
    writer.flush()?;

    Ok(())
}
