//! Code for reading the device catalog from a CSV file.
use crate::id::insert_unique;
use crate::input::{input_err_msg, read_csv};
use crate::scenario::{DeviceID, DeviceMap, DeviceParams};
use crate::units::{Dimensionless, Money, MoneyPerPowerPerYear, MoneyPerYear, Power};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEVICES_FILE_NAME: &str = "devices.csv";

/// A row of the devices CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct DeviceRaw {
    id: DeviceID,
    flexibility_kw: f64,
    availability_factor: f64,
    capex: f64,
    annual_energy_savings: f64,
    annual_revenue_per_kw: f64,
    degradation_cost_per_year: f64,
    lifetime_years: u32,
}

impl From<DeviceRaw> for DeviceParams {
    fn from(raw: DeviceRaw) -> Self {
        Self {
            flexibility: Power(raw.flexibility_kw),
            availability_factor: Dimensionless(raw.availability_factor),
            capex: Money(raw.capex),
            annual_energy_savings: MoneyPerYear(raw.annual_energy_savings),
            annual_revenue_per_kw: MoneyPerPowerPerYear(raw.annual_revenue_per_kw),
            degradation_cost_per_year: MoneyPerYear(raw.degradation_cost_per_year),
            lifetime_years: raw.lifetime_years,
        }
    }
}

/// Read the device catalog from the specified scenario directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
///
/// # Returns
///
/// A map of device parameters, in the order they appear in the file
pub fn read_devices(scenario_dir: &Path) -> Result<DeviceMap> {
    let file_path = scenario_dir.join(DEVICES_FILE_NAME);
    let devices: Vec<DeviceRaw> = read_csv(&file_path)?;
    read_devices_from_iter(devices.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_devices_from_iter<I>(iter: I) -> Result<DeviceMap>
where
    I: Iterator<Item = DeviceRaw>,
{
    let mut devices = DeviceMap::new();
    for raw in iter {
        let id = raw.id.clone();
        insert_unique(&mut devices, id, raw.into())?;
    }

    Ok(devices)
}
