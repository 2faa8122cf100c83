//! Economics of flexible devices for consumers, and the flexibility they offer in aggregate.
use crate::finance::net_present_value;
use crate::scenario::{DeviceID, DeviceParams, Scenario};
use crate::units::{Dimensionless, Money, MoneyPerYear, Power};
use log::debug;
use serde::Serialize;

/// The economics of all devices of a single type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceOutcome {
    /// The device type
    pub device_id: DeviceID,
    /// Number of devices of this type
    pub device_count: u64,
    /// Available flexibility in kW for the whole fleet
    pub flexibility: Power,
    /// Total upfront cost for the fleet
    pub capex: Money,
    /// Revenue from offering flexibility
    pub annual_revenue: MoneyPerYear,
    /// Energy bill savings
    pub annual_savings: MoneyPerYear,
    /// Degradation costs
    pub annual_degradation: MoneyPerYear,
    /// Revenue plus savings less degradation
    pub net_cash_flow: MoneyPerYear,
    /// Net present value for the fleet
    pub npv: Money,
    /// Annual revenue for a single device (zero if there are no devices)
    pub revenue_per_device: MoneyPerYear,
    /// Net present value for a single device (zero if there are no devices)
    pub npv_per_device: Money,
}

/// The results of the consumer model
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerOutcome {
    /// The number of households taking part
    pub participating_households: u64,
    /// The number of flexible devices across participating households
    pub total_devices: u64,
    /// Results for each device type, in catalog order
    pub devices: Vec<DeviceOutcome>,
    /// The sum of flexibility across all device types
    pub total_flexibility: Power,
}

/// Split the device population evenly across device types.
///
/// Integer division: any remainder is discarded. An empty catalog gets no devices.
pub fn devices_per_type(total_devices: u64, num_types: usize) -> u64 {
    total_devices.checked_div(num_types as u64).unwrap_or(0)
}

/// Calculate the economics of a fleet of `device_count` devices of one type
pub fn evaluate_device(
    device_id: &DeviceID,
    params: &DeviceParams,
    device_count: u64,
    cost_of_capital: Dimensionless,
) -> DeviceOutcome {
    let count = Dimensionless::from(device_count);
    let flexibility = params.flexibility * params.availability_factor * count;
    let capex = params.capex * count;
    let annual_revenue = flexibility * params.annual_revenue_per_kw;
    let annual_savings = params.annual_energy_savings * count;
    let annual_degradation = params.degradation_cost_per_year * count;
    let net_cash_flow = annual_revenue + annual_savings - annual_degradation;
    let npv = net_present_value(net_cash_flow, params.lifetime_years, cost_of_capital, capex);

    let (revenue_per_device, npv_per_device) = if device_count == 0 {
        (MoneyPerYear(0.0), Money(0.0))
    } else {
        (annual_revenue / count, npv / count)
    };

    DeviceOutcome {
        device_id: device_id.clone(),
        device_count,
        flexibility,
        capex,
        annual_revenue,
        annual_savings,
        annual_degradation,
        net_cash_flow,
        npv,
        revenue_per_device,
        npv_per_device,
    }
}

/// Run the consumer model for the given scenario
pub fn run_consumer_model(scenario: &Scenario) -> ConsumerOutcome {
    let participating_households = scenario.participating_households();
    let total_devices = scenario.total_devices();
    let device_count = devices_per_type(total_devices, scenario.devices.len());

    let devices: Vec<_> = scenario
        .devices
        .iter()
        .map(|(id, params)| {
            let outcome = evaluate_device(id, params, device_count, scenario.cost_of_capital);
            debug!(
                "Device {id}: {} devices offering {} kW, NPV {}",
                outcome.device_count,
                outcome.flexibility.value(),
                outcome.npv.value()
            );
            outcome
        })
        .collect();
    let total_flexibility = devices.iter().map(|device| device.flexibility).sum();

    ConsumerOutcome {
        participating_households,
        total_devices,
        devices,
        total_flexibility,
    }
}
