//! The scenario describing the flexibility market to be simulated.
use crate::id::define_id_type;
use crate::market::MarketProduct;
use crate::units::{Dimensionless, Money, MoneyPerPowerPerYear, MoneyPerYear, Power};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;

define_id_type! {DeviceID}

/// A map of device types, in catalog order
pub type DeviceMap = IndexMap<DeviceID, DeviceParams>;

/// All the inputs for a single simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Total number of households
    pub households: u64,
    /// The proportion of households taking part in the flexibility market
    pub penetration_rate: Dimensionless,
    /// The number of flexible loads in each participating household
    pub loads_per_household: u32,
    /// The catalog of flexible device types
    pub devices: DeviceMap,
    /// Annual discount rate used by consumers to value their devices
    pub cost_of_capital: Dimensionless,
    /// Whether an aggregator takes part in the market
    pub aggregator_present: bool,
    /// Parameters for the aggregator (only used if `aggregator_present` is set)
    pub aggregator: AggregatorParams,
    /// Parameters for the utility
    pub utility: UtilityParams,
    /// Market products, in the order they should be reported
    pub markets: Vec<MarketProduct>,
}

/// The economics of a single flexible device of a given type
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceParams {
    /// The rated flexibility of one device
    pub flexibility: Power,
    /// The proportion of the rated flexibility which can realistically be delivered
    pub availability_factor: Dimensionless,
    /// Upfront cost of one device
    pub capex: Money,
    /// Energy bill savings for one device
    pub annual_energy_savings: MoneyPerYear,
    /// Revenue earned for each kW of available flexibility
    pub annual_revenue_per_kw: MoneyPerPowerPerYear,
    /// The cost of wear caused by providing flexibility, for one device
    pub degradation_cost_per_year: MoneyPerYear,
    /// Lifetime of the device
    pub lifetime_years: u32,
}

/// Parameters describing the aggregator's business
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregatorParams {
    /// Nominal flexibility of a single load.
    ///
    /// Informational only: revenue is based on the flexibility offered by the device fleet.
    pub flexibility_kw_per_load: Power,
    /// The price the utility pays the aggregator per kW of flexibility each year
    pub market_price_per_kw_year: MoneyPerPowerPerYear,
    /// The proportion of revenue passed on to consumers
    pub consumer_share_percentage: Dimensionless,
    /// Operating cost of the platform for each participating household
    pub platform_om_cost_per_household_per_year: MoneyPerYear,
    /// Settlement and administration cost for each kW of flexibility each year
    pub settlement_admin_cost_per_kw: MoneyPerPowerPerYear,
    /// One-off cost of acquiring a participating household
    pub customer_acquisition_cost: Money,
    /// The aggregator's annual discount rate
    pub discount_rate: Dimensionless,
    /// The appraisal period
    pub years: u32,
}

/// Parameters describing the utility/grid operator
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UtilityParams {
    /// Peak system load in GW
    pub peak_system_load_gw: f64,
    /// The proportion by which renewables depress the reference wholesale price
    pub renewables_price_reduction_factor: Dimensionless,
}

/// Check that a value is finite
pub(crate) fn check_finite(value: f64, name: &str) -> Result<()> {
    ensure!(value.is_finite(), "{name} must be a finite number");

    Ok(())
}

/// Check that a value is finite and not negative
pub(crate) fn check_non_negative(value: f64, name: &str) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that a value is between 0 and 1
pub(crate) fn check_proportion(value: Dimensionless, name: &str) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value.value()),
        "{name} must be between 0 and 1"
    );

    Ok(())
}

/// Check that a discount rate can be used for discounting
fn check_discount_rate(value: Dimensionless, name: &str) -> Result<()> {
    ensure!(
        value.is_finite() && value.value() > -1.0,
        "{name} must be a finite number greater than -1"
    );

    Ok(())
}

impl Scenario {
    /// The number of households taking part, rounded down
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn participating_households(&self) -> u64 {
        (self.households as f64 * self.penetration_rate.value()).floor() as u64
    }

    /// The total number of flexible devices across participating households.
    ///
    /// `None` if the number is too large to represent.
    fn checked_total_devices(&self) -> Option<u64> {
        self.participating_households()
            .checked_mul(u64::from(self.loads_per_household))
    }

    /// The total number of flexible devices across participating households.
    ///
    /// Saturates for scenarios which fail validation because the number is too large.
    pub fn total_devices(&self) -> u64 {
        self.checked_total_devices().unwrap_or(u64::MAX)
    }

    /// The aggregator's parameters, if an aggregator takes part
    pub fn aggregator_params(&self) -> Option<&AggregatorParams> {
        self.aggregator_present.then_some(&self.aggregator)
    }

    /// Warn about values which are valid but mean nothing will be simulated
    pub fn warn_if_degenerate(&self) {
        if self.households > 0 && self.penetration_rate == Dimensionless(0.0) {
            warn!("The penetration rate is zero: no households will take part");
        }

        if self.loads_per_household == 0 {
            warn!("loads_per_household is zero: no flexibility will be offered");
        }
    }

    /// Check that the scenario can be simulated.
    ///
    /// This is called before any calculations are carried out so that no partial results are
    /// produced for an invalid scenario.
    pub fn validate(&self) -> Result<()> {
        check_proportion(self.penetration_rate, "penetration_rate")?;
        check_discount_rate(self.cost_of_capital, "cost_of_capital")?;
        ensure!(
            self.checked_total_devices().is_some(),
            "Too many devices: {} participating households with {} loads each",
            self.participating_households(),
            self.loads_per_household
        );

        ensure!(!self.devices.is_empty(), "Device catalog cannot be empty");
        for (id, device) in &self.devices {
            device
                .validate()
                .with_context(|| format!("Invalid parameters for device {id}"))?;
        }

        // Aggregator parameters are always checked so that toggling the aggregator on can't fail
        self.aggregator
            .validate()
            .context("Invalid aggregator parameters")?;
        self.utility
            .validate()
            .context("Invalid utility parameters")?;

        for market in &self.markets {
            market.validate()?;
        }

        Ok(())
    }
}

impl DeviceParams {
    fn validate(&self) -> Result<()> {
        check_non_negative(self.flexibility.value(), "flexibility_kw")?;
        check_proportion(self.availability_factor, "availability_factor")?;
        check_non_negative(self.capex.value(), "capex")?;
        check_finite(self.annual_energy_savings.value(), "annual_energy_savings")?;
        check_finite(self.annual_revenue_per_kw.value(), "annual_revenue_per_kw")?;
        check_finite(
            self.degradation_cost_per_year.value(),
            "degradation_cost_per_year",
        )?;
        ensure!(self.lifetime_years >= 1, "lifetime_years must be at least 1");

        Ok(())
    }
}

impl AggregatorParams {
    fn validate(&self) -> Result<()> {
        check_finite(self.flexibility_kw_per_load.value(), "flexibility_kw_per_load")?;
        check_finite(
            self.market_price_per_kw_year.value(),
            "market_price_per_kw_year",
        )?;
        check_proportion(self.consumer_share_percentage, "consumer_share_percentage")?;
        check_finite(
            self.platform_om_cost_per_household_per_year.value(),
            "platform_om_cost_per_household_per_year",
        )?;
        check_finite(
            self.settlement_admin_cost_per_kw.value(),
            "settlement_admin_cost_per_kw",
        )?;
        check_finite(
            self.customer_acquisition_cost.value(),
            "customer_acquisition_cost",
        )?;
        check_discount_rate(self.discount_rate, "discount_rate")?;
        ensure!(self.years >= 1, "years must be at least 1");

        Ok(())
    }
}

impl UtilityParams {
    fn validate(&self) -> Result<()> {
        check_non_negative(self.peak_system_load_gw, "peak_system_load_gw")?;
        check_proportion(
            self.renewables_price_reduction_factor,
            "renewables_price_reduction_factor",
        )?;

        Ok(())
    }
}
