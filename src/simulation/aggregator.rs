//! The aggregator's business case for pooling consumer flexibility.
use crate::finance::net_present_value;
use crate::scenario::AggregatorParams;
use crate::units::{Dimensionless, Money, MoneyPerYear, Power};
use serde::Serialize;

/// The aggregator's annual cash flows and its net present value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatorOutcome {
    /// Revenue received from the utility
    pub revenue: MoneyPerYear,
    /// The share of revenue passed on to consumers
    pub payout: MoneyPerYear,
    /// Revenue kept by the aggregator
    pub retained: MoneyPerYear,
    /// Platform and settlement costs
    pub annual_cost: MoneyPerYear,
    /// Retained revenue less annual costs
    pub margin: MoneyPerYear,
    /// Net present value over the appraisal period, including customer acquisition
    pub npv: Money,
}

/// Run the aggregator model.
///
/// # Arguments
///
/// * `params` - The aggregator's parameters
/// * `participating_households` - The number of households the aggregator serves
/// * `total_flexibility` - The flexibility offered by all consumer devices
pub fn run_aggregator_model(
    params: &AggregatorParams,
    participating_households: u64,
    total_flexibility: Power,
) -> AggregatorOutcome {
    let households = Dimensionless::from(participating_households);

    let revenue = total_flexibility * params.market_price_per_kw_year;
    let payout = revenue * params.consumer_share_percentage;
    let retained = revenue - payout;

    let annual_cost = params.platform_om_cost_per_household_per_year * households
        + total_flexibility * params.settlement_admin_cost_per_kw;
    let margin = retained - annual_cost;

    // Customer acquisition is paid once, up front
    let acquisition_cost = params.customer_acquisition_cost * households;
    let npv = net_present_value(margin, params.years, params.discount_rate, acquisition_cost);

    AggregatorOutcome {
        revenue,
        payout,
        retained,
        annual_cost,
        margin,
        npv,
    }
}
