//! General functions related to finance.
use crate::units::{Dimensionless, Money, MoneyPerYear};

/// Calculates the present value of a constant annual cash flow.
///
/// The cash flow is received at the end of each year `t = 1..=years` and discounted by
/// `(1 + discount_rate)^t`. Zero years gives a present value of zero.
///
/// # Arguments
///
/// * `annual_cash_flow` - The cash flow received every year
/// * `years` - The number of years over which the cash flow is received
/// * `discount_rate` - The annual discount rate
pub fn present_value(
    annual_cash_flow: MoneyPerYear,
    years: u32,
    discount_rate: Dimensionless,
) -> Money {
    let growth = 1.0 + discount_rate.value();
    let mut discount_factor = 1.0;
    let mut total = 0.0;
    for _ in 0..years {
        discount_factor *= growth;
        total += annual_cash_flow.value() / discount_factor;
    }

    Money(total)
}

/// Calculates the net present value of a constant annual cash flow less an upfront cost.
///
/// The upfront cost is incurred once, at `t = 0`, so it is not discounted.
pub fn net_present_value(
    annual_cash_flow: MoneyPerYear,
    years: u32,
    discount_rate: Dimensionless,
    upfront_cost: Money,
) -> Money {
    present_value(annual_cash_flow, years, discount_rate) - upfront_cost
}
