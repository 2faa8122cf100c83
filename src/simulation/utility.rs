//! Pricing of flexibility in the utility's market products.
//!
//! Each product is priced independently. Dynamic products are depressed when the flexibility on
//! offer exceeds the capacity the utility needs; no scarcity premium is modelled.
use crate::market::{MarketID, MarketKind, MarketProduct, Settlement};
use crate::scenario::UtilityParams;
use crate::units::{Capacity, Dimensionless, MarketPrice, Money, MoneyMillions, Power};
use serde::Serialize;

/// The number of hours in a year
const HOURS_PER_YEAR: f64 = 8760.0;

/// The number of MW in one GW
const MW_PER_GW: f64 = 1000.0;

/// The outcome of pricing a single market product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOutcome {
    /// The market product
    pub market_id: MarketID,
    /// Capacity procured by the utility (`None` for reference products)
    pub required_capacity: Option<Capacity>,
    /// Available flexibility divided by required capacity (`None` for reference products)
    pub supply_ratio: Option<Dimensionless>,
    /// The price after adjustment for supply and demand or renewables
    pub adjusted_price: MarketPrice,
    /// Label for the unit of `adjusted_price`
    pub price_unit: String,
    /// Annual payment in millions (`None` for reference products)
    pub total_payment: Option<MoneyMillions>,
}

/// The ratio of available flexibility to required capacity.
///
/// Zero if no capacity is required.
pub fn supply_ratio(available: Capacity, required: Capacity) -> Dimensionless {
    if required > Capacity(0.0) {
        available / required
    } else {
        Dimensionless(0.0)
    }
}

/// The price of a dynamic product for a given supply ratio.
///
/// Oversupply (a ratio above one) scales the price down in inverse proportion. The result is
/// clamped to `[min_price, max_price]`.
pub fn dynamic_price(
    base_price: MarketPrice,
    supply_ratio: Dimensionless,
    min_price: MarketPrice,
    max_price: MarketPrice,
) -> MarketPrice {
    let raw_price = if supply_ratio > Dimensionless(1.0) {
        base_price / supply_ratio
    } else {
        base_price
    };

    MarketPrice(raw_price.value().max(min_price.value()).min(max_price.value()))
}

/// The reference price, lowered by the effect of renewables
pub fn reference_price(base_price: MarketPrice, utility: &UtilityParams) -> MarketPrice {
    base_price * (Dimensionless(1.0) - utility.renewables_price_reduction_factor)
}

impl Settlement {
    /// The total annual payment for `required` MW at the given price
    pub fn annual_payment(&self, required: Capacity, price: MarketPrice) -> MoneyMillions {
        let mw = required.value();
        let quantity = match *self {
            Self::PerEvent {
                events_per_year,
                duration_hours,
            } => mw * events_per_year * duration_hours,
            Self::Utilisation { avg_utilisation } => mw * HOURS_PER_YEAR * avg_utilisation.value(),
            Self::FullAvailability => mw * HOURS_PER_YEAR,
            Self::Capacity => mw,
        };

        Money(quantity * price.value()).to_millions()
    }
}

/// Price a single market product
pub fn price_market(
    market: &MarketProduct,
    utility: &UtilityParams,
    total_flexibility: Power,
) -> MarketOutcome {
    let peak_load = Capacity(utility.peak_system_load_gw * MW_PER_GW);
    let available = total_flexibility.to_capacity();

    let (required_capacity, supply_ratio, adjusted_price, total_payment) = match &market.kind {
        MarketKind::Reference => (
            None,
            None,
            reference_price(market.base_price, utility),
            None,
        ),
        MarketKind::Fixed {
            percent_of_peak,
            settlement,
        } => {
            let required = peak_load * *percent_of_peak;
            let ratio = supply_ratio(available, required);
            let price = market.base_price;
            (
                Some(required),
                Some(ratio),
                price,
                Some(settlement.annual_payment(required, price)),
            )
        }
        MarketKind::Dynamic {
            percent_of_peak,
            min_price,
            max_price,
            settlement,
        } => {
            let required = peak_load * *percent_of_peak;
            let ratio = supply_ratio(available, required);
            let price = dynamic_price(market.base_price, ratio, *min_price, *max_price);
            (
                Some(required),
                Some(ratio),
                price,
                Some(settlement.annual_payment(required, price)),
            )
        }
    };

    MarketOutcome {
        market_id: market.id.clone(),
        required_capacity,
        supply_ratio,
        adjusted_price,
        price_unit: market.price_unit.clone(),
        total_payment,
    }
}

/// Run the utility market model, returning outcomes in the same order as `markets`
pub fn run_utility_model(
    utility: &UtilityParams,
    markets: &[MarketProduct],
    total_flexibility: Power,
) -> Vec<MarketOutcome> {
    markets
        .iter()
        .map(|market| price_market(market, utility, total_flexibility))
        .collect()
}
