//! Fixtures for tests
use crate::market::{MarketKind, MarketProduct, Settlement};
use crate::scenario::{
    AggregatorParams, DeviceID, DeviceMap, DeviceParams, Scenario, UtilityParams,
};
use crate::units::{
    Dimensionless, MarketPrice, Money, MoneyPerPowerPerYear, MoneyPerYear, Power,
};
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn device_params() -> DeviceParams {
    DeviceParams {
        flexibility: Power(2.0),
        availability_factor: Dimensionless(0.5),
        capex: Money(1000.0),
        annual_energy_savings: MoneyPerYear(50.0),
        annual_revenue_per_kw: MoneyPerPowerPerYear(40.0),
        degradation_cost_per_year: MoneyPerYear(10.0),
        lifetime_years: 10,
    }
}

#[fixture]
pub fn devices(device_params: DeviceParams) -> DeviceMap {
    indexmap! { DeviceID::new("heat_pump") => device_params }
}

#[fixture]
pub fn aggregator_params() -> AggregatorParams {
    AggregatorParams {
        flexibility_kw_per_load: Power(1.0),
        market_price_per_kw_year: MoneyPerPowerPerYear(60.0),
        consumer_share_percentage: Dimensionless(0.5),
        platform_om_cost_per_household_per_year: MoneyPerYear(10.0),
        settlement_admin_cost_per_kw: MoneyPerPowerPerYear(2.0),
        customer_acquisition_cost: Money(50.0),
        discount_rate: Dimensionless(0.08),
        years: 10,
    }
}

#[fixture]
pub fn utility_params() -> UtilityParams {
    UtilityParams {
        peak_system_load_gw: 13.5,
        renewables_price_reduction_factor: Dimensionless(0.2),
    }
}

/// The market products traded in the Belgian reference scenario
#[fixture]
pub fn markets() -> Vec<MarketProduct> {
    vec![
        MarketProduct {
            id: "capacity".into(),
            description: "Capacity (Fixed/Auctioned)".into(),
            base_price: MarketPrice(45_000.0),
            price_unit: "€/MW-year".into(),
            kind: MarketKind::Fixed {
                percent_of_peak: Dimensionless(0.05),
                settlement: Settlement::Capacity,
            },
        },
        MarketProduct {
            id: "demand_response".into(),
            description: "Demand Response (mFRR)".into(),
            base_price: MarketPrice(120.0),
            price_unit: "€/MWh-event".into(),
            kind: MarketKind::Dynamic {
                percent_of_peak: Dimensionless(0.025),
                min_price: MarketPrice(40.0),
                max_price: MarketPrice(180.0),
                settlement: Settlement::PerEvent {
                    events_per_year: 8.0,
                    duration_hours: 2.0,
                },
            },
        },
        MarketProduct {
            id: "balancing".into(),
            description: "Balancing Energy (aFRR/mFRR)".into(),
            base_price: MarketPrice(85.0),
            price_unit: "€/MWh-utilized".into(),
            kind: MarketKind::Dynamic {
                percent_of_peak: Dimensionless(0.01),
                min_price: MarketPrice(30.0),
                max_price: MarketPrice(150.0),
                settlement: Settlement::Utilisation {
                    avg_utilisation: Dimensionless(0.2),
                },
            },
        },
        MarketProduct {
            id: "ancillary".into(),
            description: "Ancillary Services (FCR/aFRR Cap)".into(),
            base_price: MarketPrice(9.0),
            price_unit: "€/MW-hour".into(),
            kind: MarketKind::Dynamic {
                percent_of_peak: Dimensionless(0.008),
                min_price: MarketPrice(5.0),
                max_price: MarketPrice(20.0),
                settlement: Settlement::FullAvailability,
            },
        },
        MarketProduct {
            id: "wholesale".into(),
            description: "Wholesale Energy (Reference)".into(),
            base_price: MarketPrice(70.0),
            price_unit: "€/MWh".into(),
            kind: MarketKind::Reference,
        },
    ]
}

/// 1,000,000 households at 10% penetration with three loads each, all of a single device type
#[fixture]
pub fn scenario(
    devices: DeviceMap,
    aggregator_params: AggregatorParams,
    utility_params: UtilityParams,
    markets: Vec<MarketProduct>,
) -> Scenario {
    Scenario {
        households: 1_000_000,
        penetration_rate: Dimensionless(0.1),
        loads_per_household: 3,
        devices,
        cost_of_capital: Dimensionless(0.05),
        aggregator_present: true,
        aggregator: aggregator_params,
        utility: utility_params,
        markets,
    }
}
