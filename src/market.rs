//! Market products offered by the utility, for which flexibility is priced.
use crate::id::define_id_type;
use crate::scenario::{check_finite, check_non_negative, check_proportion};
use crate::units::{Dimensionless, MarketPrice};
use anyhow::{Context, Result, ensure};

define_id_type! {MarketID}

/// A market product in which flexibility can be traded
#[derive(Debug, Clone, PartialEq)]
pub struct MarketProduct {
    /// Unique identifier for the product
    pub id: MarketID,
    /// Human-readable name of the product
    pub description: String,
    /// The price before any adjustment
    pub base_price: MarketPrice,
    /// Label for the unit the price is expressed in (e.g. "€/MW-year")
    pub price_unit: String,
    /// How the product is priced and settled
    pub kind: MarketKind,
}

/// The different kinds of market product
#[derive(Debug, Clone, PartialEq)]
pub enum MarketKind {
    /// A price benchmark (e.g. wholesale energy). Nothing is cleared or paid.
    Reference,
    /// A product whose price is not affected by supply and demand (e.g. an auctioned capacity
    /// product)
    Fixed {
        /// The capacity procured, as a proportion of peak system load
        percent_of_peak: Dimensionless,
        /// How payments are calculated
        settlement: Settlement,
    },
    /// A product whose price falls when flexibility is in oversupply
    Dynamic {
        /// The capacity procured, as a proportion of peak system load
        percent_of_peak: Dimensionless,
        /// Price floor
        min_price: MarketPrice,
        /// Price cap
        max_price: MarketPrice,
        /// How payments are calculated
        settlement: Settlement,
    },
}

/// How the annual payment for a cleared product is calculated from its price.
///
/// All payments scale with the required capacity in MW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settlement {
    /// Paid per MWh delivered during activation events
    PerEvent {
        /// Average number of activation events in a year
        events_per_year: f64,
        /// Average duration of an event in hours
        duration_hours: f64,
    },
    /// Paid per MWh actually utilised
    Utilisation {
        /// Proportion of the year for which the capacity is utilised
        avg_utilisation: Dimensionless,
    },
    /// Paid per MW for every hour of the year
    FullAvailability,
    /// Paid once per MW per year
    Capacity,
}

impl MarketProduct {
    /// Check that the product definition is consistent
    pub fn validate(&self) -> Result<()> {
        self.validate_inner()
            .with_context(|| format!("Invalid definition for market product {}", self.id))
    }

    fn validate_inner(&self) -> Result<()> {
        check_finite(self.base_price.value(), "base_price")?;

        match &self.kind {
            MarketKind::Reference => {}
            MarketKind::Fixed {
                percent_of_peak,
                settlement,
            } => {
                check_proportion(*percent_of_peak, "percent_of_peak")?;
                settlement.validate()?;
            }
            MarketKind::Dynamic {
                percent_of_peak,
                min_price,
                max_price,
                settlement,
            } => {
                check_proportion(*percent_of_peak, "percent_of_peak")?;
                check_finite(min_price.value(), "min_price")?;
                check_finite(max_price.value(), "max_price")?;
                ensure!(
                    min_price <= max_price,
                    "min_price ({}) cannot be greater than max_price ({})",
                    min_price.value(),
                    max_price.value()
                );
                ensure!(
                    (*min_price..=*max_price).contains(&self.base_price),
                    "base_price ({}) must lie between min_price and max_price",
                    self.base_price.value()
                );
                settlement.validate()?;
            }
        }

        Ok(())
    }
}

impl Settlement {
    fn validate(&self) -> Result<()> {
        match *self {
            Self::PerEvent {
                events_per_year,
                duration_hours,
            } => {
                check_non_negative(events_per_year, "avg_events_per_year")?;
                check_non_negative(duration_hours, "avg_duration_hr")?;
            }
            Self::Utilisation { avg_utilisation } => {
                check_proportion(avg_utilisation, "avg_utilisation")?;
            }
            Self::FullAvailability | Self::Capacity => {}
        }

        Ok(())
    }
}
