//! Code for reading market product definitions from a CSV file.
use crate::id::insert_unique;
use crate::input::{input_err_msg, read_csv};
use crate::market::{MarketID, MarketKind, MarketProduct, Settlement};
use crate::units::{Dimensionless, MarketPrice};
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;

const MARKETS_FILE_NAME: &str = "markets.csv";

/// The kind of market product, as given in the input file
#[derive(DeserializeLabeledStringEnum, Debug, PartialEq, Clone, Copy)]
enum MarketKindRaw {
    #[string = "fixed"]
    Fixed,
    #[string = "dynamic"]
    Dynamic,
    #[string = "reference"]
    Reference,
}

/// A row of the markets CSV file.
///
/// Which of the optional fields are required depends on the kind of product.
#[derive(Debug, Deserialize, PartialEq)]
struct MarketRaw {
    id: MarketID,
    description: String,
    kind: MarketKindRaw,
    price_unit: String,
    base_price: f64,
    percent_of_peak: Option<f64>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    avg_events_per_year: Option<f64>,
    avg_duration_hr: Option<f64>,
    avg_utilisation: Option<f64>,
}

impl MarketRaw {
    /// Whether any of the settlement fields are given
    fn has_settlement_fields(&self) -> bool {
        self.avg_events_per_year.is_some()
            || self.avg_duration_hr.is_some()
            || self.avg_utilisation.is_some()
    }

    /// Work out how the product is settled from the fields given.
    ///
    /// If no settlement fields are given, `default` is used.
    fn settlement(&self, default: Settlement) -> Result<Settlement> {
        match (
            self.avg_events_per_year,
            self.avg_duration_hr,
            self.avg_utilisation,
        ) {
            (None, None, None) => Ok(default),
            (Some(events_per_year), Some(duration_hours), None) => Ok(Settlement::PerEvent {
                events_per_year,
                duration_hours,
            }),
            (None, None, Some(avg_utilisation)) => Ok(Settlement::Utilisation {
                avg_utilisation: Dimensionless(avg_utilisation),
            }),
            (_, _, Some(_)) => {
                bail!("Cannot specify both event-based and utilisation-based settlement")
            }
            _ => bail!("avg_events_per_year and avg_duration_hr must be specified together"),
        }
    }

    fn percent_of_peak(&self) -> Result<Dimensionless> {
        let value = self
            .percent_of_peak
            .context("percent_of_peak must be specified for cleared market products")?;

        Ok(Dimensionless(value))
    }

    fn into_market_product(self) -> Result<MarketProduct> {
        let kind = match self.kind {
            MarketKindRaw::Reference => {
                ensure!(
                    self.percent_of_peak.is_none()
                        && self.min_price.is_none()
                        && self.max_price.is_none()
                        && !self.has_settlement_fields(),
                    "Reference market products cannot have a percent_of_peak, price limits or \
                    settlement fields"
                );
                MarketKind::Reference
            }
            MarketKindRaw::Fixed => {
                ensure!(
                    self.min_price.is_none() && self.max_price.is_none(),
                    "Fixed market products cannot have price limits"
                );
                MarketKind::Fixed {
                    percent_of_peak: self.percent_of_peak()?,
                    settlement: self.settlement(Settlement::Capacity)?,
                }
            }
            MarketKindRaw::Dynamic => {
                let (Some(min_price), Some(max_price)) = (self.min_price, self.max_price) else {
                    bail!("min_price and max_price must be specified for dynamic market products")
                };
                MarketKind::Dynamic {
                    percent_of_peak: self.percent_of_peak()?,
                    min_price: MarketPrice(min_price),
                    max_price: MarketPrice(max_price),
                    settlement: self.settlement(Settlement::FullAvailability)?,
                }
            }
        };

        Ok(MarketProduct {
            id: self.id,
            description: self.description,
            base_price: MarketPrice(self.base_price),
            price_unit: self.price_unit,
            kind,
        })
    }
}

/// Read market product definitions from the specified scenario directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
///
/// # Returns
///
/// Market products, in the order they appear in the file
pub fn read_markets(scenario_dir: &Path) -> Result<Vec<MarketProduct>> {
    let file_path = scenario_dir.join(MARKETS_FILE_NAME);
    let markets: Vec<MarketRaw> = read_csv(&file_path)?;
    read_markets_from_iter(markets.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_markets_from_iter<I>(iter: I) -> Result<Vec<MarketProduct>>
where
    I: Iterator<Item = MarketRaw>,
{
    let mut markets = IndexMap::new();
    for raw in iter {
        let id = raw.id.clone();
        let market = raw
            .into_market_product()
            .with_context(|| format!("Invalid market product {id}"))?;
        insert_unique(&mut markets, id, market)?;
    }

    Ok(markets.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, markets};
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[fixture]
    fn dynamic_raw() -> MarketRaw {
        MarketRaw {
            id: "balancing".into(),
            description: "Balancing Energy (aFRR/mFRR)".into(),
            kind: MarketKindRaw::Dynamic,
            price_unit: "€/MWh-utilized".into(),
            base_price: 85.0,
            percent_of_peak: Some(0.01),
            min_price: Some(30.0),
            max_price: Some(150.0),
            avg_events_per_year: None,
            avg_duration_hr: None,
            avg_utilisation: Some(0.2),
        }
    }

    #[rstest]
    fn test_into_market_product_dynamic(dynamic_raw: MarketRaw) {
        let product = dynamic_raw.into_market_product().unwrap();
        assert_eq!(
            product.kind,
            MarketKind::Dynamic {
                percent_of_peak: Dimensionless(0.01),
                min_price: MarketPrice(30.0),
                max_price: MarketPrice(150.0),
                settlement: Settlement::Utilisation {
                    avg_utilisation: Dimensionless(0.2)
                },
            }
        );
    }

    #[rstest]
    fn test_into_market_product_default_settlement(mut dynamic_raw: MarketRaw) {
        dynamic_raw.avg_utilisation = None;
        let product = dynamic_raw.into_market_product().unwrap();
        assert!(matches!(
            product.kind,
            MarketKind::Dynamic {
                settlement: Settlement::FullAvailability,
                ..
            }
        ));
    }

    #[rstest]
    fn test_into_market_product_fixed(mut dynamic_raw: MarketRaw) {
        dynamic_raw.kind = MarketKindRaw::Fixed;
        dynamic_raw.min_price = None;
        dynamic_raw.max_price = None;
        dynamic_raw.avg_utilisation = None;
        let product = dynamic_raw.into_market_product().unwrap();
        assert_eq!(
            product.kind,
            MarketKind::Fixed {
                percent_of_peak: Dimensionless(0.01),
                settlement: Settlement::Capacity
            }
        );
    }

    #[rstest]
    fn test_into_market_product_events(mut dynamic_raw: MarketRaw) {
        dynamic_raw.avg_utilisation = None;
        dynamic_raw.avg_events_per_year = Some(8.0);
        dynamic_raw.avg_duration_hr = Some(2.0);
        let product = dynamic_raw.into_market_product().unwrap();
        assert!(matches!(
            product.kind,
            MarketKind::Dynamic {
                settlement: Settlement::PerEvent { .. },
                ..
            }
        ));
    }

    #[rstest]
    fn test_into_market_product_reference(mut dynamic_raw: MarketRaw) {
        dynamic_raw.kind = MarketKindRaw::Reference;
        assert_error!(
            dynamic_raw.into_market_product(),
            "Reference market products cannot have a percent_of_peak, price limits or settlement \
            fields"
        );
    }

    #[rstest]
    fn test_into_market_product_missing_band(mut dynamic_raw: MarketRaw) {
        dynamic_raw.max_price = None;
        assert_error!(
            dynamic_raw.into_market_product(),
            "min_price and max_price must be specified for dynamic market products"
        );
    }

    #[rstest]
    fn test_into_market_product_missing_percent_of_peak(mut dynamic_raw: MarketRaw) {
        dynamic_raw.percent_of_peak = None;
        assert_error!(
            dynamic_raw.into_market_product(),
            "percent_of_peak must be specified for cleared market products"
        );
    }

    #[rstest]
    fn test_into_market_product_fixed_with_band(mut dynamic_raw: MarketRaw) {
        dynamic_raw.kind = MarketKindRaw::Fixed;
        assert_error!(
            dynamic_raw.into_market_product(),
            "Fixed market products cannot have price limits"
        );
    }

    #[rstest]
    #[case(Some(8.0), Some(2.0), Some(0.2), "Cannot specify both event-based and utilisation-based settlement")]
    #[case(Some(8.0), None, None, "avg_events_per_year and avg_duration_hr must be specified together")]
    #[case(None, Some(2.0), None, "avg_events_per_year and avg_duration_hr must be specified together")]
    fn test_settlement_invalid(
        dynamic_raw: MarketRaw,
        #[case] events: Option<f64>,
        #[case] duration: Option<f64>,
        #[case] utilisation: Option<f64>,
        #[case] msg: &str,
    ) {
        let raw = MarketRaw {
            avg_events_per_year: events,
            avg_duration_hr: duration,
            avg_utilisation: utilisation,
            ..dynamic_raw
        };
        assert_error!(raw.settlement(Settlement::FullAvailability), msg);
    }

    #[rstest]
    fn test_read_markets_duplicate(dynamic_raw: MarketRaw) {
        let other = MarketRaw {
            description: "Another".into(),
            ..self::dynamic_raw()
        };
        assert_error!(
            read_markets_from_iter([dynamic_raw, other].into_iter()),
            "Duplicate ID found: balancing"
        );
    }

    #[rstest]
    fn test_read_markets(markets: Vec<MarketProduct>) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MARKETS_FILE_NAME)).unwrap();
            write!(
                file,
                "id,description,kind,price_unit,base_price,percent_of_peak,min_price,max_price,\
                avg_events_per_year,avg_duration_hr,avg_utilisation
capacity,Capacity (Fixed/Auctioned),fixed,€/MW-year,45000,0.05,,,,,
demand_response,Demand Response (mFRR),dynamic,€/MWh-event,120,0.025,40,180,8,2,
balancing,Balancing Energy (aFRR/mFRR),dynamic,€/MWh-utilized,85,0.01,30,150,,,0.2
ancillary,Ancillary Services (FCR/aFRR Cap),dynamic,€/MW-hour,9,0.008,5,20,,,
wholesale,Wholesale Energy (Reference),reference,€/MWh,70,,,,,,
"
            )
            .unwrap();
        }

        assert_eq!(read_markets(dir.path()).unwrap(), markets);
    }

    #[test]
    fn test_read_markets_bad_kind() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MARKETS_FILE_NAME)).unwrap();
            write!(
                file,
                "id,description,kind,price_unit,base_price,percent_of_peak,min_price,max_price,\
                avg_events_per_year,avg_duration_hr,avg_utilisation
capacity,Capacity,auctioned,€/MW-year,45000,0.05,,,,,
"
            )
            .unwrap();
        }

        assert!(read_markets(dir.path()).is_err());
    }
}
