//! Functionality for running the flexibility market simulation.
//!
//! The simulation runs in three stages. The consumer model comes first, as the flexibility it
//! offers feeds into both the aggregator model and the utility market model.
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use log::info;

pub mod aggregator;
use aggregator::{AggregatorOutcome, run_aggregator_model};
pub mod consumer;
use consumer::{ConsumerOutcome, run_consumer_model};
pub mod utility;
use utility::{MarketOutcome, run_utility_model};

/// The results of a single simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Results of the consumer model
    pub consumer: ConsumerOutcome,
    /// Results of the aggregator model, or `None` if there is no aggregator
    pub aggregator: Option<AggregatorOutcome>,
    /// Results for each market product, in scenario order
    pub markets: Vec<MarketOutcome>,
}

/// Run the simulation.
///
/// The scenario is validated before anything is calculated, so an invalid scenario never produces
/// partial results.
///
/// # Arguments:
///
/// * `scenario` - The scenario to simulate
pub fn run(scenario: &Scenario) -> Result<SimulationResult> {
    scenario.validate().context("Invalid scenario")?;
    scenario.warn_if_degenerate();

    let consumer = run_consumer_model(scenario);
    info!(
        "{} participating households with {} devices offer {:.2} MW of flexibility",
        consumer.participating_households,
        consumer.total_devices,
        consumer.total_flexibility.to_capacity().value()
    );

    let aggregator = scenario.aggregator_params().map(|params| {
        let outcome = run_aggregator_model(
            params,
            consumer.participating_households,
            consumer.total_flexibility,
        );
        info!(
            "Aggregator margin: {:.2}M per year, NPV: {:.2}M",
            outcome.margin.value() / 1e6,
            outcome.npv.value() / 1e6
        );
        outcome
    });
    if aggregator.is_none() {
        info!("No aggregator in this scenario: skipping aggregator model");
    }

    let markets = run_utility_model(
        &scenario.utility,
        &scenario.markets,
        consumer.total_flexibility,
    );
    info!("Priced {} market products", markets.len());

    Ok(SimulationResult {
        consumer,
        aggregator,
        markets,
    })
}
