//! The command line interface for the simulation.
use crate::input::load_scenario;
use crate::log;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::units::Dimensionless;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Values which replace those in the scenario files
#[derive(Args, Default)]
pub struct ScenarioOverrides {
    /// Total number of households in the market area
    #[arg(long)]
    pub households: Option<u64>,
    /// The proportion of households taking part (between 0 and 1)
    #[arg(long)]
    pub penetration_rate: Option<f64>,
    /// Whether an aggregator takes part
    #[arg(long)]
    pub aggregator: Option<bool>,
}

impl ScenarioOverrides {
    /// Replace values in `scenario` with any that were given on the command line
    pub fn apply(&self, scenario: &mut Scenario) {
        if let Some(households) = self.households {
            scenario.households = households;
        }
        if let Some(penetration_rate) = self.penetration_rate {
            scenario.penetration_rate = Dimensionless(penetration_rate);
        }
        if let Some(aggregator) = self.aggregator {
            scenario.aggregator_present = aggregator;
        }
    }

    /// Log the values which were overridden.
    ///
    /// Separate from [`Self::apply`] as scenarios are loaded before the logger is initialised.
    fn log_applied(&self) {
        if let Some(households) = self.households {
            info!("Overriding number of households: {households}");
        }
        if let Some(penetration_rate) = self.penetration_rate {
            info!("Overriding penetration rate: {penetration_rate}");
        }
        if let Some(aggregator) = self.aggregator {
            info!("Overriding aggregator presence: {aggregator}");
        }
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a simulation.
    Run {
        /// Path to the scenario directory.
        scenario_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
        /// Scenario overrides
        #[command(flatten)]
        overrides: ScenarioOverrides,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a scenario.
    Validate {
        /// The path to the scenario directory.
        scenario_dir: PathBuf,
        /// Scenario overrides
        #[command(flatten)]
        overrides: ScenarioOverrides,
    },
    /// Manage program settings.
    Settings {
        /// The subcommands for managing settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_dir,
                opts,
                overrides,
            } => handle_run_command(&scenario_dir, &opts, &overrides, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate {
                scenario_dir,
                overrides,
            } => handle_validate_command(&scenario_dir, &overrides, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ flexmarket --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Load a scenario and apply overrides to it
fn load_scenario_with_overrides(
    scenario_path: &Path,
    overrides: &ScenarioOverrides,
) -> Result<Scenario> {
    let mut scenario = load_scenario(scenario_path)?;
    overrides.apply(&mut scenario);
    scenario.validate()?;

    Ok(scenario)
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    overrides: &ScenarioOverrides,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Load and validate the scenario before touching the output folder
    let scenario = load_scenario_with_overrides(scenario_path, overrides)
        .context("Failed to load scenario.")?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(scenario_path)?;
        &pathbuf
    };

    // The command-line flag can only switch overwriting on
    let allow_overwrite = opts.overwrite || settings.overwrite;
    let overwrite = create_output_directory(output_path, allow_overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    overrides.log_applied();
    info!("Loaded scenario from {}", scenario_path.display());
    info!("Output folder: {}", output_path.display());

    // Run the simulation
    let result = crate::simulation::run(&scenario)?;
    write_results(output_path, scenario_path, &result).context("Failed to save results.")?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    scenario_path: &Path,
    overrides: &ScenarioOverrides,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let scenario = load_scenario_with_overrides(scenario_path, overrides)
        .context("Failed to validate scenario.")?;
    overrides.log_applied();
    scenario.warn_if_degenerate();
    info!("Scenario validation successful!");

    Ok(())
}
