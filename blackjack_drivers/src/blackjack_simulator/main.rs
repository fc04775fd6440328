mod simulation;

use anyhow::{bail, Context};
use blackjack_drivers::parse_config_from_file;
use clap::Parser;

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Number of rounds to play, overriding the config file
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Seed of the first shoe, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = CommandLineArgs::parse();
    if args.config == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().context("Cannot find home directory")?;
        let config_file_path = home_dir.join(".blackjack.yml");
        if !config_file_path.exists() {
            bail!("Config file {} not exists", config_file_path.display());
        }
        if config_file_path.is_dir() {
            bail!("This should be a path rather than a directory");
        }
        args.config = config_file_path.to_string_lossy().into_owned();
    }
    let args = args;

    let mut config = parse_config_from_file(&args.config)?;
    if let Some(rounds) = args.rounds {
        config.blackjack_simulator.number_of_rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.blackjack_simulator.seed = Some(seed);
    }
    log::debug!("{:#?}", config);

    let report = simulation::simulate(&config)?;
    simulation::print_report(&report);
    if !report.failures.is_empty() {
        bail!(
            "{} of {} tables failed",
            report.failures.len(),
            report.failures.len() + report.threads.len()
        );
    }
    Ok(())
}
