use anyhow::Context;
use blackjack::{ChartTable, DealerPolicy};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub blackjack_simulator: ConfigBlackjackSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub penetration_depth: f64,
    #[serde(default)]
    pub max_split_depth: Option<u8>,
    pub allow_double_after_split: bool,
    pub allow_surrender: bool,
    pub dealer_peeks: bool,
    pub dealer_policy: String,

    pub payout_blackjack: f64,
}

impl ConfigRule {
    pub fn dealer_policy(&self) -> Result<DealerPolicy, serde::de::value::Error> {
        self.dealer_policy.parse()
    }
}

impl TryInto<blackjack::Rule> for ConfigRule {
    type Error = blackjack::BlackjackError;

    fn try_into(self) -> Result<blackjack::Rule, Self::Error> {
        let blackjack_rule = blackjack::Rule {
            number_of_decks: self.number_of_decks,
            penetration_depth: self.penetration_depth,
            max_split_depth: self.max_split_depth,
            allow_double_after_split: self.allow_double_after_split,
            allow_surrender: self.allow_surrender,
            dealer_peeks: self.dealer_peeks,
            payout_blackjack: self.payout_blackjack,
        };
        blackjack_rule.validate()?;

        Ok(blackjack_rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigBlackjackSimulator {
    pub number_of_threads: usize,
    pub number_of_rounds: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    pub players: Vec<ConfigPlayer>,
    /// Chart file for the players. Basic strategy when absent.
    #[serde(default)]
    pub player_table: Option<String>,
    /// Chart file for the dealer. Follows `dealer_policy` when absent.
    #[serde(default)]
    pub dealer_table: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPlayer {
    pub bankroll: f64,
    pub bet_size: f64,
    pub number_of_hands: u8,
}

impl From<&ConfigPlayer> for blackjack::simulation::agent::Player {
    fn from(player: &ConfigPlayer) -> Self {
        blackjack::simulation::agent::Player::new(
            player.bankroll,
            player.bet_size,
            player.number_of_hands,
        )
    }
}

/// Parses the content of a config file.
pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    serde_yaml::from_str(content).context("Invalid config file")
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> anyhow::Result<Config> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("Cannot read config file {}", filename))?;
    parse_config(&file_content).with_context(|| format!("While parsing {}", filename))
}

/// Reads a chart file: a mapping of row key to a mapping of column to action
/// code. Keys that YAML would read as numbers must be quoted.
pub fn load_strategy_table(filename: &str) -> anyhow::Result<ChartTable> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("Cannot read strategy table {}", filename))?;
    serde_yaml::from_str(&file_content)
        .with_context(|| format!("Invalid strategy table {}", filename))
}

/// Tables the players and the dealer play by, from files when configured.
pub fn load_tables(config: &Config) -> anyhow::Result<(ChartTable, ChartTable)> {
    let simulator = &config.blackjack_simulator;
    let player_table = match &simulator.player_table {
        Some(filename) => load_strategy_table(filename)?,
        None => ChartTable::basic_strategy(),
    };
    let dealer_table = match &simulator.dealer_table {
        Some(filename) => load_strategy_table(filename)?,
        None => config
            .rule
            .dealer_policy()
            .context("dealer_policy must be S17 or H17")?
            .chart(),
    };
    Ok((player_table, dealer_table))
}
