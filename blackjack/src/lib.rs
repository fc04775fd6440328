pub mod card;
mod error;
pub mod settlement;
pub mod simulation;
pub mod strategy;
pub mod valuation;

pub use card::Card;
pub use error::BlackjackError;
pub use strategy::{Action, ChartTable, DealerPolicy, StrategyTable};
pub use valuation::{evaluate, HandValue, Valuation};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rule {
    pub number_of_decks: u8,
    /// Fraction of the shoe dealt before the discard pile is shuffled back in.
    pub penetration_depth: f64,
    /// How many times a hand and its offspring may be split. None for no limit.
    pub max_split_depth: Option<u8>,
    pub allow_double_after_split: bool,
    pub allow_surrender: bool,
    /// Dealer checks her hole card for a natural before players act.
    pub dealer_peeks: bool,

    pub payout_blackjack: f64,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 6,
            penetration_depth: 0.66,
            max_split_depth: None,
            allow_double_after_split: true,
            allow_surrender: false,
            dealer_peeks: false,
            payout_blackjack: 1.5,
        }
    }
}

impl Rule {
    pub fn validate(&self) -> Result<(), BlackjackError> {
        if self.number_of_decks == 0 {
            return Err(BlackjackError::InvalidRule(String::from(
                "number_of_decks must be at least 1",
            )));
        }
        if !(self.penetration_depth > 0.0 && self.penetration_depth < 1.0) {
            return Err(BlackjackError::InvalidRule(format!(
                "penetration_depth must be in (0, 1), got {}",
                self.penetration_depth
            )));
        }
        if !(self.payout_blackjack >= 0.0) {
            return Err(BlackjackError::InvalidRule(format!(
                "payout_blackjack cannot be negative, got {}",
                self.payout_blackjack
            )));
        }
        Ok(())
    }
}

/// What the resolver does with a hand after normalising the chart entry
/// against the rules and the state of the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Surrender,
    Bust,
}
