use thiserror::Error;

use crate::strategy::Action;

/// Everything that can stop a round from completing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlackjackError {
    #[error("out of cards: the shoe is empty")]
    ShoeExhausted,

    #[error("unresolvable hand: {0}")]
    UnresolvableHand(String),

    #[error("strategy table has no entry for row {key:?} and column {column:?}")]
    MissingTableEntry { key: String, column: String },

    #[error("strategy table entry {action} for row {key:?} and column {column:?} cannot be played")]
    IllegalAction {
        key: String,
        column: String,
        action: Action,
    },

    #[error("{operation} is only allowed in {phase} phase")]
    WrongPhase { operation: String, phase: String },

    #[error("the result of this hand has already been determined")]
    ResultAlreadySet,

    #[error("invalid rule: {0}")]
    InvalidRule(String),
}
