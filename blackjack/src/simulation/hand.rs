use crate::valuation::{evaluate, HandValue, Valuation};
use crate::{BlackjackError, Card, Decision};

/// How a hand left the decision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStatus {
    InPlay,
    Stood,
    Doubled,
    Surrendered,
    Busted,
}

/// Settlement outcome of a hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandResult {
    Undetermined,
    Push,
    Win,
    Blackjack,
    Loss,
    Surrender,
}

/// A group of cards with the bet riding on it. The valuation is recomputed
/// whenever the cards change.
#[derive(Debug, Clone)]
pub struct Hand {
    cards: Vec<Card>,
    wager_unit: f64,
    wager: f64,
    valuation: Valuation,
    status: HandStatus,
    result: HandResult,
    split_depth: u8,
    decisions: Vec<Decision>,
}

impl Hand {
    pub fn deal(wager_unit: f64, first: Card, second: Card) -> Result<Hand, BlackjackError> {
        Self::with_cards(vec![first, second], wager_unit, 0)
    }

    /// One half of a split: a card of the parent pair plus a fresh card.
    pub fn from_split(parent: &Hand, kept: Card, drawn: Card) -> Result<Hand, BlackjackError> {
        Self::with_cards(
            vec![kept, drawn],
            parent.wager_unit,
            parent.split_depth.saturating_add(1),
        )
    }

    fn with_cards(cards: Vec<Card>, wager_unit: f64, split_depth: u8) -> Result<Hand, BlackjackError> {
        let valuation = evaluate(&cards)?;
        Ok(Hand {
            cards,
            wager_unit,
            wager: wager_unit,
            valuation,
            status: HandStatus::InPlay,
            result: HandResult::Undetermined,
            split_depth,
            decisions: Vec::new(),
        })
    }

    /// The hand receives a given card.
    pub fn receive_card(&mut self, card: Card) -> Result<(), BlackjackError> {
        self.cards.push(card);
        self.valuation = evaluate(&self.cards)?;
        Ok(())
    }

    /// Doubles down the hand. The card is dealt by the caller.
    pub fn double_down(&mut self) {
        self.wager = 2.0 * self.wager_unit;
    }

    pub fn record(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    pub fn finish(&mut self, status: HandStatus) {
        self.status = status;
    }

    /// Settlement writes the result exactly once.
    pub fn set_result(&mut self, result: HandResult) -> Result<(), BlackjackError> {
        if self.result != HandResult::Undetermined {
            return Err(BlackjackError::ResultAlreadySet);
        }
        self.result = result;
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn wager_unit(&self) -> f64 {
        self.wager_unit
    }

    pub fn wager(&self) -> f64 {
        self.wager
    }

    pub fn valuation(&self) -> &Valuation {
        &self.valuation
    }

    pub fn value(&self) -> HandValue {
        self.valuation.value
    }

    pub fn is_soft(&self) -> bool {
        self.valuation.is_soft
    }

    pub fn is_bust(&self) -> bool {
        self.valuation.is_bust()
    }

    pub fn is_natural(&self) -> bool {
        self.valuation.is_natural
    }

    pub fn can_split(&self) -> bool {
        self.valuation.can_split
    }

    /// No decision has been taken and no card added since the deal or split.
    pub fn is_untouched(&self) -> bool {
        self.cards.len() == 2 && self.decisions.is_empty()
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub fn result(&self) -> HandResult {
        self.result
    }

    pub fn split_depth(&self) -> u8 {
        self.split_depth
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WAGER: {} HAND:", self.wager)?;
        for card in &self.cards {
            write!(f, " {}", card)?;
        }
        Ok(())
    }
}
