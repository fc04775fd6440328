use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

pub const CARDS_PER_DECK: usize = 52;
const SUITS_PER_DECK: usize = 4;

/// A card rank. Suits play no part in blackjack, and every ten-valued rank
/// (10, J, Q, K) shares the single symbol `10`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Card {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
}

impl Card {
    /// Blackjack value with Ace counted as 1.
    pub fn points(&self) -> u8 {
        match self {
            Card::Ace => 1,
            Card::Two => 2,
            Card::Three => 3,
            Card::Four => 4,
            Card::Five => 5,
            Card::Six => 6,
            Card::Seven => 7,
            Card::Eight => 8,
            Card::Nine => 9,
            Card::Ten => 10,
        }
    }

    pub fn is_ace(&self) -> bool {
        *self == Card::Ace
    }

    fn copies_per_suit(&self) -> usize {
        match self {
            Card::Ten => 4,
            _ => 1,
        }
    }
}

/// Cards of `number_of_decks` standard decks, in order.
pub fn standard_decks(number_of_decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(number_of_decks as usize * CARDS_PER_DECK);
    for _ in 0..number_of_decks as usize * SUITS_PER_DECK {
        for card in Card::iter() {
            for _ in 0..card.copies_per_suit() {
                cards.push(card);
            }
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_deck_composition() {
        let deck = standard_decks(1);
        assert_eq!(deck.len(), CARDS_PER_DECK);
        assert_eq!(deck.iter().filter(|c| **c == Card::Ten).count(), 16);
        assert_eq!(deck.iter().filter(|c| c.is_ace()).count(), 4);
        assert_eq!(deck.iter().filter(|c| **c == Card::Seven).count(), 4);
        let total: u32 = deck.iter().map(|c| c.points() as u32).sum();
        assert_eq!(total, 4 * (1 + 2 + 3 + 4 + 5 + 6 + 7 + 8 + 9 + 40));
    }

    #[test]
    fn six_decks_is_a_concatenation() {
        assert_eq!(standard_decks(6).len(), 312);
    }

    #[test]
    fn symbols_round_trip() {
        assert_eq!(Card::Ace.to_string(), "A");
        assert_eq!(Card::Ten.to_string(), "10");
        assert_eq!("7".parse::<Card>().unwrap(), Card::Seven);
        assert!("K".parse::<Card>().is_err());
    }
}
