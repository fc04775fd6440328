use crate::card::standard_decks;
use crate::{BlackjackError, Card};

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Where the engine gets its cards from.
pub trait CardSource {
    fn draw(&mut self) -> Result<Card, BlackjackError>;
    fn is_empty(&self) -> bool;
}

/// Represents a shoe in the real world. The top of the shoe is the end of
/// `cards`.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    number_of_cards: usize,
    rng: StdRng,
}

impl Shoe {
    /// Creates a new shoe with ordered cards. Pass a seed to make every
    /// shuffle reproducible.
    pub fn new(number_of_decks: u8, seed: Option<u64>) -> Shoe {
        let cards = standard_decks(number_of_decks);
        Shoe {
            number_of_cards: cards.len(),
            cards,
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    /// Creates a shoe that deals exactly `draw_order`, first card first.
    pub fn stacked(draw_order: &[Card]) -> Shoe {
        let mut cards = draw_order.to_vec();
        cards.reverse();
        Shoe {
            number_of_cards: cards.len(),
            cards,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn number_of_cards(&self) -> usize {
        self.number_of_cards
    }

    /// Checks if less than `1 - depth` of the shoe remains.
    pub fn reached_penetration(&self, depth: f64) -> bool {
        (1.0 - depth) > self.cards.len() as f64 / self.number_of_cards as f64
    }

    /// Puts the discard pile back into the shoe and shuffles everything.
    pub fn reshuffle(&mut self, discard: &mut Vec<Card>) {
        info!(
            "shuffling {} discarded cards back into the shoe ({} left)",
            discard.len(),
            self.cards.len()
        );
        self.cards.append(discard);
        self.shuffle();
    }
}

impl CardSource for Shoe {
    fn draw(&mut self) -> Result<Card, BlackjackError> {
        self.cards.pop().ok_or(BlackjackError::ShoeExhausted)
    }

    fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Card::*;

    fn sorted(mut cards: Vec<Card>) -> Vec<u8> {
        cards.sort_by_key(|c| c.points());
        cards.into_iter().map(|c| c.points()).collect()
    }

    #[test]
    fn new_shoe_holds_every_deck() {
        let shoe = Shoe::new(6, Some(1));
        assert_eq!(shoe.remaining(), 312);
        assert_eq!(shoe.number_of_cards(), 312);
    }

    #[test]
    fn stacked_shoe_deals_in_order() {
        let mut shoe = Shoe::stacked(&[Ace, Two, Ten]);
        assert_eq!(shoe.draw(), Ok(Ace));
        assert_eq!(shoe.draw(), Ok(Two));
        assert_eq!(shoe.draw(), Ok(Ten));
        assert!(shoe.is_empty());
    }

    #[test]
    fn empty_shoe_fails_to_draw() {
        let mut shoe = Shoe::stacked(&[Five]);
        assert!(shoe.draw().is_ok());
        assert_eq!(shoe.draw(), Err(BlackjackError::ShoeExhausted));
        assert_eq!(shoe.draw(), Err(BlackjackError::ShoeExhausted));
    }

    #[test]
    fn shuffle_keeps_composition() {
        let mut shoe = Shoe::new(2, Some(42));
        let before = sorted(shoe.cards.clone());
        shoe.shuffle();
        assert_eq!(sorted(shoe.cards.clone()), before);
    }

    #[test]
    fn same_seed_same_order() {
        let mut first = Shoe::new(1, Some(9));
        let mut second = Shoe::new(1, Some(9));
        first.shuffle();
        second.shuffle();
        while !first.is_empty() {
            assert_eq!(first.draw(), second.draw());
        }
        assert!(second.is_empty());
    }

    #[test]
    fn penetration_and_reshuffle() {
        let mut shoe = Shoe::new(1, Some(5));
        let mut discard = Vec::new();
        for _ in 0..34 {
            discard.push(shoe.draw().unwrap());
        }
        // 18 of 52 left: 0.346 > 0.34
        assert!(!shoe.reached_penetration(0.66));
        discard.push(shoe.draw().unwrap());
        assert!(shoe.reached_penetration(0.66));

        shoe.reshuffle(&mut discard);
        assert!(discard.is_empty());
        assert_eq!(shoe.remaining(), 52);
        assert!(!shoe.reached_penetration(0.66));
    }
}
