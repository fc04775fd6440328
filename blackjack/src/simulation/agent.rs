use log::debug;

use super::hand::Hand;
use super::shoe::CardSource;
use crate::{BlackjackError, Card};

/// A seat at the table. Plays `number_of_hands` hands of `bet_size` each
/// round.
#[derive(Debug, Clone)]
pub struct Player {
    bankroll: f64,
    bet_size: f64,
    number_of_hands: u8,
    hands: Vec<Hand>,
    final_hands: Vec<Hand>,
}

impl Player {
    pub fn new(bankroll: f64, bet_size: f64, number_of_hands: u8) -> Player {
        Player {
            bankroll,
            bet_size,
            number_of_hands,
            hands: Vec::with_capacity(number_of_hands as usize),
            final_hands: Vec::new(),
        }
    }

    /// Deals two cards to every hand and takes the bets from the bankroll.
    /// Returns the amount staked.
    pub fn deal_hands<S: CardSource>(&mut self, shoe: &mut S) -> Result<f64, BlackjackError> {
        for _ in 0..self.number_of_hands {
            let first = shoe.draw()?;
            let second = shoe.draw()?;
            self.hands.push(Hand::deal(self.bet_size, first, second)?);
        }
        let staked = self.bet_size * self.number_of_hands as f64;
        self.bankroll -= staked;
        debug!("player staked {} on {} hands", staked, self.number_of_hands);
        Ok(staked)
    }

    /// Takes the extra money for doubles and split offspring.
    pub fn stake(&mut self, amount: f64) {
        self.bankroll -= amount;
    }

    pub fn credit(&mut self, amount: f64) {
        self.bankroll += amount;
    }

    /// Hands still waiting to be played, handed over to the resolver.
    pub fn take_hands(&mut self) -> Vec<Hand> {
        std::mem::take(&mut self.hands)
    }

    pub fn finalize_hand(&mut self, hand: Hand) {
        self.final_hands.push(hand);
    }

    /// Returns every card this player holds to the discard pile.
    pub fn clear_hands(&mut self, discard: &mut Vec<Card>) {
        for hand in self.hands.drain(..).chain(self.final_hands.drain(..)) {
            discard.extend(hand.into_cards());
        }
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn final_hands(&self) -> &[Hand] {
        &self.final_hands
    }

    pub(crate) fn final_hands_mut(&mut self) -> &mut [Hand] {
        &mut self.final_hands
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn bet_size(&self) -> f64 {
        self.bet_size
    }

    pub fn number_of_hands(&self) -> u8 {
        self.number_of_hands
    }
}

/// The house. Up card and hole card are kept apart so only the up card is
/// visible while players act; the full hand exists once it is revealed.
#[derive(Debug, Clone)]
pub struct Dealer {
    bankroll: f64,
    up_card: Option<Card>,
    hole_card: Option<Card>,
    hand: Option<Hand>,
}

impl Dealer {
    pub fn new(bankroll: f64) -> Dealer {
        Dealer {
            bankroll,
            up_card: None,
            hole_card: None,
            hand: None,
        }
    }

    pub fn receive_hole_card(&mut self, card: Card) {
        self.hole_card = Some(card);
    }

    pub fn receive_up_card(&mut self, card: Card) {
        self.up_card = Some(card);
    }

    pub fn up_card(&self) -> Option<Card> {
        self.up_card
    }

    /// Looks under the hole card for a natural without revealing the hand.
    pub fn peeks_natural(&self) -> Result<bool, BlackjackError> {
        let (up, hole) = self.dealt_cards()?;
        Ok(Hand::deal(0.0, up, hole)?.is_natural())
    }

    /// Turns the hole card over. The dealer's hand carries no wager.
    pub fn reveal(&mut self) -> Result<&mut Hand, BlackjackError> {
        let (up, hole) = self.dealt_cards()?;
        Ok(self.hand.insert(Hand::deal(0.0, up, hole)?))
    }

    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn take_stakes(&mut self, amount: f64) {
        self.bankroll += amount;
    }

    pub fn pay(&mut self, amount: f64) {
        self.bankroll -= amount;
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn clear_hands(&mut self, discard: &mut Vec<Card>) {
        match self.hand.take() {
            Some(hand) => discard.extend(hand.into_cards()),
            None => discard.extend(self.up_card.iter().chain(self.hole_card.iter())),
        }
        self.up_card = None;
        self.hole_card = None;
    }

    fn dealt_cards(&self) -> Result<(Card, Card), BlackjackError> {
        match (self.up_card, self.hole_card) {
            (Some(up), Some(hole)) => Ok((up, hole)),
            _ => Err(BlackjackError::UnresolvableHand(String::from(
                "dealer has not been dealt both cards",
            ))),
        }
    }
}
