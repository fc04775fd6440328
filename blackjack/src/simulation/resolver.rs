use log::debug;

use super::hand::{Hand, HandStatus};
use super::shoe::CardSource;
use crate::strategy::{pair_key, total_key, Action, StrategyTable};
use crate::{BlackjackError, Decision, Rule};

/// Drives one hand at a time from the deal to a terminal state, asking the
/// strategy table what to do at every step.
pub struct HandResolver<'a, T: StrategyTable + ?Sized> {
    table: &'a T,
    rule: &'a Rule,
}

impl<'a, T: StrategyTable + ?Sized> HandResolver<'a, T> {
    pub fn new(table: &'a T, rule: &'a Rule) -> Self {
        HandResolver { table, rule }
    }

    /// Looks up the chart entry for the current state of the hand and turns it
    /// into something that can legally be played.
    pub fn next_action(&self, hand: &Hand, column: &str) -> Result<Decision, BlackjackError> {
        let key = match total_key(hand.valuation()) {
            Some(key) => key,
            None => return Ok(Decision::Bust),
        };
        let first_decision = hand.cards().len() == 2;
        let may_double =
            first_decision && (hand.split_depth() == 0 || self.rule.allow_double_after_split);
        let may_surrender = self.rule.allow_surrender && first_decision && hand.split_depth() == 0;

        let decision = match self.table.lookup(&key, column)? {
            Action::Hit => Decision::Hit,
            Action::Stand => Decision::Stand,
            Action::DoubleOrHit if may_double => Decision::Double,
            Action::DoubleOrHit => Decision::Hit,
            Action::DoubleOrStand if may_double => Decision::Double,
            Action::DoubleOrStand => Decision::Stand,
            Action::Surrender if may_surrender => Decision::Surrender,
            Action::Surrender => Decision::Stand,
            Action::Split => {
                return Err(BlackjackError::IllegalAction {
                    key,
                    column: String::from(column),
                    action: Action::Split,
                })
            }
        };
        Ok(decision)
    }

    /// Plays the hand until it stands, doubles, surrenders or busts.
    pub fn resolve<S: CardSource>(
        &self,
        hand: &mut Hand,
        column: &str,
        shoe: &mut S,
    ) -> Result<HandStatus, BlackjackError> {
        loop {
            let decision = self.next_action(hand, column)?;
            hand.record(decision);
            let status = match decision {
                Decision::Hit => {
                    hand.receive_card(shoe.draw()?)?;
                    continue;
                }
                Decision::Double => {
                    hand.double_down();
                    hand.receive_card(shoe.draw()?)?;
                    HandStatus::Doubled
                }
                Decision::Stand => HandStatus::Stood,
                Decision::Surrender => HandStatus::Surrendered,
                Decision::Bust => HandStatus::Busted,
            };
            hand.finish(status);
            debug!("{} finished as {:?} against {}", hand, status, column);
            return Ok(status);
        }
    }

    /// Only an untouched pair below the split limit is offered to the chart.
    pub fn should_split(&self, hand: &Hand, column: &str) -> Result<bool, BlackjackError> {
        if !hand.is_untouched() || !hand.can_split() {
            return Ok(false);
        }
        if let Some(max_split_depth) = self.rule.max_split_depth {
            if hand.split_depth() >= max_split_depth {
                return Ok(false);
            }
        }
        let key = match pair_key(hand.cards()) {
            Some(key) => key,
            None => return Ok(false),
        };
        Ok(self.table.lookup(&key, column)? == Action::Split)
    }

    /// Splits a pair into two hands, each keeping one card of the pair and
    /// getting one fresh card. Each carries the unit wager.
    pub fn split<S: CardSource>(
        &self,
        hand: Hand,
        shoe: &mut S,
    ) -> Result<(Hand, Hand), BlackjackError> {
        let (kept_first, kept_second) = match hand.cards() {
            [first, second] => (*first, *second),
            _ => {
                return Err(BlackjackError::UnresolvableHand(format!(
                    "cannot split {}",
                    hand
                )))
            }
        };
        let first = Hand::from_split(&hand, kept_first, shoe.draw()?)?;
        let second = Hand::from_split(&hand, kept_second, shoe.draw()?)?;
        debug!("split {} into {} and {}", hand, first, second);
        Ok((first, second))
    }

    /// Plays every hand of a player, splitting first where the chart says so.
    /// Split offspring are played right after the split, first card first.
    /// Returns the finished hands in the order they were completed.
    pub fn resolve_all<S: CardSource, F: FnMut(&Hand)>(
        &self,
        hands: Vec<Hand>,
        column: &str,
        shoe: &mut S,
        mut on_split: F,
    ) -> Result<Vec<Hand>, BlackjackError> {
        let mut pending: Vec<Hand> = hands.into_iter().rev().collect();
        let mut finished = Vec::with_capacity(pending.len());
        while let Some(mut hand) = pending.pop() {
            if self.should_split(&hand, column)? {
                on_split(&hand);
                let (first, second) = self.split(hand, shoe)?;
                pending.push(second);
                pending.push(first);
                continue;
            }
            self.resolve(&mut hand, column, shoe)?;
            finished.push(hand);
        }
        Ok(finished)
    }
}
