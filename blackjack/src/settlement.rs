use log::debug;

use crate::simulation::agent::Player;
use crate::simulation::hand::{Hand, HandResult, HandStatus};
use crate::{BlackjackError, Rule};

/// Counts of every result written during one settlement pass, plus the money
/// handed back to the players.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettlementSummary {
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub blackjacks: u32,
    pub surrenders: u32,
    pub credited: f64,
}

impl SettlementSummary {
    fn add(&mut self, result: HandResult, credit: f64) {
        match result {
            HandResult::Win => self.wins += 1,
            HandResult::Push => self.pushes += 1,
            HandResult::Loss => self.losses += 1,
            HandResult::Blackjack => self.blackjacks += 1,
            HandResult::Surrender => self.surrenders += 1,
            HandResult::Undetermined => {}
        }
        self.credited += credit;
    }

    pub fn number_of_hands(&self) -> u32 {
        self.wins + self.pushes + self.losses + self.blackjacks + self.surrenders
    }
}

/// Result of a finished player hand against the dealer's final hand.
/// Depends on nothing but the two hands.
pub fn classify(hand: &Hand, dealer: &Hand) -> HandResult {
    if hand.is_bust() {
        return HandResult::Loss;
    }
    if hand.status() == HandStatus::Surrendered {
        return HandResult::Surrender;
    }
    if dealer.is_natural() {
        return if hand.is_natural() {
            HandResult::Push
        } else {
            HandResult::Loss
        };
    }
    if hand.is_natural() {
        return HandResult::Blackjack;
    }
    if dealer.is_bust() {
        return HandResult::Win;
    }
    match hand.valuation().total().cmp(&dealer.valuation().total()) {
        std::cmp::Ordering::Greater => HandResult::Win,
        std::cmp::Ordering::Equal => HandResult::Push,
        std::cmp::Ordering::Less => HandResult::Loss,
    }
}

/// Money returned to the player for a hand, stake included.
pub fn payout(result: HandResult, wager: f64, rule: &Rule) -> f64 {
    match result {
        HandResult::Win => 2.0 * wager,
        HandResult::Push => wager,
        HandResult::Blackjack => wager + wager * rule.payout_blackjack,
        HandResult::Surrender => wager / 2.0,
        HandResult::Loss | HandResult::Undetermined => 0.0,
    }
}

/// Writes a result on every final hand of every player and credits the
/// payouts. Stakes were taken when the hands came into play.
pub fn settle(
    dealer: &Hand,
    players: &mut [Player],
    rule: &Rule,
) -> Result<SettlementSummary, BlackjackError> {
    let mut summary = SettlementSummary::default();
    for player in players.iter_mut() {
        let mut credit = 0.0;
        for hand in player.final_hands_mut() {
            let result = classify(hand, dealer);
            hand.set_result(result)?;
            let amount = payout(result, hand.wager(), rule);
            debug!("{} against dealer {}: {:?}, pays {}", hand, dealer, result, amount);
            summary.add(result, amount);
            credit += amount;
        }
        player.credit(credit);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::shoe::{CardSource, Shoe};
    use crate::Card::*;
    use crate::Card;

    fn finished(cards: &[Card], status: HandStatus) -> Hand {
        let mut hand = Hand::deal(10.0, cards[0], cards[1]).unwrap();
        for card in &cards[2..] {
            hand.receive_card(*card).unwrap();
        }
        hand.finish(status);
        hand
    }

    fn player_with(hands: Vec<Hand>) -> Player {
        let mut player = Player::new(0.0, 10.0, hands.len() as u8);
        for hand in hands {
            player.finalize_hand(hand);
        }
        player
    }

    #[test]
    fn dealer_natural_same_pass() {
        let dealer = finished(&[Ace, Ten], HandStatus::Stood);
        let mut players = vec![player_with(vec![
            finished(&[Ten, Nine], HandStatus::Stood),
            finished(&[Ace, Ten], HandStatus::Stood),
        ])];
        let summary = settle(&dealer, &mut players, &Rule::default()).unwrap();
        let results: Vec<HandResult> = players[0].final_hands().iter().map(|h| h.result()).collect();
        assert_eq!(results, vec![HandResult::Loss, HandResult::Push]);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.pushes, 1);
        assert_eq!(summary.credited, 10.0);
        assert_eq!(players[0].bankroll(), 10.0);
    }

    #[test]
    fn classify_against_dealer() {
        let dealer_19 = finished(&[Ten, Nine], HandStatus::Stood);
        let dealer_bust = finished(&[Ten, Six, Eight], HandStatus::Busted);

        let twenty = finished(&[Ten, Ten], HandStatus::Stood);
        let nineteen = finished(&[Ten, Five, Four], HandStatus::Stood);
        let eighteen = finished(&[Ten, Eight], HandStatus::Stood);
        let bust = finished(&[Ten, Five, Nine], HandStatus::Busted);
        let natural = finished(&[Ten, Ace], HandStatus::Stood);
        let surrendered = finished(&[Ten, Six], HandStatus::Surrendered);

        assert_eq!(classify(&twenty, &dealer_19), HandResult::Win);
        assert_eq!(classify(&nineteen, &dealer_19), HandResult::Push);
        assert_eq!(classify(&eighteen, &dealer_19), HandResult::Loss);
        assert_eq!(classify(&natural, &dealer_19), HandResult::Blackjack);
        assert_eq!(classify(&surrendered, &dealer_19), HandResult::Surrender);

        assert_eq!(classify(&eighteen, &dealer_bust), HandResult::Win);
        assert_eq!(classify(&bust, &dealer_bust), HandResult::Loss);
    }

    #[test]
    fn split_natural_is_blackjack() {
        let parent = Hand::deal(10.0, Ace, Ace).unwrap();
        let mut child = Hand::from_split(&parent, Ace, Ten).unwrap();
        child.finish(HandStatus::Stood);
        let dealer_20 = finished(&[Ten, Ten], HandStatus::Stood);
        let dealer_natural = finished(&[Ace, Ten], HandStatus::Stood);
        assert_eq!(classify(&child, &dealer_20), HandResult::Blackjack);
        assert_eq!(classify(&child, &dealer_natural), HandResult::Push);

        let mut players = vec![player_with(vec![child])];
        let summary = settle(&dealer_20, &mut players, &Rule::default()).unwrap();
        assert_eq!(summary.blackjacks, 1);
        assert_eq!(summary.credited, 25.0);
        assert_eq!(players[0].bankroll(), 25.0);
    }

    #[test]
    fn payouts_include_the_stake() {
        let rule = Rule::default();
        assert_eq!(payout(HandResult::Win, 10.0, &rule), 20.0);
        assert_eq!(payout(HandResult::Push, 10.0, &rule), 10.0);
        assert_eq!(payout(HandResult::Blackjack, 10.0, &rule), 25.0);
        assert_eq!(payout(HandResult::Surrender, 10.0, &rule), 5.0);
        assert_eq!(payout(HandResult::Loss, 10.0, &rule), 0.0);

        let rule = Rule {
            payout_blackjack: 2.0,
            ..Rule::default()
        };
        assert_eq!(payout(HandResult::Blackjack, 10.0, &rule), 30.0);
    }

    #[test]
    fn doubled_hand_pays_on_the_doubled_wager() {
        let mut hand = Hand::deal(10.0, Five, Six).unwrap();
        hand.double_down();
        hand.receive_card(Ten).unwrap();
        hand.finish(HandStatus::Doubled);
        let dealer = finished(&[Ten, Seven], HandStatus::Stood);
        let mut players = vec![player_with(vec![hand])];
        let summary = settle(&dealer, &mut players, &Rule::default()).unwrap();
        assert_eq!(summary.wins, 1);
        assert_eq!(players[0].bankroll(), 40.0);
    }

    #[test]
    fn every_hand_is_settled() {
        let dealer = finished(&[Ten, Eight], HandStatus::Stood);
        let mut players = vec![
            player_with(vec![
                finished(&[Ten, Six, Ten], HandStatus::Busted),
                finished(&[Ten, Nine], HandStatus::Stood),
            ]),
            player_with(vec![
                finished(&[Ace, Ten], HandStatus::Stood),
                finished(&[Ten, Eight], HandStatus::Stood),
                finished(&[Ten, Six], HandStatus::Surrendered),
            ]),
        ];
        let summary = settle(&dealer, &mut players, &Rule::default()).unwrap();
        assert_eq!(summary.number_of_hands(), 5);
        assert!(players
            .iter()
            .flat_map(|p| p.final_hands())
            .all(|h| h.result() != HandResult::Undetermined));
        assert_eq!(players[0].bankroll(), 20.0);
        assert_eq!(players[1].bankroll(), 25.0 + 10.0 + 5.0);
    }

    #[test]
    fn settling_twice_fails() {
        let dealer = finished(&[Ten, Eight], HandStatus::Stood);
        let mut players = vec![player_with(vec![finished(&[Ten, Nine], HandStatus::Stood)])];
        settle(&dealer, &mut players, &Rule::default()).unwrap();
        assert_eq!(
            settle(&dealer, &mut players, &Rule::default()),
            Err(BlackjackError::ResultAlreadySet)
        );
    }

    #[test]
    fn settlement_order_does_not_matter() {
        let mut shoe = Shoe::new(1, Some(17));
        shoe.shuffle();
        let mut draw = || shoe.draw().unwrap();
        let dealer = finished(&[draw(), draw()], HandStatus::Stood);
        let hands: Vec<Hand> = (0..8)
            .map(|_| finished(&[draw(), draw()], HandStatus::Stood))
            .collect();

        let forward: Vec<HandResult> = hands.iter().map(|h| classify(h, &dealer)).collect();
        let mut backward: Vec<HandResult> =
            hands.iter().rev().map(|h| classify(h, &dealer)).collect();
        backward.reverse();
        assert_eq!(forward, backward);

        let mut forward_players: Vec<Player> =
            hands.iter().map(|h| player_with(vec![h.clone()])).collect();
        let mut backward_players: Vec<Player> =
            hands.iter().rev().map(|h| player_with(vec![h.clone()])).collect();
        let rule = Rule::default();
        let a = settle(&dealer, &mut forward_players, &rule).unwrap();
        let b = settle(&dealer, &mut backward_players, &rule).unwrap();
        assert_eq!(a, b);
        backward_players.reverse();
        for (f, b) in forward_players.iter().zip(backward_players.iter()) {
            assert_eq!(f.bankroll(), b.bankroll());
        }
    }
}
