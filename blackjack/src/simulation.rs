pub mod agent;
pub mod hand;
pub mod resolver;
pub mod shoe;

use blackjack_macros::allowed_phase;
use log::{debug, info};

use self::agent::{Dealer, Player};
use self::hand::Hand;
use self::resolver::HandResolver;
use self::shoe::{CardSource, Shoe};
use crate::settlement::{self, SettlementSummary};
use crate::strategy::{column_for, StrategyTable, DEALER_COLUMN};
use crate::{BlackjackError, Card, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    PlaceBets,
    DealInitialCards,
    PlayHands,
    DealerPlay,
    Settlement,
    Cleanup,
}

/// What happened in one round, as seen from the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub round_id: u64,
    pub dealer_natural: bool,
    pub settlement: SettlementSummary,
    /// Every stake taken this round, including splits and doubles.
    pub staked: f64,
    pub reshuffled: bool,
}

impl RoundSummary {
    /// What the players lost to the house this round. Negative when they won.
    pub fn house_net(&self) -> f64 {
        self.staked - self.settlement.credited
    }
}

/// Callbacks fired while a round is played. Every method does nothing by
/// default, so a handler only implements what it cares about.
pub trait RoundEventHandler {
    fn on_round_begin(&mut self, _round_id: u64, _cards_in_shoe: usize) {}
    fn on_deal(&mut self, _dealer_up_card: Card, _players: &[Player]) {}
    fn on_split(&mut self, _player_index: usize, _hand: &Hand) {}
    fn on_hand_finished(&mut self, _player_index: usize, _hand: &Hand) {}
    fn on_dealer_finished(&mut self, _dealer_hand: &Hand) {}
    fn on_round_summary(&mut self, _summary: &RoundSummary, _players: &[Player]) {}
}

impl RoundEventHandler for () {}

/// Simulates a Blackjack table: one dealer, any number of seated players,
/// each playing a fixed strategy table.
pub struct Simulator<P: StrategyTable, D: StrategyTable> {
    rule: Rule,
    player_table: P,
    dealer_table: D,

    // Game state
    current_game_phase: GamePhase,
    shoe: Shoe,
    discard: Vec<Card>,
    dealer: Dealer,
    players: Vec<Player>,

    // Current round
    round_id: u64,
    staked: f64,
}

impl<P: StrategyTable, D: StrategyTable> Simulator<P, D> {
    /// Seats the players in front of a freshly shuffled shoe.
    pub fn new(
        rule: Rule,
        players: Vec<Player>,
        player_table: P,
        dealer_table: D,
        seed: Option<u64>,
    ) -> Result<Self, BlackjackError> {
        let mut shoe = Shoe::new(rule.number_of_decks, seed);
        shoe.shuffle();
        Self::with_shoe(rule, shoe, players, player_table, dealer_table)
    }

    /// Same as `new` but deals from the given shoe as it is.
    pub fn with_shoe(
        rule: Rule,
        shoe: Shoe,
        players: Vec<Player>,
        player_table: P,
        dealer_table: D,
    ) -> Result<Self, BlackjackError> {
        rule.validate()?;
        Ok(Self {
            rule,
            player_table,
            dealer_table,
            current_game_phase: GamePhase::PlaceBets,
            shoe,
            discard: Vec::new(),
            dealer: Dealer::new(0.0),
            players,
            round_id: 0,
            staked: 0.0,
        })
    }

    /// Plays a whole round and reports it to the handler.
    /// Can be called at PlaceBets phase.
    #[allowed_phase(PlaceBets)]
    pub fn play_round<H: RoundEventHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<RoundSummary, BlackjackError> {
        self.place_bets()?;
        handler.on_round_begin(self.round_id, self.shoe.remaining());

        let up_card = self.deal_initial_cards()?;
        handler.on_deal(up_card, &self.players);

        if self.current_game_phase == GamePhase::PlayHands {
            self.play_hands(handler)?;
        }
        let dealer_natural = self.dealer_plays(handler)?.is_natural();
        let settlement = self.settle()?;
        let staked = self.staked;
        let reshuffled = self.cleanup()?;

        let summary = RoundSummary {
            round_id: self.round_id,
            dealer_natural,
            settlement,
            staked,
            reshuffled,
        };
        info!(
            "round {}: {} hands, staked {}, credited {}, house net {}",
            summary.round_id,
            settlement.number_of_hands(),
            staked,
            settlement.credited,
            summary.house_net()
        );
        handler.on_round_summary(&summary, &self.players);
        Ok(summary)
    }

    /// Opens a new round.
    /// Can be called at PlaceBets phase.
    #[allowed_phase(PlaceBets)]
    pub fn place_bets(&mut self) -> Result<(), BlackjackError> {
        self.round_id += 1;
        self.staked = 0.0;
        self.current_game_phase = GamePhase::DealInitialCards;
        Ok(())
    }

    /// Deals the hole card, then two cards to every hand of every player,
    /// then the up card. Returns the dealer's up card.
    /// Can be called at DealInitialCards phase.
    ///
    /// If the dealer peeks and holds a natural, the players do not get to act
    /// and the next phase is DealerPlay.
    #[allowed_phase(DealInitialCards)]
    pub fn deal_initial_cards(&mut self) -> Result<Card, BlackjackError> {
        self.dealer.receive_hole_card(self.shoe.draw()?);
        for player in self.players.iter_mut() {
            let staked = player.deal_hands(&mut self.shoe)?;
            self.dealer.take_stakes(staked);
            self.staked += staked;
        }
        let up_card = self.shoe.draw()?;
        self.dealer.receive_up_card(up_card);
        debug!(
            "round {}: dealt {} hands, dealer shows {}",
            self.round_id,
            self.players.iter().map(|p| p.hands().len()).sum::<usize>(),
            up_card
        );

        if self.rule.dealer_peeks && self.dealer.peeks_natural()? {
            debug!("dealer peeks a natural, players do not act");
            for player in self.players.iter_mut() {
                for hand in player.take_hands() {
                    player.finalize_hand(hand);
                }
            }
            self.current_game_phase = GamePhase::DealerPlay;
        } else {
            self.current_game_phase = GamePhase::PlayHands;
        }
        Ok(up_card)
    }

    /// Plays every hand of every player, seat by seat, against the up card.
    /// Split offspring and doubles take their extra stake from the player.
    /// Can be called at PlayHands phase.
    #[allowed_phase(PlayHands)]
    pub fn play_hands<H: RoundEventHandler>(&mut self, handler: &mut H) -> Result<(), BlackjackError> {
        let up_card = self.dealer.up_card().ok_or_else(|| {
            BlackjackError::UnresolvableHand(String::from("dealer has no up card"))
        })?;
        let column = column_for(up_card);
        let resolver = HandResolver::new(&self.player_table, &self.rule);

        for (player_index, player) in self.players.iter_mut().enumerate() {
            let hands = player.take_hands();
            let initial_stake = hands.iter().map(|h| h.wager()).sum::<f64>();
            let finished = resolver.resolve_all(hands, &column, &mut self.shoe, |hand| {
                handler.on_split(player_index, hand)
            })?;

            let final_stake = finished.iter().map(|h| h.wager()).sum::<f64>();
            let extra = final_stake - initial_stake;
            player.stake(extra);
            self.dealer.take_stakes(extra);
            self.staked += extra;

            for hand in finished {
                handler.on_hand_finished(player_index, &hand);
                player.finalize_hand(hand);
            }
        }
        self.current_game_phase = GamePhase::DealerPlay;
        Ok(())
    }

    /// Reveals the hole card and plays the dealer's hand by the dealer table.
    /// Can be called at DealerPlay phase.
    #[allowed_phase(DealerPlay)]
    pub fn dealer_plays<H: RoundEventHandler>(&mut self, handler: &mut H) -> Result<&Hand, BlackjackError> {
        let resolver = HandResolver::new(&self.dealer_table, &self.rule);
        let hand = self.dealer.reveal()?;
        resolver.resolve(hand, DEALER_COLUMN, &mut self.shoe)?;
        handler.on_dealer_finished(hand);
        self.current_game_phase = GamePhase::Settlement;
        Ok(&*hand)
    }

    /// Settles every final hand against the dealer's hand.
    /// Can be called at Settlement phase.
    #[allowed_phase(Settlement)]
    pub fn settle(&mut self) -> Result<SettlementSummary, BlackjackError> {
        let dealer_hand = self.dealer.hand().ok_or_else(|| {
            BlackjackError::UnresolvableHand(String::from("dealer hand was never revealed"))
        })?;
        let summary = settlement::settle(dealer_hand, &mut self.players, &self.rule)?;
        self.dealer.pay(summary.credited);
        self.current_game_phase = GamePhase::Cleanup;
        Ok(summary)
    }

    /// Collects every card into the discard pile and shuffles it back into the
    /// shoe once the penetration depth is reached. Returns true on reshuffle.
    /// Can be called at Cleanup phase.
    #[allowed_phase(Cleanup)]
    pub fn cleanup(&mut self) -> Result<bool, BlackjackError> {
        for player in self.players.iter_mut() {
            player.clear_hands(&mut self.discard);
        }
        self.dealer.clear_hands(&mut self.discard);

        let reshuffle = self.shoe.reached_penetration(self.rule.penetration_depth);
        if reshuffle {
            self.shoe.reshuffle(&mut self.discard);
        }
        self.current_game_phase = GamePhase::PlaceBets;
        Ok(reshuffle)
    }

    pub fn current_game_phase(&self) -> GamePhase {
        self.current_game_phase
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn cards_in_shoe(&self) -> usize {
        self.shoe.remaining()
    }

    pub fn cards_in_discard(&self) -> usize {
        self.discard.len()
    }
}
