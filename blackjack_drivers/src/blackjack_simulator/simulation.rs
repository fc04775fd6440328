use anyhow::{anyhow, Context};
use log::{debug, error, info};

use self::private::Statistics;
use blackjack::simulation::agent::Player;
use blackjack::simulation::hand::{Hand, HandStatus};
use blackjack::simulation::{RoundEventHandler, RoundSummary, Simulator};
use blackjack::{ChartTable, Rule};
use blackjack_drivers::{Config, ConfigPlayer};

mod private {
    use blackjack::simulation::RoundSummary;

    /// Money as seen by the players: what they staked and what came back.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct Statistics {
        rounds: u64,
        hands: u64,
        wins: u64,
        pushes: u64,
        losses: u64,
        blackjacks: u64,
        surrenders: u64,
        splits: u64,
        doubles: u64,
        dealer_naturals: u64,
        reshuffles: u64,

        current_money: f64,
        total_bet: f64,
        min_money: f64,
    }

    impl Statistics {
        pub fn record_round(&mut self, summary: &RoundSummary) {
            let settlement = &summary.settlement;
            self.rounds += 1;
            self.hands += settlement.number_of_hands() as u64;
            self.wins += settlement.wins as u64;
            self.pushes += settlement.pushes as u64;
            self.losses += settlement.losses as u64;
            self.blackjacks += settlement.blackjacks as u64;
            self.surrenders += settlement.surrenders as u64;
            if summary.dealer_natural {
                self.dealer_naturals += 1;
            }
            if summary.reshuffled {
                self.reshuffles += 1;
            }
            self.bet_money(summary.staked);
            self.receive_money(settlement.credited);
        }

        pub fn record_split(&mut self) {
            self.splits += 1;
        }

        pub fn record_double(&mut self) {
            self.doubles += 1;
        }

        fn bet_money(&mut self, money: f64) {
            self.total_bet += money;
            self.current_money -= money;
            if self.min_money > self.current_money {
                self.min_money = self.current_money;
            }
        }

        fn receive_money(&mut self, money: f64) {
            self.current_money += money;
        }

        /// Adds the figures of another run. The lowest point of two
        /// independent runs is not additive, so the worse one is kept.
        pub fn merge(&mut self, other: &Statistics) {
            self.rounds += other.rounds;
            self.hands += other.hands;
            self.wins += other.wins;
            self.pushes += other.pushes;
            self.losses += other.losses;
            self.blackjacks += other.blackjacks;
            self.surrenders += other.surrenders;
            self.splits += other.splits;
            self.doubles += other.doubles;
            self.dealer_naturals += other.dealer_naturals;
            self.reshuffles += other.reshuffles;
            self.current_money += other.current_money;
            self.total_bet += other.total_bet;
            self.min_money = self.min_money.min(other.min_money);
        }

        pub fn get_rounds(&self) -> u64 {
            self.rounds
        }

        pub fn get_hands(&self) -> u64 {
            self.hands
        }

        pub fn get_results(&self) -> [(&'static str, u64); 5] {
            [
                ("Win", self.wins),
                ("Push", self.pushes),
                ("Loss", self.losses),
                ("Blackjack", self.blackjacks),
                ("Surrender", self.surrenders),
            ]
        }

        pub fn get_splits(&self) -> u64 {
            self.splits
        }

        pub fn get_doubles(&self) -> u64 {
            self.doubles
        }

        pub fn get_dealer_naturals(&self) -> u64 {
            self.dealer_naturals
        }

        pub fn get_reshuffles(&self) -> u64 {
            self.reshuffles
        }

        pub fn get_current_money(&self) -> f64 {
            self.current_money
        }

        pub fn get_total_bet(&self) -> f64 {
            self.total_bet
        }

        pub fn get_rate(&self) -> f64 {
            if self.total_bet == 0.0 {
                return 0.0;
            }
            self.current_money / self.total_bet
        }

        pub fn get_min_money(&self) -> f64 {
            self.min_money
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Handler {
    round_id: u64,
    cards_in_shoe_before_round: usize,
    bankrolls: Vec<f64>,
    stat: Statistics,
}

impl RoundEventHandler for Handler {
    fn on_round_begin(&mut self, round_id: u64, cards_in_shoe: usize) {
        self.round_id = round_id;
        self.cards_in_shoe_before_round = cards_in_shoe;
    }

    fn on_split(&mut self, player_index: usize, hand: &Hand) {
        debug!("round {} player {} splits {}", self.round_id, player_index, hand);
        self.stat.record_split();
    }

    fn on_hand_finished(&mut self, _player_index: usize, hand: &Hand) {
        if hand.status() == HandStatus::Doubled {
            self.stat.record_double();
        }
    }

    fn on_round_summary(&mut self, summary: &RoundSummary, players: &[Player]) {
        self.stat.record_round(summary);
        self.bankrolls = players.iter().map(|p| p.bankroll()).collect();
        debug!(
            "round {} from {} cards: house net {}",
            summary.round_id,
            self.cards_in_shoe_before_round,
            summary.house_net()
        );
    }
}

/// Outcome of one simulation thread.
#[derive(Debug, Clone)]
pub struct ThreadReport {
    pub index: usize,
    pub seed: Option<u64>,
    pub bankrolls: Vec<f64>,
    stat: Statistics,
}

/// A thread that stopped before playing all of its rounds.
#[derive(Debug, Clone)]
pub struct ThreadFailure {
    pub index: usize,
    pub seed: Option<u64>,
    pub error: String,
}

/// Outcome of a whole run. Statistics are merged over the threads that
/// finished; failed threads are listed apart.
#[derive(Debug, Clone)]
pub struct Report {
    pub threads: Vec<ThreadReport>,
    pub failures: Vec<ThreadFailure>,
    stat: Statistics,
}

/// Runs `number_of_rounds` rounds, shared out over `number_of_threads`
/// independent tables. Each table gets its own shoe, seeded with the
/// configured seed plus the thread index.
pub fn simulate(config: &Config) -> anyhow::Result<Report> {
    let rule: Rule = config.rule.clone().try_into()?;
    let (player_table, dealer_table) = blackjack_drivers::load_tables(config)?;
    let simulator_config = &config.blackjack_simulator;
    let number_of_threads = simulator_config.number_of_threads.max(1);
    let rounds_per_thread = simulator_config.number_of_rounds / number_of_threads as u64;
    let remainder = simulator_config.number_of_rounds % number_of_threads as u64;
    info!(
        "simulating {} rounds on {} threads",
        simulator_config.number_of_rounds, number_of_threads
    );

    let outcomes = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..number_of_threads)
            .map(|index| {
                let rounds = rounds_per_thread + u64::from((index as u64) < remainder);
                let seed = simulator_config
                    .seed
                    .map(|seed| seed.wrapping_add(index as u64));
                let player_table = player_table.clone();
                let dealer_table = dealer_table.clone();
                let players = &simulator_config.players;
                let handle = scope.spawn(move || {
                    simulate_table(index, rule, players, player_table, dealer_table, seed, rounds)
                });
                (index, seed, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(index, seed, handle)| {
                let outcome = handle
                    .join()
                    .map_err(|_| anyhow!("A simulation thread panicked"))
                    .and_then(|outcome| outcome);
                (index, seed, outcome)
            })
            .collect::<Vec<_>>()
    });

    let mut report = Report {
        threads: Vec::new(),
        failures: Vec::new(),
        stat: Statistics::default(),
    };
    for (index, seed, outcome) in outcomes {
        match outcome {
            Ok(thread) => {
                report.stat.merge(&thread.stat);
                report.threads.push(thread);
            }
            Err(err) => {
                error!("table {} with seed {:?} failed: {:#}", index, seed, err);
                report.failures.push(ThreadFailure {
                    index,
                    seed,
                    error: format!("{:#}", err),
                });
            }
        }
    }
    Ok(report)
}

fn simulate_table(
    index: usize,
    rule: Rule,
    players: &[ConfigPlayer],
    player_table: ChartTable,
    dealer_table: ChartTable,
    seed: Option<u64>,
    rounds: u64,
) -> anyhow::Result<ThreadReport> {
    let players = players.iter().map(Player::from).collect();
    let mut simulator = Simulator::new(rule, players, player_table, dealer_table, seed)?;
    let mut handler = Handler::default();
    for _ in 0..rounds {
        simulator
            .play_round(&mut handler)
            .with_context(|| format!("Round {} failed", simulator.round_id()))?;
    }
    info!(
        "table with seed {:?} finished {} rounds",
        seed,
        handler.stat.get_rounds()
    );
    Ok(ThreadReport {
        index,
        seed,
        bankrolls: simulator.players().iter().map(|p| p.bankroll()).collect(),
        stat: handler.stat,
    })
}

pub fn print_report(report: &Report) {
    let stat = &report.stat;
    println!("Rounds: {}. Hands: {}.", stat.get_rounds(), stat.get_hands());
    for (name, count) in stat.get_results() {
        let share = if stat.get_hands() == 0 {
            0.0
        } else {
            count as f64 / stat.get_hands() as f64
        };
        println!("  {:<10} {:>10} ({:.2}%)", name, count, share * 100.0);
    }
    println!(
        "Splits: {}. Doubles: {}. Dealer naturals: {}. Reshuffles: {}.",
        stat.get_splits(),
        stat.get_doubles(),
        stat.get_dealer_naturals(),
        stat.get_reshuffles()
    );
    println!(
        "Money: {:.2}. Total bet: {:.2}. Rate: {:.2}%. Min money: {:.2}.",
        stat.get_current_money(),
        stat.get_total_bet(),
        stat.get_rate() * 100.0,
        stat.get_min_money(),
    );
    for thread in &report.threads {
        print!("Table {} (seed {:?}) bankrolls:", thread.index, thread.seed);
        for bankroll in &thread.bankrolls {
            print!(" {:.2}", bankroll);
        }
        println!();
    }
    for failure in &report.failures {
        println!(
            "Table {} (seed {:?}) failed: {}",
            failure.index, failure.seed, failure.error
        );
    }
    println!("----------------------------------------------------");
}
