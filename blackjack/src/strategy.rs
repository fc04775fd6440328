use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;

use crate::{valuation::Valuation, BlackjackError, Card};

/// Column used when the dealer plays her own hand. The dealer has no opposing
/// up card to react to.
pub const DEALER_COLUMN: &str = "0";

/// Player columns in chart order. Ace first, like the rows of a pair chart.
const UP_CARD_COLUMNS: [Card; 10] = [
    Card::Ace,
    Card::Two,
    Card::Three,
    Card::Four,
    Card::Five,
    Card::Six,
    Card::Seven,
    Card::Eight,
    Card::Nine,
    Card::Ten,
];

/// An entry of a strategy chart. Text codes are the ones used in chart files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum Action {
    #[serde(rename = "-")]
    Stand,
    #[serde(rename = "h")]
    Hit,
    #[serde(rename = "db")]
    DoubleOrHit,
    #[serde(rename = "dbs")]
    DoubleOrStand,
    #[serde(rename = "spl")]
    Split,
    #[serde(rename = "sr")]
    Surrender,
}

/// How the dealer plays a soft 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DealerPolicy {
    #[serde(rename = "S17")]
    StandOnSoft17,
    #[serde(rename = "H17")]
    HitSoft17,
}

impl DealerPolicy {
    pub fn chart(self) -> ChartTable {
        match self {
            DealerPolicy::StandOnSoft17 => ChartTable::dealer_stands_on_17(),
            DealerPolicy::HitSoft17 => ChartTable::dealer_hits_soft_17(),
        }
    }
}

/// Read-only decision chart, injected into the resolver.
pub trait StrategyTable {
    fn lookup(&self, key: &str, column: &str) -> Result<Action, BlackjackError>;
}

/// Row key of a hand total. Hard totals below 12 use the bare number, the rest
/// carry an `h` or `s` marker. Returns None for a busted hand.
pub fn total_key(valuation: &Valuation) -> Option<String> {
    let total = valuation.total()?;
    if valuation.is_soft {
        Some(format!("s{}", total))
    } else {
        Some(hard_key(total))
    }
}

/// Row key of a splittable pair, e.g. `8-8`.
pub fn pair_key(cards: &[Card]) -> Option<String> {
    match cards {
        [first, second] if first == second => Some(format!("{}-{}", first, second)),
        _ => None,
    }
}

pub fn column_for(up_card: Card) -> String {
    up_card.to_string()
}

/// A chart held in memory as `row -> column -> action`. Deserializes from a
/// mapping of the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartTable {
    rows: HashMap<String, HashMap<String, Action>>,
}

impl ChartTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, column: &str, action: Action) {
        self.rows
            .entry(String::from(key))
            .or_default()
            .insert(String::from(column), action);
    }

    /// Inserts a row of a player chart, with columns ordered A, 2, ..., 10.
    pub fn insert_row(&mut self, key: &str, actions: &[Action; 10]) {
        for (up_card, action) in UP_CARD_COLUMNS.iter().zip(actions.iter()) {
            self.insert(key, &column_for(*up_card), *action);
        }
    }

    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    /// Multi-deck basic strategy, dealer stands on soft 17, double after split
    /// allowed, no surrender.
    pub fn basic_strategy() -> ChartTable {
        const H: Action = Action::Hit;
        const S: Action = Action::Stand;
        const P: Action = Action::Split;
        const DH: Action = Action::DoubleOrHit;
        const DS: Action = Action::DoubleOrStand;

        let hard_charts: [[Action; 10]; 18] = [
            [H, H, H, H, H, H, H, H, H, H], // 4
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, DH, DH, DH, DH, H, H, H, H], // 9
            [H, DH, DH, DH, DH, DH, DH, DH, DH, H],
            [H, DH, DH, DH, DH, DH, DH, DH, DH, DH],
            [H, H, H, S, S, S, H, H, H, H], // 12
            [H, S, S, S, S, S, H, H, H, H],
            [H, S, S, S, S, S, H, H, H, H],
            [H, S, S, S, S, S, H, H, H, H],
            [H, S, S, S, S, S, H, H, H, H],
            [S, S, S, S, S, S, S, S, S, S], // 17
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S], // 21
        ];
        let soft_charts: [[Action; 10]; 10] = [
            [H, H, H, H, H, H, H, H, H, H], // Ace + Ace
            [H, H, H, H, DH, DH, H, H, H, H], // Ace + 2
            [H, H, H, H, DH, DH, H, H, H, H],
            [H, H, H, DH, DH, DH, H, H, H, H],
            [H, H, H, DH, DH, DH, H, H, H, H],
            [H, H, DH, DH, DH, DH, H, H, H, H],
            [H, S, DS, DS, DS, DS, S, S, H, H],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S], // Ace + 10
        ];
        let pair_charts: [[Action; 10]; 10] = [
            [P, P, P, P, P, P, P, P, P, P], // Double Ace
            [H, P, P, P, P, P, P, H, H, H], // Double 2
            [H, P, P, P, P, P, P, H, H, H],
            [H, H, H, H, P, P, H, H, H, H],
            [H, DH, DH, DH, DH, DH, DH, DH, DH, H],
            [H, P, P, P, P, P, H, H, H, H],
            [H, P, P, P, P, P, P, H, H, H],
            [P, P, P, P, P, P, P, P, P, P],
            [S, P, P, P, P, P, S, P, P, S],
            [S, S, S, S, S, S, S, S, S, S], // Double 10
        ];

        let mut table = ChartTable::new();
        for (total, row) in (4u8..=21).zip(hard_charts.iter()) {
            table.insert_row(&hard_key(total), row);
        }
        for (total, row) in (12u8..=21).zip(soft_charts.iter()) {
            table.insert_row(&format!("s{}", total), row);
        }
        for (card, row) in Card::iter().zip(pair_charts.iter()) {
            table.insert_row(&format!("{}-{}", card, card), row);
        }
        table
    }

    /// Dealer chart: hit below 17, stand on every 17.
    pub fn dealer_stands_on_17() -> ChartTable {
        Self::dealer_chart(false)
    }

    /// Dealer chart: like `dealer_stands_on_17` but soft 17 is hit.
    pub fn dealer_hits_soft_17() -> ChartTable {
        Self::dealer_chart(true)
    }

    fn dealer_chart(hit_soft_17: bool) -> ChartTable {
        let mut table = ChartTable::new();
        for total in 4u8..=21 {
            let action = if total < 17 { Action::Hit } else { Action::Stand };
            table.insert(&hard_key(total), DEALER_COLUMN, action);
        }
        for total in 12u8..=21 {
            let action = if total < 17 || (total == 17 && hit_soft_17) {
                Action::Hit
            } else {
                Action::Stand
            };
            table.insert(&format!("s{}", total), DEALER_COLUMN, action);
        }
        table
    }
}

fn hard_key(total: u8) -> String {
    if total < 12 {
        total.to_string()
    } else {
        format!("h{}", total)
    }
}

impl StrategyTable for ChartTable {
    fn lookup(&self, key: &str, column: &str) -> Result<Action, BlackjackError> {
        self.rows
            .get(key)
            .and_then(|row| row.get(column))
            .copied()
            .ok_or_else(|| BlackjackError::MissingTableEntry {
                key: String::from(key),
                column: String::from(column),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::evaluate;
    use crate::Card::*;

    fn key_of(cards: &[Card]) -> Option<String> {
        total_key(&evaluate(cards).unwrap())
    }

    #[test]
    fn total_keys() {
        assert_eq!(key_of(&[Five, Six]).as_deref(), Some("11"));
        assert_eq!(key_of(&[Ten, Two]).as_deref(), Some("h12"));
        assert_eq!(key_of(&[Ace, Six]).as_deref(), Some("s17"));
        assert_eq!(key_of(&[Ace, Six, Ten]).as_deref(), Some("h17"));
        assert_eq!(key_of(&[Ace, Ace]).as_deref(), Some("s12"));
        assert_eq!(key_of(&[Ten, Ten, Five]), None);
    }

    #[test]
    fn pair_keys() {
        assert_eq!(pair_key(&[Eight, Eight]).as_deref(), Some("8-8"));
        assert_eq!(pair_key(&[Ace, Ace]).as_deref(), Some("A-A"));
        assert_eq!(pair_key(&[Ten, Ten]).as_deref(), Some("10-10"));
        assert_eq!(pair_key(&[Eight, Nine]), None);
        assert_eq!(pair_key(&[Eight, Eight, Eight]), None);
    }

    #[test]
    fn action_codes() {
        assert_eq!("-".parse::<Action>().unwrap(), Action::Stand);
        assert_eq!("db".parse::<Action>().unwrap(), Action::DoubleOrHit);
        assert_eq!("spl".parse::<Action>().unwrap(), Action::Split);
        assert_eq!(Action::DoubleOrStand.to_string(), "dbs");
        assert!("x".parse::<Action>().is_err());
    }

    #[test]
    fn basic_strategy_lookups() {
        let table = ChartTable::basic_strategy();
        assert_eq!(table.lookup("h16", "10"), Ok(Action::Hit));
        assert_eq!(table.lookup("h16", "6"), Ok(Action::Stand));
        assert_eq!(table.lookup("11", "6"), Ok(Action::DoubleOrHit));
        assert_eq!(table.lookup("s18", "3"), Ok(Action::DoubleOrStand));
        assert_eq!(table.lookup("8-8", "10"), Ok(Action::Split));
        assert_eq!(table.lookup("10-10", "6"), Ok(Action::Stand));
        assert_eq!(table.lookup("9-9", "7"), Ok(Action::Stand));
    }

    #[test]
    fn basic_strategy_covers_every_reachable_row() {
        let table = ChartTable::basic_strategy();
        assert_eq!(table.number_of_rows(), 18 + 10 + 10);
        for up_card in Card::iter() {
            let column = column_for(up_card);
            for total in 4u8..=21 {
                assert!(table.lookup(&hard_key(total), &column).is_ok());
            }
            for total in 12u8..=21 {
                assert!(table.lookup(&format!("s{}", total), &column).is_ok());
            }
        }
    }

    #[test]
    fn missing_entry_is_an_error() {
        let table = ChartTable::basic_strategy();
        assert_eq!(
            table.lookup("h17", DEALER_COLUMN),
            Err(BlackjackError::MissingTableEntry {
                key: String::from("h17"),
                column: String::from("0"),
            })
        );
        assert!(table.lookup("h22", "5").is_err());
    }

    #[test]
    fn dealer_charts() {
        let stand = ChartTable::dealer_stands_on_17();
        let hit = ChartTable::dealer_hits_soft_17();
        assert_eq!(stand.lookup("h16", DEALER_COLUMN), Ok(Action::Hit));
        assert_eq!(stand.lookup("h17", DEALER_COLUMN), Ok(Action::Stand));
        assert_eq!(stand.lookup("s17", DEALER_COLUMN), Ok(Action::Stand));
        assert_eq!(hit.lookup("s17", DEALER_COLUMN), Ok(Action::Hit));
        assert_eq!(hit.lookup("s18", DEALER_COLUMN), Ok(Action::Stand));
        assert_eq!(hit.lookup("h17", DEALER_COLUMN), Ok(Action::Stand));
    }

    #[test]
    fn dealer_policy_picks_chart() {
        let policy: DealerPolicy = "H17".parse().unwrap();
        assert_eq!(policy, DealerPolicy::HitSoft17);
        assert_eq!(policy.chart(), ChartTable::dealer_hits_soft_17());
        assert_eq!(DealerPolicy::StandOnSoft17.to_string(), "S17");
        assert!("soft".parse::<DealerPolicy>().is_err());
    }
}
