use crate::{BlackjackError, Card};

pub const BLACKJACK: u8 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandValue {
    Total(u8),
    Bust,
}

/// Everything the engine needs to know about a group of cards. Always computed
/// from the full card list, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Valuation {
    pub value: HandValue,
    pub is_soft: bool,
    pub is_natural: bool,
    pub can_split: bool,
}

impl Valuation {
    pub fn is_bust(&self) -> bool {
        self.value == HandValue::Bust
    }

    /// The best total, or None if bust.
    pub fn total(&self) -> Option<u8> {
        match self.value {
            HandValue::Total(total) => Some(total),
            HandValue::Bust => None,
        }
    }
}

/// Values a hand by taking the highest total that does not exceed 21 over
/// every way of counting its aces as 1 or 11.
pub fn evaluate(cards: &[Card]) -> Result<Valuation, BlackjackError> {
    if cards.is_empty() {
        return Err(BlackjackError::UnresolvableHand(String::from(
            "cannot value a hand without cards",
        )));
    }

    let number_of_aces = cards.iter().filter(|c| c.is_ace()).count() as u16;
    let other_sum: u16 = cards
        .iter()
        .filter(|c| !c.is_ace())
        .map(|c| c.points() as u16)
        .sum();

    // total(m) grows with m, so the first fit from the top is the maximum.
    let best = (0..=number_of_aces)
        .rev()
        .map(|m| (m, m * 11 + (number_of_aces - m) + other_sum))
        .find(|(_, total)| *total <= BLACKJACK as u16);

    let (value, is_soft) = match best {
        Some((aces_as_eleven, total)) => (HandValue::Total(total as u8), aces_as_eleven >= 1),
        None => (HandValue::Bust, false),
    };

    let is_natural = cards.len() == 2
        && value == HandValue::Total(BLACKJACK)
        && cards.contains(&Card::Ace)
        && cards.contains(&Card::Ten);
    let can_split = cards.len() == 2 && cards[0] == cards[1];

    Ok(Valuation {
        value,
        is_soft,
        is_natural,
        can_split,
    })
}
