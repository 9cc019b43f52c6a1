//! Hand strength by perfect-hash lookup.
//!
//! Every 5, 6 or 7 card hand maps to a rank in `1..=7462` where 1 is a royal flush and
//! 7462 is 7-5-4-3-2 offsuit. Lower is stronger. [`classify`] turns a rank into a
//! category, kickers and descriptions.

pub mod classify;
pub(crate) mod tables;

use crate::cards::{split_cards, Card, CardParseError};
use std::collections::HashSet;

pub use classify::{classify, Category, HandClass};

/// Raw strength, 1 (royal flush) to 7462 (worst high card).
pub type HandRank = u16;

pub const BEST_RANK: HandRank = 1;
pub const WORST_RANK: HandRank = tables::CLASS_COUNT;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("expected 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
    #[error("card id out of range: {0}")]
    InvalidId(u8),
    #[error(transparent)]
    Parse(#[from] CardParseError),
}

#[inline]
fn rank_of(cards: &[Card]) -> HandRank {
    let t = tables::tables();

    let mut suit_hash = 0usize;
    for c in cards {
        suit_hash += 1 << (3 * c.suit().index() as usize);
    }

    if let Some(suit) = t.flush_suit(suit_hash) {
        let mask = cards
            .iter()
            .filter(|c| c.suit().index() as usize == suit)
            .fold(0usize, |m, c| m | (1 << c.rank().index()));
        return t.flush_rank(mask);
    }

    let mut quinary = [0u8; 13];
    for c in cards {
        quinary[c.rank().index() as usize] += 1;
    }
    t.noflush_rank(&quinary, cards.len())
}

/// ```
/// use poker_round::cards::split_cards;
/// use poker_round::evaluator::evaluate_5;
///
/// let royal = split_cards("AsKsQsJsTs").unwrap();
/// assert_eq!(evaluate_5(&royal.try_into().unwrap()), 1);
/// ```
pub fn evaluate_5(cards: &[Card; 5]) -> HandRank {
    rank_of(cards)
}

pub fn evaluate_6(cards: &[Card; 6]) -> HandRank {
    rank_of(cards)
}

pub fn evaluate_7(cards: &[Card; 7]) -> HandRank {
    rank_of(cards)
}

/// Checked evaluation of 5 to 7 distinct cards.
pub fn evaluate_cards(cards: &[Card]) -> Result<HandRank, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(EvalError::DuplicateCard(c));
        }
    }
    Ok(rank_of(cards))
}

/// Checked evaluation from dense card ids (`rank_index * 4 + suit_index`).
pub fn evaluate_ids(ids: &[u8]) -> Result<HandRank, EvalError> {
    let cards = ids
        .iter()
        .map(|&id| Card::from_id(id).ok_or(EvalError::InvalidId(id)))
        .collect::<Result<Vec<_>, _>>()?;
    evaluate_cards(&cards)
}

/// ```
/// use poker_round::evaluator::evaluate_str;
///
/// assert_eq!(evaluate_str("9c4c4s9d4hQc6c").unwrap(), 292);
/// ```
pub fn evaluate_str(s: &str) -> Result<HandRank, EvalError> {
    evaluate_cards(&split_cards(s)?)
}
