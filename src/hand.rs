use crate::cards::{join_cards, split_cards, Card};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("duplicate cards in community cards")]
    DuplicateMiddleCards,
    #[error("hole cards overlap with other dealt cards")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("expected exactly five community cards, got {0}")]
    MiddleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A seat's two private hole cards.
///
/// ```
/// use poker_round::hand::HoleCards;
///
/// let hole: HoleCards = "AsKs".parse().unwrap();
/// assert_eq!(hole.to_string(), "AsKs");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        if slice.len() != 2 {
            return Err(HandError::HoleCount(slice.len()));
        }
        Self::try_new(slice[0], slice[1])
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = split_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// The five community cards of a hand, drawn up front and revealed street by street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Middle([Card; 5]);

impl Middle {
    pub fn try_new(cards: [Card; 5]) -> Result<Self, HandError> {
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateMiddleCards);
        }
        Ok(Self(cards))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        let cards: [Card; 5] =
            slice.try_into().map_err(|_| HandError::MiddleCount(slice.len()))?;
        Self::try_new(cards)
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.0
    }

    pub fn flop(&self) -> [Card; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn turn(&self) -> Card {
        self.0[3]
    }

    pub fn river(&self) -> Card {
        self.0[4]
    }

    /// Community cards plus one seat's hole cards, ready for the evaluator.
    pub fn with_hole(&self, hole: &HoleCards) -> [Card; 7] {
        let m = &self.0;
        [m[0], m[1], m[2], m[3], m[4], hole.first(), hole.second()]
    }
}

impl fmt::Display for Middle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_cards(&self.0))
    }
}

impl FromStr for Middle {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = split_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Ensure no card is dealt twice across the community cards and every hand.
pub fn validate_deal<'a, I>(middle: &Middle, holes: I) -> Result<(), HandError>
where
    I: IntoIterator<Item = &'a HoleCards>,
{
    let mut seen: HashSet<Card> = middle.as_slice().iter().copied().collect();
    for hole in holes {
        if hole.first() == hole.second() {
            return Err(HandError::DuplicateHoleCards);
        }
        if !seen.insert(hole.first()) || !seen.insert(hole.second()) {
            return Err(HandError::Overlap);
        }
    }
    Ok(())
}
