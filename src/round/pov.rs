use super::error::FenError;
use super::pot::{Pot, PotShare};
use super::seat::Seat;
use super::{write_head, write_shares, Snapshot};
use crate::cards::{join_cards, split_cards, Card};
use crate::config::Chips;
use std::fmt;
use std::str::FromStr;

/// A round as one seat sees it.
///
/// The observer is seat 1 and the others follow clockwise. Only the observer's
/// hole cards (and any shown at showdown) are present, and only the community
/// cards already revealed. Pot eligibility keeps the table's own seat numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPov {
    pub small_blind: Chips,
    pub button: usize,
    pub seats: Vec<Seat>,
    pub pot: Option<Pot>,
    pub middle: Vec<Card>,
    pub shares: Option<Vec<PotShare>>,
}

impl fmt::Display for RoundPov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_head(f, self.small_blind, self.button, &self.seats, self.pot.as_ref())?;
        f.write_str(&join_cards(&self.middle))?;
        write_shares(f, self.shares.as_deref())
    }
}

impl FromStr for RoundPov {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let snap = Snapshot::parse(s)?;
        let middle = split_cards(snap.tail.trim_end())?;
        if !matches!(middle.len(), 0 | 3 | 4 | 5) {
            return Err(FenError::Middle(snap.tail.to_string()));
        }
        Ok(RoundPov {
            small_blind: snap.small_blind,
            button: snap.button,
            seats: snap.seats,
            pot: snap.pot,
            middle,
            shares: snap.shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pov_text_round_trips() {
        for s in [
            "10-20 1 | i80 AhAc / i180 / @280 $ 60-123 !4h5h6h",
            "10-20 3 | s180 2h2c / s280 3h3c / s80 AhAc $ 60-123 !4h5h6h7h8h shares swin-3-20 swin-1-20 swin-2-20",
            "10-20 2 | d300 / d100 / d200 $!",
        ] {
            let pov: RoundPov = s.parse().unwrap();
            assert_eq!(pov.to_string(), s);
        }
        assert!("10-20 1 | i80 / i80 $!4h5h".parse::<RoundPov>().is_err());
    }
}
