use super::error::FenError;
use super::parse_num;
use crate::config::{Chips, MAX_SEATS};
use std::fmt;
use std::str::FromStr;

/// Chips swept from bets plus the seats that can still win them.
///
/// Side pots are the lower layers carved off when seats go all-in; each keeps the
/// eligibility it had when it was carved. The main pot holds whatever sits above
/// the last all-in level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pot {
    pub chips: Chips,
    pub seats: Vec<usize>,
    pub side_pots: Option<Vec<Pot>>,
}

impl Pot {
    pub fn new(chips: Chips, seats: Vec<usize>) -> Self {
        Self { chips, seats, side_pots: None }
    }

    /// Main pot plus every side pot.
    pub fn total(&self) -> Chips {
        self.chips + self.side_pots.iter().flatten().map(Pot::total).sum::<Chips>()
    }

    /// The main pot first, then side pots in the order they were carved.
    pub fn layers(&self) -> impl Iterator<Item = &Pot> {
        std::iter::once(self).chain(self.side_pots.iter().flatten())
    }

    pub(crate) fn join(&mut self, seat: usize) {
        if !self.seats.contains(&seat) {
            self.seats.push(seat);
        }
    }

    /// Drop a seat from this pot and every side pot.
    pub(crate) fn exclude(&mut self, seat: usize) {
        self.seats.retain(|&s| s != seat);
        for side in self.side_pots.iter_mut().flatten() {
            side.exclude(seat);
        }
    }

    pub(crate) fn push_side(&mut self, side: Pot) {
        self.side_pots.get_or_insert_with(Vec::new).push(side);
    }
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-", self.chips)?;
        for s in &self.seats {
            write!(f, "{s}")?;
        }
        if let Some(sides) = &self.side_pots {
            f.write_str("side")?;
            for side in sides {
                write!(f, " {side}")?;
            }
        }
        Ok(())
    }
}

fn parse_layer(s: &str) -> Result<Pot, FenError> {
    let bad = || FenError::Pot(s.to_string());
    let (chips, seats) = s.split_once('-').ok_or_else(bad)?;
    let chips = parse_num(chips).ok_or_else(bad)?;
    let mut out = Vec::with_capacity(seats.len());
    for c in seats.chars() {
        let seat = c.to_digit(10).ok_or_else(bad)? as usize;
        if seat == 0 || seat > MAX_SEATS || out.contains(&seat) {
            return Err(bad());
        }
        out.push(seat);
    }
    Ok(Pot::new(chips, out))
}

impl FromStr for Pot {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once("side") {
            None => parse_layer(s),
            Some((main, rest)) => {
                let mut pot = parse_layer(main)?;
                let sides = rest
                    .split_whitespace()
                    .map(parse_layer)
                    .collect::<Result<Vec<_>, _>>()?;
                if sides.is_empty() {
                    return Err(FenError::Pot(s.to_string()));
                }
                pot.side_pots = Some(sides);
                Ok(pot)
            }
        }
    }
}

/// A resolved payout of one pot (or one pot's slice) to one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotShare {
    /// Uncontested: everyone else folded.
    Win { seat: usize, chips: Chips },
    /// Returned to the only seat eligible for it.
    Back { seat: usize, chips: Chips },
    /// Won at showdown, possibly split with other seats holding the same rank.
    ShowdownWin { seat: usize, chips: Chips },
}

impl PotShare {
    pub fn seat(&self) -> usize {
        match *self {
            PotShare::Win { seat, .. } | PotShare::Back { seat, .. } | PotShare::ShowdownWin { seat, .. } => seat,
        }
    }

    pub fn chips(&self) -> Chips {
        match *self {
            PotShare::Win { chips, .. } | PotShare::Back { chips, .. } | PotShare::ShowdownWin { chips, .. } => chips,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            PotShare::Win { .. } => "win",
            PotShare::Back { .. } => "back",
            PotShare::ShowdownWin { .. } => "swin",
        }
    }

    /// Same share with the seat renumbered by `f`.
    pub(crate) fn map_seat(self, f: impl Fn(usize) -> usize) -> PotShare {
        match self {
            PotShare::Win { seat, chips } => PotShare::Win { seat: f(seat), chips },
            PotShare::Back { seat, chips } => PotShare::Back { seat: f(seat), chips },
            PotShare::ShowdownWin { seat, chips } => PotShare::ShowdownWin { seat: f(seat), chips },
        }
    }
}

impl fmt::Display for PotShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.tag(), self.seat(), self.chips())
    }
}

impl FromStr for PotShare {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Share(s.to_string());
        let mut parts = s.split('-');
        let (Some(tag), Some(seat), Some(chips), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };
        let seat: usize = parse_num(seat).ok_or_else(bad)?;
        let chips: Chips = parse_num(chips).ok_or_else(bad)?;
        if seat == 0 || seat > MAX_SEATS {
            return Err(bad());
        }
        match tag {
            "win" => Ok(PotShare::Win { seat, chips }),
            "back" => Ok(PotShare::Back { seat, chips }),
            "swin" => Ok(PotShare::ShowdownWin { seat, chips }),
            _ => Err(bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_pot_text() {
        for s in ["60-123", "0-side 510-123 420-13 20-1", "320-2side 3440-21", "0-"] {
            let pot: Pot = s.parse().unwrap();
            assert_eq!(pot.to_string(), s);
        }
        let pot: Pot = "0-side 510-123 420-13 20-1".parse().unwrap();
        assert_eq!(pot.total(), 950);
        assert_eq!(pot.layers().count(), 4);
    }

    #[test]
    fn rejects_malformed_pots() {
        for s in ["", "12", "x-12", "10-1a", "10-11", "10-0", "10-1side", "10-1side 5-x", "+10-12", "010-12"] {
            assert!(s.parse::<Pot>().is_err(), "{s}");
        }
    }

    #[test]
    fn exclude_reaches_side_pots() {
        let mut pot: Pot = "30-123side 60-123".parse().unwrap();
        pot.exclude(2);
        assert_eq!(pot.to_string(), "30-13side 60-13");
        pot.join(2);
        pot.join(2);
        assert_eq!(pot.seats, vec![1, 3, 2]);
    }

    #[test]
    fn shares() {
        let share: PotShare = "swin-3-210".parse().unwrap();
        assert_eq!(share, PotShare::ShowdownWin { seat: 3, chips: 210 });
        assert_eq!(share.to_string(), "swin-3-210");
        assert_eq!(share.map_seat(|s| s - 1).to_string(), "swin-2-210");
        assert!("lose-1-10".parse::<PotShare>().is_err());
        assert!("win-1".parse::<PotShare>().is_err());
        assert!("win-0-5".parse::<PotShare>().is_err());
        assert!("win-+1-5".parse::<PotShare>().is_err());
        assert!("win-1-05".parse::<PotShare>().is_err());
    }
}
