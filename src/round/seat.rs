use super::error::FenError;
use super::parse_num;
use crate::config::Chips;
use crate::hand::HoleCards;
use std::fmt;
use std::str::FromStr;

/// Where a seat stands in the current hand. Every seat has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SeatState {
    /// Sitting with chips, waiting for the deal.
    Dealt,
    /// The action is on this seat.
    Acting,
    /// In the hand, waiting for others to act.
    In,
    /// Matched the street's bet; the street can close for this seat.
    Played,
    AllIn,
    Folded,
    Showdown,
    /// Won uncontested, share pending.
    Won,
    /// Hand settled with chips left.
    Settled,
    /// Busted.
    Empty,
}

impl SeatState {
    pub const fn as_char(self) -> char {
        match self {
            SeatState::Dealt => 'd',
            SeatState::Acting => '@',
            SeatState::In => 'i',
            SeatState::Played => 'p',
            SeatState::AllIn => 'a',
            SeatState::Folded => 'f',
            SeatState::Showdown => 's',
            SeatState::Won => 'w',
            SeatState::Settled => 'x',
            SeatState::Empty => 'e',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'd' => SeatState::Dealt,
            '@' => SeatState::Acting,
            'i' => SeatState::In,
            'p' => SeatState::Played,
            'a' => SeatState::AllIn,
            'f' => SeatState::Folded,
            's' => SeatState::Showdown,
            'w' => SeatState::Won,
            'x' => SeatState::Settled,
            'e' => SeatState::Empty,
            _ => return None,
        })
    }

    /// Seats taking part in the current hand (blind positions are counted over these).
    pub const fn has_played(self) -> bool {
        !matches!(self, SeatState::Settled | SeatState::Empty)
    }

    /// Contesting the street and still able to bet.
    pub const fn is_in(self) -> bool {
        matches!(self, SeatState::In | SeatState::Acting)
    }
}

impl fmt::Display for SeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BetKind {
    SmallBlind,
    BigBlind,
    Call,
    Raise,
    AllIn,
    Check,
    Fold,
}

impl BetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BetKind::SmallBlind => "sb",
            BetKind::BigBlind => "bb",
            BetKind::Call => "call",
            BetKind::Raise => "raise",
            BetKind::AllIn => "allin",
            BetKind::Check => "check",
            BetKind::Fold => "fold",
        }
    }
}

impl FromStr for BetKind {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sb" => BetKind::SmallBlind,
            "bb" => BetKind::BigBlind,
            "call" => BetKind::Call,
            "raise" => BetKind::Raise,
            "allin" => BetKind::AllIn,
            "check" => BetKind::Check,
            "fold" => BetKind::Fold,
            other => return Err(FenError::Bet(other.to_string())),
        })
    }
}

/// One seat's wagering on the current street.
///
/// `previous` carries the seat's earlier total on this street; `matched` closes the
/// gap to the bet being faced and `raised` goes on top of it.
///
/// ```
/// use poker_round::round::{Bet, BetKind};
///
/// let bet: Bet = "raise-20-80-160".parse().unwrap();
/// assert_eq!(bet.kind, BetKind::Raise);
/// assert_eq!(bet.total(), 260);
/// assert_eq!(bet.to_string(), "raise-20-80-160");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bet {
    pub kind: BetKind,
    pub previous: Chips,
    pub matched: Option<Chips>,
    pub raised: Option<Chips>,
}

impl Bet {
    pub fn new(kind: BetKind, previous: Chips, matched: Option<Chips>, raised: Option<Chips>) -> Self {
        Self { kind, previous, matched, raised }
    }

    pub fn total(&self) -> Chips {
        self.previous + self.matched.unwrap_or(0) + self.raised.unwrap_or(0)
    }

    /// Chips this bet moved from the stack.
    pub fn delta(&self) -> Chips {
        self.matched.unwrap_or(0) + self.raised.unwrap_or(0)
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.previous)?;
        if let Some(m) = self.matched {
            write!(f, "-{m}")?;
        }
        if let Some(r) = self.raised {
            write!(f, "-{r}")?;
        }
        Ok(())
    }
}

impl FromStr for Bet {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Bet(s.to_string());
        let mut parts = s.split('-');
        let kind = parts.next().ok_or_else(bad)?.parse()?;
        let previous = parts.next().and_then(parse_num).ok_or_else(bad)?;
        let matched = parts.next().map(|p| parse_num(p).ok_or_else(bad)).transpose()?;
        let raised = parts.next().map(|p| parse_num(p).ok_or_else(bad)).transpose()?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Bet { kind, previous, matched, raised })
    }
}

/// A seat: `{state}{stack}[ {hole}][ {bet}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub state: SeatState,
    pub stack: Chips,
    pub hand: Option<HoleCards>,
    pub bet: Option<Bet>,
}

impl Seat {
    pub fn new(stack: Chips) -> Self {
        Self { state: SeatState::Dealt, stack, hand: None, bet: None }
    }

    pub fn bet_total(&self) -> Chips {
        self.bet.map_or(0, |b| b.total())
    }

    /// The same seat as another player sees it: hole cards only at showdown.
    pub fn hidden(&self) -> Seat {
        let hand = if self.state == SeatState::Showdown { self.hand } else { None };
        Seat { hand, ..self.clone() }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.state, self.stack)?;
        if let Some(hand) = &self.hand {
            write!(f, " {hand}")?;
        }
        if let Some(bet) = &self.bet {
            write!(f, " {bet}")?;
        }
        Ok(())
    }
}

impl FromStr for Seat {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Seat(s.to_string());
        let mut tokens = s.split_whitespace();
        let head = tokens.next().ok_or_else(bad)?;
        let mut chars = head.chars();
        let c = chars.next().ok_or_else(bad)?;
        let state = SeatState::from_char(c).ok_or(FenError::State(c))?;
        let stack = parse_num(chars.as_str()).ok_or_else(bad)?;

        let mut hand = None;
        let mut bet = None;
        for token in tokens {
            if token.contains('-') {
                if bet.is_some() {
                    return Err(bad());
                }
                bet = Some(token.parse()?);
            } else {
                if hand.is_some() || bet.is_some() {
                    return Err(bad());
                }
                hand = Some(token.parse()?);
            }
        }
        Ok(Seat { state, stack, hand, bet })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_round_trip_through_chars() {
        for c in "d@ipafswxe".chars() {
            let state = SeatState::from_char(c).unwrap();
            assert_eq!(state.as_char(), c);
        }
        assert!(SeatState::from_char('z').is_none());
        assert!(!SeatState::Settled.has_played());
        assert!(SeatState::Won.has_played());
    }

    #[test]
    fn bet_with_missing_amounts() {
        let check: Bet = "check-20".parse().unwrap();
        assert_eq!(check.total(), 20);
        assert_eq!(check.delta(), 0);
        let sb: Bet = "sb-0-10".parse().unwrap();
        assert_eq!(sb.total(), 10);
        assert_eq!(sb.to_string(), "sb-0-10");
        assert!("bet-0-10".parse::<Bet>().is_err());
        assert!("call-x".parse::<Bet>().is_err());
        assert!("call-1-2-3-4".parse::<Bet>().is_err());
    }

    #[test]
    fn seat_tokens() {
        for s in ["d3000", "i2980 3cQs bb-0-0-20", "@2990 sb-0-0-10", "f1840 3cQs", "a0 allin-20-20-2960"] {
            let seat: Seat = s.parse().unwrap();
            assert_eq!(seat.to_string(), s);
        }
        let seat: Seat = "f60 fold-0".parse().unwrap();
        assert!(seat.hand.is_none());
        assert_eq!(seat.bet.map(|b| b.kind), Some(BetKind::Fold));
        assert!(matches!("q100".parse::<Seat>(), Err(FenError::State('q'))));
        assert!("i-5".parse::<Seat>().is_err());
    }

    #[test]
    fn chip_fields_take_only_their_written_form() {
        for s in ["i+80", "i080", "i 80", "i", "i80 call-+0-20", "i80 call-0-020", "i80 ahac"] {
            assert!(s.parse::<Seat>().is_err(), "{s:?}");
        }
        assert_eq!("i0 call-0-20".parse::<Seat>().unwrap().to_string(), "i0 call-0-20");
    }

    #[test]
    fn hidden_keeps_showdown_hands() {
        let seat: Seat = "i80 AhAc".parse().unwrap();
        assert_eq!(seat.hidden().to_string(), "i80");
        let seat: Seat = "s80 AhAc".parse().unwrap();
        assert_eq!(seat.hidden().to_string(), "s80 AhAc");
    }
}
