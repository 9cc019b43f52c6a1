//! Typed record of what an action changed, with per-seat projections.
//!
//! Every action returns an [`Events`] batch. The raw [`Events::log`] is the
//! dealer's view; [`Events::pov`] renumbers seats for one observer and drops what
//! that seat may not see (other seats' hole cards until they are revealed).

use super::error::FenError;
use super::parse_num;
use super::pot::PotShare;
use super::seat::{Bet, SeatState};
use crate::cards::{join_cards, split_cards, Card};
use crate::config::{Chips, TimeBank};
use crate::hand::HoleCards;
use std::fmt;
use std::str::FromStr;

/// Renumber `seat` so that `pov` becomes seat 1, preserving clockwise order.
pub fn pov_seat(seats: usize, pov: usize, seat: usize) -> usize {
    let r = seat as isize - pov as isize + 1;
    if r < 1 {
        (r + seats as isize) as usize
    } else {
        r as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// `c` seat state changed.
    State { seat: usize, state: SeatState },
    /// `h` hole cards shown.
    Hand { seat: usize, hand: HoleCards },
    /// `s` chips left the stack for a bet.
    Stack { seat: usize, delta: Chips },
    /// `a` bet posted, or cleared when `None`.
    Bet { seat: usize, bet: Option<Bet> },
    Flop([Card; 3]),
    Turn(Card),
    River(Card),
    /// `w` pot share resolved.
    Share(PotShare),
    /// `o` hole cards collected.
    Collect { seat: usize },
    /// `C` pot collected for payout.
    CollectPot,
    /// `S` share credited to a stack.
    Credit { seat: usize, chips: Chips },
    /// `b` button moved.
    Button { seat: usize },
    /// `p` bet swept into the pot.
    PotCredit { seat: usize, chips: Chips },
    /// `v` side pot carved at this seat's all-in level.
    SidePot { seat: usize, chips: Chips },
}

impl Event {
    fn map_seat(&self, f: impl Fn(usize) -> usize) -> Event {
        match self.clone() {
            Event::State { seat, state } => Event::State { seat: f(seat), state },
            Event::Hand { seat, hand } => Event::Hand { seat: f(seat), hand },
            Event::Stack { seat, delta } => Event::Stack { seat: f(seat), delta },
            Event::Bet { seat, bet } => Event::Bet { seat: f(seat), bet },
            Event::Share(share) => Event::Share(share.map_seat(f)),
            Event::Collect { seat } => Event::Collect { seat: f(seat) },
            Event::Credit { seat, chips } => Event::Credit { seat: f(seat), chips },
            Event::Button { seat } => Event::Button { seat: f(seat) },
            Event::PotCredit { seat, chips } => Event::PotCredit { seat: f(seat), chips },
            Event::SidePot { seat, chips } => Event::SidePot { seat: f(seat), chips },
            other @ (Event::Flop(_) | Event::Turn(_) | Event::River(_) | Event::CollectPot) => other,
        }
    }

    /// The event as `pov` sees it on a table of `seats`.
    pub fn pov(&self, seats: usize, pov: usize) -> Event {
        self.map_seat(|s| pov_seat(seats, pov, s))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::State { seat, state } => write!(f, "c {seat} {state}"),
            Event::Hand { seat, hand } => write!(f, "h {seat} {hand}"),
            Event::Stack { seat, delta } => write!(f, "s {seat} {delta}"),
            Event::Bet { seat, bet: Some(bet) } => write!(f, "a {seat} {bet}"),
            Event::Bet { seat, bet: None } => write!(f, "a {seat}"),
            Event::Flop(cards) => write!(f, "f {}", join_cards(cards)),
            Event::Turn(card) => write!(f, "t {card}"),
            Event::River(card) => write!(f, "r {card}"),
            Event::Share(share) => write!(f, "w {share}"),
            Event::Collect { seat } => write!(f, "o {seat}"),
            Event::CollectPot => f.write_str("C"),
            Event::Credit { seat, chips } => write!(f, "S {seat} {chips}"),
            Event::Button { seat } => write!(f, "b {seat}"),
            Event::PotCredit { seat, chips } => write!(f, "p {seat} {chips}"),
            Event::SidePot { seat, chips } => write!(f, "v {seat} {chips}"),
        }
    }
}

impl FromStr for Event {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Event(s.to_string());
        let tokens: Vec<&str> = s.split(' ').collect();
        let seat = |i: usize| -> Result<usize, FenError> {
            tokens.get(i).and_then(|t| parse_num(t)).filter(|&n| n > 0).ok_or_else(bad)
        };
        let chips = |i: usize| -> Result<Chips, FenError> {
            tokens.get(i).and_then(|t| parse_num(t)).ok_or_else(bad)
        };
        let card = |i: usize| -> Result<Card, FenError> {
            Ok(tokens.get(i).ok_or_else(bad)?.parse()?)
        };

        let (event, arity) = match tokens[0] {
            "c" => {
                let mut chars = tokens.get(2).ok_or_else(bad)?.chars();
                let state = match (chars.next(), chars.next()) {
                    (Some(c), None) => SeatState::from_char(c).ok_or(FenError::State(c))?,
                    _ => return Err(bad()),
                };
                (Event::State { seat: seat(1)?, state }, 3)
            }
            "h" => (Event::Hand { seat: seat(1)?, hand: tokens.get(2).ok_or_else(bad)?.parse()? }, 3),
            "s" => (Event::Stack { seat: seat(1)?, delta: chips(2)? }, 3),
            "a" => match tokens.get(2) {
                Some(bet) => (Event::Bet { seat: seat(1)?, bet: Some(bet.parse()?) }, 3),
                None => (Event::Bet { seat: seat(1)?, bet: None }, 2),
            },
            "f" => {
                let cards = split_cards(tokens.get(1).ok_or_else(bad)?)?;
                let flop: [Card; 3] = cards.as_slice().try_into().map_err(|_| bad())?;
                (Event::Flop(flop), 2)
            }
            "t" => (Event::Turn(card(1)?), 2),
            "r" => (Event::River(card(1)?), 2),
            "w" => (Event::Share(tokens.get(1).ok_or_else(bad)?.parse()?), 2),
            "o" => (Event::Collect { seat: seat(1)? }, 2),
            "C" => (Event::CollectPot, 1),
            "S" => (Event::Credit { seat: seat(1)?, chips: chips(2)? }, 3),
            "b" => (Event::Button { seat: seat(1)? }, 2),
            "p" => (Event::PotCredit { seat: seat(1)?, chips: chips(2)? }, 3),
            "v" => (Event::SidePot { seat: seat(1)?, chips: chips(2)? }, 3),
            _ => return Err(bad()),
        };
        if tokens.len() != arity {
            return Err(bad());
        }
        Ok(event)
    }
}

/// Who an event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    /// Everyone but this seat.
    Others(usize),
    /// This seat alone.
    Only(usize),
}

impl Audience {
    pub fn includes(self, seat: usize) -> bool {
        match self {
            Audience::All => true,
            Audience::Others(s) => s != seat,
            Audience::Only(s) => s == seat,
        }
    }
}

/// The events one action produced, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Events {
    seats: usize,
    entries: Vec<(Audience, Event)>,
}

impl Events {
    pub fn new(seats: usize) -> Self {
        Self { seats, entries: Vec::new() }
    }

    pub fn all(&mut self, event: Event) {
        self.entries.push((Audience::All, event));
    }

    pub fn others(&mut self, seat: usize, event: Event) {
        self.entries.push((Audience::Others(seat), event));
    }

    pub fn only(&mut self, seat: usize, event: Event) {
        self.entries.push((Audience::Only(seat), event));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(Audience, Event)] {
        &self.entries
    }

    /// Every event, unfiltered and with absolute seat numbers.
    pub fn log(&self) -> Vec<Event> {
        self.entries.iter().map(|(_, e)| e.clone()).collect()
    }

    /// What `seat` receives, renumbered so it sits first.
    pub fn pov(&self, seat: usize) -> Vec<Event> {
        self.entries
            .iter()
            .filter(|(audience, _)| audience.includes(seat))
            .map(|(_, e)| e.pov(self.seats, seat))
            .collect()
    }

    /// Advisory milliseconds to act, when this batch hands a seat the action.
    pub fn time_left(&self) -> Option<u64> {
        self.time_left_with(&TimeBank::default())
    }

    pub fn time_left_with(&self, bank: &TimeBank) -> Option<u64> {
        let acting = self
            .entries
            .iter()
            .any(|(_, e)| matches!(e, Event::State { state: SeatState::Acting, .. }));
        if !acting {
            return None;
        }
        let has = |p: fn(&Event) -> bool| self.entries.iter().any(|(_, e)| p(e));
        Some(bank.time_left(
            has(|e| matches!(e, Event::Flop(_))),
            has(|e| matches!(e, Event::Turn(_))),
            has(|e| matches!(e, Event::River(_))),
        ))
    }
}

impl fmt::Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, e)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_projection() {
        assert_eq!(pov_seat(3, 2, 1), 3);
        assert_eq!(pov_seat(3, 2, 2), 1);
        assert_eq!(pov_seat(3, 2, 3), 2);
        assert_eq!(pov_seat(2, 1, 2), 2);
    }

    #[test]
    fn event_tokens() {
        for s in [
            "c 1 @",
            "h 2 2h2c",
            "s 3 20",
            "a 2 sb-0-0-10",
            "a 1",
            "f 4h5h6h",
            "t 7h",
            "r 8h",
            "w swin-1-170",
            "o 2",
            "C",
            "S 1 20",
            "b 3",
            "p 1 400",
            "v 2 170",
        ] {
            let e: Event = s.parse().unwrap();
            assert_eq!(e.to_string(), s);
        }
        for s in ["", "c 1", "c 1 z", "a 0", "a +1", "a 01", "p 1 +400", "f 4h5h", "t 7h 8h", "x 1", "C 1"] {
            assert!(s.parse::<Event>().is_err(), "{s:?}");
        }
    }

    #[test]
    fn hole_cards_reach_only_their_audience() {
        let hand: HoleCards = "AhAc".parse().unwrap();
        let mut events = Events::new(3);
        events.only(1, Event::Hand { seat: 1, hand });
        events.others(2, Event::Hand { seat: 2, hand });
        events.all(Event::State { seat: 3, state: SeatState::Acting });

        let one: Vec<String> = events.pov(1).iter().map(ToString::to_string).collect();
        assert_eq!(one, ["h 1 AhAc", "h 2 AhAc", "c 3 @"]);
        let two: Vec<String> = events.pov(2).iter().map(ToString::to_string).collect();
        assert_eq!(two, ["c 2 @"]);
        assert_eq!(events.log().len(), 3);
    }

    #[test]
    fn time_left_follows_revealed_streets() {
        let mut events = Events::new(2);
        events.all(Event::Bet { seat: 1, bet: None });
        assert_eq!(events.time_left(), None);
        events.all(Event::Flop(
            split_cards("4h5h6h").unwrap().try_into().unwrap(),
        ));
        events.all(Event::State { seat: 2, state: SeatState::Acting });
        assert_eq!(events.time_left(), Some(15_000));
    }
}
