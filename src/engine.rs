// Round engine API boundary. Tables, bots and network sessions drive a round
// through typed actions and read it back through these queries, without
// touching seat records directly. It is implemented for the core `Round` type.

use crate::cards::{join_cards, split_cards, Card};
use crate::config::Chips;
use crate::round::{parse_num, Dests, Events, Round, RoundError, RoundPov, Seat};
use std::fmt;
use std::str::FromStr;

/// One command against a round, in its text form `verb[ arg]`.
///
/// ```
/// use poker_round::engine::Action;
///
/// let a: Action = "raise 20-40".parse().unwrap();
/// assert_eq!(a, Action::Raise { to_match: 20, raise: 40 });
/// assert_eq!(a.to_string(), "raise 20-40");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    Deal(Vec<Card>),
    Check,
    Call(Chips),
    Raise { to_match: Chips, raise: Chips },
    Fold,
    Phase,
    Showdown,
    Win,
    /// Pay out resolved shares; optionally the per-seat credits the caller expects.
    Share(Option<Vec<Chips>>),
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Deal(_) => "deal",
            Action::Check => "check",
            Action::Call(_) => "call",
            Action::Raise { .. } => "raise",
            Action::Fold => "fold",
            Action::Phase => "phase",
            Action::Showdown => "showdown",
            Action::Win => "win",
            Action::Share(_) => "share",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deal(cards) => write!(f, "deal {}", join_cards(cards)),
            Action::Call(n) => write!(f, "call {n}"),
            Action::Raise { to_match, raise } => write!(f, "raise {to_match}-{raise}"),
            Action::Share(Some(credits)) => {
                let parts: Vec<String> = credits.iter().map(ToString::to_string).collect();
                write!(f, "share {}", parts.join("-"))
            }
            other => f.write_str(other.verb()),
        }
    }
}

impl FromStr for Action {
    type Err = RoundError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(' ') {
            Some((verb, arg)) => (verb, Some(arg.trim())),
            None => (s, None),
        };
        let amount = |action: &'static str, text: &str| -> Result<Chips, RoundError> {
            parse_num(text).ok_or_else(|| RoundError::amount(action, format!("not a chip amount: {text}")))
        };
        let action = match (verb, arg) {
            ("deal", Some(cards)) => {
                Action::Deal(split_cards(cards).map_err(|e| RoundError::BadDeal(e.to_string()))?)
            }
            ("deal", None) => return Err(RoundError::BadDeal("no cards".to_string())),
            ("check", None) => Action::Check,
            ("call", Some(n)) => Action::Call(amount("call", n)?),
            ("raise", Some(arg)) => {
                let (m, r) = arg
                    .split_once('-')
                    .ok_or_else(|| RoundError::amount("raise", format!("expected match-raise, got {arg}")))?;
                Action::Raise { to_match: amount("raise", m)?, raise: amount("raise", r)? }
            }
            ("fold", None) => Action::Fold,
            ("phase", None) => Action::Phase,
            ("showdown", None) => Action::Showdown,
            ("win", None) => Action::Win,
            ("share", None) => Action::Share(None),
            ("share", Some(arg)) => Action::Share(Some(
                arg.split('-').map(|n| amount("share", n)).collect::<Result<_, _>>()?,
            )),
            _ => return Err(RoundError::UnknownCommand(s.to_string())),
        };
        Ok(action)
    }
}

pub trait RoundEngine {
    // Actions
    fn apply(&mut self, action: Action) -> Result<Events, RoundError>;
    fn act(&mut self, command: &str) -> Result<Events, RoundError>;

    // Queries
    fn dests(&self) -> Dests;
    fn snapshot(&self) -> String;
    fn pov(&self, seat: usize) -> Result<RoundPov, RoundError>;
    fn seat(&self, seat: usize) -> Option<&Seat>;
    fn action_seat(&self) -> Option<usize>;
    fn num_seats(&self) -> usize;
}

impl RoundEngine for Round {
    fn apply(&mut self, action: Action) -> Result<Events, RoundError> {
        self.apply(action)
    }
    fn act(&mut self, command: &str) -> Result<Events, RoundError> {
        self.act(command)
    }

    fn dests(&self) -> Dests {
        self.dests()
    }
    fn snapshot(&self) -> String {
        self.to_string()
    }
    fn pov(&self, seat: usize) -> Result<RoundPov, RoundError> {
        self.pov(seat)
    }
    fn seat(&self, seat: usize) -> Option<&Seat> {
        self.seat(seat)
    }
    fn action_seat(&self) -> Option<usize> {
        self.action_seat()
    }
    fn num_seats(&self) -> usize {
        self.seats().len()
    }
}
