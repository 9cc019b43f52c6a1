use super::error::FenError;
use super::parse_num;
use crate::config::Chips;
use std::fmt;
use std::str::FromStr;

/// Why a raise is capped below the full `to_match + min_raise`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseCap {
    /// The stack does not cover the call; shoving it all is the only raise left.
    CantMatch(Chips),
    /// The call is covered but the remainder is short of a full raise.
    CantMinRaise(Chips),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaiseDest {
    pub to_match: Chips,
    pub min_raise: Chips,
    pub cap: Option<RaiseCap>,
}

impl fmt::Display for RaiseDest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "raise-{}-{}", self.to_match, self.min_raise)?;
        match self.cap {
            None => Ok(()),
            Some(RaiseCap::CantMatch(stack)) => write!(f, "x{stack}-0"),
            Some(RaiseCap::CantMinRaise(rest)) => write!(f, "x{}-{rest}", self.to_match),
        }
    }
}

impl FromStr for RaiseDest {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Dests(s.to_string());
        let body = s.strip_prefix("raise-").ok_or_else(bad)?;
        let (full, cap) = match body.split_once('x') {
            Some((full, cap)) => (full, Some(cap)),
            None => (body, None),
        };
        let (to_match, min_raise) = parse_pair(full).ok_or_else(bad)?;
        let cap = match cap {
            None => None,
            Some(cap) => {
                let (a, b) = parse_pair(cap).ok_or_else(bad)?;
                if b == 0 && a < to_match {
                    Some(RaiseCap::CantMatch(a))
                } else if a == to_match {
                    Some(RaiseCap::CantMinRaise(b))
                } else {
                    return Err(bad());
                }
            }
        };
        Ok(RaiseDest { to_match, min_raise, cap })
    }
}

fn parse_pair(s: &str) -> Option<(Chips, Chips)> {
    let (a, b) = s.split_once('-')?;
    Some((parse_num(a)?, parse_num(b)?))
}

/// Options open to the seat holding the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDests {
    pub check: bool,
    pub call: Option<Chips>,
    pub raise: Option<RaiseDest>,
    pub fold: bool,
}

impl fmt::Display for ActionDests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.check {
            parts.push("check".to_string());
        }
        if let Some(n) = self.call {
            parts.push(format!("call-{n}"));
        }
        if let Some(raise) = &self.raise {
            parts.push(raise.to_string());
        }
        if self.fold {
            parts.push("fold".to_string());
        }
        f.write_str(&parts.join(" "))
    }
}

/// What may happen next: a seat's betting options or the pending dealer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Dests {
    /// Waiting for cards for a table of this many seats.
    Deal(usize),
    Phase,
    Showdown,
    Share,
    Win,
    Fin,
    Act(ActionDests),
}

impl Dests {
    /// Verb name used in rejection messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Dests::Deal(_) => "deal",
            Dests::Phase => "phase",
            Dests::Showdown => "showdown",
            Dests::Share => "share",
            Dests::Win => "win",
            Dests::Fin => "fin",
            Dests::Act(_) => "act",
        }
    }

    pub fn action(&self) -> Option<&ActionDests> {
        match self {
            Dests::Act(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Dests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dests::Deal(n) => write!(f, "deal-{n}"),
            Dests::Act(a) => write!(f, "{a}"),
            other => f.write_str(other.verb()),
        }
    }
}

impl FromStr for Dests {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FenError::Dests(s.to_string());
        match s {
            "phase" => return Ok(Dests::Phase),
            "showdown" => return Ok(Dests::Showdown),
            "share" => return Ok(Dests::Share),
            "win" => return Ok(Dests::Win),
            "fin" => return Ok(Dests::Fin),
            _ => {}
        }
        if let Some(n) = s.strip_prefix("deal-") {
            return parse_num(n).map(Dests::Deal).ok_or_else(bad);
        }

        let mut act = ActionDests { check: false, call: None, raise: None, fold: false };
        for token in s.split_whitespace() {
            if token == "check" && !act.check {
                act.check = true;
            } else if token == "fold" && !act.fold {
                act.fold = true;
            } else if let Some(n) = token.strip_prefix("call-") {
                if act.call.is_some() {
                    return Err(bad());
                }
                act.call = Some(parse_num(n).ok_or_else(bad)?);
            } else if token.starts_with("raise-") && act.raise.is_none() {
                act.raise = Some(token.parse()?);
            } else {
                return Err(bad());
            }
        }
        if !act.fold {
            return Err(bad());
        }
        Ok(Dests::Act(act))
    }
}
