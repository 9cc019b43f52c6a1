//! One hand of Texas Hold'em betting: blinds, streets, all-ins, side pots and payout.
//!
//! A [`Round`] is driven by text commands (or typed [`Action`]s) and always has a
//! single-line snapshot form that decodes back to the same round:
//!
//! ```
//! use poker_round::round::Round;
//!
//! let mut round: Round = "10-20 1 | d100 / d200 / d300 $!".parse().unwrap();
//! assert_eq!(round.dests().to_string(), "deal-3");
//!
//! round.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
//! assert_eq!(
//!     round.to_string(),
//!     "10-20 1 | @100 AhAc / i190 2h2c sb-0-0-10 / i280 3h3c bb-0-0-20 $!p4h5h6h7h8h"
//! );
//! assert_eq!(round.dests().to_string(), "call-20 raise-20-20 fold");
//! ```

mod dests;
mod error;
mod events;
mod pot;
mod pov;
mod seat;

pub use dests::{ActionDests, Dests, RaiseCap, RaiseDest};
pub use error::{FenError, RoundError};
pub use events::{pov_seat, Audience, Event, Events};
pub use pot::{Pot, PotShare};
pub use pov::RoundPov;
pub use seat::{Bet, BetKind, Seat, SeatState};

use crate::cards::Card;
use crate::config::{Chips, MAX_SEATS, MIN_SEATS};
use crate::engine::Action;
use crate::evaluator::{evaluate_7, HandRank};
use crate::hand::{HoleCards, Middle};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const fn as_char(self) -> char {
        match self {
            Street::Preflop => 'p',
            Street::Flop => 'f',
            Street::Turn => 't',
            Street::River => 'r',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Street::Preflop),
            'f' => Some(Street::Flop),
            't' => Some(Street::Turn),
            'r' => Some(Street::River),
            _ => None,
        }
    }

    pub const fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Community cards face up on this street.
    pub const fn revealed(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

/// First candidate clockwise after `from`, wrapping to the lowest.
/// `candidates` must be in ascending seat order.
fn next_side(candidates: &[usize], from: usize) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&s| s > from)
        .or_else(|| candidates.first().copied())
}

/// Decimal in its written form: digits only, no sign, no leading zero.
pub(crate) fn parse_num<T: FromStr>(s: &str) -> Option<T> {
    let written = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'));
    if written {
        s.parse().ok()
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    small_blind: Chips,
    button: usize,
    seats: Vec<Seat>,
    pot: Option<Pot>,
    middle: Option<Middle>,
    street: Option<Street>,
    shares: Option<Vec<PotShare>>,
}

impl Round {
    /// A fresh table waiting for the deal. Seats with no chips sit the hand out.
    pub fn new(small_blind: Chips, button: usize, stacks: &[Chips]) -> Result<Self, RoundError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&stacks.len()) {
            return Err(RoundError::SeatCount(stacks.len()));
        }
        if button == 0 || button > stacks.len() {
            return Err(RoundError::NoSuchSeat(button));
        }
        if small_blind == 0 {
            return Err(RoundError::amount("blind", "small blind must be positive"));
        }
        let seats = stacks
            .iter()
            .map(|&stack| {
                let mut seat = Seat::new(stack);
                if stack == 0 {
                    seat.state = SeatState::Empty;
                }
                seat
            })
            .collect();
        Ok(Self { small_blind, button, seats, pot: None, middle: None, street: None, shares: None })
    }

    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }

    pub fn big_blind(&self) -> Chips {
        self.small_blind * 2
    }

    pub fn button(&self) -> usize {
        self.button
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Seat by its 1-based number.
    pub fn seat(&self, seat: usize) -> Option<&Seat> {
        seat.checked_sub(1).and_then(|i| self.seats.get(i))
    }

    pub fn pot(&self) -> Option<&Pot> {
        self.pot.as_ref()
    }

    pub fn middle(&self) -> Option<&Middle> {
        self.middle.as_ref()
    }

    pub fn street(&self) -> Option<Street> {
        self.street
    }

    pub fn shares(&self) -> Option<&[PotShare]> {
        self.shares.as_deref()
    }

    /// Seat holding the action, if any.
    pub fn action_seat(&self) -> Option<usize> {
        self.sides(|s| s == SeatState::Acting).first().copied()
    }

    /// Small and big blind seats for this hand.
    pub fn blind_seats(&self) -> Option<(usize, usize)> {
        let played = self.played();
        let sb = next_side(&played, self.button)?;
        let bb = next_side(&played, sb)?;
        Some((sb, bb))
    }

    /// Every chip on the table: stacks, live bets and pots.
    pub fn total_chips(&self) -> Chips {
        let seats: Chips = self.seats.iter().map(|s| s.stack + s.bet_total()).sum();
        seats + self.pot.as_ref().map_or(0, Pot::total)
    }

    fn sides(&self, pred: impl Fn(SeatState) -> bool) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| pred(seat.state))
            .map(|(i, _)| i + 1)
            .collect()
    }

    fn played(&self) -> Vec<usize> {
        self.sides(SeatState::has_played)
    }

    fn at(&self, seat: usize) -> &Seat {
        &self.seats[seat - 1]
    }

    fn at_mut(&mut self, seat: usize) -> &mut Seat {
        &mut self.seats[seat - 1]
    }

    fn total(&self, seat: usize) -> Chips {
        self.at(seat).bet_total()
    }

    /// Chips `seat` needs to call, and the largest raise made on this street.
    fn to_match(&self, seat: usize) -> (Chips, Chips) {
        let live = self.sides(|s| matches!(s, SeatState::In | SeatState::AllIn));
        let high = live.iter().map(|&s| self.total(s)).max().unwrap_or(0);
        let max_raise = live
            .iter()
            .filter_map(|&s| self.at(s).bet.and_then(|b| b.raised))
            .max()
            .unwrap_or(0);
        (high.saturating_sub(self.total(seat)), max_raise)
    }

    /// Legal next steps. Recomputed from the current state on every call.
    pub fn dests(&self) -> Dests {
        if let Some(seat) = self.action_seat() {
            return Dests::Act(self.action_dests(seat));
        }
        let any = |state: SeatState| self.seats.iter().any(|s| s.state == state);
        if any(SeatState::Won) {
            if self.shares.is_some() {
                Dests::Share
            } else {
                Dests::Win
            }
        } else if any(SeatState::Settled) {
            Dests::Fin
        } else if any(SeatState::Dealt) {
            Dests::Deal(self.seats.len())
        } else if any(SeatState::Showdown) {
            if self.shares.is_some() {
                Dests::Share
            } else {
                Dests::Showdown
            }
        } else {
            Dests::Phase
        }
    }

    fn action_dests(&self, seat: usize) -> ActionDests {
        let stack = self.at(seat).stack;
        let (to_match, max_raise) = self.to_match(seat);
        let min_raise = self.big_blind().max(max_raise);
        let others = self.sides(|s| s == SeatState::In);

        let cap = if stack < to_match {
            Some(Some(RaiseCap::CantMatch(stack)))
        } else if others.is_empty() {
            // nobody left to raise against: only a call-sized shove remains
            (stack == to_match).then_some(Some(RaiseCap::CantMinRaise(0)))
        } else if stack - to_match < min_raise {
            Some(Some(RaiseCap::CantMinRaise(stack - to_match)))
        } else {
            Some(None)
        };

        ActionDests {
            check: to_match == 0,
            call: (to_match > 0 && to_match < stack).then_some(to_match),
            raise: cap.map(|cap| RaiseDest { to_match, min_raise, cap }),
            fold: true,
        }
    }

    /// Parse and run one command.
    pub fn act(&mut self, command: &str) -> Result<Events, RoundError> {
        let action: Action = command.parse()?;
        self.apply(action)
    }

    /// Run one action. On error the round is left exactly as it was.
    #[instrument(level = "trace", skip(self, action), fields(action = %action))]
    pub fn apply(&mut self, action: Action) -> Result<Events, RoundError> {
        let dests = self.dests();
        let before = self.total_chips();
        let saved = self.clone();
        let mut ev = Events::new(self.seats.len());

        let result = match (&action, &dests) {
            (Action::Deal(cards), Dests::Deal(_)) => self.deal(cards, &mut ev),
            (Action::Check, Dests::Act(a)) if a.check => self.check(&mut ev),
            (Action::Call(n), Dests::Act(_)) => self.call(*n, &mut ev),
            (Action::Raise { to_match, raise }, Dests::Act(a)) if a.raise.is_some() => {
                self.raise(*to_match, *raise, a, &mut ev)
            }
            (Action::Fold, Dests::Act(_)) => self.fold(&mut ev),
            (Action::Phase, Dests::Phase) => self.phase(&mut ev),
            (Action::Showdown, Dests::Showdown) => self.showdown(&mut ev),
            (Action::Win, Dests::Win) => self.win(&mut ev),
            (Action::Share(credits), Dests::Share) => self.share(credits.as_deref(), &mut ev),
            _ => Err(RoundError::NotYourAction { action: action.verb(), dests: dests.to_string() }),
        };

        match result {
            Ok(()) => {
                debug_assert_eq!(before, self.total_chips(), "chips not conserved by {action}");
                debug!(%action, round = %self, "action applied");
                Ok(ev)
            }
            Err(err) => {
                *self = saved;
                debug!(%action, %err, "action rejected");
                Err(err)
            }
        }
    }

    fn set_state(&mut self, ev: &mut Events, seat: usize, state: SeatState) {
        self.at_mut(seat).state = state;
        ev.all(Event::State { seat, state });
    }

    fn post(&mut self, ev: &mut Events, seat: usize, kind: BetKind, matched: Option<Chips>, raised: Option<Chips>) {
        let s = self.at_mut(seat);
        let bet = Bet::new(kind, s.bet_total(), matched, raised);
        let delta = bet.delta();
        assert!(delta <= s.stack, "seat {seat} bets {delta} with {} behind", s.stack);
        s.stack -= delta;
        s.bet = Some(bet);
        ev.all(Event::Bet { seat, bet: Some(bet) });
        if delta > 0 {
            ev.all(Event::Stack { seat, delta });
        }
    }

    fn clear_bet(&mut self, ev: &mut Events, seat: usize) {
        self.at_mut(seat).bet = None;
        ev.all(Event::Bet { seat, bet: None });
    }

    fn acting(&self) -> Result<usize, RoundError> {
        self.action_seat().ok_or(RoundError::Inconsistent("no seat holds the action"))
    }

    fn deal(&mut self, cards: &[Card], ev: &mut Events) -> Result<(), RoundError> {
        let nb = self.seats.len();
        let dealt = self.sides(|s| s == SeatState::Dealt);
        if dealt.len() < 2 {
            return Err(RoundError::Inconsistent("a deal needs two seats with chips"));
        }
        let need = 2 * nb + 5;
        if cards.len() < need {
            return Err(RoundError::BadDeal(format!("need {need} cards, got {}", cards.len())));
        }
        let mut seen = HashSet::with_capacity(need);
        if let Some(dup) = cards[..need].iter().find(|c| !seen.insert(**c)) {
            return Err(RoundError::BadDeal(format!("{dup} dealt twice")));
        }
        let bad = |e: crate::hand::HandError| RoundError::BadDeal(e.to_string());
        let middle = Middle::from_slice(&cards[2 * nb..need]).map_err(bad)?;
        let hands = (0..dealt.len())
            .map(|i| HoleCards::from_slice(&cards[2 * i..2 * i + 2]).map_err(bad))
            .collect::<Result<Vec<_>, _>>()?;
        let (sb, bb) = self.blind_seats().ok_or(RoundError::Inconsistent("no blind seats"))?;

        let blind = self.small_blind;
        let sb_stack = self.at(sb).stack;
        let bb_stack = self.at(bb).stack;
        let bb_all_in = bb_stack <= self.big_blind();
        let sb_all_in = sb_stack <= blind;
        let sb_calls_short = bb_all_in && blind >= bb_stack;

        let mut action = next_side(&dealt, bb);
        if sb_all_in && action == Some(sb) {
            action = action.and_then(|a| next_side(&dealt, a));
        }
        trace!(sb, bb, ?action, sb_all_in, bb_all_in, "blinds");

        for &s in &dealt {
            let state = if sb_all_in && s == sb {
                SeatState::AllIn
            } else if sb_calls_short && s == sb {
                SeatState::Played
            } else if sb_all_in && s == bb && Some(s) == action {
                SeatState::Played
            } else if bb_all_in && s == bb {
                SeatState::AllIn
            } else if Some(s) == action {
                SeatState::Acting
            } else {
                SeatState::In
            };
            self.set_state(ev, s, state);
        }

        if sb_all_in {
            self.post(ev, sb, BetKind::AllIn, Some(0), Some(sb_stack));
        } else if sb_calls_short {
            self.post(ev, sb, BetKind::Call, Some(bb_stack), None);
        } else {
            self.post(ev, sb, BetKind::SmallBlind, Some(0), Some(blind));
        }
        if bb_all_in {
            self.post(ev, bb, BetKind::AllIn, Some(0), Some(bb_stack));
        } else if sb_all_in && action == Some(bb) {
            self.post(ev, bb, BetKind::Call, Some(sb_stack), None);
        } else {
            self.post(ev, bb, BetKind::BigBlind, Some(0), Some(self.big_blind()));
        }

        self.middle = Some(middle);
        for (&s, hand) in dealt.iter().zip(hands) {
            self.at_mut(s).hand = Some(hand);
            ev.only(s, Event::Hand { seat: s, hand });
        }
        self.street = Some(Street::Preflop);
        Ok(())
    }

    fn call(&mut self, amount: Chips, ev: &mut Events) -> Result<(), RoundError> {
        let seat = self.acting()?;
        let next = next_side(&self.sides(|s| s == SeatState::In), seat);
        let (to_match, _) = self.to_match(seat);
        let stack = self.at(seat).stack;

        if to_match > 0 && stack <= to_match {
            if amount < stack {
                return Err(RoundError::amount("call", format!("all-in call is {stack}, got {amount}")));
            }
            self.all_in(ev, seat, next, to_match);
            return Ok(());
        }
        if to_match == 0 {
            return Err(RoundError::NotYourAction { action: "call", dests: self.dests().to_string() });
        }
        if amount != to_match {
            return Err(RoundError::amount("call", format!("call is {to_match}, got {amount}")));
        }

        let live = self.sides(SeatState::is_in);
        self.post(ev, seat, BetKind::Call, Some(to_match), None);
        let bets: Vec<Option<Bet>> = live.iter().map(|&s| self.at(s).bet).collect();
        let first = self.total(live[0]);
        let closes = bets
            .iter()
            .all(|b| b.map_or(false, |b| b.total() == first && b.kind != BetKind::BigBlind));
        if closes {
            for s in live {
                self.set_state(ev, s, SeatState::Played);
            }
        } else {
            self.set_state(ev, seat, SeatState::In);
            if let Some(next) = next {
                self.set_state(ev, next, SeatState::Acting);
            }
        }
        Ok(())
    }

    fn raise(&mut self, to_match: Chips, raise: Chips, dest: &ActionDests, ev: &mut Events) -> Result<(), RoundError> {
        let seat = self.acting()?;
        let next = next_side(&self.sides(|s| s == SeatState::In), seat);
        let (owed, _) = self.to_match(seat);
        let stack = self.at(seat).stack;

        if stack <= to_match.saturating_add(raise) {
            self.all_in(ev, seat, next, owed);
            return Ok(());
        }
        let Some(allowed) = dest.raise else {
            return Err(RoundError::NotYourAction { action: "raise", dests: self.dests().to_string() });
        };
        if allowed.cap.is_some() {
            return Err(RoundError::amount("raise", format!("only an all-in of {stack} is possible")));
        }
        if to_match != allowed.to_match {
            return Err(RoundError::amount("raise", format!("must match {}, got {to_match}", allowed.to_match)));
        }
        if raise < allowed.min_raise {
            return Err(RoundError::amount("raise", format!("minimum raise is {}, got {raise}", allowed.min_raise)));
        }

        self.post(ev, seat, BetKind::Raise, Some(to_match), Some(raise));
        self.set_state(ev, seat, SeatState::In);
        self.reopen(ev, seat, next);
        Ok(())
    }

    fn all_in(&mut self, ev: &mut Events, seat: usize, next: Option<usize>, to_match: Chips) {
        let stack = self.at(seat).stack;
        let matched = stack.min(to_match);
        self.post(ev, seat, BetKind::AllIn, Some(matched), Some(stack - matched));
        self.set_state(ev, seat, SeatState::AllIn);
        self.reopen(ev, seat, next);
    }

    /// Hand the action on after a bet grows the street.
    fn reopen(&mut self, ev: &mut Events, seat: usize, next: Option<usize>) {
        let others: Vec<usize> = self.sides(|s| s == SeatState::In).into_iter().filter(|&s| s != seat).collect();
        let Some(next) = next else { return };
        if others.len() == 1 && self.total(others[0]) >= self.total(seat) {
            self.set_state(ev, next, SeatState::Played);
        } else if !others.is_empty() {
            self.set_state(ev, next, SeatState::Acting);
        }
    }

    fn check(&mut self, ev: &mut Events) -> Result<(), RoundError> {
        let seat = self.acting()?;
        let others = self.sides(|s| s == SeatState::In);
        let next = next_side(&others, seat);
        let mine = self.total(seat);

        let closes = others.iter().all(|&s| self.at(s).bet.map_or(false, |b| b.total() == mine));
        if closes {
            for s in self.sides(SeatState::is_in) {
                self.set_state(ev, s, SeatState::Played);
            }
        } else {
            self.set_state(ev, seat, SeatState::In);
            if let Some(next) = next {
                self.set_state(ev, next, SeatState::Acting);
            }
        }
        self.post(ev, seat, BetKind::Check, None, None);
        Ok(())
    }

    fn fold(&mut self, ev: &mut Events) -> Result<(), RoundError> {
        let seat = self.acting()?;
        let others = self.sides(|s| s == SeatState::In);
        let next = next_side(&others, seat);
        let max_all_in = self.sides(|s| s == SeatState::AllIn).into_iter().map(|s| self.total(s)).max().unwrap_or(0);

        if let [only] = others[..] {
            let state = if self.total(only) >= max_all_in { SeatState::Played } else { SeatState::Acting };
            self.set_state(ev, only, state);
        } else {
            let totals: HashSet<Chips> = others.iter().map(|&s| self.total(s)).collect();
            let all_bet = others.iter().all(|&s| self.at(s).bet.is_some());
            // an unraised big blind still has its option
            let option = others.iter().any(|&s| self.at(s).bet.map_or(false, |b| b.kind == BetKind::BigBlind));
            if all_bet && totals.len() <= 1 {
                match totals.into_iter().next() {
                    None => {}
                    Some(t) if t >= max_all_in && !option => {
                        for &s in &others {
                            self.set_state(ev, s, SeatState::Played);
                        }
                    }
                    Some(_) => {
                        if let Some(next) = next {
                            self.set_state(ev, next, SeatState::Acting);
                        }
                    }
                }
            } else if let Some(next) = next {
                self.set_state(ev, next, SeatState::Acting);
            }
        }
        self.set_state(ev, seat, SeatState::Folded);
        self.post(ev, seat, BetKind::Fold, None, None);
        Ok(())
    }

    /// Close the street: sweep bets, carve side pots, then reveal and move on.
    fn phase(&mut self, ev: &mut Events) -> Result<(), RoundError> {
        let street = self.street.ok_or(RoundError::Inconsistent("no street in progress"))?;
        let middle = self.middle.ok_or(RoundError::Inconsistent("no community cards"))?;

        let played = self.sides(|s| s == SeatState::Played);
        let all_ins = self.sides(|s| s == SeatState::AllIn);
        let folded = self.sides(|s| s == SeatState::Folded);
        let mut short: Vec<usize> = all_ins.iter().copied().filter(|&s| self.at(s).bet.is_some()).collect();

        let none_left = played.len() <= 1;
        let everyone_folded = none_left && all_ins.is_empty();
        let folded_to_all_in = played.is_empty() && short.len() == 1;
        let showdown_all_in = all_ins.len() > 1;

        let mut pot = self.pot.take().unwrap_or_default();
        let earlier = pot.chips;
        let mut contributed = Vec::new();
        for &s in played.iter().chain(&all_ins) {
            if let Some(bet) = self.at(s).bet {
                pot.join(s);
                pot.chips += bet.total();
                contributed.push(bet.total());
                if bet.total() > 0 {
                    ev.all(Event::PotCredit { seat: s, chips: bet.total() });
                }
            }
        }
        for &s in &folded {
            if let Some(bet) = self.at(s).bet {
                pot.exclude(s);
                pot.chips += bet.total();
                contributed.push(bet.total());
                if bet.total() > 0 {
                    ev.all(Event::PotCredit { seat: s, chips: bet.total() });
                }
            }
        }

        if !folded_to_all_in {
            short.sort_by_key(|&s| self.total(s));
            let mut prev = 0;
            for (i, &s) in short.iter().enumerate() {
                let level = self.total(s);
                let mut chips: Chips = contributed.iter().map(|&c| c.min(level) - c.min(prev)).sum();
                if i == 0 {
                    chips += earlier;
                }
                assert!(chips <= pot.chips, "side pot of {chips} exceeds pot of {}", pot.chips);
                trace!(seat = s, level, chips, "side pot");
                pot.push_side(Pot::new(chips, pot.seats.clone()));
                pot.seats.retain(|&x| x != s);
                pot.chips -= chips;
                ev.all(Event::SidePot { seat: s, chips: level - prev });
                prev = level;
            }
        }
        self.pot = Some(pot);

        for &s in all_ins.iter().chain(&folded).chain(&played) {
            self.clear_bet(ev, s);
        }

        if !(everyone_folded || (folded_to_all_in && !showdown_all_in)) {
            match street {
                Street::Preflop => ev.all(Event::Flop(middle.flop())),
                Street::Flop => ev.all(Event::Turn(middle.turn())),
                Street::Turn => ev.all(Event::River(middle.river())),
                Street::River => {}
            }
        }

        if none_left {
            if !showdown_all_in && folded_to_all_in {
                for &s in &all_ins {
                    self.set_state(ev, s, SeatState::Won);
                }
            } else if everyone_folded {
                for &s in &played {
                    self.set_state(ev, s, SeatState::Won);
                }
            } else {
                for &s in all_ins.iter().chain(&played) {
                    self.reveal(ev, s)?;
                }
                match street {
                    Street::Preflop => {
                        ev.all(Event::Turn(middle.turn()));
                        ev.all(Event::River(middle.river()));
                    }
                    Street::Flop => ev.all(Event::River(middle.river())),
                    Street::Turn | Street::River => {}
                }
                for &s in played.iter().chain(&all_ins) {
                    self.set_state(ev, s, SeatState::Showdown);
                }
            }
        } else if street == Street::River {
            for &s in played.iter().chain(&all_ins) {
                self.set_state(ev, s, SeatState::Showdown);
            }
            for s in self.sides(|s| s == SeatState::Showdown) {
                self.reveal(ev, s)?;
            }
        } else {
            let (_, bb) = self.blind_seats().ok_or(RoundError::Inconsistent("no blind seats"))?;
            let first = if played.contains(&bb) { Some(bb) } else { next_side(&played, bb) };
            for &s in &played {
                let state = if Some(s) == first { SeatState::Acting } else { SeatState::In };
                self.set_state(ev, s, state);
            }
            self.street = street.next();
        }
        Ok(())
    }

    fn reveal(&self, ev: &mut Events, seat: usize) -> Result<(), RoundError> {
        let hand = self.at(seat).hand.ok_or(RoundError::Inconsistent("revealed seat has no hole cards"))?;
        ev.others(seat, Event::Hand { seat, hand });
        Ok(())
    }

    /// Resolve every pot layer. Pure: nothing is written until all layers resolve.
    fn resolve_shares(&self) -> Result<Vec<PotShare>, RoundError> {
        let middle = self.middle.ok_or(RoundError::Inconsistent("no community cards"))?;
        let pot = self.pot.as_ref().ok_or(RoundError::Inconsistent("no pot to show down"))?;
        let nb = self.seats.len();
        let mut shares = Vec::new();

        for layer in pot.layers() {
            if layer.seats.is_empty() || layer.chips == 0 {
                continue;
            }
            if let [seat] = layer.seats[..] {
                shares.push(PotShare::Back { seat, chips: layer.chips });
                continue;
            }
            let mut ranked: Vec<(usize, HandRank)> = Vec::with_capacity(layer.seats.len());
            for &s in &layer.seats {
                let hand = self.at(s).hand.ok_or(RoundError::Inconsistent("showdown seat has no hole cards"))?;
                ranked.push((s, evaluate_7(&middle.with_hole(&hand))));
            }
            let best = ranked.iter().map(|&(_, r)| r).min().unwrap_or(HandRank::MAX);
            let mut winners: Vec<usize> = ranked.iter().filter(|&&(_, r)| r == best).map(|&(s, _)| s).collect();
            winners.sort_unstable();
            trace!(?ranked, ?winners, chips = layer.chips, "showdown");

            let n = winners.len() as Chips;
            let (each, odd) = (layer.chips / n, (layer.chips % n) as usize);
            let mut clockwise = winners.clone();
            clockwise.sort_by_key(|&s| (s + nb - self.button - 1) % nb);
            let extra = &clockwise[..odd];
            for &seat in &winners {
                let chips = each + Chips::from(extra.contains(&seat));
                shares.push(PotShare::ShowdownWin { seat, chips });
            }
        }
        Ok(shares)
    }

    fn showdown(&mut self, ev: &mut Events) -> Result<(), RoundError> {
        let shares = self.resolve_shares()?;
        for share in &shares {
            ev.all(Event::Share(*share));
        }
        self.shares = Some(shares);
        Ok(())
    }

    fn win(&mut self, ev: &mut Events) -> Result<(), RoundError> {
        let pot = self.pot.as_ref().ok_or(RoundError::Inconsistent("no pot to win"))?;
        let seat = *pot.seats.first().ok_or(RoundError::Inconsistent("pot has no eligible seat"))?;
        let share = PotShare::Win { seat, chips: pot.total() };
        ev.all(Event::Share(share));
        self.shares = Some(vec![share]);
        Ok(())
    }

    fn share(&mut self, credits: Option<&[Chips]>, ev: &mut Events) -> Result<(), RoundError> {
        let shares = self.shares.clone().ok_or(RoundError::Inconsistent("no shares resolved"))?;
        if let Some(credits) = credits {
            let mut owed = vec![0; self.seats.len()];
            for share in &shares {
                owed[share.seat() - 1] += share.chips();
            }
            if credits != owed.as_slice() {
                let owed: Vec<String> = owed.iter().map(ToString::to_string).collect();
                return Err(RoundError::amount("share", format!("shares pay {}", owed.join("-"))));
            }
        }

        let played = self.played();
        self.pot = None;
        self.shares = None;
        self.middle = None;
        ev.all(Event::CollectPot);
        for share in &shares {
            self.at_mut(share.seat()).stack += share.chips();
            ev.all(Event::Credit { seat: share.seat(), chips: share.chips() });
        }
        for s in played {
            let state = if self.at(s).stack == 0 { SeatState::Empty } else { SeatState::Settled };
            self.set_state(ev, s, state);
            self.at_mut(s).hand = None;
            ev.all(Event::Collect { seat: s });
        }
        self.street = None;
        Ok(())
    }

    /// The table as `seat` sees it.
    pub fn pov(&self, seat: usize) -> Result<RoundPov, RoundError> {
        let nb = self.seats.len();
        if seat == 0 || seat > nb {
            return Err(RoundError::NoSuchSeat(seat));
        }
        let seats = (seat..=nb)
            .chain(1..seat)
            .map(|s| if s == seat { self.at(s).clone() } else { self.at(s).hidden() })
            .collect();
        let revealed = match (&self.middle, self.street) {
            (None, _) => 0,
            (Some(_), _) if self.seats.iter().any(|s| s.state == SeatState::Showdown) => 5,
            (Some(_), street) => street.map_or(0, Street::revealed),
        };
        let middle = self.middle.map(|m| m.as_slice()[..revealed].to_vec()).unwrap_or_default();
        Ok(RoundPov {
            small_blind: self.small_blind,
            button: pov_seat(nb, seat, self.button),
            seats,
            pot: self.pot.clone(),
            middle,
            shares: self
                .shares
                .as_ref()
                .map(|shares| shares.iter().map(|s| s.map_seat(|x| pov_seat(nb, seat, x))).collect()),
        })
    }
}

/// Sections common to the full and point-of-view snapshots.
pub(crate) struct Snapshot<'a> {
    pub small_blind: Chips,
    pub button: usize,
    pub seats: Vec<Seat>,
    pub pot: Option<Pot>,
    pub tail: &'a str,
    pub shares: Option<Vec<PotShare>>,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn parse(s: &'a str) -> Result<Self, FenError> {
        let (body, shares) = match s.split_once(" shares ") {
            Some((body, list)) => {
                let shares = list.split_whitespace().map(str::parse).collect::<Result<Vec<PotShare>, _>>()?;
                (body, Some(shares))
            }
            None => match s.strip_suffix(" shares") {
                Some(body) => (body, Some(Vec::new())),
                None => (s, None),
            },
        };
        let (rest, tail) = body.split_once('!').ok_or(FenError::Missing("!"))?;
        let (rest, pot) = rest.split_once('$').ok_or(FenError::Missing("$"))?;
        let (head, seats) = rest.split_once('|').ok_or(FenError::Missing("|"))?;

        let mut head_parts = head.split_whitespace();
        let blinds = head_parts.next().ok_or(FenError::Missing("blinds"))?;
        let button = head_parts.next().ok_or(FenError::Missing("button"))?;
        if head_parts.next().is_some() {
            return Err(FenError::Button(head.trim().to_string()));
        }
        let small_blind = blinds
            .split_once('-')
            .and_then(|(sb, bb)| Some((parse_num::<Chips>(sb)?, parse_num::<Chips>(bb)?)))
            .filter(|&(sb, bb)| sb > 0 && bb == sb * 2)
            .map(|(sb, _)| sb)
            .ok_or_else(|| FenError::Blinds(blinds.to_string()))?;

        let seats = seats.split('/').map(|s| s.trim().parse()).collect::<Result<Vec<Seat>, _>>()?;
        let nb = seats.len();
        if !(MIN_SEATS..=MAX_SEATS).contains(&nb) {
            return Err(FenError::SeatCount(nb));
        }
        let button: usize = parse_num(button)
            .filter(|&b| b >= 1 && b <= nb)
            .ok_or_else(|| FenError::Button(button.to_string()))?;
        if seats.iter().filter(|s| s.state == SeatState::Acting).count() > 1 {
            return Err(FenError::TwoActing);
        }

        let pot = match pot.trim() {
            "" => None,
            p => Some(p.parse::<Pot>()?),
        };
        if let Some(pot) = &pot {
            if pot.layers().flat_map(|l| &l.seats).any(|&s| s > nb) {
                return Err(FenError::Pot(pot.to_string()));
            }
        }
        if let Some(shares) = &shares {
            if let Some(share) = shares.iter().find(|s| s.seat() > nb) {
                return Err(FenError::Share(share.to_string()));
            }
        }
        Ok(Snapshot { small_blind, button, seats, pot, tail, shares })
    }
}

pub(crate) fn write_head(f: &mut fmt::Formatter<'_>, small_blind: Chips, button: usize, seats: &[Seat], pot: Option<&Pot>) -> fmt::Result {
    write!(f, "{}-{} {} | ", small_blind, small_blind * 2, button)?;
    for (i, seat) in seats.iter().enumerate() {
        if i > 0 {
            f.write_str(" / ")?;
        }
        write!(f, "{seat}")?;
    }
    match pot {
        Some(pot) => write!(f, " $ {pot} !"),
        None => f.write_str(" $!"),
    }
}

pub(crate) fn write_shares(f: &mut fmt::Formatter<'_>, shares: Option<&[PotShare]>) -> fmt::Result {
    if let Some(shares) = shares {
        f.write_str(" shares")?;
        for share in shares {
            write!(f, " {share}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_head(f, self.small_blind, self.button, &self.seats, self.pot.as_ref())?;
        if let Some(street) = self.street {
            write!(f, "{}", street.as_char())?;
        }
        if let Some(middle) = &self.middle {
            write!(f, "{middle}")?;
        }
        write_shares(f, self.shares.as_deref())
    }
}

impl FromStr for Round {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let snap = Snapshot::parse(s)?;
        let mut tail = snap.tail.trim_end();
        let street = tail.chars().next().and_then(Street::from_char);
        if street.is_some() {
            tail = &tail[1..];
        }
        let middle = match tail {
            "" => None,
            cards => Some(cards.parse::<Middle>()?),
        };
        if street.is_some() && middle.is_none() {
            return Err(FenError::Middle(snap.tail.to_string()));
        }
        Ok(Round {
            small_blind: snap.small_blind,
            button: snap.button,
            seats: snap.seats,
            pot: snap.pot,
            middle,
            street,
            shares: snap.shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(s: &str) -> Round {
        let r: Round = s.parse().unwrap();
        assert_eq!(r.to_string(), s);
        r
    }

    fn log(ev: &Events) -> Vec<String> {
        ev.log().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn next_side_wraps() {
        assert_eq!(next_side(&[1, 2, 3], 1), Some(2));
        assert_eq!(next_side(&[1, 2, 3], 3), Some(1));
        assert_eq!(next_side(&[2], 2), Some(2));
        assert_eq!(next_side(&[], 2), None);
    }

    #[test]
    fn new_round_waits_for_the_deal() {
        let r = Round::new(10, 1, &[3000, 3000]).unwrap();
        assert_eq!(r.to_string(), "10-20 1 | d3000 / d3000 $!");
        assert_eq!(r.dests(), Dests::Deal(2));
        assert_eq!(Round::new(10, 1, &[100]), Err(RoundError::SeatCount(1)));
        assert_eq!(Round::new(10, 3, &[100, 100]), Err(RoundError::NoSuchSeat(3)));
        let r = Round::new(10, 1, &[100, 0, 100]).unwrap();
        assert_eq!(r.to_string(), "10-20 1 | d100 / e0 / d100 $!");
    }

    #[test]
    fn headsup_button_posts_big_blind() {
        let mut r = round("10-20 1 | d3000 / d3000 $!");
        r.act("deal AhAc2h2c3h4h5h6h7h").unwrap();
        assert_eq!(r.to_string(), "10-20 1 | i2980 AhAc bb-0-0-20 / @2990 2h2c sb-0-0-10 $!p3h4h5h6h7h");
        assert_eq!(r.blind_seats(), Some((2, 1)));
    }

    #[test]
    fn snapshots_decode_exactly() {
        for s in [
            "10-20 1 | f1840 3cQs / w960 $ 3200-2 !",
            "10-20 2 | s0 Jc2c / s2240 Kc9c $ 320-2side 3440-21 ! shares back-2-320 swin-2-3440",
            "10-20 1 | @380 AhAc call-0-20 / i160 2h2c call-0-10 / i280 3h3c raise-20-0-80 $!4h5h6h7h8h",
            "85-170 2 | i3960 AdTd raise-680-170-170 / @170 4hKh call-0-850 $!p6dTc4c9c7d",
        ] {
            round(s);
        }
    }

    #[test]
    fn snapshots_reject_non_canonical_text() {
        let base = "10-20 1 | i80 AhAc call-0-20 / @190 2h2c sb-0-0-10 / i280 3h3c bb-0-0-20 $!p4h5h6h7h8h";
        round(base);
        for (from, to) in [
            ("i80", "i+80"),
            ("i80", "i080"),
            (" 1 |", " 01 |"),
            ("10-20", "+10-20"),
            ("sb-0-0-10", "sb-0-0-010"),
            ("AhAc", "ahac"),
            ("AhAc", "AHAC"),
            ("p4h5h", "p4H5h"),
        ] {
            let s = base.replacen(from, to, 1);
            assert!(s.parse::<Round>().is_err(), "{s:?}");
        }
        assert!("10-20 1 | s0 AhAc / s0 2h2c $ 040-12 !p4h5h6h7h8h".parse::<Round>().is_err());
    }

    #[test]
    fn parse_num_is_strict() {
        assert_eq!(parse_num::<Chips>("0"), Some(0));
        assert_eq!(parse_num::<Chips>("170"), Some(170));
        for s in ["", "+1", "-1", "01", "00", " 1", "1e3"] {
            assert_eq!(parse_num::<Chips>(s), None, "{s:?}");
        }
    }

    #[test]
    fn malformed_snapshots_fail_closed() {
        for s in [
            "",
            "10-20 1 | d100 / d100 $",
            "10-30 1 | d100 / d100 $!",
            "10-20 3 | d100 / d100 $!",
            "10-20 1 | d100 $!",
            "10-20 1 | @100 / @100 $!",
            "10-20 1 | d100 / d100 $ 30-13 !",
            "10-20 1 | d100 / d100 $!p",
            "10-20 1 | d100 / d100 $!4h5h6h",
            "10-20 1 | d100 / d100 $! shares win-3-10",
        ] {
            assert!(s.parse::<Round>().is_err(), "{s}");
        }
    }

    #[test]
    fn short_big_blind_is_called_by_the_small_blind() {
        let mut r = round("35-70 2 | d5965 / d35 $!");
        r.act("deal AhAc2h2c3h4h5h6h7h").unwrap();
        assert_eq!(r.to_string(), "35-70 2 | p5930 AhAc call-0-35 / a0 2h2c allin-0-0-35 $!p3h4h5h6h7h");
        assert_eq!(r.dests(), Dests::Phase);
    }

    #[test]
    fn short_small_blind_passes_the_action() {
        let mut r = round("10-20 3 | d10 / d180 / d280 $!");
        r.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
        assert_eq!(r.to_string(), "10-20 3 | a0 AhAc allin-0-0-10 / i160 2h2c bb-0-0-20 / @280 3h3c $!p4h5h6h7h8h");
    }

    #[test]
    fn deal_rejects_short_or_repeated_cards() {
        let mut r = round("10-20 1 | d100 / d100 $!");
        assert!(matches!(r.act("deal AhAc2h2c3h4h5h6h"), Err(RoundError::BadDeal(_))));
        assert!(matches!(r.act("deal AhAhAc2h2c3h4h5h6h"), Err(RoundError::BadDeal(_))));
        assert_eq!(r.to_string(), "10-20 1 | d100 / d100 $!");
    }

    #[test]
    fn out_of_turn_and_bad_amounts_leave_round_untouched() {
        let s = "10-20 1 | @100 AhAc / i190 2h2c sb-0-0-10 / i280 3h3c bb-0-0-20 $!p4h5h6h7h8h";
        let mut r = round(s);
        assert!(matches!(r.act("check"), Err(RoundError::NotYourAction { action: "check", .. })));
        assert!(matches!(r.act("phase"), Err(RoundError::NotYourAction { .. })));
        assert!(matches!(r.act("call 10"), Err(RoundError::IllegalAmount { action: "call", .. })));
        assert!(matches!(r.act("raise 20-10"), Err(RoundError::IllegalAmount { action: "raise", .. })));
        assert!(matches!(r.act("raise 10-20"), Err(RoundError::IllegalAmount { action: "raise", .. })));
        assert!(matches!(r.act("bet 20"), Err(RoundError::UnknownCommand(_))));
        assert_eq!(r.to_string(), s);
    }

    #[test]
    fn raise_events() {
        let mut r = round("10-20 1 | d100 / d200 / d300 $!");
        r.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
        let ev = r.act("raise 20-20").unwrap();
        assert_eq!(log(&ev), ["a 1 raise-0-20-20", "s 1 40", "c 1 i", "c 2 @"]);
        assert_eq!(ev.time_left(), Some(13_000));
    }

    #[test]
    fn call_for_more_than_the_stack_goes_all_in() {
        let mut r = round("10-20 2 | a0 5h6d allin-10-10-2960 / @3000 bb-0-0-20 $!");
        assert_eq!(r.dests().to_string(), "call-2960 fold");
        let mut short = round("10-20 1 | @50 AhAc call-0-20 / i160 2h2c raise-10-60-60 $!4h5h6h7h8h");
        assert_eq!(short.dests().to_string(), "raise-110-60x50-0 fold");
        short.act("call 50").unwrap();
        assert_eq!(short.to_string(), "10-20 1 | a0 AhAc allin-20-50-0 / p160 2h2c raise-10-60-60 $!4h5h6h7h8h");
        r.act("call 2960").unwrap();
        assert_eq!(r.dests(), Dests::Phase);
    }

    #[test]
    fn pov_hides_other_hands() {
        let r = round("10-20 1 | @100 AhAc / i190 2h2c sb-0-0-10 / i280 3h3c bb-0-0-20 $!p4h5h6h7h8h");
        assert_eq!(r.pov(1).unwrap().to_string(), "10-20 1 | @100 AhAc / i190 sb-0-0-10 / i280 bb-0-0-20 $!");
        assert_eq!(r.pov(2).unwrap().to_string(), "10-20 3 | i190 2h2c sb-0-0-10 / i280 bb-0-0-20 / @100 $!");
        assert_eq!(r.pov(4), Err(RoundError::NoSuchSeat(4)));
    }

    #[test]
    fn share_checks_expected_credits() {
        let s = "10-20 1 | f60 AhAc / f190 2h2c / w280 3h3c $ 30-3 !p4h5h6h7h8h shares win-3-30";
        let mut r = round(s);
        assert!(matches!(r.act("share 0-0-20"), Err(RoundError::IllegalAmount { action: "share", .. })));
        assert_eq!(r.to_string(), s);
        r.act("share 0-0-30").unwrap();
        assert_eq!(r.to_string(), "10-20 1 | x60 / x190 / x310 $!");
        assert_eq!(r.dests(), Dests::Fin);
    }
}
