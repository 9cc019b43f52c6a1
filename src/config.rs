//! Table limits and the advisory time bank.

/// Chip amounts everywhere in the crate.
pub type Chips = u64;

/// Seat numbers are single digits in the pot encoding.
pub const MAX_SEATS: usize = 9;
pub const MIN_SEATS: usize = 2;

/// Milliseconds a seat is given to act, growing with each street revealed.
///
/// Nothing in the round enforces it; a table clock reads it from
/// [`Events::time_left`](crate::round::Events::time_left) and drives a fold or
/// check when it runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBank {
    pub base_ms: u64,
    pub flop_bonus_ms: u64,
    pub turn_bonus_ms: u64,
    pub river_bonus_ms: u64,
}

impl Default for TimeBank {
    fn default() -> Self {
        Self { base_ms: 13_000, flop_bonus_ms: 2_000, turn_bonus_ms: 3_000, river_bonus_ms: 4_000 }
    }
}

impl TimeBank {
    pub fn time_left(&self, flop: bool, turn: bool, river: bool) -> u64 {
        let mut ms = self.base_ms;
        if flop {
            ms += self.flop_bonus_ms;
        }
        if turn {
            ms += self.turn_bonus_ms;
        }
        if river {
            ms += self.river_bonus_ms;
        }
        ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bonuses_stack() {
        let tb = TimeBank::default();
        assert_eq!(tb.time_left(false, false, false), 13_000);
        assert_eq!(tb.time_left(true, false, false), 15_000);
        assert_eq!(tb.time_left(true, true, true), 22_000);
    }
}
