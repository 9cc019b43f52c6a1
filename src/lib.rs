//! poker-round: betting-round rules engine and hand evaluator
//!
//! Goals:
//! - Exact chip accounting through blinds, all-ins and layered side pots
//! - A single-line snapshot text that decodes back to the same round
//! - Per-seat event streams that never leak hidden hole cards
//! - Fast perfect-hash evaluation of 5, 6 and 7 card hands
//!
//! ## Quick start: play a hand to the flop
//! ```
//! use poker_round::round::{Dests, Round};
//!
//! let mut round = Round::new(10, 1, &[100, 200, 300]).unwrap();
//! round.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
//! round.act("call 20").unwrap();
//! round.act("call 10").unwrap();
//! round.act("check").unwrap();
//! assert_eq!(round.dests(), Dests::Phase);
//!
//! let events = round.act("phase").unwrap();
//! assert_eq!(round.to_string(), "10-20 1 | i80 AhAc / i180 2h2c / @280 3h3c $ 60-123 !f4h5h6h7h8h");
//! assert_eq!(round.pov(2).unwrap().to_string(), "10-20 3 | i180 2h2c / @280 / i80 $ 60-123 !4h5h6h");
//! assert_eq!(events.time_left(), Some(15_000));
//! ```
//!
//! ## Quick start: rank a hand
//! ```
//! use poker_round::evaluator::{classify, evaluate_str, Category};
//!
//! let rank = evaluate_str("KcKh2s9h3d6c7d").unwrap();
//! let class = classify(rank);
//! assert_eq!(class.category, Category::Pair);
//! assert_eq!(class.short_desc(), "pair K976");
//! ```
//!
//! ## Driver
//! Feed commands to a table from stdin with:
//! ```sh
//! cargo run --bin poker-round -- --blind 10 --stacks 100,200,300
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod hand;
pub mod round;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
