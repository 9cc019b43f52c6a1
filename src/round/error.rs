use crate::cards::CardParseError;
use crate::hand::HandError;

/// Malformed snapshot, dests or event text. Decoding never yields a partial value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FenError {
    #[error("missing section `{0}`")]
    Missing(&'static str),
    #[error("invalid blinds: {0}")]
    Blinds(String),
    #[error("invalid button: {0}")]
    Button(String),
    #[error("table must have 2 to 9 seats, got {0}")]
    SeatCount(usize),
    #[error("invalid seat: {0}")]
    Seat(String),
    #[error("unknown seat state: {0}")]
    State(char),
    #[error("invalid bet: {0}")]
    Bet(String),
    #[error("invalid pot: {0}")]
    Pot(String),
    #[error("invalid share: {0}")]
    Share(String),
    #[error("invalid community cards: {0}")]
    Middle(String),
    #[error("invalid dests: {0}")]
    Dests(String),
    #[error("invalid event: {0}")]
    Event(String),
    #[error("more than one seat holds the action")]
    TwoActing,
    #[error(transparent)]
    Card(#[from] CardParseError),
    #[error(transparent)]
    Hand(#[from] HandError),
}

/// Rejected action. The round is left untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("`{action}` is not a legal action now (dests: {dests})")]
    NotYourAction { action: &'static str, dests: String },
    #[error("illegal amount for `{action}`: {detail}")]
    IllegalAmount { action: &'static str, detail: String },
    #[error("bad deal: {0}")]
    BadDeal(String),
    #[error("round state cannot run this action: {0}")]
    Inconsistent(&'static str),
    #[error("table must have 2 to 9 seats, got {0}")]
    SeatCount(usize),
    #[error("no seat {0} at this table")]
    NoSuchSeat(usize),
}

impl RoundError {
    pub(crate) fn amount(action: &'static str, detail: impl Into<String>) -> Self {
        RoundError::IllegalAmount { action, detail: detail.into() }
    }
}
