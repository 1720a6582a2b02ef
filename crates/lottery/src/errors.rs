use crate::types::{Amount, GameIndex, PurchaseIndex, TicketNumber};
use thiserror::Error;

/// Faults raised by a game's ticket ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid ticket amount: {0}")]
    InvalidAmount(TicketNumber),

    #[error("cannot issue {requested} more tickets: counter at {issued}")]
    TicketsExhausted {
        requested: TicketNumber,
        issued: TicketNumber,
    },

    #[error("ticket {ticket} not found: {issued} tickets issued")]
    TicketNotFound {
        ticket: TicketNumber,
        issued: TicketNumber,
    },

    #[error("purchase {index} not found: {count} purchases recorded")]
    IndexNotFound {
        index: PurchaseIndex,
        count: usize,
    },
}

/// Faults raised while validating lottery parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("ticket price must be positive")]
    ZeroTicketPrice,

    #[error("at least one prize rank must be allowed")]
    ZeroPrizeRanks,

    #[error("malformed lottery parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Faults raised by lottery operations.
///
/// Collaborator faults (token transfers, treasury payouts, randomness) are
/// carried in [`LotteryError::External`] untouched.
#[derive(Debug, Error)]
pub enum LotteryError {
    #[error("caller is not authorized to start a game")]
    Unauthorized,

    #[error("game {0} is not accepting purchases")]
    NoActiveGame(GameIndex),

    #[error("insufficient purchase amount: {amount} below ticket price {ticket_price}")]
    InsufficientAmount { amount: Amount, ticket_price: Amount },

    #[error("winners can only be extracted after {required} epochs of expansion")]
    NotInExpansion { required: u64 },

    #[error("winners already extracted for game {0}")]
    AlreadyExtracted(GameIndex),

    #[error("winners not yet extracted for game {0}")]
    NotYetExtracted(GameIndex),

    #[error("prize rank {rank} not found: game has {ranks} ranks")]
    RankNotFound { rank: usize, ranks: usize },

    #[error("purchase does not hold the winning ticket")]
    PurchaseMismatch,

    #[error("prize rank {0} already redeemed")]
    AlreadyRedeemed(usize),

    #[error("invalid prize schedule: {0}")]
    InvalidPrizeSchedule(&'static str),

    #[error("game {0} has no tickets to draw from")]
    NoTicketsIssued(GameIndex),

    #[error("randomness returned an unusable draw: {0}")]
    InvalidDraw(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    #[error(transparent)]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LotteryError>;
