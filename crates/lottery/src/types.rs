//! Core types for the surplus lottery

use serde::{Deserialize, Serialize};

/// Participant identity (account address)
pub type PlayerId = [u8; 32];

/// Token amount in base units (18 decimals)
pub type Amount = u128;

/// Game identifier, assigned from a global counter starting at 0
pub type GameIndex = u64;

/// Ticket number within one game
pub type TicketNumber = u128;

/// Position of a purchase in its game's ledger
pub type PurchaseIndex = usize;

/// Base units per whole token
pub const TOKEN_UNIT: Amount = 1_000_000_000_000_000_000;

/// One purchase: an inclusive, contiguous range of tickets owned by a buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub owner: PlayerId,
    pub ticket_start: TicketNumber,
    pub ticket_end: TicketNumber,
}

impl Purchase {
    pub fn contains(&self, ticket: TicketNumber) -> bool {
        self.ticket_start <= ticket && ticket <= self.ticket_end
    }

    pub fn tickets(&self) -> TicketNumber {
        self.ticket_end - self.ticket_start + 1
    }
}

/// Lifecycle of a created game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting purchases
    Ongoing,
    /// Winners drawn, no further purchases
    Ended,
}

/// Result of a successful ticket purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub game: GameIndex,
    pub purchase_index: PurchaseIndex,
    pub ticket_start: TicketNumber,
    pub ticket_end: TicketNumber,
    pub tickets: TicketNumber,
    /// Amount moved to the treasury (`tickets * ticket_price`)
    pub charged: Amount,
}

/// Read-only view of a game for hosts and audits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: GameIndex,
    pub status: GameStatus,
    pub prizes: Vec<Amount>,
    pub winners_extracted: bool,
    pub winning_tickets: Vec<TicketNumber>,
    pub redeemed: Vec<bool>,
    pub winners: Vec<Option<PlayerId>>,
    pub issued_tickets: TicketNumber,
    pub purchases: Vec<Purchase>,
}

impl GameSnapshot {
    /// Sum of all prizes on offer
    pub fn prize_pool(&self) -> Amount {
        self.prizes.iter().fold(0u128, |acc, p| acc.saturating_add(*p))
    }
}
