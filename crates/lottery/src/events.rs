//! Boundary events
//!
//! Observers are fire-and-forget: the engine never inspects what a sink
//! does with an event, and sinks cannot fail an operation.

use crate::types::{Amount, GameIndex, PlayerId, PurchaseIndex, TicketNumber};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LotteryEvent {
    GameStarted {
        game: GameIndex,
        prizes: Vec<Amount>,
    },
    TicketsPurchased {
        buyer: PlayerId,
        game: GameIndex,
        purchase_index: PurchaseIndex,
        ticket_start: TicketNumber,
        ticket_end: TicketNumber,
    },
    GameEnded {
        game: GameIndex,
    },
    WinningTicketsDrawn {
        game: GameIndex,
        tickets: Vec<TicketNumber>,
    },
    RewardRedeemed {
        recipient: PlayerId,
        game: GameIndex,
        reward: Amount,
    },
}

impl LotteryEvent {
    pub fn game(&self) -> GameIndex {
        match self {
            LotteryEvent::GameStarted { game, .. }
            | LotteryEvent::TicketsPurchased { game, .. }
            | LotteryEvent::GameEnded { game }
            | LotteryEvent::WinningTicketsDrawn { game, .. }
            | LotteryEvent::RewardRedeemed { game, .. } => *game,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &LotteryEvent);
}

/// Logs every event at info level under the `lottery` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &LotteryEvent) {
        match event {
            LotteryEvent::GameStarted { game, prizes } => {
                info!(target: "lottery", game, ranks = prizes.len(), "game started");
            }
            LotteryEvent::TicketsPurchased {
                game,
                purchase_index,
                ticket_start,
                ticket_end,
                ..
            } => {
                info!(
                    target: "lottery",
                    game,
                    purchase_index,
                    ticket_start = %ticket_start,
                    ticket_end = %ticket_end,
                    "tickets purchased"
                );
            }
            LotteryEvent::GameEnded { game } => {
                info!(target: "lottery", game, "game ended");
            }
            LotteryEvent::WinningTicketsDrawn { game, tickets } => {
                info!(target: "lottery", game, tickets = ?tickets, "winning tickets drawn");
            }
            LotteryEvent::RewardRedeemed { game, reward, .. } => {
                info!(target: "lottery", game, reward = %reward, "reward redeemed");
            }
        }
    }
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<LotteryEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LotteryEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &LotteryEvent) {
        self.events.lock().push(event.clone());
    }
}
