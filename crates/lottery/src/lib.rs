//! Daiquilibrium surplus lottery
//!
//! Games are started by governance with a prize schedule, sell tickets in
//! contiguous numbered ranges, draw one winning ticket per prize rank once
//! the protocol has been expanding long enough, and pay each rank to the
//! holder of its winning ticket exactly once.
//!
//! Governance, token transfers and randomness are injected through the
//! traits in [`ports`]; boundary events go to [`EventSink`] observers.

pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod ledger;
pub mod params;
pub mod ports;
pub mod randomness;
pub mod types;

pub use engine::LotteryEngine;
pub use errors::*;
pub use events::{EventSink, LotteryEvent, RecordingEventSink, TracingEventSink};
pub use game::GameState;
pub use ledger::TicketLedger;
pub use params::LotteryParams;
pub use ports::{
    Dao, Era, FixedRandomness, InMemoryToken, Randomness, SettableDao, Token, TokenError,
    TreasuryError,
};
pub use randomness::SeededRandomness;
pub use types::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
