//! Lottery engine: game table and operation orchestration
//!
//! Owns every game by index and drives the collaborators around the
//! per-game state machine:
//! - `new_game` is reserved to governance
//! - `purchase_tickets` charges whole tickets only and records the range
//! - `extract_winner` is gated on the expansion era and ends the game
//! - `redeem_reward` pays each prize rank at most once
//!
//! ## Key Invariants
//! - Operations on one game are serialised by that game's mutex
//! - A failing operation leaves every game untouched
//! - Collaborator faults surface as `LotteryError::External` unchanged
//! - Observers run after the game lock is released

use crate::errors::{LotteryError, Result};
use crate::events::{EventSink, LotteryEvent, TracingEventSink};
use crate::game::GameState;
use crate::params::LotteryParams;
use crate::ports::{Dao, Era, Randomness, Token};
use crate::types::{
    Amount, GameIndex, GameSnapshot, PlayerId, Purchase, PurchaseIndex, PurchaseReceipt,
    TicketNumber,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

type GameHandle = Arc<Mutex<GameState>>;

pub struct LotteryEngine {
    params: LotteryParams,
    games: RwLock<Vec<GameHandle>>,
    dao: Arc<dyn Dao>,
    token: Arc<dyn Token>,
    randomness: Arc<dyn Randomness>,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl LotteryEngine {
    /// Create an engine with no games. Events are logged through
    /// [`TracingEventSink`] until more sinks are subscribed.
    pub fn new(
        params: LotteryParams,
        dao: Arc<dyn Dao>,
        token: Arc<dyn Token>,
        randomness: Arc<dyn Randomness>,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            games: RwLock::new(Vec::new()),
            dao,
            token,
            randomness,
            sinks: RwLock::new(vec![Arc::new(TracingEventSink)]),
        })
    }

    pub fn params(&self) -> &LotteryParams {
        &self.params
    }

    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Start a game offering `prizes` (rank 0 first). Governance only.
    pub fn new_game(&self, caller: &PlayerId, prizes: Vec<Amount>) -> Result<GameIndex> {
        if !self.dao.is_authorized_caller(caller) {
            warn!(target: "lottery", "rejected game start from unauthorized caller");
            return Err(LotteryError::Unauthorized);
        }

        let index = {
            let mut games = self.games.write();
            let index = games.len() as GameIndex;
            let game = GameState::new(index, prizes.clone(), self.params.max_prize_ranks)?;
            games.push(Arc::new(Mutex::new(game)));
            index
        };

        self.emit(LotteryEvent::GameStarted {
            game: index,
            prizes,
        });
        Ok(index)
    }

    /// Buy `amount / ticket_price` tickets in `game`. Only the whole-ticket
    /// part of `amount` is transferred to the treasury.
    pub fn purchase_tickets(
        &self,
        caller: &PlayerId,
        game: GameIndex,
        amount: Amount,
    ) -> Result<PurchaseReceipt> {
        let handle = self.game(game).ok_or(LotteryError::NoActiveGame(game))?;

        let receipt = {
            let mut state = handle.lock();
            state.ensure_ongoing()?;

            let (tickets, charged) = self.params.tickets_for(amount);
            if tickets == 0 {
                return Err(LotteryError::InsufficientAmount {
                    amount,
                    ticket_price: self.params.ticket_price,
                });
            }
            // The range must fit before any funds move.
            state.ledger().next_range(tickets)?;

            self.token
                .transfer_from(caller, &self.dao.treasury(), charged)?;
            let (purchase_index, ticket_start, ticket_end) =
                state.record_purchase(*caller, tickets)?;

            PurchaseReceipt {
                game,
                purchase_index,
                ticket_start,
                ticket_end,
                tickets,
                charged,
            }
        };

        debug!(
            target: "lottery",
            game,
            purchase_index = receipt.purchase_index,
            tickets = %receipt.tickets,
            charged = %receipt.charged,
            "purchase recorded"
        );
        self.emit(LotteryEvent::TicketsPurchased {
            buyer: *caller,
            game,
            purchase_index: receipt.purchase_index,
            ticket_start: receipt.ticket_start,
            ticket_end: receipt.ticket_end,
        });
        Ok(receipt)
    }

    /// Draw one winning ticket per prize rank and end `game`.
    /// Returns the winning tickets in ascending order.
    pub fn extract_winner(&self, game: GameIndex) -> Result<Vec<TicketNumber>> {
        let required = self.params.min_expansion_epochs;
        if self.dao.current_era() != Era::Expansion
            || self.dao.epochs_in_current_era() < required
        {
            return Err(LotteryError::NotInExpansion { required });
        }

        let handle = self.game(game).ok_or(LotteryError::NoActiveGame(game))?;

        let tickets = {
            let mut state = handle.lock();
            let issued = state.ensure_extractable()?;
            let draw = self.randomness.draw(state.prizes().len(), issued)?;
            state.close_with_winners(draw)?.to_vec()
        };

        info!(target: "lottery", game, winners = tickets.len(), "winners extracted");
        self.emit(LotteryEvent::GameEnded { game });
        self.emit(LotteryEvent::WinningTicketsDrawn {
            game,
            tickets: tickets.clone(),
        });
        Ok(tickets)
    }

    /// Claim the prize for `rank` with the purchase holding its winning
    /// ticket. Returns the amount paid out.
    pub fn redeem_reward(
        &self,
        caller: &PlayerId,
        game: GameIndex,
        rank: usize,
        purchase_index: PurchaseIndex,
    ) -> Result<Amount> {
        let handle = self.game(game).ok_or(LotteryError::NotYetExtracted(game))?;

        let reward = {
            let mut state = handle.lock();
            let reward = state
                .check_redemption(caller, rank, purchase_index)
                .map_err(|err| {
                    if matches!(err, LotteryError::PurchaseMismatch) {
                        warn!(
                            target: "lottery",
                            game,
                            rank,
                            purchase_index,
                            "redemption does not match the winning purchase"
                        );
                    }
                    err
                })?;
            self.dao.request_payout(caller, reward)?;
            state.mark_redeemed(rank, *caller);
            reward
        };

        self.emit(LotteryEvent::RewardRedeemed {
            recipient: *caller,
            game,
            reward,
        });
        Ok(reward)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Number of games ever started
    pub fn game_count(&self) -> u64 {
        self.games.read().len() as u64
    }

    /// Index of the most recently started game
    pub fn current_game_index(&self) -> Option<GameIndex> {
        self.game_count().checked_sub(1)
    }

    pub fn is_ongoing(&self, game: GameIndex) -> Result<bool> {
        self.with_game(game, GameState::is_ongoing)
    }

    pub fn prizes(&self, game: GameIndex) -> Result<Vec<Amount>> {
        self.with_game(game, |state| state.prizes().to_vec())
    }

    pub fn issued_tickets(&self, game: GameIndex) -> Result<TicketNumber> {
        self.with_game(game, |state| state.ledger().issued_tickets())
    }

    pub fn total_purchases(&self, game: GameIndex) -> Result<usize> {
        self.with_game(game, |state| state.ledger().purchase_count())
    }

    pub fn player_purchase_indexes(
        &self,
        game: GameIndex,
        player: &PlayerId,
    ) -> Result<Vec<PurchaseIndex>> {
        self.with_game(game, |state| state.ledger().purchases_of(player).to_vec())
    }

    pub fn purchase(&self, game: GameIndex, index: PurchaseIndex) -> Result<Purchase> {
        self.with_game(game, |state| state.ledger().purchase(index).copied())?
            .map_err(LotteryError::from)
    }

    /// Purchase holding `ticket` in `game`
    pub fn ticket_owner(&self, game: GameIndex, ticket: TicketNumber) -> Result<PurchaseIndex> {
        self.with_game(game, |state| state.ledger().owner_of(ticket))?
            .map_err(LotteryError::from)
    }

    pub fn winners_extracted(&self, game: GameIndex) -> Result<bool> {
        self.with_game(game, GameState::winners_extracted)
    }

    pub fn winning_tickets(&self, game: GameIndex) -> Result<Vec<TicketNumber>> {
        self.with_game(game, |state| state.winning_tickets().to_vec())
    }

    /// Redeemer of each rank, `None` while unredeemed
    pub fn winners(&self, game: GameIndex) -> Result<Vec<Option<PlayerId>>> {
        self.with_game(game, |state| state.winners().to_vec())
    }

    pub fn redeemed_prizes(&self, game: GameIndex) -> Result<Vec<bool>> {
        self.with_game(game, |state| state.redeemed().to_vec())
    }

    pub fn snapshot(&self, game: GameIndex) -> Result<GameSnapshot> {
        self.with_game(game, GameState::snapshot)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn game(&self, game: GameIndex) -> Option<GameHandle> {
        let index = usize::try_from(game).ok()?;
        self.games.read().get(index).cloned()
    }

    fn with_game<T>(&self, game: GameIndex, f: impl FnOnce(&GameState) -> T) -> Result<T> {
        let handle = self.game(game).ok_or(LotteryError::NoActiveGame(game))?;
        let state = handle.lock();
        Ok(f(&state))
    }

    fn emit(&self, event: LotteryEvent) {
        let sinks = self.sinks.read().clone();
        for sink in sinks {
            sink.emit(&event);
        }
    }
}

impl std::fmt::Debug for LotteryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LotteryEngine")
            .field("params", &self.params)
            .field("games", &self.games.read().len())
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}
