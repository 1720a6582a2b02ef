//! Collaborator interfaces consumed by the lottery engine
//!
//! Governance, token transfers and randomness live outside the lottery.
//! Their faults are opaque `anyhow` errors that the engine carries back
//! to the caller unchanged.
//!
//! In-memory implementations are provided for hosts and deterministic tests.

use crate::types::{Amount, PlayerId, TicketNumber};
use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Macro-economic phase reported by governance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Era {
    Expansion,
    Contraction,
}

/// Governance and treasury.
pub trait Dao: Send + Sync {
    /// Whether `caller` may start games.
    fn is_authorized_caller(&self, caller: &PlayerId) -> bool;

    fn current_era(&self) -> Era;

    /// Epochs elapsed since the current era began.
    fn epochs_in_current_era(&self) -> u64;

    /// Account that receives ticket proceeds.
    fn treasury(&self) -> PlayerId;

    /// Draw `amount` from the treasury to `recipient`.
    fn request_payout(&self, recipient: &PlayerId, amount: Amount) -> Result<()>;
}

/// Value transfer between accounts.
pub trait Token: Send + Sync {
    fn transfer_from(&self, payer: &PlayerId, payee: &PlayerId, amount: Amount) -> Result<()>;
}

/// Source of winning ticket numbers.
pub trait Randomness: Send + Sync {
    /// `count` numbers, each in `[0, upper)`.
    fn draw(&self, count: usize, upper: TicketNumber) -> Result<Vec<TicketNumber>>;
}

// -----------------------------------------------------------------------------
// In-memory governance
// -----------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("treasury exhausted: requested {requested}, available {available}")]
    Exhausted { requested: Amount, available: Amount },
}

#[derive(Debug)]
struct DaoState {
    era: Era,
    epochs: u64,
    treasury_balance: Option<Amount>,
    payouts: Vec<(PlayerId, Amount)>,
}

/// Governance whose era and epoch count are set by the host.
///
/// Payout requests are recorded in order. With a treasury limit set,
/// requests beyond the remaining balance fail with [`TreasuryError`].
#[derive(Debug)]
pub struct SettableDao {
    dao_id: PlayerId,
    treasury: PlayerId,
    state: Mutex<DaoState>,
}

impl SettableDao {
    pub fn new(dao_id: PlayerId, treasury: PlayerId) -> Self {
        Self {
            dao_id,
            treasury,
            state: Mutex::new(DaoState {
                era: Era::Contraction,
                epochs: 0,
                treasury_balance: None,
                payouts: Vec::new(),
            }),
        }
    }

    pub fn dao_id(&self) -> PlayerId {
        self.dao_id
    }

    pub fn set_era(&self, era: Era, epochs: u64) {
        let mut state = self.state.lock();
        state.era = era;
        state.epochs = epochs;
    }

    pub fn advance_epoch(&self) {
        let mut state = self.state.lock();
        state.epochs = state.epochs.saturating_add(1);
    }

    /// Cap the treasury at `balance`; unset means unlimited.
    pub fn set_treasury_balance(&self, balance: Option<Amount>) {
        self.state.lock().treasury_balance = balance;
    }

    pub fn payout_requests(&self) -> Vec<(PlayerId, Amount)> {
        self.state.lock().payouts.clone()
    }

    pub fn last_payout_request(&self) -> Option<(PlayerId, Amount)> {
        self.state.lock().payouts.last().copied()
    }
}

impl Dao for SettableDao {
    fn is_authorized_caller(&self, caller: &PlayerId) -> bool {
        *caller == self.dao_id
    }

    fn current_era(&self) -> Era {
        self.state.lock().era
    }

    fn epochs_in_current_era(&self) -> u64 {
        self.state.lock().epochs
    }

    fn treasury(&self) -> PlayerId {
        self.treasury
    }

    fn request_payout(&self, recipient: &PlayerId, amount: Amount) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(available) = state.treasury_balance {
            if amount > available {
                return Err(TreasuryError::Exhausted {
                    requested: amount,
                    available,
                }
                .into());
            }
            state.treasury_balance = Some(available - amount);
        }
        state.payouts.push((*recipient, amount));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// In-memory token
// -----------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },
}

/// Balance map with no allowances; every payer may be debited directly.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    balances: Mutex<HashMap<PlayerId, Amount>>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&self, account: PlayerId, amount: Amount) {
        let mut balances = self.balances.lock();
        let balance = balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, account: &PlayerId) -> Amount {
        self.balances.lock().get(account).copied().unwrap_or(0)
    }
}

impl Token for InMemoryToken {
    fn transfer_from(&self, payer: &PlayerId, payee: &PlayerId, amount: Amount) -> Result<()> {
        let mut balances = self.balances.lock();
        let available = balances.get(payer).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            }
            .into());
        }
        balances.insert(*payer, available - amount);
        let credited = balances.entry(*payee).or_insert(0);
        *credited = credited.saturating_add(amount);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Fixed randomness
// -----------------------------------------------------------------------------

/// Returns the same preset tickets on every draw, whatever is asked for.
#[derive(Debug, Clone, Default)]
pub struct FixedRandomness {
    tickets: Vec<TicketNumber>,
}

impl FixedRandomness {
    pub fn new(tickets: Vec<TicketNumber>) -> Self {
        Self { tickets }
    }
}

impl Randomness for FixedRandomness {
    fn draw(&self, _count: usize, _upper: TicketNumber) -> Result<Vec<TicketNumber>> {
        Ok(self.tickets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAO: PlayerId = [1u8; 32];
    const TREASURY: PlayerId = [2u8; 32];
    const ALICE: PlayerId = [3u8; 32];

    #[test]
    fn dao_authorizes_only_itself() {
        let dao = SettableDao::new(DAO, TREASURY);
        assert!(dao.is_authorized_caller(&DAO));
        assert!(!dao.is_authorized_caller(&ALICE));
        assert!(dao.is_authorized_caller(&dao.dao_id()));
        assert_eq!(dao.dao_id(), DAO);
        assert_eq!(dao.treasury(), TREASURY);
    }

    #[test]
    fn dao_era_is_settable() {
        let dao = SettableDao::new(DAO, TREASURY);
        assert_eq!(dao.current_era(), Era::Contraction);
        dao.set_era(Era::Expansion, 2);
        dao.advance_epoch();
        assert_eq!(dao.current_era(), Era::Expansion);
        assert_eq!(dao.epochs_in_current_era(), 3);
    }

    #[test]
    fn limited_treasury_rejects_overdraw() {
        let dao = SettableDao::new(DAO, TREASURY);
        dao.set_treasury_balance(Some(100));
        assert_eq!(dao.last_payout_request(), None);
        dao.request_payout(&ALICE, 60).unwrap();
        let err = dao.request_payout(&ALICE, 60).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TreasuryError>(),
            Some(&TreasuryError::Exhausted {
                requested: 60,
                available: 40
            })
        );
        assert_eq!(dao.payout_requests(), vec![(ALICE, 60)]);
        assert_eq!(dao.last_payout_request(), Some((ALICE, 60)));
    }

    #[test]
    fn token_moves_balances() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 50);
        token.transfer_from(&ALICE, &TREASURY, 30).unwrap();
        assert_eq!(token.balance_of(&ALICE), 20);
        assert_eq!(token.balance_of(&TREASURY), 30);
    }

    #[test]
    fn token_rejects_overdraft_without_moving_funds() {
        let token = InMemoryToken::new();
        token.mint(ALICE, 10);
        let err = token.transfer_from(&ALICE, &TREASURY, 11).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TokenError>(),
            Some(TokenError::InsufficientBalance {
                needed: 11,
                available: 10
            })
        ));
        assert_eq!(token.balance_of(&ALICE), 10);
        assert_eq!(token.balance_of(&TREASURY), 0);
    }
}
