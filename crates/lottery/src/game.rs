//! Per-game state machine
//!
//! A game is `Ongoing` from creation until its winners are extracted, after
//! which it is `Ended` for good. Each prize rank then moves independently
//! and irreversibly from unredeemed to redeemed.
//!
//! Guards are checked before any field is touched, so a failing operation
//! leaves the game exactly as it was.

use crate::errors::{LotteryError, Result};
use crate::ledger::TicketLedger;
use crate::types::{
    Amount, GameIndex, GameSnapshot, GameStatus, PlayerId, Purchase, PurchaseIndex, TicketNumber,
};

#[derive(Debug, Clone)]
pub struct GameState {
    index: GameIndex,
    prizes: Vec<Amount>,
    ongoing: bool,
    winners_extracted: bool,
    winning_tickets: Vec<TicketNumber>,
    redeemed: Vec<bool>,
    winners: Vec<Option<PlayerId>>,
    ledger: TicketLedger,
}

/// Prize schedules must be non-empty, positive, and ordered largest first.
pub fn validate_prizes(prizes: &[Amount], max_ranks: usize) -> Result<()> {
    if prizes.is_empty() {
        return Err(LotteryError::InvalidPrizeSchedule("no prizes"));
    }
    if prizes.len() > max_ranks {
        return Err(LotteryError::InvalidPrizeSchedule("too many prize ranks"));
    }
    if prizes.iter().any(|p| *p == 0) {
        return Err(LotteryError::InvalidPrizeSchedule("zero prize"));
    }
    if prizes.windows(2).any(|pair| pair[0] < pair[1]) {
        return Err(LotteryError::InvalidPrizeSchedule(
            "prizes must not increase with rank",
        ));
    }
    Ok(())
}

impl GameState {
    pub fn new(index: GameIndex, prizes: Vec<Amount>, max_ranks: usize) -> Result<Self> {
        validate_prizes(&prizes, max_ranks)?;
        let ranks = prizes.len();
        Ok(Self {
            index,
            prizes,
            ongoing: true,
            winners_extracted: false,
            winning_tickets: Vec::new(),
            redeemed: vec![false; ranks],
            winners: vec![None; ranks],
            ledger: TicketLedger::new(),
        })
    }

    pub fn index(&self) -> GameIndex {
        self.index
    }

    pub fn status(&self) -> GameStatus {
        if self.ongoing {
            GameStatus::Ongoing
        } else {
            GameStatus::Ended
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.ongoing
    }

    pub fn winners_extracted(&self) -> bool {
        self.winners_extracted
    }

    pub fn prizes(&self) -> &[Amount] {
        &self.prizes
    }

    pub fn winning_tickets(&self) -> &[TicketNumber] {
        &self.winning_tickets
    }

    pub fn redeemed(&self) -> &[bool] {
        &self.redeemed
    }

    pub fn winners(&self) -> &[Option<PlayerId>] {
        &self.winners
    }

    pub fn ledger(&self) -> &TicketLedger {
        &self.ledger
    }

    pub fn ensure_ongoing(&self) -> Result<()> {
        if !self.ongoing {
            return Err(LotteryError::NoActiveGame(self.index));
        }
        Ok(())
    }

    pub(crate) fn record_purchase(
        &mut self,
        owner: PlayerId,
        tickets: TicketNumber,
    ) -> Result<(PurchaseIndex, TicketNumber, TicketNumber)> {
        self.ensure_ongoing()?;
        Ok(self.ledger.append(owner, tickets)?)
    }

    /// Upper bound (exclusive) for the draw, once the game may be closed.
    pub fn ensure_extractable(&self) -> Result<TicketNumber> {
        if self.winners_extracted {
            return Err(LotteryError::AlreadyExtracted(self.index));
        }
        let issued = self.ledger.issued_tickets();
        if issued == 0 {
            return Err(LotteryError::NoTicketsIssued(self.index));
        }
        Ok(issued)
    }

    /// Store the drawn tickets in ascending order and end the game.
    /// Rank `i` is won by the `i`-th smallest ticket.
    pub(crate) fn close_with_winners(
        &mut self,
        mut draw: Vec<TicketNumber>,
    ) -> Result<&[TicketNumber]> {
        let issued = self.ensure_extractable()?;
        if draw.len() != self.prizes.len() {
            return Err(LotteryError::InvalidDraw(format!(
                "expected {} tickets, got {}",
                self.prizes.len(),
                draw.len()
            )));
        }
        if let Some(ticket) = draw.iter().find(|t| **t >= issued) {
            return Err(LotteryError::InvalidDraw(format!(
                "ticket {ticket} outside [0, {issued})"
            )));
        }

        draw.sort_unstable();
        self.winning_tickets = draw;
        self.winners_extracted = true;
        self.ongoing = false;
        Ok(&self.winning_tickets)
    }

    /// Prize owed to `caller` for `rank` through `purchase_index`.
    ///
    /// A caller that does not own the purchase, a purchase that does not
    /// hold the winning ticket and a purchase index that was never recorded
    /// all fail identically.
    pub fn check_redemption(
        &self,
        caller: &PlayerId,
        rank: usize,
        purchase_index: PurchaseIndex,
    ) -> Result<Amount> {
        if !self.winners_extracted {
            return Err(LotteryError::NotYetExtracted(self.index));
        }
        let winning_ticket = *self
            .winning_tickets
            .get(rank)
            .ok_or(LotteryError::RankNotFound {
                rank,
                ranks: self.winning_tickets.len(),
            })?;

        let purchase: &Purchase = self
            .ledger
            .purchase(purchase_index)
            .map_err(|_| LotteryError::PurchaseMismatch)?;
        if purchase.owner != *caller || !purchase.contains(winning_ticket) {
            return Err(LotteryError::PurchaseMismatch);
        }
        if self.redeemed[rank] {
            return Err(LotteryError::AlreadyRedeemed(rank));
        }
        Ok(self.prizes[rank])
    }

    pub(crate) fn mark_redeemed(&mut self, rank: usize, winner: PlayerId) {
        self.redeemed[rank] = true;
        self.winners[rank] = Some(winner);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game: self.index,
            status: self.status(),
            prizes: self.prizes.clone(),
            winners_extracted: self.winners_extracted,
            winning_tickets: self.winning_tickets.clone(),
            redeemed: self.redeemed.clone(),
            winners: self.winners.clone(),
            issued_tickets: self.ledger.issued_tickets(),
            purchases: self.ledger.purchases().to_vec(),
        }
    }
}
