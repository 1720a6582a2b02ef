//! Ticket Ledger
//!
//! Append-only record of a game's purchases. Tickets are numbered from a
//! running counter, so purchase ranges partition `[0, issued_tickets)` in
//! purchase order with no gaps or overlaps:
//!
//! `purchase(i).ticket_end + 1 == purchase(i + 1).ticket_start`
//!
//! Because the ranges are sorted by construction, the owner of any ticket
//! is found with a binary search over the purchases.

use crate::errors::LedgerError;
use crate::types::{PlayerId, Purchase, PurchaseIndex, TicketNumber};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct TicketLedger {
    purchases: Vec<Purchase>,
    by_player: HashMap<PlayerId, Vec<PurchaseIndex>>,
    issued_tickets: TicketNumber,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Range the next `count` tickets would occupy, without recording them.
    pub fn next_range(
        &self,
        count: TicketNumber,
    ) -> Result<(TicketNumber, TicketNumber), LedgerError> {
        if count == 0 {
            return Err(LedgerError::InvalidAmount(count));
        }
        let start = self.issued_tickets;
        let end = start
            .checked_add(count - 1)
            .filter(|end| *end < TicketNumber::MAX)
            .ok_or(LedgerError::TicketsExhausted {
                requested: count,
                issued: start,
            })?;
        Ok((start, end))
    }

    /// Record `count` tickets for `owner`, returning the purchase index and
    /// its inclusive ticket range.
    pub fn append(
        &mut self,
        owner: PlayerId,
        count: TicketNumber,
    ) -> Result<(PurchaseIndex, TicketNumber, TicketNumber), LedgerError> {
        let (ticket_start, ticket_end) = self.next_range(count)?;
        let index = self.purchases.len();

        self.purchases.push(Purchase {
            owner,
            ticket_start,
            ticket_end,
        });
        self.by_player.entry(owner).or_default().push(index);
        self.issued_tickets = ticket_end + 1;

        Ok((index, ticket_start, ticket_end))
    }

    /// Index of the purchase holding `ticket`.
    pub fn owner_of(&self, ticket: TicketNumber) -> Result<PurchaseIndex, LedgerError> {
        if ticket >= self.issued_tickets {
            return Err(LedgerError::TicketNotFound {
                ticket,
                issued: self.issued_tickets,
            });
        }
        // First purchase whose range ends at or after the ticket.
        Ok(self.purchases.partition_point(|p| p.ticket_end < ticket))
    }

    pub fn issued_tickets(&self) -> TicketNumber {
        self.issued_tickets
    }

    pub fn purchase_count(&self) -> usize {
        self.purchases.len()
    }

    /// A player's purchase indexes, in insertion order.
    pub fn purchases_of(&self, owner: &PlayerId) -> &[PurchaseIndex] {
        self.by_player
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn purchase(&self, index: PurchaseIndex) -> Result<&Purchase, LedgerError> {
        self.purchases.get(index).ok_or(LedgerError::IndexNotFound {
            index,
            count: self.purchases.len(),
        })
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(n: u8) -> PlayerId {
        let mut id = [0u8; 32];
        id[0] = n;
        id
    }

    #[test]
    fn empty_ledger() {
        let ledger = TicketLedger::new();
        assert_eq!(ledger.issued_tickets(), 0);
        assert_eq!(ledger.purchase_count(), 0);
        assert!(ledger.purchases_of(&player(1)).is_empty());
        assert!(matches!(
            ledger.owner_of(0),
            Err(LedgerError::TicketNotFound { ticket: 0, issued: 0 })
        ));
    }

    #[test]
    fn append_assigns_contiguous_ranges() {
        let mut ledger = TicketLedger::new();
        assert_eq!(ledger.append(player(1), 10).unwrap(), (0, 0, 9));
        assert_eq!(ledger.append(player(2), 10).unwrap(), (1, 10, 19));
        assert_eq!(ledger.append(player(1), 10).unwrap(), (2, 20, 29));

        assert_eq!(ledger.issued_tickets(), 30);
        assert_eq!(ledger.purchase_count(), 3);
        assert_eq!(ledger.purchases_of(&player(1)), &[0, 2]);
        assert_eq!(ledger.purchases_of(&player(2)), &[1]);

        let purchase = ledger.purchase(1).unwrap();
        assert_eq!(purchase.owner, player(2));
        assert_eq!((purchase.ticket_start, purchase.ticket_end), (10, 19));
    }

    #[test]
    fn zero_count_rejected() {
        let mut ledger = TicketLedger::new();
        assert_eq!(ledger.append(player(1), 0), Err(LedgerError::InvalidAmount(0)));
        assert_eq!(ledger.purchase_count(), 0);
    }

    #[test]
    fn counter_overflow_rejected() {
        let mut ledger = TicketLedger::new();
        ledger.append(player(1), TicketNumber::MAX).unwrap();
        assert_eq!(
            ledger.append(player(2), 1),
            Err(LedgerError::TicketsExhausted {
                requested: 1,
                issued: TicketNumber::MAX,
            })
        );
        assert_eq!(ledger.issued_tickets(), TicketNumber::MAX);
        assert_eq!(ledger.purchase_count(), 1);
    }

    #[test]
    fn owner_lookup_hits_range_boundaries() {
        let mut ledger = TicketLedger::new();
        ledger.append(player(1), 1).unwrap();
        ledger.append(player(2), 5).unwrap();
        ledger.append(player(3), 2).unwrap();

        assert_eq!(ledger.owner_of(0).unwrap(), 0);
        assert_eq!(ledger.owner_of(1).unwrap(), 1);
        assert_eq!(ledger.owner_of(5).unwrap(), 1);
        assert_eq!(ledger.owner_of(6).unwrap(), 2);
        assert_eq!(ledger.owner_of(7).unwrap(), 2);
        assert!(matches!(
            ledger.owner_of(8),
            Err(LedgerError::TicketNotFound { ticket: 8, issued: 8 })
        ));
    }

    #[test]
    fn missing_purchase_index() {
        let mut ledger = TicketLedger::new();
        ledger.append(player(1), 1).unwrap();
        assert_eq!(
            ledger.purchase(1),
            Err(LedgerError::IndexNotFound { index: 1, count: 1 })
        );
    }
}
