use daiq_lottery::{LedgerError, PlayerId, TicketLedger, TicketNumber};
use proptest::prelude::*;

// Ledger invariants under arbitrary purchase sequences:
// ranges partition [0, issued) in purchase order and every ticket
// resolves to the purchase that holds it.

fn ledger_from(purchases: &[(u8, TicketNumber)]) -> TicketLedger {
    let mut ledger = TicketLedger::new();
    for (owner, count) in purchases {
        let owner: PlayerId = [*owner; 32];
        ledger.append(owner, *count).unwrap();
    }
    ledger
}

proptest! {
    #[test]
    fn ranges_are_contiguous_and_disjoint(
        purchases in prop::collection::vec((0u8..8, 1u128..1_000), 0..64),
    ) {
        let ledger = ledger_from(&purchases);

        let mut next = 0u128;
        for (purchase, (owner, count)) in ledger.purchases().iter().zip(&purchases) {
            prop_assert_eq!(purchase.ticket_start, next);
            prop_assert_eq!(purchase.tickets(), *count);
            prop_assert_eq!(purchase.owner, [*owner; 32]);
            next = purchase.ticket_end + 1;
        }

        let total: u128 = purchases.iter().map(|(_, count)| count).sum();
        prop_assert_eq!(ledger.issued_tickets(), total);
        prop_assert_eq!(next, total);
        prop_assert_eq!(ledger.purchase_count(), purchases.len());
    }
}

proptest! {
    #[test]
    fn every_ticket_resolves_to_its_purchase(
        purchases in prop::collection::vec((0u8..8, 1u128..50), 1..32),
        beyond in 0u128..1_000,
    ) {
        let ledger = ledger_from(&purchases);
        let issued = ledger.issued_tickets();

        for ticket in 0..issued {
            let index = ledger.owner_of(ticket).unwrap();
            prop_assert!(ledger.purchase(index).unwrap().contains(ticket));
        }

        let outside = issued + beyond;
        prop_assert_eq!(
            ledger.owner_of(outside),
            Err(LedgerError::TicketNotFound { ticket: outside, issued })
        );
    }
}

proptest! {
    #[test]
    fn player_index_lists_follow_insertion_order(
        purchases in prop::collection::vec((0u8..4, 1u128..10), 0..48),
    ) {
        let ledger = ledger_from(&purchases);

        for owner in 0u8..4 {
            let expected: Vec<usize> = purchases
                .iter()
                .enumerate()
                .filter(|(_, (o, _))| *o == owner)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(ledger.purchases_of(&[owner; 32]), expected.as_slice());
        }
    }
}
