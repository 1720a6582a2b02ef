//! Benchmarks for ticket ownership lookup and purchase recording

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use daiq_lottery::{PlayerId, TicketLedger};

fn ledger_with(purchases: usize) -> TicketLedger {
    let mut ledger = TicketLedger::new();
    for i in 0..purchases {
        let owner: PlayerId = [(i % 251) as u8; 32];
        ledger.append(owner, (i % 17 + 1) as u128).unwrap();
    }
    ledger
}

fn bench_owner_of(c: &mut Criterion) {
    let mut group = c.benchmark_group("owner_of");
    for purchases in [100usize, 10_000, 1_000_000] {
        let ledger = ledger_with(purchases);
        let issued = ledger.issued_tickets();
        group.bench_with_input(BenchmarkId::from_parameter(purchases), &ledger, |b, ledger| {
            let mut ticket = 0u128;
            b.iter(|| {
                ticket = (ticket + 7_919) % issued;
                ledger.owner_of(black_box(ticket))
            })
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_10k_purchases", |b| {
        b.iter(|| ledger_with(black_box(10_000)))
    });
}

criterion_group!(benches, bench_owner_of, bench_append);
criterion_main!(benches);
