//! Criterion benchmarks for the fetch strategies at different page sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rowset_bench::strategies::STRATEGIES;
use rowset_bench::{aggregate, fixtures, mem};
use rowset_bench::{CountingDriver, MemoryDriver, RoundTripCounter, StoreDriver};
use rowset_bench::store::Statement;

#[global_allocator]
static ALLOC: mem::CountingAllocator = mem::CountingAllocator;

fn seeded_driver(n: usize) -> CountingDriver<MemoryDriver> {
    let driver = CountingDriver::new(MemoryDriver::new(), RoundTripCounter::new());
    driver
        .execute(Statement::LoadCatalog(fixtures::seed_catalog(n, 42)))
        .unwrap();
    driver
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    let driver = seeded_driver(2000);

    for limit in [100, 500, 2000] {
        for strategy in STRATEGIES {
            group.bench_with_input(
                BenchmarkId::new(strategy.label, limit),
                &limit,
                |b, &limit| {
                    b.iter(|| {
                        driver.reset_session();
                        black_box((strategy.fetch)(&driver, limit).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let driver = seeded_driver(2000);

    for limit in [100, 500, 2000] {
        let rows = driver
            .query(Statement::SelectProductsJoined { limit })
            .unwrap()
            .into_flat_rows()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("flat_rows", limit), &rows, |b, rows| {
            b.iter(|| black_box(aggregate(rows.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_aggregate);
criterion_main!(benches);
