//! Instrumented execution of a single strategy run: elapsed time, memory
//! delta, peak memory and round-trip count, with mandatory state resets
//! around the measured region so no run inherits another run's residue.

use std::time::Instant;

use tracing::debug;

use crate::aggregator::aggregate;
use crate::error::BenchError;
use crate::mem;
use crate::store::{RoundTripCounter, StoreDriver};
use crate::strategies::{Fetched, ReturnKind, Strategy};

/// Everything measured for one strategy run.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub label: &'static str,
    pub elapsed_ms: f64,
    /// Live-heap delta across the measured region. Can go negative when a
    /// run frees more than it allocates.
    pub memory_delta_bytes: i64,
    pub peak_memory_bytes: u64,
    pub round_trips: u64,
    /// Records (or rows, for the naive strategy) handed back to the caller.
    pub result_count: usize,
    /// Rows the store produced before any host-side grouping, when known.
    pub raw_row_count: Option<usize>,
}

/// Runs one strategy under instrumentation against a shared driver and
/// counter. The counter handle must be the one the driver's counting
/// wrapper increments.
pub struct Instrumented<'a> {
    driver: &'a dyn StoreDriver,
    counter: &'a RoundTripCounter,
}

impl<'a> Instrumented<'a> {
    pub fn new(driver: &'a dyn StoreDriver, counter: &'a RoundTripCounter) -> Self {
        Self { driver, counter }
    }

    /// Measure one strategy run.
    ///
    /// Strict order around the measured region: session reset, counter
    /// reset, peak-accounting reset, memory snapshot, clock snapshot, run,
    /// post snapshots, counter read, result release, trailing session and
    /// counter reset. The trailing reset is what keeps run N's cached rows
    /// and allocations out of run N+1's numbers.
    pub fn measure(&self, strategy: &Strategy, limit: usize) -> Result<Measurement, BenchError> {
        self.driver.reset_session();
        self.counter.reset();
        mem::reset_peak();

        let mem_before = mem::current_allocated();
        let started = Instant::now();

        let fetched = (strategy.fetch)(self.driver, limit)?;
        // Host-side grouping happens inside the measured region; the
        // outcome is kept alive past the snapshots so the retained result
        // shows up in the memory delta.
        let outcome = match (strategy.return_kind, fetched) {
            (ReturnKind::HostGrouped, Fetched::Flat(rows)) => {
                let raw = rows.len();
                Fetched::Nested { records: aggregate(rows), raw_rows: Some(raw) }
            }
            (ReturnKind::AsIs, Fetched::Flat(rows)) => Fetched::Flat(rows),
            (_, nested) => nested,
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let mem_after = mem::current_allocated();
        let peak_memory_bytes = mem::peak_allocated() as u64;
        let round_trips = self.counter.get();

        let (result_count, raw_row_count) = match &outcome {
            Fetched::Nested { records, raw_rows } => (records.len(), *raw_rows),
            Fetched::Flat(rows) => (rows.len(), Some(rows.len())),
        };

        // Release the transient result, then clear shared state so the
        // next run starts from the same baseline this one did.
        drop(outcome);
        self.driver.reset_session();
        self.counter.reset();

        let measurement = Measurement {
            label: strategy.label,
            elapsed_ms,
            memory_delta_bytes: mem_after as i64 - mem_before as i64,
            peak_memory_bytes,
            round_trips,
            result_count,
            raw_row_count,
        };
        debug!(
            strategy = strategy.label,
            elapsed_ms = measurement.elapsed_ms,
            round_trips = measurement.round_trips,
            results = measurement.result_count,
            "measured run complete"
        );
        Ok(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::store::{CountingDriver, MemoryDriver, Statement};
    use crate::strategies::STRATEGIES;

    #[test]
    fn counter_reads_zero_after_measure() {
        let counter = RoundTripCounter::new();
        let inner = MemoryDriver::new();
        inner
            .execute(Statement::LoadCatalog(fixtures::seed_catalog(10, 3)))
            .unwrap();
        let driver = CountingDriver::new(inner, counter.clone());
        let executor = Instrumented::new(&driver, &counter);

        let m = executor.measure(&STRATEGIES[3], 10).unwrap();
        assert!(m.round_trips >= 1);
        assert_eq!(counter.get(), 0, "trailing reset must leave the counter clean");
    }

    #[test]
    fn lazy_strategy_costs_more_round_trips_than_joined() {
        let counter = RoundTripCounter::new();
        let inner = MemoryDriver::new();
        inner
            .execute(Statement::LoadCatalog(fixtures::seed_catalog(20, 3)))
            .unwrap();
        let driver = CountingDriver::new(inner, counter.clone());
        let executor = Instrumented::new(&driver, &counter);

        let lazy = executor.measure(&STRATEGIES[0], 20).unwrap();
        let joined = executor.measure(&STRATEGIES[3], 20).unwrap();

        // 1 base + per-product selects + 2 grouped counts, vs exactly 1.
        assert!(lazy.round_trips > 20);
        assert_eq!(joined.round_trips, 1);
    }
}
