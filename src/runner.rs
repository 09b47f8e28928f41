//! Orchestration: warmup passes, then one measured run per strategy in
//! declared order, sequentially on one thread.

use tracing::info;

use crate::error::BenchError;
use crate::measure::Instrumented;
use crate::model::ProductRecord;
use crate::report::BenchReport;
use crate::store::{CountingDriver, MemoryDriver, RoundTripCounter, Statement, StoreDriver};
use crate::strategies::STRATEGIES;

/// Hard ceiling on the record limit.
pub const MAX_LIMIT: usize = 2000;
/// Default page size when none is given.
pub const DEFAULT_LIMIT: usize = 500;

/// Owns the store and runs the full strategy sequence. Generic over the
/// driver so a different store adapter can be benchmarked through the
/// same orchestration.
pub struct BenchmarkRunner<D: StoreDriver = CountingDriver<MemoryDriver>> {
    driver: D,
    counter: RoundTripCounter,
}

impl BenchmarkRunner {
    /// Seed a fresh in-memory store with the given catalog.
    pub fn new(catalog: Vec<ProductRecord>) -> Result<Self, BenchError> {
        let counter = RoundTripCounter::new();
        let driver = CountingDriver::new(MemoryDriver::new(), counter.clone());
        driver.execute(Statement::LoadCatalog(catalog))?;
        Ok(Self { driver, counter })
    }
}

impl<D: StoreDriver> BenchmarkRunner<D> {
    /// Run against an already-built driver. The counter handle must be the
    /// one the driver's counting layer increments, or round-trip figures
    /// will read zero.
    pub fn with_driver(driver: D, counter: RoundTripCounter) -> Self {
        Self { driver, counter }
    }

    /// Run every strategy once, measured, after `warmup_rounds` unmeasured
    /// full passes. The limit is clamped into `[1, MAX_LIMIT]`; warmup
    /// errors are not suppressed and abort the whole run, so a partial
    /// comparison is never produced.
    pub fn run(&self, limit: usize, warmup_rounds: u32) -> Result<BenchReport, BenchError> {
        let limit = limit.clamp(1, MAX_LIMIT);
        info!(limit, warmup_rounds, "starting benchmark");

        for round in 0..warmup_rounds {
            info!(round, "warmup pass");
            for strategy in STRATEGIES {
                self.driver.reset_session();
                (strategy.fetch)(&self.driver, limit)?;
            }
            self.driver.reset_session();
            self.counter.reset();
        }

        let executor = Instrumented::new(&self.driver, &self.counter);
        let mut measurements = Vec::with_capacity(STRATEGIES.len());
        for strategy in STRATEGIES {
            measurements.push(executor.measure(strategy, limit)?);
        }

        Ok(BenchReport::new(limit, warmup_rounds, measurements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::store::QueryResult;

    /// Driver whose every statement fails, standing in for a store that
    /// goes away mid-benchmark.
    struct FailingDriver;

    impl StoreDriver for FailingDriver {
        fn query(&self, _stmt: Statement) -> Result<QueryResult, BenchError> {
            Err(BenchError::UnknownProduct(0))
        }

        fn execute(&self, _stmt: Statement) -> Result<u64, BenchError> {
            Err(BenchError::UnknownProduct(0))
        }

        fn reset_session(&self) {}
    }

    /// A warmup failure is never suppressed: the run aborts and no report
    /// (not even a partial one) comes back.
    #[test]
    fn warmup_failure_aborts_the_run() {
        let runner = BenchmarkRunner::with_driver(FailingDriver, RoundTripCounter::new());
        assert!(runner.run(10, 1).is_err());
    }

    /// Same for a measured run, with warmup skipped entirely.
    #[test]
    fn measured_failure_aborts_the_run() {
        let runner = BenchmarkRunner::with_driver(FailingDriver, RoundTripCounter::new());
        assert!(runner.run(10, 0).is_err());
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        let runner = BenchmarkRunner::new(fixtures::seed_catalog(10, 5)).unwrap();
        assert_eq!(runner.run(0, 0).unwrap().limit, 1);
        assert_eq!(runner.run(1_000_000, 0).unwrap().limit, MAX_LIMIT);
    }

    #[test]
    fn produces_one_measurement_per_strategy() {
        let runner = BenchmarkRunner::new(fixtures::seed_catalog(25, 5)).unwrap();
        let report = runner.run(25, 1).unwrap();
        assert_eq!(report.measurements.len(), STRATEGIES.len());
        // All ordered pairs.
        let n = STRATEGIES.len();
        assert_eq!(report.comparisons.len(), n * (n - 1) / 2);
    }
}
