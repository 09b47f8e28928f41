//! Benchmarks competing strategies for one query shape: "list N products
//! with their images, reviews, brand, category and two child counts".
//!
//! The interesting part is the row-set aggregation engine
//! ([`aggregator::aggregate`]), which reconstructs nested, deduplicated,
//! counted records from the flat Cartesian-product rows a two-way
//! one-to-many join produces. Everything else exists to measure it against
//! the alternatives: lazy per-entity loading, fetch-join hydration, raw
//! flat rows, and store-side aggregation.

pub mod aggregator;
pub mod error;
pub mod fixtures;
pub mod measure;
pub mod mem;
pub mod model;
pub mod report;
pub mod runner;
pub mod store;
pub mod strategies;

pub use aggregator::aggregate;
pub use error::BenchError;
pub use measure::{Instrumented, Measurement};
pub use model::{BrandRef, CategoryRef, FlatRow, ImageRef, ProductRecord, ReviewRef};
pub use report::{compare, BenchReport, Comparison};
pub use runner::{BenchmarkRunner, DEFAULT_LIMIT, MAX_LIMIT};
pub use store::{CountingDriver, MemoryDriver, RoundTripCounter, StoreDriver};
