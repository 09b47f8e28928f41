use thiserror::Error;

/// Fatal benchmark errors. Degenerate statistics and out-of-range limits
/// are recovered locally and never surface here; anything that does reach
/// this type aborts the whole invocation so a partial comparison is never
/// reported.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("unknown product id {0}")]
    UnknownProduct(u32),

    #[error("unknown brand id {0}")]
    UnknownBrand(u32),

    #[error("unknown category id {0}")]
    UnknownCategory(u32),

    #[error("statement returned an unexpected result shape: {0}")]
    UnexpectedResult(&'static str),
}
