//! Comparable-property lookup interface.
//!
//! Finding comparables is a best-effort enrichment step that runs beside the
//! deal engine, never inside it: a lookup that fails, times out or returns
//! junk has no bearing on any computed [`DealOutput`](crate::deal::engine::DealOutput).
//! Implementations live outside this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Money;

/// Minimum number of comparables a conforming source must return.
pub const MIN_COMPARABLES: usize = 3;

/// A recently transacted property used to sanity-check rent and price
/// assumptions. Serializes in the shared camelCase wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableProperty {
    /// Street address as returned by the source
    pub address: String,
    /// Estimated monthly market rent
    pub rent: Money,
    pub sale_price: Money,
    pub square_footage: f64,
}

/// Failure modes of a comparable lookup. All are local to the caller and
/// reported as transient; none is fatal to the process.
#[derive(Debug, Error)]
pub enum CompsError {
    #[error("Comparable lookup unavailable: {0}")]
    Unavailable(String),

    #[error("Comparable lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("Source returned {0} comparable(s), fewer than the required {min}", min = MIN_COMPARABLES)]
    InsufficientResults(usize),
}

impl CompsError {
    /// Whether retrying the same request may succeed. An undersized result
    /// set will not fix itself on retry; outages and timeouts might.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompsError::Unavailable(_) | CompsError::Timeout(_))
    }
}

/// Resolves a free-text property address to at least [`MIN_COMPARABLES`]
/// comparables, ordered by relevance.
pub trait ComparableSource {
    fn find_comparables(&self, address: &str) -> Result<Vec<ComparableProperty>, CompsError>;
}
