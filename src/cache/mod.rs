//! In-process response cache keyed by query fingerprint.

pub mod clock;
pub mod error;
pub mod response;

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use error::{CacheError, CacheResult};
pub use response::{CacheEntry, CacheStats, ResponseCache};
