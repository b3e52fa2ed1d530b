//! Keyword rank tracking against search engine result pages.
//!
//! A [`Tracker`] pages through the results of every keyword at once, one batch of
//! concurrent requests per result page, and records the first position at which the
//! target site shows up.

mod error;
mod macros;

pub mod config;
pub mod engine;
pub mod parse;
pub mod process;
pub mod proxy;
pub mod request;

pub use config::{TrackerConfig, TrackingRequest};
pub use engine::{EngineKind, Google, SearchEngine, TemplateEngine};
pub use error::{Error, FetchError, Result};
pub use process::{Outcome, Tracker, TrackingReport};
pub use request::{BatchRequest, Fetch, HttpFetcher};

/// Number of results on one result page. The offset advances by this much per iteration.
pub const PAGE_SIZE: usize = 10;
pub const DEFAULT_RESULT_LIMIT: usize = 100;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Converts a `chrono` duration to fractional seconds.
pub fn elapsed_secs(delta: chrono::TimeDelta) -> f64 {
    delta
        .num_microseconds()
        .map(|n| n as f64 / 1_000_000.0)
        .unwrap_or(0.0)
}
