//! Round-up calculation and recording.
//!
//! A round-up is the spare change between a purchase amount and the next
//! multiple of a rounding unit: 1 for `dollar`, 0.25 for `quarter`, or a
//! caller-supplied increment for `custom`.

pub mod calculator;
pub mod error;
pub mod policy;
pub mod service;
pub mod summary;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::RoundupCalculator;
pub use error::{RepositoryError, RoundupError, RoundupServiceError};
pub use policy::RoundupPolicy;
pub use service::{RoundupRepository, RoundupService};
pub use summary::summarize;
pub use types::{
    BatchItemResult, BatchRoundupInput, BatchRoundupResult, BatchTransaction, RoundupReceipt,
    RoundupRecord, RoundupRequest, RoundupResult, RoundupStatus, RoundupSummary, RuleStats,
};
