//! Limit/offset paging for list endpoints.

use serde::{Deserialize, Serialize};

/// Paging parameters as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: Option<u64>,
    /// Number of items to skip.
    pub offset: Option<u64>,
}

/// Resolved paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of items to return (at least 1).
    pub limit: u64,
    /// Number of items to skip.
    pub offset: u64,
}

impl PageRequest {
    /// Resolves the request against a default and a maximum page size.
    ///
    /// A zero or missing limit falls back to `default_limit`; larger limits
    /// are capped at `max_limit`.
    #[must_use]
    pub fn resolve(&self, default_limit: u64, max_limit: u64) -> Page {
        let limit = match self.limit {
            Some(0) | None => default_limit,
            Some(limit) => limit,
        };

        Page {
            limit: limit.clamp(1, max_limit.max(1)),
            offset: self.offset.unwrap_or(0),
        }
    }
}
