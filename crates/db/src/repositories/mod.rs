//! Repository implementations.
//!
//! Repositories hide the storage details behind the traits declared in
//! `untether-core`.

pub mod roundup;

pub use roundup::InMemoryRoundupRepository;
