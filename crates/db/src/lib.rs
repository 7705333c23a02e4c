//! Storage for round-up records.
//!
//! This crate provides implementations of the repository traits declared in
//! `untether-core`. Records live in process memory.

pub mod repositories;

pub use repositories::InMemoryRoundupRepository;
