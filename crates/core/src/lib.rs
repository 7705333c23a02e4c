//! Core business logic for the Untether transaction service.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Round-up policies, the calculator, summary aggregation and the service that
//! records calculations through a repository trait live here.

pub mod roundup;
