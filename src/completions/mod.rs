//! Completion ledger module.
//!
//! Durable record of which (habit, day) pairs are marked done. Uniqueness of
//! (habit, day) is a storage constraint; conflicting inserts mean "already
//! completed" rather than an error.

pub mod store;

pub use store::{CompletionStore, DATE_FORMAT};
