//! Storage adapters
//!
//! Only an in-memory adapter ships here. Persistent backends implement the
//! port traits from `privileges_core::traits` in their own crates.

pub mod memory;

pub use memory::InMemoryStorage;
