//! Command implementations.
//!
//! Results go to stdout; diagnostics go through `tracing` to stderr.

pub mod cart;
pub mod contact;
pub mod content;
pub mod order;
