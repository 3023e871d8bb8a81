//! Command implementations.

pub mod fetch;
