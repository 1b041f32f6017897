//! CLI command implementations.

pub mod columns;
pub mod search;
pub mod status;
