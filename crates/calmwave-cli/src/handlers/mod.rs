//! Command handlers.

pub mod generate;
pub mod serve;
