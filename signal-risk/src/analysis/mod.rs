//! Provider analysis module
//!
//! Ties the statistics, scoring and history store together for one provider
//! or a batch of them.

pub mod analyzer;
pub mod report;

pub use analyzer::*;
