//! Scoring module
//!
//! Weighted risk score and monthly profit / drawdown ratios.

pub mod mpdd;
pub mod risk;

pub use mpdd::*;
pub use risk::*;
