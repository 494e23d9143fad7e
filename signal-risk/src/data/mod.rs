//! Data model module
//!
//! Closed trades and the per-month profit maps built from them.

pub mod monthly;
pub mod trade;

pub use monthly::*;
pub use trade::*;
