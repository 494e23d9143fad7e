//! Stat history module
//!
//! Append-only time series of provider stats. The store is constructed
//! explicitly and shared by `Arc`; there is no global instance.

pub mod backend;
pub mod store;
pub mod types;

pub use backend::*;
pub use store::*;
pub use types::*;
