//! Trade statistics module
//!
//! Exposure sweep, martingale detection and the aggregate provider stats
//! built on top of them.

pub mod exposure;
pub mod martingale;
pub mod provider;

pub use exposure::*;
pub use martingale::*;
pub use provider::*;
