//! Configuration module

pub mod risk;

pub use risk::*;
