//! Infrastructure layer
//!
//! Concrete implementations of the domain repository traits and file exports.

pub mod atomic_write;
pub mod occupancy_csv;
pub mod persistence;
