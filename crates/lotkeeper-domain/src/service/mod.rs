//! Domain services
//!
//! Pure business rules that operate on the domain model.

pub mod fee_calculator;

pub use fee_calculator::{billed_hours, compute_fee};
