//! Use cases

pub mod parking_service;

pub use parking_service::{OccupancyStats, ParkingLot, Receipt, SlotSummary};
