//! Error types for lotkeeper

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Errors raised by parking operations.
///
/// Every variant is raised before any state is mutated, so the caller can
/// report it and carry on with the next operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParkingError {
    #[error("No free slot available")]
    NoFreeSlot,

    #[error("Vehicle not found: {0}")]
    PlateNotFound(String),

    /// Slot number is 1-based, as shown to the operator
    #[error("Slot {0} is not occupied")]
    SlotNotOccupied(usize),

    /// Slot number is 1-based
    #[error("Slot {0} does not exist")]
    SlotNotFound(usize),

    #[error("Slot {0} is already occupied")]
    SlotOccupied(usize),

    #[error("Vehicle {0} is already checked in")]
    DuplicateEntry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not write {0}")]
    PersistenceUnavailable(String),
}

impl ParkingError {
    /// Whether this is one of the lookup failures (no free slot, unknown plate, missing or empty slot)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ParkingError::NoFreeSlot
                | ParkingError::PlateNotFound(_)
                | ParkingError::SlotNotFound(_)
                | ParkingError::SlotNotOccupied(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parking(#[from] ParkingError),
}

pub type Result<T> = std::result::Result<T, Error>;
