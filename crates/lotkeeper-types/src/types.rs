//! Vehicle and plate types shared by every layer

use crate::error::ParkingError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum plate length in bytes
pub const PLATE_CAPACITY: usize = 7;

/// Vehicle category, which selects the tariff
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
    Truck,
}

impl VehicleType {
    /// All vehicle types in tariff order
    pub const ALL: [VehicleType; 3] = [VehicleType::Car, VehicleType::Motorcycle, VehicleType::Truck];

    /// Position in tariff order (0 = Car, 1 = Motorcycle, 2 = Truck)
    pub fn index(self) -> usize {
        match self {
            VehicleType::Car => 0,
            VehicleType::Motorcycle => 1,
            VehicleType::Truck => 2,
        }
    }

    /// Inverse of [`VehicleType::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Truck => "Truck",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the menu number (`0`..`2`) or the type name in any case.
impl FromStr for VehicleType {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index)
                .ok_or_else(|| ParkingError::InvalidInput(format!("unknown vehicle type: {}", s)));
        }
        match s.to_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "motorcycle" | "moto" => Ok(VehicleType::Motorcycle),
            "truck" => Ok(VehicleType::Truck),
            _ => Err(ParkingError::InvalidInput(format!(
                "unknown vehicle type: {}",
                s
            ))),
        }
    }
}

/// Vehicle plate, the uniqueness key among occupied slots
///
/// Non-empty, no whitespace, at most [`PLATE_CAPACITY`] bytes. Comparison is
/// exact and case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    pub fn new(plate: impl Into<String>) -> Result<Self, ParkingError> {
        let plate = plate.into();
        if plate.is_empty() {
            return Err(ParkingError::InvalidInput("plate must not be empty".to_string()));
        }
        if plate.len() > PLATE_CAPACITY {
            return Err(ParkingError::InvalidInput(format!(
                "plate {} is longer than {} characters",
                plate, PLATE_CAPACITY
            )));
        }
        if plate.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ParkingError::InvalidInput(format!(
                "plate {:?} contains whitespace",
                plate
            )));
        }
        Ok(Self(plate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Plate {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Plate {
    type Error = ParkingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Plate> for String {
    fn from(plate: Plate) -> Self {
        plate.0
    }
}
