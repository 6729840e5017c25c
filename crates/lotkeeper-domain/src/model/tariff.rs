//! Tariff table: first-hour and extra-hour rates per vehicle type

use lotkeeper_types::{ParkingError, VehicleType};
use serde::{Deserialize, Serialize};

/// Rates for one vehicle type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffRate {
    /// Charged for the first hour or any fraction of it
    pub first_hour: f64,
    /// Charged for every further hour or fraction of it
    pub extra_hour: f64,
}

impl TariffRate {
    /// Build a rate, rejecting negative or non-finite amounts
    pub fn new(first_hour: f64, extra_hour: f64) -> Result<Self, ParkingError> {
        for (name, value) in [("first-hour", first_hour), ("extra-hour", extra_hour)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParkingError::InvalidInput(format!(
                    "{} rate must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            first_hour,
            extra_hour,
        })
    }
}

/// One [`TariffRate`] per [`VehicleType`], in tariff order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    rates: [TariffRate; 3],
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            rates: [
                TariffRate {
                    first_hour: 500.0,
                    extra_hour: 300.0,
                },
                TariffRate {
                    first_hour: 300.0,
                    extra_hour: 150.0,
                },
                TariffRate {
                    first_hour: 800.0,
                    extra_hour: 500.0,
                },
            ],
        }
    }
}

impl TariffTable {
    pub fn get(&self, vehicle_type: VehicleType) -> TariffRate {
        self.rates[vehicle_type.index()]
    }

    /// Overwrite the rates for one vehicle type
    pub fn set(&mut self, vehicle_type: VehicleType, rate: TariffRate) {
        self.rates[vehicle_type.index()] = rate;
    }

    /// Entries in tariff order
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, TariffRate)> + '_ {
        VehicleType::ALL.iter().map(move |vt| (*vt, self.get(*vt)))
    }
}
