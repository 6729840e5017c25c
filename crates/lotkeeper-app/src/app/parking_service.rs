//! Parking Service - check-in, check-out and billing for a single lot
//!
//! `ParkingLot` owns the slot registry, the tariff table and the revenue
//! total. Persistence goes through the repository traits, so callers decide
//! where state lives:
//! 1. `open` / `load_state` + `load_tariff` at startup
//! 2. any number of lot operations
//! 3. `persist` / `save_state` + `save_tariff` at shutdown

use chrono::{DateTime, Utc};
use lotkeeper_domain::service::{billed_hours, compute_fee};
use lotkeeper_domain::{
    Occupant, SlotRegistry, StateRepository, TariffRate, TariffRepository, TariffTable,
};
use lotkeeper_types::{Error, ParkingError, Plate, Result, VehicleType};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::repository::{open_state_repo, open_tariff_repo};

/// One slot as seen by callers (1-based slot number)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSummary {
    pub slot: usize,
    pub occupant: Option<Occupant>,
}

impl SlotSummary {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Result of a completed check-out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub slot: usize,
    pub plate: Plate,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub billed_hours: u32,
    pub fee: f64,
}

/// Occupancy counts for the whole lot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    pub capacity: usize,
    pub occupied: usize,
    pub free: usize,
    pub cars: usize,
    pub motorcycles: usize,
    pub trucks: usize,
}

impl OccupancyStats {
    /// Count of parked vehicles of one type
    pub fn count_for(&self, vehicle_type: VehicleType) -> usize {
        match vehicle_type {
            VehicleType::Car => self.cars,
            VehicleType::Motorcycle => self.motorcycles,
            VehicleType::Truck => self.trucks,
        }
    }
}

/// Parking lot state and operations
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingLot {
    registry: SlotRegistry,
    tariffs: TariffTable,
    total_revenue: f64,
}

impl Default for ParkingLot {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkingLot {
    /// Empty lot with default tariffs
    pub fn new() -> Self {
        Self::from_parts(SlotRegistry::new(), TariffTable::default(), 0.0)
    }

    pub fn from_parts(registry: SlotRegistry, tariffs: TariffTable, total_revenue: f64) -> Self {
        Self {
            registry,
            tariffs,
            total_revenue,
        }
    }

    /// Build a lot from the files named by `config`
    ///
    /// Unreadable files are logged and skipped; the lot then starts empty
    /// and/or with default tariffs.
    pub fn open(config: &Config) -> Result<Self> {
        let state_repo = open_state_repo(config)?;
        let tariff_repo = open_tariff_repo(config)?;

        let mut lot = Self::new();
        if let Err(e) = lot.load_state(&state_repo) {
            warn!(error = %e, "could not read snapshot, starting with an empty lot");
        }
        if let Err(e) = lot.load_tariff(&tariff_repo) {
            warn!(error = %e, "could not read tariffs, using defaults");
        }
        Ok(lot)
    }

    /// Save state and tariffs to the files named by `config`
    ///
    /// Both saves are attempted; every failure is returned.
    pub fn persist(&self, config: &Config) -> Vec<Error> {
        let mut errors = Vec::new();

        match open_state_repo(config) {
            Ok(repo) => {
                if let Err(e) = self.save_state(&repo) {
                    errors.push(e);
                }
            }
            Err(e) => errors.push(e),
        }
        match open_tariff_repo(config) {
            Ok(repo) => {
                if let Err(e) = self.save_tariff(&repo) {
                    errors.push(e);
                }
            }
            Err(e) => errors.push(e),
        }

        errors
    }

    // ========================================
    // Persistence
    // ========================================

    /// Replace registry and revenue with the stored snapshot, if any
    ///
    /// Returns whether a snapshot was applied. Without one the current state
    /// is left as it is.
    pub fn load_state(&mut self, repo: &impl StateRepository) -> Result<bool> {
        match repo.load()? {
            Some(state) => {
                self.registry = state.registry;
                self.total_revenue = state.total_revenue;
                info!(
                    occupied = self.registry.occupied_count(),
                    revenue = self.total_revenue,
                    "state restored"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn save_state(&self, repo: &impl StateRepository) -> Result<()> {
        repo.save(&self.registry, self.total_revenue)
    }

    /// Overwrite tariffs from storage; returns how many entries were read
    pub fn load_tariff(&mut self, repo: &impl TariffRepository) -> Result<usize> {
        repo.load_into(&mut self.tariffs)
    }

    pub fn save_tariff(&self, repo: &impl TariffRepository) -> Result<()> {
        repo.save(&self.tariffs)
    }

    // ========================================
    // Lot operations
    // ========================================

    /// Park a vehicle in the lowest free slot, entering now
    pub fn check_in(
        &mut self,
        plate: Plate,
        vehicle_type: VehicleType,
    ) -> std::result::Result<SlotSummary, ParkingError> {
        self.check_in_at(plate, vehicle_type, Utc::now())
    }

    /// Park a vehicle in the lowest free slot with an explicit entry time
    pub fn check_in_at(
        &mut self,
        plate: Plate,
        vehicle_type: VehicleType,
        now: DateTime<Utc>,
    ) -> std::result::Result<SlotSummary, ParkingError> {
        let index = self.registry.find_free_slot().ok_or(ParkingError::NoFreeSlot)?;
        self.registry.check_in(index, plate, vehicle_type, now)?;

        let summary = self.summary(index);
        if let Some(occupant) = &summary.occupant {
            info!(slot = summary.slot, plate = %occupant.plate, %vehicle_type, "checked in");
        }
        Ok(summary)
    }

    /// Check out a vehicle by plate, leaving now
    pub fn check_out(&mut self, plate: &str) -> std::result::Result<Receipt, ParkingError> {
        self.check_out_at(plate, Utc::now())
    }

    /// Check out a vehicle by plate with an explicit exit time
    pub fn check_out_at(
        &mut self,
        plate: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Receipt, ParkingError> {
        let index = self
            .registry
            .find_by_plate(plate)
            .ok_or_else(|| ParkingError::PlateNotFound(plate.to_string()))?;
        self.check_out_slot_at(index, now)
    }

    /// Check out whoever is parked in the slot at `index` (0-based)
    pub fn check_out_slot_at(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> std::result::Result<Receipt, ParkingError> {
        let occupant = self.registry.check_out(index)?;

        let fee = compute_fee(&self.tariffs, occupant.vehicle_type, occupant.entry_time, now);
        self.total_revenue += fee;

        let receipt = Receipt {
            slot: index + 1,
            billed_hours: billed_hours(occupant.entry_time, now),
            plate: occupant.plate,
            vehicle_type: occupant.vehicle_type,
            entry_time: occupant.entry_time,
            exit_time: now,
            fee,
        };
        info!(
            slot = receipt.slot,
            plate = %receipt.plate,
            hours = receipt.billed_hours,
            fee,
            "checked out"
        );
        Ok(receipt)
    }

    /// Every slot in slot order
    pub fn list_slots(&self) -> Vec<SlotSummary> {
        (0..self.registry.capacity()).map(|i| self.summary(i)).collect()
    }

    /// Where a plate is parked (case-sensitive)
    pub fn find_by_plate(&self, plate: &str) -> std::result::Result<SlotSummary, ParkingError> {
        self.registry
            .find_by_plate(plate)
            .map(|i| self.summary(i))
            .ok_or_else(|| ParkingError::PlateNotFound(plate.to_string()))
    }

    // ========================================
    // Tariffs and reporting
    // ========================================

    pub fn set_tariff(&mut self, vehicle_type: VehicleType, rate: TariffRate) {
        debug!(%vehicle_type, first_hour = rate.first_hour, extra_hour = rate.extra_hour, "tariff updated");
        self.tariffs.set(vehicle_type, rate);
    }

    /// Restore the default rates for every vehicle type
    pub fn reset_tariffs(&mut self) {
        self.tariffs = TariffTable::default();
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn total_revenue(&self) -> f64 {
        self.total_revenue
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn occupancy(&self) -> OccupancyStats {
        let mut stats = OccupancyStats {
            capacity: self.registry.capacity(),
            ..OccupancyStats::default()
        };

        for occupant in self.registry.slots().iter().filter_map(|s| s.occupant()) {
            stats.occupied += 1;
            match occupant.vehicle_type {
                VehicleType::Car => stats.cars += 1,
                VehicleType::Motorcycle => stats.motorcycles += 1,
                VehicleType::Truck => stats.trucks += 1,
            }
        }
        stats.free = stats.capacity - stats.occupied;
        stats
    }

    fn summary(&self, index: usize) -> SlotSummary {
        SlotSummary {
            slot: index + 1,
            occupant: self.registry.slot(index).and_then(|s| s.occupant()).cloned(),
        }
    }
}
