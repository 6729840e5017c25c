//! Slot registry: the fixed set of parking slots
//!
//! Slots are addressed by a 0-based index internally and shown to the
//! operator as a 1-based slot number. Allocation always picks the lowest free
//! index so that the chosen slot is reproducible. Entry times are kept at
//! whole-second resolution.

use chrono::{DateTime, SubsecRound, Utc};
use lotkeeper_types::{ParkingError, Plate, VehicleType};
use serde::{Deserialize, Serialize};

/// Number of slots in the lot
pub const SLOT_CAPACITY: usize = 50;

/// Vehicle currently parked in a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub plate: Plate,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
}

/// One physical parking space
///
/// An empty slot carries no plate, type or entry time at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    occupant: Option<Occupant>,
}

impl Slot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn occupied(occupant: Occupant) -> Self {
        Self {
            occupant: Some(occupant),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        self.occupant.as_ref()
    }
}

/// Fixed-capacity collection of slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotRegistry {
    /// Create an all-empty registry with [`SLOT_CAPACITY`] slots
    pub fn new() -> Self {
        Self::with_capacity(SLOT_CAPACITY)
    }

    /// Create an all-empty registry with a custom number of slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::empty(); capacity],
        }
    }

    /// Rebuild a registry from previously stored slots
    ///
    /// Rejects slot lists in which two occupied slots share a plate.
    pub fn from_slots(slots: Vec<Slot>) -> Result<Self, ParkingError> {
        let registry = Self { slots };
        for (index, slot) in registry.slots.iter().enumerate() {
            if let Some(occupant) = slot.occupant() {
                if registry.find_by_plate(occupant.plate.as_str()) != Some(index) {
                    return Err(ParkingError::DuplicateEntry(occupant.plate.to_string()));
                }
            }
        }
        Ok(registry)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn is_full(&self) -> bool {
        self.find_free_slot().is_none()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// `(index, slot)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Slot)> + '_ {
        self.slots.iter().enumerate()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Lowest index whose slot is free
    pub fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_occupied())
    }

    /// Index of the occupied slot holding `plate` (exact, case-sensitive match)
    pub fn find_by_plate(&self, plate: &str) -> Option<usize> {
        self.slots.iter().position(|s| {
            s.occupant()
                .map(|o| o.plate.as_str() == plate)
                .unwrap_or(false)
        })
    }

    /// Park a vehicle in the slot at `index`
    ///
    /// Nothing is mutated when the slot does not exist, is taken, or the plate
    /// is already parked elsewhere.
    pub fn check_in(
        &mut self,
        index: usize,
        plate: Plate,
        vehicle_type: VehicleType,
        entry_time: DateTime<Utc>,
    ) -> Result<(), ParkingError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(ParkingError::SlotNotFound(index + 1))?;
        if slot.is_occupied() {
            return Err(ParkingError::SlotOccupied(index + 1));
        }
        if self.find_by_plate(plate.as_str()).is_some() {
            return Err(ParkingError::DuplicateEntry(plate.to_string()));
        }

        self.slots[index] = Slot::occupied(Occupant {
            plate,
            vehicle_type,
            entry_time: entry_time.trunc_subsecs(0),
        });
        Ok(())
    }

    /// Free the slot at `index`, returning who was parked there
    pub fn check_out(&mut self, index: usize) -> Result<Occupant, ParkingError> {
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.occupant.take())
            .ok_or(ParkingError::SlotNotOccupied(index + 1))
    }
}
