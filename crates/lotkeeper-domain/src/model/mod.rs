//! Domain model types

pub mod slot;
pub mod tariff;

pub use slot::{Occupant, Slot, SlotRegistry, SLOT_CAPACITY};
pub use tariff::{TariffRate, TariffTable};
