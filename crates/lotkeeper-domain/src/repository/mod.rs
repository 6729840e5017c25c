//! Repository trait definitions for data persistence

use lotkeeper_types::Error;

use crate::model::{SlotRegistry, TariffTable};

/// Slot registry plus cumulative revenue, stored as one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct LotState {
    pub registry: SlotRegistry,
    pub total_revenue: f64,
}

/// Repository for the occupancy snapshot
pub trait StateRepository {
    /// Load the last saved snapshot
    ///
    /// `Ok(None)` means there is nothing usable to load (first run, truncated
    /// or malformed file) and the caller should start with an empty lot.
    fn load(&self) -> Result<Option<LotState>, Error>;

    /// Replace the stored snapshot
    fn save(&self, registry: &SlotRegistry, total_revenue: f64) -> Result<(), Error>;
}

/// Repository for tariff configuration
pub trait TariffRepository {
    /// Overlay stored rates onto `tariffs`
    ///
    /// Entries that cannot be read keep their current values. Returns the
    /// number of entries that were overwritten.
    fn load_into(&self, tariffs: &mut TariffTable) -> Result<usize, Error>;

    /// Replace the stored rates
    fn save(&self, tariffs: &TariffTable) -> Result<(), Error>;
}
