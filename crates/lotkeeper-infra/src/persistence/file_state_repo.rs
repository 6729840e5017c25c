//! File-based implementation of StateRepository

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lotkeeper_domain::{LotState, SlotRegistry, StateRepository, SLOT_CAPACITY};
use lotkeeper_types::{Error, ParkingError};
use tracing::{debug, warn};

use super::snapshot::{decode_snapshot, encode_snapshot};
use crate::atomic_write::atomic_write;

/// Stores the occupancy snapshot in a single binary file.
pub struct FileStateRepository {
    path: PathBuf,
    capacity: usize,
}

impl FileStateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self::with_capacity(path, SLOT_CAPACITY)
    }

    /// Repository for a lot with a non-standard number of slots
    pub fn with_capacity(path: PathBuf, capacity: usize) -> Self {
        Self { path, capacity }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateRepository for FileStateRepository {
    fn load(&self) -> Result<Option<LotState>, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match decode_snapshot(&bytes, self.capacity) {
            Ok(state) => {
                debug!(
                    path = %self.path.display(),
                    occupied = state.registry.occupied_count(),
                    "snapshot loaded"
                );
                Ok(Some(state))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable snapshot");
                Ok(None)
            }
        }
    }

    fn save(&self, registry: &SlotRegistry, total_revenue: f64) -> Result<(), Error> {
        let bytes = encode_snapshot(registry, total_revenue);
        atomic_write(&self.path, &bytes).map_err(|e| {
            ParkingError::PersistenceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lotkeeper_types::{Plate, VehicleType};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path().join("state.bin"));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path().join("state.bin"));

        let mut registry = SlotRegistry::new();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        registry
            .check_in(2, Plate::new("ABC123").unwrap(), VehicleType::Car, t0)
            .unwrap();

        repo.save(&registry, 800.0).unwrap();
        let state = repo.load().unwrap().unwrap();

        assert_eq!(state.registry, registry);
        assert_eq!(state.total_revenue, 800.0);
    }

    #[test]
    fn test_undersized_file_loads_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");
        fs::write(&path, b"LOTK\x01").unwrap();

        let repo = FileStateRepository::new(path);
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_to_unwritable_location_reports_unavailable() {
        let dir = tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let repo = FileStateRepository::new(blocker.join("state.bin"));

        let err = repo.save(&SlotRegistry::new(), 0.0).unwrap_err();
        assert!(matches!(
            err,
            Error::Parking(ParkingError::PersistenceUnavailable(_))
        ));
    }

    #[test]
    fn test_capacity_mismatch_loads_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");
        FileStateRepository::with_capacity(path.clone(), 5)
            .save(&SlotRegistry::with_capacity(5), 0.0)
            .unwrap();

        assert!(FileStateRepository::new(path).load().unwrap().is_none());
    }
}
