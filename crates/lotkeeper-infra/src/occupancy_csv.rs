//! CSV export of the slot listing
//!
//! Columns: slot, status, plate, vehicle_type, entry_time (RFC 3339, UTC).
//! Free slots leave the vehicle columns empty.

use std::io::Write;
use std::path::Path;

use lotkeeper_domain::SlotRegistry;
use lotkeeper_types::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct OccupancyRow<'a> {
    slot: usize,
    status: &'static str,
    plate: &'a str,
    vehicle_type: &'a str,
    entry_time: String,
}

/// Write one row per slot to `writer`, returning the number of rows
pub fn write_occupancy_csv<W: Write>(registry: &SlotRegistry, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (index, slot) in registry.iter() {
        let row = match slot.occupant() {
            Some(occupant) => OccupancyRow {
                slot: index + 1,
                status: "occupied",
                plate: occupant.plate.as_str(),
                vehicle_type: occupant.vehicle_type.label(),
                entry_time: occupant.entry_time.to_rfc3339(),
            },
            None => OccupancyRow {
                slot: index + 1,
                status: "free",
                plate: "",
                vehicle_type: "",
                entry_time: String::new(),
            },
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(registry.capacity())
}

/// Export the slot listing to a CSV file at `path`
pub fn export_occupancy_csv(registry: &SlotRegistry, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_occupancy_csv(registry, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lotkeeper_types::{Plate, VehicleType};

    #[test]
    fn test_rows_for_every_slot() {
        let mut registry = SlotRegistry::with_capacity(3);
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        registry
            .check_in(1, Plate::new("ABC123").unwrap(), VehicleType::Car, t0)
            .unwrap();

        let mut buf = Vec::new();
        let rows = write_occupancy_csv(&registry, &mut buf).unwrap();
        assert_eq!(rows, 3);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "slot,status,plate,vehicle_type,entry_time");
        assert_eq!(lines[1], "1,free,,,");
        assert_eq!(lines[2], "2,occupied,ABC123,Car,2024-03-01T09:00:00+00:00");
        assert_eq!(lines[3], "3,free,,,");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupancy.csv");
        let rows = export_occupancy_csv(&SlotRegistry::new(), &path).unwrap();
        assert_eq!(rows, 50);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 51);
    }
}
