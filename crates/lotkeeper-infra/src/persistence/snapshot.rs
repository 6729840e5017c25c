// ---------------------------------------------------------------------------
// snapshot – binary image of the slot registry plus cumulative revenue
// ---------------------------------------------------------------------------
//
// Layout (little-endian):
//   [0..4]    Magic bytes: "LOTK"
//   [4..8]    Format version (u32)
//   [8..12]   Slot count N (u32)
//   N slot records, 18 bytes each:
//     [0..8]    Plate, UTF-8, NUL-padded
//     [8]       Vehicle tag (0 = car, 1 = motorcycle, 2 = truck)
//     [9..17]   Entry time, Unix seconds (i64)
//     [17]      Occupied flag (0 / 1)
//   [..+8]    Total revenue (f64)
//
// Free slots are written with a zeroed plate, tag and timestamp; those fields
// are ignored when reading a free slot back.

use chrono::DateTime;
use lotkeeper_domain::{LotState, Occupant, Slot, SlotRegistry};
use lotkeeper_types::{ParkingError, Plate, VehicleType, PLATE_CAPACITY};
use thiserror::Error;

/// Magic bytes identifying a snapshot file
pub const MAGIC: [u8; 4] = *b"LOTK";

/// Current snapshot format version
pub const FORMAT_VERSION: u32 = 1;

pub const HEADER_SIZE: usize = 12;

/// Plate field width; one byte more than the longest plate
pub const PLATE_FIELD_SIZE: usize = PLATE_CAPACITY + 1;

pub const SLOT_RECORD_SIZE: usize = PLATE_FIELD_SIZE + 1 + 8 + 1;

const REVENUE_SIZE: usize = 8;

/// Total encoded size for a registry of `slot_count` slots
pub fn snapshot_size(slot_count: usize) -> usize {
    HEADER_SIZE + slot_count * SLOT_RECORD_SIZE + REVENUE_SIZE
}

/// Reasons a snapshot cannot be decoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("snapshot is {found} bytes, expected {expected}")]
    WrongSize { expected: usize, found: usize },

    #[error("not a snapshot file (bad magic bytes)")]
    BadMagic,

    #[error("snapshot format version {0} is newer than this build supports")]
    UnsupportedVersion(u32),

    #[error("snapshot holds {found} slots, expected {expected}")]
    SlotCountMismatch { expected: usize, found: usize },

    #[error("slot {slot}: unknown vehicle tag {tag}")]
    InvalidVehicleTag { slot: usize, tag: u8 },

    #[error("slot {slot}: invalid occupied flag {flag}")]
    InvalidFlag { slot: usize, flag: u8 },

    #[error("slot {slot}: invalid plate ({reason})")]
    InvalidPlate { slot: usize, reason: String },

    #[error("slot {slot}: entry time {seconds} out of range")]
    InvalidTimestamp { slot: usize, seconds: i64 },

    #[error("plate {0} appears in more than one slot")]
    DuplicatePlate(String),

    #[error("invalid revenue total {0}")]
    InvalidRevenue(f64),
}

/// Encode the registry and revenue total
pub fn encode_snapshot(registry: &SlotRegistry, total_revenue: f64) -> Vec<u8> {
    let mut out = Vec::with_capacity(snapshot_size(registry.capacity()));

    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(registry.capacity() as u32).to_le_bytes());

    for slot in registry.slots() {
        let mut plate = [0u8; PLATE_FIELD_SIZE];
        match slot.occupant() {
            Some(occupant) => {
                let bytes = occupant.plate.as_str().as_bytes();
                plate[..bytes.len()].copy_from_slice(bytes);
                out.extend_from_slice(&plate);
                out.push(occupant.vehicle_type.index() as u8);
                out.extend_from_slice(&occupant.entry_time.timestamp().to_le_bytes());
                out.push(1);
            }
            None => {
                out.extend_from_slice(&plate);
                out.push(0);
                out.extend_from_slice(&0i64.to_le_bytes());
                out.push(0);
            }
        }
    }

    out.extend_from_slice(&total_revenue.to_le_bytes());
    out
}

/// Decode a snapshot written by [`encode_snapshot`]
///
/// `expected_slots` is the capacity of the running lot; a snapshot for a
/// different capacity is rejected.
pub fn decode_snapshot(bytes: &[u8], expected_slots: usize) -> Result<LotState, SnapshotError> {
    if bytes.len() < HEADER_SIZE {
        return Err(SnapshotError::WrongSize {
            expected: snapshot_size(expected_slots),
            found: bytes.len(),
        });
    }
    if bytes[..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let version = read_u32(&bytes[4..8]);
    if version > FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let slot_count = read_u32(&bytes[8..12]) as usize;
    if slot_count != expected_slots {
        return Err(SnapshotError::SlotCountMismatch {
            expected: expected_slots,
            found: slot_count,
        });
    }

    let expected_len = snapshot_size(slot_count);
    if bytes.len() != expected_len {
        return Err(SnapshotError::WrongSize {
            expected: expected_len,
            found: bytes.len(),
        });
    }

    let records = &bytes[HEADER_SIZE..HEADER_SIZE + slot_count * SLOT_RECORD_SIZE];
    let slots = records
        .chunks_exact(SLOT_RECORD_SIZE)
        .enumerate()
        .map(|(index, record)| decode_slot(index + 1, record))
        .collect::<Result<Vec<_>, _>>()?;

    let registry = SlotRegistry::from_slots(slots).map_err(|e| match e {
        ParkingError::DuplicateEntry(plate) => SnapshotError::DuplicatePlate(plate),
        other => SnapshotError::DuplicatePlate(other.to_string()),
    })?;

    let mut revenue = [0u8; REVENUE_SIZE];
    revenue.copy_from_slice(&bytes[expected_len - REVENUE_SIZE..]);
    let total_revenue = f64::from_le_bytes(revenue);
    if !total_revenue.is_finite() || total_revenue < 0.0 {
        return Err(SnapshotError::InvalidRevenue(total_revenue));
    }

    Ok(LotState {
        registry,
        total_revenue,
    })
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

/// Decode one record; `slot` is the 1-based slot number used in errors
fn decode_slot(slot: usize, record: &[u8]) -> Result<Slot, SnapshotError> {
    let plate_field = &record[..PLATE_FIELD_SIZE];
    let tag = record[PLATE_FIELD_SIZE];
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&record[PLATE_FIELD_SIZE + 1..PLATE_FIELD_SIZE + 9]);
    let seconds = i64::from_le_bytes(ts);
    let flag = record[PLATE_FIELD_SIZE + 9];

    match flag {
        0 => Ok(Slot::empty()),
        1 => {
            let vehicle_type = VehicleType::from_index(tag as usize)
                .ok_or(SnapshotError::InvalidVehicleTag { slot, tag })?;

            let len = plate_field
                .iter()
                .position(|b| *b == 0)
                .unwrap_or(PLATE_FIELD_SIZE);
            let text = std::str::from_utf8(&plate_field[..len]).map_err(|e| {
                SnapshotError::InvalidPlate {
                    slot,
                    reason: e.to_string(),
                }
            })?;
            let plate = Plate::new(text).map_err(|e| SnapshotError::InvalidPlate {
                slot,
                reason: e.to_string(),
            })?;

            let entry_time = DateTime::from_timestamp(seconds, 0)
                .ok_or(SnapshotError::InvalidTimestamp { slot, seconds })?;

            Ok(Slot::occupied(Occupant {
                plate,
                vehicle_type,
                entry_time,
            }))
        }
        flag => Err(SnapshotError::InvalidFlag { slot, flag }),
    }
}
