//! Persistence implementations
//!
//! File-based implementations of the repository traits.

mod file_state_repo;
mod file_tariff_repo;
pub mod snapshot;

pub use file_state_repo::FileStateRepository;
pub use file_tariff_repo::{apply_tariff_text, format_tariff_text, FileTariffRepository};
pub use snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
