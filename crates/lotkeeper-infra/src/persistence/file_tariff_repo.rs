//! File-based implementation of TariffRepository
//!
//! Plain text, one line per vehicle type in tariff order (car, motorcycle,
//! truck), each line holding the first-hour and extra-hour rates separated by
//! whitespace:
//!
//! ```text
//! 500 300
//! 300 150
//! 800 500
//! ```

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lotkeeper_domain::{TariffRate, TariffRepository, TariffTable};
use lotkeeper_types::{Error, ParkingError, VehicleType};
use tracing::{debug, warn};

use crate::atomic_write::atomic_write;

/// Stores tariffs in a plain text file.
pub struct FileTariffRepository {
    path: PathBuf,
}

impl FileTariffRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Apply tariff lines from `content` onto `tariffs`, in tariff order
///
/// Blank lines are skipped. Reading stops at the first line that is not
/// exactly two non-negative numbers; that entry and every later one keep
/// their current values. Returns how many entries were overwritten.
pub fn apply_tariff_text(content: &str, tariffs: &mut TariffTable) -> usize {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let mut applied = 0;

    for vehicle_type in VehicleType::ALL {
        let Some(line) = lines.next() else {
            break;
        };
        match parse_rate_line(line) {
            Some(rate) => {
                tariffs.set(vehicle_type, rate);
                applied += 1;
            }
            None => {
                warn!(%vehicle_type, line, "malformed tariff line, keeping remaining rates");
                break;
            }
        }
    }

    applied
}

fn parse_rate_line(line: &str) -> Option<TariffRate> {
    let mut fields = line.split_whitespace();
    let first_hour: f64 = fields.next()?.parse().ok()?;
    let extra_hour: f64 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    TariffRate::new(first_hour, extra_hour).ok()
}

/// Render `tariffs` in the text format read by [`apply_tariff_text`]
pub fn format_tariff_text(tariffs: &TariffTable) -> String {
    let mut out = String::new();
    for (_, rate) in tariffs.iter() {
        // f64 Display is the shortest text that parses back to the same value
        let _ = writeln!(out, "{} {}", rate.first_hour, rate.extra_hour);
    }
    out
}

impl TariffRepository for FileTariffRepository {
    fn load_into(&self, tariffs: &mut TariffTable) -> Result<usize, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no tariff file, using current rates");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        // Undecodable bytes become U+FFFD and fail to parse like any bad line
        let content = String::from_utf8_lossy(&bytes);
        let applied = apply_tariff_text(&content, tariffs);
        debug!(path = %self.path.display(), applied, "tariffs loaded");
        Ok(applied)
    }

    fn save(&self, tariffs: &TariffTable) -> Result<(), Error> {
        atomic_write(&self.path, format_tariff_text(tariffs).as_bytes()).map_err(|e| {
            ParkingError::PersistenceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), "tariffs saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_default_tariffs() {
        assert_eq!(
            format_tariff_text(&TariffTable::default()),
            "500 300\n300 150\n800 500\n"
        );
    }

    #[test]
    fn test_full_file_overwrites_all() {
        let mut tariffs = TariffTable::default();
        let applied = apply_tariff_text("100 50\n200 75.5\n900 600\n", &mut tariffs);
        assert_eq!(applied, 3);
        assert_eq!(tariffs.get(VehicleType::Car), TariffRate::new(100.0, 50.0).unwrap());
        assert_eq!(
            tariffs.get(VehicleType::Motorcycle),
            TariffRate::new(200.0, 75.5).unwrap()
        );
        assert_eq!(tariffs.get(VehicleType::Truck), TariffRate::new(900.0, 600.0).unwrap());
    }

    #[test]
    fn test_two_lines_keep_third_default() {
        let mut tariffs = TariffTable::default();
        let applied = apply_tariff_text("100 50\n200 75\n", &mut tariffs);
        assert_eq!(applied, 2);
        assert_eq!(tariffs.get(VehicleType::Truck), TariffRate::new(800.0, 500.0).unwrap());
    }

    #[test]
    fn test_malformed_line_stops_reading() {
        let mut tariffs = TariffTable::default();
        let applied = apply_tariff_text("100 50\nabc 75\n900 600\n", &mut tariffs);
        assert_eq!(applied, 1);
        assert_eq!(tariffs.get(VehicleType::Car).first_hour, 100.0);
        // Nothing after the bad line is applied, even if it is well-formed
        assert_eq!(tariffs.get(VehicleType::Motorcycle), TariffTable::default().get(VehicleType::Motorcycle));
        assert_eq!(tariffs.get(VehicleType::Truck), TariffTable::default().get(VehicleType::Truck));
    }

    #[test]
    fn test_non_utf8_line_keeps_earlier_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tariffs.txt");
        fs::write(&path, b"100 50\n\xff\xfe 1\n900 600\n").unwrap();

        let repo = FileTariffRepository::new(path);
        let mut tariffs = TariffTable::default();
        assert_eq!(repo.load_into(&mut tariffs).unwrap(), 1);
        assert_eq!(tariffs.get(VehicleType::Car), TariffRate::new(100.0, 50.0).unwrap());
        assert_eq!(tariffs.get(VehicleType::Motorcycle), TariffTable::default().get(VehicleType::Motorcycle));
        assert_eq!(tariffs.get(VehicleType::Truck), TariffTable::default().get(VehicleType::Truck));
    }

    #[test]
    fn test_partial_load_keeps_prior_in_memory_values() {
        let mut tariffs = TariffTable::default();
        tariffs.set(VehicleType::Truck, TariffRate::new(1.0, 2.0).unwrap());
        apply_tariff_text("10 5\n20 10\n", &mut tariffs);
        assert_eq!(tariffs.get(VehicleType::Truck), TariffRate::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn test_single_number_and_extra_fields_are_malformed() {
        let mut tariffs = TariffTable::default();
        assert_eq!(apply_tariff_text("100\n", &mut tariffs), 0);
        assert_eq!(apply_tariff_text("100 50 25\n", &mut tariffs), 0);
        assert_eq!(tariffs, TariffTable::default());
    }

    #[test]
    fn test_negative_rate_is_malformed() {
        let mut tariffs = TariffTable::default();
        assert_eq!(apply_tariff_text("-100 50\n", &mut tariffs), 0);
        assert_eq!(tariffs, TariffTable::default());
    }

    #[test]
    fn test_blank_lines_and_fixed_point_numbers() {
        let mut tariffs = TariffTable::default();
        let applied = apply_tariff_text(
            "\n500.000000 300.000000\n\n  300.000000   150.000000\n800.000000 500.000000\n",
            &mut tariffs,
        );
        assert_eq!(applied, 3);
        assert_eq!(tariffs, TariffTable::default());
    }

    #[test]
    fn test_missing_file_leaves_tariffs() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::new(dir.path().join("tariffs.txt"));
        let mut tariffs = TariffTable::default();
        assert_eq!(repo.load_into(&mut tariffs).unwrap(), 0);
        assert_eq!(tariffs, TariffTable::default());
    }

    #[test]
    fn test_save_then_load_is_exact() {
        let dir = tempdir().unwrap();
        let repo = FileTariffRepository::new(dir.path().join("tariffs.txt"));

        let mut tariffs = TariffTable::default();
        tariffs.set(VehicleType::Car, TariffRate::new(0.1, 1.0 / 3.0).unwrap());
        tariffs.set(VehicleType::Truck, TariffRate::new(1234.5678, 0.0).unwrap());
        repo.save(&tariffs).unwrap();

        let mut loaded = TariffTable::default();
        assert_eq!(repo.load_into(&mut loaded).unwrap(), 3);
        assert_eq!(loaded, tariffs);
    }
}
