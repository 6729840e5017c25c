//! Output formatting module

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use lotkeeper_app::app::{OccupancyStats, Receipt, SlotSummary};
use lotkeeper_domain::TariffTable;
use lotkeeper_types::{OutputFormat, Result, VehicleType};
use serde::Serialize;

#[derive(Serialize)]
struct TariffRow {
    vehicle_type: VehicleType,
    first_hour: f64,
    extra_hour: f64,
}

#[derive(Serialize)]
struct RevenueReport<'a> {
    total_revenue: f64,
    occupancy: &'a OccupancyStats,
}

fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", content)?;
    Ok(())
}

/// Slot assigned at check-in
pub fn write_check_in(out: &mut impl Write, format: OutputFormat, summary: &SlotSummary) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }

    if let Some(ref occupant) = summary.occupant {
        writeln!(
            out,
            "Vehicle {} ({}) parked in slot {} at {}",
            occupant.plate,
            occupant.vehicle_type,
            summary.slot,
            format_time(occupant.entry_time)
        )?;
    }
    Ok(())
}

pub fn write_receipt(out: &mut impl Write, format: OutputFormat, receipt: &Receipt) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, receipt);
    }

    writeln!(out)?;
    writeln!(out, "Check-out Receipt")?;
    writeln!(out, "=================")?;
    writeln!(out, "Slot:            {}", receipt.slot)?;
    writeln!(out, "Plate:           {}", receipt.plate)?;
    writeln!(out, "Vehicle type:    {}", receipt.vehicle_type)?;
    writeln!(out, "Entry:           {}", format_time(receipt.entry_time))?;
    writeln!(out, "Exit:            {}", format_time(receipt.exit_time))?;
    writeln!(out, "Hours billed:    {}", receipt.billed_hours)?;
    writeln!(out, "Fee:             {:.2}", receipt.fee)?;
    Ok(())
}

pub fn write_slots(out: &mut impl Write, format: OutputFormat, slots: &[SlotSummary]) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, slots);
    }

    writeln!(out, "{:>4}  {:<8}  {:<8}  {:<10}  {}", "Slot", "Status", "Plate", "Type", "Entry")?;
    writeln!(out, "{}", "-".repeat(56))?;
    for summary in slots {
        match summary.occupant {
            Some(ref occupant) => writeln!(
                out,
                "{:>4}  {:<8}  {:<8}  {:<10}  {}",
                summary.slot,
                "Occupied",
                occupant.plate.as_str(),
                occupant.vehicle_type.label(),
                format_time(occupant.entry_time)
            )?,
            None => writeln!(out, "{:>4}  {:<8}", summary.slot, "Free")?,
        }
    }
    Ok(())
}

pub fn write_found(out: &mut impl Write, format: OutputFormat, summary: &SlotSummary) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }

    if let Some(ref occupant) = summary.occupant {
        writeln!(
            out,
            "Vehicle {} ({}) is in slot {}, parked since {}",
            occupant.plate,
            occupant.vehicle_type,
            summary.slot,
            format_time(occupant.entry_time)
        )?;
    }
    Ok(())
}

pub fn write_tariffs(out: &mut impl Write, format: OutputFormat, tariffs: &TariffTable) -> Result<()> {
    if format == OutputFormat::Json {
        let rows: Vec<TariffRow> = tariffs
            .iter()
            .map(|(vehicle_type, rate)| TariffRow {
                vehicle_type,
                first_hour: rate.first_hour,
                extra_hour: rate.extra_hour,
            })
            .collect();
        return write_json(out, &rows);
    }

    writeln!(out, "{:<10}  {:>12}  {:>12}", "Type", "First hour", "Extra hour")?;
    writeln!(out, "{}", "-".repeat(38))?;
    for (vehicle_type, rate) in tariffs.iter() {
        writeln!(
            out,
            "{:<10}  {:>12.2}  {:>12.2}",
            vehicle_type.label(),
            rate.first_hour,
            rate.extra_hour
        )?;
    }
    Ok(())
}

pub fn write_revenue(
    out: &mut impl Write,
    format: OutputFormat,
    total_revenue: f64,
    occupancy: &OccupancyStats,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(
            out,
            &RevenueReport {
                total_revenue,
                occupancy,
            },
        );
    }

    writeln!(out)?;
    writeln!(out, "Revenue Report")?;
    writeln!(out, "==============")?;
    writeln!(out, "Total revenue:   {:.2}", total_revenue)?;
    writeln!(
        out,
        "Occupied:        {}/{} ({} free)",
        occupancy.occupied, occupancy.capacity, occupancy.free
    )?;
    for vehicle_type in VehicleType::ALL {
        writeln!(
            out,
            "  {:<14} {}",
            format!("{}:", vehicle_type.label()),
            occupancy.count_for(vehicle_type)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lotkeeper_app::app::ParkingLot;
    use lotkeeper_types::Plate;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn lot_with_car() -> ParkingLot {
        let mut lot = ParkingLot::new();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        lot.check_in_at(Plate::new("ABC123").unwrap(), VehicleType::Car, t0)
            .unwrap();
        lot
    }

    #[test]
    fn test_slots_table_lists_every_slot() {
        let lot = lot_with_car();
        let text = render(|out| write_slots(out, OutputFormat::Table, &lot.list_slots()));
        // header + rule + 50 slots
        assert_eq!(text.lines().count(), 52);
        assert!(text.lines().nth(2).unwrap().contains("ABC123"));
        assert!(text.lines().nth(3).unwrap().contains("Free"));
    }

    #[test]
    fn test_slots_json_is_array() {
        let lot = lot_with_car();
        let text = render(|out| write_slots(out, OutputFormat::Json, &lot.list_slots()));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), 50);
        assert_eq!(slots[0]["occupant"]["plate"], "ABC123");
        assert_eq!(slots[0]["occupant"]["vehicle_type"], "car");
        assert!(slots[1]["occupant"].is_null());
    }

    #[test]
    fn test_tariffs_json_rows() {
        let text = render(|out| write_tariffs(out, OutputFormat::Json, &TariffTable::default()));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[2]["vehicle_type"], "truck");
        assert_eq!(value[2]["first_hour"], 800.0);
    }

    #[test]
    fn test_revenue_table() {
        let lot = lot_with_car();
        let text = render(|out| {
            write_revenue(out, OutputFormat::Table, 1250.5, &lot.occupancy())
        });
        assert!(text.contains("Total revenue:   1250.50"));
        assert!(text.contains("Occupied:        1/50 (49 free)"));
    }
}
