//! Interactive menu
//!
//! Reads one answer per line. Bad input is reported and the menu is shown
//! again; end of input behaves like choosing Exit.

use std::io::{BufRead, Write};
use std::str::FromStr;

use lotkeeper_app::app::ParkingLot;
use lotkeeper_domain::TariffRate;
use lotkeeper_types::{OutputFormat, Plate, Result, VehicleType};

use crate::output::{write_check_in, write_found, write_receipt, write_revenue, write_slots};

/// Menu entries, numbered as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    CheckIn,
    CheckOut,
    Status,
    Find,
    EditTariffs,
    Revenue,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::CheckIn),
            "2" => Ok(MenuChoice::CheckOut),
            "3" => Ok(MenuChoice::Status),
            "4" => Ok(MenuChoice::Find),
            "5" => Ok(MenuChoice::EditTariffs),
            "6" => Ok(MenuChoice::Revenue),
            "7" => Ok(MenuChoice::Exit),
            _ => Err(()),
        }
    }
}

/// Line-oriented prompt over any reader/writer pair
struct Prompt<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Prompt<'_, R, W> {
    /// Print `question` and read one trimmed line; `None` at end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Run the menu loop until Exit or end of input
pub fn run<R: BufRead, W: Write>(lot: &mut ParkingLot, input: &mut R, out: &mut W) -> Result<()> {
    let mut prompt = Prompt { input, out };

    loop {
        writeln!(prompt.out)?;
        writeln!(prompt.out, "===== PARKING LOT =====")?;
        writeln!(prompt.out, "1. Check in vehicle")?;
        writeln!(prompt.out, "2. Check out vehicle")?;
        writeln!(prompt.out, "3. Show slot status")?;
        writeln!(prompt.out, "4. Find vehicle by plate")?;
        writeln!(prompt.out, "5. Modify tariffs")?;
        writeln!(prompt.out, "6. Show total revenue")?;
        writeln!(prompt.out, "7. Exit")?;

        let Some(answer) = prompt.ask("Select an option: ")? else {
            break;
        };
        let Ok(choice) = answer.parse::<MenuChoice>() else {
            writeln!(prompt.out, "Invalid option, try again.")?;
            continue;
        };

        match choice {
            MenuChoice::CheckIn => check_in(lot, &mut prompt)?,
            MenuChoice::CheckOut => check_out(lot, &mut prompt)?,
            MenuChoice::Status => write_slots(prompt.out, OutputFormat::Table, &lot.list_slots())?,
            MenuChoice::Find => find(lot, &mut prompt)?,
            MenuChoice::EditTariffs => edit_tariffs(lot, &mut prompt)?,
            MenuChoice::Revenue => {
                write_revenue(prompt.out, OutputFormat::Table, lot.total_revenue(), &lot.occupancy())?
            }
            MenuChoice::Exit => break,
        }
    }

    writeln!(prompt.out, "Saving and exiting...")?;
    Ok(())
}

fn check_in<R: BufRead, W: Write>(lot: &mut ParkingLot, prompt: &mut Prompt<'_, R, W>) -> Result<()> {
    if lot.registry().is_full() {
        writeln!(prompt.out, "No free slots.")?;
        return Ok(());
    }

    let Some(answer) = prompt.ask("Plate (e.g. ABC123): ")? else {
        return Ok(());
    };
    let plate = match Plate::new(answer) {
        Ok(plate) => plate,
        Err(e) => {
            writeln!(prompt.out, "{}", e)?;
            return Ok(());
        }
    };
    if lot.find_by_plate(plate.as_str()).is_ok() {
        writeln!(prompt.out, "That vehicle is already parked.")?;
        return Ok(());
    }

    let Some(answer) = prompt.ask("Vehicle type (0 = Car, 1 = Motorcycle, 2 = Truck): ")? else {
        return Ok(());
    };
    let vehicle_type = match answer.parse::<VehicleType>() {
        Ok(vehicle_type) => vehicle_type,
        Err(_) => {
            writeln!(prompt.out, "Invalid vehicle type, check-in cancelled.")?;
            return Ok(());
        }
    };

    match lot.check_in(plate, vehicle_type) {
        Ok(summary) => write_check_in(prompt.out, OutputFormat::Table, &summary)?,
        Err(e) => writeln!(prompt.out, "{}", e)?,
    }
    Ok(())
}

fn check_out<R: BufRead, W: Write>(lot: &mut ParkingLot, prompt: &mut Prompt<'_, R, W>) -> Result<()> {
    let Some(plate) = prompt.ask("Plate of the vehicle leaving: ")? else {
        return Ok(());
    };

    match lot.check_out(&plate) {
        Ok(receipt) => write_receipt(prompt.out, OutputFormat::Table, &receipt)?,
        Err(e) => writeln!(prompt.out, "{}", e)?,
    }
    Ok(())
}

fn find<R: BufRead, W: Write>(lot: &ParkingLot, prompt: &mut Prompt<'_, R, W>) -> Result<()> {
    let Some(plate) = prompt.ask("Plate to search for: ")? else {
        return Ok(());
    };

    match lot.find_by_plate(&plate) {
        Ok(summary) => write_found(prompt.out, OutputFormat::Table, &summary)?,
        Err(e) => writeln!(prompt.out, "{}", e)?,
    }
    Ok(())
}

/// Ask for both rates of every vehicle type; an empty answer keeps the
/// current value. Nothing changes unless every answer is valid.
fn edit_tariffs<R: BufRead, W: Write>(lot: &mut ParkingLot, prompt: &mut Prompt<'_, R, W>) -> Result<()> {
    writeln!(prompt.out)?;
    writeln!(prompt.out, "---- Modify tariffs ----")?;

    let mut updated = Vec::with_capacity(VehicleType::ALL.len());
    for (vehicle_type, current) in lot.tariffs().iter() {
        writeln!(prompt.out, "{}:", vehicle_type)?;

        let question = format!("  First hour (current {:.2}): ", current.first_hour);
        let Some(first_hour) = ask_rate(prompt, &question, current.first_hour)? else {
            writeln!(prompt.out, "Invalid rate, tariffs unchanged.")?;
            return Ok(());
        };
        let question = format!("  Extra hour (current {:.2}): ", current.extra_hour);
        let Some(extra_hour) = ask_rate(prompt, &question, current.extra_hour)? else {
            writeln!(prompt.out, "Invalid rate, tariffs unchanged.")?;
            return Ok(());
        };

        match TariffRate::new(first_hour, extra_hour) {
            Ok(rate) => updated.push((vehicle_type, rate)),
            Err(e) => {
                writeln!(prompt.out, "{}, tariffs unchanged.", e)?;
                return Ok(());
            }
        }
    }

    for (vehicle_type, rate) in updated {
        lot.set_tariff(vehicle_type, rate);
    }
    writeln!(prompt.out, "Tariffs updated.")?;
    Ok(())
}

/// `Some(rate)` for a number or an empty answer, `None` for anything else
fn ask_rate<R: BufRead, W: Write>(
    prompt: &mut Prompt<'_, R, W>,
    question: &str,
    current: f64,
) -> Result<Option<f64>> {
    match prompt.ask(question)? {
        None => Ok(None),
        Some(answer) if answer.is_empty() => Ok(Some(current)),
        Some(answer) => Ok(answer.parse::<f64>().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotkeeper_domain::TariffTable;
    use std::io::Cursor;

    fn run_script(lot: &mut ParkingLot, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run(lot, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_check_in_then_find() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "1\nABC123\n0\n4\nABC123\n7\n");

        assert!(text.contains("parked in slot 1"));
        assert!(text.contains("is in slot 1"));
        assert!(text.ends_with("Saving and exiting...\n"));
        assert_eq!(lot.find_by_plate("ABC123").unwrap().slot, 1);
    }

    #[test]
    fn test_check_out_prints_receipt() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "1\nXYZ999\n1\n2\nXYZ999\n7\n");

        assert!(text.contains("Check-out Receipt"));
        assert!(text.contains("Fee:             300.00"));
        assert_eq!(lot.total_revenue(), 300.0);
    }

    #[test]
    fn test_invalid_option_keeps_looping() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "9\nabc\n7\n");
        assert_eq!(text.matches("Invalid option, try again.").count(), 2);
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "3\n");
        assert!(text.contains("Free"));
        assert!(text.ends_with("Saving and exiting...\n"));
    }

    #[test]
    fn test_duplicate_and_bad_type_do_not_park() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "1\nABC123\n0\n1\nABC123\n1\nNEW1\n5\n7\n");

        assert!(text.contains("already parked"));
        assert!(text.contains("Invalid vehicle type"));
        assert_eq!(lot.occupancy().occupied, 1);
    }

    #[test]
    fn test_unknown_plate_is_reported() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "2\nNOPE\n7\n");
        assert!(text.contains("NOPE"));
        assert_eq!(lot.total_revenue(), 0.0);
    }

    #[test]
    fn test_edit_tariffs_blank_keeps_current() {
        let mut lot = ParkingLot::new();
        run_script(&mut lot, "5\n1000\n\n\n\n900\n600\n7\n");

        let tariffs = lot.tariffs();
        assert_eq!(tariffs.get(VehicleType::Car), TariffRate::new(1000.0, 300.0).unwrap());
        assert_eq!(tariffs.get(VehicleType::Motorcycle), TariffTable::default().get(VehicleType::Motorcycle));
        assert_eq!(tariffs.get(VehicleType::Truck), TariffRate::new(900.0, 600.0).unwrap());
    }

    #[test]
    fn test_edit_tariffs_invalid_changes_nothing() {
        let mut lot = ParkingLot::new();
        let text = run_script(&mut lot, "5\n1000\n50\nabc\n7\n");
        assert!(text.contains("tariffs unchanged"));
        assert_eq!(lot.tariffs(), &TariffTable::default());
    }
}
