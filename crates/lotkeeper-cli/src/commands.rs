//! Command handlers

use std::io;
use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::menu;
use crate::output::{
    write_check_in, write_found, write_receipt, write_revenue, write_slots, write_tariffs,
};
use lotkeeper_app::app::ParkingLot;
use lotkeeper_app::config::Config;
use lotkeeper_domain::TariffRate;
use lotkeeper_infra::occupancy_csv::export_occupancy_csv;
use lotkeeper_types::{OutputFormat, ParkingError, Plate, Result, VehicleType};
use tracing::error;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&config),

        Commands::CheckIn {
            plate,
            vehicle_type,
        } => cmd_check_in(&config, format, &plate, vehicle_type),

        Commands::CheckOut { plate } => cmd_check_out(&config, format, &plate),

        Commands::Status { occupied } => cmd_status(&config, format, occupied),

        Commands::Find { plate } => cmd_find(&config, format, &plate),

        Commands::Tariff { show, set, reset } => cmd_tariff(&config, format, show, set, reset),

        Commands::Revenue => cmd_revenue(&config, format),

        Commands::Export { output } => cmd_export(&config, output),

        Commands::Config {
            show,
            set_data_dir,
            set_output,
            reset,
        } => cmd_config(show, set_data_dir, set_output, reset),
    }
}

/// Save the lot, reporting every failure and returning the first
fn persist(lot: &ParkingLot, config: &Config) -> Result<()> {
    let mut errors = lot.persist(config).into_iter();
    let Some(first) = errors.next() else {
        return Ok(());
    };
    for e in errors {
        error!(error = %e, "save failed");
    }
    Err(first)
}

fn cmd_menu(config: &Config) -> Result<()> {
    let mut lot = ParkingLot::open(config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = menu::run(&mut lot, &mut stdin.lock(), &mut stdout.lock());

    // Save even when the terminal went away mid-session
    let saved = persist(&lot, config);
    outcome.and(saved)
}

fn cmd_check_in(
    config: &Config,
    format: OutputFormat,
    plate: &str,
    vehicle_type: VehicleType,
) -> Result<()> {
    let plate: Plate = plate.parse()?;
    let mut lot = ParkingLot::open(config)?;

    let summary = lot.check_in(plate, vehicle_type)?;
    persist(&lot, config)?;

    write_check_in(&mut io::stdout().lock(), format, &summary)
}

fn cmd_check_out(config: &Config, format: OutputFormat, plate: &str) -> Result<()> {
    let mut lot = ParkingLot::open(config)?;

    let receipt = lot.check_out(plate.trim())?;
    persist(&lot, config)?;

    write_receipt(&mut io::stdout().lock(), format, &receipt)
}

fn cmd_status(config: &Config, format: OutputFormat, occupied_only: bool) -> Result<()> {
    let lot = ParkingLot::open(config)?;

    let slots: Vec<_> = lot
        .list_slots()
        .into_iter()
        .filter(|s| !occupied_only || s.is_occupied())
        .collect();

    write_slots(&mut io::stdout().lock(), format, &slots)
}

fn cmd_find(config: &Config, format: OutputFormat, plate: &str) -> Result<()> {
    let lot = ParkingLot::open(config)?;
    let summary = lot.find_by_plate(plate.trim())?;
    write_found(&mut io::stdout().lock(), format, &summary)
}

fn cmd_tariff(
    config: &Config,
    format: OutputFormat,
    show: bool,
    set: Option<Vec<String>>,
    reset: bool,
) -> Result<()> {
    let mut lot = ParkingLot::open(config)?;
    let mut modified = false;

    if reset {
        lot.reset_tariffs();
        modified = true;
    }

    if let Some(args) = set {
        let (vehicle_type, rate) = parse_tariff_args(&args)?;
        lot.set_tariff(vehicle_type, rate);
        modified = true;
    }

    if modified {
        persist(&lot, config)?;
        if format == OutputFormat::Table {
            println!("Tariffs updated");
        }
    }

    if show || !modified {
        write_tariffs(&mut io::stdout().lock(), format, lot.tariffs())?;
    }
    Ok(())
}

/// Parse `<TYPE> <FIRST_HOUR> <EXTRA_HOUR>`
fn parse_tariff_args(args: &[String]) -> Result<(VehicleType, TariffRate)> {
    let [vehicle_type, first_hour, extra_hour] = args else {
        return Err(ParkingError::InvalidInput(
            "--set takes <TYPE> <FIRST_HOUR> <EXTRA_HOUR>".to_string(),
        )
        .into());
    };

    let vehicle_type: VehicleType = vehicle_type.parse()?;
    let parse_rate = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| ParkingError::InvalidInput(format!("not a number: {}", s)))
    };
    let rate = TariffRate::new(parse_rate(first_hour.as_str())?, parse_rate(extra_hour.as_str())?)?;
    Ok((vehicle_type, rate))
}

fn cmd_revenue(config: &Config, format: OutputFormat) -> Result<()> {
    let lot = ParkingLot::open(config)?;
    write_revenue(
        &mut io::stdout().lock(),
        format,
        lot.total_revenue(),
        &lot.occupancy(),
    )
}

fn cmd_export(config: &Config, output: PathBuf) -> Result<()> {
    let lot = ParkingLot::open(config)?;
    let rows = export_occupancy_csv(lot.registry(), &output)?;
    println!("Exported {} slots to {}", rows, output.display());
    Ok(())
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(data_dir) = set_data_dir {
        config.data_dir = Some(data_dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !modified {
        println!("\n{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tariff_args() {
        let (vehicle_type, rate) = parse_tariff_args(&args(&["truck", "900", "650.5"])).unwrap();
        assert_eq!(vehicle_type, VehicleType::Truck);
        assert_eq!(rate, TariffRate::new(900.0, 650.5).unwrap());

        let (vehicle_type, _) = parse_tariff_args(&args(&["1", "10", "5"])).unwrap();
        assert_eq!(vehicle_type, VehicleType::Motorcycle);
    }

    #[test]
    fn test_parse_tariff_args_rejects_bad_values() {
        assert!(parse_tariff_args(&args(&["bus", "10", "5"])).is_err());
        assert!(parse_tariff_args(&args(&["car", "ten", "5"])).is_err());
        assert!(parse_tariff_args(&args(&["car", "-10", "5"])).is_err());
        assert!(parse_tariff_args(&args(&["car", "10"])).is_err());
    }
}
