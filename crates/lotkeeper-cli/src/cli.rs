//! CLI definition using clap

use clap::{Parser, Subcommand};
use lotkeeper_types::{OutputFormat, VehicleType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lotkeeper")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Parking lot occupancy tracking and hourly billing")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding state and tariff files. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Park a vehicle in the first free slot
    CheckIn {
        /// License plate (up to 7 characters, no spaces)
        plate: String,

        /// Vehicle type
        #[arg(long = "type", short = 't', value_enum)]
        vehicle_type: VehicleType,
    },

    /// Check a vehicle out and print the fee
    CheckOut {
        /// License plate
        plate: String,
    },

    /// Show slot occupancy
    Status {
        /// Only list occupied slots
        #[arg(long)]
        occupied: bool,
    },

    /// Find which slot a plate is parked in
    Find {
        /// License plate (case-sensitive)
        plate: String,
    },

    /// Show or change hourly tariffs
    Tariff {
        /// Show tariffs after --set/--reset (shown anyway when nothing changes)
        #[arg(long)]
        show: bool,

        /// Set tariff: <TYPE> <FIRST_HOUR> <EXTRA_HOUR>
        #[arg(long, num_args = 3, value_names = ["TYPE", "FIRST_HOUR", "EXTRA_HOUR"])]
        set: Option<Vec<String>>,

        /// Restore default tariffs
        #[arg(long)]
        reset: bool,
    },

    /// Show revenue collected so far
    Revenue,

    /// Export the slot listing to CSV
    Export {
        /// Output CSV file path
        output: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}
