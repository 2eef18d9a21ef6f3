use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::logger::LogDestination;
use crate::notify::DEFAULT_URL;
use crate::switch::{Pull, DEFAULT_BOUNCE_MS};
use crate::Error;

const DATA_DIR: &str = "data";

/// Report the state of a garage door's closed sensor to the room service.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Name of the garage door, used for the state file and in log messages
    #[arg(short = 'n', long)]
    pub name: String,

    /// BCM pin number of the door closed sensor switch
    #[arg(short = 'd', long)]
    pub door_pin: u8,

    /// BCM pin number of the door state LED
    #[arg(short = 'l', long)]
    pub led_pin: u8,

    /// BCM pin number of a "power on" LED
    #[arg(short = 'p', long)]
    pub power_pin: Option<u8>,

    /// Where to log: "syslog", "stderr" (or "-"), or a file path
    #[arg(long, default_value = "syslog")]
    pub log: LogDestination,

    /// Directory for state files [default: data/ next to the executable]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Endpoint POSTed to after each state report
    #[arg(long, default_value = DEFAULT_URL)]
    pub notify_url: String,

    /// Time the switch must hold a level before an edge counts
    #[arg(long, default_value_t = DEFAULT_BOUNCE_MS)]
    pub bounce_ms: u64,

    /// The switch pulls the pin high when pressed instead of to ground
    #[arg(long)]
    pub pull_down: bool,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything the process needs to know about its door. Fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct DoorConfig {
    pub name: String,
    pub door_pin: u8,
    pub led_pin: u8,
    pub power_pin: Option<u8>,
    pub log: LogDestination,
    pub log_level: LevelFilter,
    pub data_dir: PathBuf,
    pub notify_url: String,
    pub bounce: Duration,
    pub pull: Pull,
}

impl DoorConfig {
    pub fn from_args(args: Args) -> Result<Self, Error> {
        validate_name(&args.name)?;
        let mut pins = vec![args.door_pin, args.led_pin];
        pins.extend(args.power_pin);
        pins.sort_unstable();
        if pins.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(Error::Config(String::from(
                "door, LED and power pins must all be different",
            )));
        }

        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(DoorConfig {
            name: args.name,
            door_pin: args.door_pin,
            led_pin: args.led_pin,
            power_pin: args.power_pin,
            log: args.log,
            log_level: if args.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            data_dir,
            notify_url: args.notify_url,
            bounce: Duration::from_millis(args.bounce_ms),
            pull: if args.pull_down { Pull::Down } else { Pull::Up },
        })
    }
}

/// The name becomes a file name so it can't be allowed to point anywhere else.
fn validate_name(name: &str) -> Result<(), Error> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c.is_control());
    if invalid {
        Err(Error::Config(format!("invalid door name '{}'", name)))
    } else {
        Ok(())
    }
}

fn default_data_dir() -> Result<PathBuf, Error> {
    let exe = env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(DATA_DIR))
}
