pub mod config;
mod door_state;
pub mod led;
pub mod logger;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod switch;

use std::io;

pub use door_state::DoorState;
pub use monitor::Monitor;
pub use notify::{NotificationError, Notifier, Notify};
pub use store::{Persist, PersistenceError, StateStore};

/// Errors that stop the monitor. Reporting failures are not in here, they are logged and
/// swallowed by the report cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("gpio error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("unable to set up logging: {0}")]
    Logging(String),
    #[error("hardware error: {0}")]
    Hardware(String),
}
