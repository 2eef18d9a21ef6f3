use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use log::LevelFilter;
use syslog::Facility;
use tracing_subscriber::filter::LevelFilter as TraceLevel;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Syslog,
    Stderr,
    File(PathBuf),
}

impl FromStr for LogDestination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(String::from("log destination must not be empty")),
            "syslog" => Ok(LogDestination::Syslog),
            "stderr" | "-" => Ok(LogDestination::Stderr),
            path => Ok(LogDestination::File(PathBuf::from(path))),
        }
    }
}

/// Install the process-wide logger. `label` is the syslog application name; the other
/// destinations take the door from the span `main` enters.
pub fn init(destination: &LogDestination, label: &str, level: LevelFilter) -> Result<(), Error> {
    match destination {
        LogDestination::Syslog => syslog::init(Facility::LOG_DAEMON, level, Some(label))
            .map_err(|err| Error::Logging(err.to_string())),
        LogDestination::Stderr => subscriber(io::stderr, level, true)
            .try_init()
            .map_err(|err| Error::Logging(err.to_string())),
        LogDestination::File(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            subscriber(Mutex::new(file), level, false)
                .try_init()
                .map_err(|err| Error::Logging(err.to_string()))
        }
    }
}

fn subscriber<W>(
    writer: W,
    level: LevelFilter,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(trace_level(level))
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

fn trace_level(level: LevelFilter) -> TraceLevel {
    match level {
        LevelFilter::Off => TraceLevel::OFF,
        LevelFilter::Error => TraceLevel::ERROR,
        LevelFilter::Warn => TraceLevel::WARN,
        LevelFilter::Info => TraceLevel::INFO,
        LevelFilter::Debug => TraceLevel::DEBUG,
        LevelFilter::Trace => TraceLevel::TRACE,
    }
}
