use std::convert::Infallible;
use std::process;

use clap::Parser;
use log::{error, info, warn};
use rppal::gpio::Gpio;

use garage_door_reporter::config::{Args, DoorConfig};
use garage_door_reporter::led::{self, PowerLed};
use garage_door_reporter::switch::GpioSwitch;
use garage_door_reporter::{logger, Error, Monitor, Notifier, StateStore};

fn main() {
    let config = match DoorConfig::from_args(Args::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };
    if let Err(err) = logger::init(&config.log, &config.name, config.log_level) {
        eprintln!("{}", err);
        process::exit(1);
    }
    let span = tracing::info_span!("monitor", door = %config.name);
    let _entered = span.enter();

    // There is no clean way out. Either the monitor fails or the process is killed.
    match run(&config) {
        Ok(never) => match never {},
        Err(err) => {
            error!("door '{}' monitor exiting: {}", config.name, err);
            process::exit(1);
        }
    }
}

/// Returns (rather than exits) on failure so the power LED guard is dropped on the way out.
fn run(config: &DoorConfig) -> Result<Infallible, Error> {
    info!("controlling door '{}'", config.name);

    let store = StateStore::new(&config.data_dir);
    match store.load(&config.name) {
        Ok(Some(state)) => info!("last recorded state of '{}' was {}", config.name, state),
        Ok(None) => info!(
            "no recorded state for '{}' in {}",
            config.name,
            store.dir().display()
        ),
        Err(err) => warn!("{}", err),
    }

    let gpio = Gpio::new()?;
    let _power = config
        .power_pin
        .map(|pin| PowerLed::from_pin(&gpio, pin))
        .transpose()?;
    let switch = GpioSwitch::new(&gpio, config.door_pin, config.pull, config.bounce)?;
    let state_led = led::state_led(&gpio, config.led_pin)?;

    let mut monitor = Monitor::new(
        config.name.as_str(),
        switch,
        state_led,
        store,
        Notifier::new(config.notify_url.as_str()),
    );
    monitor.run()
}
