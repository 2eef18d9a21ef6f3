use std::thread;
use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};

use crate::Error;

const BLINK_DURATION: Duration = Duration::from_millis(100);

/// An on/off light.
pub trait Indicator {
    fn set(&mut self, on: bool) -> Result<(), Error>;

    fn on(&mut self) -> Result<(), Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Error> {
        self.set(false)
    }
}

impl Indicator for OutputPin {
    fn set(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.set_high();
        } else {
            self.set_low();
        }
        Ok(())
    }
}

/// The door state LED. It keeps whatever level it was last given when the process exits.
pub fn state_led(gpio: &Gpio, pin: u8) -> Result<OutputPin, Error> {
    let mut led = gpio.get(pin)?.into_output();
    led.set_reset_on_drop(false);
    Ok(led)
}

pub fn flash<I: Indicator>(led: &mut I, times: u8) -> Result<(), Error> {
    for _ in 0..times {
        led.on()?;
        thread::sleep(BLINK_DURATION);
        led.off()?;
        thread::sleep(BLINK_DURATION);
    }
    Ok(())
}

/// Holds the "power on" LED lit for as long as it's alive.
///
/// Dropping the guard switches the LED off. That happens when the monitor gives up and `main`
/// unwinds its scope; a kill signal skips it and leaves the LED lit.
pub struct PowerLed<I: Indicator> {
    led: I,
}

impl<I: Indicator> PowerLed<I> {
    pub fn acquire(mut led: I) -> Result<Self, Error> {
        flash(&mut led, 2)?;
        led.on()?;
        Ok(PowerLed { led })
    }
}

impl PowerLed<OutputPin> {
    pub fn from_pin(gpio: &Gpio, pin: u8) -> Result<Self, Error> {
        PowerLed::acquire(gpio.get(pin)?.into_output())
    }
}

impl<I: Indicator> Drop for PowerLed<I> {
    fn drop(&mut self) {
        if let Err(err) = self.led.off() {
            log::error!("unable to switch off power LED: {}", err);
        }
    }
}
