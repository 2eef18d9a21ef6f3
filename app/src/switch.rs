use std::thread;
use std::time::Duration;

use rppal::gpio::{Gpio, InputPin, Level, Trigger};

use crate::Error;

pub const DEFAULT_BOUNCE_MS: u64 = 20;

/// A debounced two-position switch.
pub trait Switch {
    fn is_pressed(&mut self) -> Result<bool, Error>;

    /// Block until the switch is pressed. Returns immediately if it already is.
    fn wait_for_press(&mut self) -> Result<(), Error>;

    /// Block until the switch is released. Returns immediately if it already is.
    fn wait_for_release(&mut self) -> Result<(), Error>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pull {
    /// Switch connects the pin to ground, pressed reads low.
    Up,
    /// Switch connects the pin to 3.3V, pressed reads high.
    Down,
}

impl Pull {
    fn pressed_level(self) -> Level {
        match self {
            Pull::Up => Level::Low,
            Pull::Down => Level::High,
        }
    }
}

/// The parts of an input pin the edge wait needs.
pub trait InputLine {
    fn level(&self) -> Level;

    /// Start watching for edges in both directions.
    fn arm(&mut self) -> Result<(), Error>;

    /// Block until an edge has been seen since the last call.
    fn wait_edge(&mut self) -> Result<(), Error>;

    fn disarm(&mut self) -> Result<(), Error>;
}

impl InputLine for InputPin {
    fn level(&self) -> Level {
        self.read()
    }

    fn arm(&mut self) -> Result<(), Error> {
        Ok(self.set_interrupt(Trigger::Both)?)
    }

    fn wait_edge(&mut self) -> Result<(), Error> {
        self.poll_interrupt(false, None)?;
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), Error> {
        Ok(self.clear_interrupt()?)
    }
}

pub struct GpioSwitch<P = InputPin> {
    pin: P,
    pressed: Level,
    bounce: Duration,
}

impl GpioSwitch {
    pub fn new(gpio: &Gpio, pin: u8, pull: Pull, bounce: Duration) -> Result<Self, Error> {
        let pin = gpio.get(pin)?;
        let pin = match pull {
            Pull::Up => pin.into_input_pullup(),
            Pull::Down => pin.into_input_pulldown(),
        };
        Ok(GpioSwitch::with_line(pin, pull, bounce))
    }
}

impl<P: InputLine> GpioSwitch<P> {
    pub fn with_line(pin: P, pull: Pull, bounce: Duration) -> Self {
        GpioSwitch {
            pin,
            pressed: pull.pressed_level(),
            bounce,
        }
    }

    fn level_is_pressed(&self) -> bool {
        self.pin.level() == self.pressed
    }

    /// Sleep on edges until the level settles at `pressed`. The level is re-read after each
    /// wakeup and again after the bounce interval, so contact chatter only counts once it has
    /// stopped on the target level.
    fn wait_for(&mut self, pressed: bool) -> Result<(), Error> {
        // Arm before the first read so an edge between the read and the wait isn't lost.
        self.pin.arm()?;
        loop {
            if self.level_is_pressed() == pressed {
                thread::sleep(self.bounce);
                if self.level_is_pressed() == pressed {
                    break;
                }
            }
            self.pin.wait_edge()?;
        }
        self.pin.disarm()
    }
}

impl<P: InputLine> Switch for GpioSwitch<P> {
    fn is_pressed(&mut self) -> Result<bool, Error> {
        Ok(self.level_is_pressed())
    }

    fn wait_for_press(&mut self) -> Result<(), Error> {
        self.wait_for(true)
    }

    fn wait_for_release(&mut self) -> Result<(), Error> {
        self.wait_for(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    const BOUNCE: Duration = Duration::from_millis(1);

    /// Plays back a list of levels, one per read, holding the last one.
    struct ScriptedLine {
        levels: RefCell<VecDeque<Level>>,
        last: RefCell<Level>,
        edges: usize,
        armed: bool,
    }

    impl ScriptedLine {
        fn new(levels: &[Level]) -> Self {
            ScriptedLine {
                levels: RefCell::new(levels.iter().copied().collect()),
                last: RefCell::new(levels[0]),
                edges: 0,
                armed: false,
            }
        }
    }

    impl InputLine for ScriptedLine {
        fn level(&self) -> Level {
            if let Some(level) = self.levels.borrow_mut().pop_front() {
                *self.last.borrow_mut() = level;
            }
            *self.last.borrow()
        }

        fn arm(&mut self) -> Result<(), Error> {
            self.armed = true;
            Ok(())
        }

        fn wait_edge(&mut self) -> Result<(), Error> {
            assert!(self.armed);
            if self.levels.borrow().is_empty() {
                return Err(Error::Hardware(String::from("no more edges")));
            }
            self.edges += 1;
            Ok(())
        }

        fn disarm(&mut self) -> Result<(), Error> {
            self.armed = false;
            Ok(())
        }
    }

    #[test]
    fn pressed_level_follows_pull() {
        assert_eq!(Pull::Up.pressed_level(), Level::Low);
        assert_eq!(Pull::Down.pressed_level(), Level::High);
    }

    #[test]
    fn already_at_target_returns_without_waiting() {
        let mut switch =
            GpioSwitch::with_line(ScriptedLine::new(&[Level::Low, Level::Low]), Pull::Up, BOUNCE);
        switch.wait_for_press().unwrap();
        assert_eq!(switch.pin.edges, 0);
        assert!(!switch.pin.armed);
    }

    #[test]
    fn bounce_is_ridden_out() {
        use Level::*;
        // Released, then a press that chatters once before it holds.
        let line = ScriptedLine::new(&[High, Low, High, Low, Low]);
        let mut switch = GpioSwitch::with_line(line, Pull::Up, BOUNCE);
        switch.wait_for_press().unwrap();
        assert_eq!(switch.pin.edges, 2);
        assert!(switch.pin.levels.borrow().is_empty());
        assert!(!switch.pin.armed);
    }

    #[test]
    fn release_with_pull_down() {
        use Level::*;
        let line = ScriptedLine::new(&[High, Low, Low]);
        let mut switch = GpioSwitch::with_line(line, Pull::Down, BOUNCE);
        switch.wait_for_release().unwrap();
        assert_eq!(switch.pin.edges, 1);
        assert!(!switch.is_pressed().unwrap());
    }

    #[test]
    fn never_settling_keeps_waiting() {
        use Level::*;
        let line = ScriptedLine::new(&[High, Low, High]);
        let mut switch = GpioSwitch::with_line(line, Pull::Up, BOUNCE);
        assert!(switch.wait_for_press().is_err());
    }
}
