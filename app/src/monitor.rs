use std::convert::Infallible;

use log::{debug, error, info, warn};

use crate::led::Indicator;
use crate::switch::Switch;
use crate::{DoorState, Error, Notify, Persist};

pub struct Monitor<S, I, P, N> {
    name: String,
    switch: S,
    indicator: I,
    store: P,
    notifier: N,
}

impl<S, I, P, N> Monitor<S, I, P, N>
where
    S: Switch,
    I: Indicator,
    P: Persist,
    N: Notify,
{
    pub fn new<T: Into<String>>(name: T, switch: S, indicator: I, store: P, notifier: N) -> Self {
        Monitor {
            name: name.into(),
            switch,
            indicator,
            store,
            notifier,
        }
    }

    /// Run until the switch or indicator fails. The indicator is left as it was.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        info!("monitoring door '{}'", self.name);
        loop {
            self.step()?;
        }
    }

    /// One pass of the loop. Returns the state that was observed and reported.
    pub fn step(&mut self) -> Result<DoorState, Error> {
        let state = DoorState::from_pressed(self.switch.is_pressed()?);
        debug!("door '{}' is {}", self.name, state);

        self.indicator.set(state.indicator_on())?;
        self.report(state);

        match state {
            DoorState::Closed => self.switch.wait_for_release()?,
            DoorState::Open => self.switch.wait_for_press()?,
        }
        let next = state.opposite();
        info!("door '{}' {}", self.name, next.token());
        self.indicator.set(next.indicator_on())?;

        Ok(state)
    }

    fn report(&self, state: DoorState) {
        if let Err(err) = self.store.persist(&self.name, state) {
            error!("{}", err);
        }
        if let Err(err) = self.notifier.notify() {
            warn!("door '{}': {}", self.name, err);
        }
    }
}
