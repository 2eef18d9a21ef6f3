use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    /// Project a debounced switch reading onto the door. The sensor is a closed-position switch,
    /// so pressed means the door is shut.
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            DoorState::Closed
        } else {
            DoorState::Open
        }
    }

    /// The token written to the state file.
    pub fn token(self) -> &'static str {
        match self {
            DoorState::Open => "open",
            DoorState::Closed => "closed",
        }
    }

    /// The indicator is lit while the door is closed.
    pub fn indicator_on(self) -> bool {
        self == DoorState::Closed
    }

    pub fn opposite(self) -> Self {
        match self {
            DoorState::Open => DoorState::Closed,
            DoorState::Closed => DoorState::Open,
        }
    }
}

impl FromStr for DoorState {
    type Err = std::convert::Infallible;

    // Matches how state files are consumed: anything that isn't "closed" is treated as open so
    // that a torn write never reports a door as shut.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains("closed") {
            Ok(DoorState::Closed)
        } else {
            Ok(DoorState::Open)
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorState::Open => f.write_str("Open"),
            DoorState::Closed => f.write_str("Closed"),
        }
    }
}
