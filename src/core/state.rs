use serde::{Deserialize, Serialize};
use std::fmt;

/// Monitoring state of a single check result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    #[default]
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl State {
    pub fn as_int(self) -> i32 {
        match self {
            State::Ok => 0,
            State::Warn => 1,
            State::Crit => 2,
            State::Unknown => 3,
        }
    }

    /// Short name used in plugin output (`OK`, `WARN`, `CRIT`, `UNKN`)
    pub fn name(self) -> &'static str {
        match self {
            State::Ok => "OK",
            State::Warn => "WARN",
            State::Crit => "CRIT",
            State::Unknown => "UNKN",
        }
    }

    /// Plain-text marker appended when colors are not available
    pub fn marker(self) -> &'static str {
        match self {
            State::Ok => "",
            State::Warn => "(!)",
            State::Crit => "(!!)",
            State::Unknown => "(?)",
        }
    }

    /// Worst of two states. CRIT outranks UNKNOWN, which outranks WARN.
    pub fn worst(self, other: State) -> State {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }

    fn severity(self) -> u8 {
        match self {
            State::Ok => 0,
            State::Warn => 1,
            State::Unknown => 2,
            State::Crit => 3,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for State {
    type Error = crate::LevelcheckError;

    fn try_from(value: i32) -> crate::Result<Self> {
        match value {
            0 => Ok(State::Ok),
            1 => Ok(State::Warn),
            2 => Ok(State::Crit),
            3 => Ok(State::Unknown),
            other => Err(crate::LevelcheckError::invalid_parameter(format!(
                "unknown state code {}",
                other
            ))),
        }
    }
}
