use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Minutes since midnight on the operation day's clock.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(pub u16);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid clock time {0:?}, expected HH:MM")]
pub struct ParseClockTimeError(String);

impl ClockTime {
    pub fn from_hm(hours: u16, minutes: u16) -> ClockTime {
        ClockTime((hours * 60 + minutes) % MINUTES_PER_DAY as u16)
    }

    pub fn minutes(&self) -> i32 {
        self.0 as i32
    }

    /// Shift by a signed number of minutes. Wraps on the 24h clock; the
    /// calendar date never moves, even past midnight.
    pub fn shift(&self, delta: i32) -> ClockTime {
        ClockTime((self.minutes() + delta).rem_euclid(MINUTES_PER_DAY) as u16)
    }

    /// Signed distance in minutes from `other` to `self`.
    pub fn delta_from(&self, other: ClockTime) -> i32 {
        self.minutes() - other.minutes()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let h: u16 = h.parse().map_err(|_| err())?;
        let m: u16 = m.parse().map_err(|_| err())?;
        if h > 23 || m > 59 {
            return Err(err());
        }
        Ok(ClockTime(h * 60 + m))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> String {
        t.to_string()
    }
}
