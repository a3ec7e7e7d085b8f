use crate::aircraft::AircraftId;
use crate::time::ClockTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl DayStatus {
    /// Closed days take no new loads.
    pub fn blocks_new_flights(&self) -> bool {
        matches!(self, DayStatus::Completed | DayStatus::Cancelled)
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayStatus::Planned => write!(f, "planned"),
            DayStatus::Active => write!(f, "active"),
            DayStatus::Completed => write!(f, "completed"),
            DayStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One calendar day of operations for one aircraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationDay {
    pub date: NaiveDate,
    pub aircraft_id: AircraftId,
    pub status: DayStatus,
}

pub type TimeframeId = Arc<str>;

/// Customer-facing booking window. Counts bookings against its own
/// capacity; fully decoupled from seat occupancy on the loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingTimeframe {
    pub id: TimeframeId,
    pub from: ClockTime,
    pub to: ClockTime,
    pub max_bookings: u16,
    #[serde(default)]
    pub overbooking_allowed: bool,
    #[serde(default)]
    pub current_bookings: u16,
}

impl BookingTimeframe {
    /// Takes one booking. Fails on a full window unless overbooking is on.
    pub fn book(&mut self) -> bool {
        if self.current_bookings >= self.max_bookings && !self.overbooking_allowed {
            return false;
        }
        self.current_bookings += 1;
        true
    }

    pub fn release(&mut self) {
        self.current_bookings = self.current_bookings.saturating_sub(1);
    }

    pub fn is_full(&self) -> bool {
        self.current_bookings >= self.max_bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeframe(max: u16, overbooking: bool) -> BookingTimeframe {
        BookingTimeframe {
            id: Arc::from("TF_1"),
            from: ClockTime::from_hm(9, 0),
            to: ClockTime::from_hm(12, 0),
            max_bookings: max,
            overbooking_allowed: overbooking,
            current_bookings: 0,
        }
    }

    #[test]
    fn test_booking_stops_at_capacity() {
        let mut tf = timeframe(2, false);
        assert!(tf.book());
        assert!(tf.book());
        assert!(!tf.book());
        assert_eq!(2, tf.current_bookings);
    }

    #[test]
    fn test_overbooking_goes_past_capacity() {
        let mut tf = timeframe(1, true);
        assert!(tf.book());
        assert!(tf.book());
        assert!(tf.is_full());
        assert_eq!(2, tf.current_bookings);
    }

    #[test]
    fn test_release_never_underflows() {
        let mut tf = timeframe(1, false);
        tf.release();
        assert_eq!(0, tf.current_bookings);
    }
}
