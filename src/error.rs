use crate::day::DayStatus;
use crate::flight::FlightStatus;
use crate::slots::SlotError;
use thiserror::Error;

/// Everything a staff action can be rejected for. Validation failures
/// surface before any state is touched; there is no partial mutation to
/// roll back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("flight {0} not found")]
    FlightNotFound(u32),

    #[error("flight {0} already exists on this day")]
    DuplicateFlight(u32),

    #[error("jumper {0} not found")]
    JumperNotFound(String),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error("flight {0} is completed and can no longer change")]
    FlightCompleted(u32),

    #[error("flight {0} is cancelled, reactivate it first")]
    FlightCancelled(u32),

    #[error("cannot move flight from {from} to {to}")]
    InvalidTransition {
        from: FlightStatus,
        to: FlightStatus,
    },

    #[error("flight {0} still has jumpers manifested")]
    JumpersPresent(u32),

    #[error("operation day is {0}, new flights are blocked")]
    DayClosed(DayStatus),

    #[error("voucher payment needs a voucher code")]
    VoucherRequired,

    #[error("voucher {code} rejected: {reason}")]
    VoucherRejected { code: String, reason: String },

    #[error("timeframe {0} not found")]
    TimeframeNotFound(String),

    #[error("timeframe {0} is fully booked")]
    TimeframeFull(String),
}
