use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type JumperId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumperKind {
    Sport { jumper: String },
    Tandem { master: String, passenger: String },
}

impl JumperKind {
    /// Seats a fresh assignment of this kind takes up.
    pub fn slots_needed(&self) -> u8 {
        match self {
            JumperKind::Sport { .. } => 1,
            JumperKind::Tandem { .. } => 2,
        }
    }

    pub fn is_tandem(&self) -> bool {
        matches!(self, JumperKind::Tandem { .. })
    }
}

impl fmt::Display for JumperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumperKind::Sport { jumper } => write!(f, "{}", jumper),
            JumperKind::Tandem { master, passenger } => write!(f, "{} + {}", master, passenger),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Cash,
    Voucher,
    Pending,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Cash => write!(f, "cash"),
            PaymentType::Voucher => write!(f, "voucher"),
            PaymentType::Pending => write!(f, "pending"),
        }
    }
}

/// Tandem payment details; sport jumpers settle outside the manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_type: PaymentType,
    #[serde(default)]
    pub payment_received: bool,
    pub voucher_number: Option<String>,
    pub payment_amount: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightJumper {
    pub id: JumperId,
    #[serde(flatten)]
    pub kind: JumperKind,
    pub slot_number: u8,
    pub slots_occupied: Option<u8>,
    #[serde(default)]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub jump_completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FlightJumper {
    /// Width used for occupancy math. An absent width counts as a single
    /// slot even for tandems; records written before the width field
    /// existed carry no value.
    pub fn occupancy_width(&self) -> u8 {
        self.slots_occupied.unwrap_or(1)
    }

    /// Width shown on the board. A tandem without a stored width is drawn
    /// spanning both seats.
    pub fn footprint(&self) -> u8 {
        self.slots_occupied.unwrap_or_else(|| self.kind.slots_needed())
    }

    /// Inclusive seat range this record occupies.
    pub fn slot_range(&self) -> (u8, u8) {
        (
            self.slot_number,
            self.slot_number + self.occupancy_width() - 1,
        )
    }
}
