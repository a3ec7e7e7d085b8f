use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type AircraftId = Arc<str>;

/// Capacity assumed for aircraft registered without an explicit limit.
pub const DEFAULT_CAPACITY: u8 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: AircraftId,
    pub name: String,
    pub max_jumpers: Option<u8>,
}

impl Aircraft {
    pub fn capacity(&self) -> u8 {
        self.max_jumpers.unwrap_or(DEFAULT_CAPACITY)
    }
}
