use crate::jumper::{FlightJumper, JumperKind};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot {slot} is outside 1..={capacity}")]
    OutOfRange { slot: u8, capacity: u8 },

    #[error("slot {slot} is already taken")]
    Taken { slot: u8 },

    #[error("not enough consecutive slots from slot {slot}")]
    NotEnoughConsecutive { slot: u8 },

    #[error("no run of {needed} consecutive free slots left")]
    NoFreeRun { needed: u8 },
}

/// Seats taken on a load. Each record contributes every seat in its
/// stored range; a record without a width contributes its own seat only.
pub fn occupied_slots(jumpers: &[FlightJumper]) -> BTreeSet<u8> {
    jumpers
        .iter()
        .flat_map(|j| {
            let (lo, hi) = j.slot_range();
            lo..=hi
        })
        .collect()
}

/// First free seat scanning up from 1. Falls back to 1 on a full load so
/// a form can pre-fill something; committing re-validates.
pub fn next_single_slot(occupied: &BTreeSet<u8>, capacity: u8) -> u8 {
    (1..=capacity).find(|s| !occupied.contains(s)).unwrap_or(1)
}

/// First-fit start of a fully free run of `needed` seats, left to right.
pub fn next_consecutive_slots(occupied: &BTreeSet<u8>, capacity: u8, needed: u8) -> Option<u8> {
    if needed == 0 || needed > capacity {
        return None;
    }
    (1..=capacity - needed + 1).find(|start| (*start..start + needed).all(|s| !occupied.contains(&s)))
}

/// Checks a proposed seat assignment against the current board before
/// anything is committed. Sport takes one seat, tandem takes the seat and
/// the one after it.
pub fn validate_assignment(
    kind: &JumperKind,
    slot: u8,
    occupied: &BTreeSet<u8>,
    capacity: u8,
) -> Result<(), SlotError> {
    if slot == 0 || slot > capacity {
        return Err(SlotError::OutOfRange { slot, capacity });
    }
    let last = slot + kind.slots_needed() - 1;
    if last > capacity {
        return Err(SlotError::NotEnoughConsecutive { slot });
    }
    for s in slot..=last {
        if occupied.contains(&s) {
            return Err(SlotError::Taken { slot: s });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sport(slot: u8) -> FlightJumper {
        FlightJumper {
            id: Arc::from(format!("1-{}", slot)),
            kind: JumperKind::Sport {
                jumper: format!("S{}", slot),
            },
            slot_number: slot,
            slots_occupied: Some(1),
            payment: None,
            jump_completed: false,
            notes: None,
        }
    }

    fn tandem(slot: u8) -> FlightJumper {
        FlightJumper {
            id: Arc::from(format!("1-{}", slot)),
            kind: JumperKind::Tandem {
                master: "M".to_string(),
                passenger: "P".to_string(),
            },
            slot_number: slot,
            slots_occupied: Some(2),
            payment: None,
            jump_completed: false,
            notes: None,
        }
    }

    #[test]
    fn test_occupancy_unions_ranges() {
        let jumpers = vec![sport(1), tandem(2), sport(5)];
        let occupied = occupied_slots(&jumpers);
        assert_eq!(BTreeSet::from([1, 2, 3, 5]), occupied);
    }

    #[test]
    fn test_occupancy_is_idempotent() {
        let jumpers = vec![sport(4), tandem(7)];
        assert_eq!(occupied_slots(&jumpers), occupied_slots(&jumpers));
    }

    #[test]
    fn test_next_single_skips_taken_seats() {
        let occupied = BTreeSet::from([1, 2, 4]);
        assert_eq!(3, next_single_slot(&occupied, 10));
    }

    #[test]
    fn test_next_single_full_load_falls_back_to_one() {
        let occupied: BTreeSet<u8> = (1..=4).collect();
        assert_eq!(1, next_single_slot(&occupied, 4));
    }

    #[test]
    fn test_next_consecutive_first_fit() {
        // seat 2 free but alone; first pair is 5-6
        let occupied = BTreeSet::from([1, 3, 4]);
        assert_eq!(Some(5), next_consecutive_slots(&occupied, 10, 2));
    }

    #[test]
    fn test_next_consecutive_none_when_fragmented() {
        let occupied = BTreeSet::from([2, 4, 6]);
        assert_eq!(None, next_consecutive_slots(&occupied, 6, 2));
        assert_eq!(None, next_consecutive_slots(&occupied, 6, 7));
    }

    #[test]
    fn test_validate_sport() {
        let occupied = BTreeSet::from([1]);
        let kind = JumperKind::Sport {
            jumper: "S".to_string(),
        };
        assert_eq!(Ok(()), validate_assignment(&kind, 2, &occupied, 10));
        assert_eq!(
            Err(SlotError::Taken { slot: 1 }),
            validate_assignment(&kind, 1, &occupied, 10)
        );
        assert_eq!(
            Err(SlotError::OutOfRange { slot: 11, capacity: 10 }),
            validate_assignment(&kind, 11, &occupied, 10)
        );
        assert_eq!(
            Err(SlotError::OutOfRange { slot: 0, capacity: 10 }),
            validate_assignment(&kind, 0, &occupied, 10)
        );
    }

    #[test]
    fn test_validate_tandem_needs_both_seats() {
        let kind = JumperKind::Tandem {
            master: "M".to_string(),
            passenger: "P".to_string(),
        };
        let occupied = BTreeSet::from([3]);
        assert_eq!(Ok(()), validate_assignment(&kind, 4, &occupied, 10));
        // second seat taken
        assert_eq!(
            Err(SlotError::Taken { slot: 3 }),
            validate_assignment(&kind, 2, &occupied, 10)
        );
        // would hang off the end of the plane
        assert_eq!(
            Err(SlotError::NotEnoughConsecutive { slot: 10 }),
            validate_assignment(&kind, 10, &occupied, 10)
        );
    }
}
