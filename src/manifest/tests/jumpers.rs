use crate::error::ManifestError;
use crate::flight::FlightStatus::{Boarding, Completed, Planned};
use crate::jumper::PaymentType;
use crate::manifest::tests::utils::{add_flight, manifest, manifest_with_vouchers, sport, voucher};
use crate::slots::SlotError;
use std::collections::BTreeSet;

#[test]
fn test_sport_takes_first_free_slot() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);

    assert_eq!(Ok(1), manifest.add_sport_jumper(1, "A. Nowak", None, None));
    assert_eq!(Ok(2), manifest.add_sport_jumper(1, "B. Krol", None, None));
}

#[test]
fn test_board_fills_like_the_reference_day() {
    // capacity 10, empty load: sport lands on 1, tandem on 2-3,
    // occupancy {1,2,3}, seven seats left
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);

    assert_eq!(Ok(1), manifest.add_sport_jumper(1, "A. Nowak", None, None));
    assert_eq!(
        Ok(2),
        manifest.add_tandem_pair(1, "M. Wolf", "P. Stone", PaymentType::Cash, None, None, None)
    );

    let occupied = manifest.flight(1).unwrap().occupied();
    assert_eq!(BTreeSet::from([1, 2, 3]), occupied);
    assert_eq!(7, manifest.capacity() as usize - occupied.len());
}

#[test]
fn test_tandem_skips_single_gap() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);

    manifest.add_sport_jumper(1, "A", Some(2), None).unwrap();
    // seat 1 is free but has no neighbour; the pair goes to 3-4
    assert_eq!(
        Ok(3),
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Pending, None, None, None)
    );
}

#[test]
fn test_explicit_slot_conflicts_rejected() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);
    manifest.add_sport_jumper(1, "A", Some(3), None).unwrap();

    assert_eq!(
        Err(ManifestError::Slot(SlotError::Taken { slot: 3 })),
        manifest.add_sport_jumper(1, "B", Some(3), None)
    );
    // tandem starting at 2 needs seat 3 as well
    assert_eq!(
        Err(ManifestError::Slot(SlotError::Taken { slot: 3 })),
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Cash, None, Some(2), None)
    );
    assert_eq!(
        Err(ManifestError::Slot(SlotError::NotEnoughConsecutive { slot: 10 })),
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Cash, None, Some(10), None)
    );
}

#[test]
fn test_full_load_rejects_even_the_fallback_seat() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(2, flights);
    manifest.add_sport_jumper(1, "A", None, None).unwrap();
    manifest.add_sport_jumper(1, "B", None, None).unwrap();

    // the finder falls back to seat 1; validation still refuses it
    assert_eq!(
        Err(ManifestError::Slot(SlotError::Taken { slot: 1 })),
        manifest.add_sport_jumper(1, "C", None, None)
    );
    assert_eq!(
        Err(ManifestError::Slot(SlotError::NoFreeRun { needed: 2 })),
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Cash, None, None, None)
    );
}

#[test]
fn test_remove_then_reseat() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);
    manifest.add_sport_jumper(1, "A", None, None).unwrap();
    manifest
        .add_tandem_pair(1, "M", "P", PaymentType::Cash, None, None, None)
        .unwrap();

    manifest.remove_jumper("1-1").unwrap();
    // seat 1 opened back up
    assert_eq!(Ok(1), manifest.add_sport_jumper(1, "B", None, None));
    assert_eq!(
        Err(ManifestError::JumperNotFound("9-9".to_string())),
        manifest.remove_jumper("9-9")
    );
}

#[test]
fn test_completed_flight_blocks_jumper_changes() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Completed);
    let mut manifest = manifest(10, flights);
    manifest.flights[0].jumpers.push(sport(1, 1, "A"));

    assert_eq!(
        Err(ManifestError::FlightCompleted(1)),
        manifest.add_sport_jumper(1, "B", None, None)
    );
    assert_eq!(
        Err(ManifestError::FlightCompleted(1)),
        manifest.remove_jumper("1-1")
    );
}

#[test]
fn test_boarding_flight_still_accepts_jumpers() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Boarding);
    let mut manifest = manifest(10, flights);

    assert_eq!(Ok(1), manifest.add_sport_jumper(1, "late check-in", None, None));
}

#[test]
fn test_voucher_payment_sets_amount_and_redeems() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest_with_vouchers(
        10,
        flights,
        vec![voucher("TDM-100", 250, "2026-12-31", false)],
    );

    let slot = manifest
        .add_tandem_pair(1, "M", "P", PaymentType::Voucher, Some("TDM-100"), None, None)
        .unwrap();
    let jumper = &manifest.flight(1).unwrap().jumpers[0];
    let payment = jumper.payment.as_ref().unwrap();
    assert_eq!(1, slot);
    assert_eq!(Some(250), payment.payment_amount);
    assert_eq!(Some("TDM-100".to_string()), payment.voucher_number);
    assert!(payment.payment_received);

    // second use of the same code fails
    assert!(matches!(
        manifest.add_tandem_pair(1, "M2", "P2", PaymentType::Voucher, Some("TDM-100"), None, None),
        Err(ManifestError::VoucherRejected { .. })
    ));
}

#[test]
fn test_voucher_payment_requires_code() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);

    assert_eq!(
        Err(ManifestError::VoucherRequired),
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Voucher, None, None, None)
    );
    assert!(manifest.flight(1).unwrap().jumpers.is_empty());
}

#[test]
fn test_unknown_and_expired_vouchers_rejected() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest_with_vouchers(
        10,
        flights,
        vec![voucher("TDM-OLD", 220, "2025-01-01", false)],
    );

    assert!(matches!(
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Voucher, Some("NOPE"), None, None),
        Err(ManifestError::VoucherRejected { ref code, .. }) if code == "NOPE"
    ));
    assert!(matches!(
        manifest.add_tandem_pair(1, "M", "P", PaymentType::Voucher, Some("TDM-OLD"), None, None),
        Err(ManifestError::VoucherRejected { ref code, .. }) if code == "TDM-OLD"
    ));
    assert!(manifest.flight(1).unwrap().jumpers.is_empty());
}

#[test]
fn test_pending_payment_not_marked_received() {
    let mut flights = Vec::new();
    add_flight(&mut flights, 1, "09:00", Planned);
    let mut manifest = manifest(10, flights);

    manifest
        .add_tandem_pair(1, "M", "P", PaymentType::Pending, None, None, None)
        .unwrap();
    let payment = manifest.flight(1).unwrap().jumpers[0].payment.as_ref().unwrap();
    assert!(!payment.payment_received);
    assert_eq!(None, payment.payment_amount);
}
