use crate::aircraft::Aircraft;
use crate::day::{BookingTimeframe, DayStatus, OperationDay};
use crate::flight::{Flight, FlightStatus};
use crate::jumper::{FlightJumper, JumperKind};
use crate::manifest::manifest::Manifest;
use crate::time::ClockTime;
use crate::voucher::{Voucher, VoucherBook};
use chrono::NaiveDate;
use std::sync::Arc;

pub fn time(s: &str) -> ClockTime {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn aircraft(capacity: u8) -> Aircraft {
    Aircraft {
        id: Arc::from("C208"),
        name: "Caravan".to_string(),
        max_jumpers: Some(capacity),
    }
}

pub fn day(status: DayStatus) -> OperationDay {
    OperationDay {
        date: date("2026-06-13"),
        aircraft_id: Arc::from("C208"),
        status,
    }
}

pub fn add_flight(flights: &mut Vec<Flight>, number: u32, at: &str, status: FlightStatus) {
    flights.push(Flight {
        flight_number: number,
        scheduled_time: time(at),
        altitude_feet: 13000,
        pilot: None,
        status,
        jumpers: vec![],
        notes: None,
    });
}

pub fn sport(number: u32, slot: u8, name: &str) -> FlightJumper {
    FlightJumper {
        id: Arc::from(format!("{}-{}", number, slot)),
        kind: JumperKind::Sport {
            jumper: name.to_string(),
        },
        slot_number: slot,
        slots_occupied: Some(1),
        payment: None,
        jump_completed: false,
        notes: None,
    }
}

pub fn tandem(number: u32, slot: u8) -> FlightJumper {
    FlightJumper {
        id: Arc::from(format!("{}-{}", number, slot)),
        kind: JumperKind::Tandem {
            master: "M. Wolf".to_string(),
            passenger: "P. Stone".to_string(),
        },
        slot_number: slot,
        slots_occupied: Some(2),
        payment: None,
        jump_completed: false,
        notes: None,
    }
}

pub fn voucher(code: &str, price: u32, valid_until: &str, redeemed: bool) -> Voucher {
    Voucher {
        code: code.to_string(),
        kind: "tandem".to_string(),
        price,
        purchaser: "E. Lis".to_string(),
        valid_until: date(valid_until),
        redeemed,
    }
}

pub fn timeframe(id: &str, max: u16, overbooking: bool) -> BookingTimeframe {
    BookingTimeframe {
        id: Arc::from(id),
        from: time("09:00"),
        to: time("12:00"),
        max_bookings: max,
        overbooking_allowed: overbooking,
        current_bookings: 0,
    }
}

pub fn manifest(capacity: u8, flights: Vec<Flight>) -> Manifest {
    Manifest::new(
        aircraft(capacity),
        day(DayStatus::Active),
        flights,
        vec![],
        VoucherBook::default(),
    )
}

pub fn manifest_with_vouchers(
    capacity: u8,
    flights: Vec<Flight>,
    vouchers: Vec<Voucher>,
) -> Manifest {
    Manifest::new(
        aircraft(capacity),
        day(DayStatus::Active),
        flights,
        vec![],
        VoucherBook::new(vouchers),
    )
}
