use crate::aircraft::Aircraft;
use crate::day::{BookingTimeframe, DayStatus, OperationDay};
use crate::error::ManifestError;
use crate::flight::{Flight, FlightStatus};
use crate::jumper::{FlightJumper, JumperKind, Payment, PaymentType};
use crate::slots;
use crate::slots::SlotError;
use crate::time::ClockTime;
use crate::voucher::{CheckOutcome, Voucher, VoucherBook};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of the last schedule shift, kept around for the UI to report.
pub struct ShiftReport {
    pub flight: u32,
    pub delta_minutes: i32,
    pub moved: Vec<(u32, ClockTime)>,
}

/// One operation day's board: the aircraft, its loads in take-off order,
/// the booking windows and the voucher book. All mutations validate
/// against the in-memory state before touching it.
pub struct Manifest {
    pub aircraft: Aircraft,
    pub day: OperationDay,
    pub flights: Vec<Flight>,
    flights_index: HashMap<u32, usize>,
    pub timeframes: Vec<BookingTimeframe>,
    pub vouchers: VoucherBook,
    pub last_report: Option<ShiftReport>,
}

#[derive(Serialize, Deserialize)]
struct ScenarioFile {
    aircraft: Aircraft,
    day: OperationDay,
    flights: Vec<Flight>,
    #[serde(default)]
    timeframes: Vec<BookingTimeframe>,
    #[serde(default)]
    vouchers: Vec<Voucher>,
}

impl Manifest {
    pub fn new(
        aircraft: Aircraft,
        day: OperationDay,
        mut flights: Vec<Flight>,
        timeframes: Vec<BookingTimeframe>,
        vouchers: VoucherBook,
    ) -> Manifest {
        flights.sort_by_key(|f| f.scheduled_time);
        let flights_index = flights
            .iter()
            .enumerate()
            .map(|(i, f)| (f.flight_number, i))
            .collect::<HashMap<u32, usize>>();
        let manifest = Manifest {
            aircraft,
            day,
            flights,
            flights_index,
            timeframes,
            vouchers,
            last_report: None,
        };
        manifest.assert_invariants();
        manifest
    }

    pub fn load_from_file(path: &str) -> io::Result<Manifest> {
        let data = std::fs::read_to_string(path)?;
        let raw: ScenarioFile = serde_json::from_str(&data)?;
        Ok(Manifest::new(
            raw.aircraft,
            raw.day,
            raw.flights,
            raw.timeframes,
            VoucherBook::new(raw.vouchers),
        ))
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let raw = ScenarioFile {
            aircraft: self.aircraft.clone(),
            day: self.day.clone(),
            flights: self.flights.clone(),
            timeframes: self.timeframes.clone(),
            vouchers: self.vouchers.all(),
        };
        let data = serde_json::to_string_pretty(&raw)?;
        std::fs::write(path, data)
    }

    pub fn capacity(&self) -> u8 {
        self.aircraft.capacity()
    }

    pub fn flight(&self, number: u32) -> Result<&Flight, ManifestError> {
        self.flights_index
            .get(&number)
            .map(|i| &self.flights[*i])
            .ok_or(ManifestError::FlightNotFound(number))
    }

    fn flight_mut(&mut self, number: u32) -> Result<&mut Flight, ManifestError> {
        match self.flights_index.get(&number) {
            Some(i) => Ok(&mut self.flights[*i]),
            None => Err(ManifestError::FlightNotFound(number)),
        }
    }

    /// Looks up a flight that is still allowed to change. Completed loads
    /// are a hard boundary for every mutation.
    fn open_flight_mut(&mut self, number: u32) -> Result<&mut Flight, ManifestError> {
        let flight = self.flight_mut(number)?;
        if flight.status == FlightStatus::Completed {
            return Err(ManifestError::FlightCompleted(number));
        }
        Ok(flight)
    }

    fn reindex(&mut self) {
        self.flights_index = self
            .flights
            .iter()
            .enumerate()
            .map(|(i, f)| (f.flight_number, i))
            .collect();
    }

    pub fn add_flight(
        &mut self,
        number: u32,
        scheduled_time: ClockTime,
        altitude_feet: u32,
        pilot: Option<String>,
        notes: Option<String>,
    ) -> Result<(), ManifestError> {
        if self.day.status.blocks_new_flights() {
            return Err(ManifestError::DayClosed(self.day.status));
        }
        if self.flights_index.contains_key(&number) {
            return Err(ManifestError::DuplicateFlight(number));
        }
        self.flights.push(Flight {
            flight_number: number,
            scheduled_time,
            altitude_feet,
            pilot,
            status: FlightStatus::Planned,
            jumpers: vec![],
            notes,
        });
        self.flights.sort_by_key(|f| f.scheduled_time);
        self.reindex();
        info!(flight = number, time = %scheduled_time, "flight added");
        self.assert_invariants();
        Ok(())
    }

    /// Hard delete. Only possible for an empty, not-yet-flown load; the
    /// alternative for anything else is cancellation.
    pub fn delete_flight(&mut self, number: u32) -> Result<(), ManifestError> {
        let idx = *self
            .flights_index
            .get(&number)
            .ok_or(ManifestError::FlightNotFound(number))?;
        let flight = &self.flights[idx];
        if flight.status == FlightStatus::Completed {
            return Err(ManifestError::FlightCompleted(number));
        }
        if !flight.jumpers.is_empty() {
            return Err(ManifestError::JumpersPresent(number));
        }
        self.flights.remove(idx);
        self.reindex();
        info!(flight = number, "flight deleted");
        Ok(())
    }

    /// Manifests a sport jumper onto one seat. Without an explicit seat
    /// the first free one is taken.
    pub fn add_sport_jumper(
        &mut self,
        number: u32,
        name: &str,
        slot: Option<u8>,
        notes: Option<String>,
    ) -> Result<u8, ManifestError> {
        let capacity = self.aircraft.capacity();
        let flight = self.open_flight_mut(number)?;
        let occupied = flight.occupied();
        let kind = JumperKind::Sport {
            jumper: name.to_string(),
        };
        let slot = slot.unwrap_or_else(|| slots::next_single_slot(&occupied, capacity));
        slots::validate_assignment(&kind, slot, &occupied, capacity)?;
        flight.jumpers.push(FlightJumper {
            id: Arc::from(format!("{}-{}", number, slot)),
            kind,
            slot_number: slot,
            slots_occupied: Some(1),
            payment: None,
            jump_completed: false,
            notes,
        });
        info!(flight = number, slot, jumper = name, "sport jumper manifested");
        self.assert_invariants();
        Ok(slot)
    }

    /// Manifests a tandem pair onto two consecutive seats. A voucher
    /// payment needs a code the voucher book accepts for the day's date;
    /// the amount is taken from the voucher and the code is redeemed once
    /// the pair is on the board.
    #[allow(clippy::too_many_arguments)]
    pub fn add_tandem_pair(
        &mut self,
        number: u32,
        master: &str,
        passenger: &str,
        payment_type: PaymentType,
        voucher_code: Option<&str>,
        slot: Option<u8>,
        notes: Option<String>,
    ) -> Result<u8, ManifestError> {
        let capacity = self.aircraft.capacity();
        let date = self.day.date;
        let (voucher_number, payment_amount) = match payment_type {
            PaymentType::Voucher => {
                let code = voucher_code.ok_or(ManifestError::VoucherRequired)?;
                match self.vouchers.check(code, date) {
                    CheckOutcome::Valid(v) => (Some(code.to_string()), Some(v.price)),
                    CheckOutcome::Invalid(reason) => {
                        return Err(ManifestError::VoucherRejected {
                            code: code.to_string(),
                            reason,
                        });
                    }
                }
            }
            _ => (None, None),
        };

        let flight = self.open_flight_mut(number)?;
        let occupied = flight.occupied();
        let kind = JumperKind::Tandem {
            master: master.to_string(),
            passenger: passenger.to_string(),
        };
        let slot = match slot {
            Some(s) => s,
            None => slots::next_consecutive_slots(&occupied, capacity, 2)
                .ok_or(SlotError::NoFreeRun { needed: 2 })?,
        };
        slots::validate_assignment(&kind, slot, &occupied, capacity)?;
        let payment_received = matches!(payment_type, PaymentType::Cash | PaymentType::Voucher);
        flight.jumpers.push(FlightJumper {
            id: Arc::from(format!("{}-{}", number, slot)),
            kind,
            slot_number: slot,
            slots_occupied: Some(2),
            payment: Some(Payment {
                payment_type,
                payment_received,
                voucher_number: voucher_number.clone(),
                payment_amount,
            }),
            jump_completed: false,
            notes,
        });
        if let Some(code) = voucher_number {
            self.vouchers.redeem(&code);
        }
        info!(flight = number, slot, master, passenger, "tandem pair manifested");
        self.assert_invariants();
        Ok(slot)
    }

    /// There is no move operation; a misplaced jumper comes off the board
    /// and goes back on.
    pub fn remove_jumper(&mut self, id: &str) -> Result<(), ManifestError> {
        for flight in &mut self.flights {
            if let Some(pos) = flight.jumpers.iter().position(|j| &*j.id == id) {
                if flight.status == FlightStatus::Completed {
                    return Err(ManifestError::FlightCompleted(flight.flight_number));
                }
                flight.jumpers.remove(pos);
                info!(flight = flight.flight_number, jumper = id, "jumper removed");
                return Ok(());
            }
        }
        Err(ManifestError::JumperNotFound(id.to_string()))
    }

    /// Replaces one flight's time. Nothing else moves.
    pub fn postpone(&mut self, number: u32, new_time: ClockTime) -> Result<(), ManifestError> {
        let flight = self.open_flight_mut(number)?;
        let delta = new_time.delta_from(flight.scheduled_time);
        flight.scheduled_time = new_time;
        info!(flight = number, time = %new_time, delta, "flight postponed");
        self.last_report = Some(ShiftReport {
            flight: number,
            delta_minutes: delta,
            moved: vec![],
        });
        Ok(())
    }

    /// Shifts a flight and drags every later load in the list along by
    /// the same delta. A custom interval overrides the delta for the
    /// immediately following load only; the rest keep their natural
    /// shift. Times wrap on the 24h clock. Already-flown loads keep their
    /// recorded times.
    pub fn postpone_cascade(
        &mut self,
        number: u32,
        new_time: ClockTime,
        custom_interval: Option<i32>,
    ) -> Result<(), ManifestError> {
        let idx = *self
            .flights_index
            .get(&number)
            .ok_or(ManifestError::FlightNotFound(number))?;
        if self.flights[idx].status == FlightStatus::Completed {
            return Err(ManifestError::FlightCompleted(number));
        }
        let delta = new_time.delta_from(self.flights[idx].scheduled_time);
        self.flights[idx].scheduled_time = new_time;

        let mut moved = vec![];
        let mut position = 0;
        for flight in self.flights.iter_mut().skip(idx + 1) {
            if flight.status == FlightStatus::Completed {
                continue;
            }
            let shifted = match (position, custom_interval) {
                (0, Some(interval)) => new_time.shift(interval),
                _ => flight.scheduled_time.shift(delta),
            };
            debug!(flight = flight.flight_number, from = %flight.scheduled_time, to = %shifted, "cascade shift");
            flight.scheduled_time = shifted;
            moved.push((flight.flight_number, shifted));
            position += 1;
        }
        info!(flight = number, delta, moved = moved.len(), "cascade postponement applied");
        self.last_report = Some(ShiftReport {
            flight: number,
            delta_minutes: delta,
            moved,
        });
        self.assert_invariants();
        Ok(())
    }

    /// Moves a flight to a requested state. Forward progression goes one
    /// step at a time; cancellation works from any state that has not
    /// flown, and a cancelled load can only come back as planned.
    pub fn transition(&mut self, number: u32, to: FlightStatus) -> Result<(), ManifestError> {
        let flight = self.flight_mut(number)?;
        let from = flight.status;
        match (from, to) {
            (FlightStatus::Completed, _) => Err(ManifestError::FlightCompleted(number)),
            (_, FlightStatus::Cancelled) => {
                flight.status = FlightStatus::Cancelled;
                info!(flight = number, "flight cancelled");
                Ok(())
            }
            (FlightStatus::Cancelled, FlightStatus::Planned) => {
                flight.status = FlightStatus::Planned;
                info!(flight = number, "flight reactivated");
                Ok(())
            }
            (FlightStatus::Cancelled, _) => Err(ManifestError::FlightCancelled(number)),
            _ if from.next() == Some(to) => {
                flight.status = to;
                if to == FlightStatus::Completed {
                    for jumper in flight.jumpers.iter_mut().filter(|j| j.kind.is_tandem()) {
                        jumper.jump_completed = true;
                    }
                }
                info!(flight = number, from = %from, to = %to, "flight status advanced");
                Ok(())
            }
            _ => Err(ManifestError::InvalidTransition { from, to }),
        }
    }

    /// One step forward in the lifecycle.
    pub fn advance(&mut self, number: u32) -> Result<FlightStatus, ManifestError> {
        let from = self.flight(number)?.status;
        let to = match from {
            FlightStatus::Completed => return Err(ManifestError::FlightCompleted(number)),
            FlightStatus::Cancelled => return Err(ManifestError::FlightCancelled(number)),
            _ => match from.next() {
                Some(to) => to,
                None => return Err(ManifestError::FlightCompleted(number)),
            },
        };
        self.transition(number, to)?;
        Ok(to)
    }

    pub fn cancel(&mut self, number: u32) -> Result<(), ManifestError> {
        self.transition(number, FlightStatus::Cancelled)
    }

    pub fn reactivate(&mut self, number: u32) -> Result<(), ManifestError> {
        self.transition(number, FlightStatus::Planned)
    }

    /// Day status moves freely; closing the day only blocks new flights.
    pub fn set_day_status(&mut self, status: DayStatus) {
        info!(from = %self.day.status, to = %status, "day status changed");
        self.day.status = status;
    }

    pub fn check_voucher(&self, code: &str) -> CheckOutcome {
        self.vouchers.check(code, self.day.date)
    }

    pub fn book_timeframe(&mut self, id: &str) -> Result<u16, ManifestError> {
        let tf = self
            .timeframes
            .iter_mut()
            .find(|tf| &*tf.id == id)
            .ok_or_else(|| ManifestError::TimeframeNotFound(id.to_string()))?;
        if !tf.book() {
            return Err(ManifestError::TimeframeFull(id.to_string()));
        }
        info!(timeframe = id, bookings = tf.current_bookings, "booking taken");
        Ok(tf.current_bookings)
    }

    pub fn release_timeframe(&mut self, id: &str) -> Result<u16, ManifestError> {
        let tf = self
            .timeframes
            .iter_mut()
            .find(|tf| &*tf.id == id)
            .ok_or_else(|| ManifestError::TimeframeNotFound(id.to_string()))?;
        tf.release();
        info!(timeframe = id, bookings = tf.current_bookings, "booking released");
        Ok(tf.current_bookings)
    }

    fn assert_invariants(&self) {
        let capacity = self.aircraft.capacity();
        debug_assert!(
            self.flights.iter().all(|f| {
                let mut seen = BTreeSet::new();
                f.jumpers.iter().all(|j| {
                    let (lo, hi) = j.slot_range();
                    lo >= 1 && hi <= capacity && (lo..=hi).all(|s| seen.insert(s))
                })
            }),
            "Slot ranges overlap or leave the aircraft"
        );

        debug_assert!(
            self.flights
                .iter()
                .enumerate()
                .all(|(i, f)| self.flights_index.get(&f.flight_number) == Some(&i)),
            "Flight number index out of sync"
        );
    }
}
