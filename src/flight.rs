use crate::jumper::FlightJumper;
use crate::slots;
use crate::time::ClockTime;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tabled::Tabled;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Planned,
    Ready,
    Boarding,
    InAir,
    Completed,
    Cancelled,
}

impl FlightStatus {
    /// Next state in the forward progression, one step at a time.
    pub fn next(&self) -> Option<FlightStatus> {
        match self {
            FlightStatus::Planned => Some(FlightStatus::Ready),
            FlightStatus::Ready => Some(FlightStatus::Boarding),
            FlightStatus::Boarding => Some(FlightStatus::InAir),
            FlightStatus::InAir => Some(FlightStatus::Completed),
            FlightStatus::Completed | FlightStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Planned => write!(f, "planned"),
            FlightStatus::Ready => write!(f, "ready"),
            FlightStatus::Boarding => write!(f, "boarding"),
            FlightStatus::InAir => write!(f, "in air"),
            FlightStatus::Completed => write!(f, "completed"),
            FlightStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

fn status_cell(status: &FlightStatus) -> String {
    match status {
        FlightStatus::Planned => status.to_string().normal(),
        FlightStatus::Ready => status.to_string().cyan(),
        FlightStatus::Boarding => status.to_string().yellow(),
        FlightStatus::InAir => status.to_string().blue(),
        FlightStatus::Completed => status.to_string().green(),
        FlightStatus::Cancelled => status.to_string().red(),
    }
    .to_string()
}

fn opt_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn load_cell(jumpers: &Vec<FlightJumper>) -> String {
    jumpers.len().to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Flight {
    #[tabled(rename = "load")]
    pub flight_number: u32,
    #[tabled(rename = "time")]
    pub scheduled_time: ClockTime,
    #[tabled(rename = "altitude")]
    pub altitude_feet: u32,
    #[tabled(rename = "pilot", display("opt_cell"))]
    #[serde(default)]
    pub pilot: Option<String>,
    #[tabled(rename = "status", display("status_cell"))]
    pub status: FlightStatus,
    #[tabled(rename = "jumpers", display("load_cell"))]
    #[serde(default)]
    pub jumpers: Vec<FlightJumper>,
    #[tabled(rename = "notes", display("opt_cell"))]
    #[serde(default)]
    pub notes: Option<String>,
}

impl Flight {
    pub fn occupied(&self) -> BTreeSet<u8> {
        slots::occupied_slots(&self.jumpers)
    }
}
