use crate::day::DayStatus;
use crate::flight::{Flight, FlightStatus};
use crate::jumper::{FlightJumper, JumperKind, PaymentType};
use crate::manifest::manifest::Manifest;
use crate::time::ClockTime;
use crate::voucher::CheckOutcome;
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::Tabled;
use tracing::error;

mod aircraft;
mod day;
mod error;
mod flight;
mod jumper;
mod manifest;
mod slots;
mod time;
mod voucher;

#[derive(Parser)]
struct Args {
    /// Path to the JSON operation-day file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "seats")]
    seats: String,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "type")]
    kind: String,
    #[tabled(rename = "jumpers")]
    names: String,
    #[tabled(rename = "payment")]
    payment: String,
    #[tabled(rename = "jumped")]
    jumped: String,
}

impl BoardRow {
    fn new(jumper: &FlightJumper) -> BoardRow {
        let seats = if jumper.footprint() > 1 {
            format!("{}-{}", jumper.slot_number, jumper.slot_number + jumper.footprint() - 1)
        } else {
            jumper.slot_number.to_string()
        };
        let payment = jumper
            .payment
            .as_ref()
            .map(|p| {
                let mut cell = p.payment_type.to_string();
                if let Some(code) = &p.voucher_number {
                    cell.push_str(&format!(" {}", code));
                }
                if let Some(amount) = p.payment_amount {
                    cell.push_str(&format!(" ({})", amount));
                }
                cell
            })
            .unwrap_or_default();
        BoardRow {
            seats,
            id: jumper.id.to_string(),
            kind: match jumper.kind {
                JumperKind::Sport { .. } => "sport".to_string(),
                JumperKind::Tandem { .. } => "tandem".to_string(),
            },
            names: jumper.kind.to_string(),
            payment,
            jumped: if jumper.jump_completed { "yes".to_string() } else { String::new() },
        }
    }
}

#[derive(Tabled)]
struct TimeframeRow {
    #[tabled(rename = "timeframe")]
    id: String,
    #[tabled(rename = "window")]
    window: String,
    #[tabled(rename = "bookings")]
    bookings: String,
    #[tabled(rename = "overbooking")]
    overbooking: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn parse_number(part: Option<&&str>) -> Option<u32> {
    part.and_then(|s| s.parse().ok())
}

fn parse_time(part: Option<&&str>) -> Option<ClockTime> {
    part.and_then(|s| s.parse().ok())
}

fn print_board(manifest: &Manifest, number: u32) {
    match manifest.flight(number) {
        Ok(flight) => {
            if flight.jumpers.is_empty() {
                println!("Load {} is empty.", number);
            } else {
                print_table(flight.jumpers.iter().map(BoardRow::new).collect());
            }
            let occupied = flight.occupied();
            let free: Vec<String> = (1..=manifest.capacity())
                .filter(|s| !occupied.contains(s))
                .map(|s| s.to_string())
                .collect();
            println!("Free seats: {}", if free.is_empty() { "none".to_string() } else { free.join(", ") });
        }
        Err(e) => println!("Rejected: {}", e),
    }
}

fn report_outcome(result: Result<(), crate::error::ManifestError>, done: &str) {
    match result {
        Ok(()) => println!("{}", done),
        Err(e) => println!("Rejected: {}", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let scenario = args.scenario.to_str().unwrap_or("data/default.json").to_string();
    let mut manifest = Manifest::load_from_file(&scenario)?;
    println!(
        "Manifest online. {} on {}, {} loads.",
        manifest.aircraft.name,
        manifest.day.date,
        manifest.flights.len()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "board".to_string(),
            "new".to_string(),
            "delete".to_string(),
            "sport".to_string(),
            "tandem".to_string(),
            "drop".to_string(),
            "postpone".to_string(),
            "cascade".to_string(),
            "advance".to_string(),
            "cancel".to_string(),
            "reactivate".to_string(),
            "voucher".to_string(),
            "day".to_string(),
            "tf".to_string(),
            "book".to_string(),
            "unbook".to_string(),
            "save".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).map(|s| *s).unwrap_or("a");
                        let filtered: Vec<&Flight> = manifest.flights.iter()
                            .filter(|f| match sub {
                                "p" | "planned" => f.status == FlightStatus::Planned,
                                "r" | "ready" => f.status == FlightStatus::Ready,
                                "b" | "boarding" => f.status == FlightStatus::Boarding,
                                "i" | "air" => f.status == FlightStatus::InAir,
                                "c" | "completed" => f.status == FlightStatus::Completed,
                                "x" | "cancelled" => f.status == FlightStatus::Cancelled,
                                _ => true, // 'ls' or 'ls a'
                            })
                            .collect();
                        if filtered.is_empty() {
                            println!("No matching loads found.")
                        } else {
                            let mut table = tabled::Table::new(&filtered);
                            table.with(Style::rounded());
                            table.with(tabled::settings::Alignment::left());
                            if filtered.len() > 20 {
                                paginate(table.to_string());
                            } else {
                                println!("{}", table);
                            }
                        }
                    },
                    "board" => {
                        if let Some(number) = parse_number(parts.get(1)) {
                            print_board(&manifest, number);
                        } else {
                            println!("Usage: board <flight>");
                        }
                    },
                    "new" => {
                        match (parse_number(parts.get(1)), parse_time(parts.get(2)), parse_number(parts.get(3))) {
                            (Some(number), Some(at), Some(altitude)) => {
                                report_outcome(
                                    manifest.add_flight(number, at, altitude, None, None),
                                    &format!("Load {} scheduled at {}.", number, at),
                                );
                            }
                            _ => println!("Usage: new <flight> <HH:MM> <altitude_feet>"),
                        }
                    },
                    "delete" => {
                        if let Some(number) = parse_number(parts.get(1)) {
                            report_outcome(manifest.delete_flight(number), &format!("Load {} deleted.", number));
                        } else {
                            println!("Usage: delete <flight>");
                        }
                    },
                    "sport" => {
                        match (parse_number(parts.get(1)), parts.get(2)) {
                            (Some(number), Some(name)) => {
                                let slot = parts.get(3).and_then(|s| s.parse().ok());
                                match manifest.add_sport_jumper(number, name, slot, None) {
                                    Ok(slot) => println!("{} on load {}, seat {}.", name, number, slot),
                                    Err(e) => println!("Rejected: {}", e),
                                }
                            }
                            _ => println!("Usage: sport <flight> <name> [seat]"),
                        }
                    },
                    "tandem" => {
                        let number = parse_number(parts.get(1));
                        let payment = parts.get(4).and_then(|s| match *s {
                            "cash" => Some(PaymentType::Cash),
                            "voucher" => Some(PaymentType::Voucher),
                            "pending" => Some(PaymentType::Pending),
                            _ => None,
                        });
                        match (number, parts.get(2), parts.get(3), payment) {
                            (Some(number), Some(master), Some(passenger), Some(payment)) => {
                                let (code, slot_part) = if payment == PaymentType::Voucher {
                                    (parts.get(5).copied(), parts.get(6))
                                } else {
                                    (None, parts.get(5))
                                };
                                let slot = slot_part.and_then(|s| s.parse().ok());
                                match manifest.add_tandem_pair(number, master, passenger, payment, code, slot, None) {
                                    Ok(slot) => println!("Tandem on load {}, seats {}-{}.", number, slot, slot + 1),
                                    Err(e) => println!("Rejected: {}", e),
                                }
                            }
                            _ => println!("Usage: tandem <flight> <master> <passenger> <cash|voucher|pending> [code] [seat]"),
                        }
                    },
                    "drop" => {
                        if let Some(id) = parts.get(1) {
                            report_outcome(manifest.remove_jumper(id), &format!("Jumper {} removed.", id));
                        } else {
                            println!("Usage: drop <jumper_id>");
                        }
                    },
                    "postpone" => {
                        match (parse_number(parts.get(1)), parse_time(parts.get(2))) {
                            (Some(number), Some(at)) => {
                                report_outcome(manifest.postpone(number, at), &format!("Load {} moved to {}.", number, at));
                            }
                            _ => println!("Usage: postpone <flight> <HH:MM>"),
                        }
                    },
                    "cascade" => {
                        match (parse_number(parts.get(1)), parse_time(parts.get(2))) {
                            (Some(number), Some(at)) => {
                                let interval = parts.get(3).and_then(|s| s.parse().ok());
                                match manifest.postpone_cascade(number, at, interval) {
                                    Ok(()) => {
                                        let moved = manifest.last_report.as_ref().map(|r| r.moved.len()).unwrap_or(0);
                                        println!("Load {} moved to {}; {} later loads shifted.", number, at, moved);
                                    }
                                    Err(e) => println!("Rejected: {}", e),
                                }
                            }
                            _ => println!("Usage: cascade <flight> <HH:MM> [interval_minutes]"),
                        }
                    },
                    "advance" => {
                        if let Some(number) = parse_number(parts.get(1)) {
                            match manifest.advance(number) {
                                Ok(status) => println!("Load {} is now {}.", number, status),
                                Err(e) => println!("Rejected: {}", e),
                            }
                        } else {
                            println!("Usage: advance <flight>");
                        }
                    },
                    "cancel" => {
                        if let Some(number) = parse_number(parts.get(1)) {
                            report_outcome(manifest.cancel(number), &format!("Load {} cancelled.", number));
                        } else {
                            println!("Usage: cancel <flight>");
                        }
                    },
                    "reactivate" => {
                        if let Some(number) = parse_number(parts.get(1)) {
                            report_outcome(manifest.reactivate(number), &format!("Load {} back to planned.", number));
                        } else {
                            println!("Usage: reactivate <flight>");
                        }
                    },
                    "voucher" => {
                        if let Some(code) = parts.get(1) {
                            match manifest.check_voucher(code) {
                                CheckOutcome::Valid(v) => println!(
                                    "Voucher {} ok: {} for {}, price {}, valid until {}.",
                                    v.code, v.kind, v.purchaser, v.price, v.valid_until
                                ),
                                CheckOutcome::Invalid(reason) => println!("Voucher rejected: {}", reason),
                            }
                        } else {
                            println!("Usage: voucher <code>");
                        }
                    },
                    "day" => {
                        match parts.get(1) {
                            None => println!(
                                "{} with {} ({} seats), day is {}.",
                                manifest.day.date,
                                manifest.aircraft.name,
                                manifest.capacity(),
                                manifest.day.status
                            ),
                            Some(s) => {
                                let status = match *s {
                                    "planned" => Some(DayStatus::Planned),
                                    "active" => Some(DayStatus::Active),
                                    "completed" => Some(DayStatus::Completed),
                                    "cancelled" => Some(DayStatus::Cancelled),
                                    _ => None,
                                };
                                match status {
                                    Some(status) => {
                                        manifest.set_day_status(status);
                                        println!("Day is now {}.", status);
                                    }
                                    None => println!("Usage: day [planned|active|completed|cancelled]"),
                                }
                            }
                        }
                    },
                    "tf" => {
                        if manifest.timeframes.is_empty() {
                            println!("No booking timeframes on this day.");
                        } else {
                            print_table(manifest.timeframes.iter().map(|tf| TimeframeRow {
                                id: tf.id.to_string(),
                                window: format!("{}-{}", tf.from, tf.to),
                                bookings: format!("{}/{}", tf.current_bookings, tf.max_bookings),
                                overbooking: if tf.overbooking_allowed { "yes".to_string() } else { "no".to_string() },
                            }).collect());
                        }
                    },
                    "book" => {
                        if let Some(id) = parts.get(1) {
                            match manifest.book_timeframe(id) {
                                Ok(count) => println!("Booked; {} now holds {} bookings.", id, count),
                                Err(e) => println!("Rejected: {}", e),
                            }
                        } else {
                            println!("Usage: book <timeframe>");
                        }
                    },
                    "unbook" => {
                        if let Some(id) = parts.get(1) {
                            match manifest.release_timeframe(id) {
                                Ok(count) => println!("Released; {} now holds {} bookings.", id, count),
                                Err(e) => println!("Rejected: {}", e),
                            }
                        } else {
                            println!("Usage: unbook <timeframe>");
                        }
                    },
                    "save" => {
                        let path = parts.get(1).map(|s| s.to_string()).unwrap_or_else(|| scenario.clone());
                        match manifest.save_to_file(&path) {
                            Ok(()) => println!("Saved to {}.", path),
                            Err(e) => {
                                error!(path = %path, "save failed: {}", e);
                                println!("Save failed: {}", e);
                            }
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [status]                  - List loads, filter: p r b i c x");
                        println!("  board <flight>               - Show the seat board for one load");
                        println!("  new <n> <HH:MM> <alt>        - Schedule a new load");
                        println!("  delete <flight>              - Delete an empty, unflown load");
                        println!("  sport <n> <name> [seat]      - Manifest a sport jumper");
                        println!("  tandem <n> <m> <p> <pay> [code] [seat] - Manifest a tandem pair");
                        println!("  drop <jumper_id>             - Take a jumper off the board");
                        println!("  postpone <n> <HH:MM>         - Move one load");
                        println!("  cascade <n> <HH:MM> [int]    - Move a load and shift later ones");
                        println!("  advance <flight>             - Next status step");
                        println!("  cancel / reactivate <flight> - Cancel or bring back a load");
                        println!("  voucher <code>               - Check a voucher code");
                        println!("  day [status]                 - Show or set the day status");
                        println!("  tf / book / unbook           - Booking timeframes");
                        println!("  save [path]                  - Write the day back to disk");
                        println!("  help / ?                     - Show this help menu");
                        println!("  exit / quit                  - Leave the manifest\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
