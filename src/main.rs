//! Command-line front end: reads a schedule workbook and writes the events as JSON,
//! optionally also as an iCalendar file.
//!
//! ```sh
//! harmonogram plan.xlsx "Semestr zimowy" -o plan.json --ics plan.ics --program CS1
//! ```
use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use harmonogram::{
    ensure_supported_extension,
    export::{read_schedule, write_ics, ScheduleExport},
    schedule::EventFilter,
    ScheduleLayout, SessionType,
};
use log::info;

/// Convert a class schedule workbook into a list of sessions
#[derive(Parser, Debug)]
#[command(name = "harmonogram", version)]
struct Args {
    /// Input workbook (.xlsx or .xlsm)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Sheet to read, the active sheet when omitted
    #[arg(value_name = "SHEET")]
    sheet: Option<String>,

    /// JSON output file
    #[arg(short, long, value_name = "OUTPUT", default_value = "harmonogram.json")]
    output: PathBuf,

    /// Also write an iCalendar file
    #[arg(long, value_name = "PATH")]
    ics: Option<PathBuf>,

    /// Keep only this program
    #[arg(long)]
    program: Option<String>,

    /// Keep only this session type (W, K, LAB, PROJEKT, ĆW or the full name)
    #[arg(long = "type", value_name = "TYPE")]
    session_type: Option<SessionType>,

    /// Keep only this room
    #[arg(long)]
    room: Option<String>,

    /// Keep only sessions taught by this lecturer
    #[arg(long)]
    lecturer: Option<String>,
}

fn run(args: Args) -> Result<usize> {
    ensure_supported_extension(&args.input)?;
    let events = read_schedule(&args.input, args.sheet.as_deref(), &ScheduleLayout::default())?;
    let filter = EventFilter {
        program: args.program,
        session_type: args.session_type,
        room: args.room,
        lecturer: args.lecturer,
    };
    let events = filter.apply(events);

    if let Some(ics) = &args.ics {
        write_ics(&events, ics)?;
        info!("calendar written to {:?}", ics);
    }
    let export = ScheduleExport::new(args.input.to_string_lossy(), events);
    export.write_json(&args.output)?;
    println!("Saved {} events to {}", export.events.len(), args.output.display());
    Ok(export.events.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(Args::parse()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
