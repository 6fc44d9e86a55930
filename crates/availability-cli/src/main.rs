//! `avail` CLI: list bookable slots and check requested times from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Open slots for a week, reading the business bundle from a file
//! avail -i salon.json slots --business biz-1 --service cut --from 2026-03-16 --days 7
//!
//! # Every candidate slot, booked or not
//! avail -i salon.json slots --business biz-1 --service cut --from 2026-03-16 --days 1 --all
//!
//! # Can 10:30 be booked? Suggestions are included when it cannot.
//! cat salon.json | avail check --business biz-1 --service cut --date 2026-03-16 --time 10:30
//!
//! # Slots rendered for a customer in another timezone
//! avail -i salon.json localize --business biz-1 --service cut --from 2026-03-16 \
//!     --days 1 --customer-tz Europe/London --dst skip
//!
//! # Engine settings (suggestion count, buffer policy, cache) from JSON
//! avail --config engine.json -i salon.json check ...
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (e.g. `RUST_LOG=availability_engine=debug`).

use anyhow::{Context, Result};
use availability_engine::{
    AvailabilityResponse, BookingEngine, BusinessBundle, CheckAvailabilityRequest, DstPolicy,
    EngineConfig, MemoryStore, SlotsRequest,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avail",
    version,
    about = "Appointment slot generation and availability checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Business bundle JSON, one object or an array (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Engine configuration JSON file
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots for a date range
    Slots {
        #[command(flatten)]
        range: SlotRange,
        /// Include slots already taken by appointments
        #[arg(long)]
        all: bool,
    },
    /// Check whether a requested start time can be booked
    Check {
        #[arg(long)]
        business: String,
        #[arg(long)]
        service: String,
        /// Appointment date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM, 24-hour)
        #[arg(long)]
        time: String,
        /// Appointment being rescheduled; ignored when looking for overlaps
        #[arg(long)]
        exclude: Option<String>,
        /// Skip alternative suggestions when the slot is taken
        #[arg(long)]
        no_suggestions: bool,
    },
    /// List open slots in a customer's timezone
    Localize {
        #[command(flatten)]
        range: SlotRange,
        /// Customer IANA timezone (e.g. "Europe/London")
        #[arg(long)]
        customer_tz: String,
        /// Handling of slots that start in a DST gap
        #[arg(long, value_enum, default_value_t = DstArg::WallClock)]
        dst: DstArg,
    },
}

#[derive(Args)]
struct SlotRange {
    #[arg(long)]
    business: String,
    #[arg(long)]
    service: String,
    /// First date (YYYY-MM-DD)
    #[arg(long)]
    from: String,
    /// Number of days, starting at --from
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    days: i64,
    /// Slot length in minutes (defaults to the service duration)
    #[arg(long)]
    duration: Option<i64>,
    /// Gap after each slot in minutes (defaults to the service buffer)
    #[arg(long, allow_negative_numbers = true)]
    buffer: Option<i64>,
    /// Hide slots starting before this local time (YYYY-MM-DDTHH:MM)
    #[arg(long)]
    not_before: Option<String>,
}

impl SlotRange {
    fn into_request(self, exclude_booked: bool) -> SlotsRequest {
        SlotsRequest {
            business_id: self.business,
            service_id: self.service,
            start_date: self.from,
            days: self.days,
            slot_duration: self.duration,
            buffer_time: self.buffer,
            exclude_booked,
            not_before: self.not_before,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DstArg {
    Skip,
    ShiftForward,
    WallClock,
}

impl From<DstArg> for DstPolicy {
    fn from(arg: DstArg) -> Self {
        match arg {
            DstArg::Skip => DstPolicy::Skip,
            DstArg::ShiftForward => DstPolicy::ShiftForward,
            DstArg::WallClock => DstPolicy::WallClock,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Bundles {
    Many(Vec<BusinessBundle>),
    One(Box<BusinessBundle>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_path(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    let store = load_store(cli.input.as_deref())?;
    let engine = BookingEngine::new(store, config);

    let rendered = match cli.command {
        Commands::Slots { range, all } => {
            let request = range.into_request(!all);
            let slots = engine.slots(&request).await.context("Failed to list slots")?;
            debug!(count = slots.len(), "listed slots");
            to_json(&slots)?
        }
        Commands::Check {
            business,
            service,
            date,
            time,
            exclude,
            no_suggestions,
        } => {
            let request = CheckAvailabilityRequest {
                business_id: business,
                service_id: service,
                appointment_date: date,
                start_time: time,
                exclude_appointment_id: exclude,
                include_suggestions: !no_suggestions,
            };
            let report = engine
                .validate_booking_request(&request)
                .await
                .context("Failed to check availability")?;
            to_json(&AvailabilityResponse::from(report))?
        }
        Commands::Localize {
            range,
            customer_tz,
            dst,
        } => {
            let query = range.into_request(true).parse()?;
            let slots = engine
                .localized_slots(&query, &customer_tz, dst.into())
                .await
                .context("Failed to localize slots")?;
            to_json(&slots)?
        }
    };

    write_output(cli.output.as_deref(), &rendered)
}

fn load_store(path: Option<&str>) -> Result<MemoryStore> {
    let json = read_input(path)?;
    let bundles: Bundles =
        serde_json::from_str(&json).context("Failed to parse business bundle JSON")?;
    Ok(match bundles {
        Bundles::Many(bundles) => MemoryStore::from_bundles(bundles),
        Bundles::One(bundle) => MemoryStore::from_bundle(*bundle),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
