//! Command line control of Ocean Optics spectrometers
//!
//! # Usage Examples
//!
//! ## List attached devices
//! ```bash
//! oceanctl list
//! ```
//!
//! ## Device information and status
//! ```bash
//! oceanctl --product 0x1022 info
//! ```
//!
//! ## Acquire ten spectra to CSV
//! ```bash
//! oceanctl acquire --count 10 --integration-ms 200 --csv spectrum.csv
//! ```
//!
//! ## Hex dump the EEPROM slots
//! ```bash
//! oceanctl eeprom
//! ```
//!
//! ## Without hardware
//! ```bash
//! oceanctl --simulate acquire --hexdump
//! ```

mod output;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use oceanspec::registry::{self, DeviceId};
use oceanspec::{DeviceSelector, ReaderConfig, Session, SessionConfig, SpectrumReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Control Ocean Optics USB spectrometers", long_about = None)]
struct Args {
    /// USB vendor id (hex accepted, e.g. 0x2457)
    #[arg(long, value_parser = parse_id, default_value = "0x2457", global = true)]
    vendor: u16,

    /// USB product id (hex accepted, e.g. 0x1026)
    #[arg(long, value_parser = parse_id, default_value = "0x1026", global = true)]
    product: u16,

    /// Use the simulated NIRQuest512 instead of a USB device
    #[arg(long, default_value_t = false, global = true)]
    simulate: bool,

    /// Per-transfer timeout in milliseconds
    #[arg(long, default_value_t = 1000, global = true)]
    timeout_ms: u64,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List attached supported devices
    List,
    /// Print serial number, temperatures, pixel count and status
    Info,
    /// Hex dump every device-info (EEPROM) slot
    Eeprom,
    /// Acquire spectra
    Acquire {
        /// Number of spectra to acquire
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Integration time in milliseconds (device setting kept if unset)
        #[arg(short, long)]
        integration_ms: Option<u32>,

        /// Write the last spectrum as CSV to this file
        #[arg(long)]
        csv: Option<String>,

        /// Hex dump the raw bytes of each transfer
        #[arg(long, default_value_t = false)]
        hexdump: bool,
    },
    /// Switch the lamp strobe output
    Strobe { state: Switch },
    /// Switch the detector fan
    Fan { state: Switch },
    /// Switch external triggering
    Trigger { state: Switch },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

fn parse_id(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("Invalid USB id: {}", s))
}

impl Args {
    fn selector(&self) -> DeviceSelector {
        if self.simulate {
            DeviceSelector::Simulated
        } else {
            DeviceSelector::Usb {
                vendor: self.vendor,
                product: self.product,
            }
        }
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_timeout(Duration::from_millis(self.timeout_ms))
    }

    fn open(&self) -> oceanspec::Result<Session> {
        let mut session = Session::new(self.session_config());
        session.open_selector(self.selector())?;
        Ok(session)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let status = e.status_code();
            eprintln!("error: {} ({}, {})", e, status.name(), status.code());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> oceanspec::Result<()> {
    match &args.command {
        Cmd::List => list(),
        Cmd::Info => info_cmd(args),
        Cmd::Eeprom => eeprom(args),
        Cmd::Acquire {
            count,
            integration_ms,
            csv,
            hexdump,
        } => acquire(args, *count, *integration_ms, csv.as_deref(), *hexdump),
        Cmd::Strobe { state } => args.open()?.enable_strobe(state.enabled()),
        Cmd::Fan { state } => args.open()?.enable_fan(state.enabled()),
        Cmd::Trigger { state } => args.open()?.enable_external_trigger(state.enabled()),
    }
}

fn list() -> oceanspec::Result<()> {
    let devices = oceanspec::list_devices()?;
    if devices.is_empty() {
        println!("No supported devices found");
        return Ok(());
    }

    for dev in devices {
        let name = registry::lookup(DeviceId::new(dev.vendor, dev.product))
            .map_or("unknown", |entry| entry.name);
        println!(
            "Bus {:03} Device {:03}: ID {:04x}:{:04x} {}",
            dev.bus, dev.address, dev.vendor, dev.product, name
        );
    }
    Ok(())
}

fn info_cmd(args: &Args) -> oceanspec::Result<()> {
    let mut session = args.open()?;
    let (major, minor, patch) = oceanspec::library_version();

    let mut out = stdout().lock();
    writeln!(out, "library version: {}.{}.{}", major, minor, patch)?;
    if let Some(model) = session.model() {
        writeln!(out, "model: {}", model)?;
    }
    writeln!(out, "serial: {}", session.get_serial()?)?;
    writeln!(out, "temperature: {}", session.get_temperature()?)?;
    writeln!(out, "pixels: {}", session.get_pixel_count()?)?;
    writeln!(out, "integration time: {} ms", session.get_integration_time()?)?;
    session.dump_status(&mut out)?;
    Ok(())
}

fn eeprom(args: &Args) -> oceanspec::Result<()> {
    let mut session = args.open()?;
    let slots = session.dump_device_info(&mut stdout().lock())?;
    info!("{} device-info slots read", slots);
    Ok(())
}

fn acquire(
    args: &Args,
    count: usize,
    integration_ms: Option<u32>,
    csv: Option<&str>,
    hexdump: bool,
) -> oceanspec::Result<()> {
    let config = ReaderConfig {
        device: args.selector(),
        session: args.session_config(),
        integration_time_ms: integration_ms,
    };
    let reader = SpectrumReader::new(&config)?;
    info!(
        "acquiring {} spectra ({} samples each)",
        count,
        reader.spectrum().len()
    );

    let mut last = None;
    for acquisition in reader.take(count) {
        let acquisition = acquisition?;
        debug!("spectrum #{}: {} samples", acquisition.index, acquisition.len());
        if hexdump {
            let mut out = stdout().lock();
            writeln!(out, "spectrum #{}:", acquisition.index)?;
            output::write_hexdump(&mut out, &acquisition.raw)?;
        }
        last = Some(acquisition);
    }

    if let (Some(path), Some(acquisition)) = (csv, &last) {
        let file = BufWriter::new(File::create(path)?);
        let points = acquisition
            .wavelengths
            .iter()
            .copied()
            .zip(acquisition.intensities.iter().copied());
        output::write_csv(file, points)?;
        info!("wrote {}", path);
    }
    Ok(())
}
