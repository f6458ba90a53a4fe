//! vxectl: command-line configuration for VXE MAD R mice.

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vxe_core::debounce::Debounce;
use vxe_core::device::{list_devices, Device};
use vxe_core::dispatch::{Dispatcher, Outcome, SettingRequest};
use vxe_core::dpi::{self, Rgb, StageUpdate};
use vxe_core::error::Error;
use vxe_core::performance;
use vxe_core::polling_rate::PollingRate;
use vxe_core::sensor::{self, SensorMode};
use vxe_core::sleep::SleepTimeout;

#[derive(Parser)]
#[command(
    name = "vxectl",
    version,
    about = "Control your VXE gaming mouse from the command line"
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set device parameters.
    Set(SetArgs),
    /// Get device info.
    #[command(subcommand)]
    Info(InfoCommand),
    /// Configure individual DPI stages.
    #[command(subcommand)]
    Dpi(DpiCommand),
    /// List connected MAD R control interfaces.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SetArgs {
    /// DPI stage to enable.
    #[arg(short = 's', long, allow_negative_numbers = true)]
    dpi_stage: Option<i32>,

    /// Polling rate to set (125, 250, 500, 1000, 2000, 4000, 8000 Hz).
    #[arg(short = 'p', long)]
    polling_rate: Option<PollingRate>,

    /// Sensor setting to enable (basic, competitive, max).
    #[arg(short = 'x', long)]
    sensor: Option<SensorMode>,

    /// Debounce time in milliseconds (0, 1, 2, 4, 8, 15, 20).
    #[arg(short = 'b', long)]
    debounce: Option<Debounce>,

    /// Inactivity before sleep (30s, 1m, 2m, 3m, 5m, 20m, 25m, 30m).
    #[arg(short = 't', long)]
    sleep: Option<SleepTimeout>,
}

impl From<SetArgs> for SettingRequest {
    fn from(args: SetArgs) -> Self {
        Self {
            dpi_stage: args.dpi_stage,
            polling_rate: args.polling_rate,
            sensor_mode: args.sensor,
            debounce: args.debounce,
            sleep_timeout: args.sleep,
        }
    }
}

#[derive(Subcommand)]
enum InfoCommand {
    /// Get battery status.
    Battery {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Get the active sensor setting.
    Sensor {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Get the active DPI stage and polling rate.
    Performance {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DpiCommand {
    /// Change the DPI and/or LED colour of one stage.
    ModifyStage(ModifyStageArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("change").required(true).multiple(true).args(["x_dpi", "rgb"])))]
struct ModifyStageArgs {
    /// Stage to modify (1-8).
    #[arg(short = 's', long, value_parser = clap::value_parser!(u8).range(1..=8))]
    stage: u8,

    /// X DPI (100-30000, multiple of 50).
    #[arg(short = 'x', long)]
    x_dpi: Option<u16>,

    /// Y DPI (defaults to the X DPI).
    #[arg(short = 'y', long, requires = "x_dpi")]
    y_dpi: Option<u16>,

    /// Stage LED colour as R,G,B.
    #[arg(short = 'r', long)]
    rgb: Option<Rgb>,
}

impl From<&ModifyStageArgs> for StageUpdate {
    fn from(args: &ModifyStageArgs) -> Self {
        Self {
            x_dpi: args.x_dpi,
            y_dpi: args.y_dpi,
            rgb: args.rgb,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_device() -> Result<Device> {
    let device = Device::open()?;
    let info = device.info();
    tracing::debug!(
        path = %info.path,
        pid = format_args!("0x{:04X}", info.pid),
        variant = %device.variant(),
        "Using device"
    );
    Ok(device)
}

fn format_outcome(outcome: &Outcome) -> String {
    let setting = &outcome.setting;
    match &outcome.result {
        Ok(()) => format!("Set {} to {}", setting.label(), setting),
        Err(Error::TransportWrite(msg)) => {
            format!("Failed to send {} command: {msg}", setting.label())
        }
        Err(e) => e.to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Set(args) => {
            let device = open_device()?;
            let request = SettingRequest::from(args);
            if request.is_empty() {
                tracing::debug!("No settings requested");
            }
            let outcomes = Dispatcher::new(&device, device.variant()).apply(&request);
            // Per-setting failures are reported, not turned into an exit code.
            for outcome in &outcomes {
                println!("{}", format_outcome(outcome));
            }
        }
        Commands::Info(InfoCommand::Battery { json }) => {
            let device = open_device()?;
            let status = vxe_core::battery::read_battery(&device)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                let charging = if status.is_charging {
                    "Charging"
                } else {
                    "Not Charging"
                };
                println!(
                    "Battery: {}% | {:.2}V | {charging}",
                    status.percentage,
                    status.voltage()
                );
                if device.is_wired() && !status.is_charging {
                    println!("warning: device is wired but not charging");
                }
            }
        }
        Commands::Info(InfoCommand::Sensor { json }) => {
            let device = open_device()?;
            let mode = sensor::read_sensor_mode(&device)?;
            if json {
                let value = serde_json::json!({ "sensor_mode": mode });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("Sensor setting: {mode}");
            }
        }
        Commands::Info(InfoCommand::Performance { json }) => {
            let device = open_device()?;
            let settings = performance::read_performance(&device)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("DPI stage: {}", settings.dpi_stage);
                println!("Polling rate: {}", settings.polling_rate);
            }
        }
        Commands::Dpi(DpiCommand::ModifyStage(args)) => {
            let device = open_device()?;
            dpi::modify_stage(&device, args.stage, StageUpdate::from(&args))?;
            if let Some(x) = args.x_dpi {
                let y = args.y_dpi.unwrap_or(x);
                println!("Set DPI stage {} to {x}x{y} DPI", args.stage);
            }
            if let Some(rgb) = args.rgb {
                println!("Set DPI stage {} colour to {rgb}", args.stage);
            }
        }
        Commands::List { json } => {
            let devices = list_devices()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else if devices.is_empty() {
                println!("No VXE MAD R mice found.");
                println!("Ensure your mouse is connected and udev rules are set up.");
            } else {
                for dev in &devices {
                    let name = dev
                        .control_variant()
                        .map(|v| v.name())
                        .unwrap_or("Unknown VXE device");
                    println!(
                        "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
                        name, dev.vid, dev.pid, dev.path
                    );
                }
            }
        }
    }

    Ok(())
}
