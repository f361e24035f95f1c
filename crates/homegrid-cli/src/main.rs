//! Command-line interface for homegrid.
//!
//! Owns process wiring: constructs the storage backend, the device
//! directory, and the command executor, then drives them from subcommands.
//! This is a local inspection tool, not a transport layer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use homegrid_core::{Device, DeviceInfo, DeviceName, StatePatch, StateSnapshot, StateStore};
use homegrid_engine::{CommandExecutor, CommandRequest};
use homegrid_storage::{DeviceDirectory, RedbBackend, RedbConfig};

/// Homegrid device-control service tooling.
#[derive(Parser, Debug)]
#[command(name = "homegrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Database file path.
    #[arg(long, global = true, default_value = "./data/homegrid.redb")]
    db: PathBuf,

    /// User the operation acts for.
    #[arg(short, long, global = true, default_value = "demo-user")]
    user: String,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Register a demo device fleet for the user.
    Seed,
    /// List the user's devices.
    Devices,
    /// Print a device's current state.
    State {
        /// Device ID.
        device: String,
    },
    /// Execute a device command.
    Exec {
        /// Device ID.
        device: String,
        /// Command identifier, full or short form (e.g. "OnOff").
        command: String,
        /// Command parameters as a JSON object.
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
    /// Flip a device's connectivity status.
    SetOnline {
        /// Device ID.
        device: String,
        /// New online status.
        #[arg(action = clap::ArgAction::Set)]
        online: bool,
    },
    /// Remove a device.
    Unregister {
        /// Device ID.
        device: String,
    },
    /// List all supported commands and their field specs.
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backend = RedbBackend::new(RedbConfig::new(&args.db))
        .with_context(|| format!("opening database at {}", args.db.display()))?;
    let directory = Arc::new(DeviceDirectory::new(Arc::new(backend)));

    match args.command {
        Command::Seed => seed(&directory, &args.user),
        Command::Devices => devices(&directory, &args.user),
        Command::State { device } => state(&directory, &args.user, &device),
        Command::Exec {
            device,
            command,
            params,
        } => exec(directory, &args.user, &device, &command, &params).await,
        Command::SetOnline { device, online } => {
            set_online(&directory, &args.user, &device, online).await
        }
        Command::Unregister { device } => {
            let removed = directory.unregister_device(&args.user, &device)?;
            if removed {
                println!("unregistered {}", device);
            } else {
                println!("no such device: {}", device);
            }
            Ok(())
        }
        Command::Commands => {
            list_commands();
            Ok(())
        }
    }
}

fn seed(directory: &DeviceDirectory, user: &str) -> Result<()> {
    directory.register_user(user)?;

    let info = |model: &str| DeviceInfo {
        manufacturer: "homegrid labs".to_string(),
        model: model.to_string(),
        hw_version: "1.0".to_string(),
        sw_version: "1.0.1".to_string(),
    };

    directory.register_device(
        user,
        Device::new("light-1", "LIGHT", DeviceName::new("Ceiling Light"))
            .with_trait("action.devices.traits.OnOff")
            .with_trait("action.devices.traits.Brightness")
            .with_trait("action.devices.traits.ColorSetting")
            .with_device_info(info("gl-100")),
        StateSnapshot::new(true)
            .with_field("on", json!(false))
            .with_field("brightness", json!(100)),
    )?;

    directory.register_device(
        user,
        Device::new("washer-1", "WASHER", DeviceName::new("Washer"))
            .with_trait("action.devices.traits.OnOff")
            .with_trait("action.devices.traits.StartStop")
            .with_trait("action.devices.traits.Modes")
            .with_trait("action.devices.traits.Toggles")
            .with_device_info(info("gw-200")),
        StateSnapshot::new(true)
            .with_field("on", json!(false))
            .with_field("isRunning", json!(false))
            .with_field("isPaused", json!(false))
            .with_field("currentModeSettings", json!({"load": "small"}))
            .with_field("currentToggleSettings", json!({"sterilization": false})),
    )?;

    directory.register_device(
        user,
        Device::new("thermostat-1", "THERMOSTAT", DeviceName::new("Thermostat"))
            .with_trait("action.devices.traits.TemperatureSetting")
            .with_device_info(info("gt-300")),
        StateSnapshot::new(true)
            .with_field("thermostatMode", json!("off"))
            .with_field("thermostatTemperatureSetpoint", json!(20.0))
            .with_field("thermostatTemperatureAmbient", json!(21.5))
            .with_field("thermostatHumidityAmbient", json!(45)),
    )?;

    directory.register_device(
        user,
        Device::new("blinds-1", "BLINDS", DeviceName::new("Blinds"))
            .with_trait("action.devices.traits.OpenClose")
            .with_attribute("openDirection", json!(["UP", "DOWN"]))
            .with_device_info(info("gb-400")),
        StateSnapshot::new(true).with_field(
            "openState",
            json!([
                {"openDirection": "UP", "openPercent": 0},
                {"openDirection": "DOWN", "openPercent": 0},
            ]),
        ),
    )?;

    directory.register_device(
        user,
        Device::new("oven-1", "OVEN", DeviceName::new("Oven"))
            .with_trait("action.devices.traits.OnOff")
            .with_trait("action.devices.traits.Timer")
            .with_device_info(info("go-500")),
        StateSnapshot::new(true)
            .with_field("on", json!(false))
            .with_field("timerRemainingSec", json!(-1))
            .with_field("timerPaused", json!(false)),
    )?;

    directory.register_device(
        user,
        Device::new("alarm-1", "SECURITYSYSTEM", DeviceName::new("Alarm"))
            .with_trait("action.devices.traits.ArmDisarm")
            .with_device_info(info("ga-600")),
        StateSnapshot::new(true)
            .with_field("isArmed", json!(false))
            .with_field("currentArmLevel", json!("L1")),
    )?;

    println!("seeded 6 devices for {}", user);
    Ok(())
}

fn devices(directory: &DeviceDirectory, user: &str) -> Result<()> {
    let docs = directory.devices(user)?;
    if docs.is_empty() {
        println!("no devices for {} (try `homegrid seed`)", user);
        return Ok(());
    }
    for doc in docs {
        println!(
            "{:<16} {:<16} online={:<5} \"{}\"",
            doc.device.id,
            doc.device.device_type,
            doc.states.online,
            doc.device.name.name,
        );
    }
    Ok(())
}

fn state(directory: &DeviceDirectory, user: &str, device: &str) -> Result<()> {
    let doc = directory.device(user, device)?;
    println!("{}", serde_json::to_string_pretty(&doc.states)?);
    Ok(())
}

async fn exec(
    directory: Arc<DeviceDirectory>,
    user: &str,
    device: &str,
    command: &str,
    params: &str,
) -> Result<()> {
    let params: Value = serde_json::from_str(params).context("params must be valid JSON")?;

    // Accept short names for convenience.
    let identifier = if command.contains('.') {
        command.to_string()
    } else {
        format!("{}{}", homegrid_engine::COMMAND_PREFIX, command)
    };

    let executor = CommandExecutor::new(directory);
    let request = CommandRequest::new(identifier).with_params(params);

    match executor.execute(user, device, &request).await {
        Ok(result) => {
            let response = json!({ "status": "SUCCESS", "states": result });
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            let response = json!({ "status": "ERROR", "errorCode": err.error_code() });
            println!("{}", serde_json::to_string_pretty(&response)?);
            anyhow::bail!("command failed: {}", err)
        }
    }
}

async fn set_online(
    directory: &DeviceDirectory,
    user: &str,
    device: &str,
    online: bool,
) -> Result<()> {
    let mut patch = StatePatch::new();
    patch.insert("online".to_string(), json!(online));
    directory.update_device_state(user, device, &patch).await?;
    println!("{} online={}", device, online);
    Ok(())
}

fn list_commands() {
    let registry = homegrid_engine::CommandRegistry::new();
    for kind in registry.commands() {
        let spec = kind.spec();
        println!("{}", kind.identifier());
        if !spec.required_params.is_empty() {
            println!("    params:   {}", spec.required_params.join(", "));
        }
        if !spec.optional_params.is_empty() {
            println!("    optional: {}", spec.optional_params.join(", "));
        }
        if !spec.reads.is_empty() {
            println!("    reads:    {}", spec.reads.join(", "));
        }
        if !spec.writes.is_empty() {
            println!("    writes:   {}", spec.writes.join(", "));
        }
    }
}
