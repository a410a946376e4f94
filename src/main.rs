//! Coolstream Control CLI
//!
//! Command-line interface for inspecting the comfort model and running the
//! fan controller interactively.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

use coolstream::climate::{ClimatePreset, ClimateReading, ComfortBand};
use coolstream::config::{ControllerConfig, get_config_path};
use coolstream::control::{
    BudgetLimits, ControlEvent, FanController, OperatingMode, QuantStep, SetpointResolver,
};
use coolstream::curve::Curve;
use coolstream::runtime::{self, Command as LoopCommand};
use coolstream::transport::ConsoleTransport;
use coolstream::utils::parsing::parse_manual_rpm;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Coolstream Fan Controller
#[derive(Parser, Debug)]
#[command(name = "coolstream-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the feels-like temperature for a climate reading
    Comfort {
        /// Temperature in °C
        temp: f64,
        /// Relative humidity in %
        humidity: f64,
    },

    /// Resolve the target speed for one set of inputs
    Resolve {
        /// Operating mode (manual, auto, budget)
        #[arg(short, long, default_value = "auto")]
        mode: String,

        /// Temperature in °C
        #[arg(short, long, default_value = "25")]
        temp: f64,

        /// Relative humidity in %
        #[arg(long, default_value = "50")]
        humidity: f64,

        /// Manual speed (0-250 RPM, steps of 10)
        #[arg(long, default_value = "0", value_parser = parse_manual_rpm)]
        manual: u16,

        /// Electricity price per kWh
        #[arg(short, long, default_value = "8.0")]
        price: f64,

        /// Cost ceiling per hour
        #[arg(short, long, default_value = "1.0")]
        ceiling: f64,

        /// Quantization step in RPM
        #[arg(short, long, default_value = "5")]
        step: i64,
    },

    /// Print the built-in speed and power curves
    Curves,

    /// List climate presets
    Presets,

    /// Show the effective configuration
    Config {
        /// Config file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the controller, reading operator commands from stdin
    Run {
        /// Config file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    let args = Args::parse();

    match args.command {
        Command::Comfort { temp, humidity } => cmd_comfort(temp, humidity),
        Command::Resolve {
            mode,
            temp,
            humidity,
            manual,
            price,
            ceiling,
            step,
        } => cmd_resolve(&mode, temp, humidity, manual, price, ceiling, step),
        Command::Curves => cmd_curves(),
        Command::Presets => cmd_presets(),
        Command::Config { config } => cmd_config(config),
        Command::Run { config } => cmd_run(config).await,
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_comfort(temp: f64, humidity: f64) -> Result<()> {
    let reading = ClimateReading::new(temp, humidity);
    let feels = reading.feels_like();

    println!("Climate:     {:.1}°C / {:.1}%", temp, humidity);
    println!("Feels Like:  {:.1}°C", feels);
    println!("Comfort:     {}", ComfortBand::from_feels_like(feels));
    Ok(())
}

fn cmd_resolve(
    mode: &str,
    temp: f64,
    humidity: f64,
    manual: u16,
    price: f64,
    ceiling: f64,
    step: i64,
) -> Result<()> {
    let mode: OperatingMode = mode.parse()?;
    let step = QuantStep::new(step)?;
    let resolver = SetpointResolver::new(step).context("Failed to build setpoint resolver")?;

    let comfort = ClimateReading::new(temp, humidity).feels_like();
    let limits = BudgetLimits {
        max_cost_rate: ceiling.max(0.0),
        price_per_kwh: price.max(0.0),
    };
    let resolution = resolver.resolve(mode, comfort, manual, &limits);

    println!("+-----------------------------------+");
    println!("|        Setpoint Resolution        |");
    println!("+-----------------------------------+");
    println!("|  Mode:         {:<19}|", mode.name());
    println!("|  Feels Like:   {:>5.1} C            |", comfort);
    println!("|  Auto Speed:   {:>5} RPM          |", resolution.auto_rpm);
    if let Some(cap) = resolution.budget_cap_rpm {
        println!("|  Power Limit:  {:>7.2} W          |", limits.max_power_watts());
        println!("|  Budget Cap:   {:>5} RPM          |", cap);
    }
    println!("|  Step:         {:>5} RPM          |", step.get());
    println!("+-----------------------------------+");
    println!("|  Target:       {:>5} RPM          |", resolution.target_rpm);
    println!("+-----------------------------------+");
    Ok(())
}

fn print_curve(title: &str, input: &str, output: &str, curve: &Curve) {
    println!("{}", title);
    println!("  {:>8}  {:>8}", input, output);
    for point in curve.points() {
        println!("  {:>8.1}  {:>8.3}", point.input, point.output);
    }
}

fn cmd_curves() -> Result<()> {
    print_curve(
        "Speed vs Comfort:",
        "°C",
        "RPM",
        &Curve::speed_vs_comfort()?,
    );
    println!();
    print_curve("Power vs Speed:", "RPM", "W", &Curve::power_vs_speed()?);
    Ok(())
}

fn cmd_presets() -> Result<()> {
    println!("Climate presets:");
    for preset in ClimatePreset::ALL {
        let reading = preset.reading();
        println!(
            "  {:<22} feels like {:.1}°C",
            preset.to_string(),
            reading.feels_like()
        );
    }
    Ok(())
}

fn cmd_config(path: Option<PathBuf>) -> Result<()> {
    let mut config =
        ControllerConfig::load(path.as_deref()).context("Failed to load configuration")?;
    config.transport.password = "********".to_string();

    match path {
        Some(p) => println!("Config file: {}", p.display()),
        None => {
            if let Ok(p) = get_config_path() {
                let note = if p.exists() { "" } else { " (not found, using defaults)" };
                println!("Config file: {}{}", p.display(), note);
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn cmd_run(path: Option<PathBuf>) -> Result<()> {
    let config = ControllerConfig::load(path.as_deref()).context("Failed to load configuration")?;
    let mut controller = FanController::new(&config).context("Failed to build controller")?;
    let mut transport = ConsoleTransport::new(std::io::stdout());

    info!(
        "Broker {} as {}; setpoints on {}, status on {}",
        config.transport.url,
        config.transport.client_id,
        config.setpoint_topic,
        config.status_topic
    );

    let (tx, rx) = mpsc::channel::<LoopCommand>(32);

    // The console sink is always reachable.
    tx.send(ControlEvent::ConnectionChanged(true).into())
        .await
        .context("Control loop closed before start")?;

    runtime::spawn_operator_reader(tx).context("Failed to start operator input")?;

    // Handle Ctrl+C gracefully
    let (stop_tx, stop_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = stop_tx.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                // Holding the sender keeps the loop running until input closes.
                let _keep = stop_tx;
                std::future::pending::<()>().await;
            }
        }
    });

    runtime::run(
        &mut controller,
        &mut transport,
        rx,
        stop_rx,
        config.tick_interval(),
    )
    .await;

    println!("{}", controller.snapshot());
    Ok(())
}
