use std::{io, process::ExitCode, time::Duration};

use clap::Parser;
use log::{error, LevelFilter};
use joycore_serial::{
    probe::{self, ProbeOptions},
    serial::{self, SerialDevice, SerialError},
    DEFAULT_COMMAND_TIMEOUT,
};

/// Probe a JoyCore controller's storage and decode its stored config.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serial port to open instead of searching for a controller
    #[arg(short, long)]
    port: Option<String>,

    /// How long to wait for each response, in milliseconds
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// How long to let the controller settle after opening the port, in milliseconds
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    /// Also print a full hex dump of the config blob
    #[arg(long)]
    hex_dump: bool,

    /// Log more (-v for debug, -vv for every line sent and received)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not set up logging: {err}");
    }

    match run(&args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err:?}");
            println!("Error talking to the controller: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: &Args) -> Result<u8, SerialError> {
    let device = match &args.port {
        Some(port) => SerialDevice::from_path(port),
        None => match serial::find_devices()?.into_iter().next() {
            Some(device) => device,
            None => {
                println!("Error: Could not find JoyCore serial device");
                println!("Available ports:");
                for port in serial::available_ports()? {
                    println!("  {}", serial::describe_port(&port));
                }
                return Ok(1);
            }
        },
    };
    println!("Found JoyCore on {}", device.port_name());

    println!("\n1. Opening serial connection...");
    let mut connection = device
        .connect()?
        .with_timeout(Duration::from_millis(args.timeout_ms));

    let startup = connection
        .drain_startup(Duration::from_millis(args.settle_ms))
        .await?;
    if !startup.is_empty() {
        println!("\n=== STARTUP DEBUG OUTPUT ===");
        println!("{}", String::from_utf8_lossy(&startup));
        println!("=== END STARTUP DEBUG ===\n");
    }

    let options = ProbeOptions {
        full_hex_dump: args.hex_dump,
    };
    let summary = probe::run(&mut connection, &mut io::stdout(), options).await?;

    Ok(summary.exit_code())
}
