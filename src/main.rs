//! Wirefish - capture live traffic for a fixed window and tabulate headers.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wirefish::capture::PnetSource;
use wirefish::config::CaptureConfig;
use wirefish::run_capture;

const USAGE: &str = "usage: wirefish [option] [arg]\n\t-a [IP address (DDN)]\n\t-t [time in seconds]\n";

#[derive(Parser, Debug)]
#[command(name = "wirefish")]
#[command(about = "Capture live traffic and report Ethernet/IPv4/TCP header fields")]
struct Cli {
    /// IPv4 address bound to the interface to capture on
    #[arg(short = 'a', long = "address", value_name = "IP")]
    address: Option<String>,

    /// Capture duration in seconds (0 or absent means 10)
    #[arg(short = 't', long = "time", value_name = "SECONDS", allow_negative_numbers = true)]
    time: Option<i64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// List capture interfaces and their addresses, then exit
    #[arg(short, long)]
    list_interfaces: bool,
}

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        print!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CaptureConfig::tracing_filter(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if cli.list_interfaces {
        for iface in PnetSource::list_interfaces() {
            println!("{}", iface);
        }
        return ExitCode::SUCCESS;
    }

    let config = match CaptureConfig::from_args(cli.address.as_deref(), cli.time) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CaptureConfig) -> anyhow::Result<()> {
    let source = PnetSource::open_by_address(config.interface_addr)
        .context("failed to open capture device")?;

    println!("{}", config.window.announcement(&config.interface_addr.to_string()));
    println!();

    let report = run_capture(source, config.window).context("capture failed")?;

    report
        .write_to(&mut io::stdout().lock())
        .context("failed to write report")?;
    Ok(())
}
