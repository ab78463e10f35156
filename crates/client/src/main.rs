use std::time::Duration;

use clap::Parser;
use roughtime_client::{Client, ClientError};
use tracing::info;

/// Arguments for the client CLI.
#[derive(Parser, Debug)]
#[command(name = "roughtime-client", version, about = "Roughtime authenticated time client")]
struct Args {
    /// Server hostname (e.g. roughtime.int08h.com)
    hostname: String,

    /// Server port (e.g. 2002)
    port: u16,

    /// Base64-encoded 32-byte Ed25519 long-term public key of the server
    #[arg(short = 'k', long, value_name = "KEY")]
    pub_key: String,

    /// Number of queries to send; with more than one, the causality audit runs after
    #[arg(short = 'n', long, value_name = "N", default_value_t = 1)]
    num_requests: usize,

    /// Seconds to wait for the server's response
    #[arg(short = 't', long, value_name = "SECONDS", default_value_t = 10)]
    timeout: u64,

    /// Output details about requests and responses; repeat for more detail
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    enable_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ClientError> {
    let timeout = Duration::from_secs(args.timeout);
    let mut client = Client::new();

    for round in 1..=args.num_requests {
        let measurement = client.query(&args.hostname, args.port, &args.pub_key, Some(timeout))?;
        info!(round, server = %measurement.server(), "query succeeded");
        println!(
            "{}  midpoint={}  radius={}us",
            measurement.formatted(),
            measurement.midpoint(),
            measurement.radius()
        );
    }

    if args.num_requests > 1 {
        let violations = client.verify_replies(&args.pub_key)?;
        if violations.is_empty() {
            println!("causality audit: no violations across {} queries", args.num_requests);
        } else {
            println!("causality audit: {} violation(s) detected", violations.len());
            for (i, k) in violations {
                println!("  history[{i}] is causally inconsistent with history[{k}]");
            }
        }
    }

    Ok(())
}

fn enable_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}
