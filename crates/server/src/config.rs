use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use roughtime_protocol::constants::{DEFAULT_PORT, DEFAULT_RADIUS_MICROS};

/// Command-line configuration for the Roughtime server.
///
/// There is no separate configuration-file format; every parameter is a flag with a
/// documented default, matching the rest of this core's "no persisted state" design.
#[derive(Parser, Debug, Clone)]
#[command(name = "roughtime-server", version, about = "Roughtime authenticated time server")]
pub struct Args {
    /// Interface address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub interface: IpAddr,

    /// UDP port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// 32-byte hex-encoded seed for the long-term identity key. If omitted, a fresh
    /// long-term key is generated at startup and logged (not persisted).
    #[arg(long)]
    pub seed_hex: Option<String>,

    /// Uncertainty radius reported in RADI, in microseconds.
    #[arg(long, default_value_t = DEFAULT_RADIUS_MICROS)]
    pub radius_micros: u32,

    /// Validity window of the delegate certificate issued at startup, in days.
    #[arg(long, default_value_t = 30)]
    pub delegate_validity_days: u64,

    /// Increase log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.interface, self.port)
    }

    pub fn delegate_validity_micros(&self) -> u64 {
        self.delegate_validity_days * 24 * 60 * 60 * 1_000_000
    }
}
