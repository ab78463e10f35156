//! The validated result of a single query.

use std::net::SocketAddr;

use jiff::Timestamp;

/// The validated result of a Request/Response exchange with a server: a midpoint and
/// radius the client has already checked are internally consistent and properly signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    server: SocketAddr,
    midp: u64,
    radi: u32,
}

impl Measurement {
    pub(crate) fn new(server: SocketAddr, midp: u64, radi: u32) -> Self {
        Self { server, midp, radi }
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// The server's time measurement, in microseconds since the Unix epoch.
    ///
    /// The server's "true time" lies within `(midpoint - radius, midpoint + radius)`.
    pub fn midpoint(&self) -> u64 {
        self.midp
    }

    /// The server's estimate of its own uncertainty, in microseconds.
    pub fn radius(&self) -> u32 {
        self.radi
    }

    /// `midpoint()` as a UTC instant.
    pub fn midpoint_timestamp(&self) -> Timestamp {
        Timestamp::from_microsecond(self.midp as i64).expect("midpoint is a valid Unix instant")
    }

    /// Human-readable rendering of `midpoint_timestamp()`.
    pub fn formatted(&self) -> String {
        self.midpoint_timestamp().to_string()
    }
}
