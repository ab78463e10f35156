//! Client to query Roughtime servers.
//!
//! Resolves a hostname to an IPv4 address, derives a chained nonce, sends a padded
//! request over UDP, and runs the full verification pipeline on whatever comes back
//! before handing the caller a [`Measurement`].

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use data_encoding::BASE64;
use roughtime_crypto::sha512_concat;
use roughtime_protocol::Request;
use tracing::debug;

use crate::error::ClientError;
use crate::history::{History, HistoryEntry, DEFAULT_MAX_HISTORY_LEN};
use crate::measurement::Measurement;
use crate::transport::{ClientTransport, UdpTransport};
use crate::validation::{self, CausalityViolation};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const RECV_BUF_LEN: usize = 2048;

pub struct ClientBuilder {
    max_history_len: usize,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            max_history_len: DEFAULT_MAX_HISTORY_LEN,
        }
    }

    pub fn max_history_len(mut self, max_history_len: usize) -> Self {
        self.max_history_len = max_history_len;
        self
    }

    pub fn build(self) -> Client {
        Client {
            history: History::new(self.max_history_len),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Roughtime client. Owns a bounded history of past exchanges, used both to chain
/// nonces and to audit causality across a sequence of queries.
pub struct Client {
    history: History,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Query `host:port`, authenticating the reply against `server_pub_b64` (a
    /// base64-encoded 32-byte Ed25519 long-term public key).
    pub fn query(
        &mut self,
        host: &str,
        port: u16,
        server_pub_b64: &str,
        timeout: Option<Duration>,
    ) -> Result<Measurement, ClientError> {
        let addr = resolve_ipv4(host, port)?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let transport = UdpTransport::new(timeout)?;
        self.query_via(&transport, addr, server_pub_b64, timeout)
    }

    /// Same as [`Client::query`] but over a caller-supplied transport, for testing
    /// without a real socket.
    pub fn query_via(
        &mut self,
        transport: &dyn ClientTransport,
        addr: SocketAddr,
        server_pub_b64: &str,
        timeout: Duration,
    ) -> Result<Measurement, ClientError> {
        let long_term_pub = decode_public_key(server_pub_b64)?;

        let blind = roughtime_crypto::random_bytes::<64>();
        let prev = self.history.previous_reply_bytes();
        let nonce = sha512_concat(&[prev, &blind]);

        let request = Request::new(&nonce)?;
        let request_bytes = request.encode();
        transport.send(&request_bytes, addr)?;

        let deadline = std::time::Instant::now() + timeout;
        let reply_bytes = loop {
            if std::time::Instant::now() >= deadline {
                return Err(ClientError::Timeout);
            }
            let mut buf = [0u8; RECV_BUF_LEN];
            match transport.recv(&mut buf) {
                Ok((nbytes, from)) if from == addr => break buf[..nbytes].to_vec(),
                Ok((_, from)) => {
                    debug!(%from, expected = %addr, "discarding datagram from unexpected source");
                    continue;
                }
                Err(ClientError::Timeout) => continue,
                Err(e) => return Err(e),
            }
        };

        let verdict = validation::verify_reply(&long_term_pub, &nonce, &reply_bytes)?;

        self.history.push(HistoryEntry { nonce, blind, reply_bytes });

        Ok(Measurement::new(addr, verdict.midp, verdict.radi))
    }

    /// Cross-reply causality audit over every query this client has made so far.
    /// Requires the same long-term public key every query in history was verified
    /// against.
    pub fn verify_replies(&self, server_pub_b64: &str) -> Result<Vec<(usize, usize)>, ClientError> {
        let long_term_pub = decode_public_key(server_pub_b64)?;
        let entries = self.history.as_vec();
        Ok(validation::verify_replies(&entries, &long_term_pub)
            .into_iter()
            .map(|CausalityViolation { i, k }| (i, k))
            .collect())
    }

    pub fn get_previous_replies(&self) -> Vec<HistoryEntry> {
        self.history.as_vec()
    }
}

fn decode_public_key(server_pub_b64: &str) -> Result<[u8; 32], ClientError> {
    let bytes = BASE64.decode(server_pub_b64.as_bytes())?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| ClientError::BadPublicKeyLength(len))
}

fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr, ClientError> {
    let host_port = format!("{host}:{port}");
    host_port
        .to_socket_addrs()?
        .find(|addr| addr.is_ipv4())
        .ok_or(ClientError::DnsLookupFailed(host_port))
}
