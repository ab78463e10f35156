use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use roughtime_crypto::{MerkleTree, SigningKey, verify};
use roughtime_protocol::constants::{MIN_REQUEST_LENGTH, NONCE_LENGTH, RESP_CTX};
use roughtime_protocol::{Message, Reply, Request, build_srep};
use tracing::{debug, info};

use crate::error::ServerError;

const POLL_TIMEOUT: Duration = Duration::from_millis(1);
const MAX_DATAGRAM: usize = 1500;

/// A Roughtime server: an immutable delegate certificate and signing key, and a
/// configured radius. Construction validates that the delegate key and `CERT` actually
/// correspond to one another so a server can never start signing responses nobody could
/// verify.
pub struct Server {
    cert: Message,
    cert_bytes: Vec<u8>,
    delegate_key: SigningKey,
    radi: u32,
}

impl Server {
    pub fn new(cert: Message, delegate_key: SigningKey, radi: u32) -> Result<Self, ServerError> {
        let dele = cert
            .require(roughtime_protocol::Key::DELE)?
            .as_message()
            .expect("CERT.DELE decodes as a nested message");
        let pubk: [u8; 32] = dele
            .require(roughtime_protocol::Key::PUBK)?
            .as_bytes()
            .try_into()
            .map_err(|_| ServerError::CertMismatch)?;

        let probe_sig = delegate_key.sign(RESP_CTX);
        verify(&pubk, &probe_sig, RESP_CTX).map_err(|_| ServerError::CertMismatch)?;

        let cert_bytes = cert.encode();
        Ok(Self {
            cert,
            cert_bytes,
            delegate_key,
            radi,
        })
    }

    pub fn public_cert_bytes(&self) -> &[u8] {
        &self.cert_bytes
    }

    /// Bind `addr` and start the single worker thread that owns the socket for the
    /// lifetime of this handle.
    pub fn start(self, addr: SocketAddr) -> Result<ServerHandle, ServerError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(POLL_TIMEOUT))?;
        let local_addr = socket.local_addr()?;
        info!(addr = %local_addr, "server listening");

        let keep_running = Arc::new(AtomicBool::new(true));
        let worker_flag = keep_running.clone();
        let server = Arc::new(self);
        let worker_server = server.clone();

        let join = std::thread::Builder::new()
            .name("roughtime-worker".to_string())
            .spawn(move || worker_server.run(socket, &worker_flag))
            .expect("failed to spawn worker thread");

        Ok(ServerHandle { local_addr, keep_running, join: Some(join) })
    }

    fn run(&self, socket: UdpSocket, keep_running: &AtomicBool) {
        let mut buf = [0u8; MAX_DATAGRAM];

        while keep_running.load(Ordering::Relaxed) {
            match socket.recv_from(&mut buf) {
                Ok((len, src)) => {
                    if let Some(request) = self.accept(&buf[..len]) {
                        self.respond(&socket, &request, src);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => debug!(error = %e, "recv_from failed"),
            }
        }
    }

    /// Decode and validate an incoming datagram, dropping (returning `None`) on any
    /// failure. Never responds to a malformed request.
    fn accept(&self, datagram: &[u8]) -> Option<Request> {
        if datagram.len() < MIN_REQUEST_LENGTH {
            debug!(len = datagram.len(), "dropping undersized datagram");
            return None;
        }
        let request = match Request::decode(datagram) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "dropping malformed request");
                return None;
            }
        };
        match request.nonce() {
            Ok(nonce) if nonce.len() == NONCE_LENGTH => Some(request),
            _ => {
                debug!("dropping request with malformed NONC");
                None
            }
        }
    }

    /// Build and send the signed reply for a single accepted request. One nonce, one
    /// leaf, one Merkle tree, one datagram.
    fn respond(&self, socket: &UdpSocket, request: &Request, src: SocketAddr) {
        let nonce = request.nonce().expect("validated in accept()");
        let tree = MerkleTree::from_nonces(&[nonce]);
        let root = tree.root();
        let midp = now_micros();
        let srep = build_srep(self.radi, midp, &root);

        let mut to_sign = Vec::with_capacity(RESP_CTX.len() + srep.encoded_len());
        to_sign.extend_from_slice(RESP_CTX);
        to_sign.extend_from_slice(&srep.encode());
        let sig = self.delegate_key.sign(&to_sign);

        let reply = match Reply::new(&sig, tree.path_for(0), srep, self.cert.clone(), 0) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "failed to assemble reply");
                return;
            }
        };
        let bytes = reply.encode();
        if let Err(e) = socket.send_to(&bytes, src) {
            debug!(error = %e, %src, "send_to failed");
        }
    }
}

/// A handle to a running server. `stop()` is idempotent and blocks until the worker
/// thread has finished handling whatever datagram it was mid-way through.
pub struct ServerHandle {
    local_addr: SocketAddr,
    keep_running: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// The address the server actually bound to, useful when `start` was called with
    /// an ephemeral port (`:0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stop(&mut self) {
        self.keep_running.store(false, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_micros() as u64
}
