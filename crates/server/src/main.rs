use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use roughtime_crypto::SigningKey;
use roughtime_server::config::Args;
use roughtime_server::error::ServerError;
use roughtime_server::keys::{create_delegate, decode_cert, decode_delegate_seed, encode_public_key};
use roughtime_server::Server;
use tracing::{info, warn};

fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    enable_logging(&args);

    let long_term = load_or_generate_long_term_key(&args)?;
    info!(public_key = %encode_public_key(&long_term), "long-term identity key ready");

    let mint = now_micros();
    let maxt = mint + args.delegate_validity_micros();
    let (cert_b64, delegate_priv_b64) = create_delegate(&long_term, Some(mint), Some(maxt))?;
    info!(cert = %cert_b64, "issued delegate certificate");

    let cert = decode_cert(&cert_b64)?;
    let delegate = decode_delegate_seed(&delegate_priv_b64)?;
    let server = Server::new(cert, delegate, args.radius_micros)?;

    let mut handle = server.start(args.socket_addr())?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let ctrlc_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        ctrlc_flag.store(true, Ordering::Relaxed);
    })
    .expect("failed to install signal handler");

    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(100));
    }

    handle.stop();
    info!("server stopped");
    Ok(())
}

fn load_or_generate_long_term_key(args: &Args) -> Result<SigningKey, ServerError> {
    match &args.seed_hex {
        Some(hex) => {
            let seed = decode_hex_seed(hex)?;
            Ok(SigningKey::from_seed(&seed)?)
        }
        None => {
            warn!("--seed-hex not provided; generating an ephemeral long-term key");
            Ok(SigningKey::generate()?)
        }
    }
}

fn decode_hex_seed(hex: &str) -> Result<[u8; 32], ServerError> {
    let bytes = data_encoding::HEXLOWER_PERMISSIVE
        .decode(hex.as_bytes())
        .map_err(ServerError::KeyDecode)?;
    bytes
        .try_into()
        .map_err(|_| ServerError::CertMismatch)
}

fn now_micros() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_micros() as u64
}

fn enable_logging(args: &Args) {
    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}
