use data_encoding::BASE64;
use roughtime_crypto::SigningKey;
use roughtime_protocol::constants::{CERT_CTX, CERT_ENCODED_LENGTH, DEFAULT_DELEGATE_VALIDITY_MICROS};
use roughtime_protocol::{Message, build_cert, build_dele};

use crate::error::ServerError;

/// Generate a fresh long-term identity keypair. The caller is responsible for persisting
/// the returned key; only its public half is ever sent over the wire (embedded, signed,
/// inside every `CERT` this key issues).
pub fn generate_long_term_keypair() -> Result<SigningKey, ServerError> {
    Ok(SigningKey::generate()?)
}

/// Issue a new delegate certificate under `long_term`, valid from `mint` (default: now) to
/// `maxt` (default: `mint` + 30 days). Returns the base64-encoded `CERT` and the base64
/// seed of the freshly generated delegate private key.
pub fn create_delegate(
    long_term: &SigningKey,
    mint_micros: Option<u64>,
    maxt_micros: Option<u64>,
) -> Result<(String, String), ServerError> {
    let mint = mint_micros.unwrap_or_else(now_micros);
    let maxt = maxt_micros.unwrap_or(mint + DEFAULT_DELEGATE_VALIDITY_MICROS);

    let delegate = SigningKey::generate()?;
    let dele = build_dele(mint, maxt, &delegate.public_key());

    let mut to_sign = Vec::with_capacity(CERT_CTX.len() + dele.encoded_len());
    to_sign.extend_from_slice(CERT_CTX);
    to_sign.extend_from_slice(&dele.encode());
    let sig = long_term.sign(&to_sign);

    let cert = build_cert(&sig, dele);
    let cert_bytes = cert.encode();
    if cert_bytes.len() != CERT_ENCODED_LENGTH {
        return Err(ServerError::CertLength(cert_bytes.len()));
    }

    Ok((
        BASE64.encode(&cert_bytes),
        BASE64.encode(delegate.seed_bytes()),
    ))
}

pub fn decode_cert(cert_b64: &str) -> Result<Message, ServerError> {
    let bytes = BASE64.decode(cert_b64.as_bytes())?;
    if bytes.len() != CERT_ENCODED_LENGTH {
        return Err(ServerError::CertLength(bytes.len()));
    }
    Ok(Message::decode(&bytes, roughtime_protocol::NestingContext::Cert)?)
}

pub fn decode_delegate_seed(delegate_priv_b64: &str) -> Result<SigningKey, ServerError> {
    let bytes = BASE64.decode(delegate_priv_b64.as_bytes())?;
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| ServerError::CertMismatch)?;
    Ok(SigningKey::from_seed(&seed)?)
}

pub fn encode_public_key(key: &SigningKey) -> String {
    BASE64.encode(&key.public_key())
}

fn now_micros() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_micros() as u64
}
