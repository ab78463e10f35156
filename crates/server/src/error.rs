#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("encoded CERT is {0} bytes, expected 152")]
    CertLength(usize),

    #[error("delegate private key does not correspond to the public key in CERT.DELE.PUBK")]
    CertMismatch,

    #[error("protocol decode error: {0}")]
    Protocol(#[from] roughtime_protocol::Error),

    #[error("cryptographic error: {0}")]
    Crypto(#[from] roughtime_crypto::Error),

    #[error("key material decode error: {0}")]
    KeyDecode(#[from] data_encoding::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
