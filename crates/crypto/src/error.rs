#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("signature verification failed")]
    BadSignature,

    #[error("key material of the wrong length: expected {expected}, got {got}")]
    BadKeyLength { expected: usize, got: usize },

    #[error("key generation failed")]
    KeyGenFailed,
}
