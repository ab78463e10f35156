#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod history;
pub mod measurement;
pub mod transport;
pub mod validation;

pub use engine::{Client, ClientBuilder};
pub use error::ClientError;
pub use history::{History, HistoryEntry};
pub use measurement::Measurement;
pub use validation::{CausalityViolation, Verdict};
