#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod keys;

pub use config::Args;
pub use engine::{Server, ServerHandle};
pub use error::ServerError;
