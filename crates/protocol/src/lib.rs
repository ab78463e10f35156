// The protocol crate uses only safe Rust.
#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod key;
pub mod message;
pub mod reply;
pub mod request;
pub mod value;

pub use error::Error;
pub use key::Key;
pub use message::{Message, NestingContext};
pub use reply::{Reply, build_cert, build_dele, build_srep};
pub use request::Request;
pub use value::TagValue;
