use crate::constants::NONCE_LENGTH;
use crate::error::Error;
use crate::key::Key;
use crate::message::{Message, NestingContext};

/// A client request: a `NONC` tag padded out to the minimum wire size.
#[derive(Debug, Clone)]
pub struct Request {
    message: Message,
}

impl Request {
    /// Build a new request carrying `nonce`, padded to the minimum request size.
    pub fn new(nonce: &[u8; NONCE_LENGTH]) -> Result<Self, Error> {
        let mut message = Message::new();
        message.add(Key::NONC, nonce.to_vec())?;
        message.add_padding()?;
        Ok(Self { message })
    }

    pub fn nonce(&self) -> Result<[u8; NONCE_LENGTH], Error> {
        let bytes = self.message.require(Key::NONC)?.as_bytes();
        bytes
            .try_into()
            .map_err(|_| Error::BadValueLength(bytes.len()))
    }

    pub fn encode(&self) -> Vec<u8> {
        self.message.encode()
    }

    pub fn encoded_len(&self) -> usize {
        self.message.encoded_len()
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let message = Message::decode(buf, NestingContext::TopLevel)?;
        message.require(Key::NONC)?;
        Ok(Self { message })
    }
}
