//! Error types for the packet filter.
//!
//! Errors only arise when constructing settings; filtering itself never
//! fails. Malformed or truncated input is recovered locally by dropping
//! the incomplete trailing event.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("invalid range: lower {lower} is above higher {higher}")]
    InvalidRange { lower: u8, higher: u8 },

    #[error("value out of 7-bit range: {0}")]
    ValueOutOfRange(u8),

    #[error("invalid MIDI channel: {0}")]
    InvalidChannel(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
