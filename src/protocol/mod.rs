// file: src/protocol/mod.rs
// version: 1.0.0
// guid: c4a91f6e-2d58-4b07-9c3a-5e81d2f64a07

//! Wire protocol for the ds-sim simulator
//!
//! ds-server speaks a newline-terminated ASCII text protocol (the server's
//! `-n` newline mode). This module defines the client-side command and event
//! types, the server record format returned by `GETS`, and the buffered TCP
//! connection that exchanges them.

pub mod connection;
pub mod message;
pub mod records;

pub use connection::Connection;
pub use message::{Command, Job, Resources, ServerEvent};
pub use records::{ServerRecord, ServerState};

use crate::Result;
use std::str::FromStr;

/// Parse the next whitespace-separated field of a protocol line
pub(crate) fn next_field<T: FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    name: &str,
    line: &str,
) -> Result<T> {
    let raw = fields.next().ok_or_else(|| {
        crate::error::DsClientError::ProtocolError(format!(
            "missing field '{}' in line: {}",
            name, line
        ))
    })?;
    raw.parse().map_err(|_| {
        crate::error::DsClientError::ProtocolError(format!(
            "invalid value '{}' for field '{}' in line: {}",
            raw, name, line
        ))
    })
}
