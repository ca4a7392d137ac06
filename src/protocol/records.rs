// file: src/protocol/records.rs
// version: 1.0.0
// guid: e83c59f2-7a0d-4b46-c19e-4d275fa306b9

//! Server state records returned by `GETS` queries

use super::next_field;
use crate::Result;
use std::str::FromStr;

/// Lifecycle state of a simulated server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Inactive,
    Booting,
    Idle,
    Active,
    Unavailable,
}

impl ServerState {
    /// Get the state as its lowercase wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerState::Inactive => "inactive",
            ServerState::Booting => "booting",
            ServerState::Idle => "idle",
            ServerState::Active => "active",
            ServerState::Unavailable => "unavailable",
        }
    }
}

impl FromStr for ServerState {
    type Err = crate::error::DsClientError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(ServerState::Inactive),
            "booting" => Ok(ServerState::Booting),
            "idle" => Ok(ServerState::Idle),
            "active" => Ok(ServerState::Active),
            "unavailable" => Ok(ServerState::Unavailable),
            _ => Err(crate::error::DsClientError::ProtocolError(format!(
                "unknown server state: {}",
                s
            ))),
        }
    }
}

/// One line of a `GETS` data block:
/// `<type> <id> <state> <curStartTime> <cores> <memory> <disk> <wJobs> <rJobs>`
///
/// Some server versions append extra fields after the ninth; those are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub server_type: String,
    pub id: u32,
    pub state: ServerState,
    pub cur_start_time: i64,
    pub cores: u32,
    pub memory: u32,
    pub disk: u32,
    pub waiting_jobs: u32,
    pub running_jobs: u32,
}

impl ServerRecord {
    /// Parse a single record line
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        Ok(ServerRecord {
            server_type: next_field(&mut fields, "serverType", line)?,
            id: next_field(&mut fields, "serverID", line)?,
            state: next_field(&mut fields, "state", line)?,
            cur_start_time: next_field(&mut fields, "curStartTime", line)?,
            cores: next_field(&mut fields, "cores", line)?,
            memory: next_field(&mut fields, "memory", line)?,
            disk: next_field(&mut fields, "disk", line)?,
            waiting_jobs: next_field(&mut fields, "wJobs", line)?,
            running_jobs: next_field(&mut fields, "rJobs", line)?,
        })
    }
}
