// file: src/scheduler/mod.rs
// version: 1.0.0
// guid: a05e71b4-9c2f-4d68-e31a-6f497bc528d1

//! Scheduling algorithms
//!
//! The selection functions here are pure: the session layer gathers server
//! records (and estimated wait times, when the algorithm needs them) from the
//! server and passes them in.

use crate::protocol::ServerRecord;
use std::fmt;
use std::str::FromStr;

/// Scheduling algorithm selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Earliest completion time
    Ect,
    /// First capable server (baseline)
    Fc,
}

impl Algorithm {
    /// Get the algorithm as its command-line name
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Ect => "ect",
            Algorithm::Fc => "fc",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = crate::error::DsClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ect" => Ok(Algorithm::Ect),
            "fc" => Ok(Algorithm::Fc),
            _ => Err(crate::error::DsClientError::ConfigError(format!(
                "Unknown scheduling algorithm: {}",
                s
            ))),
        }
    }
}

/// Pick the first capable server in server order
///
/// `GETS Capable` already guarantees every record can run the job, so the
/// baseline takes the head of the list.
pub fn first_capable(records: &[ServerRecord]) -> Option<&ServerRecord> {
    records.first()
}

/// Pick the candidate with the smallest estimated wait time
///
/// All candidates run the job for the same estimated runtime, so the smallest
/// wait is the earliest completion. Ties go to the earlier record in server
/// order.
pub fn earliest_completion(candidates: &[(ServerRecord, u64)]) -> Option<&ServerRecord> {
    candidates
        .iter()
        .min_by_key(|(_, wait)| *wait)
        .map(|(record, _)| record)
}
