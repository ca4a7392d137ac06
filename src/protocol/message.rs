// file: src/protocol/message.rs
// version: 1.0.0
// guid: d72b48e1-6f9c-4a35-b08d-3c164e92f5a8

//! Client commands and server events
//!
//! Commands render to exactly one protocol line. Events are parsed from the
//! single line the server sends in reply to `REDY`.

use super::next_field;
use crate::Result;
use std::fmt;

/// Resource requirements of a job, in ds-sim units (cores, MB, MB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resources {
    pub cores: u32,
    pub memory: u32,
    pub disk: u32,
}

/// A job submission as carried by a `JOBN` or `JOBP` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u32,
    pub submit_time: u64,
    pub est_runtime: u64,
    pub resources: Resources,
}

impl Job {
    fn from_fields(fields: &mut std::str::SplitWhitespace<'_>, line: &str) -> Result<Self> {
        let submit_time = next_field(fields, "submitTime", line)?;
        let id = next_field(fields, "jobID", line)?;
        let est_runtime = next_field(fields, "estRuntime", line)?;
        let cores = next_field(fields, "cores", line)?;
        let memory = next_field(fields, "memory", line)?;
        let disk = next_field(fields, "disk", line)?;
        Ok(Job {
            id,
            submit_time,
            est_runtime,
            resources: Resources {
                cores,
                memory,
                disk,
            },
        })
    }
}

/// Client-to-server protocol commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Helo,
    Auth(String),
    Redy,
    /// Servers that can start the job immediately
    GetsAvail(Resources),
    /// Servers that can ever run the job
    GetsCapable(Resources),
    Schd {
        job_id: u32,
        server_type: String,
        server_id: u32,
    },
    Ejwt {
        server_type: String,
        server_id: u32,
    },
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Helo => write!(f, "HELO"),
            Command::Auth(user) => write!(f, "AUTH {}", user),
            Command::Redy => write!(f, "REDY"),
            Command::GetsAvail(r) => {
                write!(f, "GETS Avail {} {} {}", r.cores, r.memory, r.disk)
            }
            Command::GetsCapable(r) => {
                write!(f, "GETS Capable {} {} {}", r.cores, r.memory, r.disk)
            }
            Command::Schd {
                job_id,
                server_type,
                server_id,
            } => write!(f, "SCHD {} {} {}", job_id, server_type, server_id),
            Command::Ejwt {
                server_type,
                server_id,
            } => write!(f, "EJWT {} {}", server_type, server_id),
            Command::Quit => write!(f, "QUIT"),
        }
    }
}

// Event lines carry an exact field count; surplus fields mean a framing bug
fn expect_end(fields: &mut std::str::SplitWhitespace<'_>, line: &str) -> Result<()> {
    if fields.next().is_some() {
        return Err(crate::error::DsClientError::ProtocolError(format!(
            "unexpected trailing fields in line: {}",
            line
        )));
    }
    Ok(())
}

/// Server-to-client events delivered in reply to `REDY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `JOBN` - a newly submitted job
    JobSubmitted(Job),
    /// `JOBP` - a job resubmitted after a server failure
    JobResubmitted(Job),
    /// `JCPL` - a previously scheduled job has completed
    JobCompleted {
        end_time: u64,
        job_id: u32,
        server_type: String,
        server_id: u32,
    },
    /// `RESF` - a simulated server has failed
    ServerFailure {
        server_type: String,
        server_id: u32,
        time: u64,
    },
    /// `RESR` - a failed server has recovered
    ServerRecovery {
        server_type: String,
        server_id: u32,
        time: u64,
    },
    /// `NONE` - the simulation has no more events
    NoMoreEvents,
    /// `ERR` - the server rejected a previous command
    Error(String),
}

impl ServerEvent {
    /// Parse one reply line into an event
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let keyword = fields.next().ok_or_else(|| {
            crate::error::DsClientError::ProtocolError("empty event line".to_string())
        })?;

        match keyword {
            "JOBN" => {
                let job = Job::from_fields(&mut fields, line)?;
                expect_end(&mut fields, line)?;
                Ok(ServerEvent::JobSubmitted(job))
            }
            "JOBP" => {
                let job = Job::from_fields(&mut fields, line)?;
                expect_end(&mut fields, line)?;
                Ok(ServerEvent::JobResubmitted(job))
            }
            "JCPL" => {
                let end_time = next_field(&mut fields, "endTime", line)?;
                let job_id = next_field(&mut fields, "jobID", line)?;
                let server_type: String = next_field(&mut fields, "serverType", line)?;
                let server_id = next_field(&mut fields, "serverID", line)?;
                expect_end(&mut fields, line)?;
                Ok(ServerEvent::JobCompleted {
                    end_time,
                    job_id,
                    server_type,
                    server_id,
                })
            }
            "RESF" | "RESR" => {
                let server_type: String = next_field(&mut fields, "serverType", line)?;
                let server_id = next_field(&mut fields, "serverID", line)?;
                let time = next_field(&mut fields, "time", line)?;
                expect_end(&mut fields, line)?;
                if keyword == "RESF" {
                    Ok(ServerEvent::ServerFailure {
                        server_type,
                        server_id,
                        time,
                    })
                } else {
                    Ok(ServerEvent::ServerRecovery {
                        server_type,
                        server_id,
                        time,
                    })
                }
            }
            "NONE" => {
                expect_end(&mut fields, line)?;
                Ok(ServerEvent::NoMoreEvents)
            }
            // Some server versions punctuate the keyword
            "ERR" | "ERR:" => {
                let text = line.trim_start()[keyword.len()..].trim();
                Ok(ServerEvent::Error(text.to_string()))
            }
            _ => Err(crate::error::DsClientError::ProtocolError(format!(
                "unknown event: {}",
                line
            ))),
        }
    }
}
