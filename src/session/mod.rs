// file: src/session/mod.rs
// version: 1.0.0
// guid: b16f82c5-0d3a-4e79-f42b-7a5a8cd639e2

//! Scheduling session
//!
//! Drives the REDY event loop against an authenticated connection: job
//! submissions are matched to a target server by the configured algorithm and
//! scheduled with `SCHD`; the loop ends when the server reports `NONE`.

use crate::protocol::{Command, Connection, Job, ServerEvent};
use crate::scheduler::{self, Algorithm};
use crate::{DsClientError, Result};
use tracing::{debug, info, warn};

/// Counters accumulated over one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub jobs_scheduled: u64,
    pub jobs_completed: u64,
    pub server_failures: u64,
    pub server_recoveries: u64,
}

/// One client session against a ds-server instance
pub struct Session {
    conn: Connection,
    algorithm: Algorithm,
    stats: SessionStats,
}

impl Session {
    /// Create a session over an established connection
    pub fn new(conn: Connection, algorithm: Algorithm) -> Self {
        Session {
            conn,
            algorithm,
            stats: SessionStats::default(),
        }
    }

    /// Run the session to completion and return the final counters
    pub async fn run(&mut self, user: &str) -> Result<SessionStats> {
        self.conn.handshake(user).await?;

        loop {
            match self.conn.ready().await? {
                ServerEvent::JobSubmitted(job) | ServerEvent::JobResubmitted(job) => {
                    self.dispatch(&job).await?;
                }
                ServerEvent::JobCompleted { job_id, end_time, .. } => {
                    self.stats.jobs_completed += 1;
                    debug!("Job {} completed at t={}", job_id, end_time);
                }
                ServerEvent::ServerFailure {
                    server_type,
                    server_id,
                    time,
                } => {
                    self.stats.server_failures += 1;
                    warn!("Server {} {} failed at t={}", server_type, server_id, time);
                }
                ServerEvent::ServerRecovery {
                    server_type,
                    server_id,
                    time,
                } => {
                    self.stats.server_recoveries += 1;
                    info!(
                        "Server {} {} recovered at t={}",
                        server_type, server_id, time
                    );
                }
                ServerEvent::Error(text) => {
                    return Err(DsClientError::ProtocolError(format!(
                        "server reported: {}",
                        text
                    )));
                }
                ServerEvent::NoMoreEvents => break,
            }
        }

        self.conn.quit().await?;
        Ok(self.stats.clone())
    }

    /// Select a target for one job and schedule it
    async fn dispatch(&mut self, job: &Job) -> Result<()> {
        let (server_type, server_id) = match self.algorithm {
            Algorithm::Ect => self.earliest_completion_target(job).await?,
            Algorithm::Fc => self.first_capable_target(job).await?,
        };

        debug!(
            "Scheduling job {} on {} {} ({})",
            job.id, server_type, server_id, self.algorithm
        );

        self.conn
            .expect_ok(&Command::Schd {
                job_id: job.id,
                server_type,
                server_id,
            })
            .await?;
        self.stats.jobs_scheduled += 1;
        Ok(())
    }

    /// ect: prefer a server that can start the job now, otherwise the capable
    /// server with the smallest estimated wait
    async fn earliest_completion_target(&mut self, job: &Job) -> Result<(String, u32)> {
        let available = self
            .conn
            .server_records(&Command::GetsAvail(job.resources))
            .await?;
        if let Some(record) = available.first() {
            return Ok((record.server_type.clone(), record.id));
        }

        let capable = self
            .conn
            .server_records(&Command::GetsCapable(job.resources))
            .await?;
        if capable.is_empty() {
            return Err(DsClientError::SchedulingError(format!(
                "no server capable of running job {}",
                job.id
            )));
        }

        let mut candidates = Vec::with_capacity(capable.len());
        for record in capable {
            let wait = self
                .conn
                .estimated_wait(&record.server_type, record.id)
                .await?;
            candidates.push((record, wait));
        }

        let chosen = scheduler::earliest_completion(&candidates).ok_or_else(|| {
            DsClientError::SchedulingError(format!("no candidate for job {}", job.id))
        })?;
        Ok((chosen.server_type.clone(), chosen.id))
    }

    /// fc: the first server that can ever run the job
    async fn first_capable_target(&mut self, job: &Job) -> Result<(String, u32)> {
        let capable = self
            .conn
            .server_records(&Command::GetsCapable(job.resources))
            .await?;

        let chosen = scheduler::first_capable(&capable).ok_or_else(|| {
            DsClientError::SchedulingError(format!(
                "no server capable of running job {}",
                job.id
            ))
        })?;
        Ok((chosen.server_type.clone(), chosen.id))
    }
}
