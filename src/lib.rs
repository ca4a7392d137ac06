// file: src/lib.rs
// version: 1.0.0
// guid: 7c2e94b1-5a3d-4f68-b90c-2d817e64a5f0

//! # ds-client
//!
//! Scheduling client for the `ds-sim` distributed systems simulator.
//!
//! The client connects to a running `ds-server` instance over TCP, speaks the
//! simulator's newline-terminated text protocol, and drives a job-dispatch
//! loop: each job submission event is matched to a simulated server chosen by
//! the scheduling algorithm selected on the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod scheduler;
pub mod session;

pub use error::{DsClientError, Result};

/// Version information for the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
