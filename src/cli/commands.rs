// file: src/cli/commands.rs
// version: 1.0.0
// guid: c83af932-7eab-4fe6-ab9c-4bc2f2ed06f9

//! Command implementations for the CLI

use crate::{
    cli::args::Cli,
    config::{ClientConfig, ConfigLoader},
    protocol::Connection,
    scheduler::Algorithm,
    session::Session,
    Result,
};
use std::time::Duration;
use tracing::info;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 50000;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Effective session options after merging CLI flags over file defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub algorithm: Algorithm,
}

/// Resolve session options: CLI flags win over config-file values, which win
/// over built-in defaults
pub fn resolve_options(cli: &Cli) -> Result<SessionOptions> {
    let file = match &cli.config {
        Some(path) => ConfigLoader::new().load_client_config(path)?,
        None => ClientConfig::default(),
    };

    let algorithm = match cli.algo {
        Some(algo) => algo.into(),
        None => match &file.algo {
            Some(name) => name.parse()?,
            None => Algorithm::Ect,
        },
    };

    let user = cli
        .user
        .clone()
        .or(file.user)
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "ds-client".to_string());

    Ok(SessionOptions {
        host: cli
            .host
            .clone()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        user,
        algorithm,
    })
}

/// Run a scheduling session against ds-server
pub async fn run_command(cli: Cli) -> Result<()> {
    let options = resolve_options(&cli)?;

    info!(
        "Connecting to {}:{} (algorithm: {})",
        options.host, options.port, options.algorithm
    );

    let conn = Connection::connect(&options.host, options.port, CONNECT_TIMEOUT).await?;
    let mut session = Session::new(conn, options.algorithm);
    let stats = session.run(&options.user).await?;

    info!(
        "Session complete: {} jobs scheduled, {} completions, {} failures, {} recoveries",
        stats.jobs_scheduled, stats.jobs_completed, stats.server_failures, stats.server_recoveries
    );

    Ok(())
}
