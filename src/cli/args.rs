// file: src/cli/args.rs
// version: 1.0.0
// guid: b72fe821-6d9a-4ed5-fa8b-3ab1e1dc95e8

//! Command line argument definitions

use crate::scheduler::Algorithm;
use clap::Parser;

#[derive(Parser)]
#[command(name = "ds-client")]
#[command(about = "Scheduling client for the ds-sim distributed systems simulator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Scheduling algorithm (default: ect)
    #[arg(short, long, value_enum)]
    pub algo: Option<AlgoArg>,

    /// Port ds-server listens on (default: 50000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host running ds-server (default: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Identity sent in the AUTH command (default: the login user)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Optional YAML file with client defaults
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

/// Scheduling algorithm argument for CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum AlgoArg {
    /// Earliest completion time
    Ect,
    /// First capable server
    Fc,
}

impl From<AlgoArg> for Algorithm {
    fn from(algo: AlgoArg) -> Self {
        match algo {
            AlgoArg::Ect => Algorithm::Ect,
            AlgoArg::Fc => Algorithm::Fc,
        }
    }
}

impl From<Algorithm> for AlgoArg {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Ect => AlgoArg::Ect,
            Algorithm::Fc => AlgoArg::Fc,
        }
    }
}
