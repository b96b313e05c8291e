use std::net::IpAddr;
use std::path::PathBuf;

use cache22_store::{IsolationMode, Lookup};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cache22",
    about = "Cache22: a path-addressed key/value server speaking a line protocol over TCP",
    version
)]
pub struct Cli {
    /// TCP port to listen on (default 12049)
    pub port: Option<u16>,

    /// Address to bind (default 127.0.0.1)
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// TOML config file; command-line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Whether clients see each other's writes
    #[arg(long, value_enum)]
    pub isolation: Option<IsolationArg>,

    /// How nodes and keys are located
    #[arg(long, value_enum)]
    pub lookup: Option<LookupArg>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum IsolationArg {
    /// Each connection works on its own copy-on-write snapshot
    Snapshot,
    /// All connections share one locked namespace
    Shared,
}

impl From<IsolationArg> for IsolationMode {
    fn from(arg: IsolationArg) -> Self {
        match arg {
            IsolationArg::Snapshot => IsolationMode::Snapshot,
            IsolationArg::Shared => IsolationMode::Shared,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LookupArg {
    /// Scan in creation order
    Linear,
    /// Hash index per path and per key
    Indexed,
}

impl From<LookupArg> for Lookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Linear => Lookup::Linear,
            LookupArg::Indexed => Lookup::Indexed,
        }
    }
}
