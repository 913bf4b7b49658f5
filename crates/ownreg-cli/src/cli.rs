use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use ownreg_client::{ClientConfig, DEFAULT_PAGE_SIZE};
use ownreg_types::{OwnerDraft, OwnerPatch};

#[derive(Parser)]
#[command(
    name = "ownreg",
    about = "Owner registry: HTTP server and command-line client",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the registry server
    Serve(ServeArgs),
    /// List owners one page at a time
    List(ListArgs),
    /// Register a new owner
    Create(CreateArgs),
    /// Change fields of an existing owner
    Update(UpdateArgs),
    /// Remove an owner
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// JSON data file, overrides the config file
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Allow cross-origin requests
    #[arg(long)]
    pub cors: bool,
}

#[derive(Args)]
pub struct RemoteArgs {
    /// Base URL of the registry server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub server: String,
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
}

impl RemoteArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

/// Owner fields as flags. Omitted flags are left out of the request.
#[derive(Args, Default)]
pub struct OwnerFields {
    #[arg(long)]
    pub hn: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl OwnerFields {
    pub fn into_draft(self) -> OwnerDraft {
        OwnerDraft {
            hn: self.hn,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
        }
    }

    pub fn into_patch(self) -> OwnerPatch {
        OwnerPatch {
            hn: self.hn,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
        }
    }
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[command(flatten)]
    pub fields: OwnerFields,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
    #[command(flatten)]
    pub fields: OwnerFields,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub id: String,
}
