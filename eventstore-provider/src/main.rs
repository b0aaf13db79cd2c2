//! eventstore-provider: drive a single lifecycle call from the command line.
//!
//! Reads a resource state file (`{"id": ..., "attributes": {...}}`), runs one
//! create/read/update/delete/import/lookup against EventStore and prints the
//! resulting state as JSON on stdout. Diagnostics go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventstore_provider::{Diagnostics, Provider, ProviderConfig, Resource, ResourceData, Severity};

/// EventStore provider driver
#[derive(Parser, Debug)]
#[command(name = "eventstore-provider", version, about)]
struct Args {
    #[command(flatten)]
    config: ProviderConfig,

    /// Resource kind to operate on
    #[arg(long, default_value = "eventstore_user")]
    kind: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the resource described by the state file
    Create {
        #[arg(long)]
        state: PathBuf,
    },
    /// Refresh the state file from EventStore
    Read {
        #[arg(long)]
        state: PathBuf,
    },
    /// Apply changes between the last-applied and the desired state
    Update {
        /// Desired state
        #[arg(long)]
        state: PathBuf,
        /// Last-applied state, diffed against the desired one
        #[arg(long)]
        prior: PathBuf,
    },
    /// Delete the resource
    Delete {
        #[arg(long)]
        state: PathBuf,
    },
    /// Import an existing resource by identifier
    Import { id: String },
    /// Look up a user without managing it
    Lookup {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the resulting state, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventstore_provider=info,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let provider = match Provider::configure(&args.config) {
        Ok(p) => p,
        Err(diags) => {
            report(&diags);
            bail!("provider configuration failed");
        }
    };

    let (data, diags) = match args.command {
        Command::Lookup { username } => {
            let source = provider
                .data_source(&args.kind)
                .with_context(|| format!("{} has no lookup", args.kind))?;
            let mut data = ResourceData::new(Default::default());
            data.attributes.set("username", username);
            let diags = source.read(&mut data).await;
            (data, diags)
        }
        command => {
            let resource = provider
                .resource(&args.kind)
                .with_context(|| format!("unknown resource kind {}", args.kind))?;
            info!(kind = %args.kind, "Running {:?}", command);
            run(resource, command).await?
        }
    };

    report(&diags);
    println!("{}", serde_json::to_string_pretty(&data)?);

    if diags.has_error() {
        bail!("operation failed with {} diagnostic(s)", diags.len());
    }
    Ok(())
}

/// Run one lifecycle call against a managed resource kind.
async fn run(resource: &dyn Resource, command: Command) -> Result<(ResourceData, Diagnostics)> {
    let result = match command {
        Command::Create { state } => {
            let mut data = load_state(&state).await?;
            let diags = resource.create(&mut data).await;
            (data, diags)
        }
        Command::Read { state } => {
            let mut data = load_state(&state).await?;
            let diags = resource.read(&mut data).await;
            (data, diags)
        }
        Command::Update { state, prior } => {
            let mut data = load_state(&state).await?;
            let prior = load_state(&prior).await?;
            let changed = data.attributes.diff(&prior.attributes);
            if data.is_absent() {
                data.set_id(prior.id);
            }
            let diags = resource.update(&mut data, &changed).await;
            (data, diags)
        }
        Command::Delete { state } => {
            let mut data = load_state(&state).await?;
            let diags = resource.delete(&mut data).await;
            (data, diags)
        }
        Command::Import { id } => {
            let mut data = resource.import(&id);
            let diags = resource.read(&mut data).await;
            (data, diags)
        }
        Command::Lookup { .. } => bail!("lookup is only available for data sources"),
    };
    Ok(result)
}

async fn load_state(path: &Path) -> Result<ResourceData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid state file {}", path.display()))
}

fn report(diags: &Diagnostics) {
    for diag in diags.iter() {
        match diag.severity {
            Severity::Error => error!("{}", diag),
            Severity::Warning => warn!("{}", diag),
        }
    }
}
