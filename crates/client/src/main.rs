use std::sync::Arc;

use anyhow::Context;
use civil_codes_backend::database::connection::DbConnection;
use civil_codes_backend::{BackendClient, CatalogApi, MemoryBackend};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::access::AccessPolicy;
use crate::cli::{Args, Command};
use crate::config::AppConfig;
use crate::notify::Toaster;
use crate::repl::Repl;
use crate::views::shell::AppShell;

pub(crate) mod access;
pub(crate) mod category;
pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod demo;
pub(crate) mod notify;
pub(crate) mod repl;
pub(crate) mod views;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = if args.config.exists() {
        AppConfig::from_yaml_file(&args.config)?
    } else {
        warn!("config file {:?} not found, using defaults", args.config);
        AppConfig::default()
    };
    if args.admin_id.is_some() {
        config.admin_id = args.admin_id;
    }

    match args.command.unwrap_or(Command::Run) {
        Command::InitDb => {
            let db = connect(&config).await?;
            db.create_all().await.context("creating schema")?;
            info!("schema created");
        }
        Command::DropDb => {
            let db = connect(&config).await?;
            db.drop_all().await.context("dropping schema")?;
            info!("schema dropped");
        }
        Command::Run => {
            let api: Arc<dyn CatalogApi> = match (&config.database, args.memory) {
                (Some(_), false) => Arc::new(connect(&config).await?),
                _ => {
                    info!("using in-memory backend with demo data");
                    Arc::new(demo::seeded_backend())
                }
            };
            let toaster = Toaster::default();
            let mut shell = AppShell::new(
                BackendClient::new(api),
                AccessPolicy::new(config.admin_id),
                toaster.clone(),
            );
            let mut repl = Repl::new(BufReader::new(tokio::io::stdin()), std::io::stdout(), toaster)
                .launch_links(true)
                .typed_delete(args.typed_delete);
            repl.run(&mut shell).await?;
        }
    }
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<DbConnection> {
    let db_config = config
        .database
        .as_ref()
        .context("no `database` section in the configuration")?;
    DbConnection::connect(db_config)
        .await
        .with_context(|| format!("connecting to {}", db_config.describe()))
}
