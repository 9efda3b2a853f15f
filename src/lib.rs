//! rvolunteer library root.
//! Exposes the CLI parser, the high-level run() function and the modules
//! behind it: the attendance core, the API boundary and the poller.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod sync;
pub mod ui;
pub mod utils;

use api::http::HttpApi;
use api::snapshot::SnapshotApi;
use api::{ActivityApi, Session};
use clap::Parser;
use cli::commands::{self, Context};
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use utils::time::Clock;

pub const LOG_ENV: &str = "RVOLUNTEER_LOG";

/// Diagnostics go to stderr, filtered by `RVOLUNTEER_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Dispatcher for the commands that talk to the backend.
pub async fn dispatch<A: ActivityApi + 'static>(
    api: Arc<A>,
    cli: &Cli,
    ctx: &Context,
) -> AppResult<()> {
    match &cli.command {
        Commands::Show { id } => commands::show::handle(api.as_ref(), ctx, *id).await,
        Commands::Apply { id } => commands::apply::handle(api.as_ref(), ctx, *id).await,
        Commands::Cancel { id } => commands::cancel::handle(api.as_ref(), ctx, *id).await,
        Commands::Checkin { id, code } => {
            commands::checkin::handle(api.as_ref(), ctx, *id, code).await
        }
        Commands::Code { id } => commands::code::handle(api.as_ref(), ctx, *id).await,
        Commands::Applicants { id } => {
            commands::applicants::handle(api.as_ref(), ctx, *id).await
        }
        Commands::Review {
            application_id,
            approve,
            reason,
            ..
        } => {
            commands::review::handle(api.as_ref(), ctx, *application_id, *approve, reason.as_deref())
                .await
        }
        Commands::Watch { id, interval, once } => {
            commands::watch::handle(api, ctx, *id, *interval, *once).await
        }
        Commands::Notifications {
            mark_read,
            watch,
            interval,
            once,
        } => {
            if *watch {
                commands::notifications::watch(api, ctx, *interval, *once).await
            } else {
                commands::notifications::list(api.as_ref(), ctx, *mark_read).await
            }
        }
        Commands::Export { id, file, force } => {
            commands::export::handle(api.as_ref(), ctx, *id, file, *force).await
        }
        Commands::Init | Commands::Config { .. } | Commands::Log { .. } => Ok(()),
    }
}

/// Apply command-line overrides on top of file and environment settings.
fn apply_overrides(cli: &Cli, cfg: &mut Config) {
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(url) = &cli.api_url {
        cfg.api_base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        cfg.token = Some(token.clone());
    }
    if let Some(role) = cli.role {
        cfg.role = role;
    }
    if let Some(student_id) = cli.student_id {
        cfg.student_id = Some(student_id);
    }
}

fn run_remote(cli: &Cli, cfg: Config, clock: Clock) -> AppResult<()> {
    let session = Session::new(&cfg.api_base_url, cfg.token.clone(), cfg.role, cfg.student_id);
    let timeout = Duration::from_secs(cfg.http_timeout_secs);
    let ctx = Context::new(cfg, clock);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = match &cli.snapshot {
        Some(path) => {
            debug!(path = %path.display(), "using snapshot data source");
            let api = Arc::new(SnapshotApi::open(path, session, clock)?);
            runtime.block_on(dispatch(api, cli, &ctx))
        }
        None => {
            debug!(base_url = %session.base_url, authenticated = session.is_authenticated(), "using backend");
            let api = Arc::new(HttpApi::new(session, timeout));
            runtime.block_on(dispatch(api, cli, &ctx))
        }
    };

    // a pending stdin read must not keep the process alive
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut cfg);

    let clock = Clock::from_override(cli.now.as_deref())?;

    match &cli.command {
        Commands::Init => commands::init::handle(&cli),
        Commands::Config { .. } => commands::config::handle(&cli, &cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, &cfg),
        _ => run_remote(&cli, cfg, clock),
    }
}
