//! Command-line front end for the daylist task tracker.
//!
//! Usage:
//!
//! ```text
//! daylist [--config <path>] list [--json]
//! daylist [--config <path>] add <text>...
//! daylist [--config <path>] toggle <task-id>
//! daylist [--config <path>] remove <task-id>
//! ```
//!
//! Tasks live in the `PostgreSQL` store named by `DAYLIST_DATABASE_URL` and
//! belong to the user named by `DAYLIST_USER_ID`.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use daylist::config::TrackerConfig;
use daylist::task::{
    adapters::{
        memory::InMemorySessionProvider,
        postgres::{PostgresTaskStore, build_pool},
    },
    domain::{Bucket, Session, TaskBuckets, TaskId, UserId},
    ports::{RemoteTaskStore, SessionProvider},
    services::TaskStateEngine,
};
use mockable::{Clock, DefaultClock};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Minimal personal task tracker.
#[derive(Debug, Parser)]
#[command(name = "daylist", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Show today's open tasks, tasks completed today and earlier completions.
    List {
        /// Print buckets as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a task.
    Add {
        /// Task text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a task between open and completed.
    Toggle {
        /// Task identifier.
        id: Uuid,
    },
    /// Delete a task.
    Remove {
        /// Task identifier.
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter)?;

    let pool = build_pool(config.require_database_url()?, config.pool_max_size)
        .context("failed to connect to the task store")?;
    let sessions = Arc::new(InMemorySessionProvider::new());
    if let Some(user_id) = config.user_id {
        sessions.sign_in(Session::new(UserId::from_uuid(user_id)));
    }
    let engine = TaskStateEngine::new(
        Arc::new(PostgresTaskStore::new(pool)),
        sessions,
        Arc::new(DefaultClock),
    );

    let stdout = io::stdout();
    run(&engine, cli.command, &mut stdout.lock()).await
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

async fn run<S, P, C, W>(
    engine: &TaskStateEngine<S, P, C>,
    command: Command,
    out: &mut W,
) -> Result<()>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
    W: Write,
{
    engine.initialize().await?;
    match command {
        Command::List { json } => {
            let buckets = engine.buckets_now();
            if json {
                serde_json::to_writer_pretty(&mut *out, &buckets)?;
                writeln!(out)?;
            } else {
                render(&buckets, out)?;
            }
        }
        Command::Add { text } => match engine.add_task(&text.join(" ")).await? {
            Some(task) => writeln!(out, "added {}", task.id())?,
            None => writeln!(out, "nothing to add")?,
        },
        Command::Toggle { id } => match engine.toggle_task(TaskId::from_uuid(id)).await? {
            Some(task) if task.is_completed() => writeln!(out, "completed {id}")?,
            Some(_) => writeln!(out, "reopened {id}")?,
            None => bail!("no task with id {id}"),
        },
        Command::Remove { id } => {
            engine.remove_task(TaskId::from_uuid(id)).await?;
            writeln!(out, "removed {id}")?;
        }
    }
    Ok(())
}

fn render(buckets: &TaskBuckets, out: &mut impl Write) -> io::Result<()> {
    for bucket in Bucket::ALL {
        let tasks = buckets.bucket(bucket);
        writeln!(out, "{} ({})", bucket.label(), tasks.len())?;
        for task in tasks {
            let mark = if task.is_completed() { 'x' } else { ' ' };
            writeln!(out, "  [{mark}] {}  {}", task.text(), task.id())?;
        }
    }
    if buckets.unbucketed > 0 {
        writeln!(out, "{} task(s) outside today's view", buckets.unbucketed)?;
    }
    Ok(())
}
