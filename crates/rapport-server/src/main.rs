//! rapport-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the Rapport API over HTTP. The
//! subcommands administer the roster of the same store.
//!
//! # Getting started
//!
//! ```
//! cargo run -p rapport-server -- seed
//! cargo run -p rapport-server -- serve
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rapport_core::FeedbackService;
use rapport_server::{AppState, ServerConfig, auth::hash_password, roster, seed::seed_demo};
use rapport_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rapport team feedback server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Fill an empty store with demo teams, people and feedback.
  Seed {
    /// Password given to every demo account.
    #[arg(long, default_value = "password")]
    password: String,
  },
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Register a manager and the team they lead. Reads a password on stdin.
  AddManager {
    username:  String,
    full_name: String,
    /// Name of the manager's team.
    #[arg(long)]
    team:      String,
  },
  /// Register an employee on an existing manager's team. Reads a password on
  /// stdin.
  AddEmployee {
    username:  String,
    full_name: String,
    /// Username of the manager whose team the employee joins.
    #[arg(long)]
    manager:   String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);

  // Helper mode: hash a password and exit.
  if let Command::HashPassword = command {
    let password = rpassword_or_stdin()?;
    println!("{}", hash_password(&password)?);
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RAPPORT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let service = FeedbackService::new(Arc::new(store));

  match command {
    Command::Serve => serve(service, server_cfg).await,
    Command::Seed { password } => {
      let summary = seed_demo(&service, &password)
        .await
        .context("failed to seed demo data")?;
      println!(
        "Seeded {} managers, {} employees and {} feedback records into {store_path:?}.",
        summary.managers, summary.employees, summary.feedback
      );
      Ok(())
    }
    Command::AddManager { username, full_name, team } => {
      let hash = hash_password(&rpassword_or_stdin()?)?;
      let (manager, team) = roster::add_manager(&service, &username, &full_name, &team, Some(hash))
        .await
        .with_context(|| format!("failed to add manager {username:?}"))?;
      println!("Added manager {} ({}) leading {:?}.", manager.username, manager.person_id, team.name);
      Ok(())
    }
    Command::AddEmployee { username, full_name, manager } => {
      let hash = hash_password(&rpassword_or_stdin()?)?;
      let (employee, team) =
        roster::add_employee(&service, &username, &full_name, &manager, Some(hash))
          .await
          .with_context(|| format!("failed to add employee {username:?}"))?;
      println!("Added employee {} ({}) to {:?}.", employee.username, employee.person_id, team.name);
      Ok(())
    }
    // Handled before the store is opened.
    Command::HashPassword => Ok(()),
  }
}

async fn serve(service: FeedbackService<SqliteStore>, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = rapport_server::router(AppState { service });

  tracing::info!(store = ?server_cfg.store_path, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn rpassword_or_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
