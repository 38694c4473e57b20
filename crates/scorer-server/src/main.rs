//! scorer server binary.
//!
//! Reads `scorer.toml` (or the path given with `--config`), `SCORER_*`
//! environment variables, and command-line overrides, then serves score
//! entry for the compstate working copy over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `auth_password_hash`:
//!
//! ```
//! cargo run -p scorer-server --bin scorer -- --hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use scorer_compstate::{GitRepository, YamlCompetition};
use scorer_server::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Competition score entry server")]
struct Cli {
  /// Path to the compstate git working copy.
  compstate: Option<PathBuf>,

  /// Never pull or push; commit to the local working copy only.
  #[arg(short, long)]
  local: bool,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "scorer.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SCORER"))
    .set_override_option(
      "compstate_path",
      cli.compstate.map(|p| p.to_string_lossy().into_owned()),
    )?
    .set_override_option("local_only", cli.local.then_some(true))?
    .build()
    .context("failed to read configuration")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig (is compstate_path set?)")?;

  for warning in server_cfg.warnings() {
    tracing::warn!("{warning}");
  }

  server_cfg.compstate_path = expand_tilde(&server_cfg.compstate_path);
  let root = server_cfg.compstate_path.clone();
  anyhow::ensure!(root.is_dir(), "compstate directory {} does not exist", root.display());

  let repo = GitRepository::new(&root, server_cfg.local_only)
    .with_upstream(&server_cfg.remote, &server_cfg.branch);
  let competition = YamlCompetition::new(&root);

  if server_cfg.local_only {
    tracing::info!("local mode: scores are committed but never pushed");
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = scorer_server::router(AppState::new(server_cfg, repo, competition));

  tracing::info!(compstate = %root.display(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
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
