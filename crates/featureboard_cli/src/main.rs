//! `featureboard` server binary.
//!
//! Usage:
//!   featureboard serve [--listen ADDR] [--db PATH] [--log-level LEVEL] [--log-dir DIR]
//!   featureboard init-db [--db PATH]

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use featureboard_api::config::{DEFAULT_DB_PATH, DEFAULT_LISTEN};
use featureboard_api::ServerConfig;
use featureboard_core::db::migrations::{current_version, latest_version};
use featureboard_core::db::{open_db, prepare_db_dir};
use featureboard_core::{default_log_level, init_logging};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// FeatureBoard feature tracking API.
#[derive(Parser, Debug)]
#[command(name = "featureboard", version, about = "FeatureBoard feature tracking API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Create or migrate the database file, then exit.
    InitDb(DbArgs),
}

#[derive(Args, Debug)]
struct DbArgs {
    /// SQLite database file.
    #[arg(long = "db", env = "FEATUREBOARD_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen address.
    #[arg(long = "listen", env = "FEATUREBOARD_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: String,

    #[command(flatten)]
    db: DbArgs,

    /// Log level (trace, debug, info, warn, error). Defaults by build mode.
    #[arg(long = "log-level", env = "FEATUREBOARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Write rotating log files here instead of stderr.
    #[arg(long = "log-dir", env = "FEATUREBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen: self.listen.clone(),
            db_path: self.db.db.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::InitDb(args) => init_db(&args.db),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = match args.log_dir.as_deref() {
        None => None,
        Some(dir) => {
            let dir = absolute(dir)?;
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log directory is not valid UTF-8: {}", dir.display()))?
                .to_string();
            Some(dir)
        }
    };
    init_logging(level, log_dir.as_deref())
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let config = args.server_config();
    info!(
        "event=serve module=cli status=start listen={} db={}",
        config.listen,
        config.db_path.display()
    );
    featureboard_api::run(&config, shutdown_signal()).await?;
    Ok(())
}

fn init_db(path: &Path) -> anyhow::Result<()> {
    prepare_db_dir(path)?;
    let conn = open_db(path).with_context(|| format!("failed to open {}", path.display()))?;
    let version = current_version(&conn)?;
    println!(
        "database {} ready at schema version {} (latest {})",
        path.display(),
        version,
        latest_version()
    );
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("event=shutdown module=cli status=ok signal=ctrl_c"),
        Err(err) => warn!("event=shutdown module=cli status=error error={}", err),
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{absolute, Cli, Command};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn serve_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "featureboard",
            "serve",
            "--listen",
            "0.0.0.0:8080",
            "--db",
            "/tmp/board.db",
            "--log-level",
            "warn",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.server_config();
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.db_path, Path::new("/tmp/board.db"));
        assert_eq!(args.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn init_db_accepts_db_flag() {
        let cli = Cli::try_parse_from(["featureboard", "init-db", "--db", "x/y.db"]).unwrap();
        let Command::InitDb(args) = cli.command else {
            panic!("expected init-db");
        };
        assert_eq!(args.db, Path::new("x/y.db"));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["featureboard", "migrate"]).is_err());
    }

    #[test]
    fn relative_paths_become_absolute() {
        assert!(absolute(Path::new("logs")).unwrap().is_absolute());
        assert_eq!(absolute(Path::new("/var/log")).unwrap(), Path::new("/var/log"));
    }
}
