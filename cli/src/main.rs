//! govern: drive governance tables through the ledger host from the command line.

mod script;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use govern_node::{init_logging, Ledger, LogFormat, NodeConfig, StorageBackend};
use govern_nullables::NullStateStore;
use govern_store::StateStore;
use govern_types::{AccountId, Namespace};

use crate::script::{Script, ScriptRunner};

#[derive(Parser)]
#[command(name = "govern", about = "Governance hook ledger host")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for the LMDB backend.
    #[arg(long, env = "GOVERN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Hook state backend: "memory" or "lmdb".
    #[arg(long, env = "GOVERN_BACKEND")]
    backend: Option<StorageBackend>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GOVERN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GOVERN_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON vote script, printing every hook's return string.
    Replay { script: PathBuf },

    /// Print one namespace of the LMDB store as JSON.
    Namespace {
        /// Account ID in hex.
        #[arg(long)]
        account: String,

        /// Namespace in hex. Defaults to the zero namespace.
        #[arg(long)]
        namespace: Option<String>,
    },
}

impl Cli {
    /// File config (or defaults) with flags and env vars applied on top.
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path.to_string_lossy();
                NodeConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config from {path}"))?
            }
            None => NodeConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = match format {
                LogFormat::Human => "human".to_string(),
                LogFormat::Json => "json".to_string(),
            };
        }
        Ok(config)
    }
}

fn replay<S: StateStore>(mut ledger: Ledger<S>, script: &Script) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ScriptRunner::new(&mut ledger, &mut out).run(script)?;
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;
    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level);

    match cli.command {
        Command::Replay { script } => {
            let json = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let script = Script::from_json(&json)?;
            tracing::info!(steps = script.steps.len(), backend = ?config.backend, "replaying script");
            match config.backend {
                StorageBackend::Memory => {
                    replay(Ledger::new(NullStateStore::new(), &config), &script)?
                }
                StorageBackend::Lmdb => replay(Ledger::open_lmdb(&config)?, &script)?,
            }
        }
        Command::Namespace { account, namespace } => {
            let account = AccountId::from_hex(&account).context("invalid --account")?;
            let namespace = match namespace {
                Some(hex) => Namespace::from_hex(&hex).context("invalid --namespace")?,
                None => Namespace::ZERO,
            };
            let ledger = Ledger::open_lmdb(&config)?;
            let entries = ledger.account_namespace(account, namespace)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
