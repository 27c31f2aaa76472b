//! Offline tools for an agentforge config store.
//!
//! Provides the `agentforge` binary, which reads the same JSON store file the
//! server writes. Export and deploy use the same `agentforge_core` functions
//! as the HTTP endpoints, so file names and generated code are identical.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use agentforge_core::{deploy, AgentConfig, AgentId, AgentSummary, ConfigPersistence, JsonFileBackend};

/// Inspect, export and deploy stored agent configurations.
#[derive(Parser)]
#[command(name = "agentforge", about = "Agent configuration store tools")]
struct Cli {
    /// Path to the agent store file.
    #[arg(short, long, global = true, default_value = "agent_configs/agents.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored agents, oldest first.
    List,

    /// Print one agent's full configuration.
    Show {
        /// Agent id.
        id: String,
    },

    /// Write an agent's configuration as a JSON file.
    Export {
        /// Agent id.
        id: String,

        /// Output path (default: the derived export file name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a standalone deployment script for an agent.
    Deploy {
        /// Agent id.
        id: String,

        /// Output path (default: the derived script file name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Exit codes: 1 = unknown or malformed id, 3 = I/O or store error.
enum Failure {
    NotFound(String),
    Io(String),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::NotFound(_) => 1,
            Failure::Io(_) => 3,
        }
    }

    fn message(&self) -> &str {
        match self {
            Failure::NotFound(msg) | Failure::Io(msg) => msg,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::List => run_list(&cli.store),
        Commands::Show { id } => run_show(&cli.store, &id),
        Commands::Export { id, output } => run_export(&cli.store, &id, output),
        Commands::Deploy { id, output } => run_deploy(&cli.store, &id, output),
    };

    if let Err(failure) = outcome {
        eprintln!("Error: {}", failure.message());
        process::exit(failure.exit_code());
    }
}

fn run_list(store: &Path) -> Result<(), Failure> {
    let configs = load_store(store)?;
    let mut agents: Vec<&AgentConfig> = configs.values().collect();
    agents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    if agents.is_empty() {
        println!("No agents in {}", store.display());
        return Ok(());
    }
    for config in agents {
        let summary = AgentSummary::from(config);
        println!(
            "{}  {:<24}  [{}]  {}",
            summary.id,
            summary.name,
            summary.tools.join(", "),
            summary.description
        );
    }
    Ok(())
}

fn run_show(store: &Path, raw_id: &str) -> Result<(), Failure> {
    let config = find(store, raw_id)?;
    println!("{}", to_pretty_json(&config)?);
    Ok(())
}

fn run_export(store: &Path, raw_id: &str, output: Option<PathBuf>) -> Result<(), Failure> {
    let config = find(store, raw_id)?;
    let path = output.unwrap_or_else(|| PathBuf::from(deploy::export_filename(&config)));
    write_file(&path, &to_pretty_json(&config)?)?;
    println!("Exported '{}' to {}", config.name, path.display());
    Ok(())
}

fn run_deploy(store: &Path, raw_id: &str, output: Option<PathBuf>) -> Result<(), Failure> {
    let config = find(store, raw_id)?;
    let path = output.unwrap_or_else(|| PathBuf::from(deploy::deployment_filename(&config)));
    write_file(&path, &deploy::generate_deployment_code(&config))?;
    println!("Wrote deployment script for '{}' to {}", config.name, path.display());
    Ok(())
}

fn load_store(store: &Path) -> Result<HashMap<AgentId, AgentConfig>, Failure> {
    JsonFileBackend::new(store)
        .load()
        .map_err(|e| Failure::Io(e.to_string()))
}

fn find(store: &Path, raw_id: &str) -> Result<AgentConfig, Failure> {
    let id: AgentId = raw_id
        .parse()
        .map_err(|_| Failure::NotFound(format!("'{}' is not a valid agent id", raw_id)))?;
    load_store(store)?
        .remove(&id)
        .ok_or_else(|| Failure::NotFound(format!("agent {} not found in {}", id, store.display())))
}

fn to_pretty_json(config: &AgentConfig) -> Result<String, Failure> {
    serde_json::to_string_pretty(config)
        .map_err(|e| Failure::Io(format!("failed to serialize config: {}", e)))
}

fn write_file(path: &Path, contents: &str) -> Result<(), Failure> {
    std::fs::write(path, contents)
        .map_err(|e| Failure::Io(format!("failed to write '{}': {}", path.display(), e)))
}
