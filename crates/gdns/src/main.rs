// # gdns - GoDaddy DNS reconciliation CLI
//
// Thin driver around `gdns-core`. All record logic lives in the core
// crate; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Constructs the registrar client and state store
// 4. Runs one lifecycle command and prints the resulting state
//
// ## Commands
//
// - `gdns apply <name> <file.json>`: create or update from a description
// - `gdns read <name>`: refresh the stored state from the registrar
// - `gdns import <name> <id>`: adopt an existing domain by identifier
// - `gdns destroy <name>`: restore the placeholder record set and forget
//   the resource
//
// ## Configuration
//
// - `GDNS_API_KEY` / `GDNS_API_SECRET`: GoDaddy API credentials
// - `GDNS_BASE_URL`: API endpoint (default: production)
// - `GDNS_STATE_PATH`: State file path (unset: in-memory, not persisted)
// - `GDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `GDNS_MODE`: `dry-run` to skip record writes
//
// ## Example
//
// ```bash
// export GDNS_API_KEY=your_key
// export GDNS_API_SECRET=your_secret
// export GDNS_STATE_PATH=/var/lib/gdns/state.json
//
// gdns apply example example.json
// ```

use anyhow::{Context, Result};
use gdns_core::config::{GdnsConfig, RegistrarConfig, StateStoreConfig};
use gdns_core::{
    ApplyOutcome, FileStateStore, LifecycleController, MemoryStateStore, Registrar,
    ResourceData, StateRecord, StateStore,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum GdnsExitCode {
    /// Command completed
    Success = 0,
    /// Configuration or usage error
    ConfigError = 1,
    /// Runtime error (registrar, state store, I/O)
    RuntimeError = 2,
}

impl From<GdnsExitCode> for ExitCode {
    fn from(code: GdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

const USAGE: &str = "usage: gdns <apply <name> <file.json> | read <name> | import <name> <id> | destroy <name>>";

/// One lifecycle command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Apply { name: String, file: String },
    Read { name: String },
    Import { name: String, id: String },
    Destroy { name: String },
}

impl Command {
    /// Parse the command line (without the program name)
    fn parse(args: &[String]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let command = match args.as_slice() {
            ["apply", name, file] => Command::Apply {
                name: name.to_string(),
                file: file.to_string(),
            },
            ["read", name] => Command::Read {
                name: name.to_string(),
            },
            ["import", name, id] => Command::Import {
                name: name.to_string(),
                id: id.to_string(),
            },
            ["destroy", name] => Command::Destroy {
                name: name.to_string(),
            },
            _ => anyhow::bail!("{}", USAGE),
        };

        if command.name().trim().is_empty() {
            anyhow::bail!("Resource name cannot be empty");
        }

        Ok(command)
    }

    fn name(&self) -> &str {
        match self {
            Command::Apply { name, .. }
            | Command::Read { name }
            | Command::Import { name, .. }
            | Command::Destroy { name } => name,
        }
    }
}

/// Application configuration
struct Config {
    gdns: GdnsConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut registrar = RegistrarConfig::new(
            env::var("GDNS_API_KEY").context("GDNS_API_KEY is required")?,
            env::var("GDNS_API_SECRET").context("GDNS_API_SECRET is required")?,
        );
        if let Ok(base_url) = env::var("GDNS_BASE_URL") {
            registrar = registrar.with_base_url(base_url);
        }

        let state_store = match env::var("GDNS_STATE_PATH") {
            Ok(path) => StateStoreConfig::File { path },
            Err(_) => StateStoreConfig::Memory,
        };

        Ok(Self {
            gdns: GdnsConfig {
                registrar,
                state_store,
            },
            log_level: env::var("GDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.gdns.validate()?;

        if let StateStoreConfig::File { path } = &self.gdns.state_store
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "GDNS_STATE_PATH parent directory does not exist: {}. \
                    Create it first: mkdir -p {}",
                parent.display(),
                parent.display()
            );
        }

        parse_log_level(&self.log_level)?;

        Ok(())
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "GDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return GdnsExitCode::ConfigError.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return GdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return GdnsExitCode::ConfigError.into();
    }

    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return GdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return GdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(command, config.gdns).await {
            error!("{:#}", e);
            GdnsExitCode::RuntimeError
        } else {
            GdnsExitCode::Success
        }
    });

    result.into()
}

#[cfg(feature = "godaddy")]
fn build_registrar(config: &RegistrarConfig) -> Result<Box<dyn Registrar>> {
    let client = gdns_provider_godaddy::GoDaddyClient::from_config(config)?;
    info!("Using {} at {}", client.registrar_name(), config.base_url);
    Ok(Box::new(client))
}

#[cfg(not(feature = "godaddy"))]
fn build_registrar(_config: &RegistrarConfig) -> Result<Box<dyn Registrar>> {
    anyhow::bail!("No registrar client compiled in. Rebuild with the `godaddy` feature.")
}

async fn build_state_store(config: &StateStoreConfig) -> Result<Box<dyn StateStore>> {
    match config {
        StateStoreConfig::File { path } => {
            info!("Using state file {}", path);
            Ok(Box::new(FileStateStore::new(path).await?))
        }
        StateStoreConfig::Memory => {
            warn!("GDNS_STATE_PATH not set, state will not be persisted");
            Ok(Box::new(MemoryStateStore::new()))
        }
    }
}

/// Run one command
async fn run(command: Command, config: GdnsConfig) -> Result<()> {
    let controller = LifecycleController::new(build_registrar(&config.registrar)?);
    let store = build_state_store(&config.state_store).await?;

    match command {
        Command::Apply { name, file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse {}", file))?;
            let mut data = ResourceData::from_value(&value)?;

            let outcome = match store.get(&name).await? {
                Some(stored) => {
                    if data.id().is_none() {
                        data.id = stored.data.id;
                    }
                    info!("Updating resource {}", name);
                    controller.update(&mut data).await?
                }
                None => {
                    info!("Creating resource {}", name);
                    controller.create(&mut data).await?
                }
            };

            match outcome {
                ApplyOutcome::Applied { records } => info!("Applied {} records", records),
                ApplyOutcome::NameserversRejected { .. } => {
                    warn!("Record set applied without nameserver change")
                }
            }

            persist(store.as_ref(), &name, data).await
        }
        Command::Read { name } => {
            let mut data = stored_data(store.as_ref(), &name).await?;
            controller.read(&mut data).await?;
            persist(store.as_ref(), &name, data).await
        }
        Command::Import { name, id } => {
            let mut data = ResourceData::from_id(id);
            controller.read(&mut data).await?;
            info!("Imported resource {}", name);
            persist(store.as_ref(), &name, data).await
        }
        Command::Destroy { name } => {
            let mut data = stored_data(store.as_ref(), &name).await?;
            controller.delete(&mut data).await?;
            store.delete(&name).await?;
            store.flush().await?;
            info!("Destroyed resource {}", name);
            Ok(())
        }
    }
}

async fn stored_data(store: &dyn StateStore, name: &str) -> Result<ResourceData> {
    let record = store
        .get(name)
        .await?
        .with_context(|| format!("No stored state for resource {}", name))?;
    Ok(record.data)
}

/// Store the resulting state and print it
async fn persist(store: &dyn StateStore, name: &str, data: ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&data)?);
    store.put(name, &StateRecord::new(data)).await?;
    store.flush().await?;
    Ok(())
}
