//! h3advisor CLI - Heroes III + HotA strategic advisor
//!
//! Usage: h3advisor <COMMAND>
//!
//! Commands:
//!   run    Watch saves, serve state over HTTP, and display advice
//!   watch  Watch saves only, printing snapshots as JSON lines
//!   serve  Serve the persisted cache without watching

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use h3advisor::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_QUERY_PORT};
use h3advisor::{Advisor, Config, QueryService, SaveParser, SaveWatcher, ServerConfig, SnapshotStore};

/// h3advisor - Heroes III + HotA save watcher and game-state query server
#[derive(Parser, Debug)]
#[command(name = "h3advisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch saves, serve state over HTTP, and display advice
    Run {
        /// Path to the Heroes III saves directory (e.g. ".../HotA/Saves")
        save_dir: PathBuf,

        /// Path to configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port for the query service (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Cache file for snapshot persistence (overrides config)
        #[arg(long)]
        cache_file: Option<PathBuf>,
    },

    /// Watch saves only, printing snapshots to stdout as JSON lines
    Watch {
        /// Path to the Heroes III saves directory
        save_dir: PathBuf,

        /// Parse the most recent existing save before watching
        #[arg(long)]
        process_existing: bool,

        /// Debounce window for repeated events on the same file
        #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },

    /// Serve the persisted snapshot cache without watching
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_QUERY_PORT)]
        port: u16,

        /// Cache file to load and serve
        #[arg(long)]
        cache_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Run {
            save_dir,
            config,
            port,
            cache_file,
        } => cmd_run(&save_dir, config.as_deref(), port, cache_file),
        Commands::Watch {
            save_dir,
            process_existing,
            debounce_ms,
        } => cmd_watch(&save_dir, process_existing, debounce_ms),
        Commands::Serve { port, cache_file } => cmd_serve(port, cache_file),
    }
}

/// Logs go to stderr; stdout is reserved for the JSON snapshot stream
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

fn cmd_run(
    save_dir: &PathBuf,
    config_path: Option<&std::path::Path>,
    port: Option<u16>,
    cache_file: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(port) = port {
        config.query_port = port;
    }
    if let Some(cache_file) = cache_file {
        config.cache_file = Some(cache_file);
    }

    println!("🏰 Heroes III + HotA Strategic AI Assistant");
    println!("Saves: {}", save_dir.display());
    println!(
        "Query API: http://{}:{}",
        config.query_host, config.query_port
    );
    println!(
        "Manifest: http://{}:{}/manifest",
        config.query_host, config.query_port
    );
    println!("Press Ctrl+C to stop\n");

    let running = interrupt_flag()?;

    let mut advisor = Advisor::new(save_dir, &config)?;
    advisor.run(running)?;

    Ok(())
}

fn cmd_watch(save_dir: &PathBuf, process_existing: bool, debounce_ms: u64) -> Result<()> {
    let watcher = SaveWatcher::new(
        save_dir,
        Arc::new(SaveParser::new()),
        Duration::from_millis(debounce_ms),
    )?;

    let running = interrupt_flag()?;

    // Snapshots stream to stdout from inside the watcher; nothing to wire up
    if process_existing {
        watcher.process_existing_saves(&|_| {});
    }
    watcher.watch(running, &|_| {})?;

    Ok(())
}

fn cmd_serve(port: u16, cache_file: Option<PathBuf>) -> Result<()> {
    let mut config = Config {
        query_port: port,
        ..Config::default()
    };
    if let Some(cache_file) = cache_file {
        config.cache_file = Some(cache_file);
    }

    let store = Arc::new(SnapshotStore::new(config.resolved_cache_file()));
    let mut service = QueryService::new(
        ServerConfig {
            host: config.query_host.clone(),
            port: config.query_port,
        },
        store,
    );
    service.start()?;

    println!(
        "Query service on http://{}:{}",
        config.query_host, config.query_port
    );
    println!(
        "Manifest: http://{}:{}/manifest",
        config.query_host, config.query_port
    );
    println!("Press Ctrl+C to stop\n");

    let running = interrupt_flag()?;
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    service.stop()?;
    Ok(())
}
