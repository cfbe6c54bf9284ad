use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use todo_bridge::bridge::{Dispatcher, UiThread};
use todo_bridge::config::{Config, StrategyKind};
use todo_bridge::error::Result;
use todo_bridge::host::{self, LineSurface};
use todo_bridge::output::{self, Format};
use todo_bridge::store::StoreHandle;

#[derive(Parser)]
#[command(
    name = "todo-bridge",
    version,
    about = "Task-list host bridging an embedded UI to a local SQLite store"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "TODO_BRIDGE_CONFIG")]
    config: Option<PathBuf>,
    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "TODO_BRIDGE_DB")]
    db: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bridge UI calls on stdin to UI frames on stdout
    Serve {
        /// How the host decides the UI is ready for its first push
        #[arg(long, value_enum)]
        ready: Option<StrategyKind>,
        /// Delay before the first push under `--ready delay`
        #[arg(long)]
        ready_delay_ms: Option<u64>,
    },
    /// Print the stored tasks
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Commands::Serve {
        ready,
        ready_delay_ms,
    } = &cli.command
    {
        if let Some(ready) = ready {
            config.readiness.strategy = *ready;
        }
        if let Some(delay) = ready_delay_ms {
            config.readiness.delay_ms = *delay;
        }
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    todo_bridge::logging::init(config.log_filter.as_deref(), cli.verbose);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let store = StoreHandle::open(&config.database)?;
        match cli.command {
            Commands::Serve { .. } => {
                let ui = UiThread::spawn(|| LineSurface::new(std::io::stdout()));
                let dispatcher = Dispatcher::new(store, ui, config.readiness.strategy());
                host::serve(dispatcher, BufReader::new(tokio::io::stdin())).await
            }
            Commands::List { format } => {
                let tasks = store.list_all().await?;
                output::print_tasks(&tasks, format)
            }
        }
    })
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!(
            "{}",
            serde_json::json!({
                "error": e.code(),
                "message": e.to_string()
            })
        );
        std::process::exit(1);
    }
}
