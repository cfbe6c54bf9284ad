use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter; wins over everything else.
pub const LOG_ENV: &str = "TODO_BRIDGE_LOG";

const VERBOSE_FILTER: &str = "todo_bridge=debug,info";
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// Filter precedence: `TODO_BRIDGE_LOG`, then the config file's `log_filter`,
/// then `--verbose`, then `info`. stdout is reserved for the UI protocol.
pub fn init(config_filter: Option<&str>, verbose: bool) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(select_filter(env.as_deref(), config_filter, verbose));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init();
}

/// First directive that parses, in precedence order.
fn select_filter<'a>(env: Option<&'a str>, config: Option<&'a str>, verbose: bool) -> &'a str {
    [env, config]
        .into_iter()
        .flatten()
        .find(|directive| EnvFilter::try_new(directive).is_ok())
        .unwrap_or(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
}
