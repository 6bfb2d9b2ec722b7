use dirs::home_dir;
use std::{env, path::PathBuf, sync::Once};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIR_NAME: &str = ".money_tracker";
const CONFIG_FILE: &str = "config.json";
const HOME_ENV: &str = "MONEY_TRACKER_HOME";
const DEFAULT_DIRECTIVE: &str = "money_tracker=info";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = filter_from(env::var(EnvFilter::DEFAULT_ENV).ok());

        // Another subscriber may already be installed by the embedding application.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

/// `RUST_LOG` directives when set and valid, otherwise `money_tracker=info`.
fn filter_from(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Returns the application data directory, defaulting to `~/.money_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the user configuration file inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
