use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default number of proposals the list shows before warning about truncation.
pub const DEFAULT_RESULT_CAP: usize = 1000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_PREFS_DIR: &str = "data/prefs";

/// Runtime settings, read from `WEBMANAGER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub prefs_dir: PathBuf,
    pub result_cap: usize,
    pub debounce: Duration,
    pub user_id: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prefs_dir: PathBuf::from(DEFAULT_PREFS_DIR),
            result_cap: DEFAULT_RESULT_CAP,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            user_id: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable values fall back to
    /// the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let prefs_dir = lookup("WEBMANAGER_PREFS_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.prefs_dir);

        let result_cap = match parse_var::<usize>(&lookup, "WEBMANAGER_RESULT_CAP") {
            Some(0) => {
                log::warn!("WEBMANAGER_RESULT_CAP must be positive, using {DEFAULT_RESULT_CAP}");
                defaults.result_cap
            }
            Some(cap) => cap,
            None => defaults.result_cap,
        };

        let debounce = parse_var::<u64>(&lookup, "WEBMANAGER_DEBOUNCE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        let user_id = parse_var::<i64>(&lookup, "WEBMANAGER_USER_ID");

        Settings { prefs_dir, result_cap, debounce, user_id }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
