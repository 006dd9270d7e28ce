// Utility functions

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Name of the per-user directory holding socket-finder files
pub const APP_DIR_NAME: &str = ".socket-finder";

/// Get the ~/.socket-finder directory, if a home directory is known.
#[inline]
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR_NAME))
}

/// Get the default config file path, ~/.socket-finder/config.yaml
#[inline]
pub fn default_config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.yaml"))
}

/// Extension trait for Result that provides convenient error context methods.
/// Converts any error to an `anyhow::Error` with a descriptive message prefix.
///
/// # Example
/// ```ignore
/// use crate::utils::ResultExt;
///
/// let file = std::fs::read_to_string("config.yaml")
///     .with_context("Failed to read config file")?;
/// ```
pub trait ResultExt<T> {
    /// Converts the error to an anyhow error with context message.
    fn with_context(self, msg: &str) -> anyhow::Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn with_context(self, msg: &str) -> anyhow::Result<T> {
        self.map_err(|e| anyhow::anyhow!("{}: {}", msg, e))
    }
}

/// Safely acquire a mutex lock, recovering from poisoning by returning the guard.
/// This is useful when you want to continue even if a previous thread panicked.
/// The mutex state may be inconsistent, so use with caution.
pub fn lock_mutex_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Mutex was poisoned, recovering: {}", poisoned);
            poisoned.into_inner()
        }
    }
}
