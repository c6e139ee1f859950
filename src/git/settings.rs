//! Settings for invoking the git executable.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default per-invocation timeout for git subprocesses.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_BINARY: &str = "git";

/// Environment variable naming the git executable.
pub const BINARY_ENV_VAR: &str = "GROUPCOMMIT_GIT_BIN";

/// Environment variable overriding the timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "GROUPCOMMIT_GIT_TIMEOUT";

/// How [`crate::git::SystemGit`] runs git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    /// Executable name or path.
    pub binary: String,
    /// Upper bound on any single git invocation.
    pub timeout: Duration,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GitSettings {
    /// Read settings from `GROUPCOMMIT_GIT_BIN` and `GROUPCOMMIT_GIT_TIMEOUT`.
    ///
    /// Logs a warning if the timeout is set but not a whole number of seconds.
    pub fn from_env() -> Self {
        let binary = match env::var(BINARY_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => DEFAULT_BINARY.to_string(),
        };

        Self {
            binary,
            timeout: timeout_from_env(),
        }
    }
}

fn timeout_from_env() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
