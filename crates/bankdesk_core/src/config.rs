//! Back office settings file.
//!
//! ```json
//! {
//!   "databasePath": "bankdesk.sqlite",
//!   "backupDir": "backup",
//!   "logLevel": "info",
//!   "logDir": "/var/log/bankdesk",
//!   "failurePolicy": "halt"
//! }
//! ```
//!
//! Every field is optional; a missing file yields the defaults.

use crate::logging::default_log_level;
use crate::service::export_service::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE_PATH: &str = "bankdesk.sqlite";
const DEFAULT_BACKUP_DIR: &str = "backup";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankConfig {
    pub database_path: PathBuf,
    pub backup_dir: PathBuf,
    pub log_level: String,
    /// File logging is enabled only when set; must be absolute.
    pub log_dir: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl BankConfig {
    /// Loads settings from `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
