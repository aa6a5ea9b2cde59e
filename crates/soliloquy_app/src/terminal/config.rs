use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use soliloquy_core::{MessageTrust, OverlapPolicy, Settings};
use soliloquy_engine::{ClientSettings, DEFAULT_ENDPOINT};
use soliloquy_logging::sq_info;

const CONFIG_FILENAME: &str = "soliloquy.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    /// A new title replaces a pending one instead of being ignored.
    pub supersede_pending: bool,
    /// Render the backend message as markup without escaping it first.
    pub trust_backend_markup: bool,
    pub results_page: Option<PathBuf>,
    pub animate_heading: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_bytes,
            supersede_pending: true,
            trust_backend_markup: false,
            results_page: None,
            animate_heading: true,
        }
    }
}

impl AppConfig {
    /// Loads `explicit`, or `./soliloquy.ron` when it exists, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(CONFIG_FILENAME);
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        sq_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn core_settings(&self) -> Settings {
        Settings {
            overlap: if self.supersede_pending {
                OverlapPolicy::Supersede
            } else {
                OverlapPolicy::Reject
            },
            trust: if self.trust_backend_markup {
                MessageTrust::TrustedFirstParty
            } else {
                MessageTrust::Untrusted
            },
        }
    }
}
