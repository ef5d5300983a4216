/// Service configuration
use crate::error::{Result, ServiceError};
use mdreader_tags::{ExtractLimits, DEFAULT_MAX_FILE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mdreader.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_extraction")]
    pub extraction: ExtractionSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionSettings {
    /// Extraction threads shared by all requests
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Files larger than this many bytes are refused
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl ServiceConfig {
    /// Load configuration from a TOML file and the environment
    ///
    /// An explicit `path` must exist; otherwise `mdreader.toml` is read when
    /// present. Variables such as `MDREADER_SERVER__PORT` or
    /// `MDREADER_EXTRACTION__MAX_FILE_SIZE` override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MDREADER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extraction.workers == 0 {
            return Err(ServiceError::Config(
                "extraction.workers must be at least 1".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ServiceError::Config(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.extraction.max_file_size == 0 {
            return Err(ServiceError::Config(
                "extraction.max_file_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn extract_limits(&self) -> ExtractLimits {
        ExtractLimits {
            max_file_size: self.extraction.max_file_size,
        }
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_extraction() -> ExtractionSettings {
    ExtractionSettings {
        workers: default_workers(),
        max_file_size: default_max_file_size(),
    }
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "mdreader_server=info,mdreader_tags=info,tower_http=info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            extraction: default_extraction(),
            logging: default_logging(),
        }
    }
}
