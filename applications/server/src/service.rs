//! Command dispatch and response envelopes
//!
//! Transports parse a [`CommandEnvelope`], call [`RequestService::handle`]
//! and serialize the [`Reply`]. No tag parsing happens here.

use crate::error::{Result, ServiceError};
use mdreader_core::{Diagnostic, Release};
use mdreader_tags::{Assembled, Assembler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Commands `handle` accepts
pub const COMMANDS: [&str; 3] = ["ping", "info", "release"];

/// `{"cmd": ..., "params": {...}}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandEnvelope {
    pub cmd: String,
    #[serde(default)]
    pub params: Value,
}

/// Static service metadata returned by `info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub subsystem: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub commands: Vec<String>,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            subsystem: "audio".to_string(),
            name: "mdreader".to_string(),
            description: "Audio Metadata Reader".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commands: COMMANDS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Success body of `release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEnvelope {
    pub release: Release,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl From<Assembled> for ReleaseEnvelope {
    fn from(assembled: Assembled) -> Self {
        Self {
            release: assembled.release,
            diagnostics: assembled.diagnostics,
        }
    }
}

/// Successful result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `ping`: an empty payload
    Pong,
    Info(ServiceInfo),
    Release(Box<ReleaseEnvelope>),
}

impl Reply {
    /// JSON payload; `None` for the empty `ping` reply
    pub fn to_json(&self) -> serde_json::Result<Option<Value>> {
        match self {
            Reply::Pong => Ok(None),
            Reply::Info(info) => serde_json::to_value(info).map(Some),
            Reply::Release(envelope) => serde_json::to_value(envelope).map(Some),
        }
    }
}

/// Stateless dispatcher over a shared [`Assembler`]
#[derive(Debug, Clone)]
pub struct RequestService {
    assembler: Assembler,
}

impl RequestService {
    pub fn new(assembler: Assembler) -> Self {
        Self { assembler }
    }

    /// Run one command to completion
    pub fn handle(&self, cmd: &str, params: &Value) -> Result<Reply> {
        match cmd {
            "ping" => {
                info!(cmd, "handling request");
                Ok(Reply::Pong)
            }
            "info" => {
                info!(cmd, "handling request");
                Ok(Reply::Info(ServiceInfo::current()))
            }
            "release" => {
                let dir = release_dir(params)?;
                info!(cmd, dir = %dir.display(), "handling request");
                let assembled = self.assembler.assemble(&dir)?;
                Ok(Reply::Release(Box::new(assembled.into())))
            }
            other => Err(ServiceError::UnknownCommand(other.to_string())),
        }
    }

    /// Handle a parsed envelope
    pub fn handle_envelope(&self, envelope: &CommandEnvelope) -> Result<Reply> {
        self.handle(&envelope.cmd, &envelope.params)
    }

    /// Handle a raw JSON request, mapping malformed input to `InvalidParams`
    pub fn handle_json(&self, raw: &[u8]) -> Result<Reply> {
        let envelope: CommandEnvelope = serde_json::from_slice(raw)
            .map_err(|e| ServiceError::InvalidParams(format!("malformed request: {}", e)))?;
        self.handle_envelope(&envelope)
    }
}

fn release_dir(params: &Value) -> Result<PathBuf> {
    match params.get("dir") {
        Some(Value::String(dir)) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        Some(_) => Err(ServiceError::InvalidParams(
            "params.dir must be a non-empty string".to_string(),
        )),
        None => Err(ServiceError::InvalidParams(
            "release requires params.dir".to_string(),
        )),
    }
}
