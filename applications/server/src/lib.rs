//! mdreader service library
//!
//! Request dispatch, configuration and the HTTP and stdio transports
//! around [`mdreader_tags::Assembler`].

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod stdio;

pub use config::ServiceConfig;
pub use error::{ErrorEnvelope, Result, ServiceError};
pub use service::{CommandEnvelope, Reply, ReleaseEnvelope, RequestService, ServiceInfo};
pub use state::AppState;
