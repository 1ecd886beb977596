//! Shared types and configuration for the icebreaker workspace.
//!
//! Holds the evidence records produced by the scrapers, the typed
//! [`PersonIntel`] artifact produced by synthesis, and the environment-driven
//! [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod evidence;
pub mod intel;

pub use app_config::{AppConfig, RESOLVER_CYCLE_CEILING};
pub use config::{load_app_config, load_app_config_from_env};
pub use evidence::{ActivityFeed, EvidenceBundle, ProfileRecord};
pub use intel::{Enrichment, PersonIntel};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
