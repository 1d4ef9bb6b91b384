//! # Error Taxonomy
//!
//! Only configuration problems are real errors here. A non-positive duration
//! is an idle state and an unavailable tile context is skipped silently, so
//! neither shows up in [`StripError`].

use std::io;
use thiserror::Error;

/// Errors surfaced while building or configuring a timeline strip.
#[derive(Error, Debug)]
pub enum StripError {
    /// The configured container selector did not resolve to a mount point
    #[error("no container for timeline: {0}")]
    NoContainer(String),

    /// A configuration value is outside its accepted range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The config file is not valid TOML for [`crate::config::Config`]
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing the config back to TOML failed
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the config file failed
    #[error("config IO: {0}")]
    Io(#[from] io::Error),
}
