//! The server configuration as processed from the startup wrapper. This controls
//! which access manager is active and the logging level. It is read exactly once
//! into an immutable [Configuration] which is then handed to the engine factory.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sketching::LogLevel;

use crate::prelude::*;

/// Which authorisation model is in force.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessManagerType {
    /// The legacy model: global admins, and domain admins confined to their domain.
    Domain,
    /// Fine grained grants evaluated by the ACL access manager.
    #[default]
    Acl,
}

impl FromStr for AccessManagerType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(AccessManagerType::Domain),
            "acl" => Ok(AccessManagerType::Acl),
            _ => Err("Must be one of domain, acl"),
        }
    }
}

impl fmt::Display for AccessManagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessManagerType::Domain => write!(f, "domain"),
            AccessManagerType::Acl => write!(f, "acl"),
        }
    }
}

/// This is the Server Configuration as read from `server.toml`.
///
/// NOTE: not all flags or values from the internal [Configuration] object are exposed via this structure
/// to prevent certain settings being set (e.g. debug mode)
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Which access manager to use, either "domain" or "acl". Defaults to "acl" if unset.
    #[serde(default)]
    pub access_manager: AccessManagerType,
    /// Log level, one of "info", "debug" or "trace". Defaults to "info" if unset.
    pub log_level: Option<String>,
}

impl ServerConfig {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self, OperationError> {
        let mut f = File::open(config_path.as_ref()).map_err(|e| {
            admin_error!(?e, path = ?config_path.as_ref(), "Unable to open config file");
            OperationError::InvalidConfiguration(format!("unable to open config file: {}", e))
        })?;

        let mut contents = String::new();
        f.read_to_string(&mut contents).map_err(|e| {
            admin_error!(?e, "unable to read contents");
            OperationError::InvalidConfiguration(format!("unable to read config file: {}", e))
        })?;

        Self::from_str(contents.as_str())
    }
}

impl FromStr for ServerConfig {
    type Err = OperationError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        toml::from_str(contents).map_err(|e| {
            admin_error!(?e, "unable to parse config");
            OperationError::InvalidConfiguration(format!("unable to parse config: {}", e))
        })
    }
}

/// The internal configuration of the engine. User-facing configuration is in [ServerConfig],
/// as the configuration file is parsed by that object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Configuration {
    pub access_manager: AccessManagerType,
    pub log_level: LogLevel,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration::default()
    }

    pub fn with_access_manager(mut self, access_manager: AccessManagerType) -> Self {
        self.access_manager = access_manager;
        self
    }
}

impl TryFrom<ServerConfig> for Configuration {
    type Error = OperationError;

    fn try_from(sconfig: ServerConfig) -> Result<Self, Self::Error> {
        let log_level = match sconfig.log_level.as_deref() {
            Some(level) => LogLevel::from_str(level).map_err(|e| {
                admin_error!(%level, "invalid log level");
                OperationError::InvalidConfiguration(e.to_string())
            })?,
            None => LogLevel::default(),
        };

        Ok(Configuration {
            access_manager: sconfig.access_manager,
            log_level,
        })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "access manager: {}, ", self.access_manager)?;
        write!(f, "log level: {}", self.log_level)
    }
}
