//! CLI configuration.
//!
//! Looked up in order: an explicit path, `./ddlkit.toml`, then
//! `<config dir>/ddlkit/config.toml`. A missing file means defaults.
//!
//! ```toml
//! dialect = "postgres"
//! header = "-- generated by ddlkit, do not edit"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DdlError, DdlResult};
use crate::transpiler::Dialect;

pub const LOCAL_CONFIG: &str = "ddlkit.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dialect used when neither the command line nor the schema file names one.
    #[serde(default)]
    pub dialect: Option<Dialect>,
    /// Line printed before generated SQL.
    #[serde(default)]
    pub header: Option<String>,
}

impl Config {
    pub fn from_toml(text: &str) -> DdlResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the first configuration file found. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> DdlResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DdlError::Config(format!(
                    "{} not found",
                    path.display()
                )));
            }
            return Self::read(path);
        }

        match Self::candidates().into_iter().find(|path| path.exists()) {
            Some(path) => Self::read(&path),
            None => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Implicit lookup locations, most specific first.
    pub fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ddlkit").join("config.toml"));
        }
        paths
    }

    fn read(path: &Path) -> DdlResult<Self> {
        debug!(path = %path.display(), "loading configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The dialect to use: `cli` wins, then the schema file, then this config.
    pub fn resolve_dialect(&self, cli: Option<Dialect>, file: Option<Dialect>) -> Dialect {
        cli.or(file).or(self.dialect).unwrap_or_default()
    }
}
