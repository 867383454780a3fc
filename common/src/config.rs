// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Configuration
//!
//! Two kinds of settings flow through the application:
//!
//! * [`Config`]: assessment policy read from `rekon.toml` at the workspace root
//!   (blacklists, ignore rules, artifact globs). It is loaded once per run and
//!   handed to the components that need it.
//! * [`RunOptions`]: presentation switches mapped from CLI flags. The core
//!   libraries never look at these.
//!
//! A missing `rekon.toml` is not an error; every field has a default.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debug;
use crate::models::ignore::IgnoreService;

/// File name looked up at the workspace root.
pub const CONFIG_FILE_NAME: &str = "rekon.toml";

/// Default glob, relative to a host directory, selecting nmap XML results.
pub const DEFAULT_NMAP_XML_GLOB: &str = "recon/nmap-*.xml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Assessment policy shared by every component of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Domains that must never be treated as in scope.
    pub blacklist: BlacklistConfig,

    /// How host directories are interpreted.
    pub hosts: HostsConfig,
}

/// Out-of-bounds rules consulted by the scope matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Registrable domains (e.g. `example.net`) whose whole tree is off limits.
    ///
    /// An explicitly listed domain below a blacklisted root is still in scope
    /// unless the caller asks for blacklist precedence.
    pub root_domains: Vec<String>,

    /// Individual domain patterns to exclude (e.g. `blog.example.com`, `*.cdn.example.com`).
    ///
    /// `*` matches any run of characters, dots included. Matching is
    /// case-insensitive.
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    /// Services whose ports are dropped from port resolution.
    pub ignore_services: Vec<IgnoreService>,

    /// Glob, relative to each host directory, selecting nmap XML files.
    pub nmap_xml_glob: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            ignore_services: Vec::new(),
            nmap_xml_glob: DEFAULT_NMAP_XML_GLOB.to_string(),
        }
    }
}

impl Config {
    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Presentation options for a single CLI invocation.
///
/// Typically constructed from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skips the startup banner.
    pub no_banner: bool,

    /// Controls the visual density of the output.
    ///
    /// # Levels
    /// * **0** (Default): Full UI, colors and host trees.
    /// * **1**: Reduced styling.
    /// * **2**: Raw mode, one host name per line, suitable for piping.
    pub quiet: u8,

    /// Masks hostnames and IP addresses in printed output.
    ///
    /// Use this when sharing screenshots or logs outside the engagement.
    pub redact: bool,

    /// Maximum `verbosity` field of log events still printed.
    pub verbosity: u8,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ignore::PortSpec;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.hosts.nmap_xml_glob, DEFAULT_NMAP_XML_GLOB);
    }

    #[test]
    fn full_document_parses() {
        let cfg = Config::parse(
            r#"
            [blacklist]
            root_domains = ["example.net"]
            domains = ["blog.example.com"]

            [hosts]
            nmap_xml_glob = "recon/scans/*.xml"

            [[hosts.ignore_services]]
            name = "msrpc"
            ports = "49152-65535"
            flag = "msrpc-ephemeral"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.blacklist.root_domains, vec!["example.net"]);
        assert_eq!(cfg.blacklist.domains, vec!["blog.example.com"]);
        assert_eq!(cfg.hosts.nmap_xml_glob, "recon/scans/*.xml");
        assert_eq!(cfg.hosts.ignore_services.len(), 1);
        assert_eq!(cfg.hosts.ignore_services[0].ports, PortSpec::List(vec![49152..=65535]));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[blacklist\nroot_domains = 3").unwrap();

        let err = Config::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
