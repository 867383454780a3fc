// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! The schema of user input. Execution of each command lives in its own
//! submodule; arguments, flags and help text are defined here.
//!
//! * [`CommandLine`]: global flags (workspace root, config file, output density).
//! * [`Commands`]: the operation to run.
//!
//! `From<&CommandLine> for RunOptions` keeps presentation flags away from the
//! core libraries, and [`Workspace`] turns the root/config flags into the
//! objects every command needs.

pub mod add;
pub mod flag;
pub mod hosts;
pub mod merge;
pub mod review;
pub mod scope;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rekon_common::config::{CONFIG_FILE_NAME, Config, RunOptions};
use rekon_core::host::SyncContext;
use rekon_core::scope::ScopeMatcher;
use rekon_core::store::HostStore;

#[derive(Parser)]
#[command(name = "rekon")]
#[command(about = "Reconciles a directory-backed host inventory with recon tool output.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Assessment workspace containing `hosts/` and the scope files
    #[arg(short = 'r', long = "root", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (default: <root>/rekon.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Keep logs and colors but hide the banner
    #[arg(long = "no-banner", global = true)]
    pub no_banner: bool,

    /// Reduce UI visual density (-q: no headers, -qq: raw values)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Mask hostnames and IP addresses in the output
    #[arg(long = "redact", global = true)]
    pub redact: bool,

    /// Increase logging detail (-v: debug logs, -vv: per-file details)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every host in the inventory
    #[command(alias = "l")]
    List,

    /// Show hosts matching hostnames, names or IP addresses
    #[command(alias = "s")]
    Show {
        #[arg(value_name = "KEYS", num_args(1..), required = true)]
        keys: Vec<String>,
    },

    /// Recompute and save the metadata of every host
    Sync,

    /// Create a host directory for new hostnames/IP addresses
    #[command(alias = "a")]
    Add {
        #[arg(long = "hostname", value_name = "HOSTNAME")]
        hostnames: Vec<String>,

        #[arg(long = "ip", value_name = "IP")]
        ips: Vec<String>,
    },

    /// Mark a host as reviewed, or clear the review
    Review {
        key: String,

        /// Reviewer name
        #[arg(long = "by", conflicts_with = "clear", required_unless_present = "clear")]
        by: Option<String>,

        #[arg(long = "clear")]
        clear: bool,
    },

    /// Set or remove a user flag on a host
    Flag {
        key: String,
        flag: String,

        #[arg(long = "remove")]
        remove: bool,
    },

    /// Check domains and IP addresses against the assessment scope
    Scope {
        #[arg(value_name = "ITEMS", num_args(1..), required = true)]
        items: Vec<String>,

        /// A blacklisted root domain overrides explicit listing
        #[arg(long = "strict")]
        strict: bool,
    },

    /// Reduce domains to their root domains
    Roots {
        #[arg(value_name = "DOMAINS", num_args(1..), required = true)]
        domains: Vec<String>,

        /// Keep blacklisted root domains in the result
        #[arg(long = "keep-blacklisted")]
        keep_blacklisted: bool,
    },

    /// Merge nmap XML files into one run
    #[command(alias = "m")]
    Merge {
        #[arg(value_name = "FILES", num_args(1..), required = true)]
        files: Vec<PathBuf>,

        /// Only keep hosts that are up
        #[arg(long = "up")]
        up: bool,

        /// Only keep hosts with a non-closed port, and drop closed/filtered ports
        #[arg(long = "open")]
        open: bool,

        /// Write to a file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for RunOptions {
    fn from(cmd: &CommandLine) -> Self {
        Self {
            no_banner: cmd.no_banner,
            quiet: cmd.quiet,
            redact: cmd.redact,
            verbosity: cmd.verbosity,
        }
    }
}

/// The assessment directory and its policy.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn load(cmd: &CommandLine) -> anyhow::Result<Self> {
        let root = cmd.root.clone();
        let config = match &cmd.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&root.join(CONFIG_FILE_NAME))?,
        };
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scope(&self) -> Arc<ScopeMatcher> {
        Arc::new(ScopeMatcher::from_files(&self.root, self.config.blacklist.clone()))
    }

    pub fn store(&self) -> HostStore {
        let ctx = SyncContext::new(self.scope(), self.config.hosts.clone());
        HostStore::new(&self.root, ctx)
    }
}

/// Looks up exactly one host, failing with a readable message otherwise.
pub fn find_host<'a>(store: &'a HostStore, key: &str) -> anyhow::Result<&'a rekon_core::host::Host> {
    store
        .get_first(&[key])
        .with_context(|| format!("no host matches '{key}'"))
}
