// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Host Store
//!
//! The in-memory index of every host directory under `<root>/hosts/`.
//!
//! The index is built on first access and then frozen for the lifetime of the
//! store. Building hands each directory to a fixed pool of workers, each of
//! which opens the host and runs a full sync:
//!
//! ```text
//! coordinator --(bounded dir channel)--> worker x N --(result channel)--> coordinator
//! ```
//!
//! The coordinator dispatches directories in sorted order and drains exactly
//! as many results as it dispatched before the index is published.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, OnceLock, PoisonError};

use rayon::ThreadPoolBuilder;
use rekon_common::{debug, warn};

use crate::host::{Host, HostError, SyncContext, SyncOptions, safe_dir_name};

pub const HOSTS_DIR: &str = "hosts";
pub const DEFAULT_WORKERS: usize = 20;

#[derive(Debug)]
pub struct HostStore {
    root: PathBuf,
    ctx: SyncContext,
    workers: usize,
    index: OnceLock<BTreeMap<PathBuf, Host>>,
}

impl HostStore {
    pub fn new(root: impl Into<PathBuf>, ctx: SyncContext) -> Self {
        Self {
            root: root.into(),
            ctx,
            workers: DEFAULT_WORKERS,
            index: OnceLock::new(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hosts_dir(&self) -> PathBuf {
        self.root.join(HOSTS_DIR)
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    /// Every host, ordered by directory.
    pub fn all(&self) -> Vec<&Host> {
        self.index().values().collect()
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    /// Hosts whose name, hostnames or IP addresses equal any of `keys`,
    /// ignoring case.
    pub fn get<S: AsRef<str>>(&self, keys: &[S]) -> Vec<&Host> {
        self.index()
            .values()
            .filter(|host| keys.iter().any(|k| host.matches(k.as_ref(), true)))
            .collect()
    }

    pub fn get_first<S: AsRef<str>>(&self, keys: &[S]) -> Option<&Host> {
        self.index()
            .values()
            .find(|host| keys.iter().any(|k| host.matches(k.as_ref(), true)))
    }

    /// Like [`HostStore::get`] but only IP addresses are compared.
    pub fn get_by_ip<S: AsRef<str>>(&self, ips: &[S]) -> Vec<&Host> {
        self.index()
            .values()
            .filter(|host| ips.iter().any(|ip| host.has_ip(ip.as_ref())))
            .collect()
    }

    /// Names of the directories under `hosts/`, sorted. Does not build the index.
    pub fn all_dir_names(&self) -> Vec<String> {
        self.host_dirs()
            .iter()
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    /// Creates a new host directory for the given identities and saves it.
    ///
    /// Returns `Ok(None)` when both lists are empty. The directory is named
    /// after the first hostname, or else the first IP; an existing directory
    /// is never reused. The frozen index does not include the new host.
    pub fn add_host<H, I>(&self, hostnames: &[H], ips: &[I]) -> Result<Option<Host>, HostError>
    where
        H: AsRef<str>,
        I: AsRef<str>,
    {
        let first = hostnames
            .iter()
            .map(|h| h.as_ref().trim())
            .chain(ips.iter().map(|i| i.as_ref().trim()))
            .find(|v| !v.is_empty());
        let Some(first) = first else {
            debug!("Refusing to add a host without hostnames or IP addresses");
            return Ok(None);
        };

        let dir = self.unused_dir(&safe_dir_name(first));
        std::fs::create_dir_all(&dir).map_err(|source| HostError::Write {
            path: dir.clone(),
            source,
        })?;

        let mut host = Host::create(&dir, hostnames, ips);
        host.sync_metadata(SyncOptions::ports_and_flags(), &self.ctx)?;
        host.save_metadata()?;
        Ok(Some(host))
    }

    fn unused_dir(&self, base: &str) -> PathBuf {
        let hosts = self.hosts_dir();
        let mut candidate = hosts.join(base);
        let mut suffix = 2;
        while candidate.exists() {
            candidate = hosts.join(format!("{base}-{suffix}"));
            suffix += 1;
        }
        candidate
    }

    fn host_dirs(&self) -> Vec<PathBuf> {
        let hosts = self.hosts_dir();
        let entries = match std::fs::read_dir(&hosts) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not list {}: {e}", hosts.display());
                }
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    fn index(&self) -> &BTreeMap<PathBuf, Host> {
        self.index.get_or_init(|| self.build())
    }

    fn build(&self) -> BTreeMap<PathBuf, Host> {
        let dirs = self.host_dirs();
        debug!(verbosity = 1, "Indexing {} host directories with {} workers", dirs.len(), self.workers);

        let pool = match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Could not start worker pool ({e}), indexing sequentially");
                return dirs
                    .into_iter()
                    .map(|dir| (dir.clone(), self.build_host(dir)))
                    .collect();
            }
        };

        let dispatched = dirs.len();
        let (dir_tx, dir_rx) = mpsc::sync_channel::<PathBuf>(self.workers);
        let (host_tx, host_rx) = mpsc::channel::<Host>();
        let dir_rx = Mutex::new(dir_rx);
        let mut index = BTreeMap::new();

        pool.in_place_scope(|scope| {
            for _ in 0..self.workers {
                let host_tx = host_tx.clone();
                let dir_rx = &dir_rx;
                scope.spawn(move |_| {
                    while let Some(dir) = next_dir(dir_rx) {
                        if host_tx.send(self.build_host(dir)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(host_tx);

            let mut received = 0;
            for dir in dirs {
                if dir_tx.send(dir).is_err() {
                    break;
                }
                while let Ok(host) = host_rx.try_recv() {
                    index.insert(host.dir().to_path_buf(), host);
                    received += 1;
                }
            }
            drop(dir_tx);

            while received < dispatched {
                let Ok(host) = host_rx.recv() else {
                    break;
                };
                index.insert(host.dir().to_path_buf(), host);
                received += 1;
            }
        });

        debug!(verbosity = 1, "Indexed {} hosts", index.len());
        index
    }

    /// A host whose metadata cannot be loaded is still listed, with defaults.
    fn build_host(&self, dir: PathBuf) -> Host {
        let mut host = Host::new(&dir);
        if let Err(e) = host.sync_metadata(SyncOptions::all(), &self.ctx) {
            warn!("{e}; listing {} with default metadata", dir.display());
            host = Host::detached(&dir);
            if let Err(e) = host.sync_metadata(SyncOptions::all(), &self.ctx) {
                warn!("{e}");
            }
        }
        host
    }
}

fn next_dir(rx: &Mutex<Receiver<PathBuf>>) -> Option<PathBuf> {
    rx.lock().unwrap_or_else(PoisonError::into_inner).recv().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
