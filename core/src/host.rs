// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Host Entity
//!
//! A [`Host`] is one assessed endpoint backed by a directory under `hosts/`.
//!
//! ## Key Concepts
//! * **Identity**: the directory path. It is stable and never reused.
//! * **Derivation**: [`Host::sync_metadata`] recomputes the requested parts of
//!   [`Metadata`] from the artifacts on disk. It is a pure function of those
//!   artifacts and the previous metadata, so running it twice changes nothing.
//! * **Quiet persistence**: [`Host::save_metadata`] only touches the disk when
//!   the serialized metadata differs from what was loaded or last saved.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rekon_common::config::HostsConfig;
use rekon_common::utils::lines::{read_lines, write_lines};
use rekon_common::{debug, warn};
use thiserror::Error;

use crate::files::{any_match, file_name};
use crate::ports::{ResolveOptions, resolve_ports};
use crate::scope::ScopeMatcher;

mod metadata;

pub use metadata::{
    IGNORE_QUICK_SCAN, Metadata, OPEN_PORTS, OPEN_TCP, OPEN_UDP, REVIEWED, UNKNOWN_NAME, UNREVIEWED,
};

pub const METADATA_FILE: &str = "00_metadata.md";
pub const HOSTNAMES_FILE: &str = "recon/hostnames.txt";
pub const IP_ADDRESSES_FILE: &str = "recon/ip-addresses.txt";

/// Artifact flags and the glob (relative to the host directory) that sets them.
pub const ARTIFACT_FLAGS: &[(&str, &str)] = &[
    ("gobuster", "recon/gobuster.*"),
    ("ffuf", "recon/ffuf.*"),
    ("dirb", "recon/dirb.*"),
    ("aquatone", "recon/aquatone-*"),
];

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode metadata of {dir}: {source}")]
    Encode {
        dir: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which parts of the metadata a sync recomputes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub hostnames: bool,
    pub ip_addresses: bool,
    pub ports: bool,
    pub flags: bool,
}

impl SyncOptions {
    pub fn all() -> Self {
        Self {
            hostnames: true,
            ip_addresses: true,
            ports: true,
            flags: true,
        }
    }

    pub fn ports_and_flags() -> Self {
        Self {
            ports: true,
            flags: true,
            ..Self::default()
        }
    }
}

/// Everything a sync needs besides the host itself.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub scope: Arc<ScopeMatcher>,
    pub hosts: HostsConfig,
}

impl SyncContext {
    pub fn new(scope: Arc<ScopeMatcher>, hosts: HostsConfig) -> Self {
        Self { scope, hosts }
    }
}

#[derive(Debug, Clone)]
pub struct Host {
    dir: PathBuf,
    pub metadata: Metadata,
    /// Serialized metadata as last loaded or saved. `None` means never persisted.
    snapshot: Option<String>,
    loaded: bool,
    /// Set when the metadata file exists but could not be loaded; such a host
    /// is listed but never saved over the unreadable file.
    detached: bool,
}

impl Host {
    /// A host whose metadata is read on the first sync.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            metadata: Metadata::default(),
            snapshot: None,
            loaded: false,
            detached: false,
        }
    }

    /// A host with default metadata standing in for one whose metadata file
    /// could not be loaded.
    pub fn detached(dir: impl Into<PathBuf>) -> Self {
        Self {
            loaded: true,
            detached: true,
            ..Self::new(dir)
        }
    }

    /// Opens a host directory and reads its persisted metadata.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, HostError> {
        let mut host = Self::new(dir);
        host.load()?;
        Ok(host)
    }

    /// A brand-new host with the given identities. It is unsaved until
    /// [`Host::save_metadata`] runs.
    pub fn create<H, I>(dir: impl Into<PathBuf>, hostnames: &[H], ips: &[I]) -> Self
    where
        H: AsRef<str>,
        I: AsRef<str>,
    {
        let mut host = Self::new(dir);
        host.metadata.hostnames = hostnames.iter().filter_map(|h| clean_hostname(h.as_ref())).collect();
        host.metadata.ip_addresses = ips.iter().filter_map(|i| clean_ip(i.as_ref())).collect();
        host.loaded = true;
        host
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dir_name(&self) -> String {
        file_name(&self.dir)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// True when saving would write to disk.
    pub fn is_changed(&self) -> bool {
        match (&self.snapshot, self.metadata.to_json()) {
            (Some(snapshot), Ok(current)) => *snapshot != current,
            _ => true,
        }
    }

    /// Case-insensitive match against name and hostnames, and IPs when `include_ips`.
    pub fn matches(&self, key: &str, include_ips: bool) -> bool {
        let key = key.trim();
        let meta = &self.metadata;
        meta.name.eq_ignore_ascii_case(key)
            || meta.hostnames.iter().any(|h| h.eq_ignore_ascii_case(key))
            || (include_ips && self.has_ip(key))
    }

    /// Compares normalized addresses, so `FE80::0001` finds `fe80::1`.
    pub fn has_ip(&self, ip: &str) -> bool {
        match clean_ip(ip) {
            Some(ip) => self.metadata.ip_addresses.contains(&ip),
            None => false,
        }
    }

    /// Reads `00_metadata.md` and snapshots its serialized form.
    ///
    /// A missing file leaves the defaults in place and the host marked as
    /// changed. A file that exists but cannot be read or decoded is an error.
    pub fn load(&mut self) -> Result<(), HostError> {
        let path = self.dir.join(METADATA_FILE);
        self.loaded = true;

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(verbosity = 2, "No metadata in {}, starting fresh", self.dir.display());
                self.metadata = Metadata::default();
                self.snapshot = None;
                return Ok(());
            }
            Err(source) => return Err(HostError::Read { path, source }),
        };

        self.metadata = Metadata::from_json(&json).map_err(|source| HostError::Decode {
            path: path.clone(),
            source,
        })?;
        self.snapshot = Some(self.encode()?);
        // Files missing `flags` decode to the default pair; realign it with `reviewed_by`.
        self.metadata.refresh_review_flag();
        Ok(())
    }

    /// Recomputes the parts of the metadata selected by `opts`.
    pub fn sync_metadata(&mut self, opts: SyncOptions, ctx: &SyncContext) -> Result<(), HostError> {
        if !self.loaded {
            self.load()?;
        }

        if opts.hostnames {
            self.metadata.hostnames = read_lines(&self.dir.join(HOSTNAMES_FILE))
                .iter()
                .filter_map(|h| clean_hostname(h))
                .collect();
        }
        if opts.ip_addresses {
            self.metadata.ip_addresses = read_lines(&self.dir.join(IP_ADDRESSES_FILE))
                .iter()
                .filter_map(|i| clean_ip(i))
                .collect();
        }

        self.resolve_name(opts);

        let resolved = (opts.ports || opts.flags).then(|| {
            resolve_ports(
                &self.dir,
                &ResolveOptions {
                    ignore_rules: &ctx.hosts.ignore_services,
                    nmap_xml_glob: &ctx.hosts.nmap_xml_glob,
                    use_quick_scans: !self.metadata.has_user_flag(IGNORE_QUICK_SCAN),
                },
            )
        });

        match (opts.ports, &resolved) {
            (true, Some(resolved)) => self.metadata.set_ports(resolved.ports.clone()),
            _ => self.metadata.project_ports(),
        }

        if opts.flags {
            let ignore_flags = resolved.map(|r| r.flags).unwrap_or_default();
            self.recompute_flags(&ignore_flags);
        }

        let hostnames: Vec<&String> = self.metadata.hostnames.iter().collect();
        self.metadata.root_domains = ctx.scope.get_root_domains(&hostnames, true).into_iter().collect();

        Ok(())
    }

    /// Name cascade: first hostname, sole IP, directory name, `unknown`.
    fn resolve_name(&mut self, opts: SyncOptions) {
        let meta = &mut self.metadata;
        if !meta.name.is_empty() && meta.name != UNKNOWN_NAME {
            return;
        }

        let dir_name = file_name(&self.dir);
        meta.name = if let Some(first) = meta.hostnames.iter().next() {
            first.clone()
        } else if meta.ip_addresses.len() == 1 {
            meta.ip_addresses.iter().next().cloned().unwrap_or_default()
        } else if !dir_name.is_empty() {
            dir_name
        } else {
            UNKNOWN_NAME.to_string()
        };

        match clean_ip(&meta.name) {
            Some(ip) if opts.ip_addresses => {
                meta.ip_addresses.insert(ip);
            }
            Some(_) => {}
            None if opts.hostnames => {
                if let Some(hostname) = clean_hostname(&meta.name).filter(|h| h.contains('.')) {
                    meta.hostnames.insert(hostname);
                }
            }
            None => {}
        }
    }

    fn recompute_flags(&mut self, ignore_flags: &BTreeSet<String>) {
        let meta = &mut self.metadata;
        meta.flags.clear();

        for (flag, pattern) in ARTIFACT_FLAGS {
            if any_match(&self.dir, pattern) {
                meta.push_flag(*flag);
            }
        }
        for flag in ignore_flags {
            meta.push_flag(flag.clone());
        }

        if !meta.tcp_ports.is_empty() {
            meta.push_flag(OPEN_TCP);
        }
        if !meta.udp_ports.is_empty() {
            meta.push_flag(OPEN_UDP);
        }
        if meta.has_open_ports() {
            meta.push_flag(OPEN_PORTS);
        }

        meta.refresh_review_flag();
    }

    fn encode(&self) -> Result<String, HostError> {
        self.metadata.to_json().map_err(|source| HostError::Encode {
            dir: self.dir.clone(),
            source,
        })
    }

    /// Writes the metadata and its side files if anything changed.
    ///
    /// Returns whether the disk was touched.
    pub fn save_metadata(&mut self) -> Result<bool, HostError> {
        if self.detached {
            warn!("Not saving {}: its metadata file could not be loaded", self.dir.display());
            return Ok(false);
        }

        let json = self.encode()?;
        if self.snapshot.as_deref() == Some(json.as_str()) {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.dir).map_err(|source| HostError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(METADATA_FILE);
        std::fs::write(&path, &json).map_err(|source| HostError::Write { path, source })?;

        let hostnames: Vec<&String> = self.metadata.hostnames.iter().collect();
        self.write_side_file(HOSTNAMES_FILE, &hostnames)?;
        let ips: Vec<&String> = self.metadata.ip_addresses.iter().collect();
        self.write_side_file(IP_ADDRESSES_FILE, &ips)?;

        debug!(verbosity = 1, "Saved metadata of {}", self.metadata.name);
        self.snapshot = Some(json);
        Ok(true)
    }

    /// Empty lists do not create a file, but do empty an existing one.
    fn write_side_file(&self, relative: &str, values: &[&String]) -> Result<(), HostError> {
        let path = self.dir.join(relative);
        if values.is_empty() && !path.exists() {
            return Ok(());
        }
        write_lines(&path, values).map_err(|source| HostError::Write { path, source })
    }
}

fn clean_hostname(value: &str) -> Option<String> {
    let value = value.trim().trim_end_matches('.').to_ascii_lowercase();
    let valid = !value.is_empty()
        && value.parse::<IpAddr>().is_err()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '*'));
    valid.then_some(value)
}

fn clean_ip(value: &str) -> Option<String> {
    value.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// Turns a hostname or IP into a directory name that is safe on every platform.
pub fn safe_dir_name(value: &str) -> String {
    let name: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let name = name.trim_matches('.').to_string();
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name
    }
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
    use rekon_common::config::BlacklistConfig;
    use rekon_common::models::ignore::{IgnoreService, PortSpec};
    use rekon_common::models::port::Port;

    use crate::scope::ScopeConfig;

    const TCP_SCAN: &str = r#"<?xml version="1.0"?>
<nmaprun scanner="nmap" start="1700000000">
<host starttime="1700000000"><status state="up"/><address addr="10.0.0.5" addrtype="ipv4"/>
<ports>
<port protocol="tcp" portid="22"><state state="open"/><service name="ssh" method="probed" conf="10"/></port>
<port protocol="tcp" portid="443"><state state="open"/><service name="http" tunnel="ssl" method="probed" conf="10"/></port>
<port protocol="tcp" portid="9999"><state state="open"/><service name="tcpwrapped" method="probed" conf="8"/></port>
</ports>
</host>
</nmaprun>
"#;

    fn context() -> SyncContext {
        let blacklist = BlacklistConfig {
            root_domains: vec!["example.net".into()],
            domains: vec![],
        };
        let scope = ScopeConfig::new(&["www.example.com"], &blacklist, &[] as &[&str]);
        let hosts = HostsConfig {
            ignore_services: vec![IgnoreService::new("tcpwrapped", PortSpec::All).with_flag("tcpwrapped")],
            ..HostsConfig::default()
        };
        SyncContext::new(Arc::new(ScopeMatcher::new(scope)), hosts)
    }

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn host_dir(name: &str) -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("hosts").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        (root, dir)
    }

    #[test]
    fn full_sync_derives_everything() {
        let (_root, dir) = host_dir("web");
        write(&dir, HOSTNAMES_FILE, "WWW.example.com\nmail.example.net\n");
        write(&dir, IP_ADDRESSES_FILE, "10.0.0.5\nnot-an-ip\n");
        write(&dir, "recon/nmap-tcp.xml", TCP_SCAN);
        write(&dir, "recon/gobuster.txt", "");
        write(&dir, "recon/aquatone-report.html", "");

        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        let meta = &host.metadata;

        assert_eq!(meta.name, "mail.example.net");
        assert_eq!(meta.hostnames.len(), 2);
        assert!(meta.hostnames.contains("www.example.com"));
        assert_eq!(meta.ip_addresses.iter().collect::<Vec<_>>(), vec!["10.0.0.5"]);
        assert_eq!(meta.root_domains.iter().collect::<Vec<_>>(), vec!["example.com"]);
        assert_eq!(meta.ports, vec![Port::tcp(22, "ssh"), Port::tcp(443, "https")]);
        assert_eq!(meta.tcp_ports, vec![22, 443]);
        assert!(meta.udp_ports.is_empty());
        assert_eq!(
            meta.flags,
            vec!["gobuster", "aquatone", "tcpwrapped", OPEN_TCP, OPEN_PORTS, UNREVIEWED]
        );
    }

    #[test]
    fn empty_directory_still_yields_a_usable_host() {
        let (_root, dir) = host_dir("lonely");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();

        assert_eq!(host.name(), "lonely");
        assert!(host.metadata.hostnames.is_empty());
        assert_eq!(host.metadata.flags, vec![UNREVIEWED]);
        assert!(host.is_changed());
    }

    #[test]
    fn directory_name_is_folded_into_requested_lists() {
        let (_root, dir) = host_dir("10.1.2.3");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert_eq!(host.name(), "10.1.2.3");
        assert!(host.has_ip("10.1.2.3"));

        let (_root, dir) = host_dir("api.example.com");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert!(host.metadata.hostnames.contains("api.example.com"));
        assert!(host.metadata.root_domains.contains("example.com"));

        let (_root, dir) = host_dir("api.example.org");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::ports_and_flags(), &context()).unwrap();
        assert_eq!(host.name(), "api.example.org");
        assert!(host.metadata.hostnames.is_empty());
    }

    #[test]
    fn sole_ip_names_the_host() {
        let (_root, dir) = host_dir("box");
        write(&dir, IP_ADDRESSES_FILE, "192.168.1.10\n");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert_eq!(host.name(), "192.168.1.10");
    }

    #[test]
    fn unrequested_lists_are_kept() {
        let (_root, dir) = host_dir("web");
        write(&dir, HOSTNAMES_FILE, "www.example.com\n");

        let mut host = Host::create(&dir, &["kept.example.com"], &["10.9.9.9"]);
        host.sync_metadata(SyncOptions::ports_and_flags(), &context()).unwrap();
        assert_eq!(host.metadata.hostnames.iter().collect::<Vec<_>>(), vec!["kept.example.com"]);
        assert!(host.has_ip("10.9.9.9"));
    }

    #[test]
    fn user_flags_survive_sync_and_disable_quick_scans() {
        let (_root, dir) = host_dir("quick");
        write(&dir, "recon/nmap-quick.xml", TCP_SCAN);

        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert_eq!(host.metadata.tcp_ports, vec![22, 443]);

        host.metadata.add_user_flag(IGNORE_QUICK_SCAN);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert!(host.metadata.ports.is_empty());
        assert!(host.metadata.has_user_flag(IGNORE_QUICK_SCAN));
        assert!(!host.metadata.has_flag(OPEN_PORTS));
    }

    #[test]
    fn review_survives_a_resync() {
        let (_root, dir) = host_dir("web");
        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        host.metadata.set_reviewed_by("alice");
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();

        assert!(host.metadata.has_flag(REVIEWED));
        assert!(!host.metadata.has_flag(UNREVIEWED));
    }

    #[test]
    fn loaded_review_without_flags_is_realigned() {
        let (_root, dir) = host_dir("rev");
        write(&dir, METADATA_FILE, r#"{"name":"rev","reviewed_by":"bob"}"#);

        let mut host = Host::new(&dir);
        let hostnames_only = SyncOptions {
            hostnames: true,
            ..SyncOptions::default()
        };
        host.sync_metadata(hostnames_only, &context()).unwrap();

        assert_eq!(host.metadata.reviewed_by, "bob");
        assert_eq!(host.metadata.flags, vec![REVIEWED]);
        assert!(host.save_metadata().unwrap());

        let reopened = Host::open(&dir).unwrap();
        assert_eq!(reopened.metadata.flags, vec![REVIEWED]);
        assert!(!reopened.is_changed());
    }

    #[test]
    fn ip_lookup_normalizes_the_key() {
        let (_root, dir) = host_dir("v6");
        let host = Host::create(&dir, &[] as &[&str], &["fe80::1", "10.0.0.5"]);

        assert!(host.has_ip("FE80::0001"));
        assert!(host.has_ip(" 10.0.0.5 "));
        assert!(host.matches("fe80:0:0:0:0:0:0:1", true));
        assert!(!host.has_ip("10.0.0.50"));
        assert!(!host.has_ip("not-an-ip"));
    }

    #[test]
    fn save_is_idempotent() {
        let (_root, dir) = host_dir("web");
        write(&dir, HOSTNAMES_FILE, "www.example.com\n");
        write(&dir, "recon/nmap-tcp.xml", TCP_SCAN);

        let mut host = Host::new(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert!(host.save_metadata().unwrap());
        assert!(!host.save_metadata().unwrap());
        assert!(!host.is_changed());

        let mut reopened = Host::open(&dir).unwrap();
        assert!(!reopened.is_changed());
        reopened.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert!(!reopened.save_metadata().unwrap());
        assert_eq!(reopened.metadata, host.metadata);
    }

    #[test]
    fn save_writes_side_files() {
        let (_root, dir) = host_dir("new");
        let mut host = Host::create(&dir, &["b.example.com", "a.example.com"], &[] as &[&str]);
        host.sync_metadata(SyncOptions::ports_and_flags(), &context()).unwrap();
        host.save_metadata().unwrap();

        let written = std::fs::read_to_string(dir.join(HOSTNAMES_FILE)).unwrap();
        assert_eq!(written, "a.example.com\nb.example.com\n");
        assert!(!dir.join(IP_ADDRESSES_FILE).exists());
        assert!(dir.join(METADATA_FILE).exists());
    }

    #[test]
    fn corrupt_metadata_is_an_error() {
        let (_root, dir) = host_dir("broken");
        write(&dir, METADATA_FILE, "{ not json");

        assert!(matches!(Host::open(&dir), Err(HostError::Decode { .. })));

        let mut host = Host::new(&dir);
        let err = host.sync_metadata(SyncOptions::all(), &context()).unwrap_err();
        assert!(matches!(err, HostError::Decode { .. }));
    }

    #[test]
    fn detached_host_is_never_saved() {
        let (_root, dir) = host_dir("broken");
        write(&dir, METADATA_FILE, "{ not json");

        let mut host = Host::detached(&dir);
        host.sync_metadata(SyncOptions::all(), &context()).unwrap();
        assert_eq!(host.name(), "broken");
        assert!(!host.save_metadata().unwrap());
        assert_eq!(std::fs::read_to_string(dir.join(METADATA_FILE)).unwrap(), "{ not json");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let (_root, dir) = host_dir("web");
        let mut host = Host::create(&dir, &["www.example.com"], &["10.0.0.5"]);
        host.sync_metadata(SyncOptions::ports_and_flags(), &context()).unwrap();

        assert!(host.matches("WWW.Example.com", false));
        assert!(host.matches("10.0.0.5", true));
        assert!(!host.matches("10.0.0.5", false));
    }

    #[test]
    fn dir_names_are_sanitized() {
        assert_eq!(safe_dir_name("WWW.Example.com"), "www.example.com");
        assert_eq!(safe_dir_name("fe80::1"), "fe80__1");
        assert_eq!(safe_dir_name("../.."), "_");
        assert_eq!(safe_dir_name("  "), UNKNOWN_NAME);
    }
}
