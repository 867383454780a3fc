// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Port Resolution
//!
//! Turns the scan artifacts of one host directory into a canonical port list.
//!
//! Sources, by priority:
//! 1. **Thorough nmap XML**: every file matched by the configured glob whose
//!    name does not contain `quick`.
//! 2. **Quick nmap XML**: only consulted when the thorough files produced no
//!    TCP port at all.
//! 3. **Grepable output** (`recon/nmap-*.gnmap`): only when no XML exists.
//! 4. **Port lists** (`recon/<protocol>N-ports.txt`): fill empty slots only.
//!
//! Files of one priority level are read one by one in name order. A later
//! file overwrites a slot it reports as reachable, and never clears one, so a
//! port seen open in any scan survives later `closed` or `filtered` records.
//! Anything that cannot be read or decoded is skipped with a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rekon_common::models::ignore::{IgnoreService, find_rule};
use rekon_common::models::port::{Port, Protocol};
use rekon_common::utils::lines::read_lines;
use rekon_common::{debug, warn};

use crate::files::{file_name, glob_in};
use crate::nmap::{self, Run, Service};

pub const GNMAP_GLOB: &str = "recon/nmap-*.gnmap";
pub const PORT_LIST_GLOB: &str = "recon/*-ports.txt";

const PORT_LIST_SUFFIX: &str = "-ports.txt";

#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions<'a> {
    pub ignore_rules: &'a [IgnoreService],
    /// Glob relative to the host directory selecting nmap XML files.
    pub nmap_xml_glob: &'a str,
    /// False when the host is flagged to distrust quick scans.
    pub use_quick_scans: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPorts {
    /// Sorted by id, tcp before udp.
    pub ports: Vec<Port>,
    /// Flags contributed by ignore rules that swallowed a port.
    pub flags: BTreeSet<String>,
}

type Slots = BTreeMap<(Protocol, u16), Port>;

pub fn resolve_ports(host_dir: &Path, opts: &ResolveOptions<'_>) -> ResolvedPorts {
    let mut slots = Slots::new();
    let mut flags = BTreeSet::new();

    let mut scans = glob_in(host_dir, opts.nmap_xml_glob);
    if scans.is_empty() {
        scans = glob_in(host_dir, GNMAP_GLOB);
    }
    let (quick, thorough): (Vec<PathBuf>, Vec<PathBuf>) =
        scans.into_iter().partition(|p| file_name(p).contains("quick"));

    for run in load_runs(&thorough) {
        collect_run(&run, opts, &mut slots, &mut flags);
    }

    let has_tcp = slots.keys().any(|(protocol, _)| *protocol == Protocol::Tcp);
    if !has_tcp && !quick.is_empty() {
        if opts.use_quick_scans {
            debug!(verbosity = 1, "No TCP ports in thorough scans of {}, falling back to quick scans", host_dir.display());
            for run in load_runs(&quick) {
                collect_run(&run, opts, &mut slots, &mut flags);
            }
        } else {
            debug!(verbosity = 1, "Quick scans of {} are ignored by user flag", host_dir.display());
        }
    }

    for path in glob_in(host_dir, PORT_LIST_GLOB) {
        collect_port_list(&path, opts, &mut slots, &mut flags);
    }

    // BTreeMap keys are (protocol, id); the output orders by id first.
    let mut ports: Vec<Port> = slots.into_values().collect();
    ports.sort();

    ResolvedPorts { ports, flags }
}

/// Decodes every readable scan in `paths`, keeping their order.
fn load_runs(paths: &[PathBuf]) -> Vec<Run> {
    paths.iter().filter_map(|path| load_run(path)).collect()
}

fn load_run(path: &Path) -> Option<Run> {
    let is_grepable = path.extension().is_some_and(|ext| ext == "gnmap");
    if is_grepable {
        return match std::fs::read_to_string(path) {
            Ok(text) => Some(nmap::parse_grepable(&text)),
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                None
            }
        };
    }

    match nmap::parse_file(path) {
        Ok(run) => Some(run),
        Err(e) => {
            warn!("Skipping {e}");
            None
        }
    }
}

fn collect_run(run: &Run, opts: &ResolveOptions<'_>, slots: &mut Slots, flags: &mut BTreeSet<String>) {
    for port in run.hosts.iter().flat_map(|h| h.port_list()) {
        if !port.is_reachable() {
            continue;
        }
        let Ok(protocol) = port.protocol.parse::<Protocol>() else {
            debug!(verbosity = 2, "Ignoring port {} with protocol {}", port.port_id, port.protocol);
            continue;
        };

        if swallowed(opts.ignore_rules, port.service_name(), port.port_id, flags) {
            continue;
        }

        let service = normalize_service(port.port_id, port.service.as_ref());
        slots.insert((protocol, port.port_id), Port::new(port.port_id, protocol, service));
    }
}

fn collect_port_list(path: &Path, opts: &ResolveOptions<'_>, slots: &mut Slots, flags: &mut BTreeSet<String>) {
    let Some(protocol) = port_list_protocol(path) else {
        debug!(verbosity = 1, "Cannot tell protocol of {}, skipping", path.display());
        return;
    };

    for line in read_lines(path) {
        let mut parts = line.split_whitespace();
        let Some(id) = parts.next().and_then(|p| p.parse::<u16>().ok()) else {
            debug!(verbosity = 2, "Bad line in {}: {line}", path.display());
            continue;
        };
        let service = parts.next().unwrap_or("");

        if slots.contains_key(&(protocol, id)) {
            continue;
        }
        if swallowed(opts.ignore_rules, service, id, flags) {
            continue;
        }
        slots.insert((protocol, id), Port::new(id, protocol, service));
    }
}

fn swallowed(rules: &[IgnoreService], service: &str, id: u16, flags: &mut BTreeSet<String>) -> bool {
    let Some(rule) = find_rule(rules, service, id) else {
        return false;
    };
    if let Some(flag) = &rule.flag {
        flags.insert(flag.clone());
    }
    true
}

/// `tcp1-ports.txt` -> tcp, `udp-ports.txt` -> udp.
fn port_list_protocol(path: &Path) -> Option<Protocol> {
    let name = file_name(path);
    let prefix = name.strip_suffix(PORT_LIST_SUFFIX)?;
    prefix
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .parse()
        .ok()
}

fn normalize_service(id: u16, service: Option<&Service>) -> String {
    let name = service.map(|s| s.name.as_str()).unwrap_or("");
    let tunnelled = service.is_some_and(|s| s.tunnel == "ssl");

    if id == 80 {
        "http".to_string()
    } else if id == 443 || (tunnelled && name.starts_with("http")) {
        "https".to_string()
    } else {
        name.to_string()
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
