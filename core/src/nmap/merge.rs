// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Folding repeated scans into one logical run.
//!
//! Hosts are keyed by their first address. When a key shows up again:
//! * addresses and hostnames are unioned;
//! * the later-starting scan provides the timing;
//! * a host seen `up` by any scan stays `up`;
//! * ports are merged per `(protocol, portid)`, see [`merge_port`].

use std::collections::HashMap;
use std::path::Path;

use rekon_common::debug;

use super::schema::{Finished, Host, HostStats, Port, Ports, Run, RunStats, Service};
use super::{NmapError, parse_file, parse_str, to_xml_string};

/// Output filters applied after merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub up_only: bool,
    pub open_only: bool,
}

impl MergeOptions {
    /// Drop hosts whose final status is not `up`.
    pub fn up_only(mut self) -> Self {
        self.up_only = true;
        self
    }

    /// Drop hosts without a non-closed port, then closed/filtered ports of the rest.
    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }
}

/// Parses every file in `paths` and merges them into one run.
///
/// The merged run is encoded and decoded once more, so the result is exactly
/// what a downstream reader of the written file would see.
pub fn merge<P: AsRef<Path>>(paths: &[P], opts: MergeOptions) -> Result<Run, NmapError> {
    let runs = paths
        .iter()
        .map(|p| parse_file(p.as_ref()))
        .collect::<Result<Vec<Run>, NmapError>>()?;

    let merged = merge_runs(runs, opts);
    let xml = to_xml_string(&merged)?;
    parse_str(&xml)
}

/// Merges already-decoded runs, in order.
pub fn merge_runs(runs: Vec<Run>, opts: MergeOptions) -> Run {
    let mut output = Run::default();
    let mut hosts: Vec<Host> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut finished: Option<Finished> = None;

    for (i, mut run) in runs.into_iter().enumerate() {
        if i == 0 {
            output.scanner = run.scanner.clone();
            output.args = run.args.clone();
            output.version = run.version.clone();
            output.xml_output_version = run.xml_output_version.clone();
            output.scan_info = run.scan_info.clone();
        }

        let earlier = match (run.start, output.start) {
            (Some(start), Some(current)) => start < current,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if earlier {
            output.start = run.start;
            output.start_str = run.start_str.clone();
        }

        if let Some(done) = run.run_stats.take().and_then(|s| s.finished) {
            let later = finished
                .as_ref()
                .is_none_or(|current| done.time.unwrap_or(0) >= current.time.unwrap_or(0));
            if later {
                finished = Some(done);
            }
        }

        for host in run.hosts {
            let key = host.key().to_string();
            match index.get(&key) {
                Some(&pos) => {
                    debug!(verbosity = 2, "Merging repeated scan of {key}");
                    merge_host(&mut hosts[pos], host);
                }
                None => {
                    index.insert(key, hosts.len());
                    hosts.push(host);
                }
            }
        }
    }

    if opts.up_only {
        hosts.retain(Host::is_up);
    }

    if opts.open_only {
        // Host selection looks at the ports before filtered ones are stripped.
        hosts.retain(|h| h.port_list().iter().any(|p| !p.is_closed()));
        for host in &mut hosts {
            if let Some(ports) = host.ports.as_mut() {
                ports.extra_ports.clear();
                ports.ports.retain(Port::is_reachable);
            }
        }
    }

    let up = hosts.iter().filter(|h| h.is_up()).count() as u32;
    let total = hosts.len() as u32;
    output.run_stats = Some(RunStats {
        finished,
        hosts: Some(HostStats {
            up,
            down: total - up,
            total,
        }),
    });
    output.hosts = hosts;
    output
}

fn merge_host(existing: &mut Host, incoming: Host) {
    let incoming_is_later = incoming.start_time.unwrap_or(0) >= existing.start_time.unwrap_or(0);

    for address in incoming.addresses {
        if !existing.addresses.contains(&address) {
            existing.addresses.push(address);
        }
    }

    if let Some(incoming_names) = incoming.hostnames {
        let names = existing.hostnames.get_or_insert_with(Default::default);
        for hostname in incoming_names.hostnames {
            if !names.hostnames.contains(&hostname) {
                names.hostnames.push(hostname);
            }
        }
    }

    if incoming_is_later {
        existing.start_time = incoming.start_time.or(existing.start_time);
        existing.end_time = incoming.end_time.or(existing.end_time);
    }

    let existing_up = existing.is_up();
    let incoming_up = incoming.status.as_ref().is_some_and(|s| s.state == "up");
    if incoming.status.is_some()
        && ((incoming_up && (incoming_is_later || !existing_up))
            || (!existing_up && incoming_is_later))
    {
        existing.status = incoming.status;
    }

    let Some(incoming_ports) = incoming.ports else {
        return;
    };
    let ports = existing.ports.get_or_insert_with(Ports::default);

    if incoming_is_later || ports.extra_ports.is_empty() {
        ports.extra_ports = incoming_ports.extra_ports;
    }

    for port in incoming_ports.ports {
        match ports.ports.iter().position(|p| p.key() == port.key()) {
            Some(pos) => {
                let merged = merge_port(&ports.ports[pos], &port, incoming_is_later);
                ports.ports[pos] = merged;
            }
            None => ports.ports.push(port),
        }
    }
}

/// Combines two records of the same port.
///
/// A non-closed record beats a closed one; otherwise the later scan wins. The
/// service is picked separately by [`most_accurate_service`], with `first` as
/// the first operand.
fn merge_port(first: &Port, second: &Port, second_is_later: bool) -> Port {
    let mut chosen = match (first.is_closed(), second.is_closed()) {
        (true, false) => second.clone(),
        (false, true) => first.clone(),
        _ if second_is_later => second.clone(),
        _ => first.clone(),
    };

    chosen.service =
        most_accurate_service(first.service.as_ref(), second.service.as_ref()).cloned();
    chosen
}

/// Picks the service record with the stronger identification.
///
/// Evidence (probed, or product/version/extra info present) beats none; with
/// evidence on both sides the higher confidence wins. Every tie keeps `a`, so
/// the result depends on argument order.
pub fn most_accurate_service<'a>(a: Option<&'a Service>, b: Option<&'a Service>) -> Option<&'a Service> {
    match (a, b) {
        (Some(a), Some(b)) => match (a.has_evidence(), b.has_evidence()) {
            (false, true) => Some(b),
            (true, true) if b.conf.unwrap_or(0) > a.conf.unwrap_or(0) => Some(b),
            _ => Some(a),
        },
        (Some(a), None) => Some(a),
        (None, b) => b,
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
