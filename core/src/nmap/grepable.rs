// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! `-oG` output reader.
//!
//! Each line has the shape `Host: <addr> (<name>)\t<Field>: <value>\t...`.
//! Only the `Status` and `Ports` fields are read. A port entry is
//! `port/state/protocol/owner/service/rpc/version/`, where a service of
//! `ssl|http` means http tunnelled over TLS.

use std::collections::HashMap;

use super::schema::{Address, Host, Hostname, Hostnames, Port, PortState, Ports, Run, Service, Status};

/// Parses grepable output into a run. Lines that do not fit the format are ignored.
pub fn parse_grepable(text: &str) -> Run {
    let mut hosts: Vec<Host> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let Some(head) = fields.next().and_then(|f| f.strip_prefix("Host: ")) else {
            continue;
        };
        let (addr, name) = split_host_field(head);
        if addr.is_empty() {
            continue;
        }

        let pos = *index.entry(addr.to_string()).or_insert_with(|| {
            hosts.push(new_host(addr));
            hosts.len() - 1
        });
        let host = &mut hosts[pos];

        if let Some(name) = name {
            let names = host.hostnames.get_or_insert_with(Hostnames::default);
            if !names.hostnames.iter().any(|h| h.name == name) {
                names.hostnames.push(Hostname {
                    name: name.to_string(),
                    name_type: "PTR".to_string(),
                });
            }
        }

        for field in fields {
            if let Some(state) = field.strip_prefix("Status: ") {
                host.status = Some(Status {
                    state: state.trim().to_ascii_lowercase(),
                    ..Status::default()
                });
            } else if let Some(list) = field.strip_prefix("Ports: ") {
                let ports = host.ports.get_or_insert_with(Ports::default);
                for port in list.split(", ").filter_map(parse_port_entry) {
                    if !ports.ports.iter().any(|p| p.key() == port.key()) {
                        ports.ports.push(port);
                    }
                }
            }
        }
    }

    Run {
        scanner: "nmap".to_string(),
        hosts,
        ..Run::default()
    }
}

fn split_host_field(head: &str) -> (&str, Option<&str>) {
    let head = head.trim();
    match head.split_once(' ') {
        Some((addr, rest)) => {
            let name = rest
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim();
            (addr, (!name.is_empty()).then_some(name))
        }
        None => (head, None),
    }
}

fn new_host(addr: &str) -> Host {
    let addr_type = if addr.contains(':') { "ipv6" } else { "ipv4" };
    Host {
        addresses: vec![Address {
            addr: addr.to_string(),
            addr_type: addr_type.to_string(),
            vendor: None,
        }],
        ..Host::default()
    }
}

fn parse_port_entry(entry: &str) -> Option<Port> {
    let parts: Vec<&str> = entry.trim().split('/').collect();
    if parts.len() < 3 {
        return None;
    }

    let port_id = parts[0].trim().parse::<u16>().ok()?;
    let state = parts[1].trim();
    let protocol = parts[2].trim().to_ascii_lowercase();
    if state.is_empty() || protocol.is_empty() {
        return None;
    }

    let raw_service = parts.get(4).map(|s| s.trim()).unwrap_or("");
    let version = parts.get(6).map(|s| s.trim()).unwrap_or("");
    let (tunnel, name) = match raw_service.split_once('|') {
        Some((tunnel, name)) => (tunnel, name),
        None => ("", raw_service),
    };

    let service = (!name.is_empty()).then(|| Service {
        name: name.to_string(),
        tunnel: tunnel.to_string(),
        product: version.to_string(),
        method: if version.is_empty() { "table" } else { "probed" }.to_string(),
        ..Service::default()
    });

    Some(Port {
        protocol,
        port_id,
        state: PortState {
            state: state.to_string(),
            ..PortState::default()
        },
        service,
        scripts: Vec::new(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
