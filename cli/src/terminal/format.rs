// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::net::IpAddr;

use colored::*;
use rekon_common::models::port::{Port, Protocol};
use rekon_common::utils::redact;
use rekon_core::host::Host;

use crate::terminal::colors;
use crate::terminal::print::Detail;

pub fn name(name: &str, redacted: bool) -> String {
    if redacted {
        redact::identifier(name)
    } else {
        name.to_string()
    }
}

/// The tree rows printed under a host's name. Empty sections are left out.
pub fn host_details(host: &Host, redacted: bool) -> Vec<Detail> {
    let meta = &host.metadata;
    let mut details: Vec<Detail> = Vec::new();

    for hostname in &meta.hostnames {
        let shown = if redacted {
            redact::hostname(hostname)
        } else {
            hostname.clone()
        };
        details.push(("Hostname".to_string(), shown.color(colors::HOSTNAME)));
    }

    for ip in &meta.ip_addresses {
        details.push(ip_to_detail(ip, redacted));
    }

    if !meta.root_domains.is_empty() {
        let roots: Vec<String> = meta.root_domains.iter().map(|r| name(r, redacted)).collect();
        details.push(("Roots".to_string(), roots.join(", ").color(colors::ROOT_DOMAIN)));
    }

    if !meta.ports.is_empty() {
        let ports: Vec<String> = meta.ports.iter().map(port_to_string).collect();
        details.push(("Ports".to_string(), ports.join(" ").normal()));
    }

    details.push(("Flags".to_string(), meta.flags.join(", ").color(colors::FLAG)));

    if !meta.user_flags.is_empty() {
        let flags: Vec<&str> = meta.user_flags.iter().map(String::as_str).collect();
        details.push(("User".to_string(), flags.join(", ").color(colors::USER_FLAG)));
    }

    if meta.is_reviewed() {
        details.push(("Reviewer".to_string(), meta.reviewed_by.color(colors::TEXT_DEFAULT)));
    }

    details
}

fn ip_to_detail(ip: &str, redacted: bool) -> Detail {
    let shown = if redacted {
        redact::ip_addr(ip)
    } else {
        ip.to_string()
    };
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => ("IPv6".to_string(), shown.color(colors::IPV6_ADDR)),
        _ => ("IPv4".to_string(), shown.color(colors::IPV4_ADDR)),
    }
}

fn port_to_string(port: &Port) -> String {
    let color = match port.protocol {
        Protocol::Tcp => colors::TCP_PORT,
        Protocol::Udp => colors::UDP_PORT,
    };
    let id = format!("{}/{}", port.id, port.protocol).color(color);
    if port.service.is_empty() {
        id.to_string()
    } else {
        format!("{}{}", id, format!("({})", port.service).color(colors::SEPARATOR))
    }
}
