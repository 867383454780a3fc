// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Utilities for privacy-preserving output.
//!
//! Assessment inventories name a client's infrastructure. When output is shared
//! (screenshots, reports, tickets) the `--redact` flag routes hostnames and
//! addresses through these helpers so the structure stays readable while the
//! identifying parts are masked.

use std::net::IpAddr;

/// Redacts a hostname while keeping its public suffix visible.
///
/// The first two characters and the last label survive, everything between is
/// replaced with a fixed run of 'X's. Names of four characters or less are
/// fully masked.
///
/// # Examples
/// ```
/// use rekon_common::utils::redact;
///
/// assert_eq!(redact::hostname("intranet.example.com"), "inXXXXX.com");
/// assert_eq!(redact::hostname("workstation"), "woXXXXXon");
/// assert_eq!(redact::hostname("pc"), "XXXXX");
/// ```
pub fn hostname(name: &str) -> String {
    let len = name.len();
    if len <= 4 || !name.is_ascii() {
        return "XXXXX".to_string();
    }

    let first_two = &name[..2];
    match name.rsplit_once('.') {
        Some((_, tld)) if !tld.is_empty() && tld.len() + 2 < len => {
            format!("{first_two}XXXXX.{tld}")
        }
        _ => format!("{first_two}XXXXX{}", &name[len - 2..]),
    }
}

/// Redacts an IP address, keeping only the leading network part.
///
/// IPv4 keeps the first octet, IPv6 keeps the first 16-bit segment.
///
/// # Examples
/// ```
/// use rekon_common::utils::redact;
///
/// assert_eq!(redact::ip_addr("10.20.30.40"), "10.X.X.X");
/// assert_eq!(redact::ip_addr("2001:db8::1"), "2001::XXXX");
/// assert_eq!(redact::ip_addr("not-an-ip"), "XXXXX");
/// ```
pub fn ip_addr(ip: &str) -> String {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => format!("{}.X.X.X", v4.octets()[0]),
        Ok(IpAddr::V6(v6)) => format!("{:x}::XXXX", v6.segments()[0]),
        Err(_) => "XXXXX".to_string(),
    }
}

/// Redacts either kind of host identifier.
pub fn identifier(value: &str) -> String {
    if value.parse::<IpAddr>().is_ok() {
        ip_addr(value)
    } else {
        hostname(value)
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
