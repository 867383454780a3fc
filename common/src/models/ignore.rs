// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Ignore Rules
//!
//! Some services show up on nearly every host and say nothing about it
//! (ephemeral RPC endpoints, `tcpwrapped` answers from a firewall). An
//! [`IgnoreService`] rule keeps such ports out of a host's port list and can
//! tag the host with an informational flag instead.
//!
//! Port selections use a small grammar, see [`PortSpec`]:
//! * `all`, `*` or an empty string select every port.
//! * `80`, `135,139,445` select single ports.
//! * `49152-65535` selects an inclusive range; ranges and singles mix freely.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortSpecError {
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("invalid port range '{0}'")]
    InvalidRange(String),
}

/// A set of port numbers, written as `all` or a comma list of ports and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PortSpec {
    #[default]
    All,
    List(Vec<RangeInclusive<u16>>),
}

impl PortSpec {
    pub fn contains(&self, port: u16) -> bool {
        match self {
            PortSpec::All => true,
            PortSpec::List(ranges) => ranges.iter().any(|r| r.contains(&port)),
        }
    }
}

impl FromStr for PortSpec {
    type Err = PortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" || s.eq_ignore_ascii_case("all") {
            return Ok(PortSpec::All);
        }

        let mut ranges = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            ranges.push(parse_part(part)?);
        }

        if ranges.is_empty() {
            return Ok(PortSpec::All);
        }
        Ok(PortSpec::List(ranges))
    }
}

fn parse_part(part: &str) -> Result<RangeInclusive<u16>, PortSpecError> {
    let Some((start, end)) = part.split_once('-') else {
        let port = parse_port(part)?;
        return Ok(port..=port);
    };

    let start = parse_port(start).map_err(|_| PortSpecError::InvalidRange(part.to_string()))?;
    let end = parse_port(end).map_err(|_| PortSpecError::InvalidRange(part.to_string()))?;
    if start > end {
        return Err(PortSpecError::InvalidRange(part.to_string()));
    }
    Ok(start..=end)
}

fn parse_port(s: &str) -> Result<u16, PortSpecError> {
    s.trim()
        .parse::<u16>()
        .map_err(|_| PortSpecError::InvalidPort(s.trim().to_string()))
}

impl TryFrom<String> for PortSpec {
    type Error = PortSpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortSpec> for String {
    fn from(spec: PortSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::All => f.write_str("all"),
            PortSpec::List(ranges) => {
                let parts: Vec<String> = ranges
                    .iter()
                    .map(|r| {
                        if r.start() == r.end() {
                            r.start().to_string()
                        } else {
                            format!("{}-{}", r.start(), r.end())
                        }
                    })
                    .collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// Policy rule suppressing a noisy service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreService {
    /// Service name as reported by nmap. Empty or `*` matches any service.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ports: PortSpec,

    /// Informational flag put on the host when this rule swallows a port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl IgnoreService {
    pub fn new(name: impl Into<String>, ports: PortSpec) -> Self {
        Self {
            name: name.into(),
            ports,
            flag: None,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn matches(&self, service: &str, port: u16) -> bool {
        let name_matches =
            self.name.is_empty() || self.name == "*" || self.name.eq_ignore_ascii_case(service);
        name_matches && self.ports.contains(port)
    }
}

/// Returns the first rule that swallows `service` on `port`.
pub fn find_rule<'a>(rules: &'a [IgnoreService], service: &str, port: u16) -> Option<&'a IgnoreService> {
    rules.iter().find(|rule| rule.matches(service, port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
