// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Port Model
//!
//! A [`Port`] is one reachable service on a host, as recorded in the host's
//! metadata. Two ports are the same slot when they share `(protocol, id)`;
//! the service name is descriptive only.
//!
//! Ports order by number first and put TCP ahead of UDP on ties, which is the
//! order they are persisted and printed in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown protocol '{0}'")]
pub struct ParseProtocolError(pub String);

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(ParseProtocolError(other.to_string())),
        }
    }
}

/// A single open service on a host.
///
/// Field order matters: the derived `Ord` sorts by `id`, then `protocol`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Port {
    pub id: u16,
    pub protocol: Protocol,
    #[serde(default)]
    pub service: String,
}

impl Port {
    pub fn new(id: u16, protocol: Protocol, service: impl Into<String>) -> Self {
        Self {
            id,
            protocol,
            service: service.into(),
        }
    }

    pub fn tcp(id: u16, service: impl Into<String>) -> Self {
        Self::new(id, Protocol::Tcp, service)
    }

    pub fn udp(id: u16, service: impl Into<String>) -> Self {
        Self::new(id, Protocol::Udp, service)
    }

    /// The uniqueness key of this port.
    pub fn key(&self) -> (Protocol, u16) {
        (self.protocol, self.id)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.service.is_empty() {
            write!(f, "{}/{}", self.id, self.protocol)
        } else {
            write!(f, "{}/{} ({})", self.id, self.protocol, self.service)
        }
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
