// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Partial nmap XML schema.
//!
//! Only the parts used for merging and port resolution are modelled; every
//! other element (`<times>`, `<os>`, `<hostscript>`, task progress, ...) is
//! skipped on decode and therefore absent from re-encoded output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(rename = "@scanner", default)]
    pub scanner: String,
    #[serde(rename = "@args", default, skip_serializing_if = "String::is_empty")]
    pub args: String,
    #[serde(rename = "@start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(rename = "@startstr", default, skip_serializing_if = "String::is_empty")]
    pub start_str: String,
    #[serde(rename = "@version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(rename = "@xmloutputversion", default, skip_serializing_if = "String::is_empty")]
    pub xml_output_version: String,

    #[serde(rename = "scaninfo", default, skip_serializing_if = "Vec::is_empty")]
    pub scan_info: Vec<ScanInfo>,
    #[serde(rename = "host", default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<Host>,
    #[serde(rename = "runstats", default, skip_serializing_if = "Option::is_none")]
    pub run_stats: Option<RunStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanInfo {
    #[serde(rename = "@type", default)]
    pub scan_type: String,
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@numservices", default, skip_serializing_if = "Option::is_none")]
    pub num_services: Option<u32>,
    #[serde(rename = "@services", default, skip_serializing_if = "String::is_empty")]
    pub services: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(rename = "@starttime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(rename = "@endtime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(rename = "address", default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostnames: Option<Hostnames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Ports>,
}

impl Host {
    /// Identity used when merging: the first address, or empty.
    pub fn key(&self) -> &str {
        self.addresses.first().map(|a| a.addr.as_str()).unwrap_or("")
    }

    pub fn is_up(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.state == "up")
    }

    pub fn port_list(&self) -> &[Port] {
        self.ports.as_ref().map(|p| p.ports.as_slice()).unwrap_or(&[])
    }

    pub fn hostname_list(&self) -> &[Hostname] {
        self.hostnames
            .as_ref()
            .map(|h| h.hostnames.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(rename = "@reason_ttl", default, skip_serializing_if = "Option::is_none")]
    pub reason_ttl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr")]
    pub addr: String,
    #[serde(rename = "@addrtype", default)]
    pub addr_type: String,
    #[serde(rename = "@vendor", default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<Hostname>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type", default, skip_serializing_if = "String::is_empty")]
    pub name_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ports {
    #[serde(rename = "extraports", default, skip_serializing_if = "Vec::is_empty")]
    pub extra_ports: Vec<ExtraPorts>,
    #[serde(rename = "port", default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraPorts {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@count", default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Port {
    #[serde(rename = "@protocol")]
    pub protocol: String,
    #[serde(rename = "@portid")]
    pub port_id: u16,

    #[serde(default)]
    pub state: PortState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(rename = "script", default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<Script>,
}

impl Port {
    pub fn key(&self) -> (String, u16) {
        (self.protocol.to_ascii_lowercase(), self.port_id)
    }

    pub fn is_closed(&self) -> bool {
        self.state.state == "closed"
    }

    /// Neither `closed` nor `filtered`.
    pub fn is_reachable(&self) -> bool {
        !matches!(self.state.state.as_str(), "closed" | "filtered")
    }

    pub fn service_name(&self) -> &str {
        self.service.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(rename = "@reason_ttl", default, skip_serializing_if = "Option::is_none")]
    pub reason_ttl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@product", default, skip_serializing_if = "String::is_empty")]
    pub product: String,
    #[serde(rename = "@version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(rename = "@extrainfo", default, skip_serializing_if = "String::is_empty")]
    pub extra_info: String,
    #[serde(rename = "@ostype", default, skip_serializing_if = "String::is_empty")]
    pub os_type: String,
    #[serde(rename = "@tunnel", default, skip_serializing_if = "String::is_empty")]
    pub tunnel: String,
    #[serde(rename = "@method", default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(rename = "@conf", default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<u8>,
}

impl Service {
    /// Probed, or carrying any product/version details.
    pub fn has_evidence(&self) -> bool {
        self.method == "probed"
            || !self.product.is_empty()
            || !self.version.is_empty()
            || !self.extra_info.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@output", default)]
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<Finished>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<HostStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finished {
    #[serde(rename = "@time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(rename = "@timestr", default, skip_serializing_if = "String::is_empty")]
    pub time_str: String,
    #[serde(rename = "@elapsed", default, skip_serializing_if = "String::is_empty")]
    pub elapsed: String,
    #[serde(rename = "@summary", default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(rename = "@exit", default, skip_serializing_if = "String::is_empty")]
    pub exit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStats {
    #[serde(rename = "@up", default)]
    pub up: u32,
    #[serde(rename = "@down", default)]
    pub down: u32,
    #[serde(rename = "@total", default)]
    pub total: u32,
}
