// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Host Metadata
//!
//! The serializable snapshot of a host, stored as JSON in `00_metadata.md`.
//!
//! ## Derived Fields
//! * **Projections**: `tcp_ports` and `udp_ports` always mirror `ports`.
//! * **Flags**: recomputed by sync, never edited by hand. Exactly one of
//!   [`REVIEWED`] / [`UNREVIEWED`] is present at any time.
//! * **User Flags**: belong to the user; sync never touches them.

use std::collections::BTreeSet;

use rekon_common::models::port::{Port, Protocol};
use serde::{Deserialize, Serialize};

pub const REVIEWED: &str = "Reviewed";
pub const UNREVIEWED: &str = "Unreviewed";

pub const OPEN_TCP: &str = "open-tcp";
pub const OPEN_UDP: &str = "open-udp";
pub const OPEN_PORTS: &str = "OpenPorts";

/// User flag disabling the quick-scan fallback of port resolution.
pub const IGNORE_QUICK_SCAN: &str = "IgnoreQuickScan";

/// Name used when nothing better is known.
pub const UNKNOWN_NAME: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Display identity of the host.
    pub name: String,

    pub hostnames: BTreeSet<String>,
    pub ip_addresses: BTreeSet<String>,

    /// Registrable domains of `hostnames`, blacklisted roots removed.
    pub root_domains: BTreeSet<String>,

    pub ports: Vec<Port>,
    pub tcp_ports: Vec<u16>,
    pub udp_ports: Vec<u16>,

    pub flags: Vec<String>,
    pub user_flags: BTreeSet<String>,

    /// Who reviewed the host; empty means unreviewed.
    pub reviewed_by: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            hostnames: BTreeSet::new(),
            ip_addresses: BTreeSet::new(),
            root_domains: BTreeSet::new(),
            ports: Vec::new(),
            tcp_ports: Vec::new(),
            udp_ports: Vec::new(),
            flags: vec![UNREVIEWED.to_string()],
            user_flags: BTreeSet::new(),
            reviewed_by: String::new(),
        }
    }
}

impl Metadata {
    pub fn is_reviewed(&self) -> bool {
        !self.reviewed_by.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn has_open_ports(&self) -> bool {
        !self.ports.is_empty()
    }

    /// Replaces the port list and its per-protocol projections.
    pub fn set_ports(&mut self, ports: Vec<Port>) {
        self.ports = ports;
        self.project_ports();
    }

    /// Rebuilds `tcp_ports` / `udp_ports` from `ports`.
    pub fn project_ports(&mut self) {
        let ids = |protocol: Protocol| -> Vec<u16> {
            self.ports
                .iter()
                .filter(|p| p.protocol == protocol)
                .map(|p| p.id)
                .collect()
        };
        self.tcp_ports = ids(Protocol::Tcp);
        self.udp_ports = ids(Protocol::Udp);
    }

    pub fn set_reviewed_by(&mut self, reviewer: impl Into<String>) {
        self.reviewed_by = reviewer.into().trim().to_string();
        self.refresh_review_flag();
    }

    /// Drops every copy of the review pair and appends the current one.
    pub fn refresh_review_flag(&mut self) {
        self.flags.retain(|f| f != REVIEWED && f != UNREVIEWED);
        let current = if self.is_reviewed() { REVIEWED } else { UNREVIEWED };
        self.flags.push(current.to_string());
    }

    /// Appends an auto-derived flag unless already present.
    pub fn push_flag(&mut self, flag: impl Into<String>) {
        let flag = flag.into();
        if !self.has_flag(&flag) {
            self.flags.push(flag);
        }
    }

    /// Returns false if the flag was already set.
    pub fn add_user_flag(&mut self, flag: &str) -> bool {
        let flag = flag.trim();
        !flag.is_empty() && self.user_flags.insert(flag.to_string())
    }

    /// Returns false if the flag was not set.
    pub fn remove_user_flag(&mut self, flag: &str) -> bool {
        self.user_flags.remove(flag.trim())
    }

    pub fn has_user_flag(&self, flag: &str) -> bool {
        self.user_flags.contains(flag)
    }

    /// Pretty JSON, newline terminated. This is the byte form compared on save.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
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
    use proptest::prelude::*;

    fn review_flags(meta: &Metadata) -> Vec<&str> {
        meta.flags
            .iter()
            .map(String::as_str)
            .filter(|f| *f == REVIEWED || *f == UNREVIEWED)
            .collect()
    }

    #[test]
    fn default_is_unreviewed() {
        let meta = Metadata::default();
        assert_eq!(meta.flags, vec![UNREVIEWED]);
        assert!(!meta.is_reviewed());
    }

    #[test]
    fn review_flag_follows_reviewer() {
        let mut meta = Metadata::default();
        meta.set_reviewed_by("alice");
        assert_eq!(review_flags(&meta), vec![REVIEWED]);

        meta.set_reviewed_by("  ");
        assert_eq!(review_flags(&meta), vec![UNREVIEWED]);
    }

    #[test]
    fn refresh_removes_stale_duplicates() {
        let mut meta = Metadata {
            flags: vec![REVIEWED.into(), "gobuster".into(), UNREVIEWED.into(), REVIEWED.into()],
            ..Metadata::default()
        };
        meta.refresh_review_flag();
        assert_eq!(meta.flags, vec!["gobuster", UNREVIEWED]);
    }

    #[test]
    fn user_flags_are_a_set() {
        let mut meta = Metadata::default();
        assert!(meta.add_user_flag("IgnoreQuickScan"));
        assert!(!meta.add_user_flag("IgnoreQuickScan"));
        assert!(!meta.add_user_flag("   "));
        assert!(meta.has_user_flag(IGNORE_QUICK_SCAN));
        assert!(meta.remove_user_flag("IgnoreQuickScan"));
        assert!(!meta.remove_user_flag("IgnoreQuickScan"));
    }

    #[test]
    fn json_uses_snake_case_keys_and_tolerates_missing_fields() {
        let json = Metadata::default().to_json().unwrap();
        assert!(json.contains("\"ip_addresses\""));
        assert!(json.contains("\"reviewed_by\""));
        assert!(json.ends_with('\n'));

        let partial = Metadata::from_json(r#"{"name": "www.example.com", "reviewed_by": "bob"}"#).unwrap();
        assert_eq!(partial.name, "www.example.com");
        assert!(partial.tcp_ports.is_empty());
    }

    proptest! {
        #[test]
        fn projections_match_ports(raw in proptest::collection::btree_set((any::<u16>(), any::<bool>()), 0..40)) {
            let ports: Vec<Port> = raw
                .iter()
                .map(|(id, udp)| if *udp { Port::udp(*id, "") } else { Port::tcp(*id, "") })
                .collect();

            let mut meta = Metadata::default();
            meta.set_ports(ports);

            prop_assert_eq!(meta.tcp_ports.len() + meta.udp_ports.len(), meta.ports.len());
            for id in &meta.tcp_ports {
                prop_assert!(meta.ports.contains(&Port::tcp(*id, "")));
            }
            for id in &meta.udp_ports {
                prop_assert!(meta.ports.contains(&Port::udp(*id, "")));
            }
        }

        #[test]
        fn exactly_one_review_flag(reviewers in proptest::collection::vec("[a-z ]{0,6}", 1..8)) {
            let mut meta = Metadata::default();
            for reviewer in reviewers {
                meta.set_reviewed_by(reviewer);
                let flags = review_flags(&meta);
                prop_assert_eq!(flags.len(), 1);
                prop_assert_eq!(flags[0] == REVIEWED, !meta.reviewed_by.is_empty());
            }
        }
    }
}
