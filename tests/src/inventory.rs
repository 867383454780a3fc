// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::sync::Arc;

use rekon_common::config::{CONFIG_FILE_NAME, Config};
use rekon_common::models::port::Port;
use rekon_core::host::{Host, OPEN_PORTS, SyncContext, UNREVIEWED};
use rekon_core::nmap::{self, MergeOptions};
use rekon_core::scope::ScopeMatcher;
use rekon_core::store::HostStore;

use crate::utils::{WorkspaceFixture, nmap_xml};

const CONFIG: &str = r#"
[blacklist]
root_domains = ["example.net"]
domains = ["blog.example.com"]

[[hosts.ignore_services]]
name = "tcpwrapped"
ports = "all"
flag = "tcpwrapped"
"#;

fn workspace() -> anyhow::Result<WorkspaceFixture> {
    let ws = WorkspaceFixture::new()?;
    ws.write(CONFIG_FILE_NAME, CONFIG)?;
    ws.write("scope-domains.txt", "www.example.com\ntarget.subdomain.example.net\n")?;
    ws.write("scope-ips.txt", "10.0.0.0/24\n")?;
    ws.write("scope-domains-crtsh.txt", "shop.example.org\nfake.example.net\nblog.example.com\n")?;
    ws.write("scope-ips-asn.txt", "192.0.2.0/28\nnot-a-network\n")?;

    ws.host_file("www", "recon/hostnames.txt", "www.example.com\nlegacy.example.net\n")?;
    ws.host_file("www", "recon/ip-addresses.txt", "10.0.0.5\n")?;
    ws.host_file(
        "www",
        "recon/nmap-tcp.xml",
        &nmap_xml("10.0.0.5", 100, &[("tcp", 80, "open", "http"), ("tcp", 81, "open", "tcpwrapped")]),
    )?;
    ws.host_file("www", "recon/ffuf.json", "{}")?;

    ws.host_file("db", "recon/ip-addresses.txt", "10.0.0.6\n")?;
    ws.host_file("db", "recon/udp-ports.txt", "161 snmp\n")?;
    Ok(ws)
}

fn open_store(ws: &WorkspaceFixture) -> anyhow::Result<HostStore> {
    let config = Config::load_or_default(&ws.root().join(CONFIG_FILE_NAME))?;
    let scope = Arc::new(ScopeMatcher::from_files(ws.root(), config.blacklist.clone()));
    let ctx = SyncContext::new(scope, config.hosts);
    Ok(HostStore::new(ws.root(), ctx))
}

fn save_all(store: &HostStore) -> anyhow::Result<usize> {
    let mut changed = 0;
    for host in store.all() {
        let mut host: Host = host.clone();
        if host.save_metadata()? {
            changed += 1;
        }
    }
    Ok(changed)
}

#[test]
fn store_reconciles_workspace() -> anyhow::Result<()> {
    let ws = workspace()?;
    let store = open_store(&ws)?;

    assert_eq!(store.all_dir_names(), vec!["db", "www"]);

    let www = store.get_first(&["www.example.com"]).expect("www host");
    assert_eq!(www.name(), "legacy.example.net");
    assert_eq!(www.metadata.ports, vec![Port::tcp(80, "http")]);
    assert_eq!(www.metadata.tcp_ports, vec![80]);
    assert_eq!(www.metadata.root_domains.iter().collect::<Vec<_>>(), vec!["example.com"]);
    assert!(www.metadata.has_flag("ffuf"));
    assert!(www.metadata.has_flag("tcpwrapped"));
    assert!(www.metadata.has_flag(OPEN_PORTS));
    assert_eq!(www.metadata.flags.last().map(String::as_str), Some(UNREVIEWED));

    let db = store.get_by_ip(&["10.0.0.6"]);
    assert_eq!(db.len(), 1);
    assert_eq!(db[0].name(), "10.0.0.6");
    assert_eq!(db[0].metadata.udp_ports, vec![161]);
    assert!(db[0].metadata.has_flag("open-udp"));
    Ok(())
}

#[test]
fn scope_files_and_candidates() -> anyhow::Result<()> {
    let ws = workspace()?;
    let store = open_store(&ws)?;
    let scope = &store.context().scope;

    assert!(scope.is_in_scope("www.example.com", false));
    assert!(scope.is_in_scope("pizza.example.com", false));
    assert!(!scope.is_in_scope("blog.example.com", false));
    assert!(scope.is_in_scope("target.subdomain.example.net", false));
    assert!(!scope.is_in_scope("target.subdomain.example.net", true));
    assert!(!scope.is_in_scope("fake.example.net", false));

    assert!(scope.is_in_scope("shop.example.org", false));
    assert!(scope.is_in_scope("api.example.org", false));

    assert!(scope.is_in_scope("10.0.0.200", false));
    assert!(scope.is_in_scope("192.0.2.7", false));
    assert!(!scope.is_in_scope("192.0.2.70", false));
    assert!(!scope.is_in_scope("999.1.1.1", false));
    Ok(())
}

#[test]
fn sync_is_quiet_on_second_run() -> anyhow::Result<()> {
    let ws = workspace()?;

    let first = open_store(&ws)?;
    assert_eq!(save_all(&first)?, 2);
    let saved = ws.read("hosts/www/00_metadata.md")?;

    let second = open_store(&ws)?;
    assert_eq!(save_all(&second)?, 0);
    assert_eq!(ws.read("hosts/www/00_metadata.md")?, saved);

    assert_eq!(ws.read("hosts/db/recon/ip-addresses.txt")?, "10.0.0.6\n");
    Ok(())
}

#[test]
fn review_persists_across_runs() -> anyhow::Result<()> {
    let ws = workspace()?;
    let store = open_store(&ws)?;

    let mut www = store.get_first(&["10.0.0.5"]).expect("www host").clone();
    www.metadata.set_reviewed_by("alice");
    assert!(www.save_metadata()?);

    let reopened = open_store(&ws)?;
    let www = reopened.get_first(&["10.0.0.5"]).expect("www host");
    assert_eq!(www.metadata.reviewed_by, "alice");
    assert!(www.metadata.has_flag("Reviewed"));
    assert!(!www.metadata.has_flag(UNREVIEWED));
    Ok(())
}

#[test]
fn added_host_shows_up_in_next_store() -> anyhow::Result<()> {
    let ws = workspace()?;
    let store = open_store(&ws)?;
    assert_eq!(store.len(), 2);

    let added = store.add_host(&["mail.example.com"], &["10.0.0.7"])?.expect("host");
    assert_eq!(added.dir_name(), "mail.example.com");
    assert_eq!(added.name(), "mail.example.com");
    assert_eq!(store.len(), 2);

    let reopened = open_store(&ws)?;
    assert_eq!(reopened.len(), 3);
    let mail = reopened.get_first(&["MAIL.example.com"]).expect("mail host");
    assert!(mail.has_ip("10.0.0.7"));
    assert_eq!(save_all(&reopened)?, 2);
    Ok(())
}

#[test]
fn merged_scans_feed_port_resolution() -> anyhow::Result<()> {
    let ws = workspace()?;
    let early = ws.write("raw/a.xml", &nmap_xml("10.0.0.9", 100, &[("tcp", 80, "closed", "http"), ("tcp", 22, "open", "ssh")]))?;
    let late = ws.write("raw/b.xml", &nmap_xml("10.0.0.9", 200, &[("tcp", 80, "open", "http")]))?;

    for order in [[&early, &late], [&late, &early]] {
        let merged = nmap::merge(&order, MergeOptions::default().open_only())?;
        assert_eq!(merged.hosts.len(), 1);
        let ids: Vec<u16> = merged.hosts[0].port_list().iter().map(|p| p.port_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&80) && ids.contains(&22));
    }

    let merged = nmap::merge(&[&early, &late], MergeOptions::default())?;
    let target = ws.root().join("hosts/app/recon/nmap-merged.xml");
    std::fs::create_dir_all(target.parent().expect("parent"))?;
    nmap::write_file(&merged, &target)?;

    let store = open_store(&ws)?;
    let app = store.get_first(&["app"]).expect("app host");
    assert_eq!(app.metadata.ports, vec![Port::tcp(22, "ssh"), Port::tcp(80, "http")]);
    Ok(())
}
