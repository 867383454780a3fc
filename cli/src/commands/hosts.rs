// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use rekon_common::{info, warn};

use crate::commands::Workspace;
use crate::terminal::print::Print;

pub fn list(ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();
    let hosts = store.all();

    Print::header("inventory");
    if hosts.is_empty() {
        warn!("No hosts under {}", store.hosts_dir().display());
        return Ok(());
    }

    Print::hosts(&hosts);
    info!("{} hosts", hosts.len());
    Ok(())
}

pub fn show(keys: &[String], ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();
    let hosts = store.get(keys);

    if hosts.is_empty() {
        anyhow::bail!("no host matches {}", keys.join(", "));
    }

    Print::header("hosts");
    Print::hosts(&hosts);
    Ok(())
}
