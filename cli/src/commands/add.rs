// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use anyhow::bail;
use rekon_common::{success, warn};

use crate::commands::Workspace;
use crate::terminal::print::Print;

pub fn add(hostnames: &[String], ips: &[String], ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();

    let keys: Vec<&String> = hostnames.iter().chain(ips).collect();
    if let Some(existing) = store.get_first(&keys) {
        warn!("{} already tracks one of these identities", existing.dir().display());
        return Ok(());
    }

    let Some(host) = store.add_host(hostnames, ips)? else {
        bail!("give at least one --hostname or --ip");
    };

    success!("Added {}", host.dir().display());
    Print::hosts(&[&host]);
    Ok(())
}
