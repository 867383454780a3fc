// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use rekon_common::{error, success};

use crate::commands::Workspace;

/// Building the store already runs a full sync of every host; this persists it.
pub fn sync(ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();
    let mut changed = 0;
    let mut failed = 0;

    for host in store.all() {
        let mut host = host.clone();
        match host.save_metadata() {
            Ok(true) => changed += 1,
            Ok(false) => {}
            Err(e) => {
                error!("{e}");
                failed += 1;
            }
        }
    }

    success!("Synced {} hosts, {} changed", store.len(), changed);
    if failed > 0 {
        anyhow::bail!("{failed} hosts could not be saved");
    }
    Ok(())
}
