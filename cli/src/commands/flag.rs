// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use rekon_common::{info, success};
use rekon_core::host::SyncOptions;

use crate::commands::{Workspace, find_host};

pub fn flag(key: &str, flag: &str, remove: bool, ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();
    let mut host = find_host(&store, key)?.clone();

    let touched = if remove {
        host.metadata.remove_user_flag(flag)
    } else {
        host.metadata.add_user_flag(flag)
    };
    if !touched {
        info!("{} is unchanged", host.name());
        return Ok(());
    }

    // User flags can change port resolution (IgnoreQuickScan).
    host.sync_metadata(SyncOptions::ports_and_flags(), store.context())?;
    host.save_metadata()?;

    let verb = if remove { "Removed" } else { "Set" };
    success!("{verb} user flag '{flag}' on {}", host.name());
    Ok(())
}
