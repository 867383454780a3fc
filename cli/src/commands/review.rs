// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use rekon_common::{info, success};

use crate::commands::{Workspace, find_host};

pub fn review(key: &str, reviewer: Option<&str>, ws: &Workspace) -> anyhow::Result<()> {
    let store = ws.store();
    let mut host = find_host(&store, key)?.clone();

    host.metadata.set_reviewed_by(reviewer.unwrap_or_default());
    if !host.save_metadata()? {
        info!("{} is unchanged", host.name());
        return Ok(());
    }

    match reviewer {
        Some(by) => success!("{} reviewed by {by}", host.name()),
        None => success!("Cleared review of {}", host.name()),
    }
    Ok(())
}
