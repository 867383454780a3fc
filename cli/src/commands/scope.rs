// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use rekon_common::info;

use crate::commands::Workspace;
use crate::terminal::{colors, print::Print};

pub fn scope(items: &[String], strict: bool, ws: &Workspace) -> anyhow::Result<()> {
    let matcher = ws.scope();
    let results: Vec<(String, bool)> = items
        .iter()
        .map(|item| (item.clone(), matcher.is_in_scope(item, strict)))
        .collect();

    Print::header("scope");
    Print::verdicts(&results);

    let inside = results.iter().filter(|(_, in_scope)| *in_scope).count();
    info!("{inside} of {} in scope", results.len());
    Ok(())
}

pub fn roots(domains: &[String], keep_blacklisted: bool, ws: &Workspace) -> anyhow::Result<()> {
    let roots = ws.scope().get_root_domains(domains, !keep_blacklisted);

    Print::header("root domains");
    Print::values(&roots, colors::ROOT_DOMAIN);
    Ok(())
}
