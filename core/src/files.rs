// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use rekon_common::{debug, warn};

/// Expands `pattern` relative to `dir`, returning matching paths sorted.
///
/// `dir` itself is escaped, so brackets or stars in a host directory name are
/// taken literally. Unreadable entries are logged and skipped.
pub fn glob_in(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", base.trim_end_matches('/'), pattern);

    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Invalid glob '{pattern}': {e}");
            return Vec::new();
        }
    };

    let mut found: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(verbosity = 1, "Skipping unreadable path: {e}");
                None
            }
        })
        .collect();
    found.sort();
    found
}

/// True when at least one path under `dir` matches `pattern`.
pub fn any_match(dir: &Path, pattern: &str) -> bool {
    !glob_in(dir, pattern).is_empty()
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
