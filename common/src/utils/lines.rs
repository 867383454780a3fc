// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Helpers for the one-value-per-line files the inventory is built from
//! (`hostnames.txt`, `scope-domains.txt`, ...).

use std::io::{self, ErrorKind};
use std::path::Path;

use crate::warn;

/// Reads the non-empty, non-comment lines of `path`, trimmed.
///
/// A missing file is "no data". Any other read failure is logged and also
/// treated as no data.
pub fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_lines(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!("Could not read {}: {e}", path.display());
            Vec::new()
        }
    }
}

pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Writes one value per line, creating parent directories as needed.
pub fn write_lines<S: AsRef<str>>(path: &Path, values: &[S]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut content = String::new();
    for value in values {
        content.push_str(value.as_ref());
        content.push('\n');
    }
    std::fs::write(path, content)
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

    #[test]
    fn parse_skips_blanks_and_comments() {
        let lines = parse_lines("# header\n\n  www.example.com  \r\nmail.example.com\n");
        assert_eq!(lines, vec!["www.example.com", "mail.example.com"]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_lines(&dir.path().join("nope.txt")).is_empty());
    }

    #[test]
    fn write_then_read_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon").join("hostnames.txt");
        write_lines(&path, &["a.example.com", "b.example.com"]).unwrap();

        assert_eq!(read_lines(&path), vec!["a.example.com", "b.example.com"]);
    }
}
