// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rekon_common::success;
use rekon_core::nmap::{self, MergeOptions};

pub fn merge(files: &[PathBuf], up: bool, open: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let mut opts = MergeOptions::default();
    if up {
        opts = opts.up_only();
    }
    if open {
        opts = opts.open_only();
    }

    let run = nmap::merge(files, opts)?;

    match output {
        Some(path) => {
            nmap::write_file(&run, path)?;
            success!("Merged {} files into {} ({} hosts)", files.len(), path.display(), run.hosts.len());
        }
        None => {
            let xml = nmap::to_xml_string(&run)?;
            std::io::stdout()
                .lock()
                .write_all(xml.as_bytes())
                .context("failed to write merged XML to stdout")?;
        }
    }
    Ok(())
}
