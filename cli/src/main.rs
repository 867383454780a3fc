// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Rekon CLI Entry Point
//!
//! Bootstraps logging and terminal output, maps flags into [`RunOptions`],
//! loads the workspace and dispatches to the command modules.
//!
//! It is also the error boundary: anything a command propagates is logged
//! here and turned into a non-zero [`ExitCode`].

mod commands;
mod terminal;

use std::process::ExitCode;

use rekon_common::{config::RunOptions, error};

use crate::{
    commands::{CommandLine, Commands, Workspace, add, flag, hosts, merge, review, scope, sync},
    terminal::{logging, print::Print},
};

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.verbosity);

    let opts = RunOptions::from(&commands);
    let _ = Print::init(&opts);
    Print::banner();

    let exit_code = match run(&commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    };

    Print::end_of_program();
    exit_code
}

fn run(commands: &CommandLine) -> anyhow::Result<()> {
    if let Commands::Merge {
        files,
        up,
        open,
        output,
    } = &commands.command
    {
        return merge::merge(files, *up, *open, output.as_deref());
    }

    let ws = Workspace::load(commands)?;
    match &commands.command {
        Commands::List => hosts::list(&ws),
        Commands::Show { keys } => hosts::show(keys, &ws),
        Commands::Sync => sync::sync(&ws),
        Commands::Add { hostnames, ips } => add::add(hostnames, ips, &ws),
        Commands::Review { key, by, clear } => {
            let reviewer = if *clear { None } else { by.as_deref() };
            review::review(key, reviewer, &ws)
        }
        Commands::Flag { key, flag, remove } => flag::flag(key, flag, *remove, &ws),
        Commands::Scope { items, strict } => scope::scope(items, *strict, &ws),
        Commands::Roots {
            domains,
            keep_blacklisted,
        } => scope::roots(domains, *keep_blacklisted, &ws),
        Commands::Merge { .. } => Ok(()),
    }
}
