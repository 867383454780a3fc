// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::sync::OnceLock;

use anyhow::bail;
use colored::*;
use rekon_common::config::RunOptions;
use rekon_core::host::Host;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};

pub const TOTAL_WIDTH: usize = 64;

static PRINT: OnceLock<Print> = OnceLock::new();

pub type Detail = (String, ColoredString);

#[macro_export]
macro_rules! rprint {
    () => {
        $crate::rprint!("");
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: "rekon::print",
            raw_msg = %format_args!($($arg)*)
        );
    };
}

pub struct Print {
    no_banner: bool,
    q_level: u8,
    redact: bool,
}

impl Print {
    fn new(opts: &RunOptions) -> Self {
        Self {
            no_banner: opts.no_banner,
            q_level: opts.quiet,
            redact: opts.redact,
        }
    }

    pub fn init(opts: &RunOptions) -> anyhow::Result<()> {
        if PRINT.set(Self::new(opts)).is_err() {
            bail!("terminal has already been initialized")
        }
        Ok(())
    }

    fn get() -> &'static Self {
        PRINT.get_or_init(|| Self::new(&RunOptions::default()))
    }

    pub fn banner() {
        let p = Self::get();
        if p.no_banner || p.q_level > 0 {
            return;
        }

        let text_content: String = format!("⟦ REKON v{} ⟧ ", env!("CARGO_PKG_VERSION"));
        let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
        let text: ColoredString = text_content.bright_green().bold();
        let sep: ColoredString = "═"
            .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
            .bright_black();

        rprint!("{}{}{}", sep, text, sep);
    }

    pub fn header(msg: &str) {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }

        let formatted: String = format!("⟦ {} ⟧", msg);
        let msg_len: usize = formatted.width();

        let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
        let left: usize = dash_count / 2;
        let right: usize = dash_count - left;

        let line: ColoredString = format!(
            "{}{}{}",
            "─".repeat(left),
            formatted.to_uppercase().bright_green(),
            "─".repeat(right)
        )
        .bright_black();

        rprint!("{}", line);
    }

    /// Trees at the default level; one name per line with `-qq`.
    pub fn hosts(hosts: &[&Host]) {
        let p = Self::get();
        for (idx, host) in hosts.iter().enumerate() {
            if p.q_level >= 2 {
                rprint!("{}", format::name(host.name(), p.redact));
                continue;
            }

            tree_head(idx, &format::name(host.name(), p.redact));
            as_tree(format::host_details(host, p.redact));
            if idx + 1 != hosts.len() {
                rprint!();
            }
        }
    }

    /// One `in`/`out` verdict per item.
    pub fn verdicts(results: &[(String, bool)]) {
        let p = Self::get();
        let width = results.iter().map(|(item, _)| item.width()).max().unwrap_or(0);

        for (item, in_scope) in results {
            let shown = if p.redact {
                rekon_common::utils::redact::identifier(item)
            } else {
                item.clone()
            };
            let verdict = if *in_scope {
                "in scope".color(colors::IN_SCOPE).bold()
            } else {
                "out of scope".color(colors::OUT_OF_SCOPE).bold()
            };

            if p.q_level >= 2 {
                rprint!("{}\t{}", shown, if *in_scope { "in" } else { "out" });
            } else {
                let pad = ".".repeat((width + 2).saturating_sub(shown.width()));
                rprint!(
                    "{} {}{} {}",
                    ">".color(colors::SEPARATOR),
                    shown.color(colors::PRIMARY),
                    pad.color(colors::SEPARATOR),
                    verdict
                );
            }
        }
    }

    /// Plain list, one value per line.
    pub fn values<S: AsRef<str>>(values: &[S], color: Color) {
        let p = Self::get();
        for value in values {
            let shown = if p.redact {
                rekon_common::utils::redact::identifier(value.as_ref())
            } else {
                value.as_ref().to_string()
            };
            if p.q_level >= 2 {
                rprint!("{}", shown);
            } else {
                rprint!("{} {}", ">".color(colors::SEPARATOR), shown.color(color));
            }
        }
    }

    pub fn end_of_program() {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }
        divider();
    }
}

pub fn divider() {
    rprint!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR));
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    rprint!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
}

pub fn as_tree(details: Vec<Detail>) {
    let padding_width: usize = details.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    for (i, (key, value)) in details.iter().enumerate() {
        let last: bool = i + 1 == details.len();
        let branch: ColoredString = if !last { "├─" } else { "└─" }.bright_black();

        let dots_count: usize = padding_width.saturating_sub(key.len());
        let dots: ColoredString = ".".repeat(dots_count).color(colors::SEPARATOR);

        rprint!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots,
            ":".color(colors::SEPARATOR),
            value
        );
    }
}
