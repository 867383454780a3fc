// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Scope Matching
//!
//! Decides whether a domain or IP address is in bounds for the assessment.
//!
//! ## Domains
//! A domain is reduced to its *root domain* (public suffix plus one label,
//! `a.b.example.co.uk` -> `example.co.uk`) and then checked in this order:
//!
//! 1. With blacklist precedence requested, a blacklisted root is a hard veto.
//! 2. A domain listed verbatim in the explicit scope is in scope.
//! 3. A domain under an in-scope root is in scope unless a blacklisted domain
//!    pattern matches it.
//! 4. Everything else is out of scope.
//!
//! ## IP addresses
//! Exact match against explicit addresses or containment in an explicit CIDR.
//! Input that does not parse is never in scope.
//!
//! ## Loading
//! [`ScopeMatcher::from_files`] reads the scope files lazily on first use and
//! keeps the result for its own lifetime; scope files do not change mid-run.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use ipnetwork::IpNetwork;
use regex::Regex;
use rekon_common::config::BlacklistConfig;
use rekon_common::utils::lines;
use rekon_common::{debug, info, warn};

use crate::files;

pub const EXPLICIT_DOMAINS_FILE: &str = "scope-domains.txt";
pub const EXPLICIT_IPS_FILE: &str = "scope-ips.txt";
pub const CANDIDATE_DOMAINS_GLOB: &str = "scope-domains-*";
pub const CANDIDATE_IPS_GLOB: &str = "scope-ips-*";

/// The scope policy of one assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeConfig {
    pub explicit_domains: BTreeSet<String>,
    pub explicit_root_domains: BTreeSet<String>,
    pub blacklisted_root_domains: BTreeSet<String>,
    pub blacklisted_domain_patterns: Vec<String>,
    pub explicit_ips_or_cidrs: Vec<String>,
}

impl ScopeConfig {
    /// Builds a config whose explicit roots are derived from the explicit
    /// domains, minus blacklisted roots.
    pub fn new<S: AsRef<str>>(
        explicit_domains: &[S],
        blacklist: &BlacklistConfig,
        explicit_ips_or_cidrs: &[S],
    ) -> Self {
        let mut config = Self {
            explicit_domains: explicit_domains
                .iter()
                .map(|d| normalize_domain(d.as_ref()))
                .filter(|d| !d.is_empty())
                .collect(),
            blacklisted_root_domains: blacklist
                .root_domains
                .iter()
                .map(|d| normalize_domain(d))
                .filter(|d| !d.is_empty())
                .collect(),
            blacklisted_domain_patterns: blacklist.domains.clone(),
            explicit_ips_or_cidrs: explicit_ips_or_cidrs
                .iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ..Self::default()
        };
        config.derive_root_domains();
        config
    }

    pub fn derive_root_domains(&mut self) {
        self.explicit_root_domains = self
            .explicit_domains
            .iter()
            .map(|d| root_domain(d))
            .filter(|root| !self.blacklisted_root_domains.contains(root))
            .collect();
    }
}

/// Compiled form of a [`ScopeConfig`].
#[derive(Debug)]
struct ScopeRules {
    config: ScopeConfig,
    patterns: Vec<Regex>,
    networks: Vec<IpNetwork>,
}

impl ScopeRules {
    fn compile(config: ScopeConfig) -> Self {
        let patterns = compile_patterns(&config.blacklisted_domain_patterns);
        let networks = config
            .explicit_ips_or_cidrs
            .iter()
            .filter_map(|entry| match IpNetwork::from_str(entry) {
                Ok(net) => Some(net),
                Err(e) => {
                    warn!("Ignoring invalid scope entry '{entry}': {e}");
                    None
                }
            })
            .collect();

        Self {
            config,
            patterns,
            networks,
        }
    }
}

#[derive(Debug)]
enum ScopeSource {
    Static,
    Files {
        dir: PathBuf,
        blacklist: BlacklistConfig,
    },
}

/// Answers scope questions for one assessment.
#[derive(Debug)]
pub struct ScopeMatcher {
    source: ScopeSource,
    rules: OnceLock<ScopeRules>,
}

impl ScopeMatcher {
    /// A matcher over an already-built policy.
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            source: ScopeSource::Static,
            rules: OnceLock::from(ScopeRules::compile(config)),
        }
    }

    /// A matcher reading the scope files in `dir` on first use.
    pub fn from_files(dir: impl Into<PathBuf>, blacklist: BlacklistConfig) -> Self {
        Self {
            source: ScopeSource::Files {
                dir: dir.into(),
                blacklist,
            },
            rules: OnceLock::new(),
        }
    }

    fn rules(&self) -> &ScopeRules {
        self.rules.get_or_init(|| match &self.source {
            ScopeSource::Static => ScopeRules::compile(ScopeConfig::default()),
            ScopeSource::Files { dir, blacklist } => ScopeRules::compile(load_scope(dir, blacklist)),
        })
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.rules().config
    }

    /// Dispatches to IP or domain matching depending on the shape of `item`.
    pub fn is_in_scope(&self, item: &str, force_blacklist_precedence: bool) -> bool {
        if looks_like_ip(item) {
            return self.is_ip_in_scope(item);
        }
        self.is_domain_in_scope(item, force_blacklist_precedence)
    }

    pub fn is_domain_in_scope(&self, domain: &str, force_blacklist_precedence: bool) -> bool {
        let domain = normalize_domain(domain);
        if domain.is_empty() {
            return false;
        }

        let rules = self.rules();
        let root = root_domain(&domain);

        if force_blacklist_precedence && rules.config.blacklisted_root_domains.contains(&root) {
            return false;
        }

        if rules.config.explicit_domains.contains(&domain) {
            return true;
        }

        rules.config.explicit_root_domains.contains(&root) && !self.matches_pattern(&domain)
    }

    pub fn is_ip_in_scope(&self, ip: &str) -> bool {
        let Ok(ip) = ip.trim().parse::<IpAddr>() else {
            return false;
        };
        self.rules().networks.iter().any(|net| net.contains(ip))
    }

    /// True when the domain's root is blacklisted or a blacklist pattern matches it.
    pub fn is_blacklisted(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        self.rules()
            .config
            .blacklisted_root_domains
            .contains(&root_domain(&domain))
            || self.matches_pattern(&domain)
    }

    fn matches_pattern(&self, domain: &str) -> bool {
        self.rules().patterns.iter().any(|p| p.is_match(domain))
    }

    /// Reduces `domains` to their sorted, deduplicated root domains.
    ///
    /// IP addresses are skipped. With `prune_blacklisted`, blacklisted roots
    /// are dropped from the result.
    pub fn get_root_domains<S: AsRef<str>>(&self, domains: &[S], prune_blacklisted: bool) -> Vec<String> {
        let blacklisted = &self.rules().config.blacklisted_root_domains;
        let roots: BTreeSet<String> = domains
            .iter()
            .map(|d| normalize_domain(d.as_ref()))
            .filter(|d| !d.is_empty() && !looks_like_ip(d))
            .map(|d| root_domain(&d))
            .filter(|root| !prune_blacklisted || !blacklisted.contains(root))
            .collect();
        roots.into_iter().collect()
    }
}

/// Lower-cases, trims, and strips a trailing dot and a leading `*.` label.
pub fn normalize_domain(domain: &str) -> String {
    let lowered = domain.trim().to_ascii_lowercase();
    let trimmed = lowered.trim_end_matches('.');
    trimmed.strip_prefix("*.").unwrap_or(trimmed).to_string()
}

/// Public suffix plus one label; a bare public suffix maps to itself.
pub fn root_domain(domain: &str) -> String {
    let domain = normalize_domain(domain);
    if let Some(registrable) = psl::domain_str(&domain) {
        return registrable.to_string();
    }
    if let Some(suffix) = psl::suffix_str(&domain) {
        return suffix.to_string();
    }
    domain
}

fn looks_like_ip(item: &str) -> bool {
    let item = item.trim();
    !item.is_empty()
        && (item.contains(':') || item.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '/'))
}

/// Turns blacklist globs into anchored, case-insensitive regexes.
fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| p.trim().trim_end_matches('.').to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .filter_map(|pattern| {
            let body = pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            match Regex::new(&format!("(?i)^{body}$")) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Ignoring blacklist pattern '{pattern}': {e}");
                    None
                }
            }
        })
        .collect()
}

/// Reads the explicit and candidate scope files from `dir`.
fn load_scope(dir: &Path, blacklist: &BlacklistConfig) -> ScopeConfig {
    let explicit_domains = lines::read_lines(&dir.join(EXPLICIT_DOMAINS_FILE));
    let explicit_ips = lines::read_lines(&dir.join(EXPLICIT_IPS_FILE));

    let mut config = ScopeConfig::new(&explicit_domains, blacklist, &explicit_ips);
    let patterns = compile_patterns(&config.blacklisted_domain_patterns);

    let mut rejected = 0usize;
    for path in files::glob_in(dir, CANDIDATE_DOMAINS_GLOB) {
        for candidate in lines::read_lines(&path) {
            let domain = normalize_domain(&candidate);
            if domain.is_empty() {
                continue;
            }
            let root_blacklisted = config.blacklisted_root_domains.contains(&root_domain(&domain));
            let pattern_blacklisted = patterns.iter().any(|p| p.is_match(&domain));
            if root_blacklisted || pattern_blacklisted {
                debug!(verbosity = 2, "Rejected candidate scope domain {domain}");
                rejected += 1;
                continue;
            }
            config.explicit_domains.insert(domain);
        }
    }

    for path in files::glob_in(dir, CANDIDATE_IPS_GLOB) {
        for candidate in lines::read_lines(&path) {
            if IpNetwork::from_str(&candidate).is_ok() {
                config.explicit_ips_or_cidrs.push(candidate);
            } else {
                debug!(verbosity = 2, "Rejected candidate scope address {candidate}");
                rejected += 1;
            }
        }
    }

    config.derive_root_domains();
    info!(
        verbosity = 1,
        "Loaded scope: {} domains, {} root domains, {} addresses ({rejected} candidates rejected)",
        config.explicit_domains.len(),
        config.explicit_root_domains.len(),
        config.explicit_ips_or_cidrs.len()
    );
    config
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
