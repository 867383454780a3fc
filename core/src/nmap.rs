// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Reading, writing and merging nmap results.
//!
//! - **Decoding**: [`parse_str`] / [`parse_file`] turn `-oX` output into a [`Run`].
//! - **Grepable**: [`parse_grepable`] reads `-oG` output into the same structure.
//! - **Merging**: [`merge`] folds repeated scans of the same hosts into one run.
//!
//! Encoding goes through [`to_xml_string`]; merged output is always decoded
//! again with [`parse_str`] so it is known to fit the input schema.

use std::path::{Path, PathBuf};

use thiserror::Error;

mod grepable;
mod merge;
mod schema;

pub use grepable::parse_grepable;
pub use merge::{MergeOptions, merge, merge_runs, most_accurate_service};
pub use schema::{
    Address, ExtraPorts, Finished, Host, HostStats, Hostname, Hostnames, Port, PortState, Ports,
    Run, RunStats, ScanInfo, Script, Service, Status,
};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Error)]
pub enum NmapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode nmap XML from {origin}: {message}")]
    Decode { origin: String, message: String },
    #[error("failed to encode nmap XML: {0}")]
    Encode(String),
}

pub fn parse_str(xml: &str) -> Result<Run, NmapError> {
    decode(xml, "<memory>")
}

pub fn parse_file(path: &Path) -> Result<Run, NmapError> {
    let xml = std::fs::read_to_string(path).map_err(|source| NmapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&xml, &path.display().to_string())
}

fn decode(xml: &str, origin: &str) -> Result<Run, NmapError> {
    quick_xml::de::from_str(xml).map_err(|e| NmapError::Decode {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

/// Encodes a run as a standalone `<nmaprun>` document.
pub fn to_xml_string(run: &Run) -> Result<String, NmapError> {
    let body = quick_xml::se::to_string_with_root("nmaprun", run)
        .map_err(|e| NmapError::Encode(e.to_string()))?;
    Ok(format!("{XML_DECLARATION}{body}\n"))
}

pub fn write_file(run: &Run, path: &Path) -> Result<(), NmapError> {
    let xml = to_xml_string(run)?;
    std::fs::write(path, xml).map_err(|source| NmapError::Io {
        path: path.to_path_buf(),
        source,
    })
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

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<?xml-stylesheet href="file:///usr/bin/../share/nmap/nmap.xsl" type="text/xsl"?>
<!-- Nmap 7.94 scan initiated -->
<nmaprun scanner="nmap" args="nmap -sV -oX nmap-tcp.xml 10.0.0.5" start="1700000000" startstr="Tue Nov 14 22:13:20 2023" version="7.94" xmloutputversion="1.05">
<scaninfo type="syn" protocol="tcp" numservices="1000" services="1-1000"/>
<verbose level="0"/>
<debugging level="0"/>
<hosthint><status state="up" reason="unknown-response" reason_ttl="0"/>
<address addr="10.0.0.5" addrtype="ipv4"/>
<hostnames>
</hostnames>
</hosthint>
<host starttime="1700000001" endtime="1700000100"><status state="up" reason="echo-reply" reason_ttl="63"/>
<address addr="10.0.0.5" addrtype="ipv4"/>
<hostnames>
<hostname name="www.example.com" type="user"/>
<hostname name="www.example.com" type="PTR"/>
</hostnames>
<ports><extraports state="closed" count="997">
<extrareasons reason="reset" count="997" proto="tcp" ports="1-21,23-79"/>
</extraports>
<port protocol="tcp" portid="22"><state state="open" reason="syn-ack" reason_ttl="63"/><service name="ssh" product="OpenSSH" version="8.9p1" method="probed" conf="10"><cpe>cpe:/a:openbsd:openssh:8.9p1</cpe></service></port>
<port protocol="tcp" portid="80"><state state="closed" reason="reset" reason_ttl="63"/><service name="http" method="table" conf="3"/></port>
<port protocol="tcp" portid="8443"><state state="open" reason="syn-ack" reason_ttl="63"/><service name="http" tunnel="ssl" method="probed" conf="10"/><script id="http-title" output="Login"><elem key="title">Login</elem></script></port>
</ports>
<os><osmatch name="Linux 5.X" accuracy="95" line="1"/></os>
<times srtt="1000" rttvar="500" to="100000"/>
</host>
<runstats><finished time="1700000100" timestr="Tue Nov 14 22:15:00 2023" summary="Nmap done" elapsed="100.00" exit="success"/><hosts up="1" down="0" total="1"/>
</runstats>
</nmaprun>
"#;

    #[test]
    fn decodes_real_world_document() {
        let run = parse_str(SAMPLE).unwrap();
        assert_eq!(run.scanner, "nmap");
        assert_eq!(run.start, Some(1_700_000_000));
        assert_eq!(run.hosts.len(), 1);

        let host = &run.hosts[0];
        assert_eq!(host.key(), "10.0.0.5");
        assert!(host.is_up());
        assert_eq!(host.hostname_list().len(), 2);
        assert_eq!(host.port_list().len(), 3);

        let ssh = &host.port_list()[0];
        assert_eq!(ssh.port_id, 22);
        assert_eq!(ssh.state.state, "open");
        let service = ssh.service.as_ref().unwrap();
        assert_eq!(service.product, "OpenSSH");
        assert_eq!(service.conf, Some(10));
        assert!(service.has_evidence());

        let http = &host.port_list()[1];
        assert!(http.is_closed());
        assert!(!http.service.as_ref().unwrap().has_evidence());

        let stats = run.run_stats.as_ref().unwrap().hosts.as_ref().unwrap();
        assert_eq!(stats.up, 1);
    }

    #[test]
    fn encoded_run_decodes_to_same_structure() {
        let run = parse_str(SAMPLE).unwrap();
        let xml = to_xml_string(&run).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<nmaprun"));

        let again = parse_str(&xml).unwrap();
        assert_eq!(again, run);
    }

    #[test]
    fn malformed_document_is_a_decode_error() {
        let err = parse_str("<nmaprun><host><address addr=").unwrap_err();
        assert!(matches!(err, NmapError::Decode { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(&dir.path().join("absent.xml")).unwrap_err();
        assert!(matches!(err, NmapError::Io { .. }));
    }
}
