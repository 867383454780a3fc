// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

mod inventory;

/// Builders for on-disk assessment workspaces.
pub mod utils {
    use std::path::{Path, PathBuf};

    /// A temporary assessment root, removed on drop.
    pub struct WorkspaceFixture {
        dir: tempfile::TempDir,
    }

    impl WorkspaceFixture {
        pub fn new() -> std::io::Result<Self> {
            Ok(Self {
                dir: tempfile::tempdir()?,
            })
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// Writes `content` to `relative`, creating parent directories.
        pub fn write(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
            let path = self.root().join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)?;
            Ok(path)
        }

        pub fn host_file(&self, host: &str, relative: &str, content: &str) -> std::io::Result<PathBuf> {
            self.write(&format!("hosts/{host}/{relative}"), content)
        }

        pub fn read(&self, relative: &str) -> std::io::Result<String> {
            std::fs::read_to_string(self.root().join(relative))
        }
    }

    /// A single-host nmap document. `ports` rows are `(protocol, id, state, service)`.
    pub fn nmap_xml(addr: &str, start: u64, ports: &[(&str, u16, &str, &str)]) -> String {
        let rows: String = ports
            .iter()
            .map(|(proto, id, state, service)| {
                format!(
                    "<port protocol=\"{proto}\" portid=\"{id}\"><state state=\"{state}\" reason=\"syn-ack\"/><service name=\"{service}\" method=\"table\" conf=\"3\"/></port>\n"
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE nmaprun>\n<nmaprun scanner=\"nmap\" args=\"nmap -oX -\" start=\"{start}\" version=\"7.94\" xmloutputversion=\"1.05\">\n<host starttime=\"{start}\" endtime=\"{end}\"><status state=\"up\" reason=\"echo-reply\"/>\n<address addr=\"{addr}\" addrtype=\"ipv4\"/>\n<hostnames></hostnames>\n<ports>\n{rows}</ports>\n</host>\n<runstats><finished time=\"{end}\"/><hosts up=\"1\" down=\"0\" total=\"1\"/></runstats>\n</nmaprun>\n",
            end = start + 30
        )
    }
}
