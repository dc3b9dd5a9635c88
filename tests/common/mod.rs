//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     let api = serve_json(repos::THREE);
//!     fixture.command().arg("--https").arg("--api-url").arg(&api).arg("octocat");
//! }
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::repos;
    #[allow(unused_imports)]
    pub use super::serve_json;
    pub use super::TestFixture;
}

/// Canned repository listings in the GitHub API format.
#[allow(dead_code)]
pub mod repos {
    /// `A` (Go), `B` (HTML), `C` (Go), plus a fork that must never show up.
    pub const THREE: &str = r#"[
  {"name": "A", "description": "An API server", "clone_url": "https://github.com/octocat/A.git",
   "ssh_url": "git@github.com:octocat/A.git", "language": "Go", "stargazers_count": 1520, "size": 10, "fork": false},
  {"name": "B", "description": "", "clone_url": "https://github.com/octocat/B.git",
   "ssh_url": "git@github.com:octocat/B.git", "language": "HTML", "stargazers_count": 0, "size": 3, "fork": false},
  {"name": "upstream-copy", "description": "forked", "clone_url": "https://github.com/octocat/upstream-copy.git",
   "ssh_url": "git@github.com:octocat/upstream-copy.git", "language": "Go", "stargazers_count": 0, "size": 3, "fork": true},
  {"name": "C", "description": null, "clone_url": "https://github.com/octocat/C.git",
   "ssh_url": "git@github.com:octocat/C.git", "language": "Go", "stargazers_count": 7, "size": 8, "fork": false}
]"#;

    /// No repositories at all.
    pub const EMPTY: &str = "[]";
}

/// Serves `body` as a JSON response to every request on a local port.
///
/// Returns the base URL to pass as `--api-url`. The server thread lives
/// until the test process exits.
#[allow(dead_code)]
pub fn serve_json(body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
    let address = listener.local_addr().expect("Stub server has no address");
    let body = body.to_string();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
            let mut line = String::new();
            // Drain the request head; bodies are never sent by GET
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}", address)
}

/// A temporary HOME and harvest directory for one CLI run.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Put a fake private key in the fixture's `~/.ssh`.
    #[allow(dead_code)]
    pub fn with_ssh_key(self) -> Self {
        self.temp_dir
            .child("home/.ssh/id_ed25519")
            .write_str("not a real key")
            .expect("Failed to write key file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The directory used as `HOME` for the command.
    pub fn home(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("home")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `forklift` command isolated from the user's environment.
    pub fn command(&self) -> assert_cmd::Command {
        std::fs::create_dir_all(self.home()).expect("Failed to create home directory");
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("forklift");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("NO_COLOR", "1")
            .env_remove("GITHUB_TOKEN")
            .env_remove("FORKLIFT_API_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_ssh_key() {
        let fixture = TestFixture::new().with_ssh_key();
        assert!(fixture.home().join(".ssh/id_ed25519").exists());
    }

    #[test]
    fn test_canned_listing_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(repos::THREE).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
    }
}
