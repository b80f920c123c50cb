//! Where the placement group JSON comes from.
//!
//! [`CephCommand`] shells out to the `ceph` CLI; [`FileSource`] reads a saved
//! document (or stdin). Both return raw text and leave parsing to the
//! pipeline.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, ScrubError};

/// Environment variable naming the `ceph` binary to run.
pub const CEPH_BIN_ENV: &str = "SCRUBWATCH_CEPH";

/// Query forms tried in order; the first that exits successfully wins.
pub const QUERY_FORMS: [&[&str]; 2] = [
    &["pg", "ls", "--format", "json"],
    &["pg", "dump", "--format", "json"],
];

/// A producer of placement group JSON text.
pub trait RecordSource {
    /// Short human-readable description for logs and errors.
    fn describe(&self) -> String;

    /// Fetch the raw document text.
    fn fetch(&self) -> Result<String>;
}

/// Runs the `ceph` CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CephCommand {
    binary: String,
    global_args: Vec<String>,
}

impl Default for CephCommand {
    fn default() -> Self {
        CephCommand::new(std::env::var(CEPH_BIN_ENV).unwrap_or_else(|_| "ceph".to_string()))
    }
}

impl CephCommand {
    /// Use a specific binary.
    pub fn new(binary: impl Into<String>) -> Self {
        CephCommand {
            binary: binary.into(),
            global_args: Vec::new(),
        }
    }

    /// Binary from `SCRUBWATCH_CEPH`, else `ceph` on `PATH`.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Target a named cluster (`--cluster`).
    pub fn with_cluster(mut self, cluster: &str) -> Self {
        self.global_args.push("--cluster".to_string());
        self.global_args.push(cluster.to_string());
        self
    }

    /// Use an explicit `ceph.conf` (`--conf`).
    pub fn with_conf(mut self, conf: &Path) -> Self {
        self.global_args.push("--conf".to_string());
        self.global_args.push(conf.display().to_string());
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Full argument vector for one query form.
    pub fn args_for(&self, form: &[&str]) -> Vec<String> {
        self.global_args
            .iter()
            .cloned()
            .chain(form.iter().map(|arg| arg.to_string()))
            .collect()
    }

    fn run(&self, form: &[&str]) -> std::result::Result<String, String> {
        let args = self.args_for(form);
        debug!(binary = %self.binary, args = ?args, "running cluster query");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| format!("failed to run {} {}: {e}", self.binary, form.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} {} exited with {}: {}",
                self.binary,
                form.join(" "),
                output.status,
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RecordSource for CephCommand {
    fn describe(&self) -> String {
        format!("{} (pg ls, pg dump)", self.binary())
    }

    fn fetch(&self) -> Result<String> {
        let mut failures = Vec::new();

        for form in QUERY_FORMS {
            match self.run(form) {
                Ok(stdout) => {
                    info!(
                        query = %form.join(" "),
                        bytes = stdout.len(),
                        "fetched placement group listing"
                    );
                    return Ok(stdout);
                }
                Err(reason) => {
                    debug!(%reason, "cluster query form failed");
                    failures.push(reason);
                }
            }
        }

        Err(ScrubError::SourceUnavailable(failures.join("; ")))
    }
}

/// Reads a saved JSON document; `-` means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl RecordSource for FileSource {
    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn fetch(&self) -> Result<String> {
        if self.is_stdin() {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(text);
        }

        std::fs::read_to_string(&self.path).map_err(|e| {
            ScrubError::SourceUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })
    }
}
