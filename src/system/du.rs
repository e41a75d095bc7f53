use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use super::command::run_tool;
use crate::error::Result;

const DU: &str = "du";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryUsage {
    pub path: String,
    pub size_kb: u64,
}

/// Produces one-level recursive size lines (`<kB><ws><path>`) for a directory.
pub trait SizeTool {
    fn summarize(&self, path: &Path) -> Result<Vec<String>>;
}

pub struct DuTool {
    timeout: Duration,
}

impl DuTool {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl SizeTool for DuTool {
    fn summarize(&self, path: &Path) -> Result<Vec<String>> {
        let args = [OsStr::new("-k"), OsStr::new("-d"), OsStr::new("1"), path.as_os_str()];
        let stdout = run_tool(DU, &args, self.timeout)?.into_success(DU)?;
        let lines: Vec<String> = stdout.lines().map(str::to_string).collect();
        debug!(dir = %path.display(), lines = lines.len(), "du finished");
        Ok(lines)
    }
}

/// Map each path to its size. Lines that are not `<integer><ws><path>` are
/// skipped; a repeated path keeps its last size.
pub fn parse_size_output<S: AsRef<str>>(lines: &[S]) -> BTreeMap<String, u64> {
    let mut sizes = BTreeMap::new();
    for line in lines {
        let line = line.as_ref().trim_end_matches('\r');
        match parse_size_line(line) {
            Some((size, path)) => {
                sizes.insert(path.to_string(), size);
            }
            None if line.trim().is_empty() => {}
            None => warn!(line, "skipping unrecognised size line"),
        }
    }
    sizes
}

fn parse_size_line(line: &str) -> Option<(u64, &str)> {
    let (size, path) = line.trim_start().split_once(char::is_whitespace)?;
    let size = size.parse().ok()?;
    let path = path.trim_start();
    if path.is_empty() {
        return None;
    }
    Some((size, path))
}

pub fn total_size(sizes: &BTreeMap<String, u64>) -> u64 {
    sizes.values().fold(0, |acc, size| acc.saturating_add(*size))
}

pub fn to_usages(sizes: BTreeMap<String, u64>) -> Vec<DirectoryUsage> {
    sizes
        .into_iter()
        .map(|(path, size_kb)| DirectoryUsage { path, size_kb })
        .collect()
}
