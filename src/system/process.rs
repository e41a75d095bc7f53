use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use sysinfo::System;
use tracing::{debug, warn};

use super::command::run_tool;
use crate::error::{Error, Result};

const PIDOF: &str = "pidof";
// errno ESRCH, seen when reading smaps of a process that is being reaped.
const NO_SUCH_PROCESS: i32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProcessMemorySample {
    pub pid: u32,
    pub rss_kb: u64,
}

/// Maps a program name to the PIDs currently running it.
///
/// No match is an empty vector, never an error.
pub trait PidResolver {
    fn resolve(&self, program: &str) -> Result<Vec<u32>>;
}

/// Resolves through `pidof`, falling back to a process table scan when the
/// tool is not installed.
pub struct PidofResolver {
    timeout: Duration,
}

impl PidofResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PidResolver for PidofResolver {
    fn resolve(&self, program: &str) -> Result<Vec<u32>> {
        let output = match run_tool(PIDOF, &[program], self.timeout) {
            Ok(output) => output,
            Err(Error::ToolNotFound { .. }) => {
                warn!("pidof not found, scanning the process table instead");
                return ProcessTableResolver.resolve(program);
            }
            Err(err) => return Err(err),
        };

        // pidof exits 1 with no output when nothing matches.
        if output.status.code() == Some(1) && output.stdout.trim().is_empty() {
            debug!(program, "no matching process");
            return Ok(Vec::new());
        }
        let stdout = output.into_success(PIDOF)?;
        Ok(parse_pid_list(&stdout))
    }
}

/// Exact-name match over the live process table.
pub struct ProcessTableResolver;

impl PidResolver for ProcessTableResolver {
    fn resolve(&self, program: &str) -> Result<Vec<u32>> {
        let mut system = System::new();
        system.refresh_processes();
        let mut pids: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter(|(_, process)| process.name() == program)
            .map(|(pid, _)| pid.as_u32())
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }
}

/// Whitespace-separated PIDs, sorted and deduplicated. Non-numeric tokens are
/// dropped.
pub fn parse_pid_list(output: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .filter(|pid| *pid > 0)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// Resident memory of `pid` in kB, summed over every mapping in its `smaps`.
///
/// A process that exited since it was resolved reports 0.
pub fn read_process_rss(proc_root: &Path, pid: u32) -> Result<u64> {
    let path = proc_root.join(pid.to_string()).join("smaps");
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(sum_rss(&contents)),
        Err(err) if process_gone(&err) => {
            debug!(pid, "process exited before its smaps could be read");
            Ok(0)
        }
        Err(source) => Err(Error::SourceUnavailable { path, source }),
    }
}

pub fn sample_processes(proc_root: &Path, pids: &[u32]) -> Result<Vec<ProcessMemorySample>> {
    pids.iter()
        .map(|&pid| {
            read_process_rss(proc_root, pid).map(|rss_kb| ProcessMemorySample { pid, rss_kb })
        })
        .collect()
}

pub fn sum_rss(contents: &str) -> u64 {
    contents
        .lines()
        .filter(|line| line.starts_with("Rss:"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|value| value.parse::<u64>().ok())
        .fold(0, u64::saturating_add)
}

fn process_gone(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(NO_SUCH_PROCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMAPS: &str = "\
55d0c2a00000-55d0c2a2c000 r--p 00000000 08:01 1311 /usr/bin/bash
Size:                176 kB
Rss:                 100 kB
Pss:                  40 kB
7f1e4c000000-7f1e4c021000 rw-p 00000000 00:00 0
Size:                132 kB
Rss:                 200 kB
7ffd7b3c6000-7ffd7b3e7000 rw-p 00000000 00:00 0 [stack]
Rss:                  50 kB
SwapPss:               0 kB
";

    #[test]
    fn sums_every_mapping() {
        assert_eq!(sum_rss(SMAPS), 350);
    }

    #[test]
    fn ignores_other_fields_and_garbage() {
        assert_eq!(sum_rss("Pss: 10 kB\nRss: abc kB\nRss:\n"), 0);
    }

    #[test]
    fn rss_sum_saturates() {
        assert_eq!(sum_rss("Rss: 18446744073709551615 kB\nRss: 1 kB\n"), u64::MAX);
    }

    #[test]
    fn reads_smaps_under_proc_root() {
        let dir = tempfile::tempdir().unwrap();
        let pid_dir = dir.path().join("4242");
        fs::create_dir(&pid_dir).unwrap();
        fs::write(pid_dir.join("smaps"), SMAPS).unwrap();
        assert_eq!(read_process_rss(dir.path(), 4242).unwrap(), 350);
    }

    #[test]
    fn exited_process_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_process_rss(dir.path(), 999_999).unwrap(), 0);
    }

    #[test]
    fn samples_each_pid() {
        let dir = tempfile::tempdir().unwrap();
        let pid_dir = dir.path().join("7");
        fs::create_dir(&pid_dir).unwrap();
        fs::write(pid_dir.join("smaps"), "Rss: 64 kB\n").unwrap();
        let samples = sample_processes(dir.path(), &[7, 8]).unwrap();
        assert_eq!(
            samples,
            vec![
                ProcessMemorySample { pid: 7, rss_kb: 64 },
                ProcessMemorySample { pid: 8, rss_kb: 0 },
            ]
        );
    }

    #[test]
    fn process_table_has_no_match_for_unknown_program() {
        let pids = ProcessTableResolver.resolve("usagebar-no-such-program").unwrap();
        assert!(pids.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn pidof_reports_no_match_as_empty() {
        let resolver = PidofResolver::new(Duration::from_secs(5));
        let pids = resolver.resolve("usagebar-no-such-program").unwrap();
        assert!(pids.is_empty());
    }

    #[test]
    fn pid_list_parsing() {
        assert_eq!(parse_pid_list("812 77 812\n"), vec![77, 812]);
        assert_eq!(parse_pid_list(""), Vec::<u32>::new());
        assert_eq!(parse_pid_list("12 x 0 9"), vec![9, 12]);
    }
}
