mod disk;
mod memory;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::Error;
use crate::system::du::DuTool;
use crate::system::process::PidofResolver;
use crate::ui::{self, Line};

pub use disk::disk_report;
pub use memory::memory_report;

/// Options shared by both reports.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub human_readable: bool,
    pub bar_width: usize,
}

impl ReportOptions {
    fn validate(&self) -> crate::error::Result<()> {
        if self.bar_width == 0 {
            return Err(Error::InvalidArgument(
                "graph length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MemoryOptions {
    pub report: ReportOptions,
    pub proc_root: PathBuf,
    pub program: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DiskOptions {
    pub report: ReportOptions,
    pub target: PathBuf,
}

pub fn run_memory(options: &MemoryOptions, tool_timeout: Duration) -> Result<()> {
    let resolver = PidofResolver::new(tool_timeout);
    let lines = memory_report(options, &resolver)?;
    emit(&lines)
}

pub fn run_disk(options: &DiskOptions, tool_timeout: Duration) -> Result<()> {
    let tool = DuTool::new(tool_timeout);
    let lines = disk_report(options, &tool)
        .with_context(|| format!("summarizing {}", options.target.display()))?;
    emit(&lines)
}

fn emit(lines: &[Line]) -> Result<()> {
    ui::print_lines(lines).context("writing report to stdout")
}

/// `used/total`, raw kB or MiB.
fn memory_amount(used_kb: u64, total_kb: u64, human_readable: bool) -> String {
    if human_readable {
        format!("{}/{}", ui::kib_to_mib(used_kb), ui::kib_to_mib(total_kb))
    } else {
        format!("{used_kb}/{total_kb}")
    }
}

fn disk_amount(size_kb: u64, human_readable: bool) -> String {
    if human_readable {
        ui::human_size(size_kb)
    } else {
        size_kb.to_string()
    }
}
