use tracing::info;

use super::{memory_amount, MemoryOptions};
use crate::error::Result;
use crate::system::meminfo::read_system_memory;
use crate::system::process::{sample_processes, PidResolver};
use crate::ui::{format_memory_bar, Line};
use crate::util::percent_of;

const LABEL_WIDTH: usize = 15;

/// System memory line, then (with a program) one line per PID and a total
/// line for the program. All percentages are relative to total system memory.
pub fn memory_report(options: &MemoryOptions, resolver: &dyn PidResolver) -> Result<Vec<Line>> {
    options.report.validate()?;
    let width = options.report.bar_width;
    let human = options.report.human_readable;

    let sample = read_system_memory(&options.proc_root)?;
    let total = sample.total_kb;
    let used = sample.used_kb();

    let mut lines = vec![row("Memory", used, total, width, human)?];

    let Some(program) = options.program.as_deref() else {
        return Ok(lines);
    };

    let pids = resolver.resolve(program)?;
    if pids.is_empty() {
        lines.push(Line::Notice(format!("{program} not found.")));
        return Ok(lines);
    }
    info!(program, count = pids.len(), "resolved processes");

    let samples = sample_processes(&options.proc_root, &pids)?;
    for sample in &samples {
        lines.push(row(&sample.pid.to_string(), sample.rss_kb, total, width, human)?);
    }
    let program_rss = samples
        .iter()
        .fold(0, |acc: u64, sample| acc.saturating_add(sample.rss_kb));
    lines.push(row(program, program_rss, total, width, human)?);

    Ok(lines)
}

fn row(label: &str, used: u64, total: u64, width: usize, human: bool) -> Result<Line> {
    let bar = format_memory_bar(percent_of(used, total), width)?;
    let amount = memory_amount(used, total, human);
    Ok(Line::Row(format!(
        "{label:<label_width$}{bar} {amount}",
        label_width = LABEL_WIDTH
    )))
}
