use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// System memory in kB, as read from `meminfo`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemorySample {
    /// Used memory clamped to `[0, total]`, tolerating `available > total`.
    pub fn used_kb(&self) -> u64 {
        if self.available_kb > self.total_kb {
            warn!(
                total = self.total_kb,
                available = self.available_kb,
                "available memory exceeds total, treating used as 0"
            );
        }
        self.total_kb.saturating_sub(self.available_kb)
    }
}

pub fn read_system_memory(proc_root: &Path) -> Result<MemorySample> {
    let path = proc_root.join("meminfo");
    let contents = fs::read_to_string(&path).map_err(|source| Error::SourceUnavailable {
        path: path.clone(),
        source,
    })?;
    let sample = parse_meminfo(&contents);
    debug!(path = %path.display(), ?sample, "read system memory");
    Ok(sample)
}

/// Parse `KEY: <n> kB` lines. Without `MemAvailable`, available memory is
/// estimated as twice `MemFree`; with none of the keys, both values are 0.
pub fn parse_meminfo(contents: &str) -> MemorySample {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in contents.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemAvailable" => &mut available,
            "MemFree" => &mut free,
            _ => continue,
        };
        if let Some(value) = rest.split_whitespace().next().and_then(|v| v.parse::<u64>().ok()) {
            *slot = Some(value);
        }
    }

    let available_kb = match (available, free) {
        (Some(available), _) => available,
        (None, Some(free)) => {
            warn!(free, "MemAvailable missing, estimating as 2 x MemFree");
            free.saturating_mul(2)
        }
        (None, None) => 0,
    };

    MemorySample {
        total_kb: total.unwrap_or(0),
        available_kb,
    }
}
