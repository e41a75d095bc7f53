use crate::error::{Error, Result};

/// Marker used by the memory report.
pub(crate) const MEMORY_MARKER: char = '#';
/// Marker used by the disk report.
pub(crate) const DISK_MARKER: char = '=';

/// Render a bar of exactly `width` cells for `percent` (0..=100).
///
/// The filled cell count is rounded half-up, so `62.5%` of 8 cells fills 5.
pub(crate) fn progress_bar(percent: f64, width: usize) -> Result<String> {
    progress_bar_with(percent, width, MEMORY_MARKER)
}

pub(crate) fn progress_bar_with(percent: f64, width: usize, marker: char) -> Result<String> {
    if width == 0 {
        return Err(Error::InvalidArgument("bar width must be > 0".to_string()));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(Error::InvalidArgument(format!(
            "percent {percent} is outside 0..=100"
        )));
    }
    let filled = ((percent * width as f64 / 100.0).round() as usize).min(width);
    let empty = width - filled;
    let mut bar = String::with_capacity(width);
    bar.extend(std::iter::repeat(marker).take(filled));
    bar.extend(std::iter::repeat(' ').take(empty));
    Ok(bar)
}

/// `[#####     | 50%]`, the decorated form used by the memory report.
pub(crate) fn format_memory_bar(percent: f64, width: usize) -> Result<String> {
    let bar = progress_bar(percent, width)?;
    Ok(format!("[{bar} | {percent:.0}%]"))
}

/// `[=====     ]`, the decorated form used by the disk report.
pub(crate) fn format_disk_bar(percent: f64, width: usize) -> Result<String> {
    let bar = progress_bar_with(percent, width, DISK_MARKER)?;
    Ok(format!("[{bar}]"))
}
