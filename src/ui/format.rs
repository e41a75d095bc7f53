const GIGA: u64 = 1_000_000_000;
const MEGA: u64 = 1_000_000;
const KILO: u64 = 1_000;

/// Scale a size to one decimal with a G/M/K suffix chosen by decimal
/// thresholds. Anything below 1000 is printed unscaled with a `B` suffix.
pub(crate) fn human_size(value: u64) -> String {
    if value >= GIGA {
        format!("{:.1} G", value as f64 / GIGA as f64)
    } else if value >= MEGA {
        format!("{:.1} M", value as f64 / MEGA as f64)
    } else if value >= KILO {
        format!("{:.1} K", value as f64 / KILO as f64)
    } else {
        format!("{value} B")
    }
}

/// kB figure rendered in MiB with two decimals, as the memory report prints it.
pub(crate) fn kib_to_mib(kib: u64) -> String {
    format!("{:.2} MiB", kib as f64 / 1024.0)
}
