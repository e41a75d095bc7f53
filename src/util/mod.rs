/// Share of `part` in `total` as a percentage in `[0, 100]`.
///
/// Every percentage in a report goes through here: a zero total yields 0 and a
/// part larger than the total is capped at 100, so the result is always a
/// valid bar input.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).min(100.0)
}
