use std::path::Path;

use tracing::debug;

use super::{disk_amount, DiskOptions};
use crate::error::Result;
use crate::system::du::{parse_size_output, to_usages, total_size, SizeTool};
use crate::ui::{format_disk_bar, Line};
use crate::util::percent_of;

/// `Total:` line followed by one line per immediate subdirectory of the
/// target. The total is the sum of the subdirectories; the tool's own line
/// for the target is dropped.
pub fn disk_report(options: &DiskOptions, tool: &dyn SizeTool) -> Result<Vec<Line>> {
    options.report.validate()?;
    let width = options.report.bar_width;
    let human = options.report.human_readable;

    let raw = tool.summarize(&options.target)?;
    let mut sizes = parse_size_output(&raw);
    sizes.retain(|path, _| !is_target(path, &options.target));
    let total = total_size(&sizes);
    debug!(entries = sizes.len(), total, "aggregated directory sizes");

    let mut lines = Vec::with_capacity(sizes.len() + 1);
    lines.push(Line::Row(format!(
        "Total: {}   {}",
        disk_amount(total, human),
        options.target.display()
    )));

    for usage in to_usages(sizes) {
        let percent = percent_of(usage.size_kb, total);
        let bar = format_disk_bar(percent, width)?;
        lines.push(Line::Row(format!(
            "{percent:>3.0} % {bar} {} {}",
            disk_amount(usage.size_kb, human),
            usage.path
        )));
    }

    Ok(lines)
}

fn is_target(path: &str, target: &Path) -> bool {
    Path::new(path) == target
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::ReportOptions;
    use crate::error::Error;

    struct FakeTool(Vec<&'static str>);

    impl SizeTool for FakeTool {
        fn summarize(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|line| line.to_string()).collect())
        }
    }

    struct MissingTool;

    impl SizeTool for MissingTool {
        fn summarize(&self, _path: &Path) -> Result<Vec<String>> {
            Err(Error::ToolNotFound {
                tool: "du".to_string(),
            })
        }
    }

    fn options(target: &str, human_readable: bool) -> DiskOptions {
        DiskOptions {
            report: ReportOptions {
                human_readable,
                bar_width: 20,
            },
            target: PathBuf::from(target),
        }
    }

    fn text(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn children_sum_to_total() {
        let tool = FakeTool(vec![
            "100\t/data/a",
            "200\t/data/b",
            "du: cannot read directory '/data/x': Permission denied",
            "50\t/data/c",
            "350\t/data",
            "",
        ]);
        let lines = disk_report(&options("/data", false), &tool).unwrap();
        assert_eq!(
            text(&lines),
            vec![
                "Total: 350   /data",
                " 29 % [======              ] 100 /data/a",
                " 57 % [===========         ] 200 /data/b",
                " 14 % [===                 ] 50 /data/c",
            ]
        );
    }

    #[test]
    fn target_line_matches_with_trailing_slash() {
        let tool = FakeTool(vec!["10\t/srv/", "10\t/srv/x"]);
        let lines = disk_report(&options("/srv/", false), &tool).unwrap();
        assert_eq!(text(&lines)[0], "Total: 10   /srv/");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn human_readable_sizes() {
        let tool = FakeTool(vec!["1500000\t/d/x", "500000\t/d/y", "2000000\t/d"]);
        let lines = disk_report(&options("/d", true), &tool).unwrap();
        assert_eq!(
            text(&lines),
            vec![
                "Total: 2.0 M   /d",
                " 75 % [===============     ] 1.5 M /d/x",
                " 25 % [=====               ] 500.0 K /d/y",
            ]
        );
    }

    #[test]
    fn zero_total_is_zero_percent() {
        let tool = FakeTool(vec!["0\t./a", "0\t./b", "0\t."]);
        let lines = disk_report(&options(".", false), &tool).unwrap();
        assert_eq!(
            text(&lines),
            vec![
                "Total: 0   .",
                "  0 % [                    ] 0 ./a",
                "  0 % [                    ] 0 ./b",
            ]
        );
    }

    #[test]
    fn empty_output_reports_only_the_total() {
        let lines = disk_report(&options("/empty", false), &FakeTool(vec![])).unwrap();
        assert_eq!(text(&lines), vec!["Total: 0   /empty"]);
    }

    #[test]
    fn tool_errors_are_fatal() {
        let err = disk_report(&options(".", false), &MissingTool).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn zero_width_is_rejected_before_running_the_tool() {
        let mut opts = options(".", false);
        opts.report.bar_width = 0;
        let err = disk_report(&opts, &MissingTool).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
