mod bars;
mod format;

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::tty::IsTty;

pub(crate) use bars::{format_disk_bar, format_memory_bar};
pub(crate) use format::{human_size, kib_to_mib};

/// One line of report output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Row(String),
    /// Informational message, not an error.
    Notice(String),
}

impl Line {
    pub fn text(&self) -> &str {
        match self {
            Line::Row(text) | Line::Notice(text) => text,
        }
    }
}

/// Write the report to stdout; notices are highlighted on a terminal.
pub fn print_lines(lines: &[Line]) -> io::Result<()> {
    let styled = io::stdout().is_tty();
    let mut stdout = io::stdout().lock();
    for line in lines {
        match line {
            Line::Notice(text) if styled => {
                queue!(stdout, PrintStyledContent(text.as_str().yellow()))?
            }
            line => queue!(stdout, Print(line.text()))?,
        }
        queue!(stdout, Print('\n'))?;
    }
    stdout.flush()
}
