mod app;
mod error;
mod system;
mod ui;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{DiskOptions, MemoryOptions, ReportOptions};

#[derive(Parser)]
#[command(name = "usagebar", version)]
#[command(about = "Memory and disk usage reports with bar charts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Root of the kernel's process information filesystem
    #[arg(long, env = "USAGEBAR_PROC_ROOT", default_value = "/proc", global = true)]
    proc_root: PathBuf,

    /// Seconds to wait for du or pidof before giving up
    #[arg(long, env = "USAGEBAR_TOOL_TIMEOUT", default_value_t = 30, global = true)]
    tool_timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Memory usage of the system, or of every process running a program
    #[command(visible_alias = "memory")]
    Mem {
        /// Program name to show memory usage of its processes
        program: Option<String>,

        #[command(flatten)]
        bar: BarArgs,
    },
    /// Disk usage of each subdirectory of a directory
    #[command(visible_alias = "disk")]
    Du {
        /// The directory to scan
        #[arg(default_value = ".")]
        target: PathBuf,

        #[command(flatten)]
        bar: BarArgs,
    },
}

#[derive(Args)]
struct BarArgs {
    /// Print sizes in human readable format
    #[arg(short = 'H', long)]
    human_readable: bool,

    /// Length of the graph
    #[arg(short, long, env = "USAGEBAR_LENGTH", default_value_t = 20)]
    length: usize,
}

impl From<BarArgs> for ReportOptions {
    fn from(args: BarArgs) -> Self {
        Self {
            human_readable: args.human_readable,
            bar_width: args.length,
        }
    }
}

/// Initialize tracing on stderr with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG wins when set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(cli.tool_timeout);
    match cli.command {
        Commands::Mem { program, bar } => {
            let options = MemoryOptions {
                report: bar.into(),
                proc_root: cli.proc_root,
                program,
            };
            app::run_memory(&options, timeout)
        }
        Commands::Du { target, bar } => {
            let options = DiskOptions {
                report: bar.into(),
                target,
            };
            app::run_disk(&options, timeout)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
