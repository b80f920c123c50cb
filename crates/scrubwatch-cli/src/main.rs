//! scrubwatch - report the placement groups that have waited longest for a
//! deep scrub.
//!
//! Queries `ceph pg ls` (falling back to `ceph pg dump`), ranks every PG by
//! its last deep-scrub stamp, prints the stalest ones and, unless told not
//! to, the commands an operator can paste to scrub them.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scrubwatch_core::{
    debug_lines, render_commands, render_json, render_table, run_report, CephCommand,
    FileSource, RecordSource, ReportConfig, ScrubReport, DEFAULT_COUNT,
    DEFAULT_SCRUBS,
};
use std::path::PathBuf;
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "scrubwatch")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Show the Ceph placement groups with the oldest deep scrub",
    long_about = None
)]
struct Cli {
    /// Number of stalest placement groups to show
    #[arg(short = 'n', long = "count", default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
    count: usize,

    /// osd_max_scrubs value used in the emitted commands
    #[arg(long, default_value_t = DEFAULT_SCRUBS)]
    scrubs: u32,

    /// Do not print remediation commands
    #[arg(long)]
    no_cmds: bool,

    /// Print each shown PG's resolved instant to stderr
    #[arg(long)]
    debug: bool,

    /// Read the PG JSON from a file ("-" for stdin) instead of running ceph
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// ceph binary to run [default: $SCRUBWATCH_CEPH, else ceph]
    #[arg(long)]
    ceph: Option<String>,

    /// Cluster name passed to ceph as --cluster
    #[arg(long)]
    cluster: Option<String>,

    /// ceph.conf path passed to ceph as --conf
    #[arg(short = 'c', long)]
    conf: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn parse_count(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("count must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid count {raw:?}: {e}")),
    }
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        let config = ReportConfig::default()
            .with_count(self.count)
            .with_scrubs(self.scrubs)
            .with_debug(self.debug);
        if self.no_cmds {
            config.without_commands()
        } else {
            config
        }
    }

    fn record_source(&self) -> Box<dyn RecordSource> {
        if let Some(path) = &self.input {
            return Box::new(FileSource::new(path));
        }

        let mut ceph = match &self.ceph {
            Some(binary) => CephCommand::new(binary),
            None => CephCommand::from_env(),
        };
        if let Some(cluster) = &self.cluster {
            ceph = ceph.with_cluster(cluster);
        }
        if let Some(conf) = &self.conf {
            ceph = ceph.with_conf(conf);
        }
        Box::new(ceph)
    }
}

fn render_output(report: &ScrubReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = render_json(report).context("Failed to serialize report")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Table => {
            let mut out = render_table(report);
            let commands = render_commands(report);
            if !commands.is_empty() {
                out.push('\n');
                out.push_str(&commands);
            }
            Ok(out)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    scrubwatch_core::init_tracing(cli.log_json, level);

    let config = cli.report_config();
    let source = cli.record_source();
    debug!(source = %source.describe(), ?config, "starting scrub report");

    let report = run_report(source.as_ref(), &config)
        .with_context(|| format!("Failed to build scrub report from {}", source.describe()))?;

    if config.debug {
        for line in debug_lines(&report.rows) {
            eprintln!("{line}");
        }
    }

    print!("{}", render_output(&report, cli.format)?);
    Ok(())
}
