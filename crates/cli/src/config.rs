//! Command-line flags and the run configuration derived from them.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use chash_corelib::SortKey;
use clap::Parser;

use crate::report::OutputFormat;

/// Predicts how the proxy's consistent-hash balancer spreads keys over upstreams.
#[derive(Parser, Debug)]
#[command(name = "chash-statistic", version)]
pub struct CliConfig {
    /// Upstream list: one `host:port[,weight]` per line.
    #[arg(long = "upstreams-file", default_value = "upstreams.list")]
    pub upstreams_file: PathBuf,

    /// Hash key list: one key per line.
    #[arg(long = "hashkeys-file", default_value = "hashkeys.list")]
    pub hashkeys_file: PathBuf,

    /// Print every upstream, ring point and key match.
    #[arg(long)]
    pub verbose: bool,

    /// Output sort key: "server" or "hitCount".
    #[arg(long = "output-sort-key", default_value = "server", value_parser = parse_sort_key)]
    pub output_sort_key: SortKey,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Generate ring points on one scoped thread per available core.
    #[arg(long)]
    pub parallel: bool,
}

fn parse_sort_key(s: &str) -> std::result::Result<SortKey, chash_corelib::Error> {
    s.parse()
}

/// Settings for one run, fixed once flags are parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub upstreams_file: PathBuf,
    pub hashkeys_file: PathBuf,
    pub verbose: bool,
    pub sort_key: SortKey,
    pub format: OutputFormat,
    pub parallel: bool,
}

impl From<CliConfig> for AnalysisConfig {
    fn from(cli: CliConfig) -> Self {
        Self {
            upstreams_file: cli.upstreams_file,
            hashkeys_file: cli.hashkeys_file,
            verbose: cli.verbose,
            sort_key: cli.output_sort_key,
            format: cli.format,
            parallel: cli.parallel,
        }
    }
}

impl AnalysisConfig {
    /// Both input lists must exist before anything runs.
    pub fn validate(&self) -> Result<()> {
        check_file("upstreams", &self.upstreams_file)?;
        check_file("hash keys", &self.hashkeys_file)
    }
}

fn check_file(what: &str, path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("cannot access {what} file {}", path.display()))?;
    ensure!(
        meta.is_file(),
        "{what} path {} is not a file",
        path.display()
    );
    Ok(())
}
