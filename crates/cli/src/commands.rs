//! The statistics run: load both lists, build the ring, tally, report.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use chash_corelib::{
    parse_hash_keys, parse_upstreams, stats, RingBuilder, UpstreamStatistic, VerboseSink,
};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::report::{self, BEGIN_VERBOSE, END_VERBOSE};

/// Verbose sink writing to the report output.
///
/// Lines are indented by one space. The first write error is kept and
/// returned by [`WriterSink::into_inner`]; later lines are dropped.
pub struct WriterSink<W: Write> {
    enabled: bool,
    out: RefCell<W>,
    error: RefCell<Option<io::Error>>,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `out`. A disabled sink writes banners only.
    pub fn new(out: W, enabled: bool) -> Self {
        Self {
            enabled,
            out: RefCell::new(out),
            error: RefCell::new(None),
        }
    }

    fn write(&self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        let mut error = self.error.borrow_mut();
        if error.is_none() {
            let mut out = self.out.borrow_mut();
            if let Err(e) = f(&mut *out) {
                *error = Some(e);
            }
        }
    }

    /// Writes a banner line preceded by an empty line.
    pub fn banner(&self, text: &str) {
        self.write(|out| writeln!(out, "\n{text}"));
    }

    /// Returns the writer, or the first error a write hit.
    pub fn into_inner(self) -> io::Result<W> {
        match self.error.into_inner() {
            Some(e) => Err(e),
            None => Ok(self.out.into_inner()),
        }
    }
}

impl<W: Write> VerboseSink for WriterSink<W> {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn log_line(&self, line: &str) {
        if self.enabled {
            self.write(|out| writeln!(out, " {line}"));
        }
    }
}

/// Runs the pipeline and returns the sorted statistics.
pub fn analyze(config: &AnalysisConfig, sink: &dyn VerboseSink) -> Result<Vec<UpstreamStatistic>> {
    config.validate()?;

    let upstreams_text = fs::read_to_string(&config.upstreams_file)
        .with_context(|| format!("failed to read {}", config.upstreams_file.display()))?;
    let upstreams = parse_upstreams(&upstreams_text);
    info!(count = upstreams.len(), file = %config.upstreams_file.display(), "loaded upstreams");

    let ring = RingBuilder::new()
        .upstreams(upstreams)
        .parallel(config.parallel)
        .build_with(sink)
        .context("failed to build hash ring")?;
    info!(points = ring.len(), "hash ring ready");

    let keys_text = fs::read_to_string(&config.hashkeys_file)
        .with_context(|| format!("failed to read {}", config.hashkeys_file.display()))?;
    let stats = stats::run_with(&ring, parse_hash_keys(&keys_text), config.sort_key, sink)
        .with_context(|| format!("no statistics for {}", config.hashkeys_file.display()))?;
    Ok(stats)
}

/// Runs the pipeline and writes verbose output and the report to `out`.
///
/// The report is written only when the whole run succeeded.
pub fn execute<W: Write>(config: &AnalysisConfig, out: W) -> Result<W> {
    let sink = WriterSink::new(out, config.verbose);
    if config.verbose {
        sink.banner(BEGIN_VERBOSE);
    }
    let stats = analyze(config, &sink)?;
    if config.verbose {
        sink.banner(END_VERBOSE);
    }

    let mut out = sink.into_inner().context("failed to write verbose output")?;
    report::render(&stats, config.format, &mut out)?;
    Ok(out)
}
