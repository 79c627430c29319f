//! CLI for predicting consistent-hash load distribution.
//!
//! Reads an upstream list and a sample of hash keys, builds the ring the
//! proxy would build, and reports how many keys land on each upstream.

pub mod commands;
pub mod config;
pub mod report;
pub mod telemetry;

pub use commands::{analyze, execute};
pub use config::{AnalysisConfig, CliConfig};
pub use report::OutputFormat;

impl CliConfig {
    /// Runs the statistics pass with these flags, writing to stdout.
    pub fn run(self) -> anyhow::Result<()> {
        let config = AnalysisConfig::from(self);
        telemetry::init(config.verbose);
        execute(&config, std::io::stdout().lock())?;
        Ok(())
    }
}
