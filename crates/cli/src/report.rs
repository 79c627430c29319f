//! Rendering of the final statistics.

use std::io::Write;

use anyhow::Result;
use chash_corelib::UpstreamStatistic;
use clap::ValueEnum;

pub const BEGIN_VERBOSE: &str = "================ Begin Of Verbose Output ===================";
pub const END_VERBOSE: &str = "================ End Of Verbose Output =====================";
const BEGIN_RESULT: &str = "=============== Begin Of Statistic Result ===================";
const END_RESULT: &str = "=============== End Of Statistic Result ====================";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Banner-framed table, one line per upstream.
    #[default]
    Table,
    /// JSON array of `{server, hit_count, hit_rate}`.
    Json,
}

/// Writes `stats` to `out` in the chosen format and flushes.
pub fn render<W: Write>(
    stats: &[UpstreamStatistic],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(stats, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, stats)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn render_table<W: Write>(stats: &[UpstreamStatistic], out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{BEGIN_RESULT}")?;
    for (idx, s) in stats.iter().enumerate() {
        writeln!(
            out,
            "ID: {idx:>3} Server: {:<15} HitCount: {:<8} HitRate: {:.3}",
            s.server, s.hit_count, s.hit_rate
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{END_RESULT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<UpstreamStatistic> {
        vec![
            UpstreamStatistic {
                server: "a.example.com:80".into(),
                hit_count: 493,
                hit_rate: 0.493,
            },
            UpstreamStatistic {
                server: "10.0.0.1:80".into(),
                hit_count: 7,
                hit_rate: 0.0066,
            },
        ]
    }

    #[test]
    fn test_table_layout() {
        let mut out = Vec::new();
        render(&sample(), OutputFormat::Table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\n\
=============== Begin Of Statistic Result ===================\n\
ID:   0 Server: a.example.com:80 HitCount: 493      HitRate: 0.493\n\
ID:   1 Server: 10.0.0.1:80     HitCount: 7        HitRate: 0.007\n\
\n\
=============== End Of Statistic Result ====================\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_json_layout() {
        let mut out = Vec::new();
        render(&sample(), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["server"], "a.example.com:80");
        assert_eq!(value[0]["hit_count"], 493);
        assert_eq!(value[1]["hit_rate"], 0.0066);
    }
}
