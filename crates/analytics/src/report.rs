//! CSV rendering of scan results.

use crate::aggregate::PageSummary;
use blockstats_config::ReportLayout;
use blockstats_ledger::{BlockHeight, TimestampNano};
use chrono::{SecondsFormat, TimeZone, Utc};
use std::fmt::Write as _;
use std::io;
use thiserror::Error;

/// Header of the full report
pub const FULL_HEADER: &str = "timestamp,blockHeight,txCount,medianBlockClosingTime";

/// Header of the compact report
pub const COMPACT_HEADER: &str = "blockHeight,txCount";

/// Report rendering errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("timestamp {0} ns cannot be represented as a date")]
    UnrepresentableTimestamp(TimestampNano),

    #[error("row for block {0} could not be rendered")]
    Render(BlockHeight),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Header line for `layout`, without the trailing newline
pub fn header(layout: ReportLayout) -> &'static str {
    match layout {
        ReportLayout::Full => FULL_HEADER,
        ReportLayout::Compact => COMPACT_HEADER,
    }
}

/// Formats a nanosecond epoch timestamp as an RFC 3339 UTC instant
pub fn format_timestamp(timestamp: TimestampNano) -> Result<String, ReportError> {
    let nanos =
        i64::try_from(timestamp).map_err(|_| ReportError::UnrepresentableTimestamp(timestamp))?;
    Ok(Utc
        .timestamp_nanos(nanos)
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Renders the whole report: the header line followed by one line per row.
///
/// Nothing is returned unless every row renders.
pub fn render_report(rows: &[PageSummary], layout: ReportLayout) -> Result<String, ReportError> {
    let mut output = String::with_capacity(64 * (rows.len() + 1));
    output.push_str(header(layout));
    output.push('\n');

    for row in rows {
        match layout {
            ReportLayout::Full => {
                let timestamp = format_timestamp(row.timestamp)?;
                writeln!(
                    output,
                    "{},{},{},{}",
                    timestamp, row.block_height, row.tx_count, row.mean_closing_time_ms
                )
                .map_err(|_| ReportError::Render(row.block_height))?;
            }
            ReportLayout::Compact => {
                writeln!(output, "{},{}", row.block_height, row.tx_count)
                    .map_err(|_| ReportError::Render(row.block_height))?;
            }
        }
    }

    Ok(output)
}

/// Renders the report and writes it to `sink` in one go
pub fn write_report<W: io::Write>(
    rows: &[PageSummary],
    layout: ReportLayout,
    mut sink: W,
) -> Result<(), ReportError> {
    let rendered = render_report(rows, layout)?;
    sink.write_all(rendered.as_bytes())?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: u64 = 1_000_000_000;

    fn row(timestamp: u64, block_height: u64, tx_count: u64, closing_ms: u64) -> PageSummary {
        PageSummary {
            timestamp,
            block_height,
            tx_count,
            mean_closing_time_ms: closing_ms,
            clamped_gaps: 0,
        }
    }

    #[test]
    fn test_empty_report_is_header_only() {
        assert_eq!(
            render_report(&[], ReportLayout::Full).unwrap(),
            format!("{}\n", FULL_HEADER)
        );
    }

    #[test]
    fn test_full_layout() {
        let rows = [
            row(1_600_000_000 * SECOND, 1000, 42, 1500),
            row(1_600_000_060 * SECOND + 999, 2000, 7, 0),
        ];

        let report = render_report(&rows, ReportLayout::Full).unwrap();

        assert_eq!(
            report,
            "timestamp,blockHeight,txCount,medianBlockClosingTime\n\
             2020-09-13T12:26:40Z,1000,42,1500\n\
             2020-09-13T12:27:40Z,2000,7,0\n"
        );
    }

    #[test]
    fn test_compact_layout() {
        let rows = [row(0, 5, 3, 12), row(0, 10, 0, 0)];

        let report = render_report(&rows, ReportLayout::Compact).unwrap();

        assert_eq!(report, "blockHeight,txCount\n5,3\n10,0\n");
    }

    #[test]
    fn test_epoch_timestamp() {
        assert_eq!(format_timestamp(0).unwrap(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_unrepresentable_timestamp_fails() {
        let rows = [row(SECOND, 1, 0, 0), row(u64::MAX, 2, 0, 0)];

        let err = render_report(&rows, ReportLayout::Full).unwrap_err();

        assert!(matches!(err, ReportError::UnrepresentableTimestamp(u64::MAX)));
    }

    #[test]
    fn test_compact_layout_ignores_timestamps() {
        let rows = [row(u64::MAX, 1, 2, 0)];
        assert_eq!(
            render_report(&rows, ReportLayout::Compact).unwrap(),
            "blockHeight,txCount\n1,2\n"
        );
    }

    #[test]
    fn test_write_report_to_sink() {
        let mut sink = Vec::new();
        write_report(&[row(0, 1, 1, 0)], ReportLayout::Full, &mut sink).unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "timestamp,blockHeight,txCount,medianBlockClosingTime\n1970-01-01T00:00:00Z,1,1,0\n"
        );
    }
}
