//! Parser for the per-interface aggregate table (`iface_stat_fmt`).
//!
//! Row layout:
//!
//! ```text
//! ifname rx_bytes rx_packets tx_bytes tx_packets <u> tcp_rx_packets <u> <u> <u> <u> <u> tcp_tx_packets <u> <u> <u> <u>
//! ```
//!
//! The header row fails counter parsing and is skipped like any other
//! malformed row.

use std::path::Path;

use trafficstat_common::error::Result;
use trafficstat_common::types::StatsValue;

use super::{fields, scan_table};

/// One parsed row of the interface table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfaceRow<'a> {
    /// Interface name.
    pub iface: &'a str,
    /// Byte and packet counters.
    pub stats: StatsValue,
    /// TCP packets received, when the row carries it.
    pub tcp_rx_packets: Option<u64>,
    /// TCP packets transmitted, when the row carries it.
    pub tcp_tx_packets: Option<u64>,
}

/// Parses one line of the interface table.
///
/// Returns `None` unless the name and the four leading counters parse.
/// Trailing columns are read left to right until the first one that is
/// not a counter.
#[must_use]
pub fn parse_iface_line(line: &str) -> Option<IfaceRow<'_>> {
    let mut tokens = line.split_whitespace();
    let iface = fields::iface_name(tokens.next()?)?;
    let rx_bytes = fields::counter(tokens.next()?)?;
    let rx_packets = fields::counter(tokens.next()?)?;
    let tx_bytes = fields::counter(tokens.next()?)?;
    let tx_packets = fields::counter(tokens.next()?)?;

    let extra: Vec<u64> = tokens.map_while(fields::counter).collect();

    Some(IfaceRow {
        iface,
        stats: StatsValue::new(rx_bytes, rx_packets, tx_bytes, tx_packets),
        tcp_rx_packets: extra.get(1).copied(),
        tcp_tx_packets: extra.get(7).copied(),
    })
}

/// Sums the rows of the interface table at `path`.
///
/// With `iface` unset every well-formed row is added; otherwise only rows
/// whose name equals `iface`. The table is not assumed to hold one row per
/// interface.
///
/// # Errors
///
/// Returns an error if the table cannot be opened, read, or closed.
pub fn parse_iface_stats_at(path: &Path, iface: Option<&str>) -> Result<StatsValue> {
    let mut total = StatsValue::default();
    let _ = scan_table(path, |line| {
        let Some(row) = parse_iface_line(line) else {
            return false;
        };
        if iface.is_none_or(|wanted| wanted == row.iface) {
            total.accumulate(&row.stats);
        }
        true
    })?;
    tracing::debug!(path = %path.display(), iface = ?iface, ?total, "parsed interface table");
    Ok(total)
}
