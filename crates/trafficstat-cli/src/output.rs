//! Formatted output helpers for CLI commands.
//!
//! Provides counter tables, JSON rendering, and human-readable byte
//! formatting. The unknown sentinel is shown as `unknown` (or `null` in
//! JSON); only raw output prints it as `-1`.

use std::io::Write;

use trafficstat_common::types::{StatField, UNKNOWN};

/// Formats a byte count into a human-readable string (e.g., "128.0 MiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Formats one counter value as returned by the service.
#[must_use]
pub fn format_value(field: StatField, value: i64, human: bool) -> String {
    if value == UNKNOWN {
        return "unknown".to_owned();
    }
    let counter = u64::from_ne_bytes(value.to_ne_bytes());
    match field {
        StatField::RxBytes | StatField::TxBytes if human => format_bytes(counter),
        _ => counter.to_string(),
    }
}

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Aligned text, optionally with byte counters in binary units.
    Text {
        /// Humanize byte counters.
        human: bool,
    },
    /// Values exactly as the service returns them, one per line.
    Raw,
    /// A JSON object keyed by counter name.
    Json,
}

/// Renders query results in `style`.
#[must_use]
pub fn render_values(key: &str, values: &[(StatField, i64)], style: Style) -> String {
    let human = match style {
        Style::Text { human } => human,
        Style::Raw => {
            return values
                .iter()
                .map(|(_, value)| value.to_string())
                .collect::<Vec<_>>()
                .join("\n");
        }
        Style::Json => {
            let mut object = serde_json::Map::new();
            let _ = object.insert("key".to_owned(), key.into());
            for &(field, value) in values {
                let rendered = if value == UNKNOWN {
                    serde_json::Value::Null
                } else {
                    u64::from_ne_bytes(value.to_ne_bytes()).into()
                };
                let _ = object.insert(field.to_string(), rendered);
            }
            return serde_json::Value::Object(object).to_string();
        }
    };

    if let [(field, value)] = values {
        return format_value(*field, *value, human);
    }

    let mut out = format!("{:<12} {key}", "COUNTER");
    for &(field, value) in values {
        out.push('\n');
        out.push_str(&format!("{:<12} {}", field.to_string(), format_value(field, value, human)));
    }
    out
}

/// Writes rendered query results to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_values(key: &str, values: &[(StatField, i64)], style: Style) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render_values(key, values, style))?;
    Ok(())
}
