//! The primary counter source seam.

use trafficstat_common::error::{Result, TrafficStatError};
use trafficstat_common::types::{StatsKey, StatsValue};

/// Authoritative provider of traffic counters.
///
/// Implementors answer point queries for a [`StatsKey`]. Failing is not
/// fatal: it tells the caller to try the legacy tables instead.
pub trait CounterSource: Send + Sync {
    /// Returns the counters for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficStatError::Unavailable`] when the source is absent
    /// or does not know `key`.
    fn stats(&self, key: &StatsKey) -> Result<StatsValue>;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;
}

/// Source for hosts without BPF accounting. Never answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCounterSource;

impl CounterSource for NoCounterSource {
    fn stats(&self, key: &StatsKey) -> Result<StatsValue> {
        Err(TrafficStatError::unavailable(key, "no counter source configured"))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

impl<T: CounterSource + ?Sized> CounterSource for Box<T> {
    fn stats(&self, key: &StatsKey) -> Result<StatsValue> {
        (**self).stats(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
