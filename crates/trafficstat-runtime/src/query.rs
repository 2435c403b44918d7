//! Query dispatch with legacy fallback.
//!
//! Every query tries the primary counter source first. Total, interface,
//! and uid queries fall back to the legacy tables; interface index queries
//! have no legacy layout and stop at the primary source. Any failure
//! becomes [`UNKNOWN`] at the boundary.

use trafficstat_common::error::{Result, TrafficStatError};
use trafficstat_common::types::{StatField, StatsKey, StatsValue, UNKNOWN};
use trafficstat_core::qtaguid::LegacyTables;
use trafficstat_ebpf::source::CounterSource;

/// Returns the counter selected by a raw boundary selector.
///
/// The counter is reinterpreted bit for bit as `i64`, so a counter of
/// `u64::MAX` comes out equal to [`UNKNOWN`]. Out-of-range selectors
/// return [`UNKNOWN`].
#[must_use]
pub const fn extract_field(stats: &StatsValue, field: i32) -> i64 {
    match StatField::from_raw(field) {
        Some(field) => i64::from_ne_bytes(stats.field(field).to_ne_bytes()),
        None => UNKNOWN,
    }
}

/// Validates a caller-supplied interface name.
///
/// # Errors
///
/// Returns [`TrafficStatError::InvalidInput`] for a missing, empty, or
/// non-UTF-8 name.
pub fn decode_iface(raw: Option<&[u8]>) -> Result<&str> {
    let raw = raw.ok_or_else(|| TrafficStatError::InvalidInput {
        message: "interface name is null".into(),
    })?;
    let name = std::str::from_utf8(raw).map_err(|e| TrafficStatError::InvalidInput {
        message: format!("interface name is not UTF-8: {e}"),
    })?;
    if name.is_empty() {
        return Err(TrafficStatError::InvalidInput {
            message: "interface name is empty".into(),
        });
    }
    Ok(name)
}

/// Reinterprets a boundary integer as the unsigned kernel id it encodes.
#[allow(clippy::cast_sign_loss)]
const fn kernel_id(raw: i32) -> u32 {
    raw as u32
}

/// Stateless query front over a primary source and the legacy tables.
#[derive(Debug)]
pub struct StatQuery<C, L> {
    source: C,
    legacy: L,
    legacy_fallback: bool,
}

impl<C: CounterSource, L: LegacyTables> StatQuery<C, L> {
    /// Creates a query front with legacy fallback enabled.
    #[must_use]
    pub const fn new(source: C, legacy: L) -> Self {
        Self {
            source,
            legacy,
            legacy_fallback: true,
        }
    }

    /// Enables or disables the legacy table fallback.
    #[must_use]
    pub fn with_legacy_fallback(mut self, enabled: bool) -> Self {
        self.legacy_fallback = enabled;
        self
    }

    /// Returns the primary source.
    pub const fn source(&self) -> &C {
        &self.source
    }

    /// Returns the legacy tables.
    pub const fn legacy(&self) -> &L {
        &self.legacy
    }

    /// Counters summed over every interface.
    ///
    /// # Errors
    ///
    /// Returns the legacy error when both sources fail.
    pub fn total_stats(&self) -> Result<StatsValue> {
        self.with_fallback(&StatsKey::Total, |legacy| legacy.iface_stats(None))
    }

    /// Counters for one interface by name.
    ///
    /// # Errors
    ///
    /// Returns the legacy error when both sources fail.
    pub fn iface_stats(&self, iface: &str) -> Result<StatsValue> {
        let key = StatsKey::Iface(iface.to_owned());
        self.with_fallback(&key, |legacy| legacy.iface_stats(Some(iface)))
    }

    /// Counters for one interface by index. Never reads the legacy tables.
    ///
    /// # Errors
    ///
    /// Returns the primary source error.
    pub fn if_index_stats(&self, ifindex: u32) -> Result<StatsValue> {
        self.source.stats(&StatsKey::IfIndex(ifindex))
    }

    /// Untagged counters for one uid.
    ///
    /// # Errors
    ///
    /// Returns the legacy error when both sources fail.
    pub fn uid_stats(&self, uid: u32) -> Result<StatsValue> {
        self.with_fallback(&StatsKey::Uid(uid), |legacy| legacy.uid_stats(uid))
    }

    /// Returns the selected counter summed over every interface, or [`UNKNOWN`].
    pub fn total_stat(&self, field: i32) -> i64 {
        answer(&StatsKey::Total, self.total_stats(), field)
    }

    /// Returns the selected counter for a named interface, or [`UNKNOWN`].
    ///
    /// A missing, empty, or undecodable name returns [`UNKNOWN`] without
    /// touching either source.
    pub fn iface_stat(&self, iface: Option<&[u8]>, field: i32) -> i64 {
        match decode_iface(iface) {
            Ok(name) => answer(&StatsKey::Iface(name.to_owned()), self.iface_stats(name), field),
            Err(e) => {
                tracing::debug!(error = %e, "rejected interface query");
                UNKNOWN
            }
        }
    }

    /// Returns the selected counter for an interface index, or [`UNKNOWN`].
    pub fn if_index_stat(&self, ifindex: i32, field: i32) -> i64 {
        let ifindex = kernel_id(ifindex);
        answer(&StatsKey::IfIndex(ifindex), self.if_index_stats(ifindex), field)
    }

    /// Returns the selected counter for a uid, or [`UNKNOWN`].
    pub fn uid_stat(&self, uid: i32, field: i32) -> i64 {
        let uid = kernel_id(uid);
        answer(&StatsKey::Uid(uid), self.uid_stats(uid), field)
    }

    fn with_fallback(
        &self,
        key: &StatsKey,
        legacy: impl FnOnce(&L) -> Result<StatsValue>,
    ) -> Result<StatsValue> {
        let primary = match self.source.stats(key) {
            Ok(stats) => return Ok(stats),
            Err(e) => e,
        };
        if !self.legacy_fallback {
            return Err(primary);
        }
        tracing::debug!(
            %key,
            source = self.source.name(),
            error = %primary,
            "primary source failed, reading legacy tables"
        );
        legacy(&self.legacy)
    }
}

/// Collapses a query outcome into the boundary value.
fn answer(key: &StatsKey, result: Result<StatsValue>, field: i32) -> i64 {
    match result {
        Ok(stats) => extract_field(&stats, field),
        Err(e) => {
            tracing::debug!(%key, field, error = %e, "no counters available");
            UNKNOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Primary source answering from a fixed value, counting calls.
    #[derive(Default)]
    struct FakeSource {
        answer: Option<StatsValue>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn answering(stats: StatsValue) -> Self {
            Self {
                answer: Some(stats),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CounterSource for FakeSource {
        fn stats(&self, key: &StatsKey) -> Result<StatsValue> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .ok_or_else(|| TrafficStatError::unavailable(key, "fake source is empty"))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    /// Legacy tables answering from a fixed value, counting calls.
    #[derive(Default)]
    struct FakeTables {
        answer: Option<StatsValue>,
        iface_calls: AtomicUsize,
        uid_calls: AtomicUsize,
    }

    impl FakeTables {
        fn answering(stats: StatsValue) -> Self {
            Self {
                answer: Some(stats),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.iface_calls.load(Ordering::SeqCst) + self.uid_calls.load(Ordering::SeqCst)
        }

        fn result(&self) -> Result<StatsValue> {
            self.answer.ok_or_else(|| TrafficStatError::Io {
                path: "/proc/net/xt_qtaguid/stats".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    impl LegacyTables for FakeTables {
        fn iface_stats(&self, _iface: Option<&str>) -> Result<StatsValue> {
            let _ = self.iface_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }

        fn uid_stats(&self, _uid: u32) -> Result<StatsValue> {
            let _ = self.uid_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }
    }

    const PRIMARY: StatsValue = StatsValue::new(100, 1, 200, 2);
    const LEGACY: StatsValue = StatsValue::new(7, 8, 9, 10);

    #[test]
    fn extract_field_returns_each_member() {
        let stats = StatsValue::new(11, 22, 33, 44);
        assert_eq!(extract_field(&stats, 0), 11);
        assert_eq!(extract_field(&stats, 1), 22);
        assert_eq!(extract_field(&stats, 2), 33);
        assert_eq!(extract_field(&stats, 3), 44);
    }

    #[test]
    fn extract_field_out_of_range_is_unknown() {
        let stats = StatsValue::new(11, 22, 33, 44);
        assert_eq!(extract_field(&stats, 4), UNKNOWN);
        assert_eq!(extract_field(&stats, -1), UNKNOWN);
        assert_eq!(extract_field(&stats, i32::MAX), UNKNOWN);
    }

    #[test]
    fn extract_field_max_counter_collides_with_unknown() {
        let stats = StatsValue::new(u64::MAX, 0, 0, 0);
        assert_eq!(extract_field(&stats, 0), UNKNOWN);
    }

    #[test]
    fn decode_iface_rejects_null_empty_and_invalid_utf8() {
        assert!(decode_iface(None).is_err());
        assert!(decode_iface(Some(b"")).is_err());
        assert!(decode_iface(Some(b"wl\xffan0")).is_err());
        assert_eq!(decode_iface(Some(b"wlan0")).expect("valid"), "wlan0");
    }

    #[test]
    fn primary_success_skips_legacy_tables() {
        let query = StatQuery::new(FakeSource::answering(PRIMARY), FakeTables::answering(LEGACY));
        assert_eq!(query.total_stat(0), 100);
        assert_eq!(query.iface_stat(Some(b"wlan0"), 1), 1);
        assert_eq!(query.uid_stat(1000, 2), 200);
        assert_eq!(query.if_index_stat(3, 3), 2);
        assert_eq!(query.source().calls(), 4);
        assert_eq!(query.legacy().calls(), 0);
    }

    #[test]
    fn primary_failure_falls_back_to_legacy_tables() {
        let query = StatQuery::new(FakeSource::default(), FakeTables::answering(LEGACY));
        assert_eq!(query.total_stat(0), 7);
        assert_eq!(query.iface_stat(Some(b"wlan0"), 1), 8);
        assert_eq!(query.uid_stat(1000, 3), 10);
        assert_eq!(query.legacy().iface_calls.load(Ordering::SeqCst), 2);
        assert_eq!(query.legacy().uid_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn both_sources_failing_is_unknown() {
        let query = StatQuery::new(FakeSource::default(), FakeTables::default());
        assert_eq!(query.total_stat(0), UNKNOWN);
        assert_eq!(query.iface_stat(Some(b"wlan0"), 0), UNKNOWN);
        assert_eq!(query.uid_stat(1000, 0), UNKNOWN);
    }

    #[test]
    fn if_index_never_reads_legacy_tables() {
        let query = StatQuery::new(FakeSource::default(), FakeTables::answering(LEGACY));
        assert_eq!(query.if_index_stat(2, 0), UNKNOWN);
        assert_eq!(query.source().calls(), 1);
        assert_eq!(query.legacy().calls(), 0);
    }

    #[test]
    fn invalid_iface_name_touches_no_source() {
        let query = StatQuery::new(FakeSource::answering(PRIMARY), FakeTables::answering(LEGACY));
        assert_eq!(query.iface_stat(None, 0), UNKNOWN);
        assert_eq!(query.iface_stat(Some(b""), 0), UNKNOWN);
        assert_eq!(query.iface_stat(Some(b"\xc3\x28"), 0), UNKNOWN);
        assert_eq!(query.source().calls(), 0);
        assert_eq!(query.legacy().calls(), 0);
    }

    #[test]
    fn disabled_fallback_stops_at_primary_source() {
        let query = StatQuery::new(FakeSource::default(), FakeTables::answering(LEGACY))
            .with_legacy_fallback(false);
        assert_eq!(query.total_stat(0), UNKNOWN);
        assert_eq!(query.uid_stat(1000, 0), UNKNOWN);
        assert_eq!(query.legacy().calls(), 0);
    }

    #[test]
    fn bad_field_after_successful_lookup_is_unknown() {
        let query = StatQuery::new(FakeSource::answering(PRIMARY), FakeTables::default());
        assert_eq!(query.uid_stat(1000, 9), UNKNOWN);
    }

    #[test]
    fn negative_ids_are_passed_as_kernel_ids() {
        assert_eq!(kernel_id(-1), u32::MAX);
        assert_eq!(kernel_id(1000), 1000);
    }
}
