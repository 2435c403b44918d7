//! The service boundary exposed to callers.
//!
//! Five point operations, all infallible from the caller's side: failed
//! counter queries return [`UNKNOWN`](trafficstat_common::types::UNKNOWN)
//! and tracing failures are only logged.

use trafficstat_common::config::TrafficStatConfig;
use trafficstat_core::qtaguid::{LegacyTables, QtaguidTables};
use trafficstat_ebpf::bpf::BpfCounterSource;
use trafficstat_ebpf::source::CounterSource;
use trafficstat_ebpf::tracer::{NetworkTraceHandler, NetworkTracer};

use crate::query::StatQuery;

/// Network statistics operations offered across the service boundary.
///
/// Field selectors are the raw [`StatField`](trafficstat_common::types::StatField)
/// discriminants; ids arrive as the caller's signed 32-bit integers.
pub trait NetworkStatsService: Send + Sync {
    /// Returns the selected counter summed over every interface.
    fn get_total_stat(&self, field: i32) -> i64;

    /// Returns the selected counter for the interface named by `iface`.
    ///
    /// `None` stands for a null name.
    fn get_iface_stat(&self, iface: Option<&[u8]>, field: i32) -> i64;

    /// Returns the selected counter for the interface with index `ifindex`.
    fn get_if_index_stat(&self, ifindex: i32, field: i32) -> i64;

    /// Returns the selected untagged counter for `uid`.
    fn get_uid_stat(&self, uid: i32, field: i32) -> i64;

    /// Triggers packet trace initialization.
    fn init_network_tracing(&self);
}

/// Service wiring a counter source, the legacy tables, and a tracer.
#[derive(Debug)]
pub struct TrafficStatsService<C = BpfCounterSource, L = QtaguidTables, T = NetworkTraceHandler> {
    query: StatQuery<C, L>,
    tracer: T,
}

impl TrafficStatsService {
    /// Builds the production service from `config`.
    #[must_use]
    pub fn from_config(config: &TrafficStatConfig) -> Self {
        tracing::debug!(
            pin_dir = %config.bpf_pin_dir.display(),
            legacy_fallback = config.legacy_fallback,
            "building traffic stats service"
        );
        Self::new(
            StatQuery::new(
                BpfCounterSource::from_config(config),
                QtaguidTables::from_config(config),
            )
            .with_legacy_fallback(config.legacy_fallback),
            NetworkTraceHandler::new(&config.bpf_pin_dir),
        )
    }
}

impl Default for TrafficStatsService {
    fn default() -> Self {
        Self::from_config(&TrafficStatConfig::default())
    }
}

impl<C, L, T> TrafficStatsService<C, L, T> {
    /// Assembles a service from its parts.
    #[must_use]
    pub const fn new(query: StatQuery<C, L>, tracer: T) -> Self {
        Self { query, tracer }
    }

    /// Returns the query front.
    pub const fn query(&self) -> &StatQuery<C, L> {
        &self.query
    }

    /// Returns the tracer.
    pub const fn tracer(&self) -> &T {
        &self.tracer
    }
}

impl<C, L, T> NetworkStatsService for TrafficStatsService<C, L, T>
where
    C: CounterSource,
    L: LegacyTables,
    T: NetworkTracer,
{
    fn get_total_stat(&self, field: i32) -> i64 {
        self.query.total_stat(field)
    }

    fn get_iface_stat(&self, iface: Option<&[u8]>, field: i32) -> i64 {
        self.query.iface_stat(iface, field)
    }

    fn get_if_index_stat(&self, ifindex: i32, field: i32) -> i64 {
        self.query.if_index_stat(ifindex, field)
    }

    fn get_uid_stat(&self, uid: i32, field: i32) -> i64 {
        self.query.uid_stat(uid, field)
    }

    fn init_network_tracing(&self) {
        self.tracer.init();
    }
}
