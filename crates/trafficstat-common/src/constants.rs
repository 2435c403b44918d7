//! System-wide constants and default paths.

/// Per-interface aggregate table exposed by the `xt_qtaguid` netfilter module.
pub const QTAGUID_IFACE_STATS: &str = "/proc/net/xt_qtaguid/iface_stat_fmt";

/// Per-(uid, tag, interface) table exposed by the `xt_qtaguid` netfilter module.
pub const QTAGUID_UID_STATS: &str = "/proc/net/xt_qtaguid/stats";

/// Directory where the traffic accounting programs pin their maps.
pub const BPF_PIN_DIR: &str = "/sys/fs/bpf/netd_shared";

/// Pinned map holding lifetime counters keyed by uid.
pub const APP_UID_STATS_MAP: &str = "map_netd_app_uid_stats_map";

/// Pinned map holding counters keyed by interface index.
pub const IFACE_STATS_MAP: &str = "map_netd_iface_stats_map";

/// Pinned map resolving interface indexes to names.
pub const IFACE_INDEX_NAME_MAP: &str = "map_netd_iface_index_name_map";

/// Longest interface name accepted from the legacy tables.
pub const MAX_IFACE_NAME_LEN: usize = 31;

/// Size of the fixed interface name buffer stored in BPF maps (`IFNAMSIZ`).
pub const IFNAMSIZ: usize = 16;

/// Longest legacy table line read, newline included. Longer lines are skipped.
pub const MAX_LINE_LEN: usize = 384;
