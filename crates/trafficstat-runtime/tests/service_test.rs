//! End-to-end tests for the traffic stats service over fixture tables.
//!
//! These tests drive the five boundary operations the way a polling
//! caller does, with the legacy tables written to a temp directory and
//! an empty BPF pin directory so every query exercises the fallback.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use trafficstat_common::config::TrafficStatConfig;
use trafficstat_common::types::{StatField, UNKNOWN};
use trafficstat_runtime::service::{NetworkStatsService, TrafficStatsService};

const IFACE_TABLE: &str = "\
ifname total_skb_rx_bytes total_skb_rx_packets total_skb_tx_bytes total_skb_tx_packets
wlan0 1000 10 2000 20 0 7 0 0 0 0 0 9 0 0 0 0
rmnet_data0 500 5 600 6 0 0 0 0 0 0 0 0 0 0 0 0
this row is truncated
";

const UID_TABLE: &str = "\
idx iface acct_tag_hex uid_tag_int cnt_set rx_bytes rx_packets tx_bytes tx_packets rx_tcp_bytes
2 wlan0 0x0 1000 0 100 1 200 2 0
3 wlan0 0x0 1000 1 10 1 20 2 0
4 wlan0 0x3e800000000 1000 0 9999 99 9999 99 0
5 rmnet_data0 0x0 10010 0 42 3 84 6 0
";

fn config_in(dir: &Path) -> TrafficStatConfig {
    TrafficStatConfig {
        iface_stat_path: dir.join("iface_stat_fmt"),
        uid_stat_path: dir.join("stats"),
        bpf_pin_dir: dir.join("bpf"),
        legacy_fallback: true,
    }
}

fn service_with_tables() -> (tempfile::TempDir, TrafficStatsService) {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("iface_stat_fmt"), IFACE_TABLE).expect("write iface table");
    std::fs::write(dir.path().join("stats"), UID_TABLE).expect("write uid table");
    let service = TrafficStatsService::from_config(&config_in(dir.path()));
    (dir, service)
}

#[test]
fn total_stat_sums_all_interfaces() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_total_stat(StatField::RxBytes.as_raw()), 1500);
    assert_eq!(service.get_total_stat(StatField::RxPackets.as_raw()), 15);
    assert_eq!(service.get_total_stat(StatField::TxBytes.as_raw()), 2600);
    assert_eq!(service.get_total_stat(StatField::TxPackets.as_raw()), 26);
}

#[test]
fn iface_stat_returns_named_interface() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_iface_stat(Some(b"wlan0"), StatField::TxBytes.as_raw()), 2000);
    assert_eq!(service.get_iface_stat(Some(b"rmnet_data0"), StatField::RxBytes.as_raw()), 500);
    assert_eq!(service.get_iface_stat(Some(b"eth0"), StatField::RxBytes.as_raw()), 0);
}

#[test]
fn iface_stat_rejects_bad_names() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_iface_stat(None, 0), UNKNOWN);
    assert_eq!(service.get_iface_stat(Some(b""), 0), UNKNOWN);
    assert_eq!(service.get_iface_stat(Some(b"\xff\xfe"), 0), UNKNOWN);
}

#[test]
fn uid_stat_counts_only_untagged_rows() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_uid_stat(1000, StatField::RxBytes.as_raw()), 110);
    assert_eq!(service.get_uid_stat(1000, StatField::TxPackets.as_raw()), 4);
    assert_eq!(service.get_uid_stat(10010, StatField::TxBytes.as_raw()), 84);
    assert_eq!(service.get_uid_stat(99999, StatField::RxBytes.as_raw()), 0);
}

#[test]
fn if_index_stat_has_no_legacy_answer() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_if_index_stat(1, StatField::RxBytes.as_raw()), UNKNOWN);
}

#[test]
fn unknown_field_selector_is_unknown() {
    let (_dir, service) = service_with_tables();
    assert_eq!(service.get_total_stat(4), UNKNOWN);
    assert_eq!(service.get_uid_stat(1000, -1), UNKNOWN);
}

#[test]
fn missing_tables_return_unknown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = TrafficStatsService::from_config(&config_in(dir.path()));
    assert_eq!(service.get_total_stat(0), UNKNOWN);
    assert_eq!(service.get_iface_stat(Some(b"wlan0"), 0), UNKNOWN);
    assert_eq!(service.get_uid_stat(1000, 0), UNKNOWN);
}

#[test]
fn repeated_polling_is_stable() {
    let (_dir, service) = service_with_tables();
    for _ in 0..256 {
        assert_eq!(service.get_total_stat(StatField::RxBytes.as_raw()), 1500);
        assert_eq!(service.get_uid_stat(1000, StatField::RxBytes.as_raw()), 110);
    }
}

#[test]
fn concurrent_queries_are_independent() {
    let (_dir, service) = service_with_tables();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let _ = scope.spawn(|| {
                for _ in 0..32 {
                    assert_eq!(service.get_iface_stat(Some(b"wlan0"), 0), 1000);
                }
            });
        }
    });
}

#[test]
fn init_network_tracing_is_idempotent() {
    let (_dir, service) = service_with_tables();
    service.init_network_tracing();
    service.init_network_tracing();
    assert!(service.tracer().is_initialized());
    assert!(!service.tracer().has_packet_source());
}
