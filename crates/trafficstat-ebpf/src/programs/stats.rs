//! Traffic accounting program maps.
//!
//! Value layouts must match the C structs the accounting programs write,
//! field order included.

use trafficstat_common::constants::IFNAMSIZ;
use trafficstat_common::types::StatsValue;

/// Counter record stored in the accounting maps.
///
/// Packets come before bytes here, unlike [`StatsValue`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BpfStatsValue {
    /// Packets received.
    pub rx_packets: u64,
    /// Bytes received.
    pub rx_bytes: u64,
    /// Packets transmitted.
    pub tx_packets: u64,
    /// Bytes transmitted.
    pub tx_bytes: u64,
}

impl From<BpfStatsValue> for StatsValue {
    fn from(value: BpfStatsValue) -> Self {
        Self::new(value.rx_bytes, value.rx_packets, value.tx_bytes, value.tx_packets)
    }
}

/// Interface name record keyed by interface index.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfaceValue {
    /// NUL-padded interface name.
    pub name: [u8; IFNAMSIZ],
}

impl IfaceValue {
    /// Returns the name up to the first NUL, if it is valid UTF-8.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        std::ffi::CStr::from_bytes_until_nul(&self.name)
            .ok()
            .and_then(|name| name.to_str().ok())
    }
}

// Pod implementations so aya can copy these out of map lookups.
#[cfg(all(target_os = "linux", feature = "ebpf"))]
mod pod {
    #![allow(unsafe_code)]

    // SAFETY: both types are repr(C), Copy, and valid for any bit pattern.
    unsafe impl aya::Pod for super::BpfStatsValue {}
    // SAFETY: as above.
    unsafe impl aya::Pod for super::IfaceValue {}
}
