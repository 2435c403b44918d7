//! Domain primitive types used across the trafficstat workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value returned across the query boundary when no counter is available.
///
/// This is the all-ones bit pattern read as a signed 64-bit integer. A real
/// counter equal to `u64::MAX` encodes to the same value and cannot be told
/// apart from a failed query.
pub const UNKNOWN: i64 = -1;

/// Traffic counters for one query.
///
/// Created zeroed, then filled either by a single backend lookup or by
/// accumulating matching rows of a legacy table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsValue {
    /// Bytes received.
    pub rx_bytes: u64,
    /// Packets received.
    pub rx_packets: u64,
    /// Bytes transmitted.
    pub tx_bytes: u64,
    /// Packets transmitted.
    pub tx_packets: u64,
}

impl StatsValue {
    /// Creates a value from the four counters.
    #[must_use]
    pub const fn new(rx_bytes: u64, rx_packets: u64, tx_bytes: u64, tx_packets: u64) -> Self {
        Self {
            rx_bytes,
            rx_packets,
            tx_bytes,
            tx_packets,
        }
    }

    /// Adds `other` into `self` field by field.
    ///
    /// Kernel counters are modular, so the sums wrap rather than saturate.
    pub const fn accumulate(&mut self, other: &Self) {
        self.rx_bytes = self.rx_bytes.wrapping_add(other.rx_bytes);
        self.rx_packets = self.rx_packets.wrapping_add(other.rx_packets);
        self.tx_bytes = self.tx_bytes.wrapping_add(other.tx_bytes);
        self.tx_packets = self.tx_packets.wrapping_add(other.tx_packets);
    }

    /// Returns the counter selected by `field`.
    #[must_use]
    pub const fn field(&self, field: StatField) -> u64 {
        match field {
            StatField::RxBytes => self.rx_bytes,
            StatField::RxPackets => self.rx_packets,
            StatField::TxBytes => self.tx_bytes,
            StatField::TxPackets => self.tx_packets,
        }
    }
}

/// Selects which counter of a [`StatsValue`] a query returns.
///
/// The discriminants are the raw selectors used on the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StatField {
    /// Bytes received.
    RxBytes = 0,
    /// Packets received.
    RxPackets = 1,
    /// Bytes transmitted.
    TxBytes = 2,
    /// Packets transmitted.
    TxPackets = 3,
}

impl StatField {
    /// All selectors in boundary order.
    pub const ALL: [Self; 4] = [Self::RxBytes, Self::RxPackets, Self::TxBytes, Self::TxPackets];

    /// Decodes a raw boundary selector, returning `None` when out of range.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::RxBytes),
            1 => Some(Self::RxPackets),
            2 => Some(Self::TxBytes),
            3 => Some(Self::TxPackets),
            _ => None,
        }
    }

    /// Returns the raw boundary selector.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RxBytes => write!(f, "rx_bytes"),
            Self::RxPackets => write!(f, "rx_packets"),
            Self::TxBytes => write!(f, "tx_bytes"),
            Self::TxPackets => write!(f, "tx_packets"),
        }
    }
}

/// Key identifying which counters a backend should return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatsKey {
    /// Sum over every interface.
    Total,
    /// A single interface by name.
    Iface(String),
    /// A single interface by kernel index.
    IfIndex(u32),
    /// Untagged traffic of one application uid.
    Uid(u32),
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Iface(name) => write!(f, "iface:{name}"),
            Self::IfIndex(index) => write!(f, "ifindex:{index}"),
            Self::Uid(uid) => write!(f, "uid:{uid}"),
        }
    }
}
