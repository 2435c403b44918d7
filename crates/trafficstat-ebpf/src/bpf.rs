//! Counter source reading the maps pinned by the accounting programs.
//!
//! Maps are opened per query and dropped before returning, so a missing
//! or replaced pin is picked up on the next call.

use std::path::{Path, PathBuf};

use trafficstat_common::config::TrafficStatConfig;
use trafficstat_common::constants;
use trafficstat_common::error::Result;
use trafficstat_common::types::{StatsKey, StatsValue};

use crate::programs::stats::BpfStatsValue;
use crate::source::CounterSource;

/// Counter source over `map_netd_*` maps under a pin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BpfCounterSource {
    pin_dir: PathBuf,
}

impl BpfCounterSource {
    /// Creates a source reading maps pinned under `pin_dir`.
    #[must_use]
    pub fn new(pin_dir: impl Into<PathBuf>) -> Self {
        Self {
            pin_dir: pin_dir.into(),
        }
    }

    /// Creates a source for the pin directory named in `config`.
    #[must_use]
    pub fn from_config(config: &TrafficStatConfig) -> Self {
        Self::new(&config.bpf_pin_dir)
    }

    /// Returns the pin path of map `name`.
    #[must_use]
    pub fn map_path(&self, name: &str) -> PathBuf {
        self.pin_dir.join(name)
    }

    /// Returns the pin directory.
    #[must_use]
    pub fn pin_dir(&self) -> &Path {
        &self.pin_dir
    }
}

impl Default for BpfCounterSource {
    fn default() -> Self {
        Self::new(constants::BPF_PIN_DIR)
    }
}

/// Sums interface entries whose index resolves to a name.
///
/// Entries without a name mapping are left out of every sum, including the
/// unfiltered total. Returns the sum and the byte count that was left out.
pub fn sum_iface_entries<I, F>(entries: I, iface: Option<&str>, mut name_of: F) -> (StatsValue, u64)
where
    I: IntoIterator<Item = (u32, BpfStatsValue)>,
    F: FnMut(u32) -> Option<String>,
{
    let mut total = StatsValue::default();
    let mut unnamed_bytes = 0u64;
    for (index, value) in entries {
        let Some(name) = name_of(index) else {
            unnamed_bytes = unnamed_bytes
                .wrapping_add(value.rx_bytes)
                .wrapping_add(value.tx_bytes);
            continue;
        };
        if iface.is_none_or(|wanted| wanted == name) {
            total.accumulate(&StatsValue::from(value));
        }
    }
    (total, unnamed_bytes)
}

#[cfg(all(target_os = "linux", feature = "ebpf"))]
mod pinned {
    use std::path::Path;

    use aya::Pod;
    use aya::maps::{HashMap, Map, MapData, MapError};
    use trafficstat_common::constants;
    use trafficstat_common::error::{Result, TrafficStatError};
    use trafficstat_common::types::{StatsKey, StatsValue};

    use super::{BpfCounterSource, sum_iface_entries};
    use crate::programs::stats::{BpfStatsValue, IfaceValue};

    fn open_hash<K: Pod, V: Pod>(path: &Path) -> std::result::Result<HashMap<MapData, K, V>, MapError> {
        let data = MapData::from_pin(path)?;
        HashMap::try_from(Map::HashMap(data))
    }

    fn unavailable(key: &StatsKey, path: &Path, err: &MapError) -> TrafficStatError {
        TrafficStatError::unavailable(key, format!("{}: {err}", path.display()))
    }

    impl BpfCounterSource {
        fn open<K: Pod, V: Pod>(&self, key: &StatsKey, name: &str) -> Result<HashMap<MapData, K, V>> {
            let path = self.map_path(name);
            open_hash(&path).map_err(|e| unavailable(key, &path, &e))
        }

        fn lookup(&self, key: &StatsKey, map_name: &str, index: u32) -> Result<StatsValue> {
            let map = self.open::<u32, BpfStatsValue>(key, map_name)?;
            map.get(&index, 0)
                .map(StatsValue::from)
                .map_err(|e| unavailable(key, &self.map_path(map_name), &e))
        }

        fn iface_sum(&self, key: &StatsKey, iface: Option<&str>) -> Result<StatsValue> {
            let stats_map = self.open::<u32, BpfStatsValue>(key, constants::IFACE_STATS_MAP)?;
            let name_map = self.open::<u32, IfaceValue>(key, constants::IFACE_INDEX_NAME_MAP)?;

            let entries = stats_map
                .iter()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| unavailable(key, &self.map_path(constants::IFACE_STATS_MAP), &e))?;

            let (total, unnamed_bytes) = sum_iface_entries(entries, iface, |index| {
                name_map
                    .get(&index, 0)
                    .ok()
                    .and_then(|value| value.name().map(str::to_owned))
            });
            if unnamed_bytes > 0 {
                tracing::debug!(%key, unnamed_bytes, "skipped interface entries without a name");
            }
            Ok(total)
        }
    }

    pub(super) fn stats(source: &BpfCounterSource, key: &StatsKey) -> Result<StatsValue> {
        match key {
            StatsKey::Total => source.iface_sum(key, None),
            StatsKey::Iface(name) => source.iface_sum(key, Some(name)),
            StatsKey::IfIndex(index) => source.lookup(key, constants::IFACE_STATS_MAP, *index),
            StatsKey::Uid(uid) => source.lookup(key, constants::APP_UID_STATS_MAP, *uid),
        }
    }
}

#[cfg(all(target_os = "linux", feature = "ebpf"))]
impl CounterSource for BpfCounterSource {
    fn stats(&self, key: &StatsKey) -> Result<StatsValue> {
        pinned::stats(self, key)
    }

    fn name(&self) -> &'static str {
        "bpf"
    }
}

#[cfg(not(all(target_os = "linux", feature = "ebpf")))]
impl CounterSource for BpfCounterSource {
    /// Stub for builds without the `ebpf` feature or off Linux.
    fn stats(&self, key: &StatsKey) -> Result<StatsValue> {
        Err(trafficstat_common::error::TrafficStatError::unavailable(
            key,
            "built without BPF support",
        ))
    }

    fn name(&self) -> &'static str {
        "bpf"
    }
}
