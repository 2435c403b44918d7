//! `tstat iface` — counters for one interface by name.

use std::ffi::OsString;

use clap::Args;
use trafficstat_runtime::service::NetworkStatsService;

use super::QueryArgs;

/// Arguments for the `iface` command.
#[derive(Args, Debug)]
pub struct IfaceArgs {
    /// Interface name, e.g. `wlan0`.
    pub name: OsString,

    /// Output options.
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Executes the `iface` command.
///
/// The name is passed through as raw bytes so the service decides whether
/// it is usable.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn execute(service: &impl NetworkStatsService, args: &IfaceArgs) -> anyhow::Result<()> {
    let raw = args.name.as_encoded_bytes();
    let key = format!("iface:{}", args.name.to_string_lossy());
    args.query
        .report(&key, |field| service.get_iface_stat(Some(raw), field))
}
