//! `tstat total` — counters summed over every interface.

use clap::Args;
use trafficstat_runtime::service::NetworkStatsService;

use super::QueryArgs;

/// Arguments for the `total` command.
#[derive(Args, Debug)]
pub struct TotalArgs {
    /// Output options.
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Executes the `total` command.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn execute(service: &impl NetworkStatsService, args: &TotalArgs) -> anyhow::Result<()> {
    args.query.report("total", |field| service.get_total_stat(field))
}
