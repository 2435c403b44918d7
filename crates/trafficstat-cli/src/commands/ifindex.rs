//! `tstat ifindex` — counters for one interface by kernel index.

use clap::Args;
use trafficstat_runtime::service::NetworkStatsService;

use super::QueryArgs;

/// Arguments for the `ifindex` command.
#[derive(Args, Debug)]
pub struct IfindexArgs {
    /// Kernel interface index.
    #[arg(allow_negative_numbers = true)]
    pub index: i32,

    /// Output options.
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Executes the `ifindex` command.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn execute(service: &impl NetworkStatsService, args: &IfindexArgs) -> anyhow::Result<()> {
    let key = format!("ifindex:{}", args.index);
    args.query
        .report(&key, |field| service.get_if_index_stat(args.index, field))
}
