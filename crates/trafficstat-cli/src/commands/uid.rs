//! `tstat uid` — untagged counters for one application uid.

use clap::Args;
use trafficstat_runtime::service::NetworkStatsService;

use super::QueryArgs;

/// Arguments for the `uid` command.
#[derive(Args, Debug)]
pub struct UidArgs {
    /// Application uid.
    #[arg(allow_negative_numbers = true)]
    pub uid: i32,

    /// Output options.
    #[command(flatten)]
    pub query: QueryArgs,
}

/// Executes the `uid` command.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn execute(service: &impl NetworkStatsService, args: &UidArgs) -> anyhow::Result<()> {
    let key = format!("uid:{}", args.uid);
    args.query
        .report(&key, |field| service.get_uid_stat(args.uid, field))
}
