//! `tstat trace-init` — initialize network packet tracing.

use trafficstat_runtime::service::NetworkStatsService;

/// Executes the `trace-init` command.
///
/// Initialization problems are logged by the tracer, never returned.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(service: &impl NetworkStatsService) -> anyhow::Result<()> {
    service.init_network_tracing();
    tracing::info!("network tracing init requested");
    Ok(())
}
