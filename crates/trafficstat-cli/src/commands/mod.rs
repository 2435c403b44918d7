//! CLI command definitions and dispatch.

pub mod iface;
pub mod ifindex;
pub mod total;
pub mod trace;
pub mod uid;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use trafficstat_common::config::TrafficStatConfig;
use trafficstat_common::types::StatField;
use trafficstat_runtime::service::TrafficStatsService;

use crate::output::{self, Style};

/// tstat — query per-interface and per-uid network traffic counters.
#[derive(Parser, Debug)]
#[command(name = "tstat", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file.
    #[arg(long, global = true, env = "TSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the legacy per-interface table path.
    #[arg(long, global = true)]
    pub iface_stat_path: Option<PathBuf>,

    /// Override the legacy per-uid table path.
    #[arg(long, global = true)]
    pub uid_stat_path: Option<PathBuf>,

    /// Override the BPF map pin directory.
    #[arg(long, global = true)]
    pub bpf_pin_dir: Option<PathBuf>,

    /// Do not read the legacy tables when the BPF maps cannot answer.
    #[arg(long, global = true)]
    pub no_legacy_fallback: bool,
}

impl Cli {
    /// Resolves the effective configuration: file first, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn resolve_config(&self) -> anyhow::Result<TrafficStatConfig> {
        let mut config = match &self.config {
            Some(path) => TrafficStatConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => TrafficStatConfig::default(),
        };
        if let Some(path) = &self.iface_stat_path {
            config.iface_stat_path.clone_from(path);
        }
        if let Some(path) = &self.uid_stat_path {
            config.uid_stat_path.clone_from(path);
        }
        if let Some(path) = &self.bpf_pin_dir {
            config.bpf_pin_dir.clone_from(path);
        }
        if self.no_legacy_fallback {
            config.legacy_fallback = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Counters summed over every interface.
    Total(total::TotalArgs),
    /// Counters for one interface by name.
    Iface(iface::IfaceArgs),
    /// Counters for one interface by kernel index.
    Ifindex(ifindex::IfindexArgs),
    /// Untagged counters for one application uid.
    Uid(uid::UidArgs),
    /// Initialize network packet tracing.
    TraceInit,
}

/// Counter selector accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArg {
    /// Bytes received.
    RxBytes,
    /// Packets received.
    RxPackets,
    /// Bytes transmitted.
    TxBytes,
    /// Packets transmitted.
    TxPackets,
}

impl From<FieldArg> for StatField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::RxBytes => Self::RxBytes,
            FieldArg::RxPackets => Self::RxPackets,
            FieldArg::TxBytes => Self::TxBytes,
            FieldArg::TxPackets => Self::TxPackets,
        }
    }
}

/// Output options shared by every counter query.
#[derive(Args, Debug, Clone, Copy)]
pub struct QueryArgs {
    /// Print only this counter. All four are printed when omitted.
    #[arg(short, long, value_enum)]
    pub field: Option<FieldArg>,

    /// Print machine-readable JSON.
    #[arg(long, conflicts_with = "raw")]
    pub json: bool,

    /// Print byte counters in human-readable units.
    #[arg(short = 'H', long, conflicts_with = "raw")]
    pub human: bool,

    /// Print the values as returned, with `-1` for an unknown counter.
    #[arg(long)]
    pub raw: bool,
}

impl QueryArgs {
    /// Returns the selected fields in boundary order.
    pub fn fields(&self) -> Vec<StatField> {
        self.field
            .map_or_else(|| StatField::ALL.to_vec(), |field| vec![field.into()])
    }

    /// Returns the output style the flags select.
    #[must_use]
    pub const fn style(&self) -> Style {
        if self.raw {
            Style::Raw
        } else if self.json {
            Style::Json
        } else {
            Style::Text { human: self.human }
        }
    }

    /// Runs `query` once per selected field and prints the results.
    ///
    /// # Errors
    ///
    /// Returns an error if the results cannot be written.
    pub fn report(&self, key: &str, query: impl Fn(i32) -> i64) -> anyhow::Result<()> {
        let values: Vec<(StatField, i64)> = self
            .fields()
            .into_iter()
            .map(|field| (field, query(field.as_raw())))
            .collect();
        output::print_values(key, &values, self.style())
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if configuration fails or output cannot be written.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    let service = TrafficStatsService::from_config(&config);
    match cli.command {
        Command::Total(args) => total::execute(&service, &args),
        Command::Iface(args) => iface::execute(&service, &args),
        Command::Ifindex(args) => ifindex::execute(&service, &args),
        Command::Uid(args) => uid::execute(&service, &args),
        Command::TraceInit => trace::execute(&service),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_uid_query_with_field() {
        let cli = Cli::try_parse_from(["tstat", "uid", "1000", "--field", "tx-bytes"])
            .expect("should parse");
        assert!(matches!(
            cli.command,
            Command::Uid(ref args) if args.uid == 1000 && args.query.fields() == vec![StatField::TxBytes]
        ));
    }

    #[test]
    fn omitted_field_selects_all_counters() {
        let cli = Cli::try_parse_from(["tstat", "total"]).expect("should parse");
        assert!(matches!(
            cli.command,
            Command::Total(ref args) if args.query.fields() == StatField::ALL.to_vec()
        ));
    }

    #[test]
    fn flags_override_default_paths() {
        let cli = Cli::try_parse_from([
            "tstat",
            "--uid-stat-path",
            "/tmp/stats",
            "--no-legacy-fallback",
            "trace-init",
        ])
        .expect("should parse");
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.uid_stat_path, PathBuf::from("/tmp/stats"));
        assert!(!config.legacy_fallback);
    }

    #[test]
    fn negative_uid_is_accepted() {
        let cli = Cli::try_parse_from(["tstat", "uid", "-1"]).expect("should parse");
        assert!(matches!(cli.command, Command::Uid(args) if args.uid == -1));
    }

    #[test]
    fn negative_ifindex_is_accepted() {
        let cli = Cli::try_parse_from(["tstat", "ifindex", "-1", "--raw"]).expect("should parse");
        assert!(matches!(
            cli.command,
            Command::Ifindex(ref args) if args.index == -1 && args.query.style() == Style::Raw
        ));
    }

    #[test]
    fn raw_conflicts_with_json() {
        let _ = Cli::try_parse_from(["tstat", "total", "--raw", "--json"]).expect_err("should fail");
    }
}
