use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use aml_core::{Scenario, TraceDirection};
use aml_provider::Chain;

/// Address screening against AML risk rules.
///
/// Fetches a transaction risk graph for a blockchain address, walks it against
/// a rule document and writes a compact evidence bundle for review.
#[derive(Parser, Debug)]
#[command(name = "aml-screen", version, about = "AML address screening: risk-path extraction")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract risk paths from a saved graph file. Prints a one-line JSON status.
    Extract(ExtractArgs),

    /// Validate a rule document against the authoring schema
    Validate(ValidateArgs),

    /// Fetch a raw risk graph from the provider and save it
    Fetch(FetchArgs),

    /// Fetch, then extract, in one go
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to a raw_graph JSON file
    #[arg(long)]
    pub graph: PathBuf,

    /// Rule document (default: AML_RULES_PATH or ./rules.json)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Maximum hop depth to consider (default: AML_MAX_DEPTH or 5)
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Business scenario: onboarding, deposit, withdrawal, cdd, monitoring, all
    #[arg(long)]
    pub scenario: Option<Scenario>,

    /// Output directory (default: AML_OUTPUT_DIR or ./graph_data)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Rule document (default: AML_RULES_PATH or ./rules.json)
    pub rules: Option<PathBuf>,

    /// Markdown label table used to check tag values (default: AML_LABELS_PATH)
    #[arg(long)]
    pub labels: Option<PathBuf>,
}

/// Investigation parameters shared by `fetch` and `run`.
#[derive(Args, Debug, Clone)]
pub struct TraceArgs {
    /// Blockchain network: Tron, Ethereum, Bitcoin, Solana
    pub chain: Chain,

    /// Address to investigate
    pub address: String,

    /// Trace direction: inflow, outflow, all
    #[arg(long)]
    pub direction: Option<TraceDirection>,

    /// Inflow hop depth
    #[arg(long, default_value_t = 3)]
    pub inflow_hops: u32,

    /// Outflow hop depth
    #[arg(long, default_value_t = 3)]
    pub outflow_hops: u32,

    /// Max nodes per hop
    #[arg(long, default_value_t = 100)]
    pub max_nodes: u32,

    /// Min timestamp (ms)
    #[arg(long)]
    pub min_timestamp: Option<i64>,

    /// Max timestamp (ms)
    #[arg(long)]
    pub max_timestamp: Option<i64>,

    /// TrustIn API key (default: TRUSTIN_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Output directory (default: AML_OUTPUT_DIR or ./graph_data)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub trace: TraceArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub trace: TraceArgs,

    /// Business scenario; also picks the trace direction when --direction is omitted
    #[arg(long)]
    pub scenario: Option<Scenario>,

    /// Rule document (default: AML_RULES_PATH or ./rules.json)
    #[arg(long, alias = "rules-config")]
    pub rules: Option<PathBuf>,

    /// Sets both hop depths at once (superseded by --inflow-hops/--outflow-hops)
    #[arg(long, hide = true)]
    pub max_depth: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("aml-screen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn extract_flags() {
        let args = parse(&["extract", "--graph", "g.json", "--scenario", "withdrawal", "--max-depth", "3"]);
        let Command::Extract(extract) = args.command else {
            panic!("expected extract");
        };
        assert_eq!(extract.graph, PathBuf::from("g.json"));
        assert_eq!(extract.scenario, Some(Scenario::Withdrawal));
        assert_eq!(extract.max_depth, Some(3));
        assert!(extract.rules.is_none());
    }

    #[test]
    fn run_defaults_and_chain_parsing() {
        let args = parse(&["run", "tron", "TXyz", "--scenario", "cdd", "--rules-config", "r.json"]);
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.trace.chain, Chain::Tron);
        assert_eq!(run.trace.inflow_hops, 3);
        assert_eq!(run.trace.max_nodes, 100);
        assert!(run.trace.direction.is_none());
        assert_eq!(run.rules, Some(PathBuf::from("r.json")));
    }

    #[test]
    fn rejects_unknown_chain_and_scenario() {
        let bad_chain = ["aml-screen", "fetch", "Dogecoin", "D123"];
        assert!(CliArgs::try_parse_from(bad_chain).is_err());
        let bad_scenario = ["aml-screen", "extract", "--graph", "g.json", "--scenario", "payroll"];
        assert!(CliArgs::try_parse_from(bad_scenario).is_err());
    }
}
