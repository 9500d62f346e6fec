//! `fetch` and `run`: acquire a raw graph from the provider, optionally screen it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use aml_core::{Scenario, ScreeningConfig, TraceDirection};
use aml_graph::{ScreenOptions, ScreeningReport};
use aml_provider::{FetchRequest, GraphProvider, ProviderConfig, TrustInClient};

use crate::cli::{FetchArgs, RunArgs, TraceArgs};
use crate::extract::extract_saved;

/// Direction recorded by a bare `fetch` when none is given.
const FETCH_DEFAULT_DIRECTION: TraceDirection = TraceDirection::Inflow;

pub fn build_request(trace: &TraceArgs, direction: TraceDirection) -> FetchRequest {
    FetchRequest {
        chain: trace.chain,
        address: trace.address.clone(),
        direction,
        inflow_hops: trace.inflow_hops,
        outflow_hops: trace.outflow_hops,
        max_nodes_per_hop: trace.max_nodes,
        min_timestamp: trace.min_timestamp,
        max_timestamp: trace.max_timestamp,
    }
}

fn client(trace: &TraceArgs) -> Result<TrustInClient> {
    let config = ProviderConfig::from_env().with_api_key(trace.api_key.clone());
    TrustInClient::new(config).context("cannot create provider client (set TRUSTIN_API_KEY or pass --api-key)")
}

/// Fetch the graph and save it under `output_dir`. Returns the saved path.
pub async fn fetch_and_save<P: GraphProvider + ?Sized>(
    provider: &P,
    request: &FetchRequest,
    output_dir: &Path,
) -> Result<PathBuf> {
    info!(provider = provider.name(), chain = %request.chain, address = %request.address, "fetching graph");
    let fetched = provider
        .fetch_graph(request)
        .await
        .with_context(|| format!("failed to fetch graph for {}", request.address))?;
    let path = fetched.save(output_dir)?;
    Ok(path)
}

// ── fetch ───────────────────────────────────────────────────────────

pub async fn fetch(args: &FetchArgs, config: &ScreeningConfig) -> Result<PathBuf> {
    let trace = &args.trace;
    let request = build_request(trace, trace.direction.unwrap_or(FETCH_DEFAULT_DIRECTION));
    let output_dir = trace.output_dir.clone().unwrap_or_else(|| config.output_dir.clone());

    let provider = client(trace)?;
    let path = fetch_and_save(&provider, &request, &output_dir).await?;
    println!("SUCCESS: Raw Graph JSON saved to: {}", path.display());
    Ok(path)
}

// ── run ─────────────────────────────────────────────────────────────

/// Resolved parameters of a fetch-then-extract run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub request: FetchRequest,
    pub scenario: Scenario,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
}

impl RunPlan {
    /// The scenario picks the trace direction unless `--direction` is given;
    /// the legacy `--max-depth` sets both hop counts.
    pub fn resolve(args: &RunArgs, config: &ScreeningConfig) -> Self {
        let scenario = args.scenario.unwrap_or(config.scenario);
        let direction = args
            .trace
            .direction
            .unwrap_or_else(|| scenario.default_trace_direction());

        let mut request = build_request(&args.trace, direction);
        if let Some(depth) = args.max_depth {
            request.inflow_hops = depth;
            request.outflow_hops = depth;
        }

        Self {
            request,
            scenario,
            rules: args.rules.clone().unwrap_or_else(|| config.rules_path.clone()),
            output_dir: args
                .trace
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
        }
    }

    /// Screening depth follows the deeper of the two requested sides.
    pub fn screen_options(&self) -> ScreenOptions {
        ScreenOptions {
            max_depth: self.request.max_hops() as usize,
            scenario: self.scenario,
        }
    }

    /// Run both stages against `provider`. The rule file is checked before any
    /// network call is made.
    pub async fn execute<P: GraphProvider + ?Sized>(&self, provider: &P) -> Result<(PathBuf, ScreeningReport)> {
        if !self.rules.is_file() {
            bail!("Rules file not found: {}", self.rules.display());
        }

        println!(
            "[1/2] Fetching {} graph for {} (direction: {}, inflow hops: {}, outflow hops: {})",
            self.request.chain,
            self.request.address,
            self.request.direction,
            self.request.inflow_hops,
            self.request.outflow_hops
        );
        let graph = fetch_and_save(provider, &self.request, &self.output_dir).await?;
        println!("      Raw graph saved to: {}", graph.display());

        println!("[2/2] Extracting risk paths (scenario: {})", self.scenario);
        let (output, report) = extract_saved(&graph, &self.rules, &self.output_dir, self.screen_options())?;
        println!(
            "      {} risk entit{} found, {} target self-hit(s), highest severity {}",
            report.count(),
            if report.count() == 1 { "y" } else { "ies" },
            report.target_self_hits(),
            report.summary.highest_severity
        );
        println!("SUCCESS: Risk paths saved to: {}", output.display());
        Ok((output, report))
    }
}

pub async fn run(args: &RunArgs, config: &ScreeningConfig) -> Result<PathBuf> {
    let plan = RunPlan::resolve(args, config);
    if !plan.rules.is_file() {
        bail!("Rules file not found: {}", plan.rules.display());
    }
    let provider = client(&args.trace)?;
    let (output, _) = plan.execute(&provider).await?;
    Ok(output)
}
