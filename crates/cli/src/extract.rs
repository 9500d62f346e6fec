//! `extract`: screen a saved graph file and write the evidence bundle.

use std::path::{Path, PathBuf};

use aml_core::{GraphDocument, Result, ScreeningConfig};
use aml_graph::{output_path, screen, write_report, ScreenOptions, ScreeningReport};
use aml_rules::RuleSet;

use crate::cli::ExtractArgs;
use crate::status::SuccessLine;

/// Fully resolved inputs for one extraction.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub graph: PathBuf,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
    pub options: ScreenOptions,
}

impl ExtractJob {
    /// Flags win over config defaults.
    pub fn resolve(args: &ExtractArgs, config: &ScreeningConfig) -> Self {
        Self {
            graph: args.graph.clone(),
            rules: args.rules.clone().unwrap_or_else(|| config.rules_path.clone()),
            output_dir: args.output_dir.clone().unwrap_or_else(|| config.output_dir.clone()),
            options: ScreenOptions {
                max_depth: args.max_depth.unwrap_or(config.max_depth) as usize,
                scenario: args.scenario.unwrap_or(config.scenario),
            },
        }
    }

    /// Load both inputs, screen, and write the report. Returns the report path.
    pub fn run(&self) -> Result<(PathBuf, ScreeningReport)> {
        let document = GraphDocument::load(&self.graph)?;
        let rules = RuleSet::load(&self.rules)?;
        let report = screen(&document, &rules, self.options);

        let path = output_path(&self.output_dir, &self.graph);
        write_report(&report, &path)?;
        Ok((path, report))
    }
}

pub fn extract(args: &ExtractArgs, config: &ScreeningConfig) -> Result<SuccessLine> {
    let (path, report) = ExtractJob::resolve(args, config).run()?;
    Ok(SuccessLine::new(&path, &report))
}

/// Convenience for `run`, which screens a graph it has just saved.
pub fn extract_saved(graph: &Path, rules: &Path, output_dir: &Path, options: ScreenOptions) -> Result<(PathBuf, ScreeningReport)> {
    ExtractJob {
        graph: graph.to_path_buf(),
        rules: rules.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        options,
    }
    .run()
}
