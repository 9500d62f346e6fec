use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
pub fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

pub fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

pub fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Active profile from `AML_PROFILE`, uppercased (empty = default).
pub fn active_profile() -> String {
    env_or("AML_PROFILE", "").to_uppercase()
}

pub const DEFAULT_MAX_DEPTH: u32 = 5;

// ── Screening config ──────────────────────────────────────────

/// Defaults for a screening run. CLI flags override every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub max_depth: u32,
    pub scenario: Scenario,
    pub rules_path: PathBuf,
    pub output_dir: PathBuf,
    /// Optional label vocabulary used by rule validation.
    pub labels_path: Option<PathBuf>,
}

impl ScreeningConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// When `AML_PROFILE` is set (e.g. `PROD`), every key is first looked up
    /// as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::for_profile(&active_profile())
    }

    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();

        let scenario = match profiled_env_opt(p, "AML_SCENARIO") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring AML_SCENARIO");
                Scenario::All
            }),
            None => Scenario::All,
        };

        Self {
            profile: p.to_string(),
            max_depth: profiled_env_u32(p, "AML_MAX_DEPTH", DEFAULT_MAX_DEPTH),
            scenario,
            rules_path: PathBuf::from(profiled_env_or(p, "AML_RULES_PATH", "rules.json")),
            output_dir: PathBuf::from(profiled_env_or(p, "AML_OUTPUT_DIR", "graph_data")),
            labels_path: profiled_env_opt(p, "AML_LABELS_PATH").map(PathBuf::from),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn log_summary(&self) {
        tracing::debug!(
            profile = self.profile_label(),
            max_depth = self.max_depth,
            scenario = %self.scenario,
            rules = %self.rules_path.display(),
            output_dir = %self.output_dir.display(),
            "screening config loaded"
        );
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            scenario: Scenario::All,
            rules_path: PathBuf::from("rules.json"),
            output_dir: PathBuf::from("graph_data"),
            labels_path: None,
        }
    }
}
