//! Controlled tag-label vocabulary, read from the provider's Markdown label table.
//!
//! The table has the English primary category in the first column and the
//! English secondary category in the third:
//!
//! ```text
//! | Primary (EN) | Primary (CN) | Secondary (EN) | Secondary (CN) | Risk |
//! | :--- | :--- | :--- | :--- | :--- |
//! | Illicit | 非法 | Gambling | 赌博 | high |
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use aml_core::{ConditionValue, InputKind, Result, ScreeningError};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

/// Known primary and secondary category labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelVocabulary {
    primary: BTreeSet<String>,
    secondary: BTreeSet<String>,
}

#[derive(Clone, Copy)]
enum Level {
    Primary,
    Secondary,
}

impl LabelVocabulary {
    /// Parse every Markdown table in `markdown`. Separator rows and the header
    /// row directly above each separator are skipped.
    pub fn parse(markdown: &str) -> Self {
        let mut vocab = Self::default();
        let lines: Vec<&str> = markdown.lines().map(str::trim).collect();

        for (i, line) in lines.iter().enumerate() {
            if !line.starts_with('|') || is_separator(line) {
                continue;
            }
            if lines.get(i + 1).is_some_and(|next| is_separator(next)) {
                continue;
            }
            let cols: Vec<&str> = line.split('|').map(str::trim).collect();
            // Leading and trailing pipes produce empty outer cells.
            if cols.len() < 6 {
                continue;
            }
            if !cols[1].is_empty() {
                vocab.primary.insert(cols[1].to_string());
            }
            if !cols[3].is_empty() {
                vocab.secondary.insert(cols[3].to_string());
            }
        }
        vocab
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ScreeningError::InputNotFound {
                kind: InputKind::Labels,
                path: path.to_path_buf(),
            });
        }
        let vocab = Self::parse(&std::fs::read_to_string(path)?);
        debug!(
            path = %path.display(),
            primary = vocab.primary.len(),
            secondary = vocab.secondary.len(),
            "loaded label vocabulary"
        );
        Ok(vocab)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    pub fn primary_len(&self) -> usize {
        self.primary.len()
    }

    pub fn secondary_len(&self) -> usize {
        self.secondary.len()
    }

    fn level_for(parameter: &str) -> Option<Level> {
        match parameter {
            "path.node.tags.primary_category" | "target.tags.primary_category" => Some(Level::Primary),
            "path.node.tags.secondary_category" | "target.tags.secondary_category" => {
                Some(Level::Secondary)
            }
            _ => None,
        }
    }

    fn labels(&self, level: Level) -> &BTreeSet<String> {
        match level {
            Level::Primary => &self.primary,
            Level::Secondary => &self.secondary,
        }
    }

    /// Check the string values of category conditions in one raw rule.
    pub(crate) fn check_rule(&self, index: usize, rule: &Value, result: &mut ValidationResult) {
        if self.is_empty() {
            return;
        }
        let Some(conditions) = rule.get("conditions").and_then(Value::as_array) else {
            return;
        };

        for (j, cond) in conditions.iter().enumerate() {
            let Some(param) = cond.get("parameter").and_then(Value::as_str) else {
                continue;
            };
            let Some(level) = Self::level_for(param) else {
                continue;
            };
            let known = self.labels(level);
            let candidates: Vec<&str> = known.iter().map(String::as_str).collect();

            let declared: ConditionValue = cond
                .get("value")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default();
            for value in declared.strings().into_iter().filter(|v| !known.contains(*v)) {
                result.error_with_suggestion(
                    format!("[{index}].conditions[{j}].value"),
                    format!("tag value '{value}' not found in label vocabulary for parameter '{param}'"),
                    fuzzy_match(value, &candidates),
                );
            }
        }
    }
}

fn is_separator(line: &str) -> bool {
    line.starts_with('|')
        && line.contains('-')
        && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}
