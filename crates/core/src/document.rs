use std::fmt;
use std::fs;
use std::path::Path as FsPath;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::direction::FlowDirection;
use crate::error::{InputKind, Result, ScreeningError};
use crate::lenient::{lenient_i64, null_as_default};
use crate::tag::Tag;

/// Root graph document written by the acquisition step.
///
/// Only the fields the screening engine reads are modelled; acquisition
/// metadata (`hops_requested`, `timestamp`, ...) is ignored on input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chain: String,
    /// The investigated address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub graph_data: GraphData,
}

impl GraphDocument {
    /// Read and parse a graph document from disk.
    pub fn load(path: &FsPath) -> Result<Self> {
        read_json(InputKind::Graph, path)
    }

    pub fn paths(&self) -> &[Path] {
        &self.graph_data.data.paths
    }

    /// The target address's own tags.
    pub fn target_tags(&self) -> &[Tag] {
        &self.graph_data.data.tags
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: GraphPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub paths: Vec<Path>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// One directed traversal through the target.
///
/// Inflow paths are ordered `[source, ..., target]`, outflow paths
/// `[target, ..., destination]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    /// Raw provider direction code. Missing means inflow; an explicit `null`
    /// or a non-numeric value is kept as an unrecognised code.
    #[serde(default = "default_direction_code", deserialize_with = "direction_code")]
    pub direction: i64,
    #[serde(rename = "path", default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
}

impl Path {
    pub fn flow(&self) -> Option<FlowDirection> {
        FlowDirection::from_code(self.direction)
    }
}

/// Direction code that maps to no [`FlowDirection`].
pub const UNKNOWN_DIRECTION_CODE: i64 = 0;

fn default_direction_code() -> i64 {
    FlowDirection::Inflow.code()
}

fn direction_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.unwrap_or(UNKNOWN_DIRECTION_CODE))
}

/// One address visited along a path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

impl Node {
    /// Address used as the aggregation key; empty when the provider omitted it.
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }
}

/// Transferred value on the hop into a node, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// Read a JSON input file, mapping a missing file and bad JSON to distinct errors.
pub fn read_json<T: DeserializeOwned>(kind: InputKind, path: &FsPath) -> Result<T> {
    if !path.is_file() {
        return Err(ScreeningError::InputNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| ScreeningError::MalformedInput {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON through a sibling temp file and a rename, so
/// readers never observe a partial document. Missing parent directories are created.
pub fn write_json_atomic<T: Serialize>(path: &FsPath, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| ScreeningError::Serialize(e.to_string()))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "wrote json document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_provider_document() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "chain": "Tron",
            "address": "TTarget",
            "hops_requested": { "inflow": 3, "outflow": 3 },
            "graph_data": {
                "code": 0,
                "data": {
                    "tags": [{ "primary_category": "Exchange", "priority": 3 }],
                    "paths": [
                        {
                            "direction": 1,
                            "path": [
                                { "address": "TTarget", "amount": null, "deep": 0 },
                                { "address": "TX", "amount": 1500.25, "tags": null }
                            ]
                        },
                        { "path": [] }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(doc.chain, "Tron");
        assert_eq!(doc.target_tags().len(), 1);
        assert_eq!(doc.paths().len(), 2);
        assert_eq!(doc.paths()[0].flow(), Some(FlowDirection::Outflow));
        assert_eq!(doc.paths()[1].flow(), Some(FlowDirection::Inflow));
        let x = &doc.paths()[0].nodes[1];
        assert_eq!(x.address(), "TX");
        assert_eq!(x.amount.as_ref().map(|a| a.to_string()).as_deref(), Some("1500.25"));
        assert!(x.tags.is_empty());
    }

    #[test]
    fn null_or_garbage_direction_is_unrecognised() {
        let paths: Vec<Path> = serde_json::from_value(json!([
            { "direction": null, "path": [] },
            { "direction": "sideways", "path": [] },
            { "direction": "1", "path": [] },
            { "path": [] }
        ]))
        .unwrap();

        assert_eq!(paths[0].direction, UNKNOWN_DIRECTION_CODE);
        assert_eq!(paths[0].flow(), None);
        assert_eq!(paths[1].flow(), None);
        assert_eq!(paths[2].flow(), Some(FlowDirection::Outflow));
        assert_eq!(paths[3].flow(), Some(FlowDirection::Inflow));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let doc: GraphDocument = serde_json::from_value(json!({ "address": "A" })).unwrap();
        assert!(doc.paths().is_empty());
        assert!(doc.target_tags().is_empty());

        let doc: GraphDocument =
            serde_json::from_value(json!({ "address": "A", "graph_data": { "data": null } })).unwrap();
        assert!(doc.paths().is_empty());
    }

    #[test]
    fn amount_renders_text_verbatim() {
        let node: Node = serde_json::from_value(json!({ "amount": "12.5" })).unwrap();
        assert_eq!(node.amount.unwrap().to_string(), "12.5");
        let node: Node = serde_json::from_value(json!({ "amount": 7 })).unwrap();
        assert_eq!(node.amount.unwrap().to_string(), "7");
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.json");
        let err = GraphDocument::load(&missing).unwrap_err();
        assert!(matches!(err, ScreeningError::InputNotFound { kind: InputKind::Graph, .. }));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = GraphDocument::load(&broken).unwrap_err();
        assert!(matches!(err, ScreeningError::MalformedInput { kind: InputKind::Graph, .. }));
    }

    #[test]
    fn atomic_write_creates_parents_and_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.json");
        write_json_atomic(&path, &json!({ "label": "赌博" })).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("赌博"));
        assert!(!dir.path().join("a").join("b.json.tmp").exists());
    }
}
