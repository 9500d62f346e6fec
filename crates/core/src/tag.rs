use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lenient::lenient_i64;

/// Priority assigned to tags whose `priority` is missing or unparseable.
pub const DEFAULT_TAG_PRIORITY: i64 = 9999;

/// A risk classification attached to an address by the intelligence provider.
///
/// Categories run from broad (`primary`) to most specific (`quaternary`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub primary_category: Option<String>,
    #[serde(default)]
    pub secondary_category: Option<String>,
    #[serde(default)]
    pub tertiary_category: Option<String>,
    #[serde(default)]
    pub quaternary_category: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub priority: Option<i64>,
}

impl Tag {
    /// Effective priority; lower is more important.
    pub fn priority(&self) -> i64 {
        self.priority.unwrap_or(DEFAULT_TAG_PRIORITY)
    }

    pub fn dimension(&self, dimension: TagDimension) -> Option<&str> {
        let value = match dimension {
            TagDimension::PrimaryCategory => &self.primary_category,
            TagDimension::SecondaryCategory => &self.secondary_category,
            TagDimension::TertiaryCategory => &self.tertiary_category,
            TagDimension::QuaternaryCategory => &self.quaternary_category,
            TagDimension::RiskLevel => &self.risk_level,
        };
        value.as_deref()
    }

    /// The most specific non-empty category, used as a human-readable label.
    pub fn label(&self) -> Option<&str> {
        [
            &self.quaternary_category,
            &self.tertiary_category,
            &self.secondary_category,
            &self.primary_category,
        ]
        .into_iter()
        .filter_map(|c| c.as_deref())
        .find(|c| !c.is_empty())
    }
}

/// A field of a [`Tag`] that rule conditions can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagDimension {
    PrimaryCategory,
    SecondaryCategory,
    TertiaryCategory,
    QuaternaryCategory,
    RiskLevel,
}

impl TagDimension {
    pub const ALL: [TagDimension; 5] = [
        TagDimension::PrimaryCategory,
        TagDimension::SecondaryCategory,
        TagDimension::TertiaryCategory,
        TagDimension::QuaternaryCategory,
        TagDimension::RiskLevel,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            TagDimension::PrimaryCategory => "primary_category",
            TagDimension::SecondaryCategory => "secondary_category",
            TagDimension::TertiaryCategory => "tertiary_category",
            TagDimension::QuaternaryCategory => "quaternary_category",
            TagDimension::RiskLevel => "risk_level",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.field_name() == name)
    }
}

impl fmt::Display for TagDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Flattened copy of a tag for output documents. Missing fields become `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSnapshot {
    pub primary_category: String,
    pub secondary_category: String,
    pub tertiary_category: String,
    pub quaternary_category: String,
    pub risk_level: String,
}

impl From<&Tag> for TagSnapshot {
    fn from(tag: &Tag) -> Self {
        let field = |d| tag.dimension(d).unwrap_or_default().to_string();
        Self {
            primary_category: field(TagDimension::PrimaryCategory),
            secondary_category: field(TagDimension::SecondaryCategory),
            tertiary_category: field(TagDimension::TertiaryCategory),
            quaternary_category: field(TagDimension::QuaternaryCategory),
            risk_level: field(TagDimension::RiskLevel),
        }
    }
}
