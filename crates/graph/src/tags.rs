//! Per-node tag selection.

use aml_core::Tag;

/// The most important tag of a node: lowest priority wins, ties go to the
/// earliest tag. `None` for an untagged node.
pub fn prioritize_tag(tags: &[Tag]) -> Option<&Tag> {
    tags.iter()
        .enumerate()
        .min_by_key(|(index, tag)| (tag.priority(), *index))
        .map(|(_, tag)| tag)
}
