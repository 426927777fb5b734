//! Document assembly: export -> textual manifest blocks.

use anyhow::{Context, Result};

use crate::chart::Export;

/// Literal YAML document separator used to join blocks.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Returns the synthesized manifest for a namespace.
///
/// The name goes into both `metadata.name` and `metadata.labels.name`.
pub fn namespace_manifest(name: &str) -> String {
    format!(
        "\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: {name}\n  labels:\n    name: {name}\n"
    )
}

/// Serialized manifest blocks for one render.
///
/// Component blocks keep export order. The namespace block is kept apart so
/// each mode can place it: appended for the preview, applied on its own pass
/// for cluster apply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssembledContent {
    blocks: Vec<String>,
    namespace: Option<String>,
}

impl AssembledContent {
    /// Serializes every non-null component and synthesizes the namespace block.
    pub fn from_export(export: &Export) -> Result<Self> {
        let blocks = export
            .documents()
            .enumerate()
            .map(|(idx, doc)| {
                serde_yaml::to_string(doc)
                    .with_context(|| format!("Failed to serialize component #{idx}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            blocks,
            namespace: export.namespace().map(namespace_manifest),
        })
    }

    /// Component blocks in export order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// The synthesized namespace block, if the export declared a valid namespace.
    pub fn namespace_block(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Component blocks joined into one text (no namespace block).
    pub fn joined(&self) -> String {
        join(self.blocks.iter().map(String::as_str))
    }

    /// Component blocks followed by the namespace block, for preview.
    pub fn joined_with_namespace(&self) -> String {
        join(
            self.blocks
                .iter()
                .map(String::as_str)
                .chain(self.namespace_block()),
        )
    }
}

/// Joins blocks behind a leading empty block, so a non-empty set starts with
/// a separator and an empty set yields an empty string.
fn join<'a>(blocks: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(DOCUMENT_SEPARATOR);
        out.push_str(block);
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_yaml::Value;

    use super::*;

    fn config_map(name: &str) -> Value {
        serde_yaml::from_str(&format!("kind: ConfigMap\nmetadata:\n  name: {name}\n")).unwrap()
    }

    #[test]
    fn test_namespace_manifest_substitutes_both_fields() {
        let manifest = namespace_manifest("demo");
        assert_eq!(
            manifest,
            "\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: demo\n  labels:\n    name: demo\n"
        );
    }

    #[test]
    fn test_all_null_components_produce_no_blocks() {
        let export = Export::new(vec![None, None, None], Some("demo".into()));
        let content = AssembledContent::from_export(&export).unwrap();

        assert!(content.blocks().is_empty());
        assert_eq!(content.joined(), "");
        assert_eq!(content.namespace_block(), Some(namespace_manifest("demo").as_str()));
    }

    #[test]
    fn test_blocks_keep_export_order() {
        let export = Export::new(
            vec![Some(config_map("a")), None, Some(config_map("b")), Some(config_map("c"))],
            None,
        );
        let content = AssembledContent::from_export(&export).unwrap();

        assert_eq!(content.blocks().len(), 3);
        let joined = content.joined();
        let parts: Vec<&str> = joined.split(DOCUMENT_SEPARATOR).collect();
        // Leading empty block comes first.
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "");
        assert!(parts[1].contains("name: a"));
        assert!(parts[2].contains("name: b"));
        assert!(parts[3].contains("name: c"));
    }

    #[test]
    fn test_block_count_matches_non_null_components() {
        for n in [0usize, 1, 2, 7] {
            let components = (0..n).map(|i| Some(config_map(&format!("cm{i}")))).collect();
            let content = AssembledContent::from_export(&Export::new(components, None)).unwrap();
            assert_eq!(content.blocks().len(), n);
            assert_eq!(content.joined().matches(DOCUMENT_SEPARATOR).count(), n);
        }
    }

    #[test]
    fn test_invalid_namespace_yields_no_block() {
        let export = Export::new(vec![Some(config_map("a"))], Some(String::new()));
        let content = AssembledContent::from_export(&export).unwrap();

        assert_eq!(content.namespace_block(), None);
        assert_eq!(content.joined_with_namespace(), content.joined());
    }

    #[test]
    fn test_preview_appends_namespace_block() {
        let export = Export::new(vec![Some(config_map("a"))], Some("demo".into()));
        let content = AssembledContent::from_export(&export).unwrap();

        let preview = content.joined_with_namespace();
        assert!(preview.starts_with(&content.joined()));
        assert!(preview.ends_with(&namespace_manifest("demo")));
        assert!(!content.joined().contains("kind: Namespace"));
    }
}
