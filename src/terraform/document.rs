//! In-memory Terraform document of `k8s_manifest` resource blocks.

use super::content::{ContentExpression, DEFAULT_HEREDOC_DELIMITER};
use super::naming::ResourceName;
use crate::error::{ConfigError, WriteError};
use hcl::{Attribute, Block, Identifier};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Block type of every generated structure.
pub const RESOURCE_BLOCK: &str = "resource";

/// Terraform resource type provided by the k8s provider.
pub const RESOURCE_TYPE: &str = "k8s_manifest";

/// Attribute holding the manifest content.
pub const CONTENT_ATTRIBUTE: &str = "content";

/// Append-only sequence of resource blocks, rendered once at the end.
///
/// [`HclDocument::write_to_path`] consumes the document, so nothing can be
/// appended after it has been written.
#[derive(Debug, Clone)]
pub struct HclDocument {
    blocks: Vec<Block>,
    delimiter: Identifier,
}

impl Default for HclDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HclDocument {
    /// An empty document using the `EOT` heredoc delimiter.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            delimiter: Identifier::unchecked(DEFAULT_HEREDOC_DELIMITER),
        }
    }

    /// An empty document with a custom heredoc delimiter.
    pub fn with_heredoc_delimiter(delimiter: &str) -> Result<Self, ConfigError> {
        let delimiter = Identifier::new(delimiter).map_err(|_| {
            ConfigError::Invalid(format!(
                "heredoc delimiter \"{delimiter}\" is not a valid identifier"
            ))
        })?;
        Ok(Self {
            blocks: Vec::new(),
            delimiter,
        })
    }

    /// Append `resource "k8s_manifest" "<name>" { content = ... }`.
    pub fn append_resource_block(&mut self, name: &ResourceName, content: ContentExpression) {
        let block = Block::builder(RESOURCE_BLOCK)
            .add_label(RESOURCE_TYPE)
            .add_label(name.as_str())
            .add_attribute(Attribute::new(
                CONTENT_ATTRIBUTE,
                content.into_expression(&self.delimiter),
            ))
            .build();
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render every block, each followed by a blank line.
    pub fn render(&self) -> Result<String, WriteError> {
        let mut out = String::new();
        for block in &self.blocks {
            let rendered = hcl::format::to_string(block)?;
            out.push_str(rendered.trim_end_matches('\n'));
            out.push_str("\n\n");
        }
        Ok(out)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteError> {
        self.render().map(String::into_bytes)
    }

    /// Write the rendered document to `path`, replacing any existing file.
    ///
    /// Bytes go to a temporary file next to `path` which is renamed into
    /// place once fully written, so a failed run never leaves partial output.
    pub fn write_to_path(self, path: &Path) -> Result<(), WriteError> {
        let bytes = self.to_bytes()?;
        let io_err = |source: std::io::Error| WriteError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = temp_file_for(path, dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        log::info!("wrote {} resource block(s) to {}", self.blocks.len(), path.display());
        Ok(())
    }
}

/// Temporary file in `dir` whose mode matches what writing `path` directly
/// would give: the existing file's permissions, or `0o666` less the umask.
fn temp_file_for(path: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".rawk8stfc");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::terraform::naming::generate_resource_name;
    use tempfile::TempDir;

    fn name_for(name: &str) -> ResourceName {
        let mut manifest = Manifest::new();
        manifest.set_api_version("apps/v1");
        manifest.set_kind("Deployment");
        manifest.set_name(name);
        manifest.set_namespace("test");
        generate_resource_name(&manifest).unwrap()
    }

    fn parse(rendered: &str) -> hcl::Body {
        hcl::parse(rendered).unwrap()
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        let doc = HclDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.render().unwrap(), "");
    }

    #[test]
    fn test_inline_block_shape() {
        let mut doc = HclDocument::new();
        doc.append_resource_block(&name_for("one"), ContentExpression::Inline("name: one\n".into()));

        let rendered = doc.render().unwrap();
        assert!(rendered.starts_with(r#"resource "k8s_manifest" "test_apps-v1_Deployment_one" {"#));
        assert!(rendered.contains("<<EOT\n"));
        assert!(rendered.contains("name: one\n"));
        assert!(rendered.ends_with("}\n\n"));

        let body = parse(&rendered);
        let blocks: Vec<_> = body.blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].identifier(), RESOURCE_BLOCK);
        assert_eq!(blocks[0].labels().len(), 2);
        assert_eq!(blocks[0].labels()[0].as_str(), RESOURCE_TYPE);
        assert!(blocks[0].body().attributes().any(|a| a.key() == CONTENT_ATTRIBUTE));
    }

    #[test]
    fn test_file_reference_block() {
        let mut doc = HclDocument::new();
        doc.append_resource_block(
            &name_for("another"),
            ContentExpression::FileReference("fake-another.yaml".into()),
        );

        let rendered = doc.render().unwrap();
        assert!(rendered.contains("file("));
        assert!(rendered.contains("${path.module}/fake-another.yaml"));
        parse(&rendered);
    }

    #[test]
    fn test_blocks_keep_append_order_with_blank_lines() {
        let mut doc = HclDocument::new();
        doc.append_resource_block(&name_for("a"), ContentExpression::Inline("name: a\n".into()));
        doc.append_resource_block(&name_for("b"), ContentExpression::Inline("name: b\n".into()));
        assert_eq!(doc.len(), 2);

        let rendered = doc.render().unwrap();
        let a = rendered.find("test_apps-v1_Deployment_a").unwrap();
        let b = rendered.find("test_apps-v1_Deployment_b").unwrap();
        assert!(a < b);
        assert_eq!(rendered.matches("}\n\nresource").count(), 1);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let build = || {
            let mut doc = HclDocument::new();
            doc.append_resource_block(&name_for("x"), ContentExpression::Inline("k: v\n".into()));
            doc.append_resource_block(&name_for("y"), ContentExpression::FileReference("y.yaml".into()));
            doc.to_bytes().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_interpolation_is_escaped_inline() {
        let mut doc = HclDocument::new();
        doc.append_resource_block(&name_for("env"), ContentExpression::Inline("v: ${HOME}\n".into()));
        assert!(doc.render().unwrap().contains("v: $${HOME}"));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut doc = HclDocument::with_heredoc_delimiter("YAML").unwrap();
        doc.append_resource_block(&name_for("c"), ContentExpression::Inline("k: v\n".into()));
        assert!(doc.render().unwrap().contains("<<YAML\n"));
    }

    #[test]
    fn test_invalid_delimiter_is_rejected() {
        assert!(matches!(
            HclDocument::with_heredoc_delimiter("1bad"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_write_to_path_matches_rendered_bytes() {
        for count in 0..3 {
            let dir = TempDir::new().unwrap();
            let out = dir.path().join("main.tf");

            let mut doc = HclDocument::new();
            for i in 0..count {
                doc.append_resource_block(
                    &name_for(&format!("r{i}")),
                    ContentExpression::Inline(format!("name: r{i}\n")),
                );
            }
            let expected = doc.to_bytes().unwrap();
            doc.write_to_path(&out).unwrap();

            assert!(out.is_file());
            assert_eq!(std::fs::read(&out).unwrap(), expected);
        }
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("main.tf");
        std::fs::write(&out, "stale content that is much longer than the new output").unwrap();

        HclDocument::new().write_to_path(&out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("missing").join("main.tf");

        let err = HclDocument::new().write_to_path(&out).unwrap_err();
        match err {
            WriteError::Io { path, .. } => assert_eq!(path, out),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_delimiter_line_in_content_still_parses() {
        let mut doc = HclDocument::new();
        doc.append_resource_block(
            &name_for("script"),
            ContentExpression::Inline("data:\n  run: |\n    echo hi\n    EOT\n    echo after\n".into()),
        );

        let rendered = doc.render().unwrap();
        assert!(rendered.contains("<<EOT1\n"));
        assert!(rendered.contains("    EOT\n    echo after\n"));
        assert_eq!(parse(&rendered).blocks().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_gets_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.tf");
        std::fs::write(&reference, "").unwrap();
        let out = dir.path().join("main.tf");

        HclDocument::new().write_to_path(&out).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&out), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_output_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("main.tf");
        std::fs::write(&out, "old").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o640)).unwrap();

        HclDocument::new().write_to_path(&out).unwrap();

        let mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
