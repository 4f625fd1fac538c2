//! How a manifest's content is embedded in its resource block.

use crate::error::SerializationError;
use crate::manifest::Manifest;
use hcl::expr::{Expression, FuncCall, Heredoc, TemplateExpr};
use hcl::Identifier;
use serde_yaml::{Mapping, Value};

/// Delimiter used for inline heredocs unless configured otherwise.
pub const DEFAULT_HEREDOC_DELIMITER: &str = "EOT";

/// Plain scalars a YAML 1.1 reader resolves to booleans or null.
///
/// kubectl decodes manifests as YAML 1.1, so strings spelled like these must
/// stay quoted in inlined content.
const YAML11_RESERVED_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE", "false",
    "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF", "~", "null", "Null", "NULL",
];

/// The value of a resource block's `content` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentExpression {
    /// The object's YAML, emitted as a heredoc.
    Inline(String),
    /// A path read with `file()` relative to the module directory.
    FileReference(String),
}

impl ContentExpression {
    /// Build the HCL expression for this content.
    pub fn into_expression(self, delimiter: &Identifier) -> Expression {
        match self {
            ContentExpression::Inline(yaml) => {
                let template = escape_template(&yaml);
                let heredoc = Heredoc::new(free_delimiter(&template, delimiter), template);
                Expression::TemplateExpr(Box::new(TemplateExpr::Heredoc(heredoc)))
            }
            ContentExpression::FileReference(path) => {
                let call = FuncCall::builder(Identifier::unchecked("file"))
                    .arg(Expression::TemplateExpr(Box::new(TemplateExpr::QuotedString(
                        module_path(&path),
                    ))))
                    .build();
                Expression::FuncCall(Box::new(call))
            }
        }
    }
}

/// Serialize the whole object back to YAML.
///
/// The returned text always ends with a newline and carries every field of
/// the input document. Strings that a YAML 1.1 reader would take for a
/// boolean or null are single-quoted.
pub fn encode_inline(manifest: &Manifest) -> Result<String, SerializationError> {
    let to_yaml = |value: &Value| {
        serde_yaml::to_string(value).map_err(|source| SerializationError {
            name: manifest.name().to_string(),
            source,
        })
    };

    let fields = Value::Mapping(manifest.as_mapping().clone());
    let plain = to_yaml(&fields)?;

    // serde_yaml picks scalar styles itself, so reserved words are swapped for
    // unique plain placeholders and quoted in the emitted text afterwards.
    let prefix = (0..)
        .map(|n| format!("rawk8stfc_q{n}_"))
        .find(|prefix| !plain.contains(prefix.as_str()))
        .unwrap_or_default();
    let mut quoted = Vec::new();
    let masked = mask_reserved(fields, &prefix, &mut quoted);

    let mut yaml = if quoted.is_empty() {
        plain
    } else {
        let mut yaml = to_yaml(&masked)?;
        for (index, word) in quoted.iter().enumerate() {
            yaml = yaml.replacen(&placeholder(&prefix, index), &format!("'{word}'"), 1);
        }
        yaml
    };
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(yaml)
}

fn placeholder(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}_")
}

fn mask_reserved(value: Value, prefix: &str, quoted: &mut Vec<String>) -> Value {
    match value {
        Value::String(s) if YAML11_RESERVED_WORDS.contains(&s.as_str()) => {
            let masked = placeholder(prefix, quoted.len());
            quoted.push(s);
            Value::String(masked)
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| mask_reserved(item, prefix, quoted))
                .collect(),
        ),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| {
                    let k = mask_reserved(k, prefix, quoted);
                    (k, mask_reserved(v, prefix, quoted))
                })
                .collect::<Mapping>(),
        ),
        Value::Tagged(mut tagged) => {
            tagged.value = mask_reserved(tagged.value, prefix, quoted);
            Value::Tagged(tagged)
        }
        other => other,
    }
}

/// Render `file("${path.module}/<relative_path>")`.
pub fn encode_file_reference(relative_path: &str) -> String {
    format!("file(\"{}\")", module_path(relative_path))
}

fn module_path(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);
    format!("${{path.module}}/{}", escape_template(trimmed).replace('"', "\\\""))
}

/// The configured delimiter, or the first `<delimiter><n>` that no line of
/// `text` matches. HCL closes a heredoc at any line holding only its marker.
fn free_delimiter(text: &str, delimiter: &Identifier) -> Identifier {
    let collides = |candidate: &str| text.lines().any(|line| line.trim() == candidate);
    if !collides(delimiter.as_str()) {
        return delimiter.clone();
    }
    (1..)
        .map(|n| format!("{}{n}", delimiter.as_str()))
        .find(|candidate| !collides(candidate))
        .map(Identifier::unchecked)
        .unwrap_or_else(|| delimiter.clone())
}

/// Escape template sequences so manifest text is taken literally.
fn escape_template(text: &str) -> String {
    text.replace("${", "$${").replace("%{", "%%{")
}
