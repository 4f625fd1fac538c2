//! Terraform resource names for Kubernetes objects.

use crate::error::{NameError, NameErrorReason};
use crate::manifest::Manifest;
use std::fmt;

/// Namespace used when an object does not set one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Prefix joined onto namespaces that start with a digit.
const NUMERIC_NAMESPACE_PREFIX: &str = "n";

/// A resource name that has passed HCL identifier validation.
///
/// Only [`generate_resource_name`] produces these, so a document can never
/// receive a block labelled with an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive `<namespace>_<apiVersion>_<kind>_<name>` with `/` replaced by `-`.
///
/// An empty namespace becomes `default`; a namespace starting with a digit is
/// prefixed with `n_` since identifiers cannot start with a number.
pub fn generate_resource_name(manifest: &Manifest) -> Result<ResourceName, NameError> {
    let namespace = match manifest.namespace() {
        "" => DEFAULT_NAMESPACE.to_string(),
        ns if ns.starts_with(|c: char| c.is_ascii_digit()) => {
            format!("{NUMERIC_NAMESPACE_PREFIX}_{ns}")
        }
        ns => ns.to_string(),
    };

    let identifier = [
        namespace.as_str(),
        manifest.api_version(),
        manifest.kind(),
        manifest.name(),
    ]
    .join("_")
    .replace('/', "-");

    let reason = if manifest.name().is_empty() {
        Some(NameErrorReason::MissingName)
    } else if hcl::Identifier::new(identifier.as_str()).is_err() {
        Some(NameErrorReason::InvalidIdentifier)
    } else {
        None
    };

    match reason {
        None => Ok(ResourceName(identifier)),
        Some(reason) => Err(NameError {
            identifier,
            namespace: manifest.namespace().to_string(),
            kind: manifest.kind().to_string(),
            name: manifest.name().to_string(),
            reason,
            file: None,
        }),
    }
}
