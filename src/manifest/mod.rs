//! Loosely-typed Kubernetes objects and the loader that decodes them.
//!
//! A [`Manifest`] keeps the complete decoded document so it can be written
//! back out unchanged, and layers typed accessors for the handful of fields
//! needed to name a Terraform resource.

pub mod loader;

pub use loader::{collect_manifest_files, decode_manifests, load_manifests_from_file};

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A single Kubernetes object as an insertion-ordered key/value document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    fields: Mapping,
}

impl Manifest {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a decoded value. Only mappings are Kubernetes objects.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Mapping(fields) => Ok(Self { fields }),
            other => Err(LoadError::InvalidDocument {
                found: value_kind(&other),
            }),
        }
    }

    pub fn api_version(&self) -> &str {
        get_str(self.fields.get("apiVersion"))
    }

    pub fn kind(&self) -> &str {
        get_str(self.fields.get("kind"))
    }

    pub fn name(&self) -> &str {
        get_str(self.metadata().and_then(|m| m.get("name")))
    }

    /// Namespace, or the empty string when unset.
    pub fn namespace(&self) -> &str {
        get_str(self.metadata().and_then(|m| m.get("namespace")))
    }

    pub fn set_api_version(&mut self, api_version: impl Into<String>) {
        self.fields
            .insert("apiVersion".into(), Value::String(api_version.into()));
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.fields.insert("kind".into(), Value::String(kind.into()));
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata_mut()
            .insert("name".into(), Value::String(name.into()));
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.metadata_mut()
            .insert("namespace".into(), Value::String(namespace.into()));
    }

    /// The full underlying document.
    pub fn as_mapping(&self) -> &Mapping {
        &self.fields
    }

    fn metadata(&self) -> Option<&Mapping> {
        self.fields.get("metadata").and_then(Value::as_mapping)
    }

    fn metadata_mut(&mut self) -> &mut Mapping {
        let slot = self
            .fields
            .entry("metadata".into())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }
        match slot {
            Value::Mapping(m) => m,
            _ => unreachable!("metadata was just replaced with a mapping"),
        }
    }
}

fn get_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
