//! Terraform output: resource naming, content encoding and the HCL document.

pub mod content;
pub mod document;
pub mod naming;

pub use content::{encode_file_reference, encode_inline, ContentExpression, DEFAULT_HEREDOC_DELIMITER};
pub use document::HclDocument;
pub use naming::{generate_resource_name, ResourceName};
