//! # raw-k8s-tfc
//!
//! Compiles raw Kubernetes manifests into Terraform configuration. Every
//! object found in the input files becomes one `resource "k8s_manifest"`
//! block whose `content` is either the object's YAML as a heredoc or a
//! `file()` reference to the manifest it came from.
//!
//! ## Example
//!
//! ```rust,no_run
//! use raw_k8s_tfc::{convert, ContentMode, ConvertOptions, LogObserver};
//!
//! # fn main() -> raw_k8s_tfc::Result<()> {
//! let options = ConvertOptions::new("k8s/", "k8s.tf")
//!     .with_content_mode(ContentMode::FileReference);
//! let report = convert(&options, &mut LogObserver)?;
//! println!("wrote {} resources", report.blocks);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod manifest;
pub mod terraform;

// Re-export commonly used types and functions
pub use error::{ConverterError, Result};
pub use handlers::*;
pub use manifest::Manifest;
pub use terraform::{generate_resource_name, HclDocument, ResourceName};

use cli::{Commands, ConvertArgs};
use config::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(command: Commands, config: &Config, quiet: bool) -> Result<()> {
    let (args, mode, module_dir) = match command {
        Commands::Convert { args, content_inline } => {
            let inline = content_inline.unwrap_or(config.conversion.content_inline);
            (args, ContentMode::from_inline_flag(inline), None)
        }
        Commands::Inline { args } => (args, ContentMode::Inline, None),
        Commands::FileReference { args, module_dir } => {
            (args, ContentMode::FileReference, module_dir)
        }
    };

    let dry_run = args.dry_run;
    let options = build_options(args, config, mode, module_dir);
    handlers::handle_convert(options, dry_run, quiet)
}

fn build_options(
    args: ConvertArgs,
    config: &Config,
    mode: ContentMode,
    module_dir: Option<std::path::PathBuf>,
) -> ConvertOptions {
    let mut options = ConvertOptions::from_config(args.k8s_file, args.output_file, &config.conversion)
        .with_content_mode(mode);
    if args.no_recursive {
        options.recursive = false;
    }
    if let Some(delimiter) = args.delimiter {
        options.heredoc_delimiter = delimiter;
    }
    if module_dir.is_some() {
        options.module_dir = module_dir;
    }
    options
}
