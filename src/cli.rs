use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rawk8stfc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create Terraform resources for raw Kubernetes manifests")]
#[command(long_about = "Wraps every Kubernetes object found in the given manifest files in a `resource \"k8s_manifest\"` block, with the manifest either inlined as a heredoc or referenced through file().")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Input and output flags shared by every conversion command
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Kubernetes manifest file or directory to read
    #[arg(short = 'f', long = "k8s-file", value_name = "PATH")]
    pub k8s_file: PathBuf,

    /// Terraform file the generated resources are written to
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: PathBuf,

    /// Only read files directly inside the input directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Heredoc delimiter for inlined manifests
    #[arg(long, value_name = "IDENT")]
    pub delimiter: Option<String>,

    /// Print the generated Terraform instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert manifests, inlining content unless told otherwise
    Convert {
        #[command(flatten)]
        args: ConvertArgs,

        /// Inline manifests as heredocs (true) or reference their files (false)
        #[arg(short = 'i', long, value_name = "BOOL", action = clap::ArgAction::Set)]
        content_inline: Option<bool>,
    },

    /// Convert manifests with every object inlined as a heredoc
    Inline {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Convert manifests with content read from the source files
    ///
    /// Files holding more than one object are still inlined.
    FileReference {
        #[command(flatten)]
        args: ConvertArgs,

        /// Make file references relative to this directory
        #[arg(long, value_name = "DIR")]
        module_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
