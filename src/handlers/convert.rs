//! Batch conversion of manifest files into a single Terraform document.

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::manifest::{collect_manifest_files, load_manifests_from_file};
use crate::terraform::{
    encode_inline, generate_resource_name, ContentExpression, HclDocument,
    DEFAULT_HEREDOC_DELIMITER,
};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// How each object's content is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// YAML heredoc inside the resource block.
    Inline,
    /// `file()` reference to the source manifest.
    FileReference,
}

impl ContentMode {
    pub fn from_inline_flag(inline: bool) -> Self {
        if inline {
            ContentMode::Inline
        } else {
            ContentMode::FileReference
        }
    }
}

/// Everything one conversion run needs.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Manifest file or directory.
    pub input: PathBuf,
    /// Terraform file to write.
    pub output: PathBuf,
    pub content_mode: ContentMode,
    pub recursive: bool,
    pub heredoc_delimiter: String,
    /// When set, file references are relative to this directory.
    pub module_dir: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            content_mode: ContentMode::Inline,
            recursive: true,
            heredoc_delimiter: DEFAULT_HEREDOC_DELIMITER.to_string(),
            module_dir: None,
        }
    }

    /// Start from configured defaults.
    pub fn from_config(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        config: &ConversionConfig,
    ) -> Self {
        Self {
            content_mode: ContentMode::from_inline_flag(config.content_inline),
            recursive: config.recursive,
            heredoc_delimiter: config.heredoc_delimiter.clone(),
            module_dir: config.module_dir.clone(),
            ..Self::new(input, output)
        }
    }

    pub fn with_content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }
}

/// Notifications emitted while converting.
pub trait ConversionObserver {
    /// A file was decoded into `objects` objects.
    fn file_loaded(&mut self, _path: &Path, _objects: usize) {}

    /// File-reference mode was overridden because the file holds several
    /// objects and a `k8s_manifest` resource accepts only one.
    fn inline_forced(&mut self, path: &Path, objects: usize);
}

/// Observer that reports through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ConversionObserver for LogObserver {
    fn file_loaded(&mut self, path: &Path, objects: usize) {
        log::debug!("decoded {} object(s) from {}", objects, path.display());
    }

    fn inline_forced(&mut self, path: &Path, objects: usize) {
        log::warn!(
            "inlining {} objects from {}: a k8s_manifest resource can hold only one object",
            objects,
            path.display()
        );
    }
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub files: usize,
    pub blocks: usize,
    /// Files whose objects were inlined despite file-reference mode.
    pub forced_inline: Vec<PathBuf>,
    /// Terraform file the document is destined for.
    pub output: PathBuf,
}

/// Build the document for every object under `options.input`.
///
/// Files are visited in listing order and objects in stream order. The first
/// failure aborts the run.
pub fn render(
    options: &ConvertOptions,
    observer: &mut dyn ConversionObserver,
) -> Result<(HclDocument, ConversionReport)> {
    let mut document = HclDocument::with_heredoc_delimiter(&options.heredoc_delimiter)?;
    let mut report = ConversionReport {
        output: options.output.clone(),
        ..ConversionReport::default()
    };

    for file in collect_manifest_files(&options.input, options.recursive)? {
        let objects = load_manifests_from_file(&file)?;
        observer.file_loaded(&file, objects.len());
        report.files += 1;

        let mut mode = options.content_mode;
        if mode == ContentMode::FileReference && objects.len() > 1 {
            observer.inline_forced(&file, objects.len());
            report.forced_inline.push(file.clone());
            mode = ContentMode::Inline;
        }

        for object in &objects {
            let name = generate_resource_name(object).map_err(|e| e.with_file(&file))?;
            let content = match mode {
                ContentMode::Inline => ContentExpression::Inline(encode_inline(object)?),
                ContentMode::FileReference => ContentExpression::FileReference(reference_path(
                    &file,
                    options.module_dir.as_deref(),
                )),
            };
            log::debug!("adding resource {} from {}", name, file.display());
            document.append_resource_block(&name, content);
            report.blocks += 1;
        }
    }

    Ok((document, report))
}

/// Build the document and write it to `options.output`.
///
/// Nothing is written unless every object converted successfully.
pub fn convert(
    options: &ConvertOptions,
    observer: &mut dyn ConversionObserver,
) -> Result<ConversionReport> {
    let (document, report) = render(options, observer)?;
    document.write_to_path(&options.output)?;
    Ok(report)
}

/// CLI entry point for all conversion commands.
pub fn handle_convert(options: ConvertOptions, dry_run: bool, quiet: bool) -> Result<()> {
    let mut observer = LogObserver;

    if dry_run {
        let (document, _) = render(&options, &mut observer)?;
        print!("{}", document.render()?);
        return Ok(());
    }

    let report = convert(&options, &mut observer)?;
    if !quiet {
        println!(
            "{} Wrote {} resource block(s) from {} file(s) to {}",
            "✅".green(),
            report.blocks,
            report.files,
            report.output.display().to_string().bold()
        );
        for file in &report.forced_inline {
            println!(
                "{} {} holds several objects, inlined instead of referenced",
                "⚠️".yellow(),
                file.display()
            );
        }
    }
    Ok(())
}

fn reference_path(file: &Path, module_dir: Option<&Path>) -> String {
    let relative = module_dir
        .and_then(|dir| file.strip_prefix(dir).ok())
        .unwrap_or(file);
    relative.to_string_lossy().into_owned()
}
