//! directory driver
//!
//! [Converter::convert_tree] visits the source root and its immediate child directories. Every
//! directory with terraform files (or a defaults file) gets exactly one output document.
//!
//! Errors come in two flavours:
//! - a directory or file that can not be listed or deleted is recorded as [ScanIssue] in the
//!   [Report] and the run continues
//! - anything that would produce a wrong document (unreadable or invalid source, encoding
//!   failures, unwritable output) aborts with [ConvertError]
use crate::codec::{self, CodecError};
use crate::normalize::{MergeScope, Normalizer};
use crate::reshape::{self, Layout};
use crate::source_dir::{FileNames, SourceDirectory};
use crate::template;
use crate::value::{self, Map, Value};
use std::path::{Path, PathBuf};

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// File name of the generated document
    pub config_name: String,
    pub names: FileNames,
    pub scope: MergeScope,
    pub layout: Layout,
    /// Also convert the immediate child directories of the source root
    pub scan_children: bool,
    /// Never delete converted files, even when converting in place
    pub keep_sources: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config_name: ".terrahub.yml".into(),
            names: FileNames::default(),
            scope: MergeScope::default(),
            layout: Layout::default(),
            scan_children: true,
            keep_sources: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Unable to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to parse hcl file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: hcl_edit::parser::Error,
    },
    #[error("Unable to convert expressions of {}", .path.display())]
    Expression { path: PathBuf, source: hcl::Error },
    #[error("Unable to encode {}", .path.display())]
    Encode { path: PathBuf, source: CodecError },
    #[error("Unable to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A filesystem problem that did not stop the run
#[derive(thiserror::Error, Debug)]
#[error("{}: {error}", .path.display())]
pub struct ScanIssue {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// One written document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Converted terraform files, in conversion order
    pub files: Vec<PathBuf>,
    pub tfvars: bool,
    /// Files removed after writing the output (in place mode only)
    pub deleted: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Report {
    pub converted: Vec<Converted>,
    pub issues: Vec<ScanIssue>,
}

impl Report {
    fn issue(&mut self, path: impl Into<PathBuf>, error: std::io::Error) {
        let issue = ScanIssue {
            path: path.into(),
            error,
        };
        tracing::warn!(%issue, "skipped");
        self.issues.push(issue);
    }
}

#[derive(derive_new::new, Debug, Default)]
pub struct Converter {
    options: Options,
}

impl Converter {
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse hcl text into a generic tree
    pub fn parse(&self, input: &str, path: &Path) -> Result<Map, ConvertError> {
        let body = hcl_edit::parser::parse_body(input).map_err(|source| ConvertError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        value::from_body(body.into()).map_err(|source| ConvertError::Expression {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge repeated blocks, see [crate::normalize]
    pub fn normalize(&self, tree: &mut Map) {
        Normalizer::new(self.options.scope).normalize(tree)
    }

    /// Generic yaml of a normalized tree, empty for an empty tree
    pub fn encode(&self, tree: Map, path: &Path) -> Result<String, ConvertError> {
        if tree.is_empty() {
            return Ok(String::new());
        }

        codec::to_yaml(&Value::Object(tree)).map_err(|source| ConvertError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// parse -> normalize -> encode
    pub fn convert_source(&self, input: &str, path: &Path) -> Result<String, ConvertError> {
        let mut tree = self.parse(input, path)?;
        self.normalize(&mut tree);
        self.encode(tree, path)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn convert_file(&self, path: &Path) -> Result<String, ConvertError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.convert_source(&input, path)
    }

    /// Convert `source` (and its child directories) into documents below `destination`
    #[tracing::instrument(level = "info", skip(self))]
    pub fn convert_tree(&self, source: &Path, destination: &Path) -> Result<Report, ConvertError> {
        let mut report = Report::default();

        if let Err(error) = std::fs::create_dir_all(destination) {
            report.issue(destination, error);
            return Ok(report);
        }

        self.convert_directory(source, destination, &mut report)?;

        if !self.options.scan_children {
            return Ok(report);
        }

        let read_dir = match std::fs::read_dir(source) {
            Ok(read_dir) => read_dir,
            Err(error) => {
                report.issue(source, error);
                return Ok(report);
            }
        };

        let mut children = vec![];
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(error) => {
                    report.issue(source, error);
                    continue;
                }
            };

            let is_dir = match dir_entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(error) => {
                    report.issue(dir_entry.path(), error);
                    continue;
                }
            };

            let hidden = dir_entry.file_name().to_string_lossy().starts_with('.');
            if is_dir && !hidden {
                children.push(dir_entry.file_name());
            }
        }
        children.sort();

        for child in children {
            let target = destination.join(&child);
            if let Err(error) = std::fs::create_dir_all(&target) {
                report.issue(target, error);
                continue;
            }

            self.convert_directory(&source.join(&child), &target, &mut report)?;
        }

        Ok(report)
    }

    /// Convert a single directory
    ///
    /// Sources are only deleted after the output document was written.
    pub fn convert_directory(
        &self,
        source: &Path,
        destination: &Path,
        report: &mut Report,
    ) -> Result<(), ConvertError> {
        let directory = match SourceDirectory::scan(source, &self.options.names) {
            Ok((directory, skipped)) => {
                for (path, error) in skipped {
                    report.issue(path, error);
                }
                directory
            }
            Err(error) => {
                report.issue(source, error);
                return Ok(());
            }
        };

        let in_place = !self.options.keep_sources && is_same_directory(source, destination);

        if !directory.is_convertible() {
            tracing::debug!(source = %source.display(), "nothing to convert");
            if in_place {
                consume(directory.locals.iter(), report);
            }
            return Ok(());
        }

        let layout = &self.options.layout;

        let mut yaml = String::new();
        for file in &directory.sources {
            tracing::info!(path = %file.display(), "converting file");
            yaml.push_str(&self.convert_file(file)?);
        }
        let content = reshape::reshape(&yaml, layout);

        let tfvars = match &directory.defaults {
            Some(defaults) => Some(self.convert_file(defaults)?).filter(|tfvars| !tfvars.is_empty()),
            None => None,
        };

        let section = template::template_section(&content, tfvars.as_deref(), layout);

        let output = destination.join(&self.options.config_name);
        let existing = match std::fs::read_to_string(&output) {
            Ok(existing) => Some(existing),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(ConvertError::Read {
                    path: output,
                    source,
                })
            }
        };

        let document = template::compose(existing.as_deref(), &directory.name(), &section, layout);
        std::fs::write(&output, document).map_err(|source| ConvertError::Write {
            path: output.clone(),
            source,
        })?;

        tracing::info!(
            source = %source.display(),
            output = %output.display(),
            files = directory.sources.len(),
            merged = existing.is_some(),
            "wrote document"
        );

        let deleted = if in_place {
            let consumed = directory
                .sources
                .iter()
                .chain(&directory.locals)
                .chain(&directory.defaults);
            consume(consumed, report)
        } else {
            vec![]
        };

        report.converted.push(Converted {
            source: source.to_path_buf(),
            output,
            files: directory.sources,
            tfvars: tfvars.is_some(),
            deleted,
        });

        Ok(())
    }
}

/// Delete `paths`, returns the deleted ones
fn consume<'a>(paths: impl Iterator<Item = &'a PathBuf>, report: &mut Report) -> Vec<PathBuf> {
    let mut deleted = vec![];
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => deleted.push(path.clone()),
            Err(error) => report.issue(path, error),
        }
    }

    tracing::debug!(count = deleted.len(), "deleted converted files");
    deleted
}

fn is_same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
