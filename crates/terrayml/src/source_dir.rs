//! classification of the files in one source directory
//!
//! [SourceDirectory] tracks
//! - the terraform files that get converted (sorted by name)
//! - the `locals` file, which never gets converted and is consumed like a source
//! - other files with `locals` in their name, which are left alone
//! - the defaults (`default.tfvars`) file, if any
use std::path::{Path, PathBuf};

/// File names the converter cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    /// Extension of convertible files, without the dot
    pub extension: String,
    /// Base name of local value files, excluded from conversion
    pub locals: String,
    /// Name of the variable defaults file
    pub defaults: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            extension: "tf".into(),
            locals: "locals".into(),
            defaults: "default.tfvars".into(),
        }
    }
}

impl FileNames {
    fn locals_file(&self) -> String {
        format!("{}.{}", self.locals, self.extension)
    }

    fn is_source(&self, file_name: &str) -> bool {
        file_name
            .strip_suffix(&self.extension)
            .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SourceDirectory {
    pub path: PathBuf,
    pub sources: Vec<PathBuf>,
    pub locals: Option<PathBuf>,
    /// Not converted and never deleted
    pub excluded: Vec<PathBuf>,
    pub defaults: Option<PathBuf>,
}

impl SourceDirectory {
    /// List `path` and sort its files
    ///
    /// Entries that can not be inspected are returned next to the result, listing the directory
    /// itself failing is an error.
    pub fn scan(
        path: &Path,
        names: &FileNames,
    ) -> Result<(Self, Vec<(PathBuf, std::io::Error)>), std::io::Error> {
        let mut directory = Self {
            path: path.to_path_buf(),
            ..Default::default()
        };
        let mut skipped = vec![];

        let locals_file = names.locals_file();

        for dir_entry in std::fs::read_dir(path)? {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(err) => {
                    skipped.push((path.to_path_buf(), err));
                    continue;
                }
            };

            match dir_entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(err) => {
                    skipped.push((dir_entry.path(), err));
                    continue;
                }
            }

            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            if file_name == names.defaults {
                directory.defaults = Some(dir_entry.path());
            } else if !names.is_source(&file_name) {
                continue;
            } else if file_name == locals_file {
                directory.locals = Some(dir_entry.path());
            } else if file_name.contains(&locals_file) {
                directory.excluded.push(dir_entry.path());
            } else {
                directory.sources.push(dir_entry.path());
            }
        }

        directory.sources.sort();
        directory.excluded.sort();

        tracing::debug!(
            path = %path.display(),
            sources = directory.sources.len(),
            locals = directory.locals.is_some(),
            excluded = directory.excluded.len(),
            defaults = directory.defaults.is_some(),
            "scanned directory"
        );

        Ok((directory, skipped))
    }

    /// Whether there is anything to convert
    pub fn is_convertible(&self) -> bool {
        !self.sources.is_empty() || self.defaults.is_some()
    }

    /// Last path segment, used as component name
    pub fn name(&self) -> String {
        let canonical = self.path.canonicalize().unwrap_or_else(|_| self.path.clone());
        canonical
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string())
    }
}
