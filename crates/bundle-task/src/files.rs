//! File mappings: which source module is built into which destination.
//!
//! A task file can describe its files three ways:
//!
//! ```json
//! { "src": "app/init.js", "dest": "dist/app.js" }
//! { "dist/app.js": "app/init.js", "dist/lib.js": ["lib/index.js"] }
//! [ { "src": ["app/init.js"], "dest": "dist/app.js" } ]
//! ```
//!
//! All three normalize to a list of [`FileMapping`]s in declaration order.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// One source-to-destination mapping, built by one bundler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    /// Source specifiers that matched a file on disk
    pub src: Vec<String>,
    /// The first source pattern as written
    pub orig_src: Option<String>,
    /// Destination of the built artifact
    pub dest: PathBuf,
}

impl FileMapping {
    /// Mapping with a single resolved source and no original string.
    pub fn new(src: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: vec![src.into()],
            orig_src: None,
            dest: dest.into(),
        }
    }

    /// Mapping whose sources matched nothing on disk.
    pub fn unresolved(orig_src: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: Vec::new(),
            orig_src: Some(orig_src.into()),
            dest: dest.into(),
        }
    }

    /// The specifier handed to the bundler.
    ///
    /// Exactly one resolved source is used as is. With no resolved source the
    /// original pattern string is passed through, which lets expressions such
    /// as `app/main - app/vendor` reach the bundler untouched.
    pub fn source_specifier(&self) -> Result<&str> {
        match self.src.as_slice() {
            [single] => Ok(single.as_str()),
            [] => self
                .orig_src
                .as_deref()
                .filter(|orig| !orig.trim().is_empty())
                .ok_or_else(|| Error::MissingSource(self.dest.clone())),
            many => Err(Error::MultipleSources {
                dest: self.dest.clone(),
                count: many.len(),
            }),
        }
    }
}

/// A single source or a list of sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Sources {
    One(String),
    Many(Vec<String>),
}

impl Sources {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Sources::One(one) => std::slice::from_ref(one),
            Sources::Many(many) => many,
        }
    }
}

/// Entry of the files-array format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilesEntry {
    pub src: Sources,
    pub dest: PathBuf,
}

/// The file formats accepted in a task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FilesSpec {
    /// `{ "src": ..., "dest": ... }`
    Compact(FilesEntry),
    /// `[{ "src": ..., "dest": ... }, ...]`
    Array(Vec<FilesEntry>),
    /// `{ "<dest>": <src>, ... }`
    Object(IndexMap<String, Sources>),
}

impl FilesSpec {
    /// Flatten into `(dest, sources)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&Path, &[String])> {
        match self {
            FilesSpec::Compact(entry) => vec![(entry.dest.as_path(), entry.src.as_slice())],
            FilesSpec::Array(entries) => entries
                .iter()
                .map(|entry| (entry.dest.as_path(), entry.src.as_slice()))
                .collect(),
            FilesSpec::Object(map) => map
                .iter()
                .map(|(dest, src)| (Path::new(dest.as_str()), src.as_slice()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilesSpec::Compact(_) => false,
            FilesSpec::Array(entries) => entries.is_empty(),
            FilesSpec::Object(map) => map.is_empty(),
        }
    }

    /// Expand source patterns against `cwd` and produce file mappings.
    ///
    /// Each pattern is a glob; the files it matches become `src`, in match
    /// order and listed once. The first pattern as written is kept in
    /// `orig_src` for the pass-through fallback, so a pattern that matches
    /// nothing (or is not a valid glob) still reaches the bundler.
    pub fn normalize(&self, cwd: &Path) -> Vec<FileMapping> {
        self.entries()
            .into_iter()
            .map(|(dest, patterns)| {
                let mut src: Vec<String> = Vec::new();
                for pattern in patterns {
                    for found in expand(cwd, pattern) {
                        if !src.contains(&found) {
                            src.push(found);
                        }
                    }
                }

                FileMapping {
                    src,
                    orig_src: patterns.first().cloned(),
                    dest: dest.to_path_buf(),
                }
            })
            .collect()
    }
}

/// Files under `cwd` matching `pattern`, as paths relative to `cwd`.
fn expand(cwd: &Path, pattern: &str) -> Vec<String> {
    let base = cwd.clean();
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&base.to_string_lossy()),
        pattern
    );

    let Ok(paths) = glob::glob(&full) else {
        trace!("Not a glob pattern: {}", pattern);
        return Vec::new();
    };

    paths
        .filter_map(|path| path.ok())
        .filter(|path| path.is_file())
        .map(|path| {
            path.strip_prefix(&base)
                .map(|relative| relative.to_string_lossy().into_owned())
                .unwrap_or_else(|_| path.to_string_lossy().into_owned())
        })
        .collect()
}
