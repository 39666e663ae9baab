// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors reported while fixing up source files.
//!
//! Calls that the tool does not recognize are never errors, they are left
//! unchanged. Errors are limited to problems with the inputs: files that
//! cannot be read, written, or parsed, and invalid configuration.

use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for this crate.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// A source file could not be parsed. Nothing was written to it.
    pub fn is_parse(&self) -> bool {
        matches!(self.0, ErrorKind::Parse { .. })
    }

    /// A problem reading or writing a file.
    pub fn is_io(&self) -> bool {
        matches!(self.0, ErrorKind::Io { .. })
    }

    /// The requested API is not in the registry.
    pub fn is_unknown_api(&self) -> bool {
        matches!(self.0, ErrorKind::UnknownApi { .. })
    }

    /// A custom method table could not be loaded or is invalid.
    pub fn is_method_table(&self) -> bool {
        matches!(self.0, ErrorKind::MethodTable { .. })
    }

    /// The file associated with this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.0 {
            ErrorKind::Parse { path, .. } => Some(path.as_path()),
            ErrorKind::Io { path, .. } => Some(path.as_path()),
            ErrorKind::MethodTable { path, .. } => Some(path.as_path()),
            ErrorKind::UnknownApi { .. } => None,
        }
    }

    pub(crate) fn parse<P: Into<PathBuf>>(path: P, source: SyntaxError) -> Error {
        Error(ErrorKind::Parse {
            path: path.into(),
            source,
        })
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Error {
        Error(ErrorKind::Io {
            path: path.into(),
            source,
        })
    }

    pub(crate) fn unknown_api<K: Into<String>>(key: K, valid: &[&str]) -> Error {
        Error(ErrorKind::UnknownApi {
            key: key.into(),
            valid: valid.join(", "),
        })
    }

    pub(crate) fn method_table<P, T>(path: P, source: T) -> Error
    where
        P: Into<PathBuf>,
        T: Into<BoxError>,
    {
        Error(ErrorKind::MethodTable {
            path: path.into(),
            source: source.into(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
    #[error("cannot read or write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown API `{key}`, expected one of: {valid}")]
    UnknownApi { key: String, valid: String },
    #[error("invalid method table in {}: {source}", .path.display())]
    MethodTable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

/// The location of the first syntax error in a source unit.
///
/// Both `line` and `column` start at 1.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("syntax error at line {line}, column {column}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
}
