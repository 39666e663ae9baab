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

//! Applies the [CallRewriter] to Python files in place.

use crate::rewriter::CallRewriter;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// The extension of the files considered for rewriting.
pub const EXTENSION: &str = "py";

/// Counters for a [fix_files] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub calls_rewritten: usize,
}

/// Finds the Python files under `dir`, recursively.
///
/// Symbolic links are followed, a link to a Python file is rewritten through
/// the link. Entries that cannot be read, including link loops, are logged and
/// skipped.
pub fn python_files<P: AsRef<Path>>(dir: P) -> impl Iterator<Item = PathBuf> {
    walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!("skipping {}: {e}", path_of(&e));
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|x| x == EXTENSION))
        .map(walkdir::DirEntry::into_path)
}

fn path_of(error: &walkdir::Error) -> String {
    error
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Rewrites a single file in place.
///
/// The file is only written if some call was rewritten. The new contents are
/// computed before the file is opened for writing, a file that fails to parse
/// is never modified.
///
/// Returns the number of calls rewritten.
pub fn fix_file<P: AsRef<Path>>(path: P, rewriter: &CallRewriter) -> Result<usize> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let fixed = rewriter
        .rewrite_source(&source)
        .map_err(|e| Error::parse(path, e))?;
    if fixed.calls == 0 || fixed.code == source {
        return Ok(0);
    }
    std::fs::write(path, fixed.code).map_err(|e| Error::io(path, e))?;
    tracing::info!("rewrote {} call(s) in {}", fixed.calls, path.display());
    Ok(fixed.calls)
}

/// Rewrites all the Python files in `dirs`.
///
/// Files are processed one at a time, in directory traversal order. The run
/// stops at the first file that cannot be read, parsed, or written. Files
/// processed before the failure keep their changes.
pub fn fix_files<P: AsRef<Path>>(dirs: &[P], rewriter: &CallRewriter) -> Result<Summary> {
    let mut summary = Summary::default();
    for path in dirs.iter().flat_map(python_files) {
        summary.files_scanned += 1;
        let calls = fix_file(&path, rewriter)?;
        if calls != 0 {
            summary.files_changed += 1;
            summary.calls_rewritten += calls;
        }
    }
    tracing::info!(
        files_scanned = summary.files_scanned,
        files_changed = summary.files_changed,
        calls_rewritten = summary.calls_rewritten,
        "done"
    );
    Ok(summary)
}
