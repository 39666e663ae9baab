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

//! Fix up Python code that uses the generated Google Cloud client libraries.
//!
//! Newer versions of the generated clients take a single `request` argument
//! instead of one argument per field. This crate rewrites call sites such as:
//!
//! ```python
//! client.synthesize_speech(text, voice, audio_config, timeout=5)
//! ```
//!
//! into:
//!
//! ```python
//! client.synthesize_speech(request={'input': text, 'voice': voice, 'audio_config': audio_config}, timeout=5)
//! ```
//!
//! The rewrite works on the concrete syntax tree. Everything outside the
//! rewritten argument lists, including comments and formatting, is preserved.
//!
//! # Limitations
//!
//! The tool operates at a best-effort level. It does not recognize:
//! - `*` or `**` expansion in a method call.
//! - Calls via function or method alias, including free function calls.
//! - Indirect or dispatched calls, e.g. the method is looked up dynamically.
//!
//! These are all false negatives. The tool also produces false positives when
//! an API method shares a name with another method. Run it on sources under
//! version control and review the diffs.
//!
//! The parser accepts some Python 2 syntax, such as `print 'hello'`. Files
//! using it are rewritten like any other file, they are not rejected.
//!
//! A rewritten call is printed on one line. Comments before its first argument
//! keep their place, other comments in the argument list move to its end.
//!
//! # Example
//! ```
//! # use fixup_keywords::{Api, CallRewriter};
//! let rewriter = CallRewriter::new(Api::TextToSpeech.method_table());
//! let fixed = rewriter.rewrite_source("client.list_voices('en-US')\n")?;
//! assert_eq!(fixed.code, "client.list_voices(request={'language_code': 'en-US'})\n");
//! assert_eq!(fixed.calls, 1);
//! # Ok::<(), fixup_keywords::SyntaxError>(())
//! ```

pub mod error;
pub mod fixer;
pub mod partition;
pub mod rewriter;
pub mod signature;

pub use error::{Error, SyntaxError};
pub use fixer::{Summary, fix_file, fix_files, python_files};
pub use rewriter::{CallRewriter, Rewritten};
pub use signature::{Api, CONTROL_PARAMS, MethodTable, REQUEST};

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
