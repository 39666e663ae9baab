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

const DESCRIPTION: &str = concat!(
    "Fix up source that uses the Google Cloud client libraries for Python.\n",
    "\n",
    "Note: This tool operates at a best-effort level at converting positional\n",
    "      parameters in client method calls to keyword based parameters.\n",
    "      Cases where it WILL FAIL include\n",
    "      A) * or ** expansion in a method call.\n",
    "      B) Calls via function or method alias (includes free function calls)\n",
    "      C) Indirect or dispatched calls (e.g. the method is looked up dynamically)\n",
    "\n",
    "      These all constitute false negatives. The tool will also detect false\n",
    "      positives when an API method shares a name with another method.\n",
    "\n",
    "      Be sure to back up your source files before running this tool and to\n",
    "      compare the diffs."
);

use clap::Parser;
use fixup_keywords::{Api, CallRewriter, MethodTable, fix_files};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = enable_tracing(args.verbose);
    tracing::debug!("{args:?}");

    let table = match &args.methods {
        Some(path) => MethodTable::from_json(path)?,
        None => args.api.method_table(),
    };
    tracing::info!(
        "fixing up calls to {} method(s): {}",
        table.len(),
        table.methods().collect::<Vec<_>>().join(", ")
    );
    let rewriter = CallRewriter::new(table);
    let summary = fix_files(&args.dirs, &rewriter)?;
    println!(
        "scanned {} file(s), rewrote {} call(s) in {} file(s)",
        summary.files_scanned, summary.calls_rewritten, summary.files_changed
    );
    Ok(())
}

fn enable_tracing(verbose: bool) -> tracing::dispatcher::DefaultGuard {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Migrates client method calls to the request-object calling convention.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
struct Args {
    /// A directory to walk for python files to fix up.
    ///
    /// Repeat the flag to walk several directories.
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    dirs: Vec<PathBuf>,

    /// The client library with the methods to fix up.
    ///
    /// One of `texttospeech`, `phishingprotection`, or `grafeas`.
    #[arg(long, env = "FIXUP_KEYWORDS_API", default_value = Api::DEFAULT_KEY)]
    api: Api,

    /// A JSON file with the methods to fix up, instead of a built-in API.
    ///
    /// The file maps each method to its fields, in order, for example:
    /// `{"methods": {"get_secret": ["name"]}}`.
    #[arg(long, value_name = "FILE")]
    methods: Option<PathBuf>,

    /// Log each rewritten call.
    #[arg(short, long)]
    verbose: bool,
}
