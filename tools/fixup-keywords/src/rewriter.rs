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

//! Rewrites client method calls to use a single `request` argument.
//!
//! The source is parsed into a concrete syntax tree and then printed back,
//! copying the original text for every node except the argument lists of the
//! rewritten calls. Unrecognized calls are copied verbatim, they are not
//! errors.

use crate::error::SyntaxError;
use crate::partition::partition;
use crate::signature::{CONTROL_PARAMS, MethodTable, REQUEST, is_control};
use ast_grep_core::Node;
use ast_grep_core::tree_sitter::{LanguageExt, StrDoc};
use ast_grep_language::Python;

type PyNode<'r> = Node<'r, StrDoc<Python>>;

/// An argument in a call expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg<V> {
    /// The name for keyword arguments, `None` for positional arguments.
    pub keyword: Option<String>,
    pub value: V,
}

impl<V> Arg<V> {
    pub fn positional(value: V) -> Self {
        Self {
            keyword: None,
            value,
        }
    }

    pub fn keyword<K: Into<String>>(keyword: K, value: V) -> Self {
        Self {
            keyword: Some(keyword.into()),
            value,
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.keyword.as_deref() == Some(name)
    }
}

/// A control argument in the rewritten call.
#[derive(Clone, Debug, PartialEq)]
pub enum Control<V> {
    /// The argument was passed by keyword and keeps its original form.
    Named(Arg<V>),
    /// The argument was passed by position and receives this name.
    Positional { name: &'static str, value: V },
}

/// The arguments of a rewritten call.
#[derive(Clone, Debug, PartialEq)]
pub struct Reclassified<V> {
    /// The fields of the `request` argument, in declaration order.
    pub request: Vec<(String, V)>,
    /// The control arguments, in the order they are emitted.
    pub control: Vec<Control<V>>,
}

/// Rearranges the arguments of a call to a method with the given `fields`.
///
/// Returns `None` if the call should be left unchanged: it already has a
/// `request` argument, or it is not a valid call for these fields. Keyword
/// arguments are matched to fields by name, positional arguments by position.
/// Keyword arguments that do not name a field are kept under their own name.
///
/// # Example
/// ```
/// # use fixup_keywords::rewriter::{Arg, reclassify};
/// let fields = ["input".to_string(), "voice".to_string()];
/// let args = vec![Arg::positional("x"), Arg::keyword("voice", "y")];
/// let got = reclassify(&fields, args).unwrap();
/// assert_eq!(got.request, vec![("input".to_string(), "x"), ("voice".to_string(), "y")]);
/// assert!(got.control.is_empty());
/// ```
pub fn reclassify<V>(fields: &[String], args: Vec<Arg<V>>) -> Option<Reclassified<V>> {
    // In valid code keyword arguments follow the positional arguments, so all
    // positional arguments map to the first parameters.
    let (positional, named) = partition(args, |a| a.keyword.is_none());
    if named.iter().any(|a| a.is_named(REQUEST)) {
        return None;
    }
    if positional.len() > fields.len() + CONTROL_PARAMS.len() {
        return None;
    }
    let (named_control, mut data) =
        partition(named, |a| a.keyword.as_deref().is_some_and(is_control));

    let mut positional = positional.into_iter();
    let mut request = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(arg) = positional.next() {
            request.push((field.clone(), arg.value));
        } else if let Some(i) = data.iter().position(|a| a.is_named(field)) {
            request.push((field.clone(), data.remove(i).value));
        }
    }
    // A field passed both by position and by keyword.
    if data
        .iter()
        .any(|a| fields.iter().any(|field| a.is_named(field)))
    {
        return None;
    }
    request.extend(
        data.into_iter()
            .filter_map(|a| a.keyword.map(|keyword| (keyword, a.value))),
    );

    let mut control = named_control
        .into_iter()
        .map(Control::Named)
        .collect::<Vec<_>>();
    for (arg, name) in positional.zip(CONTROL_PARAMS) {
        if control
            .iter()
            .any(|c| matches!(c, Control::Named(a) if a.is_named(name)))
        {
            return None;
        }
        control.push(Control::Positional {
            name,
            value: arg.value,
        });
    }
    Some(Reclassified { request, control })
}

/// The callee of a call expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callee {
    /// A simple attribute access, as in `client.list_voices(...)`.
    Method(String),
    /// Free functions, subscripts, calls returning callables, etc.
    Other,
}

impl Callee {
    fn classify(function: &PyNode<'_>) -> Self {
        if function.kind() != "attribute" {
            return Self::Other;
        }
        match function.field("attribute") {
            Some(name) => Self::Method(name.text().to_string()),
            None => Self::Other,
        }
    }
}

/// The result of rewriting a source unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewritten {
    /// The new source code.
    pub code: String,
    /// The number of calls rewritten.
    pub calls: usize,
}

/// Rewrites the calls to the methods in a [MethodTable].
#[derive(Clone, Debug)]
pub struct CallRewriter {
    table: MethodTable,
}

impl CallRewriter {
    pub fn new(table: MethodTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    /// Rewrites every matching call in `source`.
    ///
    /// Returns an error, and no code, if `source` is not valid Python.
    pub fn rewrite_source(&self, source: &str) -> Result<Rewritten, SyntaxError> {
        let grep = Python.ast_grep(source);
        let root = grep.root();
        if let Some(offset) = first_error(&root) {
            return Err(locate(source, offset));
        }

        let mut printer = Printer {
            source,
            table: &self.table,
            code: String::with_capacity(source.len()),
            calls: 0,
        };
        let range = root.range();
        printer.code.push_str(&source[..range.start]);
        printer.print(&root);
        printer.code.push_str(&source[range.end..]);
        Ok(Rewritten {
            code: printer.code,
            calls: printer.calls,
        })
    }
}

struct Printer<'a> {
    source: &'a str,
    table: &'a MethodTable,
    code: String,
    calls: usize,
}

impl Printer<'_> {
    fn print(&mut self, node: &PyNode<'_>) {
        if node.kind() == "call" && self.print_call(node) {
            return;
        }
        let range = node.range();
        let mut cursor = range.start;
        for child in node.children() {
            let child_range = child.range();
            self.code.push_str(&self.source[cursor..child_range.start]);
            self.print(&child);
            cursor = child_range.end;
        }
        self.code.push_str(&self.source[cursor..range.end]);
    }

    fn print_to_string(&mut self, node: &PyNode<'_>) -> String {
        let saved = std::mem::take(&mut self.code);
        self.print(node);
        std::mem::replace(&mut self.code, saved)
    }

    /// Prints the rewritten call, returns `false` if the call does not match.
    fn print_call(&mut self, call: &PyNode<'_>) -> bool {
        let (Some(function), Some(arguments)) = (call.field("function"), call.field("arguments"))
        else {
            return false;
        };
        let Callee::Method(method) = Callee::classify(&function) else {
            return false;
        };
        let table = self.table;
        let Some(fields) = table.fields(&method) else {
            return false;
        };
        let Some(ArgumentList { args, comments }) = arguments_of(&arguments) else {
            return false;
        };
        // Comments before the first argument keep their place, the text from
        // the `(` to the first argument is copied as-is.
        let first = args.first().map(|a| a.value.node.range().start);
        let (before, after) = partition(comments, |c| {
            first.is_some_and(|start| c.range().end <= start)
        });
        let open = arguments.range().start + 1;
        let leading = first
            .filter(|_| !before.is_empty())
            .map(|start| self.source[open..start].to_string());
        let trailing = after
            .iter()
            .map(|c| c.text().to_string())
            .collect::<Vec<_>>();
        let Some(plan) = reclassify(fields, args) else {
            return false;
        };

        let request = plan
            .request
            .iter()
            .map(|(field, arg)| format!("'{field}': {}", self.print_to_string(&arg.value)))
            .collect::<Vec<_>>();
        let control = plan
            .control
            .iter()
            .map(|c| match c {
                Control::Named(arg) => self.print_to_string(&arg.value.node),
                Control::Positional { name, value } => {
                    format!("{name}={}", self.print_to_string(&value.value))
                }
            })
            .collect::<Vec<_>>();

        self.print(&function);
        self.code
            .push_str(&self.source[function.range().end..arguments.range().start]);
        self.code.push('(');
        if let Some(leading) = &leading {
            self.code.push_str(leading);
        }
        self.code.push_str(&format!("{REQUEST}={{{}}}", request.join(", ")));
        for c in control {
            self.code.push_str(", ");
            self.code.push_str(&c);
        }
        // The remaining comments go at the end of the argument list, the
        // closing parenthesis moves to its own line.
        if !trailing.is_empty() {
            let indent = indentation(self.source, call.range().start);
            self.code.push_str("  ");
            self.code
                .push_str(&trailing.join(&format!("\n{indent}    ")));
            self.code.push('\n');
            self.code.push_str(indent);
        }
        self.code.push(')');
        self.calls += 1;
        tracing::debug!(
            method = %method,
            line = locate(self.source, call.range().start).line,
            "rewrote call"
        );
        true
    }
}

/// An argument node and the node holding its value.
///
/// For positional arguments both are the same node.
struct ArgNode<'r> {
    node: PyNode<'r>,
    value: PyNode<'r>,
}

/// The arguments of a call and the comments between them.
struct ArgumentList<'r> {
    args: Vec<Arg<ArgNode<'r>>>,
    comments: Vec<PyNode<'r>>,
}

/// Collects the arguments of a call, `None` for unsupported argument shapes.
fn arguments_of<'r>(arguments: &PyNode<'r>) -> Option<ArgumentList<'r>> {
    // Generator arguments, as in `f(x for x in y)`.
    if arguments.kind() != "argument_list" {
        return None;
    }
    let mut list = ArgumentList {
        args: Vec::new(),
        comments: Vec::new(),
    };
    for child in arguments.children() {
        let kind = child.kind().to_string();
        match kind.as_str() {
            "comment" => list.comments.push(child),
            // Backslash continuations are named, but they are not arguments.
            "line_continuation" => {}
            "list_splat" | "dictionary_splat" => return None,
            "keyword_argument" => {
                let name = child.field("name")?.text().to_string();
                let value = child.field("value")?;
                list.args
                    .push(Arg::keyword(name, ArgNode { node: child, value }));
            }
            // Parentheses and commas.
            _ if !child.is_named() => {}
            _ => list.args.push(Arg::positional(ArgNode {
                node: child.clone(),
                value: child,
            })),
        }
    }
    Some(list)
}

/// The leading whitespace of the line containing `offset`.
fn indentation(source: &str, offset: usize) -> &str {
    let start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn first_error(node: &PyNode<'_>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.range().start);
    }
    node.children().find_map(|child| first_error(&child))
}

fn locate(source: &str, offset: usize) -> SyntaxError {
    let before = &source[..offset];
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    SyntaxError {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
    }
}
