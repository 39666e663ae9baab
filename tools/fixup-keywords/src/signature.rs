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

//! Method signatures for the supported client libraries.
//!
//! Each client method takes a number of data fields, which become the fields
//! of the `request` argument, and the control parameters listed in
//! [CONTROL_PARAMS], which are passed through unchanged.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The name of the argument holding the aggregated request.
pub const REQUEST: &str = "request";

/// The parameters controlling how an RPC is made, in declaration order.
///
/// Positional arguments past the data fields of a method map to these names,
/// in this order.
pub const CONTROL_PARAMS: [&str; 3] = ["retry", "timeout", "metadata"];

/// Returns true if `name` is one of the [CONTROL_PARAMS].
pub fn is_control(name: &str) -> bool {
    CONTROL_PARAMS.contains(&name)
}

/// Returns true if `name` is a valid Python identifier.
///
/// Non-ASCII letters are accepted, Python allows them in identifiers.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Maps method names to their data fields.
///
/// The order of the fields matters, positional arguments are assigned to
/// fields in this order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodTable {
    methods: BTreeMap<String, Vec<String>>,
}

impl MethodTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a method and its data fields.
    ///
    /// # Example
    /// ```
    /// # use fixup_keywords::MethodTable;
    /// let table = MethodTable::new().with_method("get_secret", ["name"]);
    /// assert_eq!(table.fields("get_secret"), Some(&["name".to_string()][..]));
    /// ```
    pub fn with_method<N, I, F>(mut self, name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.methods
            .insert(name.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    /// The data fields of `method`, in declaration order.
    pub fn fields(&self, method: &str) -> Option<&[String]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    /// The method names in this table, sorted.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Loads a table from a JSON file.
    ///
    /// The file contains a single object, for example:
    ///
    /// ```json
    /// { "methods": { "get_secret": ["name"], "list_secrets": ["parent"] } }
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse_json(&contents).map_err(|e| Error::method_table(path, e))
    }

    fn parse_json(contents: &str) -> std::result::Result<Self, BoxError> {
        let table = serde_json::from_str::<Self>(contents)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> std::result::Result<(), BoxError> {
        for (method, fields) in &self.methods {
            for (i, field) in fields.iter().enumerate() {
                if field.is_empty() {
                    return Err(format!("empty field name in `{method}`").into());
                }
                if !is_identifier(field) {
                    return Err(format!("`{method}` has an invalid field name `{field}`").into());
                }
                if field == REQUEST || is_control(field) {
                    return Err(format!("`{method}` uses the reserved name `{field}`").into());
                }
                if fields[..i].contains(field) {
                    return Err(format!("`{method}` repeats the field `{field}`").into());
                }
            }
        }
        Ok(())
    }

    fn from_static(methods: &[(&str, &[&str])]) -> Self {
        methods
            .iter()
            .fold(Self::new(), |table, (name, fields)| {
                table.with_method(*name, fields.iter().copied())
            })
    }
}

/// The client libraries with built-in method tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Api {
    /// Cloud Text-to-Speech.
    TextToSpeech,
    /// Phishing Protection.
    PhishingProtection,
    /// Grafeas, the artifact metadata API.
    Grafeas,
}

static REGISTRY: LazyLock<BTreeMap<&'static str, Api>> = LazyLock::new(|| {
    [Api::TextToSpeech, Api::PhishingProtection, Api::Grafeas]
        .into_iter()
        .map(|api| (api.key(), api))
        .collect()
});

impl Api {
    /// The key used when no API is requested.
    pub const DEFAULT_KEY: &'static str = "texttospeech";

    /// The registry key for this API.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TextToSpeech => "texttospeech",
            Self::PhishingProtection => "phishingprotection",
            Self::Grafeas => "grafeas",
        }
    }

    /// All the registry keys, sorted.
    pub fn keys() -> Vec<&'static str> {
        REGISTRY.keys().copied().collect()
    }

    /// Finds the API for `key`, or the default API if `key` is `None`.
    ///
    /// # Example
    /// ```
    /// # use fixup_keywords::Api;
    /// assert_eq!(Api::lookup(None)?, Api::TextToSpeech);
    /// assert_eq!(Api::lookup(Some("grafeas"))?, Api::Grafeas);
    /// assert!(Api::lookup(Some("speech")).is_err());
    /// # Ok::<(), fixup_keywords::Error>(())
    /// ```
    pub fn lookup(key: Option<&str>) -> Result<Api> {
        let key = key.unwrap_or(Self::DEFAULT_KEY);
        REGISTRY
            .get(key)
            .copied()
            .ok_or_else(|| Error::unknown_api(key, &Self::keys()))
    }

    /// The method table for this API.
    pub fn method_table(&self) -> MethodTable {
        match self {
            Self::TextToSpeech => MethodTable::from_static(TEXT_TO_SPEECH),
            Self::PhishingProtection => MethodTable::from_static(PHISHING_PROTECTION),
            Self::Grafeas => MethodTable::from_static(GRAFEAS),
        }
    }
}

impl std::str::FromStr for Api {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(Some(s))
    }
}

impl std::fmt::Display for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

const TEXT_TO_SPEECH: &[(&str, &[&str])] = &[
    ("list_voices", &["language_code"]),
    ("synthesize_speech", &["input", "voice", "audio_config"]),
];

const PHISHING_PROTECTION: &[(&str, &[&str])] = &[("report_phishing", &["parent", "uri"])];

const GRAFEAS: &[(&str, &[&str])] = &[
    ("batch_create_notes", &["parent", "notes"]),
    ("batch_create_occurrences", &["parent", "occurrences"]),
    ("create_note", &["parent", "note_id", "note"]),
    ("create_occurrence", &["parent", "occurrence"]),
    ("delete_note", &["name"]),
    ("delete_occurrence", &["name"]),
    ("get_note", &["name"]),
    ("get_occurrence", &["name"]),
    ("get_occurrence_note", &["name"]),
    ("list_note_occurrences", &["name", "filter"]),
    ("list_notes", &["parent", "filter"]),
    ("list_occurrences", &["parent", "filter"]),
    ("update_note", &["name", "note", "update_mask"]),
    ("update_occurrence", &["name", "occurrence", "update_mask"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Api::TextToSpeech, "texttospeech")]
    #[test_case(Api::PhishingProtection, "phishingprotection")]
    #[test_case(Api::Grafeas, "grafeas")]
    fn registry(api: Api, key: &str) -> anyhow::Result<()> {
        assert_eq!(api.key(), key);
        assert_eq!(api.to_string(), key);
        assert_eq!(key.parse::<Api>()?, api);
        assert_eq!(Api::lookup(Some(key))?, api);
        assert!(!api.method_table().is_empty(), "{api:?}");
        Ok(())
    }

    #[test]
    fn default_key() -> anyhow::Result<()> {
        assert_eq!(Api::lookup(None)?, Api::TextToSpeech);
        assert_eq!(Api::lookup(None)?.key(), Api::DEFAULT_KEY);
        assert_eq!(
            Api::keys(),
            vec!["grafeas", "phishingprotection", "texttospeech"]
        );
        Ok(())
    }

    #[test]
    fn unknown_api() {
        let error = Api::lookup(Some("speech")).unwrap_err();
        assert!(error.is_unknown_api(), "{error:?}");
        assert!(error.to_string().contains("texttospeech"), "{error}");
    }

    #[test]
    fn text_to_speech() {
        let table = Api::TextToSpeech.method_table();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.fields("synthesize_speech"),
            Some(&["input".to_string(), "voice".to_string(), "audio_config".to_string()][..])
        );
        assert_eq!(
            table.fields("list_voices"),
            Some(&["language_code".to_string()][..])
        );
        assert_eq!(table.fields("synthesize"), None);
    }

    #[test_case(Api::TextToSpeech)]
    #[test_case(Api::PhishingProtection)]
    #[test_case(Api::Grafeas)]
    fn builtin_tables_are_valid(api: Api) {
        let table = api.method_table();
        assert!(table.validate().is_ok(), "{api:?} {table:?}");
    }

    #[test_case("name", true)]
    #[test_case("_private", true)]
    #[test_case("page_size2", true)]
    #[test_case("café", true)]
    #[test_case("", false)]
    #[test_case("2fa", false)]
    #[test_case("it's", false)]
    #[test_case("a-b", false)]
    fn identifiers(name: &str, want: bool) {
        assert_eq!(is_identifier(name), want, "{name}");
    }

    #[test]
    fn control_params() {
        assert!(is_control("retry"));
        assert!(is_control("timeout"));
        assert!(is_control("metadata"));
        assert!(!is_control("request"));
        assert!(!is_control("retries"));
    }

    #[test]
    fn parse_json() -> anyhow::Result<()> {
        let table = MethodTable::parse_json(
            r#"{"methods": {"list_secrets": ["parent", "filter"], "get_secret": ["name"]}}"#,
        )
        .map_err(|e| anyhow::anyhow!("{e}"))?;
        let want = MethodTable::new()
            .with_method("get_secret", ["name"])
            .with_method("list_secrets", ["parent", "filter"]);
        assert_eq!(table, want);
        assert_eq!(table.methods().collect::<Vec<_>>(), vec!["get_secret", "list_secrets"]);
        Ok(())
    }

    #[test_case(r#"{"methods": {"get": ["request"]}}"#; "reserved request")]
    #[test_case(r#"{"methods": {"get": ["name", "timeout"]}}"#; "reserved control")]
    #[test_case(r#"{"methods": {"get": ["name", "name"]}}"#; "repeated")]
    #[test_case(r#"{"methods": {"get": [""]}}"#; "empty")]
    #[test_case(r#"{"methods": {"get": ["it's"]}}"#; "quote")]
    #[test_case(r#"{"methods": {"get": ["page size"]}}"#; "space")]
    #[test_case(r#"{"methods": {"get": ["2fa"]}}"#; "leading digit")]
    #[test_case(r#"{"methods": {"get": "name"}}"#; "not a list")]
    #[test_case(r#"{"methods": {}, "control": []}"#; "unknown field")]
    #[test_case(r#"{"methods": "#; "truncated")]
    fn parse_json_error(input: &str) {
        let got = MethodTable::parse_json(input);
        assert!(got.is_err(), "{got:?}");
    }

    #[test]
    fn from_json() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("methods.json");
        std::fs::write(&path, r#"{"methods": {"report_phishing": ["parent", "uri"]}}"#)?;
        let table = MethodTable::from_json(&path)?;
        assert_eq!(table, Api::PhishingProtection.method_table());

        std::fs::write(&path, r#"{"methods": {"get": ["request"]}}"#)?;
        let error = MethodTable::from_json(&path).unwrap_err();
        assert!(error.is_method_table(), "{error:?}");
        assert_eq!(error.path(), Some(path.as_path()));

        let error = MethodTable::from_json(dir.path().join("missing.json")).unwrap_err();
        assert!(error.is_io(), "{error:?}");
        Ok(())
    }
}
