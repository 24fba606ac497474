//! Home-directory and environment-variable expansion in string leaves

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Expands `~` and `$VAR` / `${VAR}` references.
///
/// Expansion is textual only; nothing is checked against the filesystem.
/// Unknown variables are left as written.
#[derive(Debug, Clone, Default)]
pub struct PathExpander {
    home: Option<PathBuf>,
    /// `None` reads the process environment
    vars: Option<HashMap<String, String>>,
}

impl PathExpander {
    /// Expand against the real home directory and process environment.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
            vars: None,
        }
    }

    /// Fixed home directory and variable table, for deterministic results.
    pub fn fixed(home: impl Into<PathBuf>, vars: HashMap<String, String>) -> Self {
        Self {
            home: Some(home.into()),
            vars: Some(vars),
        }
    }

    /// Expand nothing. Strings pass through unchanged apart from `~`
    /// which stays literal because no home directory is known.
    pub fn disabled() -> Self {
        Self {
            home: None,
            vars: Some(HashMap::new()),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match &self.vars {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Expand one string.
    pub fn expand<'a>(&self, input: &'a str) -> Cow<'a, str> {
        shellexpand::full_with_context_no_errors(
            input,
            || self.home.as_deref().and_then(Path::to_str),
            |name| self.lookup(name),
        )
    }

    /// Expand every string leaf of a document in place, including strings
    /// inside sequences.
    pub fn expand_document(&self, document: &mut Map<String, Value>) {
        for value in document.values_mut() {
            self.expand_value(value);
        }
    }

    fn expand_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                let expanded = match self.expand(s) {
                    Cow::Borrowed(_) => return,
                    Cow::Owned(expanded) => expanded,
                };
                *s = expanded;
            }
            Value::Array(items) => items.iter_mut().for_each(|item| self.expand_value(item)),
            Value::Object(map) => self.expand_document(map),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn expander() -> PathExpander {
        let vars = HashMap::from([
            ("XDG_DATA_HOME".to_string(), "/home/pi/.local/share".to_string()),
            ("ROMS".to_string(), "/roms".to_string()),
        ]);
        PathExpander::fixed("/home/pi", vars)
    }

    #[rstest]
    #[case("~/.game_manager/data", "/home/pi/.game_manager/data")]
    #[case("~", "/home/pi")]
    #[case("$ROMS/gba", "/roms/gba")]
    #[case("${XDG_DATA_HOME}/sbc", "/home/pi/.local/share/sbc")]
    #[case("plain value", "plain value")]
    #[case("/abs/path~", "/abs/path~")]
    fn expands_known_references(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expander().expand(input), expected);
    }

    #[test]
    fn tilde_stays_literal_without_home() {
        assert_eq!(PathExpander::disabled().expand("~/saves"), "~/saves");
    }

    #[test]
    fn unknown_variables_stay_verbatim() {
        assert_eq!(expander().expand("$NOT_SET/x"), "$NOT_SET/x");
    }

    #[test]
    fn expand_document_walks_nested_strings_and_sequences() {
        let mut doc = match json!({
            "paths": {"data": "~/data", "extra": ["$ROMS", 3]},
            "display": {"fps": 60}
        }) {
            Value::Object(m) => m,
            _ => unreachable!("fixture is an object"),
        };

        expander().expand_document(&mut doc);

        assert_eq!(
            Value::Object(doc),
            json!({
                "paths": {"data": "/home/pi/data", "extra": ["/roms", 3]},
                "display": {"fps": 60}
            })
        );
    }
}
