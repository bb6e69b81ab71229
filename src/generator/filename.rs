// Output filename templates
//
// `{{ lower_name }}_{{ kind }}.go` style placeholders, resolved per struct.

use super::AccessorKind;
use crate::error::{GodError, Result};
use crate::model::Struct;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*\.?([A-Za-z_]+)\s*\}\}").unwrap());

const KNOWN_KEYS: &[&str] = &["name", "lower_name", "short_name", "kind"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    template: String,
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            template: Self::DEFAULT.to_string(),
        }
    }
}

impl FilenameTemplate {
    pub const DEFAULT: &'static str = "{{ lower_name }}_{{ kind }}.go";

    /// Validate placeholders up front so a bad template fails before any
    /// code is rendered.
    pub fn parse(template: &str) -> Result<Self> {
        let error = |reason: String| GodError::Template {
            template: template.to_string(),
            reason,
        };

        if template.trim().is_empty() {
            return Err(error("template is empty".to_string()));
        }
        for caps in PLACEHOLDER_RE.captures_iter(template) {
            let key = &caps[1];
            if !KNOWN_KEYS.contains(&key) {
                return Err(error(format!(
                    "unknown placeholder {:?}, expected one of {}",
                    key,
                    KNOWN_KEYS.join(", ")
                )));
            }
        }
        let rest = PLACEHOLDER_RE.replace_all(template, "");
        if rest.contains("{{") || rest.contains("}}") {
            return Err(error("unbalanced braces".to_string()));
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Whether the template contains the `key` placeholder.
    pub fn uses(&self, key: &str) -> bool {
        PLACEHOLDER_RE
            .captures_iter(&self.template)
            .any(|caps| &caps[1] == key)
    }

    pub fn render(&self, s: &Struct, kind: AccessorKind) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.template, |caps: &Captures| match &caps[1] {
                "name" => s.name.clone(),
                "lower_name" => s.lower_name.clone(),
                "short_name" => s.short_name.clone(),
                "kind" => kind.as_str().to_string(),
                // parse() rejects anything else
                other => other.to_string(),
            })
            .into_owned()
    }
}
