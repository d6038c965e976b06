//! URL path templates with `{name}` placeholders

use vpnrest_domain::{RestError, Result};

/// Path with named placeholders, e.g. `/accounts/{account}/devices`
///
/// Substituted values are percent-encoded, so a value can never introduce
/// extra path segments or a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    substitutions: Vec<(String, String)>,
}

impl PathTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into(), substitutions: Vec::new() }
    }

    /// Provide the value for `{name}`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.push((name.into(), value.into()));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the path, failing on unknown or unterminated placeholders
    pub fn render(&self) -> Result<String> {
        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            let close = after_open.find('}').ok_or_else(|| {
                RestError::CreateRequest(format!("unterminated placeholder in '{}'", self.template))
            })?;

            let name = &after_open[..close];
            let value = self.value_of(name).ok_or_else(|| {
                RestError::CreateRequest(format!(
                    "missing substitution for '{{{name}}}' in '{}'",
                    self.template
                ))
            })?;
            rendered.push_str(&urlencoding::encode(value));
            rest = &after_open[close + 1..];
        }

        rendered.push_str(rest);
        Ok(rendered)
    }

    fn value_of(&self, name: &str) -> Option<&str> {
        self.substitutions.iter().rev().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

impl From<&str> for PathTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}
