use std::collections::HashMap;

use crate::DocentError;

/// Minimal `{{variable}}` prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Whether the template references the given variable.
    pub fn references(&self, key: &str) -> bool {
        self.scan_keys().any(|k| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.template.trim().is_empty()
    }

    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, DocentError> {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_start = &rest[start + 2..];
            if let Some(end) = after_start.find("}}") {
                let key = after_start[..end].trim();
                let value = values.get(key).ok_or_else(|| {
                    DocentError::Config(format!("prompt template missing variable: {key}"))
                })?;
                output.push_str(value);
                rest = &after_start[end + 2..];
            } else {
                output.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }

        output.push_str(rest);
        Ok(output)
    }

    fn scan_keys(&self) -> impl Iterator<Item = &str> {
        let mut rest = self.template.as_str();
        std::iter::from_fn(move || {
            let start = rest.find("{{")?;
            let after = &rest[start + 2..];
            let end = after.find("}}")?;
            let key = after[..end].trim();
            rest = &after[end + 2..];
            Some(key)
        })
    }
}
