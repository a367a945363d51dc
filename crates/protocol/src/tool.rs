use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque payload attached to a tool.
///
/// Only the description and the input schema take part in indexing; the
/// rest of the implementing type (executors, handles, metadata) is carried
/// around untouched.
pub trait Capability: Send + Sync + 'static {
    fn description(&self) -> &str;

    fn input_schema(&self) -> Option<&Value> {
        None
    }
}

/// Plain serializable capability used by catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub description: String,
    #[serde(default)]
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            input_schema: Value::Null,
        }
    }

    #[must_use]
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }
}

impl Capability for ToolSpec {
    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Option<&Value> {
        if self.input_schema.is_null() {
            None
        } else {
            Some(&self.input_schema)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition<C> {
    pub name: String,
    pub capability: C,
    pub keywords: Vec<String>,
}

impl<C: Capability> ToolDefinition<C> {
    pub fn new(name: impl Into<String>, capability: C) -> Self {
        Self {
            name: name.into(),
            capability,
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(&self) -> &str {
        self.capability.description()
    }

    pub fn input_schema(&self) -> Option<&Value> {
        self.capability.input_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_schema_reads_as_absent() {
        let spec = ToolSpec::new("Get the weather");
        assert!(spec.input_schema().is_none());

        let spec = spec.with_input_schema(json!({"type": "object"}));
        assert_eq!(spec.input_schema(), Some(&json!({"type": "object"})));
    }

    #[test]
    fn definition_exposes_capability_fields() {
        let def = ToolDefinition::new("getWeather", ToolSpec::new("Current weather"))
            .with_keywords(["forecast", "temperature"]);
        assert_eq!(def.description(), "Current weather");
        assert_eq!(def.keywords, vec!["forecast", "temperature"]);
    }
}
