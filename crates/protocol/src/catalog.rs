use crate::error::{ProtocolError, Result};
use crate::tool::{ToolDefinition, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCatalogEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub input_schema: Value,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ToolCatalogEntry {
    fn into_definition(self) -> ToolDefinition<ToolSpec> {
        ToolDefinition::new(
            self.name,
            ToolSpec::new(self.description).with_input_schema(self.input_schema),
        )
        .with_keywords(self.keywords)
    }
}

/// A list of tools loaded from a JSON or TOML document.
///
/// ```toml
/// [[tools]]
/// name = "getWeather"
/// description = "Current weather for a city"
/// keywords = ["forecast"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCatalog {
    #[serde(default)]
    pub tools: Vec<ToolCatalogEntry>,
}

impl ToolCatalog {
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|err| match err {
            ProtocolError::ParseError(msg) => {
                ProtocolError::ParseError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = parse_json_or_toml(bytes)?;
        let catalog: Self = serde_json::from_value(value)
            .map_err(|err| ProtocolError::ParseError(err.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.tools {
            if entry.name.trim().is_empty() {
                return Err(ProtocolError::InvalidCatalog(
                    "tool name must not be empty".to_string(),
                ));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ProtocolError::InvalidCatalog(format!(
                    "duplicate tool name '{}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    #[must_use]
    pub fn into_definitions(self) -> Vec<ToolDefinition<ToolSpec>> {
        self.tools
            .into_iter()
            .map(ToolCatalogEntry::into_definition)
            .collect()
    }
}

/// Parses a document as JSON, falling back to TOML.
pub fn parse_json_or_toml(bytes: &[u8]) -> Result<Value> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes)
                .map_err(|err| ProtocolError::ParseError(format!("{json_err}; {err}")))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                ProtocolError::ParseError(format!(
                    "not JSON ({json_err}); TOML parse error: {toml_err}"
                ))
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| ProtocolError::ParseError(format!("TOML conversion failed: {err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::Capability;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn loads_json_catalog() {
        let raw = br#"{"tools":[
            {"name":"getWeather","description":"Weather for a city","keywords":["forecast"],
             "input_schema":{"type":"object"}},
            {"name":"getNews","description":"Latest headlines"}
        ]}"#;
        let catalog = ToolCatalog::from_bytes(raw).unwrap();
        assert_eq!(catalog.len(), 2);

        let defs = catalog.into_definitions();
        assert_eq!(defs[0].name, "getWeather");
        assert_eq!(defs[0].keywords, vec!["forecast".to_string()]);
        assert_eq!(
            defs[0].capability.input_schema(),
            Some(&json!({"type": "object"}))
        );
        assert!(defs[1].capability.input_schema().is_none());
        assert!(defs[1].keywords.is_empty());
    }

    #[test]
    fn loads_toml_catalog() {
        let raw = br#"
[[tools]]
name = "sendEmail"
description = "Send an email"
keywords = ["mail", "smtp"]

[tools.input_schema]
type = "object"
"#;
        let catalog = ToolCatalog::from_bytes(raw).unwrap();
        let defs = catalog.into_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].description(), "Send an email");
        assert_eq!(
            defs[0].input_schema(),
            Some(&json!({"type": "object"}))
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let raw = br#"{"tools":[
            {"name":"a","description":"one"},
            {"name":"a","description":"two"}
        ]}"#;
        let err = ToolCatalog::from_bytes(raw).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidCatalog(_)), "{err}");
    }

    #[test]
    fn rejects_blank_names() {
        let raw = br#"{"tools":[{"name":"  ","description":"one"}]}"#;
        assert!(ToolCatalog::from_bytes(raw).is_err());
    }

    #[test]
    fn reports_garbage_as_parse_error() {
        let err = ToolCatalog::from_bytes(b"tools = [").unwrap_err();
        assert!(matches!(err, ProtocolError::ParseError(_)), "{err}");
    }

    #[test]
    fn reads_catalog_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        std::fs::write(&path, r#"{"tools":[{"name":"x","description":"y"}]}"#).unwrap();
        let catalog = ToolCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.tools[0].name, "x");
    }
}
