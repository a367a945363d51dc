use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fmt;
use toolscope_protocol::{Capability, ToolDefinition};

/// Hex SHA-256 over the indexed content of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprints the name, description, input schema and keyword set.
///
/// Keywords are sorted and de-duplicated first, so their order never
/// matters. The payload is a JSON object whose keys serialize sorted, which
/// keeps the digest stable across processes.
#[must_use]
pub fn fingerprint<C: Capability>(definition: &ToolDefinition<C>) -> Fingerprint {
    let mut keywords: Vec<&str> = definition.keywords.iter().map(String::as_str).collect();
    keywords.sort_unstable();
    keywords.dedup();

    let payload = json!({
        "name": definition.name,
        "description": definition.description(),
        "schema": definition.input_schema().cloned().unwrap_or(Value::Null),
        "keywords": keywords,
    });

    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    Fingerprint(hex)
}
