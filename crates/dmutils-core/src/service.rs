//! Previously stored service records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A service as previously persisted by the data API
///
/// Read-only view over the stored JSON object. Holds at least `id` and
/// `supplierId`, plus any answers already saved for the service, such as the
/// URLs of uploaded documents keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRecord(Map<String, Value>);

impl ServiceRecord {
    /// Create an empty service record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the record
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Whether the service has a stored value for this key
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Service id rendered for use in document paths
    pub fn id(&self) -> Option<String> {
        self.get("id").and_then(render_identifier)
    }

    /// Supplier id rendered for use in document paths
    pub fn supplier_id(&self) -> Option<String> {
        self.get("supplierId").and_then(render_identifier)
    }

    /// Underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ServiceRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Identifiers are stored as either numbers or strings
fn render_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifiers() {
        let service = ServiceRecord::new().with("id", 1).with("supplierId", "2");
        assert_eq!(service.id().as_deref(), Some("1"));
        assert_eq!(service.supplier_id().as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_identifier() {
        let service = ServiceRecord::new().with("id", json!(null));
        assert_eq!(service.id(), None);
        assert_eq!(service.supplier_id(), None);
    }

    #[test]
    fn test_deserialize_transparent() {
        let service: ServiceRecord = serde_json::from_str(
            r#"{"id": 1234, "supplierId": 5, "pricingDocumentURL": "https://assets/b.pdf"}"#,
        )
        .unwrap();
        assert!(service.contains("pricingDocumentURL"));
        assert!(!service.contains("serviceDefinitionDocumentURL"));
        assert_eq!(service.id().as_deref(), Some("1234"));
    }
}
