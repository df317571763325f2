//! Submitted form data
//!
//! Browsers post a form as an ordered list of `name=value` pairs in which a
//! name may repeat (checkboxes, list items). [`FormData`] keeps every value
//! per name; questions and sections extract typed answers from it.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Answers extracted from a form, keyed by form field
pub type FormValues = Map<String, Value>;

/// Multi-valued form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(BTreeMap<String, Vec<String>>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for `key`, after any values already posted for it
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Add a value, returning the form
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// First value posted for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value posted for `key`, in order
    pub fn get_list(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the form with every value trimmed of surrounding whitespace
    pub fn stripped(&self) -> FormData {
        FormData(
            self.0
                .iter()
                .map(|(key, values)| {
                    let values = values.iter().map(|v| v.trim().to_string()).collect();
                    (key.clone(), values)
                })
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (key, value) in iter {
            form.append(key, value);
        }
        form
    }
}

/// Interpret common yes/no spellings; anything else is kept as text
pub fn convert_to_boolean(value: &str) -> Value {
    match value.to_lowercase().as_str() {
        "t" | "true" | "on" | "yes" | "1" => Value::Bool(true),
        "f" | "false" | "off" | "no" | "0" => Value::Bool(false),
        _ => Value::String(value.to_string()),
    }
}

/// Float when the text has a decimal point, integer otherwise
///
/// Text that does not parse is kept as text.
pub fn convert_to_number(value: &str) -> Value {
    let trimmed = value.trim();
    let number = if value.contains('.') {
        trimmed.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        trimmed.parse::<i64>().ok().map(Number::from)
    };
    number
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}
