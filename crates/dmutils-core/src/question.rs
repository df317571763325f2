//! Question content definitions
//!
//! A question describes one form field (or a group of fields) of a
//! framework application: its type, whether an answer is optional, and the
//! ordered list of named validation rules its answers must pass.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::form::{convert_to_boolean, convert_to_number, FormData, FormValues};

/// Message returned when a validation key has no message in the content
pub const DEFAULT_ERROR_MESSAGE: &str = "There was a problem with the answer to this question";

/// The input type of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Document upload
    Upload,
    /// Single line text
    Text,
    /// Multi-line text
    TextboxLarge,
    /// List of short text items
    List,
    /// Price tuple of minimum, maximum, unit and interval
    #[serde(alias = "price")]
    Pricing,
    /// Yes / no answer
    Boolean,
    /// Single choice
    Radios,
    /// Multiple choice
    Checkboxes,
    /// Numeric percentage
    Percentage,
    /// Container for nested questions
    Multiquestion,
    /// Any type this crate does not interpret
    #[serde(other)]
    Other,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Upload => write!(f, "upload"),
            QuestionType::Text => write!(f, "text"),
            QuestionType::TextboxLarge => write!(f, "textbox_large"),
            QuestionType::List => write!(f, "list"),
            QuestionType::Pricing => write!(f, "pricing"),
            QuestionType::Boolean => write!(f, "boolean"),
            QuestionType::Radios => write!(f, "radios"),
            QuestionType::Checkboxes => write!(f, "checkboxes"),
            QuestionType::Percentage => write!(f, "percentage"),
            QuestionType::Multiquestion => write!(f, "multiquestion"),
            QuestionType::Other => write!(f, "other"),
        }
    }
}

/// A named validation rule declared on a question, with its failure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSpec {
    /// Rule name, resolved against the validator's rule registry
    pub name: String,
    /// User-facing message shown when the rule fails
    pub message: String,
    /// Form field the message applies to, for multi-field questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationSpec {
    /// Create a validation spec
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            field: None,
        }
    }
}

/// Condition under which a question is shown: the service value at `on`
/// must be one of `being`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub on: String,
    pub being: Vec<serde_json::Value>,
}

/// Content of a single question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionContent {
    /// Question identifier, also the key of its answer
    #[serde(default)]
    pub id: String,

    /// Question text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Short name used in summaries instead of the question text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Whether an empty answer is acceptable
    #[serde(default)]
    pub optional: bool,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,

    /// Validation rules in evaluation order
    #[serde(default)]
    pub validations: Vec<ValidationSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<Dependency>,

    /// Nested questions of a multiquestion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionContent>,

    /// Form fields of a multi-field question (e.g. pricing), keyed by role
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,

    /// Roles in `fields` that may be left empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_fields: Vec<String>,

    /// Assurance scheme; answers are then stored with an assurance level
    #[serde(
        rename = "assuranceApproach",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub assurance_approach: Option<String>,

    /// Position of the question within its manifest, starting at 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
}

impl QuestionContent {
    /// Create a question with the given id and no validations
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the question type
    pub fn with_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    /// Mark the question as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Append a validation rule
    pub fn with_validation(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.validations.push(ValidationSpec::new(name, message));
        self
    }

    /// Whether this is an upload question
    pub fn is_upload(&self) -> bool {
        self.question_type == Some(QuestionType::Upload)
    }

    /// Label used in summaries and error listings
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.question.as_deref())
            .unwrap_or(&self.id)
    }

    /// Find the question that owns a form field
    ///
    /// Matches this question's id, any of its form fields, or the id of a
    /// nested question.
    pub fn get_question(&self, field_name: &str) -> Option<&QuestionContent> {
        if self.fields.values().any(|f| f == field_name) || self.id == field_name {
            return Some(self);
        }
        self.questions.iter().find(|q| q.id == field_name)
    }

    /// Look up the message for a validation key
    ///
    /// Falls back to [`DEFAULT_ERROR_MESSAGE`] when no validation of that
    /// name applies to the field.
    pub fn get_error_message(&self, message_key: &str, field_name: Option<&str>) -> String {
        let field_name = field_name.unwrap_or(&self.id);
        self.get_question(field_name)
            .and_then(|question| {
                question.validations.iter().find(|v| {
                    v.name == message_key
                        && v.field.as_deref().unwrap_or(field_name) == field_name
                })
            })
            .map(|v| v.message.clone())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
    }

    /// Form fields this question submits
    pub fn form_fields(&self) -> Vec<String> {
        if !self.fields.is_empty() {
            let mut fields: Vec<String> = self.fields.values().cloned().collect();
            fields.sort();
            fields
        } else if !self.questions.is_empty() {
            self.questions.iter().flat_map(|q| q.form_fields()).collect()
        } else {
            vec![self.id.clone()]
        }
    }

    /// Form fields that must be answered
    pub fn required_form_fields(&self) -> Vec<String> {
        let optional = self.optional_form_fields();
        self.form_fields()
            .into_iter()
            .filter(|field| !optional.contains(field))
            .collect()
    }

    /// Form fields that may be left empty
    pub fn optional_form_fields(&self) -> Vec<String> {
        if self.optional {
            self.form_fields()
        } else if !self.optional_fields.is_empty() {
            self.optional_fields
                .iter()
                .filter_map(|role| self.fields.get(role).cloned())
                .collect()
        } else {
            self.questions
                .iter()
                .flat_map(|q| q.optional_form_fields())
                .collect()
        }
    }

    pub fn has_assurance(&self) -> bool {
        self.assurance_approach
            .as_deref()
            .map_or(false, |approach| !approach.is_empty())
    }

    /// Extract this question's answers from a submitted form
    ///
    /// Multi-field questions copy each of their fields that was posted, and
    /// multiquestions merge the data of their nested questions. Fields that
    /// were not posted are left out, except that list questions answer an
    /// empty list. Uploads never contribute form data.
    pub fn get_data(&self, form: &FormData) -> FormValues {
        if !self.fields.is_empty() {
            self.fields
                .values()
                .filter_map(|field| form.get(field).map(|value| (field.clone(), Value::from(value))))
                .collect()
        } else if !self.questions.is_empty() {
            self.questions.iter().flat_map(|q| q.get_data(form)).collect()
        } else {
            self.single_question_data(form)
        }
    }

    fn is_list(&self) -> bool {
        matches!(
            self.question_type,
            Some(QuestionType::List) | Some(QuestionType::Checkboxes)
        )
    }

    fn single_question_data(&self, form: &FormData) -> FormValues {
        let assurance_key = format!("{}--assurance", self.id);
        let mut data = FormValues::new();

        if !form.contains(&self.id) {
            if self.has_assurance() && form.contains(&assurance_key) {
                data.insert(
                    self.id.clone(),
                    json!({ "assurance": form.get(&assurance_key) }),
                );
            } else if self.is_list() {
                data.insert(self.id.clone(), Value::Array(Vec::new()));
            }
            return data;
        }

        let first = form.get(&self.id).unwrap_or_default();
        let value = if self.id == "serviceTypes" || self.is_list() {
            Value::from(form.get_list(&self.id).to_vec())
        } else {
            match self.question_type {
                Some(QuestionType::Boolean) => convert_to_boolean(first),
                Some(QuestionType::Percentage) => convert_to_number(first),
                Some(QuestionType::Upload) => return data,
                _ => Value::from(first),
            }
        };

        let value = if self.has_assurance() {
            json!({ "value": value, "assurance": form.get(&assurance_key) })
        } else {
            value
        };
        data.insert(self.id.clone(), value);
        data
    }

    /// Ids of this question (or its nested questions), optionally filtered by type
    pub fn get_question_ids(&self, question_type: Option<QuestionType>) -> Vec<String> {
        let matches = |q: &QuestionContent| match question_type {
            None => true,
            Some(t) => q.question_type == Some(t),
        };

        if !self.questions.is_empty() {
            self.questions
                .iter()
                .filter(|q| matches(q))
                .map(|q| q.id.clone())
                .collect()
        } else if matches(self) {
            vec![self.id.clone()]
        } else {
            Vec::new()
        }
    }

    /// Names of the declared validation rules, in order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.validations.iter().map(|v| v.name.as_str())
    }
}
