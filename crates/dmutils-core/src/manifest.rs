//! Content manifests
//!
//! A manifest is an ordered set of sections, each made up of one or more
//! questions. Questions are numbered sequentially across the whole manifest.
//!
//! ```rust,ignore
//! let manifest = ContentManifest::from_yaml_file("manifests/edit_submission.yml")?;
//! let section = manifest.get_section("about-your-service");
//! let question = manifest.get_question("serviceName");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ContentError, Result};
use crate::form::{FormData, FormValues};
use crate::provider::ContentProvider;
use crate::question::{Dependency, QuestionContent, QuestionType};
use crate::service::ServiceRecord;

/// A named group of questions edited together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    /// Section identifier, derived from the name when not given
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub edit_questions: bool,
    #[serde(default)]
    pub questions: Vec<QuestionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_page_description: Option<String>,
}

/// Error message resolved for a single field, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorMessage {
    /// Form field that received the error
    pub input_name: String,
    /// Label of the question owning the field
    pub question: String,
    pub message: String,
}

impl ContentSection {
    /// Create a section; the slug is derived from the name
    pub fn new(name: impl Into<String>, questions: Vec<QuestionContent>) -> Self {
        let name = name.into();
        Self {
            slug: make_slug(&name),
            name,
            questions,
            ..Default::default()
        }
    }

    /// Section identifier
    pub fn id(&self) -> &str {
        &self.slug
    }

    /// Form field names this section submits
    pub fn get_field_names(&self) -> Vec<String> {
        self.questions.iter().flat_map(|q| q.form_fields()).collect()
    }

    /// Question ids in this section, optionally filtered by type
    pub fn get_question_ids(&self, question_type: Option<QuestionType>) -> Vec<String> {
        self.questions
            .iter()
            .flat_map(|q| q.get_question_ids(question_type))
            .collect()
    }

    /// Extract this section's answers from a submitted form
    ///
    /// Values are trimmed first. Posted fields no question in the section
    /// owns are dropped.
    pub fn get_data(&self, form: &FormData) -> FormValues {
        let form = form.stripped();
        self.questions.iter().flat_map(|q| q.get_data(&form)).collect()
    }

    /// Whether saving `update` would change the service
    ///
    /// True when any updated value differs from the stored one, or when a
    /// field of this section has never been stored, so that the data API
    /// gets the chance to report it as missing.
    pub fn has_changes_to_save(&self, service: &ServiceRecord, update: &FormValues) -> bool {
        update
            .iter()
            .any(|(key, value)| service.get(key) != Some(value))
            || self
                .get_field_names()
                .iter()
                .any(|field| !service.contains(field))
    }

    /// Unpack stored `{"value", "assurance"}` answers into form fields
    ///
    /// `{"field": {"value": v, "assurance": a}}` becomes
    /// `{"field": v, "field--assurance": a}`. Other fields are copied.
    pub fn unformat_data(&self, data: &Map<String, Value>) -> FormValues {
        let mut result = FormValues::new();
        for (key, value) in data {
            let has_assurance = self.get_question(key).map_or(false, |q| q.has_assurance());
            match value {
                Value::Object(answer) if has_assurance => {
                    result.insert(
                        format!("{}--assurance", key),
                        answer.get("assurance").cloned().unwrap_or(Value::Null),
                    );
                    result.insert(
                        key.clone(),
                        answer.get("value").cloned().unwrap_or(Value::Null),
                    );
                }
                _ => {
                    result.insert(key.clone(), value.clone());
                }
            }
        }
        result
    }

    pub fn get_question_by_slug(&self, question_slug: &str) -> Option<&QuestionContent> {
        self.questions
            .iter()
            .find(|q| q.slug.as_deref() == Some(question_slug))
    }

    /// A single multiquestion presented as its own section
    pub fn get_question_as_section(&self, question_slug: &str) -> Option<ContentSection> {
        let question = self.get_question_by_slug(question_slug)?;
        Some(ContentSection {
            slug: question_slug.to_string(),
            name: question.label().to_string(),
            editable: self.edit_questions,
            edit_questions: false,
            questions: question.questions.clone(),
            description: question.hint.clone(),
            summary_page_description: None,
        })
    }

    /// Convert error keys returned by the data API into display messages
    ///
    /// `errors` maps form field names to validation keys. Fails with
    /// [`ContentError::QuestionNotFound`] for a field no question owns.
    pub fn get_error_messages(
        &self,
        errors: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, FieldErrorMessage>> {
        let mut messages = BTreeMap::new();
        for (field_name, message_key) in errors {
            let question = self
                .get_question(field_name)
                .ok_or_else(|| ContentError::QuestionNotFound(field_name.clone()))?;

            let mut error_key = question.id.clone();
            if message_key == "assurance_required" {
                error_key = format!("{}--assurance", error_key);
            }

            messages.insert(
                error_key,
                FieldErrorMessage {
                    input_name: field_name.clone(),
                    question: question.label().to_string(),
                    message: question.get_error_message(message_key, Some(field_name)),
                },
            );
        }
        Ok(messages)
    }
}

impl ContentProvider for ContentSection {
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent> {
        self.questions
            .iter()
            .find_map(|question| question.get_question(question_id))
    }
}

/// An ordered set of sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentManifest {
    sections: Vec<ContentSection>,
}

impl ContentManifest {
    /// Build a manifest, filling missing slugs and numbering questions
    pub fn from_sections(sections: Vec<ContentSection>) -> Self {
        let mut sections = sections;
        let mut number = 0;
        for section in &mut sections {
            if section.slug.is_empty() {
                section.slug = make_slug(&section.name);
            }
            for question in &mut section.questions {
                number += 1;
                question.number = Some(number);
            }
        }
        Self { sections }
    }

    /// Parse a manifest with inline question content
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let sections: Vec<ContentSection> = serde_yaml::from_str(yaml)?;
        Ok(Self::from_sections(sections))
    }

    /// Read a manifest with inline question content from disk
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ContentError::not_found(format!("No manifest at {}", path.display()))
            } else {
                ContentError::Io(e)
            }
        })?;
        let sections: Vec<ContentSection> =
            serde_yaml::from_str(&yaml).map_err(|e| ContentError::parse_error(path, e))?;

        tracing::info!(
            path = %path.display(),
            sections = sections.len(),
            "Loaded content manifest"
        );
        Ok(Self::from_sections(sections))
    }

    pub fn sections(&self) -> &[ContentSection] {
        &self.sections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentSection> {
        self.sections.iter()
    }

    /// Return a section by id
    pub fn get_section(&self, section_id: &str) -> Option<&ContentSection> {
        self.sections.iter().find(|s| s.slug == section_id)
    }

    /// All top-level questions, in manifest order
    pub fn questions(&self) -> impl Iterator<Item = &QuestionContent> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Extract the answers of every section from a submitted form
    pub fn get_all_data(&self, form: &FormData) -> FormValues {
        self.sections.iter().flat_map(|s| s.get_data(form)).collect()
    }

    pub fn get_question_by_slug(&self, question_slug: &str) -> Option<&QuestionContent> {
        self.sections
            .iter()
            .find_map(|section| section.get_question_by_slug(question_slug))
    }

    /// Id of the section following `section_id` (or the first section)
    pub fn get_next_section_id(&self, section_id: Option<&str>, only_editable: bool) -> Option<&str> {
        let mut previous_section_is_current = section_id.is_none();

        for section in &self.sections {
            if previous_section_is_current && (!only_editable || section.editable) {
                return Some(&section.slug);
            }
            if Some(section.slug.as_str()) == section_id {
                previous_section_is_current = true;
            }
        }
        None
    }

    pub fn get_next_editable_section_id(&self, section_id: Option<&str>) -> Option<&str> {
        self.get_next_section_id(section_id, true)
    }

    /// Keep only the questions whose dependencies are met by the service
    ///
    /// Sections left without questions are dropped and the remaining
    /// questions are renumbered.
    pub fn filter(&self, service: &ServiceRecord) -> ContentManifest {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let questions: Vec<QuestionContent> = section
                    .questions
                    .iter()
                    .filter(|q| question_should_be_shown(&q.depends, service))
                    .cloned()
                    .collect();
                if questions.is_empty() {
                    None
                } else {
                    Some(ContentSection {
                        questions,
                        ..section.clone()
                    })
                }
            })
            .collect();

        ContentManifest::from_sections(sections)
    }
}

impl ContentProvider for ContentManifest {
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent> {
        self.sections
            .iter()
            .find_map(|section| section.get_question(question_id))
    }
}

impl<'a> IntoIterator for &'a ContentManifest {
    type Item = &'a ContentSection;
    type IntoIter = std::slice::Iter<'a, ContentSection>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

fn question_should_be_shown(dependencies: &[Dependency], service: &ServiceRecord) -> bool {
    dependencies.iter().all(|depends| {
        service
            .get(&depends.on)
            .map_or(false, |value| depends.being.contains(value))
    })
}

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("valid regex"));

/// Run of capitals followed by a capitalised word, e.g. "SFIARate"
static ACRONYM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

static CAMEL_CASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// Derive a section slug from its display name
///
/// Whitespace becomes a separator, camel case is split, and the result is
/// lower-cased and dash-separated: "About your Service" -> "about-your-service".
pub fn make_slug(name: &str) -> String {
    let underscored = WHITESPACE_REGEX.replace_all(name, "_");
    let underscored = ACRONYM_REGEX.replace_all(&underscored, "${1}_${2}");
    let underscored = CAMEL_CASE_REGEX.replace_all(&underscored, "${1}_${2}");

    underscored
        .replace('-', "_")
        .to_lowercase()
        .replace('_', "-")
}
