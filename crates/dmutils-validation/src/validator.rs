//! The answer validator
//!
//! Each posted answer is checked against the rules its question declares,
//! in order, stopping at the first rule that rejects it. Empty answers to
//! optional questions, and empty re-uploads of documents the service already
//! has, skip the rules entirely.

use dmutils_core::{ContentProvider, ServiceRecord};
use dmutils_documents::Uploader;

use crate::answer::{AnswerValue, PostedAnswer, PostedData};
use crate::error::Result;
use crate::outcome::{Accumulator, ValidationOutcome};
use crate::rules::{resolve_rules, Rule, RuleContext};

/// Validates posted answers for one service
///
/// The outcome of the last [`Validator::validate`] call stays available
/// through the accessors; each call starts from scratch.
pub struct Validator<'a> {
    content: &'a dyn ContentProvider,
    service: &'a ServiceRecord,
    documents_url: String,
    uploader: Option<&'a dyn Uploader>,
    file_suffix: Option<String>,
    outcome: ValidationOutcome,
}

impl<'a> Validator<'a> {
    /// Create a validator; `documents_url` is the base of stored document URLs
    pub fn new(
        content: &'a dyn ContentProvider,
        service: &'a ServiceRecord,
        documents_url: impl Into<String>,
    ) -> Self {
        Self {
            content,
            service,
            documents_url: documents_url.into(),
            uploader: None,
            file_suffix: None,
            outcome: ValidationOutcome::default(),
        }
    }

    /// Store uploads through this uploader
    pub fn with_uploader(mut self, uploader: &'a dyn Uploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Name stored documents with a fixed suffix instead of the upload time
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = Some(suffix.into());
        self
    }

    /// Validate every posted answer
    ///
    /// Uploads are read (and possibly stored) in place, which is why the
    /// answers are borrowed mutably.
    pub fn validate(&mut self, posted_data: &mut PostedData) -> Result<&ValidationOutcome> {
        let mut acc = Accumulator::new();

        for (question_id, answer) in posted_data.iter_mut() {
            let question = self.content.require_question(question_id)?;
            let ctx = RuleContext {
                question_id,
                question,
                service: self.service,
                documents_url: &self.documents_url,
                uploader: self.uploader,
                file_suffix: self.file_suffix.as_deref(),
            };

            if let Some(message) = question_errors(&ctx, &mut acc, answer)? {
                acc.record_error(question_id.as_str(), message);
            }
        }

        self.outcome = acc.finish();
        tracing::info!(
            questions = posted_data.len(),
            errors = self.outcome.errors.len(),
            "Validated posted answers"
        );
        Ok(&self.outcome)
    }

    pub fn errors(&self) -> &std::collections::BTreeMap<String, String> {
        &self.outcome.errors
    }

    pub fn clean_data(&self) -> &std::collections::BTreeMap<String, AnswerValue> {
        &self.outcome.clean_data
    }

    pub fn dirty_data(&self) -> &std::collections::BTreeMap<String, AnswerValue> {
        &self.outcome.dirty_data
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    /// Consume the validator, keeping the last outcome
    pub fn into_outcome(self) -> ValidationOutcome {
        self.outcome
    }
}

/// Whether an empty answer needs no further checks
fn skips_rules(ctx: &RuleContext<'_>) -> bool {
    ctx.question.optional || (ctx.question.is_upload() && ctx.service.contains(ctx.question_id))
}

/// Message of the first rule the answer fails, if any
fn question_errors(
    ctx: &RuleContext<'_>,
    acc: &mut Accumulator,
    answer: &mut PostedAnswer,
) -> Result<Option<String>> {
    if !Rule::AnswerRequired.apply(ctx, acc, answer)? && skips_rules(ctx) {
        if let PostedAnswer::Text(text) = answer {
            acc.set_clean(ctx.question_id, text.as_str());
        }
        tracing::debug!(question_id = ctx.question_id, "Empty answer accepted");
        return Ok(None);
    }

    for (rule, spec) in resolve_rules(ctx.question)? {
        if !rule.apply(ctx, acc, answer)? {
            acc.set_dirty(ctx.question_id, answer.to_value());
            tracing::debug!(
                question_id = ctx.question_id,
                rule = %rule,
                "Answer rejected"
            );
            return Ok(Some(spec.message.clone()));
        }
    }

    if !acc.has_clean(ctx.question_id) {
        acc.set_clean(ctx.question_id, answer.to_value());
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use dmutils_core::{ContentError, QuestionContent, QuestionType};
    use std::collections::BTreeMap;

    fn content(questions: Vec<QuestionContent>) -> BTreeMap<String, QuestionContent> {
        questions.into_iter().map(|q| (q.id.clone(), q)).collect()
    }

    #[test]
    fn test_missing_question_is_content_error() {
        let content = content(vec![]);
        let service = ServiceRecord::new();
        let mut validator = Validator::new(&content, &service, "https://assets.example.com");

        let mut posted = PostedData::new();
        posted.insert("q1".to_string(), PostedAnswer::text("value"));

        assert!(matches!(
            validator.validate(&mut posted),
            Err(ValidationError::Content(ContentError::QuestionNotFound(id))) if id == "q1"
        ));
    }

    #[test]
    fn test_unknown_rule_is_reported() {
        let content = content(vec![QuestionContent::new("q1").with_validation("no_such_rule", "x")]);
        let service = ServiceRecord::new();
        let mut validator = Validator::new(&content, &service, "https://assets.example.com");

        let mut posted = PostedData::new();
        posted.insert("q1".to_string(), PostedAnswer::text("value"));

        assert!(matches!(
            validator.validate(&mut posted),
            Err(ValidationError::UnknownRule(name)) if name == "no_such_rule"
        ));
    }

    #[test]
    fn test_each_run_starts_fresh() {
        let content = content(vec![QuestionContent::new("q1")
            .with_type(QuestionType::Text)
            .with_validation("answer_required", "required")]);
        let service = ServiceRecord::new();
        let mut validator = Validator::new(&content, &service, "https://assets.example.com");

        let mut posted = PostedData::new();
        posted.insert("q1".to_string(), PostedAnswer::text(""));
        validator.validate(&mut posted).unwrap();
        assert_eq!(validator.errors()["q1"], "required");
        assert_eq!(validator.dirty_data()["q1"], AnswerValue::from(""));

        posted.insert("q1".to_string(), PostedAnswer::text("answer"));
        validator.validate(&mut posted).unwrap();
        assert!(validator.errors().is_empty());
        assert!(validator.dirty_data().is_empty());
        assert_eq!(validator.clean_data()["q1"], AnswerValue::from("answer"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let content = content(vec![QuestionContent::new("q1")
            .with_type(QuestionType::Text)
            .with_validation("under_100_characters", "too many characters")
            .with_validation("under_50_words", "too many words")]);
        let service = ServiceRecord::new();
        let mut validator = Validator::new(&content, &service, "https://assets.example.com");

        let mut posted = PostedData::new();
        posted.insert("q1".to_string(), PostedAnswer::text("word ".repeat(60)));
        let outcome = validator.validate(&mut posted).unwrap();

        assert_eq!(outcome.errors["q1"], "too many characters");
        assert!(!outcome.clean_data.contains_key("q1"));
    }
}
