//! Results of a validation pass

use std::collections::BTreeMap;

use serde::Serialize;

use crate::answer::AnswerValue;

/// Errors, clean data and dirty data from one validation pass
///
/// All three maps are keyed by question id, or by the price keys
/// (`priceMin`, `priceMax`, `priceUnit`, `priceInterval`, `priceString`)
/// written by the price rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Message of the first failing rule per question
    pub errors: BTreeMap<String, String>,
    /// Values ready to be stored
    pub clean_data: BTreeMap<String, AnswerValue>,
    /// Raw values of rejected answers, for re-displaying the form
    pub dirty_data: BTreeMap<String, AnswerValue>,
}

impl ValidationOutcome {
    /// Whether no question has an error
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Collects rule side effects during a validation pass
#[derive(Debug, Default)]
pub struct Accumulator {
    outcome: ValidationOutcome,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clean(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.outcome.clean_data.insert(key.into(), value.into());
    }

    pub fn set_dirty(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.outcome.dirty_data.insert(key.into(), value.into());
    }

    pub fn record_error(&mut self, question_id: impl Into<String>, message: impl Into<String>) {
        self.outcome.errors.insert(question_id.into(), message.into());
    }

    pub fn has_clean(&self, key: &str) -> bool {
        self.outcome.clean_data.contains_key(key)
    }

    pub fn clean(&self, key: &str) -> Option<&AnswerValue> {
        self.outcome.clean_data.get(key)
    }

    pub fn dirty(&self, key: &str) -> Option<&AnswerValue> {
        self.outcome.dirty_data.get(key)
    }

    /// Finish the pass
    pub fn finish(self) -> ValidationOutcome {
        self.outcome
    }
}
