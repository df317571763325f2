//! The content provider seam
//!
//! The validator only needs one thing from content: the question schema for a
//! question id. Manifests, sections and plain maps all provide it.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ContentError, Result};
use crate::question::QuestionContent;

/// Supplies question content by question id
pub trait ContentProvider {
    /// Return the question that owns this id, if any
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent>;

    /// Like [`ContentProvider::get_question`] but fails with
    /// [`ContentError::QuestionNotFound`]
    fn require_question(&self, question_id: &str) -> Result<&QuestionContent> {
        self.get_question(question_id)
            .ok_or_else(|| ContentError::QuestionNotFound(question_id.to_string()))
    }
}

impl ContentProvider for HashMap<String, QuestionContent> {
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent> {
        self.get(question_id)
    }
}

impl ContentProvider for BTreeMap<String, QuestionContent> {
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent> {
        self.get(question_id)
    }
}

impl<T: ContentProvider + ?Sized> ContentProvider for &T {
    fn get_question(&self, question_id: &str) -> Option<&QuestionContent> {
        (**self).get_question(question_id)
    }
}
