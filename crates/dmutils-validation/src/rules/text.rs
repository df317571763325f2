//! Length limits on text and list answers
//!
//! Uploads never satisfy these rules.

use super::{empty, within_word_limit, RuleContext};
use crate::answer::{AnswerValue, PostedAnswer};
use crate::outcome::Accumulator;

/// Text of at most 100 characters, or a list of at most 100 items
pub fn under_100_characters(answer: &PostedAnswer) -> bool {
    match answer {
        PostedAnswer::Text(text) => text.chars().count() <= 100,
        PostedAnswer::List(items) => items.len() <= 100,
        PostedAnswer::File(_) => false,
    }
}

pub fn under_50_words(answer: &PostedAnswer) -> bool {
    match answer {
        PostedAnswer::File(_) => false,
        _ => within_word_limit(&answer.items().join(" "), 50),
    }
}

pub fn items_under_10_words_each(answer: &PostedAnswer) -> bool {
    match answer {
        PostedAnswer::File(_) => false,
        _ => answer.items().iter().all(|item| within_word_limit(item, 10)),
    }
}

/// At most ten non-blank items
///
/// On success the list is stored without its blank items.
pub fn under_10_items(ctx: &RuleContext<'_>, acc: &mut Accumulator, answer: &PostedAnswer) -> bool {
    if let PostedAnswer::File(_) = answer {
        return false;
    }

    let items: Vec<String> = answer
        .items()
        .into_iter()
        .filter(|item| !empty(item))
        .map(str::to_string)
        .collect();

    if items.len() <= 10 {
        acc.set_clean(ctx.question_id, AnswerValue::List(items));
        true
    } else {
        false
    }
}
