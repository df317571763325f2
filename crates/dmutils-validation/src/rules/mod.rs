//! The validation rule registry
//!
//! Question content names its rules as strings. Every name resolves to a
//! [`Rule`] before any rule runs, so a typo in content is a configuration
//! error rather than a silently skipped check.

pub mod file;
pub mod price;
pub mod text;

use std::fmt;
use std::str::FromStr;

use dmutils_core::{QuestionContent, ServiceRecord, ValidationSpec};
use dmutils_documents::Uploader;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::answer::{AnswerValue, PostedAnswer};
use crate::error::{Result, ValidationError};
use crate::outcome::Accumulator;

/// Categories of validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Whether an answer was given at all
    Presence,
    /// Uploaded documents
    File,
    /// Price components
    Price,
    /// Length limits on text and lists
    Text,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Presence => write!(f, "presence"),
            RuleCategory::File => write!(f, "file"),
            RuleCategory::Price => write!(f, "price"),
            RuleCategory::Text => write!(f, "text"),
        }
    }
}

/// A named validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    AnswerRequired,
    FileHasBeenUploaded,
    FileCanBeSaved,
    FileIsLessThan5mb,
    FileIsOpenDocumentFormat,
    NoMinPriceSpecified,
    MinPriceNotANumber,
    MaxPriceNotANumber,
    MaxLessThanMin,
    NoUnitSpecified,
    PriceStringCanBeComposed,
    Under100Characters,
    Under50Words,
    ItemsUnder10WordsEach,
    Under10Items,
}

impl Rule {
    /// Every rule, in catalog order
    pub const ALL: [Rule; 15] = [
        Rule::AnswerRequired,
        Rule::FileHasBeenUploaded,
        Rule::FileCanBeSaved,
        Rule::FileIsLessThan5mb,
        Rule::FileIsOpenDocumentFormat,
        Rule::NoMinPriceSpecified,
        Rule::MinPriceNotANumber,
        Rule::MaxPriceNotANumber,
        Rule::MaxLessThanMin,
        Rule::NoUnitSpecified,
        Rule::PriceStringCanBeComposed,
        Rule::Under100Characters,
        Rule::Under50Words,
        Rule::ItemsUnder10WordsEach,
        Rule::Under10Items,
    ];

    /// Name used in question content
    pub fn name(&self) -> &'static str {
        match self {
            Rule::AnswerRequired => "answer_required",
            Rule::FileHasBeenUploaded => "file_has_been_uploaded",
            Rule::FileCanBeSaved => "file_can_be_saved",
            Rule::FileIsLessThan5mb => "file_is_less_than_5mb",
            Rule::FileIsOpenDocumentFormat => "file_is_open_document_format",
            Rule::NoMinPriceSpecified => "no_min_price_specified",
            Rule::MinPriceNotANumber => "min_price_not_a_number",
            Rule::MaxPriceNotANumber => "max_price_not_a_number",
            Rule::MaxLessThanMin => "max_less_than_min",
            Rule::NoUnitSpecified => "no_unit_specified",
            Rule::PriceStringCanBeComposed => "price_string_can_be_composed",
            Rule::Under100Characters => "under_100_characters",
            Rule::Under50Words => "under_50_words",
            Rule::ItemsUnder10WordsEach => "items_under_10_words_each",
            Rule::Under10Items => "under_10_items",
        }
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            Rule::AnswerRequired => RuleCategory::Presence,
            Rule::FileHasBeenUploaded
            | Rule::FileCanBeSaved
            | Rule::FileIsLessThan5mb
            | Rule::FileIsOpenDocumentFormat => RuleCategory::File,
            Rule::NoMinPriceSpecified
            | Rule::MinPriceNotANumber
            | Rule::MaxPriceNotANumber
            | Rule::MaxLessThanMin
            | Rule::NoUnitSpecified
            | Rule::PriceStringCanBeComposed => RuleCategory::Price,
            Rule::Under100Characters
            | Rule::Under50Words
            | Rule::ItemsUnder10WordsEach
            | Rule::Under10Items => RuleCategory::Text,
        }
    }

    /// Apply the rule to an answer
    ///
    /// `Ok(false)` means the answer is rejected. Errors are reserved for
    /// problems that make the rule impossible to evaluate, such as saving a
    /// file without an uploader.
    pub fn apply(
        self,
        ctx: &RuleContext<'_>,
        acc: &mut Accumulator,
        answer: &mut PostedAnswer,
    ) -> Result<bool> {
        let passed = match self {
            Rule::AnswerRequired => answer_required(ctx, acc, answer),
            Rule::FileHasBeenUploaded => file::file_has_been_uploaded(answer),
            Rule::FileCanBeSaved => file::file_can_be_saved(ctx, acc, answer)?,
            Rule::FileIsLessThan5mb => file::file_is_less_than_5mb(answer),
            Rule::FileIsOpenDocumentFormat => file::file_is_open_document_format(answer),
            Rule::NoMinPriceSpecified => price::no_min_price_specified(acc, answer),
            Rule::MinPriceNotANumber => price::min_price_not_a_number(acc, answer),
            Rule::MaxPriceNotANumber => price::max_price_not_a_number(acc, answer),
            Rule::MaxLessThanMin => price::max_less_than_min(answer),
            Rule::NoUnitSpecified => price::no_unit_specified(acc, answer),
            Rule::PriceStringCanBeComposed => price::price_string_can_be_composed(acc, answer),
            Rule::Under100Characters => text::under_100_characters(answer),
            Rule::Under50Words => text::under_50_words(answer),
            Rule::ItemsUnder10WordsEach => text::items_under_10_words_each(answer),
            Rule::Under10Items => text::under_10_items(ctx, acc, answer),
        };

        tracing::debug!(
            question_id = ctx.question_id,
            rule = self.name(),
            passed,
            "Applied validation rule"
        );
        Ok(passed)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Rule::ALL
            .iter()
            .copied()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| ValidationError::UnknownRule(s.to_string()))
    }
}

/// Everything a rule may consult besides the answer itself
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub question_id: &'a str,
    pub question: &'a QuestionContent,
    pub service: &'a ServiceRecord,
    pub documents_url: &'a str,
    pub uploader: Option<&'a dyn Uploader>,
    /// Fixed suffix for stored document names; the upload time when unset
    pub file_suffix: Option<&'a str>,
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("question_id", &self.question_id)
            .field("documents_url", &self.documents_url)
            .field("has_uploader", &self.uploader.is_some())
            .field("file_suffix", &self.file_suffix)
            .finish_non_exhaustive()
    }
}

/// Resolve a question's declared rules, in order
pub fn resolve_rules(question: &QuestionContent) -> Result<Vec<(Rule, &ValidationSpec)>> {
    question
        .validations
        .iter()
        .map(|spec| spec.name.parse::<Rule>().map(|rule| (rule, spec)))
        .collect()
}

/// Whether a question has been answered
///
/// Lists count when any item has content. Upload questions ask whether a
/// file was sent. The text answers `"True"` and `"False"` are also stored as
/// booleans.
fn answer_required(ctx: &RuleContext<'_>, acc: &mut Accumulator, answer: &mut PostedAnswer) -> bool {
    match answer {
        PostedAnswer::List(items) => !empty(&items.concat()),
        PostedAnswer::Text(text) if !ctx.question.is_upload() => {
            match text.as_str() {
                "True" => acc.set_clean(ctx.question_id, true),
                "False" => acc.set_clean(ctx.question_id, false),
                _ => {}
            }
            !empty(text)
        }
        other => file::file_has_been_uploaded(other),
    }
}

/// Blank after trimming whitespace
pub fn empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// At most `limit` whitespace-separated words
pub fn within_word_limit(value: &str, limit: usize) -> bool {
    value.split_whitespace().count() <= limit
}

/// Parses as a double, ignoring surrounding whitespace
pub fn is_a_float(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

static DECIMAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.\d{1,5})?\n?$").expect("valid regex"));

/// Plain decimal with at most five digits after the point
///
/// A single trailing newline is tolerated.
pub fn less_than_5_decimal_places(value: &str) -> bool {
    DECIMAL_REGEX.is_match(value)
}

/// Integer when the text is integral, otherwise a float
///
/// Text that is not a number at all is kept as text.
pub fn format_price_to_number(value: &str) -> AnswerValue {
    let trimmed = value.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        AnswerValue::Integer(integer)
    } else if let Ok(float) = trimmed.parse::<f64>() {
        AnswerValue::Float(float)
    } else {
        AnswerValue::Text(value.to_string())
    }
}
