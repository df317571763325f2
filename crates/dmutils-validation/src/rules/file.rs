//! Rules for uploaded documents
//!
//! Uploads are probed in place and rewound, so later rules and the uploader
//! see the whole file. A read failure rejects the answer.

use dmutils_documents::{
    file_is_less_than_5mb as fits_size_limit, file_is_not_empty,
    file_is_open_document_format as has_open_format, upload_document_with_suffix,
    DocumentError, UploadedFile, SIZE_LIMIT,
};

use super::RuleContext;
use crate::answer::PostedAnswer;
use crate::error::{Result, ValidationError};
use crate::outcome::Accumulator;

fn probe_failed(file: &UploadedFile, error: std::io::Error) -> bool {
    tracing::warn!(filename = file.filename(), error = %error, "Failed to read upload");
    false
}

/// At least one byte was sent; text and list answers must be non-empty
pub fn file_has_been_uploaded(answer: &mut PostedAnswer) -> bool {
    match answer {
        PostedAnswer::File(file) => match file_is_not_empty(file) {
            Ok(not_empty) => not_empty,
            Err(e) => probe_failed(file, e),
        },
        PostedAnswer::Text(text) => !text.is_empty(),
        PostedAnswer::List(items) => items.iter().any(|item| !item.is_empty()),
    }
}

/// Smaller than the upload limit; text and list answers are measured in bytes
pub fn file_is_less_than_5mb(answer: &mut PostedAnswer) -> bool {
    match answer {
        PostedAnswer::File(file) => match fits_size_limit(file) {
            Ok(fits) => fits,
            Err(e) => probe_failed(file, e),
        },
        PostedAnswer::Text(text) => (text.len() as u64) < SIZE_LIMIT,
        PostedAnswer::List(items) => {
            (items.iter().map(String::len).sum::<usize>() as u64) < SIZE_LIMIT
        }
    }
}

pub fn file_is_open_document_format(answer: &mut PostedAnswer) -> bool {
    match answer {
        PostedAnswer::File(file) => has_open_format(file),
        _ => false,
    }
}

/// Store the upload and record its public URL as the clean value
///
/// A store that refuses the write rejects the answer. A missing uploader,
/// a service without ids or a question that is not a known document field
/// are errors.
pub fn file_can_be_saved(
    ctx: &RuleContext<'_>,
    acc: &mut Accumulator,
    answer: &mut PostedAnswer,
) -> Result<bool> {
    let file = match answer {
        PostedAnswer::File(file) => file,
        _ => return Ok(false),
    };
    let uploader = ctx
        .uploader
        .ok_or_else(|| ValidationError::MissingUploader(ctx.question_id.to_string()))?;

    let stored = upload_document_with_suffix(
        uploader,
        ctx.documents_url,
        ctx.service,
        ctx.question_id,
        file,
        ctx.file_suffix,
    )
    .map_err(|e| match e {
        DocumentError::MissingServiceField(field) => ValidationError::MissingServiceField(field),
        other => ValidationError::Document(other),
    })?;

    match stored {
        Some(url) => {
            tracing::info!(question_id = ctx.question_id, url = %url, "Saved uploaded document");
            acc.set_clean(ctx.question_id, url);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerValue;
    use dmutils_core::{QuestionContent, ServiceRecord};
    use dmutils_documents::MemoryStore;
    use std::io::Read;

    fn upload(name: &str, contents: &str) -> PostedAnswer {
        PostedAnswer::File(UploadedFile::from_bytes(name, contents))
    }

    #[test]
    fn test_uploaded_and_rewound() {
        let mut answer = upload("a.pdf", "contents");
        assert!(file_has_been_uploaded(&mut answer));
        assert!(file_is_less_than_5mb(&mut answer));

        let mut contents = String::new();
        if let PostedAnswer::File(file) = &mut answer {
            file.read_to_string(&mut contents).unwrap();
        }
        assert_eq!(contents, "contents");
    }

    #[test]
    fn test_non_file_answers() {
        assert!(!file_has_been_uploaded(&mut PostedAnswer::text("")));
        assert!(file_has_been_uploaded(&mut PostedAnswer::text("x")));
        assert!(file_is_less_than_5mb(&mut PostedAnswer::list(["a", "b"])));
        assert!(!file_is_open_document_format(&mut PostedAnswer::text("a.pdf")));
    }

    #[test]
    fn test_save_requires_file_answer() {
        let question = QuestionContent::new("pricingDocumentURL");
        let service = ServiceRecord::new().with("id", 1).with("supplierId", 2);
        let store = MemoryStore::new();
        let ctx = RuleContext {
            question_id: "pricingDocumentURL",
            question: &question,
            service: &service,
            documents_url: "https://assets.example.com",
            uploader: Some(&store),
            file_suffix: Some("2015-01-01-1200"),
        };
        let mut acc = Accumulator::new();

        assert!(!file_can_be_saved(&ctx, &mut acc, &mut PostedAnswer::text("a.pdf")).unwrap());
        assert!(file_can_be_saved(&ctx, &mut acc, &mut upload("a.pdf", "x")).unwrap());
        assert_eq!(
            acc.clean("pricingDocumentURL"),
            Some(&AnswerValue::from(
                "https://assets.example.com/documents/2/1-pricing-document-2015-01-01-1200.pdf"
            ))
        );
    }

    #[test]
    fn test_save_without_uploader() {
        let question = QuestionContent::new("pricingDocumentURL");
        let service = ServiceRecord::new().with("id", 1).with("supplierId", 2);
        let ctx = RuleContext {
            question_id: "pricingDocumentURL",
            question: &question,
            service: &service,
            documents_url: "https://assets.example.com",
            uploader: None,
            file_suffix: None,
        };

        let result = file_can_be_saved(&ctx, &mut Accumulator::new(), &mut upload("a.pdf", "x"));
        assert!(matches!(result, Err(ValidationError::MissingUploader(_))));
    }
}
