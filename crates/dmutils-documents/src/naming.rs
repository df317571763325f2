//! Deterministic document paths and URLs
//!
//! Documents are stored as
//! `documents/{supplier_id}/{service_id}-{document-name}-{suffix}{ext}` where
//! the suffix defaults to the upload time, so a new upload never overwrites
//! the document it replaces.

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{DocumentError, Result};

/// Document name used for each upload question
pub const DOCUMENT_NAME_SUFFIXES: [(&str, &str); 4] = [
    ("serviceDefinitionDocumentURL", "service-definition-document"),
    ("termsAndConditionsDocumentURL", "terms-and-conditions"),
    ("sfiaRateDocumentURL", "sfia-rate-card"),
    ("pricingDocumentURL", "pricing-document"),
];

/// Document name for an upload question, if it has one
pub fn document_name_for(field: &str) -> Option<&'static str> {
    DOCUMENT_NAME_SUFFIXES
        .iter()
        .find(|(question_id, _)| *question_id == field)
        .map(|(_, name)| *name)
}

/// Build the storage path of an uploaded document
///
/// `suffix` defaults to [`default_file_suffix`]. Fails with
/// [`DocumentError::UnknownDocumentField`] for fields that are not upload
/// questions.
pub fn generate_file_name(
    supplier_id: &str,
    service_id: &str,
    field: &str,
    filename: &str,
    suffix: Option<&str>,
) -> Result<String> {
    let document_name = document_name_for(field)
        .ok_or_else(|| DocumentError::UnknownDocumentField(field.to_string()))?;

    let suffix = match suffix {
        Some(suffix) => suffix.to_string(),
        None => default_file_suffix(),
    };

    Ok(format!(
        "documents/{}/{}-{}-{}{}",
        supplier_id,
        service_id,
        document_name,
        suffix,
        get_extension(filename)
    ))
}

/// Current UTC time as a file suffix, e.g. `2015-01-02-0304`
pub fn default_file_suffix() -> String {
    file_suffix_at(Utc::now())
}

/// File suffix for a given time
pub fn file_suffix_at(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d-%H%M").to_string()
}

/// Lower-cased extension of a file name, including the leading dot
///
/// Only the last path component is considered and leading dots do not start
/// an extension, so `.bashrc` has none.
pub fn get_extension(filename: &str) -> String {
    let base = match filename.rfind('/') {
        Some(index) => &filename[index + 1..],
        None => filename,
    };

    match base.rfind('.') {
        Some(index) if base[..index].chars().any(|c| c != '.') => base[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Resolve a document path against the public documents base URL
pub fn join_document_url(documents_url: &str, path: &str) -> Result<String> {
    let base = Url::parse(documents_url)?;
    Ok(base.join(path)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_filename_format() {
        assert_eq!(
            generate_file_name("2", "1", "pricingDocumentURL", "test.pdf", Some("123")).unwrap(),
            "documents/2/1-pricing-document-123.pdf"
        );
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            generate_file_name("2", "1", "serviceName", "test.pdf", Some("123")),
            Err(DocumentError::UnknownDocumentField(field)) if field == "serviceName"
        ));
    }

    #[test]
    fn test_default_suffix_is_datetime() {
        let now = Utc.with_ymd_and_hms(2015, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(file_suffix_at(now), "2015-01-02-0304");

        let name = generate_file_name("2", "1", "sfiaRateDocumentURL", "rates.ODS", None).unwrap();
        assert!(name.starts_with("documents/2/1-sfia-rate-card-"));
        assert!(name.ends_with(".ods"));
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension("test.pdf"), ".pdf");
        assert_eq!(get_extension("TEST.PDF"), ".pdf");
        assert_eq!(get_extension("archive.tar.gz"), ".gz");
        assert_eq!(get_extension("no_extension"), "");
        assert_eq!(get_extension(".bashrc"), "");
        assert_eq!(get_extension("dir.d/file"), "");
        assert_eq!(get_extension("trailing."), ".");
    }

    #[test]
    fn test_join_document_url() {
        assert_eq!(
            join_document_url(
                "https://assets.test.digitalmarketplace.service.gov.uk",
                "documents/2/1-pricing-document-2015-01-01-1200.pdf"
            )
            .unwrap(),
            "https://assets.test.digitalmarketplace.service.gov.uk/documents/2/1-pricing-document-2015-01-01-1200.pdf"
        );
        assert!(matches!(
            join_document_url("not a url", "documents/a.pdf"),
            Err(DocumentError::InvalidUrl(_))
        ));
    }

    proptest! {
        #[test]
        fn extension_is_lowercase_suffix(stem in "[a-zA-Z0-9]{1,12}", ext in "[a-zA-Z]{1,5}") {
            let filename = format!("{}.{}", stem, ext);
            let extension = get_extension(&filename);
            prop_assert_eq!(extension, format!(".{}", ext.to_lowercase()));
        }
    }
}
