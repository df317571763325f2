//! Batch helpers for the documents posted with a service form

use std::collections::BTreeMap;
use std::io;

use dmutils_core::ServiceRecord;

use crate::error::{DocumentError, Result};
use crate::file::{file_is_less_than_5mb, file_is_not_empty, file_is_open_document_format, UploadedFile};
use crate::naming::{generate_file_name, join_document_url};
use crate::store::Uploader;

/// Drop uploads that contain no data
pub fn filter_empty_files(
    files: BTreeMap<String, UploadedFile>,
) -> io::Result<BTreeMap<String, UploadedFile>> {
    let mut kept = BTreeMap::new();
    for (field, mut contents) in files {
        if file_is_not_empty(&mut contents)? {
            kept.insert(field, contents);
        }
    }
    Ok(kept)
}

/// Check uploads for format and size
///
/// Returns the failing check for each rejected field, keyed like `files`.
/// The check name doubles as the validation key used to look up the message
/// in question content. Format is checked before size.
pub fn validate_documents(
    files: &mut BTreeMap<String, UploadedFile>,
) -> io::Result<BTreeMap<String, &'static str>> {
    let mut errors = BTreeMap::new();
    for (field, contents) in files.iter_mut() {
        if !file_is_open_document_format(contents) {
            errors.insert(field.clone(), "file_is_open_document_format");
        } else if !file_is_less_than_5mb(contents)? {
            errors.insert(field.clone(), "file_is_less_than_5mb");
        }
    }
    Ok(errors)
}

/// Store a document and return its public URL
///
/// Returns `Ok(None)` when the store refuses the write. Naming problems
/// (unknown field, service without ids, bad base URL) are errors.
pub fn upload_document(
    uploader: &dyn Uploader,
    documents_url: &str,
    service: &ServiceRecord,
    field: &str,
    file: &mut UploadedFile,
) -> Result<Option<String>> {
    upload_document_with_suffix(uploader, documents_url, service, field, file, None)
}

/// [`upload_document`] with an explicit file name suffix
pub fn upload_document_with_suffix(
    uploader: &dyn Uploader,
    documents_url: &str,
    service: &ServiceRecord,
    field: &str,
    file: &mut UploadedFile,
    suffix: Option<&str>,
) -> Result<Option<String>> {
    let supplier_id = service
        .supplier_id()
        .ok_or_else(|| DocumentError::MissingServiceField("supplierId".to_string()))?;
    let service_id = service
        .id()
        .ok_or_else(|| DocumentError::MissingServiceField("id".to_string()))?;

    let file_path = generate_file_name(&supplier_id, &service_id, field, file.filename(), suffix)?;

    if let Err(e) = uploader.save(&file_path, file) {
        tracing::warn!(field, path = %file_path, error = %e, "Document upload failed");
        return Ok(None);
    }

    join_document_url(documents_url, &file_path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DOCUMENTS_URL: &str = "https://assets.test.digitalmarketplace.service.gov.uk";

    fn service() -> ServiceRecord {
        ServiceRecord::new().with("id", 1).with("supplierId", 2)
    }

    #[test]
    fn test_filter_empty_files() {
        let mut files = BTreeMap::new();
        files.insert("a".to_string(), UploadedFile::from_bytes("a.pdf", "x"));
        files.insert("b".to_string(), UploadedFile::from_bytes("b.pdf", ""));

        let kept = filter_empty_files(files).unwrap();
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_validate_documents() {
        let mut files = BTreeMap::new();
        files.insert("pdf".to_string(), UploadedFile::from_bytes("a.pdf", "x"));
        files.insert("txt".to_string(), UploadedFile::from_bytes("a.txt", "x"));
        files.insert(
            "big".to_string(),
            UploadedFile::from_bytes("a.pdf", vec![b'*'; 5_400_001]),
        );
        files.insert(
            "big_txt".to_string(),
            UploadedFile::from_bytes("a.txt", vec![b'*'; 5_400_001]),
        );

        let errors = validate_documents(&mut files).unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["txt"], "file_is_open_document_format");
        assert_eq!(errors["big"], "file_is_less_than_5mb");
        assert_eq!(errors["big_txt"], "file_is_open_document_format");
    }

    #[test]
    fn test_upload_document() {
        let store = MemoryStore::new();
        let mut file = UploadedFile::from_bytes("a.pdf", "pdf bytes");

        let url = upload_document_with_suffix(
            &store,
            DOCUMENTS_URL,
            &service(),
            "pricingDocumentURL",
            &mut file,
            Some("2015-01-01-1200"),
        )
        .unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://assets.test.digitalmarketplace.service.gov.uk/documents/2/1-pricing-document-2015-01-01-1200.pdf")
        );
        assert!(store
            .get("documents/2/1-pricing-document-2015-01-01-1200.pdf")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_upload_document_store_failure() {
        let store = MemoryStore::rejecting(403, "Forbidden");
        let mut file = UploadedFile::from_bytes("a.pdf", "pdf bytes");
        let url = upload_document(&store, DOCUMENTS_URL, &service(), "pricingDocumentURL", &mut file)
            .unwrap();
        assert_eq!(url, None);
    }

    #[test]
    fn test_upload_document_requires_ids() {
        let store = MemoryStore::new();
        let mut file = UploadedFile::from_bytes("a.pdf", "pdf bytes");
        let service = ServiceRecord::new().with("id", 1);

        assert!(matches!(
            upload_document(&store, DOCUMENTS_URL, &service, "pricingDocumentURL", &mut file),
            Err(DocumentError::MissingServiceField(field)) if field == "supplierId"
        ));
    }
}
