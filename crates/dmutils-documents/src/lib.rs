//! Supplier documents for Digital Marketplace services
//!
//! Naming, checking and storing the documents (service definitions, pricing
//! documents, terms and conditions, rate cards) that suppliers upload with a
//! service.
//!
//! ## Example
//!
//! ```rust
//! use dmutils_core::ServiceRecord;
//! use dmutils_documents::{upload_document_with_suffix, MemoryStore, UploadedFile};
//!
//! let store = MemoryStore::new();
//! let service = ServiceRecord::new().with("id", 1).with("supplierId", 2);
//! let mut file = UploadedFile::from_bytes("pricing.pdf", "%PDF-1.4");
//!
//! let url = upload_document_with_suffix(
//!     &store,
//!     "https://assets.example.com",
//!     &service,
//!     "pricingDocumentURL",
//!     &mut file,
//!     Some("2015-01-01-1200"),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     url.as_deref(),
//!     Some("https://assets.example.com/documents/2/1-pricing-document-2015-01-01-1200.pdf")
//! );
//! ```

pub mod error;
pub mod file;
pub mod naming;
pub mod store;
pub mod upload;

pub use error::{DocumentError, Result, StoreError};
pub use file::{
    file_is_less_than_5mb, file_is_not_empty, file_is_open_document_format, ReadSeek,
    UploadedFile, OPEN_DOCUMENT_EXTENSIONS, SIZE_LIMIT,
};
pub use naming::{
    default_file_suffix, document_name_for, file_suffix_at, generate_file_name, get_extension,
    join_document_url,
};
pub use store::{DirectoryStore, MemoryStore, Uploader};
pub use upload::{filter_empty_files, upload_document, upload_document_with_suffix, validate_documents};
