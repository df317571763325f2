//! Core content model for Digital Marketplace forms
//!
//! This crate describes the questions a supplier answers when submitting a
//! service, and the previously stored service those answers belong to.
//!
//! ## Features
//!
//! - **Question content**: types, optionality and ordered validation rules
//! - **Manifests**: ordered sections of questions with dependency filtering
//! - **Form data**: typed answers extracted from submitted forms
//! - **Content loader**: reads and caches framework content repositories
//! - **Content provider**: the lookup seam used by the answer validator
//!
//! ## Example
//!
//! ```rust
//! use dmutils_core::{ContentManifest, ContentProvider};
//!
//! let manifest = ContentManifest::from_yaml_str(r#"
//! - name: Service name
//!   questions:
//!     - id: serviceName
//!       type: text
//!       validations:
//!         - name: answer_required
//!           message: You need to answer this question.
//! "#).unwrap();
//!
//! let question = manifest.get_question("serviceName").unwrap();
//! assert_eq!(question.validations[0].name, "answer_required");
//! ```

pub mod error;
pub mod form;
pub mod loader;
pub mod manifest;
pub mod provider;
pub mod question;
pub mod service;

pub use error::{ContentError, Result};
pub use form::{convert_to_boolean, convert_to_number, FormData, FormValues};
pub use loader::ContentLoader;
pub use manifest::{make_slug, ContentManifest, ContentSection, FieldErrorMessage};
pub use provider::ContentProvider;
pub use question::{
    Dependency, QuestionContent, QuestionType, ValidationSpec, DEFAULT_ERROR_MESSAGE,
};
pub use service::ServiceRecord;
