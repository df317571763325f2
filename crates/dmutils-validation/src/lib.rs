//! Answer validation for Digital Marketplace service forms
//!
//! Suppliers describe their services by answering questions. Each question's
//! content declares an ordered list of named rules; the [`Validator`] applies
//! them to the posted answers and reports, per question, the message of the
//! first rule that fails, together with the clean data ready to be stored and
//! the dirty data needed to redisplay the form.
//!
//! ## Features
//!
//! - **Rule registry**: fifteen named rules covering presence, uploads,
//!   prices and length limits, resolved before they run
//! - **Document uploads**: uploads are checked, stored through an
//!   [`Uploader`](dmutils_documents::Uploader) and replaced by their URL
//! - **CLI**: `dm-validate` validates JSON answers files against YAML content
//!
//! ## CLI Usage
//!
//! ```bash
//! # Validate answers for a service
//! dm-validate validate --content manifest.yml --answers answers.json --service service.json
//!
//! # Check content for unknown rules
//! dm-validate check-content --content manifest.yml --format json
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dmutils_core::{ContentManifest, ServiceRecord};
//! use dmutils_validation::{AnswerValue, PostedAnswer, PostedData, Validator};
//!
//! let manifest = ContentManifest::from_yaml_str(r#"
//! - name: Pricing
//!   questions:
//!     - id: priceString
//!       type: pricing
//!       validations:
//!         - name: no_min_price_specified
//!           message: Minimum price requires an answer.
//!         - name: price_string_can_be_composed
//!           message: There was a problem with your price.
//! "#).unwrap();
//! let service = ServiceRecord::new().with("id", 1).with("supplierId", 2);
//!
//! let mut posted = PostedData::new();
//! posted.insert(
//!     "priceString".to_string(),
//!     PostedAnswer::list(["10", "20", "Unit", "Year"]),
//! );
//!
//! let mut validator = Validator::new(&manifest, &service, "https://assets.example.com");
//! let outcome = validator.validate(&mut posted).unwrap();
//!
//! assert!(outcome.is_valid());
//! assert_eq!(
//!     outcome.clean_data["priceString"],
//!     AnswerValue::from("£10 to £20 per unit per year")
//! );
//! ```

pub mod answer;
pub mod cli;
pub mod config;
pub mod error;
pub mod outcome;
pub mod rules;
pub mod validator;

pub use answer::{load_answers, parse_answers, AnswerInput, AnswerValue, PostedAnswer, PostedData};
pub use cli::{ExitCode, OutputFormat, ValidateCli, ValidateCommands};
pub use config::{LogFormat, ValidatorConfig, ValidatorConfigBuilder};
pub use error::{Result, ValidationError};
pub use outcome::{Accumulator, ValidationOutcome};
pub use rules::{resolve_rules, Rule, RuleCategory, RuleContext};
pub use validator::Validator;

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use dmutils_validation::{run_cli, ValidateCli};
///
/// let cli = ValidateCli::parse();
/// let exit_code = run_cli(cli);
/// std::process::exit(exit_code.into());
/// ```
pub fn run_cli(cli: ValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}
