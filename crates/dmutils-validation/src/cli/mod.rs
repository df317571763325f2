//! CLI module for dm-validate
//!
//! Validates answers files against content manifests and checks manifests
//! for unknown rules.

pub mod commands;
pub mod output;

pub use commands::{ValidateArgs, ValidateCli, ValidateCommands};
pub use output::{ContentReport, OutputFormat, ValidationReport};

use dmutils_core::ContentError;

use crate::error::ValidationError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every answer passed validation
    Success = 0,
    /// At least one answer was rejected
    ValidationError = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Content or configuration errors, such as unknown rules
    ContentError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from validation result
    pub fn from_validation_result(has_errors: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else {
            ExitCode::Success
        }
    }

    /// Exit code for a command that failed
    pub fn from_error(error: &ValidationError) -> Self {
        match error {
            ValidationError::FileError(_)
            | ValidationError::Content(ContentError::ContentNotFound(_))
            | ValidationError::Content(ContentError::Io(_)) => ExitCode::FileError,
            e if e.is_content_error() => ExitCode::ContentError,
            e if e.is_user_error() => ExitCode::InvalidInput,
            ValidationError::MissingServiceField(_) => ExitCode::InvalidInput,
            _ => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ValidateCli) -> Result<ExitCode, ValidationError> {
    match cli.command {
        ValidateCommands::Validate {
            content,
            answers,
            service,
            documents_url,
            store_dir,
            config,
            file_suffix,
            format,
        } => commands::execute_validate(ValidateArgs {
            content,
            answers,
            service,
            documents_url,
            store_dir,
            config,
            file_suffix,
            format,
        }),
        ValidateCommands::CheckContent { content, format } => {
            commands::execute_check_content(content, format)
        }
    }
}
