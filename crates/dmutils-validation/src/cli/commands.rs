//! CLI command definitions for dm-validate

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dmutils_core::{ContentManifest, QuestionContent, ServiceRecord};
use dmutils_documents::{DirectoryStore, MemoryStore, Uploader};

use super::output::{ContentReport, OutputFormat, QuestionRules, UnknownRule, ValidationReport};
use super::ExitCode;
use crate::answer::load_answers;
use crate::config::{LogFormat, ValidatorConfig};
use crate::error::ValidationError;
use crate::rules::Rule;
use crate::validator::Validator;

/// Digital Marketplace answer validator
///
/// Validate supplier answers against question content, and check content
/// for rules the validator does not know.
#[derive(Parser, Debug)]
#[command(name = "dm-validate")]
#[command(about = "Validate Digital Marketplace service answers", long_about = None)]
#[command(version)]
pub struct ValidateCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format; defaults to DMUTILS_LOG_FORMAT or text
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: ValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ValidateCommands {
    /// Validate an answers file
    ///
    /// Answers are a JSON object keyed by question id: strings are text
    /// answers, arrays are list answers and {"file": "path"} is an upload.
    Validate {
        /// Content manifest (YAML) describing the questions
        #[arg(short, long)]
        content: PathBuf,

        /// Answers file (JSON)
        #[arg(short, long)]
        answers: PathBuf,

        /// Stored service record (JSON)
        #[arg(short, long)]
        service: PathBuf,

        /// Base URL of stored documents
        #[arg(long)]
        documents_url: Option<String>,

        /// Store uploads beneath this directory instead of in memory
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fixed suffix for stored document names
        #[arg(long)]
        file_suffix: Option<String>,

        /// Output format for validation results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Check that every rule named in a content manifest exists
    CheckContent {
        /// Content manifest (YAML)
        #[arg(short, long)]
        content: PathBuf,

        /// Output format for the check results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Options of the validate command
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub content: PathBuf,
    pub answers: PathBuf,
    pub service: PathBuf,
    pub documents_url: Option<String>,
    pub store_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub file_suffix: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Resolve configuration: file, then environment, then flags
pub fn resolve_config(args: &ValidateArgs) -> Result<ValidatorConfig, ValidationError> {
    let mut config = match &args.config {
        Some(path) => ValidatorConfig::from_toml_file(path)?.with_env_overrides()?,
        None => ValidatorConfig::from_env()?,
    };

    if let Some(url) = &args.documents_url {
        config.documents_url = url.clone();
    }
    if let Some(dir) = &args.store_dir {
        config.store_dir = Some(dir.clone());
    }
    config.validated()
}

/// Read a stored service record
pub fn load_service(path: &Path) -> Result<ServiceRecord, ValidationError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::file_error(format!(
            "Failed to read service file '{}': {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&json)
        .map_err(|e| ValidationError::parse_error(format!("Invalid service record: {}", e)))
}

/// Execute the validate command
pub fn execute_validate(args: ValidateArgs) -> Result<ExitCode, ValidationError> {
    let config = resolve_config(&args)?;
    let manifest = ContentManifest::from_yaml_file(&args.content)?;
    let service = load_service(&args.service)?;
    let mut posted = load_answers(&args.answers)?;

    let store: Box<dyn Uploader> = match &config.store_dir {
        Some(dir) => Box::new(DirectoryStore::new(dir)),
        None => Box::new(MemoryStore::new()),
    };

    let mut validator =
        Validator::new(&manifest, &service, config.documents_url.as_str()).with_uploader(store.as_ref());
    if let Some(suffix) = &args.file_suffix {
        validator = validator.with_file_suffix(suffix.as_str());
    }

    let outcome = validator.validate(&mut posted)?;
    let report = ValidationReport::from_outcome(outcome, &manifest);
    report.render(args.format.unwrap_or_default())?;

    Ok(ExitCode::from_validation_result(!report.valid))
}

/// Execute the check-content command
pub fn execute_check_content(
    content: PathBuf,
    format: Option<OutputFormat>,
) -> Result<ExitCode, ValidationError> {
    let manifest = ContentManifest::from_yaml_file(&content)?;
    let report = check_manifest(&manifest);
    report.render(format.unwrap_or_default())?;

    if report.valid {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::ContentError)
    }
}

/// Resolve every rule named in a manifest, nested questions included
pub fn check_manifest(manifest: &ContentManifest) -> ContentReport {
    let mut questions = Vec::new();
    let mut unknown_rules = Vec::new();

    fn visit(
        question: &QuestionContent,
        questions: &mut Vec<QuestionRules>,
        unknown_rules: &mut Vec<UnknownRule>,
    ) {
        for name in question.rule_names() {
            if name.parse::<Rule>().is_err() {
                tracing::warn!(question_id = %question.id, rule = name, "Unknown validation rule");
                unknown_rules.push(UnknownRule {
                    question_id: question.id.clone(),
                    rule: name.to_string(),
                });
            }
        }
        questions.push(QuestionRules {
            question_id: question.id.clone(),
            rules: question.rule_names().map(str::to_string).collect(),
        });
        for nested in &question.questions {
            visit(nested, questions, unknown_rules);
        }
    }

    for question in manifest.questions() {
        visit(question, &mut questions, &mut unknown_rules);
    }
    ContentReport::new(questions, unknown_rules)
}
