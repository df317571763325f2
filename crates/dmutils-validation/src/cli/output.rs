//! Output formatting for the dm-validate CLI
//!
//! Reports render as JSON, YAML, or a coloured table for terminals.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use dmutils_core::ContentProvider;

use crate::answer::AnswerValue;
use crate::error::ValidationError;
use crate::outcome::ValidationOutcome;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, ValidationError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| ValidationError::SerializationError(e.to_string())),
        OutputFormat::Yaml | OutputFormat::Table => serde_yaml::to_string(value)
            .map_err(|e| ValidationError::SerializationError(e.to_string())),
    }
}

/// Validation report for one answers file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub error_count: usize,
    /// Rejected answers, in question id order
    pub errors: Vec<AnswerError>,
    pub clean_data: BTreeMap<String, AnswerValue>,
    pub dirty_data: BTreeMap<String, AnswerValue>,
    pub summary: String,
}

/// A rejected answer
#[derive(Debug, Clone, Serialize)]
pub struct AnswerError {
    pub question_id: String,
    /// Question name or text, falling back to the id
    pub label: String,
    pub message: String,
}

impl ValidationReport {
    /// Build a report, labelling errors from the question content
    pub fn from_outcome(outcome: &ValidationOutcome, content: &dyn ContentProvider) -> Self {
        let errors: Vec<AnswerError> = outcome
            .errors
            .iter()
            .map(|(question_id, message)| AnswerError {
                question_id: question_id.clone(),
                label: content
                    .get_question(question_id)
                    .map(|q| q.label().to_string())
                    .unwrap_or_else(|| question_id.clone()),
                message: message.clone(),
            })
            .collect();

        let valid = errors.is_empty();
        let summary = if valid {
            format!("All {} answer(s) are valid", outcome.clean_data.len())
        } else {
            format!("{} answer(s) need attention", errors.len())
        };

        Self {
            valid,
            error_count: errors.len(),
            errors,
            clean_data: outcome.clean_data.clone(),
            dirty_data: outcome.dirty_data.clone(),
            summary,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), ValidationError> {
        match format {
            OutputFormat::Table => self.render_table(),
            _ => {
                println!("{}", serialize(self, format)?);
                Ok(())
            }
        }
    }

    fn render_table(&self) -> Result<(), ValidationError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Validation Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        writeln!(stdout, "{} {}", status_icon, self.summary).ok();
        writeln!(stdout).ok();

        if !self.errors.is_empty() {
            writeln!(stdout, "{}", "Errors:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            for error in &self.errors {
                writeln!(
                    stdout,
                    "{} [{}] {}",
                    "x".red(),
                    error.question_id.dimmed(),
                    error.label.bold()
                )
                .ok();
                writeln!(stdout, "  {}", error.message.red()).ok();
            }
            writeln!(stdout).ok();
        }

        if !self.clean_data.is_empty() {
            writeln!(stdout, "{}", "Clean data:".cyan().bold()).ok();
            for (key, value) in &self.clean_data {
                writeln!(stdout, "  {} {}", format!("{}:", key).green(), value).ok();
            }
        }

        if !self.dirty_data.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Dirty data:".cyan().bold()).ok();
            for (key, value) in &self.dirty_data {
                writeln!(stdout, "  {} {}", format!("{}:", key).yellow(), value).ok();
            }
        }

        stdout.flush().ok();
        Ok(())
    }
}

/// Rule check report for a content manifest
#[derive(Debug, Clone, Serialize)]
pub struct ContentReport {
    pub valid: bool,
    pub question_count: usize,
    pub rule_count: usize,
    pub questions: Vec<QuestionRules>,
    pub unknown_rules: Vec<UnknownRule>,
    pub summary: String,
}

/// Rules declared by one question
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRules {
    pub question_id: String,
    pub rules: Vec<String>,
}

/// A declared rule name that does not resolve
#[derive(Debug, Clone, Serialize)]
pub struct UnknownRule {
    pub question_id: String,
    pub rule: String,
}

impl ContentReport {
    pub fn new(questions: Vec<QuestionRules>, unknown_rules: Vec<UnknownRule>) -> Self {
        let rule_count = questions.iter().map(|q| q.rules.len()).sum();
        let valid = unknown_rules.is_empty();
        let summary = if valid {
            format!(
                "{} rule(s) across {} question(s) resolve",
                rule_count,
                questions.len()
            )
        } else {
            format!("{} unknown rule(s)", unknown_rules.len())
        };

        Self {
            valid,
            question_count: questions.len(),
            rule_count,
            questions,
            unknown_rules,
            summary,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<(), ValidationError> {
        match format {
            OutputFormat::Table => self.render_table(),
            _ => {
                println!("{}", serialize(self, format)?);
                Ok(())
            }
        }
    }

    fn render_table(&self) -> Result<(), ValidationError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Content Check".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        for question in &self.questions {
            let rules = if question.rules.is_empty() {
                "(no rules)".dimmed().to_string()
            } else {
                question.rules.join(", ")
            };
            writeln!(stdout, "  {} {}", format!("{}:", question.question_id).bold(), rules).ok();
        }
        writeln!(stdout).ok();

        for unknown in &self.unknown_rules {
            writeln!(
                stdout,
                "{} [{}] unknown rule {}",
                "x".red(),
                unknown.question_id.dimmed(),
                unknown.rule.red().bold()
            )
            .ok();
        }

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        writeln!(stdout, "{} {}", status_icon, self.summary).ok();

        stdout.flush().ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmutils_core::QuestionContent;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_report_labels_errors() {
        let mut content = BTreeMap::new();
        let mut question = QuestionContent::new("serviceName");
        question.name = Some("Service name".to_string());
        content.insert("serviceName".to_string(), question);

        let mut outcome = ValidationOutcome::default();
        outcome
            .errors
            .insert("serviceName".to_string(), "answer_required".to_string());
        outcome
            .errors
            .insert("unknown".to_string(), "failed".to_string());

        let report = ValidationReport::from_outcome(&outcome, &content);
        assert!(!report.valid);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.errors[0].label, "Service name");
        assert_eq!(report.errors[1].label, "unknown");
        assert_eq!(report.summary, "2 answer(s) need attention");
    }

    #[test]
    fn test_report_json() {
        let mut outcome = ValidationOutcome::default();
        outcome
            .clean_data
            .insert("q1".to_string(), AnswerValue::Bool(true));
        let content: BTreeMap<String, QuestionContent> = BTreeMap::new();

        let report = ValidationReport::from_outcome(&outcome, &content);
        let json: serde_json::Value =
            serde_json::from_str(&serialize(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["clean_data"]["q1"], true);
        assert_eq!(json["summary"], "All 1 answer(s) are valid");
    }

    #[test]
    fn test_content_report() {
        let report = ContentReport::new(
            vec![QuestionRules {
                question_id: "q1".to_string(),
                rules: vec!["answer_required".to_string(), "typo".to_string()],
            }],
            vec![UnknownRule {
                question_id: "q1".to_string(),
                rule: "typo".to_string(),
            }],
        );
        assert!(!report.valid);
        assert_eq!(report.rule_count, 2);
        assert_eq!(report.summary, "1 unknown rule(s)");
    }
}
