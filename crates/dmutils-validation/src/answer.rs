//! Posted answers and the values stored from them

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use dmutils_documents::UploadedFile;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// A single submitted answer
#[derive(Debug)]
pub enum PostedAnswer {
    Text(String),
    /// List answers, including price components `[min, max, unit, interval]`
    List(Vec<String>),
    File(UploadedFile),
}

/// Answers keyed by question id
pub type PostedData = BTreeMap<String, PostedAnswer>;

impl PostedAnswer {
    pub fn text(value: impl Into<String>) -> Self {
        PostedAnswer::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PostedAnswer::List(items.into_iter().map(Into::into).collect())
    }

    /// Item view of the answer: a text answer is a single item, a file has none
    pub fn items(&self) -> Vec<&str> {
        match self {
            PostedAnswer::Text(text) => vec![text.as_str()],
            PostedAnswer::List(items) => items.iter().map(String::as_str).collect(),
            PostedAnswer::File(_) => Vec::new(),
        }
    }

    /// Positional component of the answer, empty when missing
    pub fn component(&self, index: usize) -> &str {
        match self {
            PostedAnswer::Text(text) if index == 0 => text.as_str(),
            PostedAnswer::List(items) => items.get(index).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    /// Storable form of the raw answer
    pub fn to_value(&self) -> AnswerValue {
        match self {
            PostedAnswer::Text(text) => AnswerValue::Text(text.clone()),
            PostedAnswer::List(items) => AnswerValue::List(items.clone()),
            PostedAnswer::File(file) => AnswerValue::File {
                filename: file.filename().to_string(),
            },
        }
    }
}

impl From<&str> for PostedAnswer {
    fn from(value: &str) -> Self {
        PostedAnswer::Text(value.to_string())
    }
}

impl From<String> for PostedAnswer {
    fn from(value: String) -> Self {
        PostedAnswer::Text(value)
    }
}

impl From<Vec<String>> for PostedAnswer {
    fn from(items: Vec<String>) -> Self {
        PostedAnswer::List(items)
    }
}

impl From<UploadedFile> for PostedAnswer {
    fn from(file: UploadedFile) -> Self {
        PostedAnswer::File(file)
    }
}

/// A value placed in clean or dirty data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    /// An upload that was not stored, identified by its file name
    File { filename: String },
}

impl AnswerValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Null => write!(f, "null"),
            AnswerValue::Bool(value) => write!(f, "{}", value),
            AnswerValue::Integer(value) => write!(f, "{}", value),
            AnswerValue::Float(value) => write!(f, "{}", value),
            AnswerValue::Text(text) => write!(f, "{}", text),
            AnswerValue::List(items) => write!(f, "[{}]", items.join(", ")),
            AnswerValue::File { filename } => write!(f, "<file {}>", filename),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Integer(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        AnswerValue::List(items)
    }
}

/// An answer as written in an answers file
///
/// Strings are text answers, arrays are list answers and `{"file": path}`
/// names an upload on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnswerInput {
    Text(String),
    List(Vec<String>),
    File { file: PathBuf },
}

impl AnswerInput {
    /// Open the answer; relative upload paths resolve against `base_dir`
    pub fn into_posted(self, base_dir: &Path) -> Result<PostedAnswer> {
        match self {
            AnswerInput::Text(text) => Ok(PostedAnswer::Text(text)),
            AnswerInput::List(items) => Ok(PostedAnswer::List(items)),
            AnswerInput::File { file } => {
                let path = if file.is_absolute() {
                    file
                } else {
                    base_dir.join(file)
                };
                let upload = UploadedFile::open(&path).map_err(|e| {
                    ValidationError::file_error(format!(
                        "Failed to open upload '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(PostedAnswer::File(upload))
            }
        }
    }
}

/// Parse a JSON answers document into posted data
pub fn parse_answers(json: &str, base_dir: &Path) -> Result<PostedData> {
    let inputs: BTreeMap<String, AnswerInput> = serde_json::from_str(json)?;
    inputs
        .into_iter()
        .map(|(question_id, input)| Ok((question_id, input.into_posted(base_dir)?)))
        .collect()
}

/// Read a JSON answers file; uploads resolve against the file's directory
pub fn load_answers(path: impl AsRef<Path>) -> Result<PostedData> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::file_error(format!(
            "Failed to read answers file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_answers(&json, base_dir)
}
