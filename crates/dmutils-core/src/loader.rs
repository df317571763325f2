//! Framework content loader
//!
//! Reads the framework content repository layout:
//!
//! ```text
//! {root}/frameworks/{framework}/manifests/{manifest}.yml
//! {root}/frameworks/{framework}/questions/{question_set}/{question}.yml
//! {root}/frameworks/{framework}/messages/{block}.yml
//! ```
//!
//! Manifests list sections whose `questions` are question file names. Each
//! question file is loaded once per framework and question set and cached.
//!
//! ```rust,ignore
//! let mut loader = ContentLoader::new("path/to/frameworks-content");
//! loader.load_manifest("g-cloud-7", "services", "edit_submission")?;
//! loader.load_messages("g-cloud-7", &["dashboard"])?;
//!
//! let manifest = loader.get_manifest("g-cloud-7", "edit_submission")?;
//! let message = loader.get_message("g-cloud-7", "dashboard", "open", None)?;
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ContentError, Result};
use crate::manifest::{make_slug, ContentManifest, ContentSection};
use crate::question::QuestionContent;

/// Section entry as written in a manifest file
#[derive(Debug, Deserialize)]
struct ManifestSection {
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    editable: bool,
    #[serde(default)]
    edit_questions: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    summary_page_description: Option<String>,
    questions: Vec<String>,
}

type QuestionCache = HashMap<String, HashMap<String, QuestionContent>>;

/// Loads and caches framework manifests, questions and messages
#[derive(Debug)]
pub struct ContentLoader {
    content_path: PathBuf,
    manifests: HashMap<String, HashMap<String, Vec<ContentSection>>>,
    questions: HashMap<String, QuestionCache>,
    messages: HashMap<String, HashMap<String, serde_yaml::Mapping>>,
}

impl ContentLoader {
    /// Create a loader rooted at a content repository checkout
    pub fn new(content_path: impl Into<PathBuf>) -> Self {
        Self {
            content_path: content_path.into(),
            manifests: HashMap::new(),
            questions: HashMap::new(),
            messages: HashMap::new(),
        }
    }

    /// Load a manifest and every question it references
    ///
    /// Loading an already cached manifest is a no-op.
    pub fn load_manifest(
        &mut self,
        framework_slug: &str,
        question_set: &str,
        manifest: &str,
    ) -> Result<ContentManifest> {
        let cached = self
            .manifests
            .get(framework_slug)
            .map_or(false, |m| m.contains_key(manifest));

        if !cached {
            let manifest_path = self.manifest_path(framework_slug, manifest);
            let entries: Vec<ManifestSection> = read_yaml(&manifest_path)
                .map_err(|e| not_found_as(e, format!("No manifest at {}", manifest_path.display())))?;

            let mut sections = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut questions = Vec::with_capacity(entry.questions.len());
                for question in &entry.questions {
                    questions.push(self.get_question(framework_slug, question_set, question)?);
                }
                sections.push(ContentSection {
                    slug: entry.slug.unwrap_or_else(|| make_slug(&entry.name)),
                    name: entry.name,
                    editable: entry.editable,
                    edit_questions: entry.edit_questions,
                    questions,
                    description: entry.description,
                    summary_page_description: entry.summary_page_description,
                });
            }

            tracing::info!(
                framework = framework_slug,
                manifest,
                sections = sections.len(),
                "Loaded framework manifest"
            );

            self.manifests
                .entry(framework_slug.to_string())
                .or_default()
                .insert(manifest.to_string(), sections);
        }

        self.get_manifest(framework_slug, manifest)
    }

    /// Return a previously loaded manifest
    pub fn get_manifest(&self, framework_slug: &str, manifest: &str) -> Result<ContentManifest> {
        self.manifests
            .get(framework_slug)
            .and_then(|m| m.get(manifest))
            .map(|sections| ContentManifest::from_sections(sections.clone()))
            .ok_or_else(|| {
                ContentError::not_found(format!(
                    "Content not found for {} and {}",
                    framework_slug, manifest
                ))
            })
    }

    /// Return a question, loading it from its question set on first use
    pub fn get_question(
        &mut self,
        framework_slug: &str,
        question_set: &str,
        question: &str,
    ) -> Result<QuestionContent> {
        if let Some(cached) = self
            .questions
            .get(framework_slug)
            .and_then(|sets| sets.get(question_set))
            .and_then(|questions| questions.get(question))
        {
            return Ok(cached.clone());
        }

        let questions_path = self.questions_path(framework_slug, question_set);
        let question_path = questions_path.join(format!("{}.yml", question));
        let mut raw: serde_yaml::Value = read_yaml(&question_path).map_err(|e| {
            not_found_as(
                e,
                format!("No question {} at {}", question, questions_path.display()),
            )
        })?;

        if let serde_yaml::Value::Mapping(map) = &mut raw {
            self.load_nested_questions(framework_slug, question_set, map)?;
        }

        let mut content: QuestionContent = serde_yaml::from_value(raw)
            .map_err(|e| ContentError::parse_error(&question_path, e))?;
        content.id = make_question_id(question);

        self.questions
            .entry(framework_slug.to_string())
            .or_default()
            .entry(question_set.to_string())
            .or_default()
            .insert(question.to_string(), content.clone());

        Ok(content)
    }

    /// Replace nested question names with their loaded content
    fn load_nested_questions(
        &mut self,
        framework_slug: &str,
        question_set: &str,
        map: &mut serde_yaml::Mapping,
    ) -> Result<()> {
        let names: Vec<String> = match map.get("questions") {
            Some(serde_yaml::Value::Sequence(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => return Ok(()),
        };

        let mut nested = Vec::with_capacity(names.len());
        for name in &names {
            let question = self.get_question(framework_slug, question_set, name)?;
            nested.push(serde_yaml::to_value(question)?);
        }
        map.insert("questions".into(), serde_yaml::Value::Sequence(nested));

        if let Some(name) = map.get("name").and_then(|n| n.as_str()).map(make_slug) {
            map.insert("slug".into(), name.into());
        }
        Ok(())
    }

    /// Load message blocks for a framework
    pub fn load_messages(&mut self, framework_slug: &str, blocks: &[&str]) -> Result<()> {
        for block in blocks {
            let path = self.message_path(framework_slug, block);
            let messages: serde_yaml::Mapping = read_yaml(&path)
                .map_err(|e| not_found_as(e, format!("No message file at {}", path.display())))?;

            self.messages
                .entry(framework_slug.to_string())
                .or_default()
                .insert(block.to_string(), messages);
        }
        Ok(())
    }

    /// Look up a message in a loaded block
    ///
    /// `key` is typically the framework status and `sub_key` the supplier's
    /// status; they are joined as `key-sub_key`. Returns `Ok(None)` when the
    /// block has no such message.
    pub fn get_message(
        &self,
        framework_slug: &str,
        block: &str,
        key: &str,
        sub_key: Option<&str>,
    ) -> Result<Option<&serde_yaml::Value>> {
        let messages = self
            .messages
            .get(framework_slug)
            .and_then(|blocks| blocks.get(block))
            .ok_or_else(|| {
                ContentError::not_found(format!(
                    "Message file at {} not loaded",
                    self.message_path(framework_slug, block).display()
                ))
            })?;

        let message_key = match sub_key {
            Some(sub_key) => format!("{}-{}", key, sub_key),
            None => key.to_string(),
        };
        Ok(messages.get(message_key.as_str()))
    }

    fn root_path(&self, framework_slug: &str) -> PathBuf {
        self.content_path.join("frameworks").join(framework_slug)
    }

    fn questions_path(&self, framework_slug: &str, question_set: &str) -> PathBuf {
        self.root_path(framework_slug).join("questions").join(question_set)
    }

    fn manifest_path(&self, framework_slug: &str, manifest: &str) -> PathBuf {
        self.root_path(framework_slug)
            .join("manifests")
            .join(format!("{}.yml", manifest))
    }

    fn message_path(&self, framework_slug: &str, block: &str) -> PathBuf {
        self.root_path(framework_slug)
            .join("messages")
            .join(format!("{}.yml", block))
    }
}

static SERVICE_TYPES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^serviceTypes(SCS|SaaS|PaaS|IaaS)").expect("valid regex"));

/// Per-lot service type questions all answer `serviceTypes`
fn make_question_id(question: &str) -> String {
    if SERVICE_TYPES_REGEX.is_match(question) {
        "serviceTypes".to_string()
    } else {
        question.to_string()
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)?;
    serde_yaml::from_reader(file).map_err(|e| ContentError::parse_error(path, e))
}

/// Map a missing file to [`ContentError::ContentNotFound`], keep other errors
fn not_found_as(err: ContentError, message: String) -> ContentError {
    match err {
        ContentError::Io(_) => ContentError::ContentNotFound(message),
        other => other,
    }
}
