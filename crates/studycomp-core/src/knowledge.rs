//! Curated knowledge base loading and validation.
//!
//! The knowledge base is a TOML document of topics keyed by topic id. A
//! built-in base ships with the crate; replacements can be loaded from a
//! file or a directory of files.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{check_options, CuratedQuestion, Difficulty, KnowledgeEntry};

const BUILTIN_KNOWLEDGE_BASE: &str = include_str!("../data/knowledge_base.toml");

/// Intermediate TOML structure for knowledge-base files.
#[derive(Debug, Deserialize)]
struct TomlKnowledgeFile {
    #[serde(default)]
    topics: BTreeMap<String, KnowledgeEntry>,
}

/// Read-only mapping from topic id to curated content.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    topics: BTreeMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// The knowledge base embedded in the crate.
    pub fn builtin() -> Result<Self> {
        parse_knowledge_base_str(BUILTIN_KNOWLEDGE_BASE, Path::new("<builtin>"))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, topic_id: &str) -> Option<&KnowledgeEntry> {
        self.topics.get(&normalize_key(topic_id))
    }

    /// Curated questions for a topic at a difficulty, with the Easy+Moderate
    /// substitution applied. Unknown topics yield an empty pool.
    pub fn quiz_pool(&self, topic_id: &str, difficulty: Difficulty) -> Vec<&CuratedQuestion> {
        self.get(topic_id)
            .map(|entry| entry.quiz.pool(difficulty))
            .unwrap_or_default()
    }

    /// Merge `other` into this base; topics in `other` win on conflict.
    pub fn merge(&mut self, other: KnowledgeBase) {
        self.topics.extend(other.topics);
    }

    pub fn topic_ids(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &KnowledgeEntry)> {
        self.topics.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Lookup key for callers that only know a topic's display name:
    /// lowercased with all whitespace removed.
    pub fn topic_key_for_name(name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

fn normalize_key(topic_id: &str) -> String {
    topic_id.trim().to_lowercase()
}

/// Parse a single TOML file into a `KnowledgeBase`.
pub fn parse_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read knowledge base file: {}", path.display()))?;

    parse_knowledge_base_str(&content, path)
}

/// Parse a TOML string into a `KnowledgeBase`.
pub fn parse_knowledge_base_str(content: &str, source_path: &Path) -> Result<KnowledgeBase> {
    let parsed: TomlKnowledgeFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let topics = parsed
        .topics
        .into_iter()
        .map(|(key, entry)| (normalize_key(&key), entry))
        .collect();

    Ok(KnowledgeBase { topics })
}

/// Load a knowledge base from a file, or merge every `.toml` file found
/// recursively under a directory. Unparseable files in a directory are
/// skipped with a warning.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    if !path.is_dir() {
        return parse_knowledge_base(path);
    }

    let mut base = KnowledgeBase::empty();
    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let file = entry.path();
        if file.is_dir() {
            base.merge(load_knowledge_base(&file)?);
        } else if file.extension().is_some_and(|ext| ext == "toml") {
            match parse_knowledge_base(&file) {
                Ok(part) => base.merge(part),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", file.display(), e);
                }
            }
        }
    }

    Ok(base)
}

/// A data-integrity problem found in the knowledge base.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The topic id (if applicable).
    pub topic_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate curated content: every question needs text and four distinct
/// options that include its answer.
pub fn validate_knowledge_base(base: &KnowledgeBase) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (topic_id, entry) in base.entries() {
        if entry.title.trim().is_empty() {
            warnings.push(ValidationWarning {
                topic_id: Some(topic_id.to_string()),
                message: "title is empty".into(),
            });
        }

        for difficulty in Difficulty::ALL {
            for (i, q) in entry.quiz.questions(difficulty).iter().enumerate() {
                let location = format!("{difficulty} question {}", i + 1);
                if q.question.trim().is_empty() {
                    warnings.push(ValidationWarning {
                        topic_id: Some(topic_id.to_string()),
                        message: format!("{location}: question text is empty"),
                    });
                }
                if let Err(problem) = check_options(&q.options, &q.answer) {
                    warnings.push(ValidationWarning {
                        topic_id: Some(topic_id.to_string()),
                        message: format!("{location}: {problem}"),
                    });
                }
            }
        }
    }

    warnings
}
