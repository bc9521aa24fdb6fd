//! Subcommand implementations and the setup they share.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use studycomp_core::engine::QuizEngine;
use studycomp_core::knowledge::{load_knowledge_base, KnowledgeBase};
use studycomp_core::model::Question;
use studycomp_providers::config::{load_config_from, StudycompConfig};

pub mod add_subject;
pub mod analyze;
pub mod explain;
pub mod init;
pub mod mock_exam;
pub mod quiz;
pub mod topics;
pub mod validate;

/// Flags accepted by every subcommand.
pub struct Globals {
    pub config: Option<PathBuf>,
    pub knowledge_base: Option<PathBuf>,
}

impl Globals {
    pub fn load_config(&self) -> Result<StudycompConfig> {
        load_config_from(self.config.as_deref())
    }

    /// The `--knowledge-base` flag wins over the config file; neither means
    /// the built-in base.
    pub fn load_knowledge(&self, config: &StudycompConfig) -> Result<KnowledgeBase> {
        match self.knowledge_base.as_ref().or(config.knowledge_base.as_ref()) {
            Some(path) => {
                let base = load_knowledge_base(path)?;
                tracing::debug!(path = %path.display(), topics = base.len(), "loaded knowledge base");
                Ok(base)
            }
            None => KnowledgeBase::builtin(),
        }
    }

    /// A quiz engine wired to the configured provider unless `offline`.
    pub fn build_engine(&self, offline: bool) -> Result<(StudycompConfig, QuizEngine)> {
        let config = self.load_config()?;
        let knowledge = Arc::new(self.load_knowledge(&config)?);
        let generator = if offline {
            None
        } else {
            config.default_generator()?
        };
        let engine = QuizEngine::new(knowledge, generator, config.engine_config());
        Ok((config, engine))
    }
}

/// An explicit path, or `file_name` under the configured data directory.
/// Resolve the knowledge-base key and display name for a topic. A missing
/// id is derived from the name; a missing name falls back to the curated
/// title, then to the id.
pub fn resolve_topic(
    knowledge: &KnowledgeBase,
    topic_id: Option<String>,
    topic_name: Option<String>,
) -> Result<(String, String)> {
    let topic_id = match (topic_id, &topic_name) {
        (Some(id), _) => id,
        (None, Some(name)) => KnowledgeBase::topic_key_for_name(name),
        (None, None) => anyhow::bail!("pass --topic-id or --topic-name"),
    };
    let topic_name = topic_name.unwrap_or_else(|| {
        knowledge
            .get(&topic_id)
            .map(|entry| entry.title.clone())
            .unwrap_or_else(|| topic_id.clone())
    });
    Ok((topic_id, topic_name))
}

pub fn data_path(config: &StudycompConfig, explicit: Option<PathBuf>, file_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| config.data_dir.join(file_name))
}

pub fn print_questions(questions: &[Question]) {
    for q in questions {
        println!("{}. {}", q.id, q.question);
        for (label, option) in ('A'..='Z').zip(&q.options) {
            println!("   {label}) {option}");
        }
        if let Some(image) = &q.image {
            println!("   Image: {image}");
        }
        println!("   Answer: {}", q.answer);
        println!();
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
