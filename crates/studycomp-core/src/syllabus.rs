//! Syllabus tree and progress snapshots.
//!
//! Both are owned by external stores and handed to the core as JSON
//! documents; the core only reads them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, TopicRecord};

/// A course syllabus: subjects, each split into units of topics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Syllabus {
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl Subject {
    /// A subject with a single unit holding a single topic, the shape a
    /// professor upload creates.
    pub fn single_topic(id: &str, name: &str, topic_name: &str) -> Self {
        let unit_id = format!("{id}_u1");
        Self {
            id: id.to_string(),
            name: name.to_string(),
            units: vec![Unit {
                id: unit_id.clone(),
                name: "Unit 1".to_string(),
                topics: vec![Topic {
                    id: format!("{unit_id}_t1"),
                    name: topic_name.to_string(),
                    difficulty: Some(Difficulty::Moderate),
                }],
            }],
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.units.iter().flat_map(|u| u.topics.iter())
    }

    pub fn topic_count(&self) -> usize {
        self.units.iter().map(|u| u.topics.len()).sum()
    }
}

impl Syllabus {
    /// Load a syllabus from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read syllabus from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse syllabus JSON: {}", path.display()))
    }

    /// Save the syllabus as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize syllabus")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write syllabus to {}", path.display()))?;
        Ok(())
    }

    /// Append an uploaded subject with one unit and one topic.
    pub fn add_subject(&mut self, id: &str, name: &str, topic_name: &str) -> &Subject {
        self.subjects.push(Subject::single_topic(id, name, topic_name));
        &self.subjects[self.subjects.len() - 1]
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.subjects.iter().flat_map(Subject::topics)
    }

    pub fn find_topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics().find(|t| t.id == topic_id)
    }

    pub fn total_topics(&self) -> usize {
        self.subjects.iter().map(Subject::topic_count).sum()
    }

    /// Whole-syllabus completion as a truncated percentage. Completed ids
    /// that are not in the syllabus do not count.
    pub fn coverage_percent(&self, completed: &HashSet<String>) -> u32 {
        let total = self.total_topics();
        if total == 0 {
            return 0;
        }
        let done = self.topics().filter(|t| completed.contains(&t.id)).count();
        (done as f64 / total as f64 * 100.0) as u32
    }
}

/// One student's progress as read from the progress store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub topics_completed: HashSet<String>,
    #[serde(default)]
    pub quiz_scores: HashMap<String, TopicRecord>,
}

impl ProgressSnapshot {
    /// Load a progress snapshot from a JSON file. Records without a
    /// `topic_id` take their map key.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read progress from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse progress JSON: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut snapshot: ProgressSnapshot = serde_json::from_str(content)?;
        for (key, record) in snapshot.quiz_scores.iter_mut() {
            if record.topic_id.is_empty() {
                record.topic_id = key.clone();
            }
        }
        Ok(snapshot)
    }

    /// Quiz records ordered by topic id, for stable output.
    pub fn records(&self) -> Vec<TopicRecord> {
        let mut records: Vec<TopicRecord> = self.quiz_scores.values().cloned().collect();
        records.sort_by(|a, b| a.topic_id.cmp(&b.topic_id));
        records
    }
}
