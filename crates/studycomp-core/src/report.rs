//! Analysis report types with JSON persistence and Markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{analyze_performance, compute_syllabus_readiness, PerformanceSummary, SubjectReadiness};
use crate::syllabus::{ProgressSnapshot, Syllabus};

/// A student's progress analysis at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Student the report belongs to, if known.
    #[serde(default)]
    pub student: Option<String>,
    /// Whole-syllabus completion percentage.
    pub overall_coverage_percent: u32,
    pub performance: PerformanceSummary,
    /// Weak topics with display names resolved against the syllabus.
    #[serde(default)]
    pub weak_topics: Vec<WeakTopic>,
    /// Per-subject readiness, in syllabus order.
    pub subjects: Vec<SubjectReadiness>,
}

/// A topic scored below the weak threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakTopic {
    pub topic_id: String,
    /// Topic name, or `None` when the id is not in the syllabus.
    pub name: Option<String>,
    pub percent: f64,
}

impl AnalysisReport {
    /// Score a progress snapshot against a syllabus.
    pub fn build(syllabus: &Syllabus, progress: &ProgressSnapshot, student: Option<String>) -> Self {
        let records = progress.records();
        let performance = analyze_performance(&records);

        let weak_topics = performance
            .weak_topics
            .iter()
            .map(|topic_id| WeakTopic {
                topic_id: topic_id.clone(),
                name: syllabus.find_topic(topic_id).map(|t| t.name.clone()),
                percent: progress
                    .quiz_scores
                    .get(topic_id)
                    .and_then(|r| r.percent())
                    .unwrap_or(0.0),
            })
            .collect();

        let report = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            student,
            overall_coverage_percent: syllabus.coverage_percent(&progress.topics_completed),
            performance,
            weak_topics,
            subjects: compute_syllabus_readiness(syllabus, progress),
        };
        tracing::debug!(
            report_id = %report.id,
            subjects = report.subjects.len(),
            coverage = report.overall_coverage_percent,
            "built analysis report"
        );
        report
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        match &self.student {
            Some(student) => md.push_str(&format!("## Progress Analysis: {student}\n\n")),
            None => md.push_str("## Progress Analysis\n\n"),
        }
        md.push_str(&format!(
            "**Syllabus coverage:** {}%\n\n",
            self.overall_coverage_percent
        ));
        md.push_str(&format!("{}\n\n", self.performance.feedback));

        if !self.subjects.is_empty() {
            md.push_str("### Subject Readiness\n\n");
            md.push_str("| Subject | Topics | Quizzes | Readiness | Status |\n");
            md.push_str("|---------|--------|---------|-----------|--------|\n");
            for s in &self.subjects {
                md.push_str(&format!(
                    "| {} | {}/{} | {} | {}% | {} |\n",
                    s.subject_name,
                    s.topics_completed,
                    s.topics_total,
                    s.quizzes_counted,
                    s.readiness_score,
                    s.status
                ));
            }
            md.push('\n');
        }

        if !self.weak_topics.is_empty() {
            md.push_str("### Topics to Revisit\n\n");
            for w in &self.weak_topics {
                md.push_str(&format!(
                    "- {} ({:.0}%)\n",
                    w.name.as_deref().unwrap_or(&w.topic_id),
                    w.percent
                ));
            }
        }

        md
    }
}
