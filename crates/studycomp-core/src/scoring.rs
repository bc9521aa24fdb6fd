//! Performance classification and subject readiness scoring.
//!
//! Readiness is a 0-100 composite: topic coverage contributes up to 50
//! points and average quiz percentage contributes up to 50. Every function
//! here is pure; zero denominators are defined as zero.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::TopicRecord;
use crate::syllabus::{ProgressSnapshot, Subject, Syllabus};

/// Average percentage at or above which performance is "Excellent".
pub const EXCELLENT_THRESHOLD: f64 = 60.0;

/// Readiness score at or above which a subject is exam ready.
pub const EXAM_READY_THRESHOLD: u32 = 80;

/// Readiness score at or above which a subject is moderate.
pub const MODERATE_THRESHOLD: u32 = 60;

/// Two-point performance scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Excellent,
    LowUnderstanding,
}

impl PerformanceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::LowUnderstanding => "Low level understanding",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate classification of a student's quiz history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub level: PerformanceLevel,
    pub avg_percent: f64,
    pub feedback: String,
    /// Topics scored below 60%, in input order.
    pub weak_topics: Vec<String>,
}

/// Classify performance over a set of quiz records.
pub fn analyze_performance(records: &[TopicRecord]) -> PerformanceSummary {
    let total_score: u64 = records.iter().map(|r| r.score.min(r.total) as u64).sum();
    let total_possible: u64 = records.iter().map(|r| r.total as u64).sum();

    let avg_percent = if total_possible == 0 {
        0.0
    } else {
        total_score as f64 / total_possible as f64 * 100.0
    };

    let level = if avg_percent >= EXCELLENT_THRESHOLD {
        PerformanceLevel::Excellent
    } else {
        PerformanceLevel::LowUnderstanding
    };

    // score < 0.6 * total, kept in integers so 3/5 is not weak
    let weak_topics = records
        .iter()
        .filter(|r| 10 * (r.score as u64) < 6 * (r.total as u64))
        .map(|r| r.topic_id.clone())
        .collect();

    let feedback = format!(
        "Based on your recent tests, your understanding is **{level}** ({}% avg).",
        avg_percent as u32
    );

    PerformanceSummary {
        level,
        avg_percent,
        feedback,
        weak_topics,
    }
}

/// Readiness band of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessStatus {
    ExamReady,
    Moderate,
    NeedsImprovement,
}

impl ReadinessStatus {
    pub fn from_score(score: u32) -> Self {
        if score >= EXAM_READY_THRESHOLD {
            ReadinessStatus::ExamReady
        } else if score >= MODERATE_THRESHOLD {
            ReadinessStatus::Moderate
        } else {
            ReadinessStatus::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadinessStatus::ExamReady => "Exam Ready",
            ReadinessStatus::Moderate => "Moderate",
            ReadinessStatus::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Readiness of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReadiness {
    pub subject_id: String,
    pub subject_name: String,
    pub topics_total: usize,
    pub topics_completed: usize,
    /// Completed share of the subject's topics, in `[0, 1]`.
    pub coverage_fraction: f64,
    /// Average quiz fraction, `None` when no quiz was counted.
    pub quiz_performance_fraction: Option<f64>,
    pub quizzes_counted: usize,
    pub readiness_score: u32,
    pub status: ReadinessStatus,
}

/// Compute the readiness of a single subject.
pub fn compute_subject_readiness(
    subject: &Subject,
    completed: &HashSet<String>,
    quiz_scores: &HashMap<String, TopicRecord>,
) -> SubjectReadiness {
    let mut topics_total = 0usize;
    let mut topics_completed = 0usize;
    let mut score_sum = 0.0f64;
    let mut quizzes_counted = 0usize;

    for topic in subject.topics() {
        topics_total += 1;
        if completed.contains(&topic.id) {
            topics_completed += 1;
        }
        if let Some(record) = quiz_scores.get(&topic.id) {
            if let Some(percent) = record.percent() {
                score_sum += percent;
                quizzes_counted += 1;
            }
        }
    }

    let coverage_fraction = if topics_total == 0 {
        0.0
    } else {
        topics_completed as f64 / topics_total as f64
    };
    let avg_quiz_percent = if quizzes_counted == 0 {
        None
    } else {
        Some(score_sum / quizzes_counted as f64)
    };

    let coverage_score = coverage_fraction * 50.0;
    let perf_score = avg_quiz_percent.map_or(0.0, |avg| avg * 0.5);
    let readiness_score = ((coverage_score + perf_score) as u32).min(100);

    SubjectReadiness {
        subject_id: subject.id.clone(),
        subject_name: subject.name.clone(),
        topics_total,
        topics_completed,
        coverage_fraction,
        quiz_performance_fraction: avg_quiz_percent.map(|avg| avg / 100.0),
        quizzes_counted,
        readiness_score,
        status: ReadinessStatus::from_score(readiness_score),
    }
}

/// Readiness of every subject in a syllabus, in syllabus order.
pub fn compute_syllabus_readiness(
    syllabus: &Syllabus,
    progress: &ProgressSnapshot,
) -> Vec<SubjectReadiness> {
    syllabus
        .subjects
        .iter()
        .map(|s| compute_subject_readiness(s, &progress.topics_completed, &progress.quiz_scores))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syllabus::{Topic, Unit};

    fn subject(topic_ids: &[&str]) -> Subject {
        Subject {
            id: "s".into(),
            name: "Subject".into(),
            units: vec![Unit {
                id: "s_u1".into(),
                name: "Unit 1".into(),
                topics: topic_ids
                    .iter()
                    .map(|id| Topic {
                        id: id.to_string(),
                        name: id.to_uppercase(),
                        difficulty: None,
                    })
                    .collect(),
            }],
        }
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn scores(records: &[(&str, u32, u32)]) -> HashMap<String, TopicRecord> {
        records
            .iter()
            .map(|(id, s, t)| (id.to_string(), TopicRecord::new(id, *s, *t)))
            .collect()
    }

    #[test]
    fn performance_empty() {
        let summary = analyze_performance(&[]);
        assert_eq!(summary.avg_percent, 0.0);
        assert_eq!(summary.level, PerformanceLevel::LowUnderstanding);
        assert!(summary.weak_topics.is_empty());
        assert_eq!(
            summary.feedback,
            "Based on your recent tests, your understanding is **Low level understanding** (0% avg)."
        );
    }

    #[test]
    fn performance_boundary_is_inclusive() {
        let records = vec![TopicRecord::new("a", 9, 10), TopicRecord::new("b", 3, 10)];
        let summary = analyze_performance(&records);
        assert!((summary.avg_percent - 60.0).abs() < 1e-9);
        assert_eq!(summary.level, PerformanceLevel::Excellent);
        assert_eq!(summary.weak_topics, vec!["b"]);
        assert!(summary.feedback.contains("**Excellent** (60% avg)"));
    }

    #[test]
    fn weak_topic_threshold_is_exact() {
        let records = vec![
            TopicRecord::new("exact", 3, 5),
            TopicRecord::new("below", 5, 9),
            TopicRecord::new("empty", 0, 0),
        ];
        let summary = analyze_performance(&records);
        assert_eq!(summary.weak_topics, vec!["below"]);
    }

    #[test]
    fn feedback_truncates_average() {
        let summary = analyze_performance(&[TopicRecord::new("a", 2, 3)]);
        assert!(summary.feedback.ends_with("(66% avg)."));
        assert_eq!(summary.level, PerformanceLevel::Excellent);
    }

    #[test]
    fn readiness_empty_subject() {
        let empty = Subject {
            id: "e".into(),
            name: "Empty".into(),
            units: vec![],
        };
        let r = compute_subject_readiness(&empty, &set(&["x"]), &scores(&[("x", 5, 5)]));
        assert_eq!(r.readiness_score, 0);
        assert_eq!(r.status, ReadinessStatus::NeedsImprovement);
        assert_eq!(r.coverage_fraction, 0.0);
        assert_eq!(r.quiz_performance_fraction, None);
    }

    #[test]
    fn full_coverage_without_quizzes_is_fifty() {
        let s = subject(&["t1", "t2"]);
        let r = compute_subject_readiness(&s, &set(&["t1", "t2"]), &HashMap::new());
        assert_eq!(r.readiness_score, 50);
        assert_eq!(r.coverage_fraction, 1.0);
        assert_eq!(r.quiz_performance_fraction, None);
        // 50 sits below the Moderate band
        assert_eq!(r.status, ReadinessStatus::NeedsImprovement);
    }

    #[test]
    fn perfect_quizzes_without_coverage_is_fifty() {
        let s = subject(&["t1", "t2"]);
        let r = compute_subject_readiness(&s, &HashSet::new(), &scores(&[("t1", 4, 4), ("t2", 10, 10)]));
        assert_eq!(r.readiness_score, 50);
        assert_eq!(r.quizzes_counted, 2);
        assert_eq!(r.quiz_performance_fraction, Some(1.0));
    }

    #[test]
    fn readiness_combines_and_bands() {
        let s = subject(&["t1", "t2", "t3", "t4"]);
        // coverage 3/4 -> 37.5, quizzes (100 + 50) / 2 = 75 -> 37.5
        let r = compute_subject_readiness(
            &s,
            &set(&["t1", "t2", "t3"]),
            &scores(&[("t1", 2, 2), ("t2", 1, 2), ("other", 0, 9), ("t4", 0, 0)]),
        );
        assert_eq!(r.readiness_score, 75);
        assert_eq!(r.quizzes_counted, 2);
        assert_eq!(r.status, ReadinessStatus::Moderate);

        let ready = compute_subject_readiness(&s, &set(&["t1", "t2", "t3", "t4"]), &scores(&[("t1", 3, 5)]));
        assert_eq!(ready.readiness_score, 80);
        assert_eq!(ready.status, ReadinessStatus::ExamReady);
    }

    #[test]
    fn over_reported_scores_are_capped() {
        let s = subject(&["t1"]);
        let r = compute_subject_readiness(&s, &set(&["t1"]), &scores(&[("t1", 8, 4)]));
        assert_eq!(r.quiz_performance_fraction, Some(1.0));
        assert_eq!(r.readiness_score, 100);
        assert_eq!(r.status, ReadinessStatus::ExamReady);

        // an inflated record must not mask a weak one
        let s = subject(&["t1", "t2"]);
        let r = compute_subject_readiness(
            &s,
            &set(&["t1", "t2"]),
            &scores(&[("t1", 8, 4), ("t2", 1, 4)]),
        );
        assert_eq!(r.quiz_performance_fraction, Some(0.625));
        assert_eq!(r.readiness_score, 81);
        assert_eq!(r.status, ReadinessStatus::ExamReady);
    }

    #[test]
    fn performance_caps_score_at_total() {
        let records = vec![TopicRecord::new("a", 9, 3), TopicRecord::new("b", 0, 3)];
        let summary = analyze_performance(&records);
        assert_eq!(summary.avg_percent, 50.0);
        assert_eq!(summary.level, PerformanceLevel::LowUnderstanding);
        assert_eq!(summary.weak_topics, vec!["b".to_string()]);
    }

    #[test]
    fn status_bands() {
        assert_eq!(ReadinessStatus::from_score(100), ReadinessStatus::ExamReady);
        assert_eq!(ReadinessStatus::from_score(80), ReadinessStatus::ExamReady);
        assert_eq!(ReadinessStatus::from_score(79), ReadinessStatus::Moderate);
        assert_eq!(ReadinessStatus::from_score(60), ReadinessStatus::Moderate);
        assert_eq!(ReadinessStatus::from_score(59), ReadinessStatus::NeedsImprovement);
        assert_eq!(ReadinessStatus::ExamReady.to_string(), "Exam Ready");
    }

    #[test]
    fn syllabus_readiness_keeps_order() {
        let mut syllabus = Syllabus::default();
        syllabus.add_subject("os", "Operating Systems", "Scheduling");
        syllabus.add_subject("db", "Databases", "Normalization");
        let progress = ProgressSnapshot {
            topics_completed: set(&["db_u1_t1"]),
            quiz_scores: scores(&[("os_u1_t1", 1, 2)]),
        };
        let all = compute_syllabus_readiness(&syllabus, &progress);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].subject_id, "os");
        assert_eq!(all[0].readiness_score, 25);
        assert_eq!(all[1].subject_id, "db");
        assert_eq!(all[1].readiness_score, 50);
    }
}
