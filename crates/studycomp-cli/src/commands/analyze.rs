//! The `studycomp analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studycomp_core::report::AnalysisReport;
use studycomp_core::syllabus::{ProgressSnapshot, Syllabus};

use super::{data_path, print_json, Globals};
use crate::OutputFormat;

pub fn execute(
    globals: &Globals,
    syllabus: Option<PathBuf>,
    progress: Option<PathBuf>,
    student: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = globals.load_config()?;
    let syllabus = Syllabus::load_json(&data_path(&config, syllabus, "syllabus.json"))?;
    let progress = ProgressSnapshot::load_json(&data_path(&config, progress, "progress.json"))?;

    let report = AnalysisReport::build(&syllabus, &progress, student);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Text => print_summary(&report),
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    if let Some(student) = &report.student {
        println!("Student: {student}");
    }
    println!("Syllabus coverage: {}%", report.overall_coverage_percent);
    println!("{}", report.performance.feedback.replace("**", ""));

    if !report.subjects.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Topics", "Quiz Avg", "Readiness", "Status"]);
        for s in &report.subjects {
            let quiz_avg = s
                .quiz_performance_fraction
                .map(|f| format!("{:.1}%", f * 100.0))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(&s.subject_name),
                Cell::new(format!("{}/{}", s.topics_completed, s.topics_total)),
                Cell::new(quiz_avg),
                Cell::new(format!("{}%", s.readiness_score)),
                Cell::new(s.status),
            ]);
        }
        println!("\n{table}");
    }

    if !report.weak_topics.is_empty() {
        println!("\nTopics to revisit:");
        for w in &report.weak_topics {
            println!(
                "  - {} ({:.0}%)",
                w.name.as_deref().unwrap_or(&w.topic_id),
                w.percent
            );
        }
    }
}
