//! The `studycomp mock-exam` command.

use std::path::PathBuf;

use anyhow::Result;

use studycomp_core::syllabus::Syllabus;

use super::{data_path, print_json, print_questions, Globals};
use crate::OutputFormat;

pub async fn execute(
    globals: &Globals,
    syllabus: Option<PathBuf>,
    subjects: usize,
    per_subject: usize,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(
        format != OutputFormat::Markdown,
        "mock-exam supports --format text or json"
    );

    let (config, engine) = globals.build_engine(offline)?;
    let syllabus = Syllabus::load_json(&data_path(&config, syllabus, "syllabus.json"))?;

    let questions = engine.mock_exam(&syllabus, subjects, per_subject).await;
    if questions.is_empty() {
        eprintln!("Warning: no subject in the syllabus has a topic to draw from.");
    }

    match format {
        OutputFormat::Json => print_json(&questions)?,
        _ => {
            println!("Mock exam ({} questions)\n", questions.len());
            print_questions(&questions);
        }
    }

    Ok(())
}
