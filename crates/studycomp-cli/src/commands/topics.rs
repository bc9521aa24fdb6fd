//! The `studycomp topics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studycomp_core::syllabus::Syllabus;

use super::{data_path, Globals};

pub fn execute(globals: &Globals, syllabus: Option<PathBuf>) -> Result<()> {
    let config = globals.load_config()?;
    let knowledge = globals.load_knowledge(&config)?;
    let syllabus = Syllabus::load_json(&data_path(&config, syllabus, "syllabus.json"))?;

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Unit", "Topic ID", "Topic", "Difficulty", "Curated"]);

    let mut curated = 0usize;
    for subject in &syllabus.subjects {
        for unit in &subject.units {
            for topic in &unit.topics {
                let questions = knowledge.get(&topic.id).map(|e| e.quiz.len());
                if questions.is_some() {
                    curated += 1;
                }
                table.add_row(vec![
                    Cell::new(&subject.name),
                    Cell::new(&unit.name),
                    Cell::new(&topic.id),
                    Cell::new(&topic.name),
                    Cell::new(topic.difficulty.unwrap_or_default()),
                    Cell::new(
                        questions
                            .map(|n| format!("{n} questions"))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ]);
            }
        }
    }

    println!("{table}");
    println!(
        "\n{} topics, {curated} with curated content.",
        syllabus.total_topics()
    );
    Ok(())
}
