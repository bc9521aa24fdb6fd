//! The `studycomp add-subject` command.

use std::path::PathBuf;

use anyhow::Result;

use studycomp_core::syllabus::Syllabus;

use super::{data_path, Globals};

pub fn execute(
    globals: &Globals,
    syllabus: Option<PathBuf>,
    id: String,
    name: String,
    topic: String,
) -> Result<()> {
    let config = globals.load_config()?;
    let path = data_path(&config, syllabus, "syllabus.json");

    let mut syllabus = if path.exists() {
        Syllabus::load_json(&path)?
    } else {
        Syllabus::default()
    };
    anyhow::ensure!(
        syllabus.subjects.iter().all(|s| s.id != id),
        "subject '{id}' already exists in {}",
        path.display()
    );

    let subject = syllabus.add_subject(&id, &name, &topic);
    let topic_id = subject.topics().next().map(|t| t.id.clone()).unwrap_or_default();
    syllabus.save_json(&path)?;

    println!("Added subject '{name}' with topic {topic_id} to {}", path.display());
    Ok(())
}
