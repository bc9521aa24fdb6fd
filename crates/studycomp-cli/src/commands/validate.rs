//! The `studycomp validate` command.

use anyhow::Result;

use studycomp_core::knowledge::validate_knowledge_base;

use super::Globals;

pub fn execute(globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    let base = globals.load_knowledge(&config)?;

    let source = globals
        .knowledge_base
        .as_ref()
        .or(config.knowledge_base.as_ref())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    let questions: usize = base.entries().map(|(_, e)| e.quiz.len()).sum();
    println!(
        "Knowledge base: {source} ({} topics, {questions} questions)",
        base.len()
    );

    let warnings = validate_knowledge_base(&base);
    for w in &warnings {
        let prefix = w
            .topic_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Knowledge base valid.");
        Ok(())
    } else {
        anyhow::bail!("{} warning(s) found", warnings.len())
    }
}
