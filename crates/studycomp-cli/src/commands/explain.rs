//! The `studycomp explain` command.

use anyhow::Result;

use super::{print_json, resolve_topic, Globals};
use crate::OutputFormat;

pub async fn execute(
    globals: &Globals,
    topic_id: Option<String>,
    topic_name: Option<String>,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(
        format != OutputFormat::Markdown,
        "explain supports --format text or json"
    );

    let (_, engine) = globals.build_engine(offline)?;
    let (topic_id, topic_name) = resolve_topic(engine.knowledge(), topic_id, topic_name)?;

    let content = engine.explain(&topic_id, &topic_name).await;

    if format == OutputFormat::Json {
        return print_json(&content);
    }

    println!("# {}\n", content.title);
    println!("{}\n", content.explanation);
    if !content.key_points.is_empty() {
        println!("Key points:");
        for point in &content.key_points {
            println!("  - {point}");
        }
        println!();
    }
    if !content.example.is_empty() {
        println!("Example: {}", content.example);
    }
    if let Some(summary) = &content.summary {
        println!("Summary: {summary}");
    }

    Ok(())
}
