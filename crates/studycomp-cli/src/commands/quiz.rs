//! The `studycomp quiz` command.

use anyhow::Result;

use studycomp_core::engine::QuizRequest;
use studycomp_core::model::Difficulty;

use super::{print_json, print_questions, resolve_topic, Globals};
use crate::OutputFormat;

pub struct QuizArgs {
    pub topic_id: Option<String>,
    pub topic_name: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub count: Option<usize>,
    pub seed_offset: u64,
    pub offline: bool,
}

pub async fn execute(globals: &Globals, args: QuizArgs, format: OutputFormat) -> Result<()> {
    anyhow::ensure!(
        format != OutputFormat::Markdown,
        "quiz supports --format text or json"
    );

    let (config, engine) = globals.build_engine(args.offline)?;

    let (topic_id, topic_name) =
        resolve_topic(engine.knowledge(), args.topic_id, args.topic_name)?;
    let difficulty = args.difficulty.unwrap_or(config.default_difficulty);
    let count = args.count.unwrap_or(config.questions_per_quiz);

    let request = QuizRequest::new(&topic_id, &topic_name, difficulty, count)
        .with_seed_offset(args.seed_offset);
    let questions = engine.generate_quiz(&request).await;

    match format {
        OutputFormat::Json => print_json(&questions)?,
        _ => {
            println!("Quiz: {topic_name} ({difficulty}, {} questions)\n", questions.len());
            print_questions(&questions);
        }
    }

    Ok(())
}
