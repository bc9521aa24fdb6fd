//! studycomp CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use studycomp_core::model::Difficulty;

mod commands;

#[derive(Parser)]
#[command(name = "studycomp", version, about = "Syllabus study companion: quizzes, explanations, readiness")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Knowledge base file or directory replacing the built-in one
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a quiz for one topic
    Quiz {
        /// Knowledge-base key of the topic (e.g. "cc1"); derived from the
        /// name when omitted
        #[arg(long, required_unless_present = "topic_name")]
        topic_id: Option<String>,

        /// Display name; defaults to the knowledge-base title
        #[arg(long)]
        topic_name: Option<String>,

        /// easy, moderate or hard (default from config)
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,

        /// Offset applied to mock question indices
        #[arg(long, default_value = "0")]
        seed_offset: u64,

        /// Skip the configured provider
        #[arg(long)]
        offline: bool,

        /// Output format: text, json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Explain a topic
    Explain {
        #[arg(long, required_unless_present = "topic_name")]
        topic_id: Option<String>,

        #[arg(long)]
        topic_name: Option<String>,

        #[arg(long)]
        offline: bool,

        /// Output format: text, json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Score progress against a syllabus
    Analyze {
        /// Syllabus JSON (default: <data_dir>/syllabus.json)
        #[arg(long)]
        syllabus: Option<PathBuf>,

        /// Progress snapshot JSON (default: <data_dir>/progress.json)
        #[arg(long)]
        progress: Option<PathBuf>,

        /// Student name shown in the report
        #[arg(long)]
        student: Option<String>,

        /// Output format: text, json, markdown
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also save the report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build a mixed Hard exam across subjects
    MockExam {
        /// Syllabus JSON (default: <data_dir>/syllabus.json)
        #[arg(long)]
        syllabus: Option<PathBuf>,

        /// Number of leading subjects to draw from
        #[arg(long, default_value = "3")]
        subjects: usize,

        /// Questions per subject
        #[arg(long, default_value = "1")]
        per_subject: usize,

        #[arg(long)]
        offline: bool,

        /// Output format: text, json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List syllabus topics and their knowledge-base coverage
    Topics {
        /// Syllabus JSON (default: <data_dir>/syllabus.json)
        #[arg(long)]
        syllabus: Option<PathBuf>,
    },

    /// Append an uploaded subject with a single topic to a syllabus
    AddSubject {
        /// Syllabus JSON (default: <data_dir>/syllabus.json)
        #[arg(long)]
        syllabus: Option<PathBuf>,

        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        /// Name of the subject's first topic
        #[arg(long)]
        topic: String,
    },

    /// Validate knowledge-base files
    Validate,

    /// Create starter config and sample data
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("studycomp=info")),
        )
        .init();

    let cli = Cli::parse();
    let globals = commands::Globals {
        config: cli.config,
        knowledge_base: cli.knowledge_base,
    };

    let result = match cli.command {
        Commands::Quiz {
            topic_id,
            topic_name,
            difficulty,
            count,
            seed_offset,
            offline,
            format,
        } => {
            commands::quiz::execute(
                &globals,
                commands::quiz::QuizArgs {
                    topic_id,
                    topic_name,
                    difficulty,
                    count,
                    seed_offset,
                    offline,
                },
                format,
            )
            .await
        }
        Commands::Explain {
            topic_id,
            topic_name,
            offline,
            format,
        } => commands::explain::execute(&globals, topic_id, topic_name, offline, format).await,
        Commands::Analyze {
            syllabus,
            progress,
            student,
            format,
            output,
        } => commands::analyze::execute(&globals, syllabus, progress, student, format, output),
        Commands::MockExam {
            syllabus,
            subjects,
            per_subject,
            offline,
            format,
        } => {
            commands::mock_exam::execute(&globals, syllabus, subjects, per_subject, offline, format)
                .await
        }
        Commands::Topics { syllabus } => commands::topics::execute(&globals, syllabus),
        Commands::AddSubject {
            syllabus,
            id,
            name,
            topic,
        } => commands::add_subject::execute(&globals, syllabus, id, name, topic),
        Commands::Validate => commands::validate::execute(&globals),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
