//! The `studycomp init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("studycomp.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data")?;
    write_if_missing(Path::new("data/syllabus.json"), SAMPLE_SYLLABUS)?;
    write_if_missing(Path::new("data/progress.json"), SAMPLE_PROGRESS)?;

    println!("\nNext steps:");
    println!("  1. Set default_provider in studycomp.toml (or leave it unset to stay offline)");
    println!("  2. Run: studycomp quiz --topic-id cc1");
    println!("  3. Run: studycomp analyze");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studycomp configuration
#
# Without default_provider every quiz is built from the curated knowledge
# base plus deterministic mock questions.
# default_provider = "openai"
default_model = "gpt-4o-mini"
temperature = 0.7
generation_timeout_secs = 20
max_retries = 1
default_difficulty = "moderate"
questions_per_quiz = 5
data_dir = "./data"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const SAMPLE_SYLLABUS: &str = r#"{
  "subjects": [
    {
      "id": "cc",
      "name": "Cloud Computing",
      "units": [
        {
          "id": "cc_u1",
          "name": "Unit 1: Introduction",
          "topics": [
            {"id": "cc1", "name": "Cloud Architecture & Service Models", "difficulty": "easy"},
            {"id": "cc2", "name": "Virtualization Technology", "difficulty": "moderate"}
          ]
        }
      ]
    },
    {
      "id": "ai",
      "name": "Artificial Intelligence",
      "units": [
        {
          "id": "ai_u1",
          "name": "Unit 1: Machine Learning",
          "topics": [
            {"id": "ai1", "name": "Supervised vs Unsupervised Learning", "difficulty": "moderate"},
            {"id": "ai2", "name": "Neural Networks & Deep Learning", "difficulty": "hard"}
          ]
        }
      ]
    },
    {
      "id": "java",
      "name": "Advanced Java",
      "units": [
        {
          "id": "java_u1",
          "name": "Unit 1: Web Components",
          "topics": [
            {"id": "j1", "name": "J2EE & Servlets", "difficulty": "moderate"}
          ]
        }
      ]
    },
    {
      "id": "bio",
      "name": "Biotech Entrepreneurship",
      "units": [
        {
          "id": "bio_u1",
          "name": "Unit 1: Foundations",
          "topics": [
            {"id": "bio1", "name": "Business Models in Biotech", "difficulty": "easy"},
            {"id": "bio2", "name": "IPR & Patenting", "difficulty": "moderate"}
          ]
        }
      ]
    }
  ]
}
"#;

const SAMPLE_PROGRESS: &str = r#"{
  "topics_completed": ["cc1", "cc2", "ai1"],
  "quiz_scores": {
    "cc1": {"score": 4, "total": 5, "timestamp": "2024-03-02 18:40:00"},
    "ai1": {"score": 2, "total": 5, "timestamp": "2024-03-04 20:15:00"}
  }
}
"#;
