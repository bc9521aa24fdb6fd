//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs inside `dir` with HOME pointed at it so no user config leaks in.
fn studycomp(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("studycomp").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

fn init_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    studycomp(dir.path()).arg("init").assert().success();
    dir
}

fn questions_json(output: &[u8]) -> Vec<serde_json::Value> {
    serde_json::from_slice::<serde_json::Value>(output)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studycomp.toml"))
        .stdout(predicate::str::contains("Created data/syllabus.json"));

    assert!(dir.path().join("studycomp.toml").exists());
    assert!(dir.path().join("data/progress.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = init_workspace();

    studycomp(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn quiz_curated_topic_json() {
    let dir = TempDir::new().unwrap();

    let output = studycomp(dir.path())
        .args(["quiz", "--topic-id", "cc1", "--difficulty", "easy", "--count", "4"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let questions = questions_json(&output.stdout);
    assert_eq!(questions.len(), 4);
    assert_eq!(questions[0]["question"], "Which model provides raw computing power?");
    assert_eq!(questions[0]["answer"], "IaaS");
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q["id"], i as u64 + 1);
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
    }
}

#[test]
fn quiz_unknown_topic_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let run = || {
        studycomp(dir.path())
            .args(["quiz", "--topic-id", "cd1", "--topic-name", "Compiler Design"])
            .args(["--count", "6", "--format", "json"])
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(questions_json(&first.stdout).len(), 6);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn quiz_text_output() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .args(["quiz", "--topic-id", "ai2", "--difficulty", "hard", "--count", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz: Neural Networks & Deep Learning (Hard, 1 questions)"))
        .stdout(predicate::str::contains("Which solves the Vanishing Gradient problem?"))
        .stdout(predicate::str::contains("Answer: ReLU"));
}

#[test]
fn quiz_rejects_bad_difficulty() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .args(["quiz", "--topic-id", "cc1", "--difficulty", "extreme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown difficulty"));
}

#[test]
fn quiz_uses_configured_mock_provider() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("studycomp.toml"),
        r#"
default_provider = "canned"

[providers.canned]
type = "mock"
default_response = '[{"question": "Canned?", "options": ["a", "b", "c", "d"], "answer": "c"}]'
"#,
    )
    .unwrap();

    let output = studycomp(dir.path())
        .args(["quiz", "--topic-id", "os9", "--topic-name", "Paging", "--count", "2"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let questions = questions_json(&output.stdout);
    assert_eq!(questions[0]["question"], "Canned?");
    assert_ne!(questions[1]["question"], "Canned?");

    let offline = studycomp(dir.path())
        .args(["quiz", "--topic-id", "os9", "--topic-name", "Paging", "--count", "2"])
        .args(["--format", "json", "--offline"])
        .output()
        .unwrap();
    assert_ne!(questions_json(&offline.stdout)[0]["question"], "Canned?");
}

#[test]
fn explain_curated_and_generic() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .args(["explain", "--topic-id", "cc2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Virtualization Technology"))
        .stdout(predicate::str::contains("Type 1 Hypervisor"));

    studycomp(dir.path())
        .args(["explain", "--topic-id", "zz1", "--topic-name", "Quantum Widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Concept: Quantum Widgets"));
}

#[test]
fn analyze_text_report() {
    let dir = init_workspace();

    studycomp(dir.path())
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Syllabus coverage: 42%"))
        .stdout(predicate::str::contains("understanding is Excellent (60% avg)"))
        .stdout(predicate::str::contains("Exam Ready"))
        .stdout(predicate::str::contains("Needs Improvement"))
        .stdout(predicate::str::contains("Supervised vs Unsupervised Learning (40%)"));
}

#[test]
fn analyze_markdown_and_saved_json() {
    let dir = init_workspace();
    let saved = dir.path().join("reports/analysis.json");

    studycomp(dir.path())
        .args(["analyze", "--format", "markdown", "--student", "asha"])
        .arg("--output")
        .arg(&saved)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Progress Analysis: asha"))
        .stdout(predicate::str::contains("| Cloud Computing | 2/2 | 1 | 90% | Exam Ready |"))
        .stdout(predicate::str::contains("| Artificial Intelligence | 1/2 | 1 | 45% | Needs Improvement |"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(report["student"], "asha");
    assert_eq!(report["subjects"].as_array().unwrap().len(), 4);
    assert_eq!(report["weak_topics"][0]["topic_id"], "ai1");
}

#[test]
fn analyze_explicit_paths_json() {
    let dir = TempDir::new().unwrap();
    let syllabus = dir.path().join("s.json");
    let progress = dir.path().join("p.json");
    std::fs::write(
        &syllabus,
        r#"{"subjects": [{"id": "os", "name": "OS", "units": [{"id": "u", "name": "U", "topics": [{"id": "t1", "name": "Paging"}, {"id": "t2", "name": "Deadlocks"}]}]}]}"#,
    )
    .unwrap();
    std::fs::write(&progress, r#"{"topics_completed": ["t1", "t2"]}"#).unwrap();

    let output = studycomp(dir.path())
        .arg("analyze")
        .arg("--syllabus")
        .arg(&syllabus)
        .arg("--progress")
        .arg(&progress)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["overall_coverage_percent"], 100);
    assert_eq!(report["subjects"][0]["readiness_score"], 50);
    assert_eq!(report["subjects"][0]["status"], "NeedsImprovement");
    assert_eq!(report["performance"]["level"], "LowUnderstanding");
}

#[test]
fn analyze_missing_syllabus() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .args(["analyze", "--syllabus", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("nonexistent.json"));
}

#[test]
fn mock_exam_draws_first_topics() {
    let dir = init_workspace();

    let output = studycomp(dir.path())
        .args(["mock-exam", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let questions = questions_json(&output.stdout);
    let answers: Vec<&str> = questions
        .iter()
        .map(|q| q["answer"].as_str().unwrap())
        .collect();
    assert_eq!(answers, vec!["Rapid Elasticity", "Accuracy/F1-Score", "HttpServletRequest"]);
}

#[test]
fn add_subject_then_list_topics() {
    let dir = init_workspace();

    studycomp(dir.path())
        .args(["add-subject", "--id", "os", "--name", "Operating Systems", "--topic", "Process Scheduling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("os_u1_t1"));

    studycomp(dir.path())
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Process Scheduling"))
        .stdout(predicate::str::contains("8 topics, 7 with curated content."));

    studycomp(dir.path())
        .args(["add-subject", "--id", "os", "--name", "Again", "--topic", "Dup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn validate_builtin_knowledge_base() {
    let dir = TempDir::new().unwrap();

    studycomp(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in (7 topics"))
        .stdout(predicate::str::contains("Knowledge base valid."));
}

#[test]
fn validate_reports_bad_questions() {
    let dir = TempDir::new().unwrap();
    let kb = dir.path().join("kb.toml");
    std::fs::write(
        &kb,
        r#"
[topics.os1]
title = "Scheduling"
explanation = "Picking the next process."

[[topics.os1.quiz.easy]]
question = "Which is preemptive?"
options = ["Round Robin", "FCFS"]
answer = "Round Robin"
"#,
    )
    .unwrap();

    studycomp(dir.path())
        .arg("validate")
        .arg("--knowledge-base")
        .arg(&kb)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[os1] WARNING: Easy question 1: expected 4 options"))
        .stderr(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn custom_knowledge_base_drives_quiz() {
    let dir = TempDir::new().unwrap();
    let kb = dir.path().join("kb.toml");
    std::fs::write(
        &kb,
        r#"
[topics.os1]
title = "Scheduling"
explanation = "Picking the next process."

[[topics.os1.quiz.moderate]]
question = "Which algorithm uses time slices?"
options = ["Round Robin", "FCFS", "SJF", "Priority"]
answer = "Round Robin"
"#,
    )
    .unwrap();

    studycomp(dir.path())
        .args(["quiz", "--topic-id", "os1", "--count", "1"])
        .arg("--knowledge-base")
        .arg(&kb)
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz: Scheduling (Moderate"))
        .stdout(predicate::str::contains("Which algorithm uses time slices?"));
}

#[test]
fn quiz_by_name_finds_curated_topic() {
    let dir = TempDir::new().unwrap();
    let kb = dir.path().join("kb.toml");
    std::fs::write(
        &kb,
        r#"
[topics.compilerdesign]
title = "Compiler Design"
explanation = "Turning source into machine code."

[[topics.compilerdesign.quiz.easy]]
question = "Which phase builds the parse tree?"
options = ["Syntax analysis", "Linking", "Loading", "Paging"]
answer = "Syntax analysis"
"#,
    )
    .unwrap();

    studycomp(dir.path())
        .args(["quiz", "--topic-name", "Compiler  Design", "--difficulty", "easy"])
        .args(["--count", "1", "--offline"])
        .arg("--knowledge-base")
        .arg(&kb)
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz: Compiler  Design (Easy"))
        .stdout(predicate::str::contains("Which phase builds the parse tree?"));
}

#[test]
fn quiz_requires_topic() {
    let dir = TempDir::new().unwrap();
    studycomp(dir.path())
        .args(["quiz", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--topic-id"));
}
