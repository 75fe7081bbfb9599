use std::sync::Arc;

use smart_grading::clients::mock::{MockGenerator, MockReply};
use smart_grading::clients::Usage;
use smart_grading::{App, Config};
use tokio_test::assert_ok;

const BANK: &str = r#"
[[questions]]
id = "bio-1"
type = "textual_answer"
max_marks = 3
subject = "Biology"
chapter = "Life Processes"
question = "Define photosynthesis."
rubrics_for_evaluation = "Definition (3 marks)"
"#;

fn write_fixture(dir: &std::path::Path) -> Config {
    let submissions = dir.join("submissions");
    std::fs::create_dir(&submissions).unwrap();
    std::fs::write(
        submissions.join("alice.toml"),
        "question_id = \"bio-1\"\nstudent_id = \"alice\"\nstudent_answer_typed = \"Plants make food.\"\n",
    )
    .unwrap();
    std::fs::write(
        submissions.join("bob.toml"),
        "question_id = \"chem-9\"\nstudent_id = \"bob\"\nstudent_answer_typed = \"NaCl\"\n",
    )
    .unwrap();
    std::fs::write(dir.join("questions.toml"), BANK).unwrap();

    Config {
        max_concurrent_submissions: 1,
        question_bank_file: dir.join("questions.toml").to_string_lossy().to_string(),
        submissions_folder: submissions.to_string_lossy().to_string(),
        output_report_file: dir.join("report.jsonl").to_string_lossy().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_batch_grades_each_submission_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let report_path = config.output_report_file.clone();

    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::text("Partial definition.", Usage::new(50, 20, 0.004)),
        MockReply::structured(
            serde_json::json!({
                "criteria": [["Definition", "2/3", "Mentions food but not light energy."]],
                "total_points": ["2/3", "Good start."],
                "mark": 2.0,
            }),
            Usage::new(60, 30, 0.006),
        ),
    ]));

    let app = assert_ok!(App::with_generator(config, mock.clone()));
    let stats = assert_ok!(app.run().await);

    assert_eq!(stats.total, 2);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 1);
    assert!((stats.total_cost - 0.01).abs() < 1e-12);
    assert_eq!(mock.call_count(), 2);

    let report = std::fs::read_to_string(report_path).unwrap();
    let lines: Vec<serde_json::Value> = report
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    // 表头 + 两份提交
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["report"], "smart-grading");
    assert_eq!(lines[1]["submission"], "alice/bio-1");
    assert_eq!(lines[1]["mark"], 2.0);
    assert_eq!(lines[2]["submission"], "bob/chem-9");
    assert_eq!(lines[2]["success"], false);
}

#[tokio::test]
async fn test_initialize_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        llm_api_key: String::new(),
        output_report_file: dir.path().join("report.jsonl").to_string_lossy().to_string(),
        ..Config::default()
    };

    assert!(App::initialize(config).await.is_err());
}
