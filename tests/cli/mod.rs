//! CLI tests for argument handling and exit codes

use crate::common::TestRepo;

#[test]
fn test_missing_token_fails() {
    let repo = TestRepo::new();
    let output = repo.run_cli(&[], &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_event_payload_fails() {
    let repo = TestRepo::new();
    repo.add_file("README.md", "x\n").commit_base();

    let output = repo.run_cli(&["token"], &[]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_EVENT_PATH"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_event_payload_fails() {
    let repo = TestRepo::new();
    repo.add_file("README.md", "x\n").commit_base();
    let event = repo.path().join("event.json");
    std::fs::write(&event, "{\"action\": \"opened\"}").unwrap();

    let output = repo.run_cli(&["token"], &[("GITHUB_EVENT_PATH", event.to_str().unwrap())]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_clean_change_exits_zero_without_posting() {
    let repo = TestRepo::new();
    repo.add_file("app/views/posts/index.haml", "%h1 Posts\n").commit_base();
    repo.add_file("app/views/posts/index.haml", "%h1 All posts\n")
        .commit("retitle");

    let event = repo.path().join("event.json");
    std::fs::write(
        &event,
        r#"{"pull_request": {"comments_url": "https://127.0.0.1:9/unreachable"}}"#,
    )
    .unwrap();

    let output = repo.run_cli(&["token"], &[("GITHUB_EVENT_PATH", event.to_str().unwrap())]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_unresolved_variable_exits_non_zero() {
    let repo = TestRepo::new();
    repo.add_file(
        "app/views/posts/index.haml",
        "- cache [\"p#{gone}\"] do\n  = render partial: 'row'\n",
    )
    .add_file("app/views/posts/_row.haml", "%li\n")
    .commit_base();
    repo.add_file("app/views/posts/_row.haml", "%li.row\n").commit("row");

    let event = repo.path().join("event.json");
    std::fs::write(
        &event,
        r#"{"pull_request": {"comments_url": "https://127.0.0.1:9/unreachable"}}"#,
    )
    .unwrap();

    let output = repo.run_cli(&["token"], &[("GITHUB_EVENT_PATH", event.to_str().unwrap())]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Didn't find gone"), "stderr: {}", stderr);
}
