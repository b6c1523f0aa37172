//! End-to-end analysis tests

use std::collections::BTreeSet;
use std::path::PathBuf;

use cache_check::CacheCheckError;

use crate::common::{RecordingSink, TestRepo};

const INDEX: &str = "\
%section
  %h1 Posts
  - cache ['posts', 'v1'] do
    = render partial: 'row'
";

const ROW: &str = "%li= post.title\n";

fn posts_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.add_file("app/views/posts/index.haml", INDEX)
        .add_file("app/views/posts/_row.haml", ROW)
        .commit_base();
    repo
}

#[test]
fn test_uncovered_cache_key_is_reported() {
    let repo = posts_repo();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .commit("restyle row");

    let report = repo.check().analyze().unwrap();

    assert_eq!(report.partials.len(), 1);
    assert_eq!(report.containers, 1);
    assert_eq!(report.violations.len(), 1);

    let violation = &report.violations[0];
    assert_eq!(violation.file, PathBuf::from("app/views/posts/index.haml"));
    assert_eq!(violation.alias, "row");
    assert_eq!(violation.uncovered_lines, BTreeSet::from([3]));
}

#[test]
fn test_bumped_cache_key_is_covered() {
    let repo = posts_repo();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .add_file(
            "app/views/posts/index.haml",
            &INDEX.replace("'v1'", "'v2'"),
        )
        .commit("restyle row and bump cache");

    let report = repo.check().analyze().unwrap();
    assert!(report.violations.is_empty());
}

#[test]
fn test_change_elsewhere_does_not_cover() {
    let repo = posts_repo();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .add_file(
            "app/views/posts/index.haml",
            &INDEX.replace("%h1 Posts", "%h1 All posts"),
        )
        .commit("restyle row and retitle");

    let report = repo.check().analyze().unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].uncovered_lines, BTreeSet::from([3]));
}

#[test]
fn test_variable_keyed_cache_in_other_directory() {
    let repo = TestRepo::new();
    repo.add_file("app/views/posts/index.haml", INDEX)
        .add_file("app/views/posts/_row.haml", ROW)
        .add_file(
            "app/views/home/index.haml",
            r#"%section
  - stamp = Post.maximum(:updated_at)
  - cache ["home#{stamp}"] do
    = render partial: 'posts/row'
"#,
        )
        .commit_base();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .commit("restyle row");

    let report = repo.check().analyze().unwrap();
    assert_eq!(report.containers, 2);

    let home: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.file == PathBuf::from("app/views/home/index.haml"))
        .collect();

    assert_eq!(home.len(), 1);
    assert_eq!(home[0].alias, "posts/row");
    assert_eq!(home[0].uncovered_lines, BTreeSet::from([2]));
}

#[test]
fn test_unresolved_cache_variable_aborts() {
    let repo = TestRepo::new();
    repo.add_file(
        "app/views/posts/index.haml",
        r#"- cache ["posts#{stamp}"] do
  = render partial: 'row'
"#,
    )
    .add_file("app/views/posts/_row.haml", ROW)
    .commit_base();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .commit("restyle row");

    let mut sink = RecordingSink::default();
    match repo.check().run(&mut sink) {
        Err(CacheCheckError::UnresolvedCacheVariable { line, variable, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(variable, "stamp");
        }
        other => panic!("expected unresolved variable, got {:?}", other.map(|r| r.violations)),
    }
    assert!(sink.bodies.is_empty());
}

#[test]
fn test_no_changed_partials() {
    let repo = posts_repo();
    repo.add_file("app/views/posts/index.haml", &INDEX.replace("'v1'", "'v2'"))
        .add_file("README.md", "docs\n")
        .commit("unrelated");

    let report = repo.check().analyze().unwrap();
    assert!(report.partials.is_empty());
    assert!(report.violations.is_empty());
}

#[test]
fn test_run_posts_one_comment_per_violation() {
    let repo = posts_repo();
    repo.add_file("app/views/posts/_row.haml", "%li.post= post.title\n")
        .commit("restyle row");

    let mut sink = RecordingSink::default();
    let report = repo.check().run(&mut sink).unwrap();

    assert_eq!(report.violations.len(), 1);
    assert_eq!(sink.bodies.len(), 1);
    assert!(sink.bodies[0].contains("app/views/posts/index.haml"));
    assert!(sink.bodies[0].contains("[3]"));
    assert!(sink.bodies[0].contains("'row'"));
}
