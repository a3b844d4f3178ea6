use std::{
    fs,
    path::{Path, PathBuf},
};

use csvgrades::{
    GradingError,
    config::RecordConfig,
    file::read_grades_file,
    notify::{Advisory, RecordingNotifier},
    record_grades,
    types::StudentTeam,
};
use tempfile::TempDir;

const PASS: &str = "1:P:[Pp]ass";
const KOMP: &str = "3:K:[Kk]omplettering";

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixtures_root().join(name)).expect("fixture exists")
}

/// Copies the grades and results fixtures into a fresh directory.
fn workdir(results_fixture: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::copy(fixtures_root().join("grades.csv"), dir.path().join("grades.csv"))
        .expect("copy grades");
    fs::copy(fixtures_root().join(results_fixture), dir.path().join("hook_results.json"))
        .expect("copy results");
    dir
}

fn config(dir: &Path, specs: &[&str], teachers: &[&str], assignments: &[&str]) -> RecordConfig {
    RecordConfig::builder()
        .hook_results_file(dir.join("hook_results.json"))
        .grades_file(dir.join("grades.csv"))
        .edit_msg_file(dir.join("edit_msg.txt"))
        .grade_specs(specs.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .teachers(teachers.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .teams(vec![StudentTeam::new(["slarse"]), StudentTeam::new(["glassey", "glennol"])])
        .assignments(assignments.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .build()
}

fn cell(path: &Path, student: &str, assignment: &str) -> String {
    let (headers, rows) = read_grades_file(path).expect("read grades");
    let col = headers
        .iter()
        .position(|h| h == assignment)
        .expect("assignment column");
    rows.iter()
        .find(|row| row[0] == student)
        .map(|row| row[col].clone())
        .expect("student row")
}

#[test]
fn records_pass_grades() {
    let dir = workdir("hook_results.json");
    let config = config(dir.path(), &[PASS], &["ta_a", "ta_b"], &[
        "week-1", "week-2", "week-4", "week-6",
    ]);

    let new_grades = record_grades(&config, &mut RecordingNotifier::default()).expect("record");

    let grades = dir.path().join("grades.csv");
    for (student, assignment, expected) in [
        ("slarse", "week-1", "P"),
        ("slarse", "week-2", ""),
        ("slarse", "week-4", "P"),
        ("slarse", "week-6", "P"),
        ("glassey", "week-1", "P"),
        ("glassey", "week-2", "P"),
        ("glennol", "week-2", "P"),
        ("glennol", "week-4", ""),
    ] {
        assert_eq!(cell(&grades, student, assignment), expected, "{student} on {assignment}");
    }
    assert_eq!(new_grades["ta_a"].len(), 2);
    assert_eq!(new_grades["ta_b"].len(), 4);
}

#[test]
fn pass_and_komplettering_match_expected_files() {
    let dir = workdir("hook_results.json");
    let config = config(dir.path(), &[PASS, KOMP], &["ta_a", "ta_b"], &[
        "week-1", "week-2", "week-4", "week-6",
    ]);
    let mut notifier = RecordingNotifier::default();

    record_grades(&config, &mut notifier).expect("record");

    assert_eq!(
        fs::read_to_string(dir.path().join("grades.csv")).expect("grades written"),
        fixture("expected_grades.csv")
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("edit_msg.txt")).expect("message written"),
        fixture("expected_edit_msg.txt")
    );

    // slarse already had a P on week-1, which outranks the later K.
    let violations: Vec<_> = notifier
        .advisories
        .iter()
        .filter_map(|a| match a {
            Advisory::PrecedenceViolation(v) => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].student, "slarse");
    assert_eq!(violations[0].assignment, "week-1");
    assert_eq!(violations[0].current, "P");
    assert_eq!(violations[0].candidate, "K");
}

#[test]
fn recording_twice_changes_nothing_the_second_time() {
    let dir = workdir("hook_results.json");
    let config = config(dir.path(), &[PASS, KOMP], &["ta_a", "ta_b"], &[
        "week-1", "week-2", "week-4", "week-6",
    ]);
    record_grades(&config, &mut RecordingNotifier::default()).expect("first run");
    fs::remove_file(dir.path().join("edit_msg.txt")).expect("remove message");

    let new_grades = record_grades(&config, &mut RecordingNotifier::default()).expect("second run");

    assert!(new_grades.values().all(Vec::is_empty));
    assert!(!dir.path().join("edit_msg.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("grades.csv")).expect("grades"),
        fixture("expected_grades.csv")
    );
}

#[test]
fn unknown_teachers_change_nothing() {
    let dir = workdir("hook_results.json");
    let config = config(dir.path(), &[PASS, KOMP], &["someone_else"], &[
        "week-1", "week-2", "week-4", "week-6",
    ]);
    let mut notifier = RecordingNotifier::default();

    let new_grades = record_grades(&config, &mut notifier).expect("record");

    assert!(new_grades.is_empty());
    assert!(!dir.path().join("edit_msg.txt").exists());
    assert_eq!(fs::read_to_string(dir.path().join("grades.csv")).expect("grades"), fixture("grades.csv"));
    assert!(
        notifier
            .advisories
            .iter()
            .all(|a| matches!(a, Advisory::UnauthorizedIssue { .. }))
    );
    assert!(!notifier.advisories.is_empty());
}

#[test]
fn missing_and_unauthorized_repos_are_reported_and_skipped() {
    let dir = workdir("hook_results.json");
    let config = config(dir.path(), &[PASS], &["ta_a", "ta_b"], &["week-3", "week-5"]);
    let mut notifier = RecordingNotifier::default();

    let new_grades = record_grades(&config, &mut notifier).expect("record");

    assert!(new_grades.is_empty());
    assert_eq!(notifier.advisories, vec![
        Advisory::MissingResults {
            repo: "slarse-week-3".into(),
        },
        Advisory::MissingResults {
            repo: "glassey-glennol-week-3".into(),
        },
        Advisory::UnauthorizedIssue {
            repo:   "glassey-glennol-week-5".into(),
            number: 1,
            author: "glennol".into(),
        },
    ]);
}

#[test]
fn student_missing_from_grades_file_is_an_error() {
    let dir = workdir("hook_results.json");
    let mut config = config(dir.path(), &[PASS], &["ta_a"], &["week-1"]);
    config.teams.push(StudentTeam::new(["ghost", "phantom"]));

    let err = record_grades(&config, &mut RecordingNotifier::default()).unwrap_err();

    assert_eq!(
        err.downcast_ref::<GradingError>(),
        Some(&GradingError::MissingStudents(vec!["ghost".into(), "phantom".into()]))
    );
    assert_eq!(fs::read_to_string(dir.path().join("grades.csv")).expect("grades"), fixture("grades.csv"));
}

#[test]
fn other_issue_states_need_explicit_permission() {
    let dir = workdir("hook_results_open.json");
    let mut config = config(dir.path(), &[PASS], &["ta_a", "ta_b"], &["week-4"]);

    let err = record_grades(&config, &mut RecordingNotifier::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<GradingError>(),
        Some(&GradingError::IssueStateNotAll("open".into()))
    );
    assert!(err.to_string().contains("--allow-other-states"));

    config.allow_other_states = true;
    record_grades(&config, &mut RecordingNotifier::default()).expect("record");
    assert_eq!(cell(&dir.path().join("grades.csv"), "slarse", "week-4"), "P");
}

#[test]
fn malformed_grade_spec_is_rejected_before_reading_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config(dir.path(), &["P:1:[Pp]ass"], &["ta_a"], &["week-1"]);

    let err = record_grades(&config, &mut RecordingNotifier::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<GradingError>(), Some(GradingError::Format { .. })));
}
