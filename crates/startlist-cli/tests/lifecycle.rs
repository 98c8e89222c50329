//! Integration tests for the start list lifecycle through the binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const CLASSES: &str = r#"{"race_id":"middle","id":"A","name":"Class A"}
{"race_id":"middle","id":"B","name":"Class B"}
"#;

const ENTRIES: &str = r#"{"id":"p1","event_id":"cup","race_id":"middle","entry_class_id":"A","participant_name":"Ada","submitted_at":"2025-05-01T08:00:00Z"}
{"id":"p2","event_id":"cup","race_id":"middle","entry_class_id":"B","participant_name":"Bea","submitted_at":"2025-05-01T08:01:00Z"}
{"id":"p3","event_id":"cup","race_id":"middle","entry_class_id":"A","participant_name":"Cid","submitted_at":"2025-05-01T08:02:00Z"}
"#;

/// Test environment with an isolated HOME and database.
struct Env {
    home: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let db_path = home.path().join("data").join("startlist.db");
        let config = home.path().join("config.toml");
        std::fs::write(
            &config,
            format!("database_path = \"{}\"\n", db_path.display()),
        )
        .unwrap();
        Self { home, config }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_startlist"));
        cmd.env("HOME", self.home.path())
            .env_remove("STARTLIST_DATABASE_PATH")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("failed to run startlist")
    }

    fn import(&self, kind: &str, input: &str) -> Output {
        let mut child = self
            .command()
            .arg("import")
            .arg(kind)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn startlist import");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }

    fn db_path(&self) -> PathBuf {
        self.home.path().join("data").join("startlist.db")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        stderr(output)
    );
}

const RACE: [&str; 4] = ["--event", "cup", "--race", "middle"];

fn with_race<'a>(command: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![command];
    args.extend(RACE);
    args.extend(extra);
    args
}

fn prepare(env: &Env) {
    assert_success(&env.import("classes", CLASSES));
    assert_success(&env.import("entries", ENTRIES));
    assert_success(&env.run(&with_race(
        "configure",
        &["--start", "2025-05-17T12:00:00+02:00", "--interval", "120", "--lanes", "3"],
    )));
}

#[test]
fn test_import_reports_record_count() {
    let env = Env::new();
    let output = env.import("entries", ENTRIES);
    assert_success(&output);
    assert!(stderr(&output).contains("Imported 3 records"));
    assert!(env.db_path().exists());
}

#[test]
fn test_full_lifecycle() {
    let env = Env::new();
    prepare(&env);

    let assigned = env.run(&with_race("assign", &["--lane", "1=A", "--lane", "3=B"]));
    assert_success(&assigned);
    assert!(stdout(&assigned).contains("Assigned 2 lanes for cup/middle"));

    let scheduled = env.run(&with_race("schedule", &[]));
    assert_success(&scheduled);
    let text = stdout(&scheduled);
    assert!(text.contains("Scheduled 3 participants"));
    assert!(text.contains("START LIST cup / middle [DRAFT]"));
    assert!(text.contains("First start: 2025-05-17T10:00:00Z"));

    let shown = env.run(&with_race("show", &["--json"]));
    assert_success(&shown);
    let json: serde_json::Value = serde_json::from_str(&stdout(&shown)).unwrap();
    let slots = json["participant_slots"].as_array().unwrap();
    let summary: Vec<(&str, u64, &str)> = slots
        .iter()
        .map(|slot| {
            (
                slot["participant_entry_id"].as_str().unwrap(),
                slot["sequence"].as_u64().unwrap(),
                slot["start_instant"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("p1", 0, "2025-05-17T10:00:00Z"),
            ("p2", 1, "2025-05-17T10:00:00Z"),
            ("p3", 3, "2025-05-17T10:02:00Z"),
        ]
    );

    let published = env.run(&with_race("finalize", &[]));
    assert_success(&published);
    assert!(stdout(&published).contains("Published cup/middle with 3 starters [PUBLISHED]"));

    let again = env.run(&with_race("finalize", &[]));
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already published"));

    let reassign = env.run(&with_race("assign", &["--lane", "1=B"]));
    assert!(!reassign.status.success());
    assert!(stderr(&reassign).contains("already published"));

    let listed = env.run(&["list", "--json"]);
    assert_success(&listed);
    let list: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    assert_eq!(list[0]["status"], "PUBLISHED");
}

#[test]
fn test_duplicate_lane_is_rejected() {
    let env = Env::new();
    prepare(&env);

    let output = env.run(&with_race("assign", &["--lane", "1=A", "--lane", "1=B"]));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("duplicate lane"));
}

#[test]
fn test_schedule_without_lanes_fails() {
    let env = Env::new();
    prepare(&env);

    let output = env.run(&with_race("schedule", &[]));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("lanes must be assigned"));
}

#[test]
fn test_unknown_race_is_not_found() {
    let env = Env::new();

    let output = env.run(&["show", "--event", "cup", "--race", "long"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no start list for event cup, race long"));
}

#[test]
fn test_discard_removes_start_list() {
    let env = Env::new();
    prepare(&env);

    let discarded = env.run(&with_race("discard", &[]));
    assert_success(&discarded);
    assert!(stdout(&discarded).contains("Discarded start list cup/middle"));

    let listed = env.run(&["list"]);
    assert_success(&listed);
    assert!(stdout(&listed).contains("No start lists yet."));
}
