use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const ROSTER: &str = r##"
agents:
  - id: a1
    name: Engineer
    slug: engineer
    role: Builds features
    soulContent: "You are careful."
    userContent: "Team prefers small PRs."
    identityContent: "Engineer bot"
    openclawConfig:
      model: gpt-5-nano
    skills:
      - id: s1
        name: Review
        slug: review
        description: Reviews pull requests
        contentMarkdown: "# Review"
  - id: a2
    name: Escapee
    slug: ".."
    soulContent: ""
    userContent: ""
    identityContent: ""
"##;

fn crew_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("crew"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("VERCEL_AI_GATEWAY_API_KEY")
        .env_remove("AI_GATEWAY_API_KEY")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write_roster(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("agents.yaml");
    fs::write(&path, ROSTER).expect("write roster");
    path
}

fn sync_args<'a>(roster: &'a Path, ws: &'a Path, config: &'a Path) -> Vec<&'a OsStr> {
    vec![
        OsStr::new("--agents"),
        roster.as_os_str(),
        OsStr::new("--workspace-root"),
        ws.as_os_str(),
        OsStr::new("--config-path"),
        config.as_os_str(),
    ]
}

#[test]
fn sync_writes_workspace_and_config() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success()
        .stdout(contains("1 agent(s) synced"))
        .stdout(contains("skipped"));

    assert!(ws.join("engineer/SOUL.md").is_file());
    assert!(ws.join("engineer/skills/review/SKILL.md").is_file());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).expect("config")).expect("json");
    assert_eq!(json["agents"]["list"][0]["model"], "openai/gpt-5-nano");
    assert_eq!(json["agents"]["list"].as_array().expect("list").len(), 1);
}

#[test]
fn gateway_key_from_environment_prefixes_models() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    crew_cmd(tmp.path())
        .env("AI_GATEWAY_API_KEY", "test-key")
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).expect("config")).expect("json");
    assert_eq!(
        json["agents"]["list"][0]["model"],
        "vercel-ai-gateway/openai/gpt-5-nano"
    );
}

#[test]
fn dry_run_json_reports_without_writing() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    let output = crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .args(["--dry-run", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["config_changed"], true);
    assert_eq!(report["agents"], serde_json::json!(["engineer"]));
    assert_eq!(report["skipped"][0]["id"], "a2");
    assert!(report["writes"]
        .as_array()
        .expect("writes")
        .iter()
        .all(|w| w["status"] == "would_write"));
    assert!(!ws.exists());
    assert!(!config.exists());
}

#[test]
fn second_sync_reports_config_unchanged() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success()
        .stdout(contains("config changed"));
    crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success()
        .stdout(contains("config unchanged"))
        .stdout(contains("0 written"))
        .stdout(contains("  ·  ").and(contains("SOUL.md")));
}

#[test]
fn json_report_lists_skipped_skills_separately() {
    let tmp = TempDir::new().expect("tmp");
    let roster = tmp.path().join("agents.yaml");
    fs::write(
        &roster,
        ROSTER.replace("        slug: review\n", "        slug: \"re/view\"\n"),
    )
    .expect("write roster");
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    let output = crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .arg("--json")
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["skipped"].as_array().expect("skipped").len(), 1);
    assert_eq!(report["skipped"][0]["id"], "a2");
    let skills = report["skipped_skills"].as_array().expect("skipped_skills");
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["agent_slug"], "engineer");
    assert_eq!(skills[0]["skill_id"], "s1");
    assert!(skills[0]["reason"].is_string());
    assert!(!ws.join("engineer/skills").join("re").exists());
}

#[test]
fn diff_is_empty_after_sync_and_shows_edits() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());
    let ws = tmp.path().join("ws");
    let config = tmp.path().join("openclaw.json");

    crew_cmd(tmp.path())
        .arg("sync")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success();
    crew_cmd(tmp.path())
        .arg("diff")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success()
        .stdout(contains("No differences."));

    fs::write(ws.join("engineer/USER.md"), "local edit\n").expect("edit");
    crew_cmd(tmp.path())
        .arg("diff")
        .args(sync_args(&roster, &ws, &config))
        .assert()
        .success()
        .stdout(contains("--- a/engineer/USER.md"))
        .stdout(contains("+Team prefers small PRs."));
}

#[test]
fn agents_lists_slug_verdicts() {
    let tmp = TempDir::new().expect("tmp");
    let roster = write_roster(tmp.path());

    crew_cmd(tmp.path())
        .args(["agents", "--agents"])
        .arg(&roster)
        .assert()
        .success()
        .stdout(contains("2 agents | 1 invalid"))
        .stdout(contains("openai/gpt-5-nano"));

    let output = crew_cmd(tmp.path())
        .args(["agents", "--json", "--agents"])
        .arg(&roster)
        .output()
        .expect("run");
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rows[0]["slug_error"], serde_json::Value::Null);
    assert_eq!(rows[0]["skills"], 1);
    assert!(rows[1]["slug_error"].is_string());
}

#[test]
fn missing_roster_fails() {
    let tmp = TempDir::new().expect("tmp");
    crew_cmd(tmp.path())
        .args(["sync", "--agents"])
        .arg(tmp.path().join("nope.yaml"))
        .assert()
        .failure()
        .stderr(contains("failed to load roster").and(contains("nope.yaml")));
}
