//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("LONGCAST_LOG_DIR", env!("CARGO_TARGET_TMPDIR"))
        .env_remove("LONGCAST_TIER")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd().args(["-v", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_auto_accepted() {
    cmd().args(["--color", "auto", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Classify Command
// =============================================================================

#[test]
fn classify_short_text() {
    cmd()
        .args(["classify", "--text", "gm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gm"))
        .stdout(predicate::str::contains("2 bytes · cast"));
}

#[test]
fn classify_long_text_shows_preview() {
    let text = format!("{} tail", "a".repeat(300));
    cmd()
        .args(["classify", "--text", text.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}...", "a".repeat(280))))
        .stdout(predicate::str::contains("tail").not())
        .stdout(predicate::str::contains("305 bytes · cast"));
}

#[test]
fn classify_expand_shows_full_text() {
    let text = format!("{} tail", "a".repeat(400));
    cmd()
        .args(["classify", "--expand", "--text", text.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("tail"))
        .stdout(predicate::str::contains("405 bytes · long_cast · Long cast"));
}

#[test]
fn classify_invalid_text_fails() {
    cmd()
        .args(["classify", "--text", "a".repeat(1100).as_str()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Exceeds limit by 76 bytes"))
        .stderr(predicate::str::contains("1100 bytes (limit: 1024)"));
}

#[test]
fn classify_reads_file_without_final_newline() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), format!("{}\n", "a".repeat(320))).unwrap();
    cmd()
        .args(["classify", "--json", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"length_in_bytes\": 320"))
        .stdout(predicate::str::contains("\"category\": \"cast\""));
}

#[test]
fn classify_reads_stdin() {
    cmd()
        .args(["classify", "--json", "-"])
        .write_stdin("a".repeat(400))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"long_cast\""));
}

#[test]
fn classify_excludes_mentions() {
    let text = format!("@alice @bob.eth {}", "a".repeat(310));
    let output = cmd()
        .args(["classify", "--json", "--text", text.as_str()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["length_in_bytes"], 312);
    assert_eq!(json["category"], "cast");
    assert_eq!(json["style_hint"], "warning");
}

#[test]
fn classify_json_reports_invalid_without_failing() {
    let output = cmd()
        .args(["classify", "--json", "--text", "a".repeat(1100).as_str()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["style_hint"], "invalid");
}

#[test]
fn classify_payload_tags_type() {
    let output = cmd()
        .args([
            "classify",
            "--payload",
            "--embed",
            "https://example.com",
            "--text",
            "a".repeat(400).as_str(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["type"], "long_cast");
    assert_eq!(json["embeds"][0], "https://example.com");
}

#[test]
fn classify_requires_input() {
    cmd()
        .arg("classify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn classify_file_and_text_conflict() {
    cmd()
        .args(["classify", "cast.txt", "--text", "gm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn classify_missing_file_fails() {
    cmd()
        .args(["classify", "definitely-missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// =============================================================================
// Quota Command
// =============================================================================

#[test]
fn quota_allows_under_limit() {
    cmd()
        .args(["quota", "--tier", "free", "--daily", "2", "--monthly", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 left today"));
}

#[test]
fn quota_denies_exhausted_daily() {
    cmd()
        .args(["quota", "--tier", "free", "--daily", "5", "--monthly", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "You've reached your daily limit of 5 long casts. Upgrade for more!",
        ));
}

#[test]
fn quota_denies_exhausted_monthly() {
    cmd()
        .args(["quota", "--tier", "creator", "--daily", "0", "--monthly", "300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("monthly limit of 300"));
}

#[test]
fn quota_pro_is_unlimited() {
    let output = cmd()
        .args([
            "quota", "--json", "--tier", "pro", "--daily", "1000", "--monthly", "10000",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["can_create"], true);
    assert_eq!(json["daily_limit"], "unlimited");
    assert!(json.get("limit_message").is_none());
}

#[test]
fn quota_accepts_open_source_alias() {
    cmd()
        .args([
            "quota",
            "--tier",
            "open-source",
            "--daily",
            "0",
            "--monthly",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("free plan"));
}

#[test]
fn quota_rejects_unknown_tier() {
    cmd()
        .args(["quota", "--tier", "enterprise", "--daily", "0", "--monthly", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// =============================================================================
// Plans Command
// =============================================================================

#[test]
fn plans_lists_every_tier() {
    cmd()
        .arg("plans")
        .assert()
        .success()
        .stdout(predicate::str::contains("free"))
        .stdout(predicate::str::contains("creator"))
        .stdout(predicate::str::contains("pro"))
        .stdout(predicate::str::contains("unlimited"));
}

#[test]
fn plans_json_single_tier() {
    let output = cmd()
        .args(["plans", "--json", "--tier", "creator"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let plans = json.as_array().expect("array");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["tier"], "creator");
    assert_eq!(plans[0]["long_casts_per_month"], 300);
    assert_eq!(plans[0]["max_scheduled_casts"], 15);
}

// =============================================================================
// Migrate Command
// =============================================================================

#[test]
fn migrate_prints_tagged_drafts() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        tmp.path(),
        format!(
            r#"[{{"id": "1", "text": "Short cast"}}, {{"id": "2", "text": "{}"}}, {{"id": "3"}}]"#,
            "a".repeat(400)
        ),
    )
    .unwrap();

    let output = cmd()
        .args(["migrate", tmp.path().to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json[0]["castType"], "cast");
    assert_eq!(json[1]["castType"], "long_cast");
    assert_eq!(json[2]["castType"], "cast");
}

#[test]
fn migrate_keeps_existing_type() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        tmp.path(),
        format!(r#"[{{"text": "{}", "castType": "cast"}}]"#, "a".repeat(400)),
    )
    .unwrap();

    cmd()
        .args(["migrate", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"castType\": \"cast\""));
}

#[test]
fn migrate_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("drafts.json");
    let out = dir.path().join("migrated.json");
    std::fs::write(&input, r#"[{"text": "gm"}]"#).unwrap();

    cmd()
        .args([
            "migrate",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("tagged 1 of 1 drafts"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"castType\": \"cast\""));
    let original = std::fs::read_to_string(&input).unwrap();
    assert!(!original.contains("castType"));
}

#[test]
fn migrate_passes_through_unreadable_entries() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), r#"[42, "keep me", {"text": 5, "castType": "weird"}]"#).unwrap();

    let output = cmd()
        .args(["migrate", tmp.path().to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(
        json,
        serde_json::json!([42, "keep me", {"text": 5, "castType": "weird"}])
    );
}

#[test]
fn migrate_rejects_non_array() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), r#"{"text": "gm"}"#).unwrap();

    cmd()
        .args(["migrate", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse drafts"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
