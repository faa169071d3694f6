use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn argline() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_argline"));
    cmd.env_remove("ARGLINE_MANIFEST").env_remove("RUST_LOG");
    cmd
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

fn init_manifest(dir: &Path) -> PathBuf {
    let out = argline()
        .arg("init")
        .arg(dir)
        .output()
        .expect("failed to run argline init");
    assert_success(&out, "argline init");
    dir.join("argline.json")
}

#[test]
fn help_works() {
    let out = argline()
        .arg("--help")
        .output()
        .expect("failed to run argline --help");
    assert_success(&out, "argline --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argline") && stdout.contains("init") && stdout.contains("parse"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_manifest_once() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let manifest = init_manifest(dir.path());
    assert!(manifest.is_file(), "argline.json not created");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(json["schemaVersion"], 1);
    assert_eq!(json["args"].as_array().map(Vec::len), Some(4));

    let out = argline().arg("init").arg(dir.path()).output().unwrap();
    assert!(!out.status.success(), "second init should refuse to overwrite");

    let out = argline()
        .arg("init")
        .arg(dir.path())
        .arg("--force")
        .output()
        .unwrap();
    assert_success(&out, "argline init --force");
}

#[test]
fn parse_reports_json() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .arg("parse")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--json")
        .args(["--", "-v", "-n", "3", "-o", "out"])
        .output()
        .unwrap();
    assert_success(&out, "argline parse --json");

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        report["results"],
        serde_json::json!([
            { "id": 2, "value": true },
            { "id": 3, "value": 3 },
            { "id": 4, "value": "out" },
        ])
    );
    assert_eq!(report["missingRequired"], serde_json::json!([]));
    assert!(report.get("error").is_none());
}

#[test]
fn parse_line_prints_text() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .env("ARGLINE_MANIFEST", &manifest)
        .args(["parse", "--line", "--output='a b' --count=2"])
        .output()
        .unwrap();
    assert_success(&out, "argline parse --line");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "4\ta b\n3\t2\n");
}

#[test]
fn exclusive_switch_discards_other_results() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .arg("parse")
        .arg("-m")
        .arg(&manifest)
        .args(["--", "-v", "--help", "-o", "x"])
        .output()
        .unwrap();
    assert_success(&out, "argline parse with --help");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "1\ttrue\n");
}

#[test]
fn parse_fails_on_unrecognized_option() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .arg("parse")
        .arg("-m")
        .arg(&manifest)
        .arg("--json")
        .args(["--", "-v", "--bogus"])
        .output()
        .unwrap();
    assert!(!out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["error"], "unrecognized command-line option: --bogus");
    assert_eq!(report["results"], serde_json::json!([{ "id": 2, "value": true }]));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--bogus"), "unexpected stderr:\n{stderr}");
}

#[test]
fn parse_fails_when_required_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .arg("parse")
        .arg("-m")
        .arg(&manifest)
        .args(["--", "-n", "5"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing required arguments: --output"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn tokens_shows_split_line() {
    let out = argline()
        .args(["tokens", "--line", "-a=1,2 \"x y\" [z]"])
        .output()
        .unwrap();
    assert_success(&out, "argline tokens");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "-a\n1\n2\nx y\nz\n");
}

#[test]
fn help_renders_argument_table() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = init_manifest(dir.path());

    let out = argline()
        .arg("help")
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .unwrap();
    assert_success(&out, "argline help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    let expected = "\t-h   --help      Show this info\n\
                    \t-v   --verbose   Verbose output\n\
                    \t-n   --count     How many times\n\
                    \t                 (default = 1)\n\
                    \t-o   --output    Output name (Required)\n";
    assert_eq!(stdout, expected);
}

#[test]
fn missing_manifest_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = argline()
        .current_dir(dir.path())
        .arg("help")
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("manifest not found"), "unexpected stderr:\n{stderr}");
}

#[test]
fn huge_num_params_is_an_error_not_a_crash() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("argline.json");
    fs::write(
        &manifest,
        r#"{ "args": [ { "id": 1, "class": "optional", "short": "n",
            "valueType": "integer", "numParams": 18446744073709551615 } ] }"#,
    )
    .unwrap();

    let out = argline()
        .arg("parse")
        .arg("-m")
        .arg(&manifest)
        .args(["--", "-n", "1", "2"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing values for -n: expected 18446744073709551615, found 2"),
        "unexpected stderr:\n{stderr}"
    );
}
