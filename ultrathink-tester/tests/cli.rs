use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "ultrathink-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_json_report_lists_every_run() {
    let exe = env!("CARGO_BIN_EXE_ultrathink-tester");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--mode",
            "random",
            "--tokens",
            "3",
            "--seeds",
            "1,UT-MOON07",
            "--strategies",
            "always-sell,cautious",
            "--iterations",
            "2",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(report["records"].as_array().map(Vec::len), Some(8));
    assert_eq!(report["aggregates"].as_array().map(Vec::len), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ULTRATHINK Strategy Tester"));
}

#[test]
fn cli_markdown_report_writes_output() {
    let exe = env!("CARGO_BIN_EXE_ultrathink-tester");
    let output_path = temp_path("markdown");
    let status = Command::new(exe)
        .args([
            "--report",
            "markdown",
            "--iterations",
            "1",
            "--mode",
            "catalog",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# ULTRATHINK Strategy Sweep"));
    assert!(content.contains("| Cautious | catalog |"));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_ultrathink-tester");
    let output = Command::new(exe)
        .args(["--strategies", "moonshot", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown strategy"));
}
