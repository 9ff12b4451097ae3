use std::process::Command;

fn headless(seed: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_hopscroll"))
        .args(["--headless", "300", "--seed", seed])
        .output()
        .expect("failed to launch hopscroll");
    assert!(output.status.success(), "headless run should succeed");
    String::from_utf8(output.stdout).expect("summary is utf-8")
}

#[test]
fn headless_run_prints_a_summary() {
    let summary = headless("7");
    assert!(summary.contains("frames: 300"), "unexpected summary: {summary}");
    assert!(summary.contains("runs: "));
    assert!(summary.contains("best score: "));
    assert!(summary.contains("items: "));
}

#[test]
fn same_seed_prints_the_same_summary() {
    assert_eq!(headless("19"), headless("19"));
}

#[test]
fn unreadable_tuning_file_fails_the_launch() {
    let output = Command::new(env!("CARGO_BIN_EXE_hopscroll"))
        .args(["--headless", "1", "--config", "/nonexistent/hopscroll.toml"])
        .output()
        .expect("failed to launch hopscroll");
    assert!(!output.status.success());
}
