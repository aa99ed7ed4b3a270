use std::process::{Command, Output};

use serde_json::Value;

fn tractor_plough(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tractor-plough"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch tractor-plough")
}

#[test]
fn json_report_is_the_only_stdout_content() {
    let output = tractor_plough(&["--width", "2", "--height", "2", "--seed", "1", "--json"]);
    assert!(output.status.success(), "run should succeed: {output:?}");

    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is a JSON report");
    assert_eq!(report["score"], 4);
    assert_eq!(report["final_state"], "Completed");
    assert_eq!(report["total_interior_cells"], 4);
}

#[test]
fn frames_and_json_are_rejected_together() {
    let output = tractor_plough(&["--width", "2", "--height", "2", "--frames", "--json"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "nothing should be rendered");
}

#[test]
fn out_of_bounds_route_reports_an_aborted_session() {
    let output = tractor_plough(&[
        "--width", "2", "--height", "2", "--seed", "3", "--route", "5,5",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.contains("score: 0 (0 of 4 cells ploughed, aborted)"));
    assert!(stdout.contains("reason: move 0 to (5, 5) rejected"));
}
