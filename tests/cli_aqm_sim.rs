use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "aqm-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_aqm_sim"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn aqm_sim");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait aqm_sim")
}

#[test]
fn aqm_sim_menu_session_round_trip() {
    let output = run_with_stdin(
        &["--capacity", "2", "--threshold", "1", "--drop-probability", "1", "--seed", "7"],
        "1\nA\n10.0.0.1\n1\nB\n10.0.0.2\n1\nC\n10.0.0.3\n3\n2\n4\n",
    );
    assert!(
        output.status.success(),
        "aqm_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Select an action:"));
    assert!(stdout.contains("Queue is full! Applying AQM for IP 10.0.0.3..."));
    assert!(stdout.contains("Packet A from IP 10.0.0.1 dropped to manage congestion."));
    assert!(stdout.contains("Packet C from IP 10.0.0.3 added to the queue."));
    assert!(stdout.contains("Packet B from IP 10.0.0.2 dequeued."));
    assert!(stdout.contains("Exiting the simulator. Goodbye!"));
}

#[test]
fn aqm_sim_writes_events_json_with_meta_first() {
    let dir = unique_temp_dir("events");
    let out_json = dir.join("events.json");
    let output = run_with_stdin(
        &["--quiet", "--events-json", out_json.to_str().unwrap()],
        "enqueue p1 192.168.1.1\nenqueue p2 999.1.1.1\ndequeue\n",
    );
    assert!(
        output.status.success(),
        "aqm_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid IP address format: 999.1.1.1. Please try again."));
    assert!(!stdout.contains("Select an action:"));

    let raw = fs::read_to_string(&out_json).expect("read events.json");
    let v: Value = serde_json::from_str(&raw).expect("parse events.json");
    let arr = v.as_array().expect("events must be a JSON array");
    let kinds: Vec<&str> = arr.iter().filter_map(|e| e["kind"].as_str()).collect();
    assert_eq!(kinds, ["meta", "enqueue", "dequeue"]);
    assert_eq!(arr[0]["capacity"], 10);
    assert_eq!(arr[0]["threshold"], 8);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn aqm_sim_reads_config_file_and_flags_override_it() {
    let dir = unique_temp_dir("config");
    let cfg = dir.join("aqm.json");
    fs::write(&cfg, r#"{ "capacity": 1, "threshold": 1, "drop_probability": 0.0 }"#)
        .expect("write config");
    let output = run_with_stdin(
        &["--quiet", "--config", cfg.to_str().unwrap(), "--capacity", "2"],
        "enqueue a 1.1.1.1\nenqueue b 1.1.1.2\nenqueue c 1.1.1.3\nstats\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No packet dropped for IP 1.1.1.3. Packet c rejected."));
    assert!(stdout.contains("len=2/2"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn aqm_sim_exits_nonzero_on_threshold_above_capacity() {
    let output = run_with_stdin(&["--capacity", "3", "--threshold", "4"], "");
    assert!(!output.status.success(), "expected non-zero exit");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("threshold 4 exceeds capacity 3"),
        "stderr did not contain expected message: {stderr}"
    );
}

#[test]
fn aqm_load_prints_json_report() {
    let output = Command::new(env!("CARGO_BIN_EXE_aqm_load"))
        .args([
            "--capacity",
            "5",
            "--threshold",
            "3",
            "--drop-probability",
            "1",
            "--pkts",
            "20",
            "--arrival-gap-us",
            "1",
            "--service-gap-us",
            "0",
            "--json",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("run aqm_load");
    assert!(
        output.status.success(),
        "aqm_load failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: Value = serde_json::from_slice(&output.stdout).expect("parse report");
    assert_eq!(v["arrivals"], 20);
    assert_eq!(v["stats"]["evicted"], 15);
    assert_eq!(v["final_len"], 5);
}

#[test]
fn aqm_load_drop_tail_rejects_overflow() {
    let output = Command::new(env!("CARGO_BIN_EXE_aqm_load"))
        .args([
            "--discipline",
            "drop-tail",
            "--capacity",
            "4",
            "--pkts",
            "10",
            "--arrival-gap-us",
            "1",
            "--service-gap-us",
            "0",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("run aqm_load");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("accepted=4, evicted=0, rejected=6"), "{stdout}");
}
