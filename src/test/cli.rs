use std::io::Cursor;

use crate::cli::{Command, Session};
use crate::error::{CommandError, PacketError};
use crate::queue::{AqmConfig, AqmQueue, EvictPolicy, FixedSource, PacketQueue};

fn run_script(cfg: &AqmConfig, sample: f64, script: &str, quiet: bool) -> (String, AqmQueue) {
    let q = AqmQueue::new(cfg, FixedSource::constant(sample)).expect("queue");
    let mut out = Vec::new();
    let mut session = Session::new(q, Cursor::new(script.as_bytes()), &mut out);
    if quiet {
        session = session.quiet();
    }
    session.run().expect("session run");
    let (q, _) = session.into_parts();
    (String::from_utf8(out).expect("utf8"), q)
}

#[test]
fn parse_menu_numbers_and_words() {
    assert_eq!(Command::parse("1"), Ok(Command::Enqueue(None)));
    assert_eq!(
        Command::parse("  enqueue p1 10.0.0.1 "),
        Ok(Command::Enqueue(Some(("p1".into(), "10.0.0.1".into()))))
    );
    assert_eq!(Command::parse("2"), Ok(Command::Dequeue));
    assert_eq!(Command::parse("SHOW"), Ok(Command::Show));
    assert_eq!(Command::parse("3"), Ok(Command::Show));
    assert_eq!(Command::parse("stats"), Ok(Command::Stats));
    assert_eq!(Command::parse("4"), Ok(Command::Exit));
    assert_eq!(Command::parse("quit"), Ok(Command::Exit));
}

#[test]
fn parse_reports_bad_arity_and_unknown_commands() {
    assert_eq!(
        Command::parse("enqueue p1"),
        Err(CommandError::MissingArgument("ip"))
    );
    assert_eq!(
        Command::parse("enqueue p1 1.1.1.1 extra"),
        Err(CommandError::UnexpectedArgument("extra".into()))
    );
    assert_eq!(
        Command::parse("dequeue now"),
        Err(CommandError::UnexpectedArgument("now".into()))
    );
    assert_eq!(Command::parse("7"), Err(CommandError::Unknown("7".into())));
    let wrapped: CommandError = PacketError::EmptyId.into();
    assert_eq!(wrapped.to_string(), "packet id must not be empty");
}

#[test]
fn menu_flow_prompts_for_id_and_address() {
    let cfg = AqmConfig::new(3, 2, 0.0);
    let (out, q) = run_script(&cfg, 0.5, "1\npacket1\n192.168.1.1\n3\n4\n", false);
    assert!(out.starts_with("Welcome to the Active Queue Management (AQM) Simulator!"));
    assert!(out.contains("Enter packet identifier"));
    assert!(out.contains("Enter the IP address of the packet"));
    assert!(out.contains("Packet packet1 from IP 192.168.1.1 added to the queue."));
    assert!(out.contains("Current queue state:\nPacket packet1 from IP 192.168.1.1\n"));
    assert!(out.trim_end().ends_with("Exiting the simulator. Goodbye!"));
    assert_eq!(q.len(), 1);
}

#[test]
fn invalid_address_never_reaches_the_queue() {
    let cfg = AqmConfig::new(3, 2, 0.0);
    let (out, q) = run_script(&cfg, 0.5, "enqueue p1 300.1.1.1\nenqueue p2 1.2.3\n", true);
    assert!(out.contains("Invalid IP address format: 300.1.1.1. Please try again."));
    assert!(out.contains("Invalid IP address format: 1.2.3. Please try again."));
    assert_eq!(q.len(), 0);
    assert_eq!(q.stats().accepted + q.stats().rejected, 0);
}

#[test]
fn full_queue_reports_admission_control_and_eviction() {
    let cfg = AqmConfig::new(3, 2, 1.0).with_policy(EvictPolicy::RejectAfterEvict);
    let script = "enqueue A 10.0.0.1\nenqueue B 10.0.0.2\nenqueue C 10.0.0.3\nenqueue D 10.0.0.4\nshow\ndequeue\n";
    let (out, q) = run_script(&cfg, 0.0, script, true);
    assert!(out.contains("Queue is full! Applying AQM for IP 10.0.0.4..."));
    assert!(out.contains("Queue size exceeds threshold (2). Dropping packet from IP 10.0.0.4..."));
    assert!(out.contains("Packet A from IP 10.0.0.1 dropped to manage congestion."));
    assert!(out.contains("Packet D from IP 10.0.0.4 not added"));
    assert!(out.contains("Current queue state:\nPacket B from IP 10.0.0.2\nPacket C from IP 10.0.0.3\n"));
    assert!(out.contains("Packet B from IP 10.0.0.2 dequeued."));
    assert_eq!(q.len(), 1);
}

#[test]
fn full_queue_without_drop_rejects_arrival() {
    let cfg = AqmConfig::new(1, 1, 0.2);
    let (out, q) = run_script(&cfg, 0.9, "enqueue A 1.1.1.1\nenqueue B 2.2.2.2\n", true);
    assert!(out.contains("No packet dropped for IP 2.2.2.2. Packet B rejected."));
    assert_eq!(q.inspect()[0].id().as_str(), "A");
}

#[test]
fn empty_queue_dequeue_and_show() {
    let (out, _) = run_script(&AqmConfig::default(), 0.0, "2\n3\n2\n", true);
    assert_eq!(
        out,
        "Queue is empty. No packets to dequeue.\nQueue is empty.\nQueue is empty. No packets to dequeue.\n"
    );
}

#[test]
fn unknown_option_and_bad_arity_keep_session_alive() {
    let (out, q) = run_script(
        &AqmConfig::default(),
        0.0,
        "9\nenqueue only-id\n\nenqueue ok 8.8.8.8\nstats\nexit\nenqueue late 1.1.1.1\n",
        true,
    );
    assert!(out.contains("Invalid option. Please try again."));
    assert!(out.contains("missing argument <ip>. Please try again."));
    assert!(out.contains(
        "len=1/10 state=BelowThreshold policy=InsertAfterEvict accepted=1 evicted=0 rejected=0"
    ));
    // nothing after exit is executed
    assert_eq!(q.len(), 1);
}

#[test]
fn session_viz_records_meta_and_operations() {
    let q = AqmQueue::new(&AqmConfig::new(2, 1, 0.0), FixedSource::constant(0.0)).expect("queue");
    let mut out = Vec::new();
    let script = "enqueue a 1.1.1.1\ndequeue\ndequeue\n";
    let mut session = Session::new(q, Cursor::new(script), &mut out).quiet().with_viz();
    session.run().expect("run");
    let (_, viz) = session.into_parts();
    let viz = viz.expect("viz");
    let raw = viz.to_json().expect("json");
    let v: serde_json::Value = serde_json::from_str(&raw).expect("parse");
    let kinds: Vec<&str> = v
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(kinds, ["meta", "enqueue", "dequeue", "empty_dequeue"]);
}

#[test]
fn invalid_utf8_line_is_reported_and_session_continues() {
    let q = AqmQueue::new(&AqmConfig::default(), FixedSource::constant(0.0)).expect("queue");
    let mut out = Vec::new();
    let input: &[u8] = b"enqueue a 1.1.1.1\n\xff\xfe\nenqueue b 1.1.1.2\n";
    let mut session = Session::new(q, Cursor::new(input), &mut out).quiet();
    session.run().expect("bad bytes must not end the session");
    let (q, _) = session.into_parts();

    let out = String::from_utf8(out).expect("utf8");
    assert!(out.contains("Invalid option. Please try again."));
    assert!(out.contains("Packet b from IP 1.1.1.2 added to the queue."));
    assert_eq!(q.len(), 2);
}

#[test]
fn stats_line_shows_configured_policy() {
    let cfg = AqmConfig::new(2, 1, 0.5).with_policy(EvictPolicy::RejectAfterEvict);
    let (out, _) = run_script(&cfg, 0.0, "stats\n", true);
    assert!(out.contains("policy=RejectAfterEvict"), "{out}");
}
