use crate::sim::{Event, SimTime, Simulator};

#[derive(Default)]
struct Log {
    seen: Vec<(u64, u32)>,
}

struct Push {
    id: u32,
}

impl Event<Log> for Push {
    fn execute(self: Box<Self>, sim: &mut Simulator<Log>, world: &mut Log) {
        world.seen.push((sim.now().0, self.id));
    }
}

struct PushThenScheduleNow {
    id: u32,
    next_id: u32,
}

impl Event<Log> for PushThenScheduleNow {
    fn execute(self: Box<Self>, sim: &mut Simulator<Log>, world: &mut Log) {
        world.seen.push((sim.now().0, self.id));
        sim.schedule(sim.now(), Push { id: self.next_id });
    }
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let mut sim: Simulator<Log> = Simulator::default();
    let mut log = Log::default();
    sim.schedule(SimTime(10), Push { id: 1 });
    sim.schedule(SimTime(5), Push { id: 2 });
    sim.schedule(SimTime(10), Push { id: 3 });
    sim.schedule(SimTime(5), Push { id: 4 });
    sim.run(&mut log);
    assert_eq!(log.seen, vec![(5, 2), (5, 4), (10, 1), (10, 3)]);
    assert_eq!(sim.executed(), 4);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn events_scheduled_at_now_run_after_existing_same_time_events() {
    let mut sim: Simulator<Log> = Simulator::default();
    let mut log = Log::default();
    sim.schedule(SimTime(1), PushThenScheduleNow { id: 1, next_id: 9 });
    sim.schedule(SimTime(1), Push { id: 2 });
    sim.run(&mut log);
    assert_eq!(log.seen, vec![(1, 1), (1, 2), (1, 9)]);
}

#[test]
fn run_until_stops_before_later_events_and_advances_clock() {
    let mut sim: Simulator<Log> = Simulator::default();
    let mut log = Log::default();
    sim.schedule(SimTime(5), Push { id: 1 });
    sim.schedule(SimTime(20), Push { id: 2 });
    sim.run_until(SimTime(10), &mut log);
    assert_eq!(log.seen, vec![(5, 1)]);
    assert_eq!(sim.now(), SimTime(10));
    assert_eq!(sim.pending(), 1);

    // scheduling in the past clamps to now
    sim.schedule(SimTime(1), Push { id: 3 });
    sim.run(&mut log);
    assert_eq!(log.seen, vec![(5, 1), (10, 3), (20, 2)]);
}

#[test]
fn sim_time_unit_conversions_saturate() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));
    assert_eq!(SimTime::from_micros(2).to_string(), "2.000us");
}
