use crate::sim::{Event, SimError, SimState, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    executed: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Log = Arc<Mutex<Vec<u32>>>;

struct Push {
    id: u32,
    log: Log,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, world: &mut dyn World) {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
        if let Some(w) = world.as_any_mut().downcast_mut::<DummyWorld>() {
            w.executed += 1;
        }
    }
}

struct PushThenSchedule {
    id: u32,
    next_id: u32,
    delay: SimTime,
    log: Log,
}

impl Event for PushThenSchedule {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let PushThenSchedule {
            id,
            next_id,
            delay,
            log,
        } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule_in(delay, Push { id: next_id, log });
    }
}

struct ScheduleInPast {
    result: Arc<Mutex<Option<SimError>>>,
    log: Log,
}

impl Event for ScheduleInPast {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let ScheduleInPast { result, log } = *self;
        let past = SimTime(sim.now().0 - 1);
        let r = sim.schedule(past, Push { id: 99, log });
        *result.lock().expect("result lock") = r.err();
    }
}

struct RecordState {
    states: Arc<Mutex<Vec<SimState>>>,
}

impl Event for RecordState {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        self.states.lock().expect("state lock").push(sim.state());
    }
}

fn push(id: u32, log: &Log) -> Push {
    Push {
        id,
        log: Arc::clone(log),
    }
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let log = Log::default();

    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), push(1, &log)).expect("schedule");
    sim.schedule(SimTime(5), push(2, &log)).expect("schedule");
    sim.schedule(SimTime(10), push(3, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    let summary = sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 1, 3]);
    assert_eq!(world.executed, 3);
    assert_eq!(summary.executed, 3);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn event_scheduled_at_same_time_inside_event_runs_after_current_event() {
    let log = Log::default();

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        PushThenSchedule {
            id: 1,
            next_id: 2,
            delay: SimTime::ZERO,
            log: Arc::clone(&log),
        },
    )
    .expect("schedule");
    sim.schedule(SimTime::ZERO, push(3, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    // 回调里调度的同刻事件排在已在队列中的同刻事件之后
    assert_eq!(&*log.lock().expect("log lock"), &[1, 3, 2]);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn run_until_discards_events_after_until_and_advances_time() {
    let log = Log::default();

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, push(1, &log)).expect("schedule");
    sim.schedule(SimTime(10), push(2, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    let summary = sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.discarded, 1);
    assert_eq!(sim.now(), SimTime(5));
    assert_eq!(sim.state(), SimState::Stopped);
    assert_eq!(sim.pending(), 0);

    // 被丢弃的事件不会在之后的运行中复活
    sim.run(&mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[1]);
}

#[test]
fn run_until_executes_events_scheduled_exactly_at_until() {
    let log = Log::default();

    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), push(1, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(sim.now(), SimTime(5));
}

#[test]
fn run_until_advances_time_even_if_there_are_no_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    let summary = sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(summary.executed, 0);
    assert_eq!(summary.final_time, SimTime(7));
}

#[test]
fn events_scheduled_by_callbacks_past_stop_time_never_run() {
    let log = Log::default();

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(4),
        PushThenSchedule {
            id: 1,
            next_id: 2,
            delay: SimTime(3),
            log: Arc::clone(&log),
        },
    )
    .expect("schedule");

    let mut world = DummyWorld::default();
    let summary = sim.run_until(SimTime(5), &mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(summary.discarded, 1);
}

#[test]
fn scheduling_in_the_past_fails_but_simulation_continues() {
    let log = Log::default();
    let result = Arc::new(Mutex::new(None));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(10),
        ScheduleInPast {
            result: Arc::clone(&result),
            log: Arc::clone(&log),
        },
    )
    .expect("schedule");
    sim.schedule(SimTime(20), push(2, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(
        *result.lock().expect("result lock"),
        Some(SimError::InvalidSchedule {
            at: SimTime(9),
            now: SimTime(10)
        })
    );
    assert_eq!(&*log.lock().expect("log lock"), &[2]);
}

#[test]
fn cancelled_event_never_executes_and_late_cancel_is_noop() {
    let log = Log::default();

    let mut sim = Simulator::default();
    let a = sim.schedule(SimTime(1), push(1, &log)).expect("schedule");
    let b = sim.schedule(SimTime(2), push(2, &log)).expect("schedule");
    assert!(sim.cancel(b));

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert!(!sim.cancel(a));
    assert!(!sim.is_pending(a));
}

#[test]
fn state_moves_from_idle_to_running_to_stopped() {
    let states = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    assert_eq!(sim.state(), SimState::Idle);
    sim.schedule(
        SimTime(1),
        RecordState {
            states: Arc::clone(&states),
        },
    )
    .expect("schedule");

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(2), &mut world);

    assert_eq!(&*states.lock().expect("state lock"), &[SimState::Running]);
    assert_eq!(sim.state(), SimState::Stopped);
}

#[test]
fn identical_insertion_sequences_give_identical_runs() {
    fn one_run() -> (Vec<u32>, SimTime, u64) {
        let log = Log::default();
        let mut sim = Simulator::default();
        for (i, at) in [7u64, 3, 3, 9, 1, 3, 12, 7].into_iter().enumerate() {
            sim.schedule(
                SimTime(at),
                PushThenSchedule {
                    id: i as u32,
                    next_id: 100 + i as u32,
                    delay: SimTime(at % 4),
                    log: Arc::clone(&log),
                },
            )
            .expect("schedule");
        }
        let mut world = DummyWorld::default();
        let summary = sim.run_until(SimTime(10), &mut world);
        let order = log.lock().expect("log lock").clone();
        (order, summary.final_time, summary.executed)
    }

    let first = one_run();
    let second = one_run();
    assert_eq!(first, second);
    assert!(!first.0.is_empty());
}

#[test]
fn independent_simulators_run_on_separate_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|k| {
            std::thread::spawn(move || {
                let log = Log::default();
                let mut sim = Simulator::default();
                for i in 0..10u32 {
                    sim.schedule(SimTime(k + i as u64), push(i, &log))
                        .expect("schedule");
                }
                let mut world = DummyWorld::default();
                sim.run(&mut world);
                let n = log.lock().expect("log lock").len();
                n
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("thread"), 10);
    }
}
