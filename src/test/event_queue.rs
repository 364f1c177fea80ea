use crate::sim::{Event, EventQueue, SimError, SimTime, Simulator, World};

struct Noop;

impl Event for Noop {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {}
}

fn insert(q: &mut EventQueue, at: u64) -> crate::sim::EventId {
    q.insert(SimTime::ZERO, SimTime(at), Box::new(Noop))
        .expect("insert")
}

#[test]
fn pop_returns_non_decreasing_times_with_fifo_ties() {
    let mut q = EventQueue::default();
    // 简单的 LCG 生成一组有大量重复值的时间
    let mut x: u64 = 12345;
    let mut inserted = Vec::new();
    for _ in 0..500 {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let at = (x >> 33) % 20;
        inserted.push(insert(&mut q, at));
    }
    assert_eq!(q.len(), 500);

    let mut popped = Vec::new();
    while let Ok(item) = q.pop_earliest() {
        popped.push(item.id());
    }
    assert_eq!(popped.len(), 500);
    for pair in popped.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.at() <= b.at(), "time went backwards: {a:?} then {b:?}");
        if a.at() == b.at() {
            assert!(a.seq() < b.seq(), "tie not in insertion order: {a:?} then {b:?}");
        }
    }

    let mut expected = inserted.clone();
    expected.sort_by_key(|id| (id.at(), id.seq()));
    assert_eq!(popped, expected);
}

#[test]
fn pop_on_empty_queue_signals_empty() {
    let mut q = EventQueue::default();
    assert_eq!(q.pop_earliest().err(), Some(SimError::EmptyQueue));
    assert!(q.is_empty());
    assert_eq!(q.next_time(), None);
}

#[test]
fn insert_in_the_past_is_rejected() {
    let mut q = EventQueue::default();
    let err = q
        .insert(SimTime(10), SimTime(9), Box::new(Noop))
        .expect_err("past insert must fail");
    assert_eq!(
        err,
        SimError::InvalidSchedule {
            at: SimTime(9),
            now: SimTime(10)
        }
    );
    assert!(q.is_empty());

    // 恰好等于当前时间是允许的
    assert!(q.insert(SimTime(10), SimTime(10), Box::new(Noop)).is_ok());
}

#[test]
fn cancelled_event_is_skipped_and_cancel_is_idempotent() {
    let mut q = EventQueue::default();
    let a = insert(&mut q, 5);
    let b = insert(&mut q, 7);

    assert!(q.is_pending(a));
    assert!(q.cancel(a));
    assert!(!q.is_pending(a));
    assert!(!q.cancel(a));
    assert_eq!(q.len(), 1);

    assert_eq!(q.next_time(), Some(SimTime(7)));
    let item = q.pop_earliest().expect("b remains");
    assert_eq!(item.id(), b);

    // 已弹出的事件再取消是空操作
    assert!(!q.cancel(b));
    assert_eq!(q.pop_earliest().err(), Some(SimError::EmptyQueue));
}

#[test]
fn clear_reports_only_live_events() {
    let mut q = EventQueue::default();
    let a = insert(&mut q, 1);
    insert(&mut q, 2);
    insert(&mut q, 3);
    q.cancel(a);
    assert_eq!(q.clear(), 2);
    assert!(q.is_empty());
    assert_eq!(q.next_time(), None);
}
