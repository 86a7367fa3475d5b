use super::*;

#[test]
fn manual_host_tracks_requests_and_cancellations() {
    let mut host = ManualHost::new(Canvas::new(640, 480));
    let clock = host.clock();

    let a = host.request_tick();
    let b = host.request_tick();
    assert_ne!(a, b);
    assert_eq!(clock.pending(), vec![a, b]);
    assert_eq!(clock.requests(), 2);

    host.cancel_tick(a);
    host.cancel_tick(TickId(999));
    assert_eq!(clock.pending(), vec![b]);
    assert_eq!(host.viewport(), Canvas::new(640, 480));
}

#[test]
fn manual_clock_is_shared_with_host() {
    let mut host = ManualHost::new(Canvas::new(1, 1)).with_step(16.0);
    let clock = host.clock();
    clock.set_now(100.0);
    clock.advance(20.0);
    assert_eq!(host.now_ms(), 120.0);

    let id = host.request_tick();
    host.wait(id);
    assert_eq!(clock.now(), 136.0);

    clock.set_viewport(Canvas::new(10, 20));
    assert_eq!(host.viewport(), Canvas::new(10, 20));
}

#[test]
fn manual_host_without_step_does_not_move_on_wait() {
    let mut host = ManualHost::new(Canvas::new(1, 1));
    let id = host.request_tick();
    host.wait(id);
    assert_eq!(host.now_ms(), 0.0);
}

#[test]
fn interval_host_spaces_ticks_at_least_min_interval() {
    let mut host = IntervalHost::new(Canvas::new(8, 8));
    let first = host.request_tick();
    let due_first = host.due().unwrap();
    let second = host.request_tick();
    let due_second = host.due().unwrap();
    assert_ne!(first, second);
    assert!(due_second - due_first >= MIN_TICK_INTERVAL_MS - 1e-9);
}

#[test]
fn interval_host_cancel_and_wait() {
    let mut host = IntervalHost::new(Canvas::new(8, 8));
    let stale = host.request_tick();
    let id = host.request_tick();
    host.cancel_tick(stale);
    assert!(host.due().is_some(), "cancelling a superseded id keeps the pending tick");

    let before = host.now_ms();
    host.wait(id);
    assert!(host.now_ms() >= host.due().unwrap() - 1e-3);
    assert!(host.now_ms() >= before);

    host.cancel_tick(id);
    assert_eq!(host.due(), None);
}
