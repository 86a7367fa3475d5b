use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::engine::host::{ManualClock, ManualHost};

const RED: [u8; 4] = [255, 0, 0, 255];

fn engine_with(config: EngineConfig) -> (Engine, ManualClock) {
    let host = ManualHost::new(Canvas::new(64, 48));
    let clock = host.clock();
    let engine = Engine::new(Box::new(host), config).unwrap();
    (engine, clock)
}

fn small(autostart: bool) -> EngineConfig {
    EngineConfig {
        width: 8,
        height: 8,
        autostart,
        ..EngineConfig::default()
    }
}

fn set_flag(flag: &Rc<Cell<bool>>) -> TransitionCallback {
    let flag = Rc::clone(flag);
    Box::new(move |_| {
        flag.set(true);
        Ok(())
    })
}

fn fill(engine: &mut Engine, name: &str, px: [u8; 4]) {
    let layer = engine.layer_mut(name).unwrap();
    for p in layer.surface_mut().data_mut().chunks_exact_mut(4) {
        p.copy_from_slice(&px);
    }
}

#[test]
fn autostart_runs_one_tick_and_arms_the_next() {
    let (engine, clock) = engine_with(EngineConfig::default());
    assert!(engine.is_running());
    assert_eq!(engine.tick_count(), 1);
    assert_eq!(engine.dt(), 0.0);
    assert_eq!((engine.width(), engine.height()), (300, 150));
    assert_eq!(clock.pending(), vec![engine.pending_tick().unwrap()]);
    assert_eq!(engine.layer_names(), vec![BASE_LAYER.to_string()]);
}

#[test]
fn without_autostart_nothing_is_scheduled() {
    let (mut engine, clock) = engine_with(small(false));
    assert!(!engine.is_running());
    assert_eq!(engine.tick_count(), 0);
    assert_eq!(clock.requests(), 0);

    clock.set_now(500.0);
    engine.start().unwrap();
    assert_eq!(engine.now(), 500.0);
    assert_eq!(engine.dt(), 0.0);
    assert_eq!(engine.tick_count(), 1);
    assert_eq!(clock.requests(), 1);
}

#[test]
fn frame_measures_dt_and_replaces_the_pending_tick() {
    let (mut engine, clock) = engine_with(small(true));
    let first = engine.pending_tick().unwrap();
    clock.advance(20.0);
    engine.frame().unwrap();
    assert_eq!(engine.dt(), 20.0);
    assert_eq!(engine.now(), 20.0);

    let second = engine.pending_tick().unwrap();
    assert_ne!(first, second);
    assert_eq!(clock.pending(), vec![second]);
}

#[test]
fn stop_cancels_and_frame_becomes_a_no_op() {
    let (mut engine, clock) = engine_with(small(true));
    engine.stop();
    assert!(!engine.is_running());
    assert!(clock.pending().is_empty());
    assert_eq!(engine.pending_tick(), None);

    engine.frame().unwrap();
    assert_eq!(engine.tick_count(), 1);
    assert!(clock.pending().is_empty());
}

#[test]
fn fullscreen_follows_the_host_viewport() {
    let (mut engine, clock) = engine_with(EngineConfig {
        fullscreen: true,
        ..small(false)
    });
    assert_eq!(engine.canvas(), Canvas::new(64, 48));

    engine.create_layer("a", LayerOpts::default()).unwrap();
    clock.set_viewport(Canvas::new(32, 16));
    engine.resize(None).unwrap();
    assert_eq!(engine.canvas(), Canvas::new(32, 16));
    assert_eq!(engine.layer("a").unwrap().surface().canvas(), Canvas::new(32, 16));
    assert_eq!(engine.base_surface().unwrap().canvas(), Canvas::new(32, 16));
}

#[test]
fn set_surface_size_resizes_every_layer() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    engine.set_surface_size(5, 3).unwrap();
    assert_eq!((engine.width(), engine.height()), (5, 3));
    assert_eq!(engine.layer("a").unwrap().surface().canvas(), Canvas::new(5, 3));
}

#[test]
fn visible_layers_are_composited_each_tick() {
    let (mut engine, clock) = engine_with(small(true));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    fill(&mut engine, "a", RED);

    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(engine.base_surface().unwrap().pixel(3, 3), Some(RED));
}

#[test]
fn hidden_layers_are_skipped() {
    let (mut engine, clock) = engine_with(small(true));
    engine
        .create_layer(
            "a",
            LayerOpts {
                visible: false,
                ..LayerOpts::default()
            },
        )
        .unwrap();
    fill(&mut engine, "a", RED);

    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(engine.base_surface().unwrap().pixel(3, 3), Some([0; 4]));
}

#[test]
fn autoclear_layers_are_wiped_before_compositing() {
    let (mut engine, clock) = engine_with(small(true));
    engine
        .create_layer(
            "a",
            LayerOpts {
                autoclear: true,
                ..LayerOpts::default()
            },
        )
        .unwrap();
    fill(&mut engine, "a", RED);

    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(engine.layer("a").unwrap().surface().pixel(0, 0), Some([0; 4]));
    assert_eq!(engine.base_surface().unwrap().pixel(0, 0), Some([0; 4]));
}

#[test]
fn draw_onto_while_stopped_composites_immediately() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    engine
        .draw_onto(Some("a"), |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 0, 0, 255));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 8.0, 8.0));
        })
        .unwrap();
    assert_eq!(engine.base_surface().unwrap().pixel(4, 4), Some(RED));
}

#[test]
fn save_and_load_copy_between_base_and_layer() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("snap", LayerOpts::default()).unwrap();
    fill(&mut engine, BASE_LAYER, RED);

    assert_eq!(engine.save("snap").unwrap(), CompositePath::Direct);
    assert_eq!(engine.layer("snap").unwrap().surface().pixel(1, 1), Some(RED));

    engine.clear(None).unwrap();
    assert_eq!(engine.base_surface().unwrap().pixel(1, 1), Some([0; 4]));
    engine.load("snap").unwrap();
    assert_eq!(engine.base_surface().unwrap().pixel(1, 1), Some(RED));
}

#[test]
fn unknown_layers_are_reported() {
    let (mut engine, _clock) = engine_with(small(false));
    assert!(matches!(
        engine.layer("nope"),
        Err(JoltError::LayerNotFound(name)) if name == "nope"
    ));
    assert!(engine.clear(Some("nope")).is_err());
    assert!(engine.load("nope").is_err());
    assert!(engine.destroy_layer(Some("nope")).is_err());
    assert!(
        engine
            .start_transition("nope", TransitionKind::ExpandIn, TransitionOpts::default(), None)
            .is_err()
    );
}

#[test]
fn invalid_transition_opts_are_rejected() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    let opts = TransitionOpts {
        duration: -5.0,
        ..TransitionOpts::default()
    };
    assert!(matches!(
        engine.start_transition("a", TransitionKind::ExpandIn, opts, None),
        Err(JoltError::Validation(_))
    ));
    assert!(!engine.layer("a").unwrap().has_transition());
}

#[test]
fn end_transition_on_idle_layer_skips_callback() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    let ran = Rc::new(Cell::new(false));
    let ended = engine.end_transition("a", Some(set_flag(&ran))).unwrap();
    assert!(!ended);
    assert!(!ran.get());
}

#[test]
fn end_transition_detaches_and_runs_supplied_callback() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    let stored = Rc::new(Cell::new(false));
    let supplied = Rc::new(Cell::new(false));

    engine
        .start_transition(
            "a",
            TransitionKind::ExpandIn,
            TransitionOpts::default(),
            Some(set_flag(&stored)),
        )
        .unwrap();
    let ended = engine.end_transition("a", Some(set_flag(&supplied))).unwrap();

    assert!(ended);
    assert!(supplied.get());
    assert!(!stored.get());
    assert!(!engine.layer("a").unwrap().has_transition());
}

#[test]
fn callback_errors_surface_but_keep_the_loop_alive() {
    let (mut engine, clock) = engine_with(small(true));
    engine.on_frame(|_| anyhow::bail!("boom"));

    clock.advance(16.0);
    let err = engine.frame().unwrap_err();
    assert!(matches!(err, JoltError::Other(_)));
    assert!(err.to_string().contains("boom"));
    assert!(engine.pending_tick().is_some());
    assert_eq!(engine.frame_callback_count(), 1);
}

#[test]
fn cancel_frame_removes_the_callback() {
    let (mut engine, clock) = engine_with(small(true));
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let handle = engine.on_frame(move |_| {
        c.set(c.get() + 1);
        Ok(())
    });

    clock.advance(16.0);
    engine.frame().unwrap();
    assert!(engine.cancel_frame(handle));
    assert!(!engine.cancel_frame(handle));
    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn run_while_drives_a_stepping_host() {
    let host = ManualHost::new(Canvas::new(8, 8)).with_step(16.0);
    let clock = host.clock();
    let mut engine = Engine::new(Box::new(host), small(true)).unwrap();

    let ran = engine.run_while(|e| e.now() < 160.0);
    assert_eq!(ran, 10);
    assert_eq!(clock.now(), 160.0);
    assert_eq!(engine.tick_count(), 11);
    assert_eq!(engine.dt(), 16.0);
}

#[test]
fn run_while_ends_when_nothing_is_pending() {
    let host = ManualHost::new(Canvas::new(8, 8)).with_step(16.0);
    let mut engine = Engine::new(Box::new(host), small(true)).unwrap();
    engine.on_frame(|e| {
        if e.tick_count() >= 3 {
            e.stop();
        }
        Ok(())
    });
    engine.run_while(|_| true);
    assert_eq!(engine.tick_count(), 3);
    assert!(!engine.is_running());
}

#[test]
fn dispose_is_terminal_and_idempotent() {
    let (mut engine, clock) = engine_with(small(true));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    engine.on_frame(|_| Ok(()));

    engine.dispose();
    assert!(engine.is_disposed());
    assert!(!engine.is_running());
    assert!(clock.pending().is_empty());
    assert!(engine.layer_names().is_empty());
    assert_eq!(engine.frame_callback_count(), 0);

    engine.dispose();
    engine.frame().unwrap();
    assert_eq!(engine.tick_count(), 1);
    assert!(matches!(
        engine.create_layer("b", LayerOpts::default()),
        Err(JoltError::Disposed)
    ));
    assert!(matches!(engine.start(), Err(JoltError::Disposed)));
    assert!(matches!(engine.snapshot(), Err(JoltError::LayerNotFound(_))));
}

#[test]
fn destroy_layer_removes_one_layer() {
    let (mut engine, _clock) = engine_with(small(false));
    engine.create_layer("a", LayerOpts::default()).unwrap();
    engine.create_layer("b", LayerOpts::default()).unwrap();
    engine.destroy_layer(Some("a")).unwrap();
    assert_eq!(engine.layer_names(), vec![BASE_LAYER.to_string(), "b".to_string()]);
    assert!(!engine.is_disposed());
}

#[test]
fn restart_from_a_callback_leaves_one_tick_pending() {
    let (mut engine, clock) = engine_with(small(true));
    let mut armed = true;
    engine.on_frame(move |e| {
        if armed {
            armed = false;
            e.start()?;
        }
        Ok(())
    });

    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(engine.tick_count(), 3);
    assert_eq!(clock.pending().len(), 1);
    assert_eq!(clock.pending(), vec![engine.pending_tick().unwrap()]);
}

#[test]
fn cancel_after_nested_tick_still_applies() {
    let (mut engine, clock) = engine_with(small(false));
    let b_calls = Rc::new(Cell::new(0));
    let cancelled = Rc::new(Cell::new(false));

    let calls = Rc::clone(&b_calls);
    let b = engine.on_frame(move |_| {
        calls.set(calls.get() + 1);
        Ok(())
    });
    let flag = Rc::clone(&cancelled);
    let mut armed = true;
    engine.on_frame(move |e| {
        if armed {
            armed = false;
            e.start()?;
            flag.set(e.cancel_frame(b));
        }
        Ok(())
    });

    engine.start().unwrap();
    assert_eq!(b_calls.get(), 1);
    assert!(cancelled.get());
    assert_eq!(clock.pending().len(), 1);

    clock.advance(16.0);
    engine.frame().unwrap();
    assert_eq!(b_calls.get(), 1);
    assert_eq!(engine.frame_callback_count(), 1);
}

#[test]
fn destroying_everything_matches_dispose() {
    let (mut engine, clock) = engine_with(small(true));
    engine.on_frame(|_| Ok(()));
    engine.destroy_layer(None).unwrap();
    assert!(engine.is_disposed());
    assert!(!engine.is_running());
    assert!(clock.pending().is_empty());
    assert_eq!(engine.frame_callback_count(), 0);

    engine.dispose();
    assert!(engine.is_disposed());
    assert!(matches!(engine.destroy_layer(Some(BASE_LAYER)), Err(JoltError::Disposed)));
}
