#![forbid(unsafe_code)]

//! Integration tests for the configuration-driven controller.
//!
//! These tests validate that the controller:
//! - Replays a full solution in order onto a fresh surface
//! - Supersedes a running animation when a new configuration arrives
//! - Reports unsolvable and malformed inputs without scheduling
//! - Debounces bursts of changes down to the latest one

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use hanoi_core::{DiscId, MoveCount, Progress};
use hanoi_runtime::{
    AnimatorConfig, CancelReason, Controller, ControllerError, EventLog, HanoiConfig,
    RecordingSurface, RunStatus, StartupError, SurfaceEvent, SystemClock, VirtualClock,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Surface factory that hands every run its own log.
#[derive(Clone, Default)]
struct Logs(Arc<Mutex<Vec<EventLog>>>);

impl Logs {
    fn factory(&self) -> impl FnMut() -> RecordingSurface + use<> {
        let logs = self.0.clone();
        move || {
            let log = EventLog::default();
            logs.lock().unwrap().push(log.clone());
            RecordingSurface::with_log(log)
        }
    }

    fn get(&self, run: usize) -> EventLog {
        self.0.lock().unwrap()[run].clone()
    }

    fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

fn quick_animator() -> AnimatorConfig {
    AnimatorConfig {
        debounce_ms: 10,
        ..AnimatorConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Full runs
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn four_pegs_four_discs_replays_nine_moves() {
    init_tracing();
    let logs = Logs::default();
    let clock = VirtualClock::new();
    let mut controller = Controller::new(
        &quick_animator(),
        Arc::new(clock.clone()),
        logs.factory(),
    );

    let status = controller.apply(&HanoiConfig::new(4, 4, 0.9)).unwrap();
    assert_eq!(
        status,
        RunStatus::Started {
            moves: 9,
            total: MoveCount::Finite(9),
            truncated: false,
        }
    );

    let report = controller.wait().unwrap().unwrap();
    assert!(report.is_complete());
    assert!(report.board.is_gathered_on(3));

    let log = logs.get(0);
    assert_eq!(log.completed(), (1..=9).collect::<Vec<u64>>());
    assert_eq!(log.last_progress().unwrap().to_string(), "9 of 9");
    // 0.9 s per move across nine moves.
    assert_eq!(clock.elapsed(), web_time::Duration::from_millis(8100));
}

#[test]
fn every_move_lifts_then_anchors_then_lowers() {
    let logs = Logs::default();
    let mut controller =
        Controller::new(&quick_animator(), Arc::new(VirtualClock::new()), logs.factory());
    controller.apply(&HanoiConfig::new(3, 2, 0.0)).unwrap();
    controller.wait().unwrap();

    let events = logs.get(0).events();
    let smallest = DiscId::new(0);
    assert_eq!(events[0], SurfaceEvent::Built { pegs: 3, discs: 2 });
    assert_eq!(
        events[1..5],
        [
            SurfaceEvent::Lifted {
                disc: smallest,
                elevation: 5
            },
            SurfaceEvent::Anchored {
                disc: smallest,
                peg: 1
            },
            SurfaceEvent::Positioned {
                disc: smallest,
                position: 1
            },
            SurfaceEvent::Progress(Progress::new(1, MoveCount::Finite(3))),
        ]
    );
}

#[test]
fn clamped_three_peg_board_reports_full_total() {
    let logs = Logs::default();
    let animator = AnimatorConfig {
        three_peg_disc_limit: 4,
        ..quick_animator()
    };
    let mut controller =
        Controller::new(&animator, Arc::new(VirtualClock::new()), logs.factory());

    let status = controller.apply(&HanoiConfig::new(3, 6, 0.0)).unwrap();
    assert_eq!(
        status,
        RunStatus::Started {
            moves: 15,
            total: MoveCount::Finite(63),
            truncated: true,
        }
    );
    controller.wait().unwrap();
    assert_eq!(
        logs.get(0).last_progress().unwrap().to_string(),
        "15 of 63"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Supersession
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn new_config_supersedes_running_animation() {
    init_tracing();
    let logs = Logs::default();
    let mut controller = Controller::new(&quick_animator(), Arc::new(SystemClock), logs.factory());

    // Long enough that the first run is still paused when replaced.
    controller.apply(&HanoiConfig::new(3, 8, 60.0)).unwrap();
    assert!(controller.is_running());

    controller.apply(&HanoiConfig::new(3, 2, 0.0)).unwrap();
    let report = controller.wait().unwrap().unwrap();
    assert!(report.is_complete());
    assert_eq!(report.cancelled, None);

    assert_eq!(logs.count(), 2);
    assert!(logs.get(0).completed().is_empty());
    assert_eq!(logs.get(1).completed(), vec![1, 2, 3]);
}

#[test]
fn shutdown_cancels_with_shutdown_reason() {
    let logs = Logs::default();
    let mut controller = Controller::new(&quick_animator(), Arc::new(SystemClock), logs.factory());
    controller.apply(&HanoiConfig::new(4, 10, 60.0)).unwrap();

    let report = controller.shutdown().unwrap().unwrap();
    assert_eq!(report.cancelled, Some(CancelReason::Shutdown));
    assert!(!report.is_complete());
    assert!(!controller.is_running());
    assert!(controller.shutdown().unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Rejected inputs
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn two_pegs_show_zero_of_infinity() {
    let logs = Logs::default();
    let mut controller =
        Controller::new(&quick_animator(), Arc::new(VirtualClock::new()), logs.factory());

    let status = controller.apply(&HanoiConfig::new(2, 4, 1.0)).unwrap();
    assert_eq!(status, RunStatus::Unsolvable { discs: 4, pegs: 2 });

    let progress = logs.get(0).last_progress().unwrap();
    assert_eq!(progress, Progress::new(0, MoveCount::Unbounded));
    assert_eq!(progress.to_string(), "0 of ∞");
    assert!(controller.wait().unwrap().is_none());
}

#[test]
fn single_peg_never_builds_a_surface() {
    let logs = Logs::default();
    let mut controller =
        Controller::new(&quick_animator(), Arc::new(VirtualClock::new()), logs.factory());

    let err = controller.apply(&HanoiConfig::new(1, 3, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Startup(StartupError::MissingElement { .. })
    ));
    assert_eq!(
        err.to_string(),
        "missing destination peg (receives the solved stack)"
    );
    assert_eq!(logs.count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Debounced loop
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn run_loop_applies_initial_then_latest_change() {
    init_tracing();
    let logs = Logs::default();
    // The closed channel flushes the burst long before a full quiet period.
    let mut controller = Controller::new(
        &AnimatorConfig::default(),
        Arc::new(VirtualClock::new()),
        logs.factory(),
    );

    let (tx, rx) = mpsc::channel();
    for discs in 1..=5 {
        tx.send(HanoiConfig::new(3, discs, 0.0)).unwrap();
    }
    drop(tx);

    let report = controller
        .run_loop(Some(HanoiConfig::new(4, 3, 0.0)), &rx)
        .unwrap()
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.completed, 31);
    assert_eq!(controller.runs_started(), 2);
    assert_eq!(logs.count(), 2);
}

#[test]
fn run_loop_rejects_bad_change_and_keeps_going() {
    let logs = Logs::default();
    let mut controller =
        Controller::new(&quick_animator(), Arc::new(VirtualClock::new()), logs.factory());

    let (tx, rx) = mpsc::channel();
    let sender = std::thread::spawn(move || {
        tx.send(HanoiConfig::new(3, 0, 1.0)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        tx.send(HanoiConfig::new(3, 3, 0.0)).unwrap();
    });

    let report = controller.run_loop(None, &rx).unwrap().unwrap();
    sender.join().unwrap();

    assert_eq!(report.completed, 7);
    assert_eq!(controller.runs_started(), 1);
}

#[test]
fn run_loop_fails_fast_on_bad_initial_config() {
    let logs = Logs::default();
    let mut controller =
        Controller::new(&quick_animator(), Arc::new(VirtualClock::new()), logs.factory());
    let (_tx, rx) = mpsc::channel();

    let err = controller
        .run_loop(Some(HanoiConfig::new(0, 3, 1.0)), &rx)
        .unwrap_err();
    assert!(matches!(err, ControllerError::Config(_)));
}
