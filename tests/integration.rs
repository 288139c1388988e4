// SPDX-License-Identifier: MPL-2.0
//! End-to-end queue behavior against a headless host.
//!
//! Every test runs on a paused clock, so timestamps are exact up to the
//! scheduler's one-tick granularity.

use herald::animation::pan::{PanGesture, PanPhase};
use herald::config::{Config, EdgeConfig, PhysicsConfig};
use herald::domain::MessageId;
use herald::manager::Manager;
use herald::presentation::{DisplayDuration, Event, MessageConfig, PresentationStyle};
use herald::view::{
    Banner, HeadlessHost, Host, Point, Rectangle, RootResolver, Size, Vector,
};
use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

const TOLERANCE: Duration = Duration::from_millis(40);

fn screen() -> Rectangle {
    Rectangle::new(Point::ORIGIN, Size::new(375.0, 812.0))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (Manager, Arc<HeadlessHost>) {
    setup_with(Config::default())
}

fn setup_with(config: Config) -> (Manager, Arc<HeadlessHost>) {
    init_tracing();
    let host = Arc::new(HeadlessHost::new(screen()));
    let root: Arc<dyn Host> = host.clone();
    let manager = Manager::builder(Arc::new(RootResolver::new(&root)))
        .config(config)
        .build();
    (manager, host)
}

/// Collects lifecycle events with the time they were observed.
#[derive(Clone)]
struct Recorder {
    start: Instant,
    events: Arc<Mutex<Vec<(Duration, Event)>>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn attach(&self, config: MessageConfig) -> MessageConfig {
        let recorder = self.clone();
        config.on_event(move |event| {
            let at = recorder.start.elapsed();
            recorder.events.lock().unwrap().push((at, event.clone()));
        })
    }

    fn events(&self) -> Vec<(Duration, Event)> {
        self.events.lock().unwrap().clone()
    }

    fn kinds(&self) -> Vec<Event> {
        self.events().into_iter().map(|(_, event)| event).collect()
    }

    fn time_of(&self, wanted: &Event) -> Option<Duration> {
        self.events()
            .into_iter()
            .find(|(_, event)| event == wanted)
            .map(|(at, _)| at)
    }

    fn shown_order(&self) -> Vec<MessageId> {
        self.events()
            .into_iter()
            .filter_map(|(_, event)| match event {
                Event::WillShow(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

fn banner(id: &str) -> Arc<Banner> {
    Arc::new(Banner::new(60.0).with_id(id))
}

fn seconds(secs: f64) -> MessageConfig {
    MessageConfig::default().with_duration(DisplayDuration::Seconds(Duration::from_secs_f64(secs)))
}

fn close_to(actual: Duration, expected: Duration) -> bool {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    diff <= TOLERANCE
}

fn drag(phase: PanPhase, dy: f32, velocity: f32) -> PanGesture {
    PanGesture::new(
        phase,
        Point::new(180.0, 30.0 + dy),
        Vector::new(0.0, dy),
        Vector::new(0.0, velocity),
    )
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn banner1_event_timing() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    manager
        .show(recorder.attach(seconds(1.0)), banner("banner1"))
        .unwrap();

    sleep_ms(3_000).await;

    let id = MessageId::new("banner1");
    assert_eq!(
        recorder.kinds(),
        vec![
            Event::WillShow(id.clone()),
            Event::DidShow(id.clone()),
            Event::WillHide(id.clone()),
            Event::DidHide(id.clone()),
        ]
    );
    let will_show = recorder.time_of(&Event::WillShow(id.clone())).unwrap();
    let did_show = recorder.time_of(&Event::DidShow(id.clone())).unwrap();
    let will_hide = recorder.time_of(&Event::WillHide(id.clone())).unwrap();
    let did_hide = recorder.time_of(&Event::DidHide(id.clone())).unwrap();

    assert!(close_to(will_show, Duration::ZERO));
    // Show spring 0.4 s, then one second on screen, then a 0.2 s slide out.
    assert!(close_to(did_show, Duration::from_millis(400)));
    assert!(close_to(will_hide, Duration::from_millis(1_400)));
    assert!(close_to(did_hide, Duration::from_millis(1_600)));
    assert_eq!(manager.current_id().await.unwrap(), None);
    assert!(manager.is_idle().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn fifo_with_deduplication() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    for id in ["a", "b", "a", "c"] {
        manager
            .show(recorder.attach(seconds(0.3)), banner(id))
            .unwrap();
    }
    assert_eq!(manager.current_id().await.unwrap(), Some("a".into()));
    assert_eq!(
        manager.queued_ids().await.unwrap(),
        vec![MessageId::new("b"), MessageId::new("c")]
    );

    sleep_ms(6_000).await;

    assert_eq!(
        recorder.shown_order(),
        vec![MessageId::new("a"), MessageId::new("b"), MessageId::new("c")]
    );
}

#[tokio::test(start_paused = true)]
async fn duplicates_are_kept_when_allowed() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    for _ in 0..2 {
        manager
            .show(recorder.attach(seconds(0.3).allowing_duplicates()), banner("a"))
            .unwrap();
    }
    sleep_ms(4_000).await;
    assert_eq!(recorder.shown_order().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn at_most_one_message_on_screen() {
    let (manager, host) = setup();
    let visible = Arc::new(Mutex::new((0_i32, 0_i32)));
    for id in ["x", "y", "z"] {
        let visible = Arc::clone(&visible);
        let config = seconds(0.5).on_event(move |event| {
            let mut guard = visible.lock().unwrap();
            match event {
                Event::WillShow(_) => guard.0 += 1,
                Event::DidHide(_) => guard.0 -= 1,
                _ => {}
            }
            guard.1 = guard.1.max(guard.0);
        });
        manager.show(config, banner(id)).unwrap();
    }

    for _ in 0..120 {
        sleep_ms(50).await;
        assert!(host.attached_count() <= 1);
    }
    let (now, peak) = *visible.lock().unwrap();
    assert_eq!(now, 0);
    assert_eq!(peak, 1);
}

#[tokio::test(start_paused = true)]
async fn indefinite_floor_defers_early_hide() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Indefinite {
        delay: Duration::ZERO,
        minimum: Duration::from_secs(2),
    });
    manager.show(recorder.attach(config), banner("busy")).unwrap();

    sleep_ms(500).await;
    manager.hide().unwrap();
    sleep_ms(1_000).await;
    assert!(recorder.time_of(&Event::WillHide("busy".into())).is_none());

    sleep_ms(1_500).await;
    let will_hide = recorder.time_of(&Event::WillHide("busy".into())).unwrap();
    assert!(will_hide >= Duration::from_millis(2_000));
    assert!(close_to(will_hide, Duration::from_millis(2_000)));
}

#[tokio::test(start_paused = true)]
async fn indefinite_hide_after_floor_is_immediate() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Indefinite {
        delay: Duration::ZERO,
        minimum: Duration::from_secs(2),
    });
    manager.show(recorder.attach(config), banner("busy")).unwrap();

    sleep_ms(3_000).await;
    manager.hide().unwrap();
    sleep_ms(500).await;
    let will_hide = recorder.time_of(&Event::WillHide("busy".into())).unwrap();
    assert!(close_to(will_hide, Duration::from_millis(3_000)));
    assert!(recorder.time_of(&Event::DidHide("busy".into())).is_some());
}

#[tokio::test(start_paused = true)]
async fn drag_suspends_and_restarts_auto_hide() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    manager.show(recorder.attach(seconds(1.0)), banner("drag")).unwrap();

    // Shown at 0.4 s, auto-hide would fire at 1.4 s.
    sleep_ms(900).await;
    let overlay = host.overlays().pop().unwrap();
    overlay.pan(drag(PanPhase::Began, 0.0, 0.0));
    overlay.pan(drag(PanPhase::Changed, -5.0, -20.0));
    sleep_ms(100).await;
    overlay.pan(drag(PanPhase::Ended, -5.0, -20.0));

    // The spring back ends at 1.4 s; a fresh one second countdown follows.
    sleep_ms(700).await;
    assert!(recorder.time_of(&Event::WillHide("drag".into())).is_none());
    assert_eq!(manager.current_id().await.unwrap(), Some("drag".into()));

    sleep_ms(1_000).await;
    let will_hide = recorder.time_of(&Event::WillHide("drag".into())).unwrap();
    assert!(close_to(will_hide, Duration::from_millis(2_400)));
}

#[tokio::test(start_paused = true)]
async fn slow_drag_past_percent_threshold_dismisses() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Forever);
    manager.show(recorder.attach(config), banner("swipe")).unwrap();
    sleep_ms(500).await;

    // Travel is 55 pt, so 20 pt clears the percent threshold while staying
    // below the absolute and speed thresholds.
    let overlay = host.overlays().pop().unwrap();
    overlay.pan(drag(PanPhase::Began, 0.0, 0.0));
    overlay.pan(drag(PanPhase::Changed, -20.0, -10.0));
    overlay.pan(drag(PanPhase::Ended, -20.0, -10.0));
    sleep_ms(400).await;

    let will_hide = recorder.time_of(&Event::WillHide("swipe".into())).unwrap();
    assert!(close_to(will_hide, Duration::from_millis(500)));
    assert!(recorder.time_of(&Event::DidHide("swipe".into())).is_some());
}

#[tokio::test(start_paused = true)]
async fn interactive_dismissal_skips_floor() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Indefinite {
        delay: Duration::ZERO,
        minimum: Duration::from_secs(5),
    });
    manager.show(recorder.attach(config), banner("pinned")).unwrap();
    sleep_ms(500).await;

    let overlay = host.overlays().pop().unwrap();
    overlay.pan(drag(PanPhase::Changed, -10.0, -900.0));
    overlay.pan(drag(PanPhase::Ended, -10.0, -900.0));
    sleep_ms(300).await;

    assert!(recorder.time_of(&Event::DidHide("pinned".into())).is_some());
}

#[tokio::test(start_paused = true)]
async fn pause_between_messages() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    manager.show(recorder.attach(seconds(1.0)), banner("a")).unwrap();
    manager.show(recorder.attach(seconds(1.0)), banner("b")).unwrap();

    sleep_ms(4_000).await;

    let a_hidden = recorder.time_of(&Event::DidHide("a".into())).unwrap();
    let b_shown = recorder.time_of(&Event::WillShow("b".into())).unwrap();
    assert!(b_shown >= a_hidden + Duration::from_millis(500));
    assert!(close_to(b_shown, a_hidden + Duration::from_millis(500)));
}

#[tokio::test(start_paused = true)]
async fn hide_all_when_idle_is_a_no_op() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    manager.hide_all().unwrap();
    manager.remove_all().unwrap();
    sleep_ms(1_000).await;
    assert!(manager.is_idle().await.unwrap());
    assert_eq!(host.attached_count(), 0);

    manager.show(recorder.attach(seconds(0.2)), banner("once")).unwrap();
    sleep_ms(2_000).await;
    let settled = recorder.events().len();
    assert_eq!(settled, 4);

    manager.hide_all().unwrap();
    sleep_ms(1_000).await;
    assert_eq!(recorder.events().len(), settled);
}

#[tokio::test(start_paused = true)]
async fn hide_all_clears_queue_and_hides_current() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    for id in ["a", "b", "c"] {
        manager
            .show(recorder.attach(MessageConfig::default()), banner(id))
            .unwrap();
    }
    sleep_ms(100).await;
    manager.hide_all().unwrap();
    sleep_ms(2_000).await;

    assert_eq!(recorder.shown_order(), vec![MessageId::new("a")]);
    assert!(recorder.time_of(&Event::DidHide("a".into())).is_some());
    assert!(manager.is_idle().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn hide_id_dequeues_waiting_message() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    manager.show(recorder.attach(seconds(0.5)), banner("a")).unwrap();
    manager.show(recorder.attach(seconds(0.5)), banner("b")).unwrap();
    manager.hide_id("b").unwrap();
    assert!(manager.queued_ids().await.unwrap().is_empty());

    sleep_ms(3_000).await;
    assert_eq!(recorder.shown_order(), vec![MessageId::new("a")]);
}

#[tokio::test(start_paused = true)]
async fn hide_counted_waits_for_last_request() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Forever);
    for _ in 0..3 {
        manager
            .show(recorder.attach(config.clone()), banner("sync"))
            .unwrap();
    }
    sleep_ms(500).await;

    manager.hide_counted("sync").unwrap();
    manager.hide_counted("sync").unwrap();
    sleep_ms(500).await;
    assert!(recorder.time_of(&Event::WillHide("sync".into())).is_none());
    assert_eq!(manager.count("sync").await.unwrap(), 1);

    manager.hide_counted("sync").unwrap();
    sleep_ms(500).await;
    assert!(recorder.time_of(&Event::DidHide("sync".into())).is_some());
    assert_eq!(manager.count("sync").await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn message_without_container_is_dropped() {
    let manager = Manager::new(Arc::new(RootResolver::detached()));
    let recorder = Recorder::new();
    manager.show(recorder.attach(seconds(0.5)), banner("lost")).unwrap();
    sleep_ms(500).await;

    assert!(recorder.events().is_empty());
    assert_eq!(manager.current_id().await.unwrap(), None);
    assert_eq!(manager.count("lost").await.unwrap(), 0);

    // The queue keeps working after a failed show.
    manager.show(recorder.attach(seconds(0.5)), banner("next")).unwrap();
    sleep_ms(100).await;
    assert_eq!(manager.current_id().await.unwrap(), None);
    assert!(manager.is_idle().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn interactive_dim_tap_hides() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default()
        .with_duration(DisplayDuration::Forever)
        .with_dim(herald::presentation::DimMode::Gray { interactive: true });
    manager.show(recorder.attach(config), banner("modal")).unwrap();
    sleep_ms(500).await;

    let overlay = host.overlays().pop().unwrap();
    assert!(!overlay.passes_touches_through());
    overlay.tap();
    sleep_ms(500).await;
    assert!(recorder.time_of(&Event::DidHide("modal".into())).is_some());
    assert_eq!(host.attached_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn hide_before_show_completes_skips_did_show() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    manager
        .show(recorder.attach(MessageConfig::default()), banner("early"))
        .unwrap();
    sleep_ms(100).await;
    manager.hide().unwrap();
    sleep_ms(1_000).await;

    let id = MessageId::new("early");
    assert_eq!(
        recorder.kinds(),
        vec![
            Event::WillShow(id.clone()),
            Event::WillHide(id.clone()),
            Event::DidHide(id),
        ]
    );
    assert!(manager.is_idle().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn unreachable_floor_keeps_queue_running() {
    let (manager, host) = setup();
    let recorder = Recorder::new();
    let config = MessageConfig::default().with_duration(DisplayDuration::Indefinite {
        delay: Duration::ZERO,
        minimum: Duration::MAX,
    });
    manager.show(recorder.attach(config), banner("forever")).unwrap();
    sleep_ms(500).await;

    manager.hide().unwrap();
    sleep_ms(500).await;
    assert!(!manager.is_idle().await.unwrap());
    assert_eq!(manager.current_id().await.unwrap(), Some("forever".into()));
    assert!(recorder.time_of(&Event::WillHide("forever".into())).is_none());

    // Dragging it away still works, and the next message follows.
    manager.show(recorder.attach(seconds(0.5)), banner("next")).unwrap();
    let overlay = host.overlays().pop().unwrap();
    overlay.pan(drag(PanPhase::Changed, -10.0, -900.0));
    overlay.pan(drag(PanPhase::Ended, -10.0, -900.0));
    sleep_ms(1_000).await;
    assert!(recorder.time_of(&Event::DidHide("forever".into())).is_some());
    assert!(recorder.time_of(&Event::WillShow("next".into())).is_some());
}

#[tokio::test(start_paused = true)]
async fn same_id_can_return_while_sliding_out() {
    let (manager, _host) = setup();
    let recorder = Recorder::new();
    manager.show(recorder.attach(seconds(0.3)), banner("again")).unwrap();

    // Shown at 0.4 s, slides out between 0.7 s and 0.9 s.
    sleep_ms(800).await;
    manager.show(recorder.attach(seconds(0.3)), banner("again")).unwrap();
    assert_eq!(manager.queued_ids().await.unwrap(), vec![MessageId::new("again")]);

    sleep_ms(3_000).await;
    assert_eq!(
        recorder.shown_order(),
        vec![MessageId::new("again"), MessageId::new("again")]
    );
}

#[tokio::test(start_paused = true)]
async fn center_fling_hides_once_and_promotes_next() {
    // A long grace delay lets the off-screen check hide first, so the
    // delayed hide request arrives as a duplicate.
    let config = Config {
        physics: PhysicsConfig {
            hide_delay_secs: Some(1.0),
            ..PhysicsConfig::default()
        },
        ..Config::default()
    };
    let (manager, host) = setup_with(config);
    let recorder = Recorder::new();
    let center = MessageConfig::default()
        .with_style(PresentationStyle::Center)
        .with_duration(DisplayDuration::Forever);
    manager.show(recorder.attach(center.clone()), banner("c1")).unwrap();
    manager.show(recorder.attach(center), banner("c2")).unwrap();
    sleep_ms(600).await;
    assert!(recorder.time_of(&Event::DidShow("c1".into())).is_some());

    let overlay = host.overlays().pop().unwrap();
    let grab = overlay.frame().center();
    overlay.pan(PanGesture::new(
        PanPhase::Began,
        grab,
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 0.0),
    ));
    overlay.pan(PanGesture::new(
        PanPhase::Ended,
        grab,
        Vector::new(0.0, 0.0),
        Vector::new(0.0, 2_400.0),
    ));
    sleep_ms(3_000).await;

    let c1 = MessageId::new("c1");
    let c1_events: Vec<Event> = recorder
        .kinds()
        .into_iter()
        .filter(|event| event.id() == &c1)
        .collect();
    assert_eq!(
        c1_events,
        vec![
            Event::WillShow(c1.clone()),
            Event::DidShow(c1.clone()),
            Event::WillHide(c1.clone()),
            Event::DidHide(c1),
        ]
    );
    assert!(recorder.time_of(&Event::DidShow("c2".into())).is_some());
    assert_eq!(manager.current_id().await.unwrap(), Some("c2".into()));
    assert_eq!(host.attached_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_show_each_id_once() {
    let config = Config {
        pause_between_messages_secs: Some(0.0),
        edge: EdgeConfig {
            show_duration_secs: Some(0.3),
            hide_duration_secs: Some(0.02),
            ..EdgeConfig::default()
        },
        ..Config::default()
    };
    let (manager, host) = setup_with(config);
    let recorder = Recorder::new();
    let ids = ["p", "q", "r", "s", "t"];

    let producers = 4;
    let barrier = Arc::new(Barrier::new(producers));
    let threads: Vec<_> = (0..producers)
        .map(|offset| {
            let manager = manager.clone();
            let recorder = recorder.clone();
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                for step in 0..ids.len() {
                    let id = ids[(offset + step) % ids.len()];
                    manager
                        .show(recorder.attach(seconds(0.05)), banner(id))
                        .unwrap();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    let finished = tokio::time::timeout(Duration::from_secs(20), async {
        loop {
            assert!(host.attached_count() <= 1);
            if manager.is_idle().await.unwrap() {
                break;
            }
            sleep_ms(5).await;
        }
    })
    .await;
    assert!(finished.is_ok(), "queue did not drain");

    let mut shown: HashMap<MessageId, usize> = HashMap::new();
    for id in recorder.shown_order() {
        *shown.entry(id).or_insert(0) += 1;
    }
    assert_eq!(shown.len(), ids.len());
    assert!(shown.values().all(|&times| times == 1));
    assert_eq!(host.attached_count(), 0);
}
