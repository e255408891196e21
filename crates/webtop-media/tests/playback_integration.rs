//! Integration tests for the playback controller against a scripted resource

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use webtop_media::{
    AudioOperation, MediaError, MediaKind, MediaResource, OperationQueue, PageEvent,
    PageLifecycle, PersistedSession, PlaybackConfig, PlaybackController, ResourceEvent,
    ResourceFuture, Scheduler, SyncState, Track,
};
use webtop_store::{load_json, save_json, MemoryStore};

struct PoolScheduler {
    spawner: LocalSpawner,
}

impl Scheduler for PoolScheduler {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).unwrap();
    }

    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

/// Resource that records calls and tracks the state a real element would
struct ScriptedResource {
    calls: RefCell<Vec<String>>,
    source: RefCell<Option<String>>,
    time: Cell<f64>,
    paused: Cell<bool>,
    ready: Cell<bool>,
    reject_play: Cell<bool>,
    load_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl ScriptedResource {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            source: RefCell::new(None),
            time: Cell::new(0.0),
            paused: Cell::new(true),
            ready: Cell::new(true),
            reject_play: Cell::new(false),
            load_gate: RefCell::new(None),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

fn ok() -> ResourceFuture<'static> {
    future::ready(Ok(())).boxed_local()
}

impl MediaResource for ScriptedResource {
    fn play(&self) -> ResourceFuture<'_> {
        self.record("play");
        if self.reject_play.get() {
            return future::ready(Err(MediaError::PlaybackRejected(
                "NotAllowedError".to_string(),
            )))
            .boxed_local();
        }
        self.paused.set(false);
        ok()
    }

    fn pause(&self) -> ResourceFuture<'_> {
        self.record("pause");
        self.paused.set(true);
        ok()
    }

    fn load(&self) -> ResourceFuture<'_> {
        self.record("load");
        let gate = self.load_gate.borrow_mut().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.record("load:done");
            Ok(())
        }
        .boxed_local()
    }

    fn set_source(&self, url: String) -> ResourceFuture<'_> {
        self.record(format!("source:{url}"));
        *self.source.borrow_mut() = Some(url);
        self.time.set(0.0);
        self.paused.set(true);
        ok()
    }

    fn seek_to(&self, secs: f64) -> ResourceFuture<'_> {
        self.record(format!("seek:{secs}"));
        self.time.set(secs);
        ok()
    }

    fn set_volume(&self, volume: f64) -> ResourceFuture<'_> {
        self.record(format!("volume:{volume}"));
        ok()
    }

    fn release(&self) -> ResourceFuture<'_> {
        self.record("release");
        self.source.borrow_mut().take();
        self.paused.set(true);
        ok()
    }

    fn current_source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

struct Harness {
    pool: LocalPool,
    resource: Rc<ScriptedResource>,
    store: Rc<MemoryStore>,
    bus: PageLifecycle,
    controller: Rc<PlaybackController>,
}

impl Harness {
    fn new() -> Self {
        Self::with_store(Rc::new(MemoryStore::new()))
    }

    fn with_store(store: Rc<MemoryStore>) -> Self {
        Self::build(store, Rc::new(ScriptedResource::new()))
    }

    fn build(store: Rc<MemoryStore>, resource: Rc<ScriptedResource>) -> Self {
        let pool = LocalPool::new();
        let scheduler = Rc::new(PoolScheduler {
            spawner: pool.spawner(),
        });
        let controller = PlaybackController::new(
            MediaKind::Music,
            resource.clone(),
            scheduler,
            store.clone(),
            PlaybackConfig::default(),
        );
        let bus = PageLifecycle::new();
        controller.attach_lifecycle(&bus);
        Self {
            pool,
            resource,
            store,
            bus,
            controller,
        }
    }

    fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Settle pending work, mount, and let reconciliation finish
    fn mount(&mut self) {
        self.run();
        self.controller.mount();
        self.run();
        assert_eq!(self.controller.sync_state(), SyncState::Listening);
    }

    fn persisted(&self) -> PersistedSession {
        load_json(self.store.as_ref(), MediaKind::Music.storage_key()).unwrap()
    }
}

fn seed(store: &MemoryStore, urls: &[&str], index: usize, playing: bool, position: f64) {
    let session = PersistedSession {
        queue: urls
            .iter()
            .enumerate()
            .map(|(i, url)| Track::new(*url, format!("Track {i}"), i as u64))
            .collect(),
        current_index: index,
        is_playing: playing,
        position_secs: position,
        volume: 0.7,
        muted_volume: None,
    };
    save_json(store, MediaKind::Music.storage_key(), &session).unwrap();
}

#[test]
fn test_queue_is_fifo_even_when_play_arrives_mid_drain() {
    let mut pool = LocalPool::new();
    let resource = Rc::new(ScriptedResource::new());
    let queue = OperationQueue::new(
        resource.clone(),
        Rc::new(PoolScheduler {
            spawner: pool.spawner(),
        }),
        Duration::from_millis(50),
    );
    let (release_load, gate) = oneshot::channel();
    *resource.load_gate.borrow_mut() = Some(gate);

    queue.enqueue_all([
        AudioOperation::SetSource("a.mp3".to_string()),
        AudioOperation::Load,
        AudioOperation::Play,
        AudioOperation::SetPosition(30.0),
    ]);
    pool.run_until_stalled();
    assert_eq!(resource.take_calls(), vec!["source:a.mp3", "load"]);

    // A second caller asks to play while the load is still in flight
    queue.enqueue(AudioOperation::Play);
    pool.run_until_stalled();
    assert!(resource.take_calls().is_empty());

    release_load.send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(
        resource.take_calls(),
        vec!["load:done", "play", "seek:30", "play"]
    );
    assert_eq!(queue.completed(), 5);
    assert!(!queue.is_draining());
}

#[test]
fn test_next_and_previous_wrap_around() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3", "b.mp3", "c.mp3"], 2, false, 0.0);
    let mut h = Harness::with_store(store);
    h.mount();

    h.controller.next();
    assert_eq!(h.controller.session().current_index, 0);
    h.controller.previous();
    assert_eq!(h.controller.session().current_index, 2);

    h.run();
    let calls = h.resource.take_calls();
    assert!(calls.contains(&"source:c.mp3".to_string()));
    assert!(!calls.contains(&"play".to_string()));
}

#[test]
fn test_next_is_a_no_op_with_one_track() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3"], 0, false, 12.0);
    let mut h = Harness::with_store(store);
    h.mount();
    h.resource.take_calls();

    h.controller.next();
    h.controller.previous();
    h.run();

    let session = h.controller.session();
    assert_eq!(session.current_index, 0);
    assert_eq!(session.position_secs, 12.0);
    assert!(h.resource.take_calls().is_empty());
}

#[test]
fn test_unmount_keeps_playing_until_the_page_unloads() {
    let mut h = Harness::new();
    h.controller.add_track("a.mp3", "A");
    h.controller.toggle_play_pause();
    h.mount();
    assert!(!h.resource.is_paused());
    h.resource.take_calls();

    h.controller.unmount();
    h.bus.emit(PageEvent::Hidden);
    h.bus.emit(PageEvent::PageHide { persisted: true });
    h.run();

    assert!(h.resource.take_calls().is_empty());
    assert!(h.controller.session().is_playing);
    assert!(!h.controller.session().is_window_open);

    h.bus.emit(PageEvent::BeforeUnload);
    h.run();
    assert_eq!(h.resource.take_calls(), vec!["pause", "release"]);
    assert_eq!(h.controller.sync_state(), SyncState::Unloading);

    // Nothing reaches the resource once unloading
    h.controller.toggle_play_pause();
    h.controller.handle_event(ResourceEvent::Ended);
    h.run();
    assert!(h.resource.take_calls().is_empty());
}

#[test]
fn test_ended_advances_and_keeps_playing() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["track-a.mp3", "track-b.mp3"], 0, true, 195.0);
    let mut h = Harness::with_store(store);
    h.mount();
    assert_eq!(
        h.resource.take_calls(),
        vec![
            "source:track-a.mp3",
            "load",
            "load:done",
            "volume:0.7",
            "seek:195",
            "play",
        ]
    );
    h.controller.handle_event(ResourceEvent::Duration(200.0));

    // The element reports pause right before ended
    h.controller.handle_event(ResourceEvent::Pause);
    h.controller.handle_event(ResourceEvent::Ended);

    let session = h.controller.session();
    assert_eq!(session.current_index, 1);
    assert_eq!(session.position_secs, 0.0);
    assert!(session.is_playing);

    h.run();
    assert_eq!(
        h.resource.take_calls(),
        vec!["source:track-b.mp3", "load", "load:done", "play"]
    );
    assert_eq!(h.persisted().current_index, 1);
}

#[test]
fn test_ended_on_last_track_wraps_to_first() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3", "b.mp3"], 1, true, 0.0);
    let mut h = Harness::with_store(store);
    h.mount();

    h.controller.handle_event(ResourceEvent::Ended);
    assert_eq!(h.controller.session().current_index, 0);
}

#[test]
fn test_reconciliation_ignores_its_own_events() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3"], 0, true, 0.0);
    let mut h = Harness::with_store(store);

    h.controller.mount();
    assert_eq!(h.controller.sync_state(), SyncState::Reconciling);
    h.controller.handle_event(ResourceEvent::Pause);
    assert!(h.controller.session().is_playing);

    h.run();
    assert_eq!(h.controller.sync_state(), SyncState::Listening);
    h.controller.handle_event(ResourceEvent::Pause);
    assert!(!h.controller.session().is_playing);
}

#[test]
fn test_remount_over_background_playback_does_not_reload() {
    let mut h = Harness::new();
    h.controller.add_track("a.mp3", "A");
    h.controller.toggle_play_pause();
    h.mount();
    h.controller.unmount();

    // Playback moved on in the background
    h.resource.time.set(0.5);
    h.resource.take_calls();
    h.mount();

    assert_eq!(h.resource.take_calls(), vec!["volume:0.7"]);
}

#[test]
fn test_mount_waits_for_ready_resource() {
    let resource = Rc::new(ScriptedResource::new());
    resource.ready.set(false);
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3"], 0, false, 0.0);
    let mut h = Harness::build(store, resource);

    h.controller.mount();
    h.run();
    assert_eq!(h.controller.sync_state(), SyncState::AwaitingReady);
    assert!(h.resource.take_calls().is_empty());

    h.resource.ready.set(true);
    h.controller.handle_event(ResourceEvent::Ready);
    h.run();
    assert_eq!(h.controller.sync_state(), SyncState::Listening);
    assert_eq!(h.resource.current_source().as_deref(), Some("a.mp3"));
}

#[test]
fn test_duplicate_sources_are_merged_once() {
    let h = Harness::new();

    assert!(h.controller.add_track("https://www.youtube.com/watch?v=abc123", "Song"));
    assert!(!h.controller.add_track("https://youtu.be/abc123", "Song (short link)"));
    let added = h.controller.merge_remote([
        Track::new("https://www.youtube.com/embed/abc123", "Song (embed)", 0),
        Track::new("https://youtu.be/xyz789", "Other", 0),
    ]);

    assert_eq!(added, 1);
    let session = h.controller.session();
    assert_eq!(session.len(), 2);
    assert_ne!(session.queue[0].sequence_id, session.queue[1].sequence_id);
    assert_eq!(h.persisted().queue.len(), 2);
}

#[test]
fn test_rejected_play_marks_session_paused() {
    let mut h = Harness::new();
    h.resource.reject_play.set(true);
    h.controller.add_track("a.mp3", "A");

    h.controller.toggle_play_pause();
    assert!(h.controller.session().is_playing);
    h.run();

    assert!(!h.controller.session().is_playing);
    assert!(!h.persisted().is_playing);
    assert_eq!(h.controller.queue().failed(), 1);
}

#[test]
fn test_resource_error_reloads_once() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["broken.mp3"], 0, true, 0.0);
    let mut h = Harness::with_store(store);
    h.mount();
    h.resource.take_calls();

    h.controller.handle_event(ResourceEvent::Error("decode failed".to_string()));
    assert!(!h.controller.session().is_playing);
    h.run();
    assert_eq!(
        h.resource.take_calls(),
        vec!["release", "source:broken.mp3", "load", "load:done"]
    );

    h.controller.handle_event(ResourceEvent::Error("decode failed".to_string()));
    h.run();
    assert_eq!(h.resource.take_calls(), vec!["release"]);
}

#[test]
fn test_tick_samples_position_while_playing() {
    let mut h = Harness::new();
    h.controller.add_track("a.mp3", "A");
    h.controller.toggle_play_pause();
    h.mount();

    h.resource.time.set(50.0);
    h.controller.tick(0.0);
    assert_eq!(h.controller.session().position_secs, 50.0);

    // Within the drift threshold
    h.resource.time.set(50.5);
    h.controller.tick(6_000.0);
    assert_eq!(h.controller.session().position_secs, 50.0);

    // Not due yet
    h.resource.time.set(60.0);
    h.controller.tick(7_000.0);
    assert_eq!(h.controller.session().position_secs, 50.0);

    h.controller.tick(11_000.0);
    assert_eq!(h.controller.session().position_secs, 60.0);
    assert_eq!(h.persisted().position_secs, 60.0);
}

#[test]
fn test_progress_events_share_the_sample_interval() {
    let mut h = Harness::new();
    h.controller.add_track("a.mp3", "A");
    h.controller.toggle_play_pause();
    h.mount();

    for (secs, now_ms) in [(1.2, 0.0), (2.4, 1_200.0), (3.6, 2_400.0), (4.8, 3_600.0)] {
        h.controller.handle_event(ResourceEvent::Progress { secs, now_ms });
    }
    assert_eq!(h.controller.session().position_secs, 1.2);
    assert_eq!(h.persisted().position_secs, 1.2);

    h.controller.handle_event(ResourceEvent::Pause);
    h.controller.handle_event(ResourceEvent::Progress {
        secs: 30.0,
        now_ms: 20_000.0,
    });
    let persisted = h.persisted();
    assert!(!persisted.is_playing);
    assert_eq!(persisted.position_secs, 1.2);
}

#[test]
fn test_hidden_page_flushes_position() {
    let mut h = Harness::new();
    h.controller.add_track("a.mp3", "A");
    h.controller.toggle_play_pause();
    h.mount();

    h.resource.time.set(42.0);
    h.bus.emit(PageEvent::Hidden);

    assert_eq!(h.persisted().position_secs, 42.0);
    assert!(!h.resource.is_paused());
}

#[test]
fn test_session_survives_reload() {
    let store = Rc::new(MemoryStore::new());
    {
        let mut h = Harness::with_store(store.clone());
        h.controller.add_track("a.mp3", "A");
        h.controller.add_track("b.mp3", "B");
        h.controller.set_volume(0.3);
        h.controller.toggle_mute();
        h.controller.select_track(1).unwrap();
        h.run();
    }

    let h = Harness::with_store(store);
    let session = h.controller.session();
    assert_eq!(session.len(), 2);
    assert_eq!(session.current_index, 1);
    assert_eq!(session.volume, 0.0);
    assert!(session.is_muted());

    h.controller.toggle_mute();
    assert_eq!(h.controller.session().volume, 0.3);
}

#[test]
fn test_removing_current_track_loads_the_next() {
    let store = Rc::new(MemoryStore::new());
    seed(&store, &["a.mp3", "b.mp3"], 0, true, 20.0);
    let mut h = Harness::with_store(store);
    h.mount();
    h.resource.take_calls();

    let removed = h.controller.remove_track(0).unwrap();
    assert_eq!(removed.source_url, "a.mp3");
    h.run();
    assert_eq!(
        h.resource.take_calls(),
        vec!["source:b.mp3", "load", "load:done", "play"]
    );

    h.controller.remove_track(0).unwrap();
    h.run();
    assert_eq!(h.resource.take_calls(), vec!["pause", "release"]);
    assert!(!h.controller.session().is_playing);
    assert!(matches!(
        h.controller.remove_track(0),
        Err(MediaError::TrackOutOfRange { index: 0, len: 0 })
    ));
}
