//! Playback controller
//!
//! Owns the session for one media kind and is the only path to its
//! resource. UI intents update the session optimistically and enqueue
//! commands; confirmed resource events flow back into the session; page
//! lifecycle events flush position and, on a real unload, stop playback.
//!
//! Unmounting the panel never pauses: audio keeps playing in the
//! background and the next mount reconciles against whatever the resource
//! is doing by then.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::FutureExt;
use tracing::{debug, info, warn};
use webtop_store::{load_json, save_json, LocalStore};

use crate::config::{MediaKind, PlaybackConfig};
use crate::error::{MediaError, MediaResult};
use crate::lifecycle::{PageEvent, PageLifecycle, Subscription};
use crate::operation::AudioOperation;
use crate::queue::{OperationQueue, Scheduler};
use crate::resource::{MediaResource, ResourceEvent};
use crate::sampler::PositionSampler;
use crate::session::{PersistedSession, PlaybackSession};
use crate::sync::{plan_reconciliation, ActualPlayback, DesiredPlayback, SyncState};
use crate::track::Track;

/// Controller for one media kind. Construct once and share the `Rc`.
pub struct PlaybackController {
    kind: MediaKind,
    config: PlaybackConfig,
    resource: Rc<dyn MediaResource>,
    scheduler: Rc<dyn Scheduler>,
    store: Rc<dyn LocalStore>,
    queue: OperationQueue,
    session: RefCell<PlaybackSession>,
    state: Cell<SyncState>,
    sampler: RefCell<PositionSampler>,
    /// Source of the last enqueued `SetSource`, until the resource catches up
    requested_source: RefCell<Option<String>>,
    /// Source that already failed once; it is not reloaded again
    failed_source: RefCell<Option<String>>,
    /// Bumped per reconciliation so a stale completion can't end a newer one
    generation: Cell<u64>,
    lifecycle: RefCell<Option<Subscription>>,
    me: Weak<PlaybackController>,
}

impl PlaybackController {
    /// Create a controller, restoring its session from `store`
    pub fn new(
        kind: MediaKind,
        resource: Rc<dyn MediaResource>,
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn LocalStore>,
        config: PlaybackConfig,
    ) -> Rc<Self> {
        let session = load_json::<PersistedSession>(store.as_ref(), kind.storage_key())
            .map(PlaybackSession::from_persisted)
            .unwrap_or_else(|| PlaybackSession::new(config.default_volume));
        let queue = OperationQueue::new(
            Rc::clone(&resource),
            Rc::clone(&scheduler),
            config.settle_delay,
        );
        let sampler = PositionSampler::new(config.sample_interval_ms);

        Rc::new_cyclic(|me: &Weak<Self>| {
            let target = me.clone();
            queue.set_failure_hook(move |operation, err| {
                if let Some(controller) = target.upgrade() {
                    controller.on_operation_failed(operation, err);
                }
            });

            Self {
                kind,
                config,
                resource,
                scheduler,
                store,
                queue,
                session: RefCell::new(session),
                state: Cell::new(SyncState::AwaitingReady),
                sampler: RefCell::new(sampler),
                requested_source: RefCell::new(None),
                failed_source: RefCell::new(None),
                generation: Cell::new(0),
                lifecycle: RefCell::new(None),
                me: me.clone(),
            }
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Copy of the current session
    pub fn session(&self) -> PlaybackSession {
        self.session.borrow().clone()
    }

    pub fn sync_state(&self) -> SyncState {
        self.state.get()
    }

    pub fn queue(&self) -> &OperationQueue {
        &self.queue
    }

    /// Follow page lifecycle events from `bus`
    pub fn attach_lifecycle(&self, bus: &PageLifecycle) {
        let target = self.me.clone();
        let subscription = bus.subscribe(move |event| {
            if let Some(controller) = target.upgrade() {
                controller.handle_page_event(event);
            }
        });
        *self.lifecycle.borrow_mut() = Some(subscription);
    }

    // =========================================================================
    // Mount / unmount
    // =========================================================================

    /// The controlling panel mounted. Reconciles once the resource is ready.
    pub fn mount(&self) {
        if self.state.get().is_unloading() {
            return;
        }
        self.session.borrow_mut().is_window_open = true;
        if self.resource.is_ready() {
            self.reconcile();
        } else {
            debug!(kind = ?self.kind, "mounted; waiting for resource");
            self.state.set(SyncState::AwaitingReady);
        }
    }

    /// The controlling panel unmounted. Playback continues.
    pub fn unmount(&self) {
        self.session.borrow_mut().is_window_open = false;
        self.flush_position();
    }

    /// Enter `Reconciling`. The plan is computed once commands already in
    /// flight have drained, so it compares against the resource's settled state.
    fn reconcile(&self) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(SyncState::Reconciling);

        let settled = self.queue.idle();
        let target = self.me.clone();
        self.scheduler.spawn_local(
            async move {
                settled.await;
                let done = match target.upgrade() {
                    Some(controller) if controller.is_current(generation) => {
                        controller.enqueue_plan()
                    }
                    _ => return,
                };
                done.await;
                if let Some(controller) = target.upgrade() {
                    controller.finish_reconcile(generation);
                }
            }
            .boxed_local(),
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation && self.state.get() == SyncState::Reconciling
    }

    /// Enqueue the reconciliation plan; resolves once it has run
    fn enqueue_plan(&self) -> impl std::future::Future<Output = ()> + 'static {
        let ops = {
            let session = self.session.borrow();
            plan_reconciliation(
                &DesiredPlayback::from_session(&session),
                &ActualPlayback::from_resource(self.resource.as_ref()),
                &self.config,
            )
        };
        debug!(kind = ?self.kind, ops = ops.len(), "reconciling");
        self.enqueue(ops);
        self.queue.idle()
    }

    fn finish_reconcile(&self, generation: u64) {
        if self.is_current(generation) {
            debug!(kind = ?self.kind, "reconciled; listening");
            self.state.set(SyncState::Listening);
        }
    }

    // =========================================================================
    // Intents
    // =========================================================================

    pub fn toggle_play_pause(&self) {
        let ops = self.edit(|session, this| {
            if session.is_empty() {
                return Vec::new();
            }
            session.is_playing = !session.is_playing;
            if session.is_playing {
                let mut ops = this.source_ops(session);
                ops.push(AudioOperation::Play);
                ops
            } else {
                vec![AudioOperation::Pause]
            }
        });
        self.enqueue(ops);
    }

    /// Next track, wrapping. No-op with one track or fewer.
    pub fn next(&self) {
        let ops = self.edit(|session, this| match session.next_index() {
            Some(index) if session.select(index).is_ok() => this.load_current_ops(session),
            _ => Vec::new(),
        });
        self.enqueue(ops);
    }

    /// Previous track, wrapping. No-op with one track or fewer.
    pub fn previous(&self) {
        let ops = self.edit(|session, this| match session.previous_index() {
            Some(index) if session.select(index).is_ok() => this.load_current_ops(session),
            _ => Vec::new(),
        });
        self.enqueue(ops);
    }

    /// Play the track at `index` from the start
    pub fn select_track(&self, index: usize) -> MediaResult<()> {
        let ops = self.try_edit(|session, this| {
            session.select(index)?;
            session.is_playing = true;
            Ok(this.load_current_ops(session))
        })?;
        self.enqueue(ops);
        Ok(())
    }

    /// Set the volume (clamped to `[0, 1]`), clearing any mute
    pub fn set_volume(&self, volume: f64) {
        let ops = self.edit(|session, _| {
            session.set_volume(volume);
            vec![AudioOperation::SetVolume(session.volume)]
        });
        self.enqueue(ops);
    }

    /// Mute, or restore the volume from before muting
    pub fn toggle_mute(&self) {
        let ops = self.edit(|session, _| {
            session.toggle_mute();
            vec![AudioOperation::SetVolume(session.volume)]
        });
        self.enqueue(ops);
    }

    /// Seek within the current track (clamped to its duration)
    pub fn seek(&self, secs: f64) {
        let ops = self.edit(|session, _| {
            if session.is_empty() || !secs.is_finite() {
                return Vec::new();
            }
            session.set_position(secs);
            vec![AudioOperation::SetPosition(session.position_secs)]
        });
        self.enqueue(ops);
    }

    /// Queue a track unless its source id is already present
    pub fn add_track(&self, source_url: impl Into<String>, title: impl Into<String>) -> bool {
        let mut added = false;
        self.edit(|session, _| {
            added = session.add_track(source_url, title);
            Vec::new()
        });
        added
    }

    /// Merge tracks from the remote playlist, deduplicating by source id
    pub fn merge_remote<I>(&self, tracks: I) -> usize
    where
        I: IntoIterator<Item = Track>,
    {
        let mut added = 0;
        self.edit(|session, _| {
            added = session.merge_remote(tracks);
            Vec::new()
        });
        added
    }

    /// Remove a track. Removing the current track loads its successor;
    /// emptying the queue stops playback.
    pub fn remove_track(&self, index: usize) -> MediaResult<Track> {
        let mut removed = None;
        let ops = self.try_edit(|session, this| {
            let was_current = index == session.current_index;
            removed = Some(session.remove_track(index)?);
            Ok(if session.is_empty() {
                vec![AudioOperation::Pause, AudioOperation::Release]
            } else if was_current {
                this.load_current_ops(session)
            } else {
                Vec::new()
            })
        })?;
        self.enqueue(ops);
        removed.ok_or_else(|| MediaError::TrackOutOfRange {
            index,
            len: self.session.borrow().len(),
        })
    }

    // =========================================================================
    // Resource events
    // =========================================================================

    /// Apply an event reported by the resource
    pub fn handle_event(&self, event: ResourceEvent) {
        let state = self.state.get();
        if state.is_unloading() {
            return;
        }

        match &event {
            ResourceEvent::Ready | ResourceEvent::CanPlay => {
                if matches!(event, ResourceEvent::CanPlay) {
                    self.failed_source.borrow_mut().take();
                }
                if state == SyncState::AwaitingReady && self.session.borrow().is_window_open {
                    self.reconcile();
                }
            }
            ResourceEvent::Error(message) => self.on_resource_error(message),
            ResourceEvent::Duration(secs) => {
                self.session.borrow_mut().set_duration(*secs);
                self.persist();
            }
            _ if state.ignores_events() => {
                debug!(kind = ?self.kind, ?event, ?state, "ignoring resource event");
            }
            ResourceEvent::Play => {
                self.failed_source.borrow_mut().take();
                self.set_playing(true);
            }
            ResourceEvent::Pause => self.set_playing(false),
            ResourceEvent::Ended => {
                let ops = self.edit(|session, this| {
                    if session.is_empty() {
                        return Vec::new();
                    }
                    session.advance();
                    session.is_playing = true;
                    this.load_current_ops(session)
                });
                self.enqueue(ops);
            }
            ResourceEvent::Progress { secs, now_ms } => self.sample_if_due(*now_ms, || *secs),
        }
    }

    fn on_resource_error(&self, message: &str) {
        warn!(kind = ?self.kind, error = message, "resource error; resetting");
        let ops = self.edit(|session, this| {
            session.is_playing = false;
            let mut ops = vec![AudioOperation::Release];
            this.requested_source.borrow_mut().take();

            // Reload once; a source that keeps failing stays cleared
            if let Some(track) = session.current_track() {
                let mut failed = this.failed_source.borrow_mut();
                if failed.as_deref() != Some(track.source_url.as_str()) {
                    *failed = Some(track.source_url.clone());
                    ops.push(AudioOperation::SetSource(track.source_url.clone()));
                    ops.push(AudioOperation::Load);
                }
            }
            ops
        });
        self.enqueue(ops);
    }

    fn on_operation_failed(&self, operation: &AudioOperation, err: &MediaError) {
        match operation {
            AudioOperation::Play => {
                info!(kind = ?self.kind, %err, "playback rejected; marking paused");
                self.set_playing(false);
            }
            AudioOperation::SetSource(url) => {
                let mut requested = self.requested_source.borrow_mut();
                if requested.as_deref() == Some(url.as_str()) {
                    *requested = None;
                }
            }
            _ => {}
        }
    }

    fn set_playing(&self, playing: bool) {
        let changed = {
            let mut session = self.session.borrow_mut();
            let changed = session.is_playing != playing;
            session.is_playing = playing;
            changed
        };
        if changed {
            self.persist();
        }
    }

    // =========================================================================
    // Position sampling and page lifecycle
    // =========================================================================

    /// Timer hook. Samples the resource position at most once per
    /// sample interval, and only while playing.
    pub fn tick(&self, now_ms: f64) {
        self.sample_if_due(now_ms, || self.resource.current_time());
    }

    fn sample_if_due(&self, now_ms: f64, position: impl FnOnce() -> f64) {
        if self.state.get() != SyncState::Listening {
            return;
        }
        let due = {
            let mut sampler = self.sampler.borrow_mut();
            if !self.session.borrow().is_playing {
                sampler.reset();
                return;
            }
            sampler.tick(now_ms)
        };
        if due {
            self.apply_sample(position());
        }
    }

    /// Update the session position if the resource drifted past the threshold
    fn apply_sample(&self, secs: f64) {
        if !secs.is_finite() || !self.resource_matches_session() {
            return;
        }
        let changed = {
            let mut session = self.session.borrow_mut();
            if (session.position_secs - secs).abs() > self.config.drift_threshold_secs {
                session.set_position(secs);
                true
            } else {
                false
            }
        };
        if changed {
            self.persist();
        }
    }

    /// Write the resource position into the session and persist it
    pub fn flush_position(&self) {
        if self.resource_matches_session() {
            let secs = self.resource.current_time();
            if secs.is_finite() {
                self.session.borrow_mut().set_position(secs);
            }
        }
        self.persist();
    }

    /// Apply a page lifecycle event
    pub fn handle_page_event(&self, event: PageEvent) {
        if self.state.get().is_unloading() {
            return;
        }
        match event {
            PageEvent::Visible => self.sampler.borrow_mut().reset(),
            event if event.is_unload() => {
                self.flush_position();
                info!(kind = ?self.kind, "page unloading; releasing resource");
                self.state.set(SyncState::Unloading);
                self.enqueue(vec![AudioOperation::Pause, AudioOperation::Release]);
            }
            _ => self.flush_position(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn resource_matches_session(&self) -> bool {
        let session = self.session.borrow();
        match session.current_track() {
            Some(track) => {
                self.resource.current_source().as_deref() == Some(track.source_url.as_str())
            }
            None => false,
        }
    }

    /// Load the current track, then play if the session is playing
    fn load_current_ops(&self, session: &PlaybackSession) -> Vec<AudioOperation> {
        let Some(track) = session.current_track() else {
            return vec![AudioOperation::Pause];
        };
        let mut ops = vec![
            AudioOperation::SetSource(track.source_url.clone()),
            AudioOperation::Load,
        ];
        if session.is_playing {
            ops.push(AudioOperation::Play);
        }
        ops
    }

    /// Commands that load the current track if the resource has another
    fn source_ops(&self, session: &PlaybackSession) -> Vec<AudioOperation> {
        let Some(track) = session.current_track() else {
            return Vec::new();
        };
        let loaded = self
            .requested_source
            .borrow()
            .clone()
            .or_else(|| self.resource.current_source());
        if loaded.as_deref() == Some(track.source_url.as_str()) {
            return Vec::new();
        }
        let mut ops = vec![
            AudioOperation::SetSource(track.source_url.clone()),
            AudioOperation::Load,
        ];
        if session.position_secs > 0.0 {
            ops.push(AudioOperation::SetPosition(session.position_secs));
        }
        ops
    }

    /// Mutate the session and persist it. Ignored once unloading.
    fn edit<F>(&self, f: F) -> Vec<AudioOperation>
    where
        F: FnOnce(&mut PlaybackSession, &Self) -> Vec<AudioOperation>,
    {
        if self.state.get().is_unloading() {
            debug!(kind = ?self.kind, "ignoring intent while unloading");
            return Vec::new();
        }
        let ops = f(&mut self.session.borrow_mut(), self);
        self.persist();
        ops
    }

    fn try_edit<F>(&self, f: F) -> MediaResult<Vec<AudioOperation>>
    where
        F: FnOnce(&mut PlaybackSession, &Self) -> MediaResult<Vec<AudioOperation>>,
    {
        if self.state.get().is_unloading() {
            debug!(kind = ?self.kind, "ignoring intent while unloading");
            return Ok(Vec::new());
        }
        let ops = f(&mut self.session.borrow_mut(), self)?;
        self.persist();
        Ok(ops)
    }

    fn enqueue(&self, ops: Vec<AudioOperation>) {
        for op in ops {
            match &op {
                AudioOperation::SetSource(url) => {
                    *self.requested_source.borrow_mut() = Some(url.clone());
                }
                AudioOperation::Release => {
                    self.requested_source.borrow_mut().take();
                }
                _ => {}
            }
            self.queue.enqueue(op);
        }
    }

    fn persist(&self) {
        let persisted = self.session.borrow().to_persisted();
        if let Err(err) = save_json(self.store.as_ref(), self.kind.storage_key(), &persisted) {
            warn!(kind = ?self.kind, %err, "failed to persist playback session");
        }
    }
}
