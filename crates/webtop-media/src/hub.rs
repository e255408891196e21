//! Media hub
//!
//! Composition root for playback. The hub is built once per page and
//! handed to whatever UI needs a player; it owns exactly one controller
//! (and so exactly one resource) per [`MediaKind`], plus the page
//! lifecycle bus every controller listens to.

use std::rc::Rc;

use webtop_store::LocalStore;

use crate::config::{MediaKind, PlaybackConfig};
use crate::controller::PlaybackController;
use crate::lifecycle::{PageEvent, PageLifecycle};
use crate::queue::Scheduler;
use crate::resource::MediaResource;

pub struct MediaHub {
    music: Rc<PlaybackController>,
    ambience: Rc<PlaybackController>,
    lifecycle: PageLifecycle,
}

impl MediaHub {
    /// Build one controller per media kind. `resource_for` is called once
    /// for each kind.
    pub fn new<F>(
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn LocalStore>,
        config: PlaybackConfig,
        mut resource_for: F,
    ) -> Self
    where
        F: FnMut(MediaKind) -> Rc<dyn MediaResource>,
    {
        let lifecycle = PageLifecycle::new();
        let mut build = |kind: MediaKind| {
            let controller = PlaybackController::new(
                kind,
                resource_for(kind),
                Rc::clone(&scheduler),
                Rc::clone(&store),
                config.clone(),
            );
            controller.attach_lifecycle(&lifecycle);
            controller
        };
        let music = build(MediaKind::Music);
        let ambience = build(MediaKind::Ambience);

        Self {
            music,
            ambience,
            lifecycle,
        }
    }

    pub fn controller(&self, kind: MediaKind) -> &Rc<PlaybackController> {
        match kind {
            MediaKind::Music => &self.music,
            MediaKind::Ambience => &self.ambience,
        }
    }

    pub fn controllers(&self) -> impl Iterator<Item = &Rc<PlaybackController>> {
        MediaKind::ALL.into_iter().map(move |kind| self.controller(kind))
    }

    /// The bus hosts forward visibility and unload events to
    pub fn lifecycle(&self) -> &PageLifecycle {
        &self.lifecycle
    }

    /// Forward a page lifecycle event to every controller
    pub fn emit(&self, event: PageEvent) {
        self.lifecycle.emit(event);
    }

    /// Timer hook for every controller
    pub fn tick(&self, now_ms: f64) {
        for controller in self.controllers() {
            controller.tick(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaResult;
    use crate::resource::ResourceFuture;
    use futures::future::{self, LocalBoxFuture};
    use futures::FutureExt;
    use std::cell::RefCell;
    use std::time::Duration;
    use webtop_store::MemoryStore;

    /// Scheduler that drops every task; nothing here needs to run
    struct InertScheduler;

    impl Scheduler for InertScheduler {
        fn spawn_local(&self, _task: LocalBoxFuture<'static, ()>) {}

        fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
            future::ready(()).boxed_local()
        }
    }

    struct IdleResource;

    impl MediaResource for IdleResource {
        fn play(&self) -> ResourceFuture<'_> {
            ok()
        }
        fn pause(&self) -> ResourceFuture<'_> {
            ok()
        }
        fn load(&self) -> ResourceFuture<'_> {
            ok()
        }
        fn set_source(&self, _url: String) -> ResourceFuture<'_> {
            ok()
        }
        fn seek_to(&self, _secs: f64) -> ResourceFuture<'_> {
            ok()
        }
        fn set_volume(&self, _volume: f64) -> ResourceFuture<'_> {
            ok()
        }
        fn release(&self) -> ResourceFuture<'_> {
            ok()
        }
        fn current_source(&self) -> Option<String> {
            None
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn duration(&self) -> Option<f64> {
            None
        }
        fn is_ready(&self) -> bool {
            false
        }
        fn is_paused(&self) -> bool {
            true
        }
    }

    fn ok() -> ResourceFuture<'static> {
        future::ready(MediaResult::Ok(())).boxed_local()
    }

    #[test]
    fn test_one_controller_per_kind() {
        let requested = RefCell::new(Vec::new());
        let hub = MediaHub::new(
            Rc::new(InertScheduler),
            Rc::new(MemoryStore::new()),
            PlaybackConfig::default(),
            |kind| {
                requested.borrow_mut().push(kind);
                Rc::new(IdleResource) as Rc<dyn MediaResource>
            },
        );

        assert_eq!(*requested.borrow(), MediaKind::ALL.to_vec());
        assert_eq!(hub.controller(MediaKind::Music).kind(), MediaKind::Music);
        assert_eq!(hub.controller(MediaKind::Ambience).kind(), MediaKind::Ambience);
        assert_eq!(hub.lifecycle().subscriber_count(), 2);
    }

    #[test]
    fn test_sessions_are_independent() {
        let hub = MediaHub::new(
            Rc::new(InertScheduler),
            Rc::new(MemoryStore::new()),
            PlaybackConfig::default(),
            |_| Rc::new(IdleResource) as Rc<dyn MediaResource>,
        );

        hub.controller(MediaKind::Music).add_track("rain.mp3", "Rain");
        assert_eq!(hub.controller(MediaKind::Music).session().len(), 1);
        assert!(hub.controller(MediaKind::Ambience).session().is_empty());
    }
}
