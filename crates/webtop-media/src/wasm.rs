//! Browser bindings: audio element resource, event-loop scheduler,
//! DOM event wiring and a JavaScript handle over [`MediaHub`]

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventTarget, HtmlAudioElement, HtmlMediaElement, PageTransitionEvent};
use webtop_store::WebStorage;

use crate::config::{MediaKind, PlaybackConfig};
use crate::controller::PlaybackController;
use crate::error::MediaError;
use crate::hub::MediaHub;
use crate::lifecycle::{PageEvent, PageLifecycle};
use crate::queue::Scheduler;
use crate::resource::{MediaResource, ResourceEvent, ResourceFuture};

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn done(result: Result<(), JsValue>) -> ResourceFuture<'static> {
    let result = result.map_err(|err| MediaError::resource(describe(&err)));
    futures::future::ready(result).boxed_local()
}

// =============================================================================
// Resource
// =============================================================================

/// [`MediaResource`] over an `<audio>` element
pub struct HtmlMediaResource {
    element: HtmlAudioElement,
    /// Source as set, before the browser resolves it to an absolute URL
    source: RefCell<Option<String>>,
}

impl HtmlMediaResource {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self::from_element(HtmlAudioElement::new()?))
    }

    pub fn from_element(element: HtmlAudioElement) -> Self {
        Self {
            element,
            source: RefCell::new(None),
        }
    }

    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaResource for HtmlMediaResource {
    fn play(&self) -> ResourceFuture<'_> {
        let promise = self.element.play();
        async move {
            let promise = promise.map_err(|err| MediaError::PlaybackRejected(describe(&err)))?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| MediaError::PlaybackRejected(describe(&err)))
        }
        .boxed_local()
    }

    fn pause(&self) -> ResourceFuture<'_> {
        done(self.element.pause())
    }

    fn load(&self) -> ResourceFuture<'_> {
        self.element.load();
        done(Ok(()))
    }

    fn set_source(&self, url: String) -> ResourceFuture<'_> {
        self.element.set_src(&url);
        *self.source.borrow_mut() = Some(url);
        done(Ok(()))
    }

    fn seek_to(&self, secs: f64) -> ResourceFuture<'_> {
        self.element.set_current_time(secs);
        done(Ok(()))
    }

    fn set_volume(&self, volume: f64) -> ResourceFuture<'_> {
        self.element.set_volume(volume.clamp(0.0, 1.0));
        done(Ok(()))
    }

    fn release(&self) -> ResourceFuture<'_> {
        let paused = self.element.pause();
        let removed = self.element.remove_attribute("src");
        self.element.load();
        self.source.borrow_mut().take();
        done(paused.and(removed))
    }

    fn current_source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    /// An audio element accepts commands as soon as it exists
    fn is_ready(&self) -> bool {
        true
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// [`Scheduler`] on the browser event loop
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        async move {
            let _ = JsFuture::from(promise).await;
        }
        .boxed_local()
    }
}

// =============================================================================
// DOM events
// =============================================================================

type Listener = Closure<dyn FnMut(Event)>;

/// DOM listeners that are removed on drop
#[derive(Default)]
pub struct EventBindings {
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

impl EventBindings {
    fn listen(
        &mut self,
        target: &EventTarget,
        name: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let listener: Listener = Closure::new(handler);
        target.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((target.clone(), name, listener));
        Ok(())
    }
}

impl Drop for EventBindings {
    fn drop(&mut self) {
        for (target, name, listener) in self.listeners.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

/// Forward media element events to a controller
pub fn bind_resource_events(
    element: &HtmlMediaElement,
    controller: &Rc<PlaybackController>,
) -> Result<EventBindings, JsValue> {
    let mut bindings = EventBindings::default();
    let target: &EventTarget = element.as_ref();

    let simple = [
        ("canplay", ResourceEvent::CanPlay),
        ("play", ResourceEvent::Play),
        ("pause", ResourceEvent::Pause),
        ("ended", ResourceEvent::Ended),
    ];
    for (name, event) in simple {
        let weak = Rc::downgrade(controller);
        bindings.listen(target, name, move |_| deliver(&weak, event.clone()))?;
    }

    let weak = Rc::downgrade(controller);
    let source = element.clone();
    bindings.listen(target, "error", move |_| {
        let message = source
            .error()
            .map(|err| format!("media error {}", err.code()))
            .unwrap_or_else(|| "media error".to_string());
        deliver(&weak, ResourceEvent::Error(message));
    })?;

    let weak = Rc::downgrade(controller);
    let source = element.clone();
    bindings.listen(target, "timeupdate", move |_| {
        let progress = ResourceEvent::Progress {
            secs: source.current_time(),
            now_ms: js_sys::Date::now(),
        };
        deliver(&weak, progress);
    })?;

    let weak = Rc::downgrade(controller);
    let source = element.clone();
    bindings.listen(target, "durationchange", move |_| {
        deliver(&weak, ResourceEvent::Duration(source.duration()));
    })?;

    Ok(bindings)
}

fn deliver(controller: &Weak<PlaybackController>, event: ResourceEvent) {
    if let Some(controller) = controller.upgrade() {
        controller.handle_event(event);
    }
}

/// Forward visibility, `pagehide` and `beforeunload` to a lifecycle bus
pub fn bind_page_lifecycle(bus: &PageLifecycle) -> Result<EventBindings, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mut bindings = EventBindings::default();

    let events = bus.clone();
    let doc = document.clone();
    bindings.listen(document.as_ref(), "visibilitychange", move |_| {
        events.emit(if doc.hidden() {
            PageEvent::Hidden
        } else {
            PageEvent::Visible
        });
    })?;

    let events = bus.clone();
    bindings.listen(window.as_ref(), "pagehide", move |event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .map(PageTransitionEvent::persisted)
            .unwrap_or(false);
        events.emit(PageEvent::PageHide { persisted });
    })?;

    let events = bus.clone();
    bindings.listen(window.as_ref(), "beforeunload", move |_| {
        events.emit(PageEvent::BeforeUnload);
    })?;

    Ok(bindings)
}

// =============================================================================
// JavaScript handle
// =============================================================================

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_kind(kind: &str) -> Result<MediaKind, JsValue> {
    match kind {
        "music" => Ok(MediaKind::Music),
        "ambience" => Ok(MediaKind::Ambience),
        other => Err(JsValue::from_str(&format!("unknown media kind: {other}"))),
    }
}

/// Media hub exported to JavaScript. Kinds are `"music"` and `"ambience"`.
#[wasm_bindgen]
pub struct MediaHandle {
    hub: MediaHub,
    _bindings: Vec<EventBindings>,
}

#[wasm_bindgen]
impl MediaHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MediaHandle, JsValue> {
        let music = Rc::new(HtmlMediaResource::new()?);
        let ambience = Rc::new(HtmlMediaResource::new()?);
        let hub = MediaHub::new(
            Rc::new(BrowserScheduler),
            Rc::new(WebStorage::new()),
            PlaybackConfig::default(),
            |kind| match kind {
                MediaKind::Music => Rc::clone(&music) as Rc<dyn MediaResource>,
                MediaKind::Ambience => Rc::clone(&ambience) as Rc<dyn MediaResource>,
            },
        );

        let bindings = vec![
            bind_page_lifecycle(hub.lifecycle())?,
            bind_resource_events(music.element(), hub.controller(MediaKind::Music))?,
            bind_resource_events(ambience.element(), hub.controller(MediaKind::Ambience))?,
        ];

        Ok(MediaHandle {
            hub,
            _bindings: bindings,
        })
    }

    fn controller(&self, kind: &str) -> Result<&Rc<PlaybackController>, JsValue> {
        Ok(self.hub.controller(parse_kind(kind)?))
    }

    pub fn mount(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.mount();
        Ok(())
    }

    pub fn unmount(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.unmount();
        Ok(())
    }

    pub fn toggle_play_pause(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.toggle_play_pause();
        Ok(())
    }

    pub fn next(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.next();
        Ok(())
    }

    pub fn previous(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.previous();
        Ok(())
    }

    pub fn select_track(&self, kind: &str, index: usize) -> Result<(), JsValue> {
        self.controller(kind)?
            .select_track(index)
            .map_err(to_js_error)
    }

    pub fn set_volume(&self, kind: &str, volume: f64) -> Result<(), JsValue> {
        self.controller(kind)?.set_volume(volume);
        Ok(())
    }

    pub fn toggle_mute(&self, kind: &str) -> Result<(), JsValue> {
        self.controller(kind)?.toggle_mute();
        Ok(())
    }

    pub fn seek(&self, kind: &str, secs: f64) -> Result<(), JsValue> {
        self.controller(kind)?.seek(secs);
        Ok(())
    }

    pub fn add_track(&self, kind: &str, url: &str, title: &str) -> Result<bool, JsValue> {
        Ok(self.controller(kind)?.add_track(url, title))
    }

    pub fn remove_track(&self, kind: &str, index: usize) -> Result<(), JsValue> {
        self.controller(kind)?
            .remove_track(index)
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Current session as JSON
    pub fn session(&self, kind: &str) -> Result<String, JsValue> {
        let session = self.controller(kind)?.session();
        serde_json::to_string(&session.to_persisted()).map_err(to_js_error)
    }

    /// Call from a timer; samples playback position while playing
    pub fn tick(&self, now_ms: f64) {
        self.hub.tick(now_ms);
    }
}
