//! JavaScript bindings for the desktop engine

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::input::{GestureKind, GestureSurface};
use crate::math::Rect;
use crate::persistence::Snapshot;
use crate::window::{WindowConfig, WindowManager};
use crate::DesktopEngine;

/// Gesture hooks backed by JS callbacks
#[derive(Clone, Default)]
struct JsSurface {
    attach: Option<Function>,
    detach: Option<Function>,
    cue_start: Option<Function>,
    cue_stop: Option<Function>,
}

impl JsSurface {
    fn call(hook: &Option<Function>, arg: JsValue) {
        if let Some(f) = hook {
            if let Err(err) = f.call1(&JsValue::NULL, &arg) {
                web_sys::console::warn_2(&"[desktop] hook failed".into(), &err);
            }
        }
    }
}

impl GestureSurface for JsSurface {
    fn attach_pointer_listeners(&mut self) {
        Self::call(&self.attach, JsValue::UNDEFINED);
    }

    fn detach_pointer_listeners(&mut self) {
        Self::call(&self.detach, JsValue::UNDEFINED);
    }

    fn start_cue(&mut self, kind: GestureKind) {
        let tag = match kind {
            GestureKind::Drag => "drag",
            GestureKind::Resize => "resize",
        };
        Self::call(&self.cue_start, JsValue::from_str(tag));
    }

    fn stop_cue(&mut self) {
        Self::call(&self.cue_stop, JsValue::UNDEFINED);
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js_error)
}

/// Desktop engine handle exported to JavaScript
#[wasm_bindgen]
pub struct DesktopHandle {
    engine: DesktopEngine,
    hooks: JsSurface,
}

#[wasm_bindgen]
impl DesktopHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> DesktopHandle {
        let mut engine = DesktopEngine::new();
        engine.init(width, height);
        DesktopHandle {
            engine,
            hooks: JsSurface::default(),
        }
    }

    /// Install pointer listener hooks: `attach()` / `detach()`
    pub fn set_listener_hooks(&mut self, attach: Function, detach: Function) {
        self.hooks.attach = Some(attach);
        self.hooks.detach = Some(detach);
        self.engine.set_surface(Box::new(self.hooks.clone()));
    }

    /// Install feedback cue hooks: `start(kind)` / `stop()`
    pub fn set_cue_hooks(&mut self, start: Function, stop: Function) {
        self.hooks.cue_start = Some(start);
        self.hooks.cue_stop = Some(stop);
        self.engine.set_surface(Box::new(self.hooks.clone()));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize_viewport(width, height);
    }

    pub fn set_container(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.engine
            .set_container(Some(Rect::new(x, y, width, height)));
    }

    pub fn clear_container(&mut self) {
        self.engine.set_container(None);
    }

    /// Create a window from a JSON `WindowConfig`
    pub fn create_window(&mut self, config_json: &str) -> Result<u64, JsValue> {
        let config: WindowConfig = serde_json::from_str(config_json).map_err(to_js_error)?;
        Ok(self.engine.create_window(config))
    }

    pub fn close_window(&mut self, id: u64) {
        self.engine.close_window(id);
    }

    pub fn focus_window(&mut self, id: u64) -> Result<(), JsValue> {
        self.engine.focus_window(id).map_err(to_js_error)
    }

    pub fn minimize_window(&mut self, id: u64) -> Result<(), JsValue> {
        self.engine.minimize_window(id).map_err(to_js_error)
    }

    pub fn maximize_window(&mut self, id: u64) -> Result<(), JsValue> {
        self.engine.maximize_window(id).map_err(to_js_error)
    }

    pub fn restore_window(&mut self, id: u64) -> Result<(), JsValue> {
        self.engine.restore_window(id).map_err(to_js_error)
    }

    pub fn start_move_drag(&mut self, id: u64, x: f32, y: f32) -> Result<(), JsValue> {
        self.engine.start_move_drag(id, x, y).map_err(to_js_error)
    }

    pub fn start_resize_drag(
        &mut self,
        id: u64,
        direction: &str,
        x: f32,
        y: f32,
    ) -> Result<(), JsValue> {
        self.engine
            .start_resize_drag(id, direction, x, y)
            .map_err(to_js_error)
    }

    /// Route pointer-down; returns the JSON `InputResult`
    pub fn pointer_down(&mut self, x: f32, y: f32, button: u8) -> Result<String, JsValue> {
        to_json(&self.engine.handle_pointer_down(x, y, button))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<String, JsValue> {
        to_json(&self.engine.handle_pointer_move(x, y))
    }

    pub fn pointer_up(&mut self) -> Result<String, JsValue> {
        to_json(&self.engine.handle_pointer_up())
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Visible windows with live rectangles as JSON
    pub fn window_rects(&self) -> Result<String, JsValue> {
        to_json(&self.engine.window_rects())
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.engine.windows.snapshot().to_json().map_err(to_js_error)
    }

    pub fn restore_snapshot(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = Snapshot::from_json(json).map_err(to_js_error)?;
        self.engine.windows = WindowManager::restore_snapshot(snapshot);
        Ok(())
    }
}
