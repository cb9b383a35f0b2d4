use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_motion_core::{
    parse_timeline_json, Bounds, Config, Property, Scope, Stage, Timeline, TimelineId,
    TriggerSpec, Viewport,
};

/// One animation scope plus the in-memory stage mirroring the host page.
/// The host registers its elements, feeds scroll and frame deltas, and
/// applies the returned changes to the real DOM.
#[wasm_bindgen]
pub struct MotionScope {
    stage: Stage,
    scope: Scope,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Accept either a JSON string or a plain JS object.
fn json_text(v: &JsValue, what: &str) -> Result<String, JsError> {
    if jsvalue_is_undefined_or_null(v) {
        return Err(JsError::new(&format!("{what}: value is null/undefined")));
    }
    if let Some(s) = v.as_string() {
        return Ok(s);
    }
    JSON::stringify(v)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

#[wasm_bindgen]
impl MotionScope {
    /// Create a scope. Pass a config object or undefined/null for defaults.
    ///   new MotionScope("about", { default_trigger_start: 0.8 })
    #[wasm_bindgen(constructor)]
    pub fn new(name: String, config: JsValue) -> Result<MotionScope, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(MotionScope {
            stage: Stage::new(),
            scope: Scope::new(&name, cfg),
        })
    }

    /// Register an element; with `parent` it is appended as its last child.
    #[wasm_bindgen(js_name = add_element)]
    pub fn add_element(&mut self, target: String, parent: Option<String>) {
        match parent {
            Some(parent) => self.stage.add_child(&parent, &target),
            None => self.stage.add(&target),
        };
    }

    #[wasm_bindgen(js_name = set_bounds)]
    pub fn set_bounds(&mut self, target: String, top: f32, height: f32) {
        self.stage.set_bounds(&target, Bounds::new(top, height));
    }

    #[wasm_bindgen(js_name = remove_element)]
    pub fn remove_element(&mut self, target: String) -> bool {
        self.stage.remove(&target)
    }

    /// Compile a timeline spec (JSON string or object) against the registered
    /// elements. Returns a timeline id (u32).
    #[wasm_bindgen(js_name = add_timeline)]
    pub fn add_timeline(&mut self, spec: JsValue, autoplay: bool) -> Result<u32, JsError> {
        let text = json_text(&spec, "add_timeline")?;
        let spec = parse_timeline_json(&text)
            .map_err(|e| JsError::new(&format!("add_timeline parse error: {e}")))?;
        let timeline = Timeline::compile(&spec, &self.stage)
            .map_err(|e| JsError::new(&format!("add_timeline compile error: {e}")))?;
        let id = self.scope.add_timeline(timeline, &self.stage);
        if autoplay {
            self.scope.play(id);
        }
        Ok(id.0)
    }

    pub fn play(&mut self, timeline: u32) -> bool {
        self.scope.play(TimelineId(timeline))
    }

    pub fn reverse(&mut self, timeline: u32) -> bool {
        self.scope.reverse(TimelineId(timeline))
    }

    pub fn pause(&mut self, timeline: u32) -> bool {
        self.scope.pause(TimelineId(timeline))
    }

    pub fn resume(&mut self, timeline: u32) -> bool {
        self.scope.resume(TimelineId(timeline))
    }

    pub fn restart(&mut self, timeline: u32) -> bool {
        self.scope.restart(TimelineId(timeline))
    }

    /// Jump to `time` seconds; the resulting changes arrive with the next
    /// `update` or `take_outputs`.
    pub fn seek(&mut self, timeline: u32, time: f32) {
        self.scope.seek(TimelineId(timeline), time, &self.stage);
    }

    pub fn kill(&mut self, timeline: u32) -> bool {
        self.scope.kill_timeline(TimelineId(timeline))
    }

    /// Bind a trigger spec object, e.g.
    /// `{ target: "about", start: "top 80%", policy: "play none none reverse" }`.
    /// Returns a trigger id (u32).
    #[wasm_bindgen(js_name = bind_trigger)]
    pub fn bind_trigger(&mut self, spec: JsValue, timeline: u32) -> Result<u32, JsError> {
        let text = json_text(&spec, "bind_trigger")?;
        let spec: TriggerSpec = serde_json::from_str(&text)
            .map_err(|e| JsError::new(&format!("bind_trigger parse error: {e}")))?;
        let id = self
            .scope
            .bind_trigger(spec, TimelineId(timeline), &self.stage);
        Ok(id.0)
    }

    pub fn scroll(&mut self, scroll_y: f32, height: f32) {
        self.scope
            .scroll(Viewport::new(scroll_y, height), &self.stage);
    }

    /// Advance the scope clock by `dt_ms` and return the pending outputs
    /// (`{ changes, events }`). Changes are also applied to the stage.
    pub fn update(&mut self, dt_ms: u32) -> Result<JsValue, JsError> {
        self.scope.update(u64::from(dt_ms), &self.stage);
        self.take_outputs()
    }

    /// Drain pending outputs without advancing time.
    #[wasm_bindgen(js_name = take_outputs)]
    pub fn take_outputs(&mut self) -> Result<JsValue, JsError> {
        let out = self.scope.take_outputs();
        self.stage.apply(&out);
        swb::to_value(&out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Last value applied to `(target, property)`, or undefined.
    pub fn value(&self, target: String, property: String) -> Result<JsValue, JsError> {
        match self.stage.value(&target, &Property::from(property.as_str())) {
            Some(v) => swb::to_value(&v).map_err(|e| JsError::new(&format!("value error: {e}"))),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Call `callback()` when the scope is disposed.
    #[wasm_bindgen(js_name = on_dispose)]
    pub fn on_dispose(&mut self, callback: Function) {
        self.scope.on_teardown(move || {
            let _ = callback.call0(&JsValue::UNDEFINED);
        });
    }

    #[wasm_bindgen(js_name = is_disposed)]
    pub fn is_disposed(&self) -> bool {
        self.scope.is_disposed()
    }

    /// Release every timeline, trigger, timer and listener. Returns the
    /// teardown report; a second call reports nothing released.
    pub fn dispose(&mut self) -> Result<JsValue, JsError> {
        let report = self.scope.dispose();
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
