//! Browser glue: the page's `AudioContext`, the DOM bootstrap and the
//! JS-facing trigger functions.
//!
//! One engine per page session lives in a thread-local slot. It is built
//! on the first trigger; if the host refuses to create an audio context,
//! the slot remembers the failure and every later trigger is a silent
//! no-op.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::bind::{self, ButtonDocument, ClickHandler, ReadyState};
use crate::config::SfxConfig;
use crate::engine::SoundEngine;
use crate::error::SfxError;
use crate::graph::SoundGraph;
use crate::output::{AudioOutput, ContextState};

#[wasm_bindgen]
extern "C" {
    type Global;

    #[wasm_bindgen(thread_local_v2, js_name = globalThis)]
    static GLOBAL: Global;

    #[wasm_bindgen(method, getter)]
    fn document(this: &Global) -> Option<Document>;

    #[wasm_bindgen(js_namespace = Math)]
    fn random() -> f64;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = AudioContext)]
    type JsAudioContext;

    #[wasm_bindgen(constructor, js_class = "AudioContext", catch)]
    fn new() -> Result<JsAudioContext, JsValue>;

    #[wasm_bindgen(method, getter, js_name = currentTime)]
    fn current_time(this: &JsAudioContext) -> f64;

    #[wasm_bindgen(method, getter, js_name = sampleRate)]
    fn sample_rate(this: &JsAudioContext) -> f64;

    #[wasm_bindgen(method, getter)]
    fn state(this: &JsAudioContext) -> String;

    #[wasm_bindgen(method, getter)]
    fn destination(this: &JsAudioContext) -> JsValue;

    #[wasm_bindgen(method, catch)]
    fn resume(this: &JsAudioContext) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createBuffer)]
    fn create_buffer(
        this: &JsAudioContext,
        channels: u32,
        length: u32,
        sample_rate: f64,
    ) -> Result<AudioBuffer, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createBufferSource)]
    fn create_buffer_source(this: &JsAudioContext) -> Result<AudioBufferSourceNode, JsValue>;

    type AudioBuffer;

    #[wasm_bindgen(method, catch, js_name = copyToChannel)]
    fn copy_to_channel(this: &AudioBuffer, source: &[f32], channel: u32) -> Result<(), JsValue>;

    type AudioBufferSourceNode;

    #[wasm_bindgen(method, setter)]
    fn set_buffer(this: &AudioBufferSourceNode, buffer: &AudioBuffer);

    #[wasm_bindgen(method, catch)]
    fn connect(this: &AudioBufferSourceNode, destination: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn start(this: &AudioBufferSourceNode, when: f64) -> Result<(), JsValue>;
}

// Older Safari only exposes the prefixed constructor.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = webkitAudioContext)]
    type WebkitAudioContext;

    #[wasm_bindgen(constructor, js_class = "webkitAudioContext", catch)]
    fn new() -> Result<WebkitAudioContext, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    type Document;

    #[wasm_bindgen(method, getter, js_name = readyState)]
    fn ready_state(this: &Document) -> String;

    #[wasm_bindgen(method, catch, js_name = querySelectorAll)]
    fn query_selector_all(this: &Document, selectors: &str) -> Result<NodeList, JsValue>;

    #[wasm_bindgen(method, js_name = addEventListener)]
    fn add_event_listener(this: &Document, kind: &str, listener: &JsValue);

    type NodeList;

    #[wasm_bindgen(method, getter)]
    fn length(this: &NodeList) -> u32;

    #[wasm_bindgen(method)]
    fn item(this: &NodeList, index: u32) -> Option<Element>;

    type Element;

    #[wasm_bindgen(method, js_name = addEventListener)]
    fn add_event_listener(this: &Element, kind: &str, listener: &JsValue);
}

fn js_message(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn host_error(e: JsValue) -> SfxError {
    SfxError::Host(js_message(&e))
}

fn to_js(e: SfxError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ── Output ──────────────────────────────────────────────────

/// The page's `AudioContext` as an [`AudioOutput`].
///
/// Graphs are rendered in Rust and handed over as one-shot buffer
/// sources; the browser drops each source node after it stops.
pub struct WebAudioOutput {
    ctx: JsAudioContext,
}

impl WebAudioOutput {
    pub fn new() -> Result<Self, SfxError> {
        let ctx = match JsAudioContext::new() {
            Ok(ctx) => ctx,
            Err(_) => WebkitAudioContext::new()
                .map_err(|e| SfxError::ContextUnavailable(js_message(&e)))?
                .unchecked_into(),
        };
        Ok(WebAudioOutput { ctx })
    }
}

impl AudioOutput for WebAudioOutput {
    fn state(&self) -> ContextState {
        ContextState::from_js(&self.ctx.state())
    }

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn sample_rate(&self) -> f64 {
        self.ctx.sample_rate()
    }

    fn resume(&mut self) -> Result<(), SfxError> {
        // The returned promise is not awaited; the buffer is queued either way.
        self.ctx.resume().map(drop).map_err(host_error)
    }

    fn schedule(&mut self, graph: SoundGraph) -> Result<(), SfxError> {
        let sample_rate = self.sample_rate();
        let samples = graph.render(sample_rate);
        if samples.is_empty() {
            return Ok(());
        }

        let buffer = self
            .ctx
            .create_buffer(1, samples.len() as u32, sample_rate)
            .map_err(host_error)?;
        buffer.copy_to_channel(&samples, 0).map_err(host_error)?;

        let source = self.ctx.create_buffer_source().map_err(host_error)?;
        source.set_buffer(&buffer);
        source.connect(&self.ctx.destination()).map_err(host_error)?;
        source.start(graph.start).map_err(host_error)?;
        Ok(())
    }
}

// ── Document ────────────────────────────────────────────────

/// `document` as a [`ButtonDocument`].
#[derive(Clone)]
pub struct WebDocument(Document);

impl WebDocument {
    pub fn current() -> Option<Self> {
        GLOBAL.with(|g| g.document()).map(WebDocument)
    }
}

impl ButtonDocument for WebDocument {
    type Element = Element;

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_js(&self.0.ready_state())
    }

    fn when_ready(&self, callback: Box<dyn FnOnce()>) {
        let listener = Closure::once_into_js(move || callback());
        self.0.add_event_listener("DOMContentLoaded", &listener);
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.0.query_selector_all(selector) {
            Ok(list) => (0..list.length()).filter_map(|i| list.item(i)).collect(),
            Err(e) => {
                tracing::warn!(selector, error = %js_message(&e), "bad button selector");
                Vec::new()
            }
        }
    }

    fn listen_click(&self, element: &Element, handler: ClickHandler) {
        let listener = Closure::<dyn Fn()>::new(move || handler());
        element.add_event_listener("click", listener.as_ref());
        // Listeners live as long as the page.
        listener.forget();
    }
}

// ── Page-session engine ─────────────────────────────────────

enum EngineSlot {
    Empty,
    Ready(SoundEngine<WebAudioOutput>),
    Failed,
}

thread_local! {
    static CONFIG: RefCell<SfxConfig> = RefCell::new(SfxConfig::default());
    static ENGINE: RefCell<EngineSlot> = const { RefCell::new(EngineSlot::Empty) };
}

fn random_seed() -> u64 {
    let hi = (random() * 4_294_967_296.0) as u64;
    let lo = (random() * 4_294_967_296.0) as u64;
    (hi << 32) | lo
}

/// Run `f` with the page's engine, creating it on first use.
fn with_engine(f: impl FnOnce(&mut SoundEngine<WebAudioOutput>)) {
    ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if matches!(*slot, EngineSlot::Empty) {
            *slot = match WebAudioOutput::new() {
                Ok(output) => {
                    let config = CONFIG.with(|c| c.borrow().clone());
                    let bank = config.bank().unwrap_or_default();
                    let seed = config.seed.unwrap_or_else(random_seed);
                    tracing::info!(sample_rate = output.sample_rate(), "audio context created");
                    EngineSlot::Ready(SoundEngine::with_seed(output, bank, seed))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "UI sounds disabled for this page");
                    EngineSlot::Failed
                }
            };
        }
        if let EngineSlot::Ready(engine) = &mut *slot {
            f(engine);
        }
    });
}

fn click_handler() -> ClickHandler {
    Rc::new(play_click_sound)
}

fn selector() -> String {
    CONFIG.with(|c| c.borrow().selector.clone())
}

/// Soft tap for any button.
#[wasm_bindgen(js_name = playClickSound)]
pub fn play_click_sound() {
    with_engine(|e| e.play_click());
}

/// Card flip.
#[wasm_bindgen(js_name = playFlipSound)]
pub fn play_flip_sound() {
    with_engine(|e| e.play_flip());
}

/// Previous/next navigation.
#[wasm_bindgen(js_name = playSwipeSound)]
pub fn play_swipe_sound() {
    with_engine(|e| e.play_swipe());
}

/// Bind the click sound to every button currently on the page.
/// Calling it again binds every button a second time.
#[wasm_bindgen(js_name = addButtonSounds)]
pub fn add_button_sounds() {
    if let Some(doc) = WebDocument::current() {
        bind::add_button_sounds(&doc, &selector(), click_handler());
    }
}

/// Replace the sound configuration (`SfxConfig` shape).
///
/// The bank and seed apply to a live engine immediately. The selector is
/// read by later `addButtonSounds` calls; buttons already bound keep their
/// listeners.
#[wasm_bindgen(js_name = configureSounds)]
pub fn configure_sounds(config: JsValue) -> Result<(), JsValue> {
    let config: SfxConfig =
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let bank = config.bank().map_err(to_js)?;
    ENGINE.with(|slot| {
        if let EngineSlot::Ready(engine) = &mut *slot.borrow_mut() {
            engine.set_bank(bank)?;
            if let Some(seed) = config.seed {
                engine.reseed(seed);
            }
        }
        Ok::<(), SfxError>(())
    })
    .map_err(to_js)?;
    CONFIG.with(|c| *c.borrow_mut() = config);
    Ok(())
}

/// Page-load hook: binds the click sound once the DOM is ready.
#[wasm_bindgen(start)]
pub fn start() {
    let Some(doc) = WebDocument::current() else {
        return;
    };
    match bind::install(&doc, &selector(), click_handler()) {
        bind::Bootstrap::Bound(count) => tracing::debug!(count, "button sounds installed"),
        bind::Bootstrap::Deferred => tracing::debug!("button sounds wait for DOMContentLoaded"),
    }
}
