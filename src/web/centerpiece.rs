use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, Window};
use web_time::Instant;

use super::dom;
use super::frame::AnimationLoop;
use super::init_logging;
use super::listener::ListenerSet;
use crate::centerpiece::CenterpieceScene;
use crate::engine::CenterpieceEngine;
use crate::error::VitrineError;
use crate::gpu::texture::decode_hdr;
use crate::input::InputEvent;
use crate::options::Options;

struct CenterpieceSession {
    engine: CenterpieceEngine,
    canvas: HtmlCanvasElement,
    surface_size: (u32, u32),
}

impl CenterpieceSession {
    fn tick(&mut self) {
        let _ = self.engine.render(Instant::now());
        // Resizes land debounced inside the scene; follow with the canvas.
        let size = self.engine.scene().surface_size();
        if size != self.surface_size {
            dom::size_canvas(&self.canvas, size);
            self.surface_size = size;
        }
    }
}

type Session = Rc<RefCell<CenterpieceSession>>;

fn to_js_value(value: &Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

fn from_js_value(value: &JsValue) -> Result<Value, VitrineError> {
    let text: String = js_sys::JSON::stringify(value)
        .map_err(|e| VitrineError::Host(format!("JSON.stringify: {e:?}")))?
        .into();
    serde_json::from_str(&text)
        .map_err(|e| VitrineError::InvalidParameter(e.to_string()))
}

/// A running centerpiece scene.
#[wasm_bindgen]
pub struct CenterpieceHandle {
    session: Session,
    animation: AnimationLoop,
    _listeners: ListenerSet,
}

#[wasm_bindgen]
impl CenterpieceHandle {
    /// JSON Schema describing every panel parameter.
    ///
    /// # Errors
    ///
    /// Rejects if the schema cannot be converted to a JS object.
    #[wasm_bindgen(js_name = paramSchema)]
    pub fn param_schema(&self) -> Result<JsValue, JsValue> {
        to_js_value(&CenterpieceEngine::param_schema())
    }

    /// Current `bloom` and `material` values.
    ///
    /// # Errors
    ///
    /// Rejects if the values cannot be converted to a JS object.
    pub fn params(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.session.borrow().engine.params())
    }

    /// Set one parameter; returns the value actually applied after
    /// clamping. Takes effect on the next frame.
    ///
    /// # Errors
    ///
    /// Rejects unknown sections or fields and values of the wrong type.
    #[wasm_bindgen(js_name = setParam)]
    pub fn set_param(
        &self,
        section: &str,
        field: &str,
        value: &JsValue,
    ) -> Result<JsValue, JsValue> {
        let value = from_js_value(value)?;
        let applied = self
            .session
            .borrow_mut()
            .engine
            .set_param(section, field, &value)?;
        to_js_value(&applied)
    }

    /// Stop requesting frames. The current frame finishes.
    pub fn stop(&self) {
        self.animation.stop();
    }

    /// Resume after [`stop`](Self::stop).
    pub fn restart(&self) {
        self.animation.restart();
    }

    /// Whether the frame loop is running.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.animation.is_running()
    }

    /// Restart elapsed time and particle drift.
    pub fn reset(&self) {
        self.session.borrow_mut().engine.reset(Instant::now());
    }
}

/// Start the torus knot and particle scene on the canvas `canvas_id`,
/// lighting it from `env_url` once that loads.
///
/// # Errors
///
/// Rejects when the canvas is missing or no GPU adapter is available. A
/// failed environment map only logs a warning.
#[wasm_bindgen(js_name = startCenterpiece)]
#[allow(clippy::future_not_send, clippy::needless_pass_by_value)]
pub async fn start_centerpiece(
    canvas_id: String,
    env_url: Option<String>,
) -> Result<CenterpieceHandle, JsValue> {
    init_logging();
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let canvas = dom::canvas(&document, &canvas_id)?;

    let scene = CenterpieceScene::new(
        dom::viewport(&window),
        Options::default(),
        Instant::now(),
    );
    let surface_size = scene.surface_size();
    dom::size_canvas(&canvas, surface_size);
    let engine =
        CenterpieceEngine::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), scene)
            .await?;
    let max_dimension = engine.max_texture_dimension();

    let session: Session = Rc::new(RefCell::new(CenterpieceSession {
        engine,
        canvas,
        surface_size,
    }));
    if let Some(url) = env_url {
        load_environment(&session, url, max_dimension);
    }
    let listeners = register_resize(&session, &window)?;

    let ticking = session.clone();
    let animation = AnimationLoop::start(move || ticking.borrow_mut().tick());

    Ok(CenterpieceHandle {
        session,
        animation,
        _listeners: listeners,
    })
}

fn register_resize(session: &Session, window: &Window) -> Result<ListenerSet, VitrineError> {
    let target: &EventTarget = window.as_ref();
    let mut set = ListenerSet::default();
    let session = session.clone();
    let source = window.clone();
    set.add(target, "resize", move |_| {
        let vp = dom::viewport(&source);
        session.borrow_mut().engine.handle_event(
            InputEvent::Resized {
                width: vp.width,
                height: vp.height,
                pixel_ratio: vp.pixel_ratio,
            },
            Instant::now(),
        );
    })?;
    Ok(set)
}

fn load_environment(session: &Session, url: String, max_dimension: u32) {
    let session = session.clone();
    wasm_bindgen_futures::spawn_local(async move {
        log::info!("loading environment map {url}");
        let result = dom::fetch_bytes(&url)
            .await
            .and_then(|bytes| decode_hdr(&bytes, max_dimension));
        session.borrow_mut().engine.queue_environment(result);
    });
}
