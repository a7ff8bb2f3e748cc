use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlCanvasElement, MouseEvent, Window};
use web_time::Instant;

use super::dom::{self, DomLayout};
use super::frame::AnimationLoop;
use super::init_logging;
use super::listener::ListenerSet;
use crate::engine::GalleryEngine;
use crate::error::VitrineError;
use crate::gallery::{image_source, GalleryScene};
use crate::gpu::texture::decode_rgba8;
use crate::input::{gallery_listeners, InputEvent, Listener};
use crate::options::Options;

struct GallerySession {
    engine: GalleryEngine,
    layout: DomLayout,
    canvas: HtmlCanvasElement,
}

impl GallerySession {
    fn handle_event(&mut self, event: InputEvent) {
        self.engine.handle_event(event, &self.layout, Instant::now());
        if matches!(event, InputEvent::Resized { .. }) {
            dom::size_canvas(&self.canvas, self.engine.scene().surface_size());
        }
    }
}

type Session = Rc<RefCell<GallerySession>>;

/// A running gallery. Dropping it removes the page listeners; the frame
/// loop stops with [`stop`](Self::stop).
#[wasm_bindgen]
pub struct GalleryHandle {
    session: Session,
    animation: AnimationLoop,
    listeners: ListenerSet,
}

#[wasm_bindgen]
impl GalleryHandle {
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

    /// Whether pointer hover is tracked (false on touch devices).
    #[wasm_bindgen(getter, js_name = hoverEnabled)]
    pub fn hover_enabled(&self) -> bool {
        self.session.borrow().engine.scene().hover_enabled()
    }

    /// Number of mirrored images.
    #[wasm_bindgen(getter, js_name = planeCount)]
    pub fn plane_count(&self) -> usize {
        self.session.borrow().engine.scene().registry().len()
    }

    /// Number of page listeners registered.
    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Mirror every `<img>` in the document onto the canvas `canvas_id`.
///
/// # Errors
///
/// Rejects when the canvas is missing or no GPU adapter is available.
#[wasm_bindgen(js_name = startGallery)]
#[allow(clippy::future_not_send, clippy::needless_pass_by_value)]
pub async fn start_gallery(canvas_id: String) -> Result<GalleryHandle, JsValue> {
    init_logging();
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let canvas = dom::canvas(&document, &canvas_id)?;
    let images = dom::images(&document)?;
    let user_agent = dom::user_agent(&window);
    let display = Options::default().display;

    let urls: Vec<Option<String>> = images
        .iter()
        .map(|img| image_source(&img.current_src(), &img.src()).map(str::to_owned))
        .collect();
    let layout = DomLayout::new(images.into_iter().map(Element::from).collect());
    let scene = GalleryScene::new(
        dom::viewport(&window),
        layout.keys(),
        &layout,
        &display,
        &user_agent,
        Instant::now(),
    );
    dom::size_canvas(&canvas, scene.surface_size());
    let engine = GalleryEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        scene,
        &display,
    )
    .await?;
    let max_dimension = engine.max_texture_dimension();

    let session: Session = Rc::new(RefCell::new(GallerySession {
        engine,
        layout,
        canvas,
    }));
    load_textures(&session, urls, max_dimension);
    let listeners = register_listeners(&session, &window, &user_agent)?;

    let ticking = session.clone();
    let animation = AnimationLoop::start(move || {
        let mut guard = ticking.borrow_mut();
        let GallerySession { engine, layout, .. } = &mut *guard;
        let _ = engine.render(layout, Instant::now());
    });

    Ok(GalleryHandle {
        session,
        animation,
        listeners,
    })
}

fn register_listeners(
    session: &Session,
    window: &Window,
    user_agent: &str,
) -> Result<ListenerSet, VitrineError> {
    let target: &EventTarget = window.as_ref();
    let mut set = ListenerSet::default();
    for listener in gallery_listeners(user_agent) {
        let session = session.clone();
        let window = window.clone();
        match listener {
            Listener::Resize => set.add(target, "resize", move |_| {
                let vp = dom::viewport(&window);
                session.borrow_mut().handle_event(InputEvent::Resized {
                    width: vp.width,
                    height: vp.height,
                    pixel_ratio: vp.pixel_ratio,
                });
            })?,
            Listener::Scroll => set.add(target, "scroll", move |_| {
                let offset = window.scroll_y().unwrap_or(0.0) as f32;
                session
                    .borrow_mut()
                    .handle_event(InputEvent::Scrolled { offset });
            })?,
            Listener::PointerMove => set.add(target, "mousemove", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                session.borrow_mut().handle_event(InputEvent::PointerMoved {
                    x: mouse.client_x() as f32,
                    y: mouse.client_y() as f32,
                });
            })?,
        }
    }
    log::debug!("gallery registered {} listeners", set.len());
    Ok(set)
}

/// Fetch each distinct image URL once and queue the result for every
/// plane that shows it.
fn load_textures(session: &Session, urls: Vec<Option<String>>, max_dimension: u32) {
    let mut by_url: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    for (index, url) in urls.into_iter().enumerate() {
        let Some(url) = url else {
            session.borrow_mut().engine.queue_texture(
                index,
                Err(VitrineError::ResourceLoad(format!("image {index} has no source"))),
            );
            continue;
        };
        by_url.entry(url).or_default().push(index);
    }

    for (url, indices) in by_url {
        let session = session.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = dom::fetch_bytes(&url)
                .await
                .and_then(|bytes| decode_rgba8(&bytes, max_dimension));
            let mut guard = session.borrow_mut();
            for &index in &indices {
                let copy = match &result {
                    Ok(image) => Ok(image.clone()),
                    Err(e) => Err(VitrineError::ResourceLoad(e.to_string())),
                };
                guard.engine.queue_texture(index, copy);
            }
        });
    }
}
