//! DOM access: element boxes, viewport, canvas lookup, and fetch.

use js_sys::Uint8Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlImageElement, Response, Window};

use crate::camera::Viewport;
use crate::error::VitrineError;
use crate::gallery::{DomRect, ElementKey, LayoutSource};

fn js_error(context: &str, value: &JsValue) -> VitrineError {
    VitrineError::Host(format!("{context}: {value:?}"))
}

/// The browser window.
pub(crate) fn window() -> Result<Window, VitrineError> {
    web_sys::window().ok_or_else(|| VitrineError::Host("no window".into()))
}

/// The window's document.
pub(crate) fn document(window: &Window) -> Result<Document, VitrineError> {
    window
        .document()
        .ok_or_else(|| VitrineError::Host("no document".into()))
}

/// Canvas with id `canvas_id`.
pub(crate) fn canvas(
    document: &Document,
    canvas_id: &str,
) -> Result<HtmlCanvasElement, VitrineError> {
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| VitrineError::Host(format!("no element #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| VitrineError::Host(format!("#{canvas_id} is not a canvas")))
}

/// Current CSS viewport and device pixel ratio.
pub(crate) fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32
    };
    Viewport::new(
        dim(window.inner_width()),
        dim(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

/// The navigator's user agent, empty when unavailable.
pub(crate) fn user_agent(window: &Window) -> String {
    window.navigator().user_agent().unwrap_or_default()
}

/// Size the canvas backing store to `size` physical pixels.
pub(crate) fn size_canvas(canvas: &HtmlCanvasElement, size: (u32, u32)) {
    canvas.set_width(size.0);
    canvas.set_height(size.1);
}

/// Every `<img>` in the document, in document order.
pub(crate) fn images(document: &Document) -> Result<Vec<HtmlImageElement>, VitrineError> {
    let list = document
        .query_selector_all("img")
        .map_err(|e| js_error("querySelectorAll", &e))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .collect())
}

/// Live DOM elements, indexed by [`ElementKey`].
pub(crate) struct DomLayout {
    elements: Vec<Element>,
}

impl DomLayout {
    pub(crate) fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = ElementKey> {
        (0..self.elements.len()).map(ElementKey)
    }
}

impl LayoutSource for DomLayout {
    fn bounding_box(&self, key: ElementKey) -> Option<DomRect> {
        let element = self.elements.get(key.0)?;
        if !element.is_connected() {
            return None;
        }
        let rect = element.get_bounding_client_rect();
        Some(DomRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }
}

/// GET `url` and return the body bytes.
pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>, VitrineError> {
    let window = window()?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| VitrineError::ResourceLoad(format!("{url}: {e:?}")))?
        .dyn_into()
        .map_err(|_| VitrineError::ResourceLoad(format!("{url}: not a response")))?;
    if !response.ok() {
        return Err(VitrineError::ResourceLoad(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let buffer = response
        .array_buffer()
        .map_err(|e| VitrineError::ResourceLoad(format!("{url}: {e:?}")))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| VitrineError::ResourceLoad(format!("{url}: {e:?}")))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}
