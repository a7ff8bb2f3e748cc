//! Browser host: `wasm-bindgen` entry points, the `requestAnimationFrame`
//! loop, DOM layout, and `fetch`.
//!
//! ```js
//! import init, { startGallery } from "./pkg/vitrine.js";
//! await init();
//! const gallery = await startGallery("gl");
//! ```

mod centerpiece;
mod dom;
mod frame;
mod gallery;
mod listener;

pub use centerpiece::{start_centerpiece, CenterpieceHandle};
pub use gallery::{start_gallery, GalleryHandle};

use wasm_bindgen::JsValue;

use crate::error::VitrineError;

/// Route `log` to the browser console and panics to `console.error`.
fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialized when a second demo starts on the same page.
    let _ = console_log::init_with_level(log::Level::Info);
}

impl From<VitrineError> for JsValue {
    fn from(error: VitrineError) -> Self {
        Self::from_str(&error.to_string())
    }
}
