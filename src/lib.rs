// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! WebGPU showcase scenes built on wgpu.
//!
//! Two demos share one camera, shader, and post-processing stack:
//!
//! - **Gallery**: every `<img>` on a page is mirrored as a textured plane
//!   in a transparent canvas layered over the document, kept pixel-aligned
//!   while the page scrolls, with a pointer-driven hover distortion.
//! - **Centerpiece**: a torus knot inside a drifting particle field, lit
//!   by an equirectangular environment map and finished with bloom. Its
//!   `bloom` and `material` parameters are described by a JSON Schema and
//!   editable live.
//!
//! # Key entry points
//!
//! - [`gallery::GalleryScene`] / [`centerpiece::CenterpieceScene`] - the
//!   GPU-free scene state, driven by [`input::InputEvent`]s
//! - [`engine::GalleryEngine`] / [`engine::CenterpieceEngine`] - GPU
//!   rendering of those scenes
//! - [`options::Options`] - tunable parameters and TOML presets
//! - `Viewer` (feature `viewer`) - native winit window for the centerpiece
//! - `web::start_gallery` / `web::start_centerpiece` (feature `web`) -
//!   browser entry points
//!
//! # Architecture
//!
//! Hosts translate platform events into [`input::InputEvent`]s and call
//! the engine's `render` once per display refresh. Textures and the
//! environment map load asynchronously; the host queues each result on the
//! engine, which applies it at the start of the next frame. The centerpiece
//! draws into an HDR target; bloom and the tone-mapping composite then
//! write the swapchain.

pub mod camera;
pub mod centerpiece;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::{CenterpieceEngine, GalleryEngine};
pub use error::VitrineError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
