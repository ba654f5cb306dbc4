//! # VectorCraft Export
//!
//! The export boundary of the canvas composition layer: serializes a scene
//! to raster (PNG at a 1x/2x/4x multiplier), vector (SVG), or a JSON
//! project snapshot, and decodes image input (file uploads, AI-generated
//! data URLs) into image drawables.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              vectorcraft-export               │
//! ├───────────────────────┬───────────────────────┤
//! │  Output               │  Input                │
//! │  - SVG document       │  - Upload bytes       │
//! │  - PNG (resvg)        │  - Base64 data URLs   │
//! │  - JSON snapshot      │  - Layer thumbnails   │
//! └───────────────────────┴───────────────────────┘
//! ```
//!
//! All operations are synchronous and run to completion within one call;
//! failures are typed [`ExportError`]s, never panics.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod image;

pub use error::{ExportError, ExportResult};
pub use export::{ExportScale, SceneExporter};
pub use image::{
    detect_format, format_from_extension, format_from_mime, image_from_bytes, image_from_data_url,
    layer_thumbnail, list_with_thumbnails,
};
