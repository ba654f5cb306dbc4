//! # VectorCraft Canvas Core
//!
//! The canvas composition layer: a retained scene of drawables
//! (image/text/shape) plus the controllers that mediate between it and an
//! editing UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              vectorcraft-core               │
//! ├──────────────────┬──────────────────────────┤
//! │  Scene           │  Controllers             │
//! │  - Drawables     │  - Layer manager         │
//! │  - Z-order       │  - Transform (flip/align)│
//! │  - Selection     │  - Color adjustments     │
//! │  - Dirty flag    │  - Text                  │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Every controller takes an explicit `&mut Scene`; there is no ambient
//! state. The core is single-threaded and synchronous: all mutations
//! originate from UI event handlers, exclusive ownership is enforced by
//! the borrow checker, and invalid targets are silent no-ops rather than
//! errors.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod drawable;
pub mod error;
pub mod graph;
pub mod layers;
pub mod scene;
pub mod text;
pub mod transform;

pub use color::{Adjustments, ColorController, Filter};
pub use drawable::{
    BlendMode, Bounds, Drawable, DrawableId, DrawableKind, FontStyle, FontWeight, ImageFormat,
    ShapeKind, TextAlign, TextStyle, Transform,
};
pub use error::{SceneError, SceneResult};
pub use layers::{LayerKind, LayerManager, LayerView, DUPLICATE_OFFSET};
pub use scene::Scene;
pub use text::{TextController, DEFAULT_TEXT};
pub use transform::{Alignment, TransformController};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
