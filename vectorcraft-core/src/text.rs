//! Text controller - creation and mutation of editable text layers.

use crate::graph;
use crate::{
    Drawable, DrawableId, DrawableKind, FontStyle, FontWeight, Scene, TextAlign, TextStyle,
    Transform,
};

/// Default content for newly added text layers.
pub const DEFAULT_TEXT: &str = "Your Text";

/// Rough advance width per glyph as a fraction of the font size, used to
/// size the text box without font shaping.
const GLYPH_ADVANCE_EM: f32 = 0.6;

/// Creates and mutates text drawables in an explicitly injected scene.
///
/// Mutators target the primary selection by default and are silent no-ops
/// on non-text, locked, or unknown targets. No validation is performed
/// beyond what UI widgets already constrain.
pub struct TextController<'a> {
    scene: &'a mut Scene,
}

impl<'a> TextController<'a> {
    /// Create a controller over the given scene.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    /// Type predicate distinguishing text drawables from other variants.
    #[must_use]
    pub fn is_text(drawable: &Drawable) -> bool {
        drawable.is_text()
    }

    /// Insert a new text drawable centered on the canvas with default
    /// styling, select it, and return its ID.
    pub fn add_text(&mut self, content: Option<&str>) -> DrawableId {
        let content = content.unwrap_or(DEFAULT_TEXT);
        let style = TextStyle::default();

        let line_count = content.lines().count().max(1);
        let longest_line = content.lines().map(str::len).max().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let width = (longest_line as f32 * style.font_size * GLYPH_ADVANCE_EM).max(1.0);
        #[allow(clippy::cast_precision_loss)]
        let height = line_count as f32 * style.font_size * style.line_height;

        let mut drawable = Drawable::new(DrawableKind::Text {
            content: content.to_string(),
            style,
        })
        .with_transform(Transform {
            x: (self.scene.width - width) / 2.0,
            y: (self.scene.height - height) / 2.0,
            width,
            height,
            ..Default::default()
        });

        // Returning the ID is the first external reference, so mint it now.
        let id = graph::identity_of(&mut drawable);
        self.scene.add(drawable);
        self.scene.select_only(&id);
        tracing::debug!("Added text layer {id}");
        id
    }

    /// Replace the text content.
    pub fn set_content(&mut self, target: Option<&DrawableId>, content: &str) -> bool {
        self.with_text(target, |c, _| *c = content.to_string())
    }

    /// Set the font family.
    pub fn set_font_family(&mut self, target: Option<&DrawableId>, family: &str) -> bool {
        self.with_text(target, |_, s| s.font_family = family.to_string())
    }

    /// Set the font size in pixels.
    pub fn set_font_size(&mut self, target: Option<&DrawableId>, size: f32) -> bool {
        self.with_text(target, |_, s| s.font_size = size)
    }

    /// Set the font weight.
    pub fn set_weight(&mut self, target: Option<&DrawableId>, weight: FontWeight) -> bool {
        self.with_text(target, |_, s| s.weight = weight)
    }

    /// Set the font style.
    pub fn set_style(&mut self, target: Option<&DrawableId>, style: FontStyle) -> bool {
        self.with_text(target, |_, s| s.style = style)
    }

    /// Toggle or set the underline decoration.
    pub fn set_underline(&mut self, target: Option<&DrawableId>, underline: bool) -> bool {
        self.with_text(target, |_, s| s.underline = underline)
    }

    /// Set the paragraph alignment.
    pub fn set_alignment(&mut self, target: Option<&DrawableId>, align: TextAlign) -> bool {
        self.with_text(target, |_, s| s.align = align)
    }

    /// Set the fill color (hex).
    pub fn set_fill(&mut self, target: Option<&DrawableId>, fill: &str) -> bool {
        self.with_text(target, |_, s| s.fill = fill.to_string())
    }

    /// Set the additional letter spacing in pixels.
    pub fn set_letter_spacing(&mut self, target: Option<&DrawableId>, spacing: f32) -> bool {
        self.with_text(target, |_, s| s.letter_spacing = spacing)
    }

    /// Set the line height as a multiple of the font size.
    pub fn set_line_height(&mut self, target: Option<&DrawableId>, line_height: f32) -> bool {
        self.with_text(target, |_, s| s.line_height = line_height)
    }

    fn with_text(
        &mut self,
        target: Option<&DrawableId>,
        apply: impl FnOnce(&mut String, &mut TextStyle),
    ) -> bool {
        let Some(id) = target.copied().or_else(|| self.scene.primary_selection()) else {
            return false;
        };
        let applied = match self.scene.get_mut(&id) {
            Some(drawable) if !drawable.locked => match &mut drawable.kind {
                DrawableKind::Text { content, style } => {
                    apply(content, style);
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if applied {
            self.scene.mark_dirty();
        }
        applied
    }
}
