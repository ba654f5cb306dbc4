//! Drawables - the building blocks of scenes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Filter;

/// Unique identifier for a drawable.
///
/// Minted lazily by the scene graph adapter on first external reference and
/// never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawableId(Uuid);

impl DrawableId {
    /// Create a new unique drawable ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DrawableId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DrawableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blend mode applied when compositing a drawable over the layers below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Source-over compositing.
    #[default]
    Normal,
    /// Multiply channel values.
    Multiply,
    /// Inverted multiply.
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// Keep the darker channel value.
    Darken,
    /// Keep the lighter channel value.
    Lighten,
    /// Absolute channel difference.
    Difference,
    /// Difference with reduced contrast.
    Exclusion,
}

impl BlendMode {
    /// CSS `mix-blend-mode` keyword for this mode.
    #[must_use]
    pub fn css_keyword(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }
}

/// Axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Bounds {
    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Check if a point lies within the box.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Transform for positioning and sizing drawables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Intrinsic width in pixels.
    pub width: f32,
    /// Intrinsic height in pixels.
    pub height: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Mirrored horizontally.
    pub flip_x: bool,
    /// Mirrored vertically.
    pub flip_y: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl Transform {
    /// Effective (scaled) width.
    #[must_use]
    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale_x
    }

    /// Effective (scaled) height.
    #[must_use]
    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale_y
    }

    /// Axis-aligned bounds of the transformed drawable.
    ///
    /// Rotation is ignored: alignment and hit-testing operate on the
    /// unrotated scaled box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            left: self.x,
            top: self.y,
            right: self.x + self.scaled_width(),
            bottom: self.y + self.scaled_height(),
        }
    }
}

/// Supported image source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// WebP image.
    WebP,
    /// Unknown/other format.
    Unknown,
}

/// Font weight for text drawables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font style for text drawables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
}

/// Paragraph alignment for text drawables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center each line.
    Center,
    /// Align to the right edge.
    Right,
}

/// Styling attributes of a text drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Font style.
    pub style: FontStyle,
    /// Underline decoration.
    pub underline: bool,
    /// Paragraph alignment.
    pub align: TextAlign,
    /// Fill color as hex.
    pub fill: String,
    /// Additional letter spacing in pixels.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 48.0,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            underline: false,
            align: TextAlign::Left,
            fill: "#ffffff".to_string(),
            letter_spacing: 0.0,
            line_height: 1.16,
        }
    }
}

/// Geometric primitive of a shape drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle, optionally with rounded corners.
    Rect {
        /// Corner radius in pixels.
        corner_radius: f32,
    },
    /// Ellipse inscribed in the transform bounds.
    Ellipse,
    /// Line from the transform origin to an endpoint.
    Line {
        /// Endpoint X relative to the drawable origin.
        x2: f32,
        /// Endpoint Y relative to the drawable origin.
        y2: f32,
    },
}

/// The type of content a drawable contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "lowercase")]
pub enum DrawableKind {
    /// A raster image layer.
    Image {
        /// Image source URI or base64 data URL.
        src: String,
        /// Source format.
        format: ImageFormat,
        /// Applied filter descriptors, bottom of the pipeline first.
        ///
        /// Replaced wholesale on each adjustment application.
        filters: Vec<Filter>,
    },

    /// An editable text layer.
    Text {
        /// Text content.
        content: String,
        /// Styling attributes.
        style: TextStyle,
    },

    /// A vector shape layer.
    Shape {
        /// Geometric primitive.
        shape: ShapeKind,
        /// Fill color as hex.
        fill: String,
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in pixels.
        stroke_width: f32,
    },
}

impl DrawableKind {
    /// Human-readable label for the kind, used in default layer names.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image { .. } => "Image",
            Self::Text { .. } => "Text",
            Self::Shape { .. } => "Shape",
        }
    }
}

/// A single visual element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    /// Stable identity, minted lazily on first external reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<DrawableId>,
    /// User-editable display name. `None` means the positional default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Content variant.
    pub kind: DrawableKind,
    /// Position and size.
    pub transform: Transform,
    /// Whether the drawable is rendered.
    pub visible: bool,
    /// Locked drawables are excluded from hit-testing, selection, and edits.
    pub locked: bool,
    /// Opacity in percent (0-100).
    pub opacity: f32,
    /// Compositing blend mode.
    pub blend_mode: BlendMode,
}

impl Drawable {
    /// Create a new drawable with the given kind.
    #[must_use]
    pub fn new(kind: DrawableKind) -> Self {
        Self {
            id: None,
            name: None,
            kind,
            transform: Transform::default(),
            visible: true,
            locked: false,
            opacity: 100.0,
            blend_mode: BlendMode::Normal,
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The assigned identity, if one has been minted.
    #[must_use]
    pub fn id(&self) -> Option<DrawableId> {
        self.id
    }

    /// Display name, falling back to the positional default label
    /// (`"{Kind} {z_index + 1}"`).
    #[must_use]
    pub fn display_name(&self, z_index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.kind.label(), z_index + 1))
    }

    /// Axis-aligned bounds of this drawable.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.transform.bounds()
    }

    /// Check if a point (in canvas coordinates) is within this drawable.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }

    /// Whether this is an image drawable.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self.kind, DrawableKind::Image { .. })
    }

    /// Whether this is a text drawable.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, DrawableKind::Text { .. })
    }

    /// Whether this is a shape drawable.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self.kind, DrawableKind::Shape { .. })
    }
}
