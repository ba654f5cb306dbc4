//! Scene export to raster, vector, and snapshot formats.
//!
//! Renders a [`Scene`] to SVG directly, and to PNG through the
//! usvg/resvg/tiny-skia rasterization pipeline. The JSON snapshot is the
//! scene's own serialized form (custom fields restricted to id and name);
//! it is an opaque export, not a save/load format.

use std::fmt::Write;
use std::path::Path;

use base64::Engine as _;
use vectorcraft_core::{
    BlendMode, Drawable, DrawableKind, Filter, FontStyle, FontWeight, Scene, ShapeKind, TextAlign,
    Transform,
};

use crate::error::{ExportError, ExportResult};

/// Raster resolution multiplier relative to the scene's logical size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportScale {
    /// 1x - logical resolution.
    #[default]
    X1,
    /// 2x.
    X2,
    /// 4x.
    X4,
}

impl ExportScale {
    /// Multiplier as a scale factor.
    #[must_use]
    pub fn factor(self) -> f32 {
        match self {
            Self::X1 => 1.0,
            Self::X2 => 2.0,
            Self::X4 => 4.0,
        }
    }
}

/// Exports a [`Scene`] to PNG, SVG, or a JSON project snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneExporter;

impl SceneExporter {
    /// Create a new exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the scene to a standalone SVG document.
    ///
    /// Shape geometry is preserved as vector elements, text as `<text>`
    /// elements, and image layers as embedded raster references. Image
    /// filter lists are compiled to SVG `<filter>` primitives.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be assembled.
    #[allow(clippy::unused_self)]
    pub fn to_svg(&self, scene: &Scene) -> ExportResult<String> {
        Ok(svg_document(scene))
    }

    /// Rasterize the scene to PNG bytes at the given multiplier.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_png(&self, scene: &Scene, scale: ExportScale) -> ExportResult<Vec<u8>> {
        let svg = svg_document(scene);
        let factor = scale.factor();
        let out_w = ((scene.width.max(1.0)) * factor) as u32;
        let out_h = ((scene.height.max(1.0)) * factor) as u32;

        let pixmap = rasterize(&svg, out_w.max(1), out_h.max(1), factor)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))?;

        tracing::debug!("Exported {out_w}x{out_h} PNG ({} bytes)", png.len());
        Ok(png)
    }

    /// Rasterize the scene to PNG and wrap it as a `data:image/png;base64,`
    /// URL.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or encoding fails.
    pub fn png_data_url(&self, scene: &Scene, scale: ExportScale) -> ExportResult<String> {
        let png = self.to_png(scene, scale)?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Serialize the scene to a pretty-printed JSON project snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[allow(clippy::unused_self)]
    pub fn snapshot_json(&self, scene: &Scene) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(scene)?)
    }

    /// Export the scene as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering, encoding, or writing fails.
    pub fn write_png(
        &self,
        scene: &Scene,
        scale: ExportScale,
        path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let png = self.to_png(scene, scale)?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Export the scene as an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_svg(&self, scene: &Scene, path: impl AsRef<Path>) -> ExportResult<()> {
        let svg = self.to_svg(scene)?;
        std::fs::write(path, svg)?;
        Ok(())
    }

    /// Export the scene as a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_snapshot(&self, scene: &Scene, path: impl AsRef<Path>) -> ExportResult<()> {
        let json = self.snapshot_json(scene)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Assemble the full SVG document for a scene.
pub(crate) fn svg_document(scene: &Scene) -> String {
    let width = scene.width.max(1.0);
    let height = scene.height.max(1.0);

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );

    // Background
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&scene.background),
    );

    // Filter definitions for image layers, keyed by z-index.
    let mut defs = String::new();
    for (z_index, drawable) in scene.drawables().enumerate() {
        if !drawable.visible {
            continue;
        }
        if let DrawableKind::Image { filters, .. } = &drawable.kind {
            if !filters.is_empty() {
                filter_def(&mut defs, &format!("filt{z_index}"), filters);
            }
        }
    }
    if !defs.is_empty() {
        let _ = write!(svg, "<defs>{defs}</defs>");
    }

    // Drawables bottom-to-top; scene order is already z-order.
    for (z_index, drawable) in scene.drawables().enumerate() {
        if !drawable.visible {
            continue;
        }
        let filter_id = match &drawable.kind {
            DrawableKind::Image { filters, .. } if !filters.is_empty() => {
                Some(format!("filt{z_index}"))
            }
            _ => None,
        };
        drawable_svg(&mut svg, drawable, filter_id.as_deref());
    }

    svg.push_str("</svg>");
    svg
}

/// Render one drawable, wrapped in a group carrying transform, opacity, and
/// blend mode.
pub(crate) fn drawable_svg(svg: &mut String, drawable: &Drawable, filter_id: Option<&str>) {
    svg.push_str("<g");
    let transform = transform_attr(&drawable.transform);
    if !transform.is_empty() {
        let _ = write!(svg, " transform=\"{transform}\"");
    }
    let opacity = (drawable.opacity / 100.0).clamp(0.0, 1.0);
    if opacity < 1.0 {
        let _ = write!(svg, " opacity=\"{opacity}\"");
    }
    if drawable.blend_mode != BlendMode::Normal {
        let _ = write!(
            svg,
            " style=\"mix-blend-mode:{}\"",
            drawable.blend_mode.css_keyword()
        );
    }
    svg.push('>');

    let t = &drawable.transform;
    match &drawable.kind {
        DrawableKind::Image { src, .. } => {
            let _ = write!(
                svg,
                "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" href=\"{}\"",
                t.width,
                t.height,
                escape_xml(src),
            );
            if let Some(id) = filter_id {
                let _ = write!(svg, " filter=\"url(#{id})\"");
            }
            svg.push_str("/>");
        }

        DrawableKind::Text { content, style } => {
            let (anchor, text_x) = match style.align {
                TextAlign::Left => ("start", 0.0),
                TextAlign::Center => ("middle", t.width / 2.0),
                TextAlign::Right => ("end", t.width),
            };
            let _ = write!(
                svg,
                "<text x=\"{text_x}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"",
                style.font_size,
                escape_xml(&style.font_family),
                style.font_size,
                escape_xml(&style.fill),
            );
            if style.weight == FontWeight::Bold {
                svg.push_str(" font-weight=\"bold\"");
            }
            if style.style == FontStyle::Italic {
                svg.push_str(" font-style=\"italic\"");
            }
            if style.underline {
                svg.push_str(" text-decoration=\"underline\"");
            }
            if style.letter_spacing != 0.0 {
                let _ = write!(svg, " letter-spacing=\"{}\"", style.letter_spacing);
            }
            if anchor != "start" {
                let _ = write!(svg, " text-anchor=\"{anchor}\"");
            }
            svg.push('>');

            let mut lines = content.lines();
            if let Some(first) = lines.next() {
                svg.push_str(&escape_xml(first));
            }
            let line_advance = style.font_size * style.line_height;
            for line in lines {
                let _ = write!(
                    svg,
                    "<tspan x=\"{text_x}\" dy=\"{line_advance}\">{}</tspan>",
                    escape_xml(line),
                );
            }
            svg.push_str("</text>");
        }

        DrawableKind::Shape {
            shape,
            fill,
            stroke,
            stroke_width,
        } => {
            let fill = escape_xml(fill);
            let stroke = escape_xml(stroke);
            match shape {
                ShapeKind::Rect { corner_radius } => {
                    let _ = write!(
                        svg,
                        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"",
                        t.width, t.height,
                    );
                    if *corner_radius > 0.0 {
                        let _ = write!(svg, " rx=\"{corner_radius}\"");
                    }
                    let _ = write!(
                        svg,
                        " fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    );
                }
                ShapeKind::Ellipse => {
                    let _ = write!(
                        svg,
                        "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                        t.width / 2.0,
                        t.height / 2.0,
                        t.width / 2.0,
                        t.height / 2.0,
                    );
                }
                ShapeKind::Line { x2, y2 } => {
                    let _ = write!(
                        svg,
                        "<line x1=\"0\" y1=\"0\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    );
                }
            }
        }
    }

    svg.push_str("</g>");
}

/// SVG transform attribute for a drawable's transform, omitting identity
/// parts. Content is drawn in local coordinates at the intrinsic size;
/// flips are negative scales compensated by a local translate so the box
/// stays in place.
fn transform_attr(t: &Transform) -> String {
    let mut attr = String::new();
    if t.x != 0.0 || t.y != 0.0 {
        let _ = write!(attr, "translate({} {})", t.x, t.y);
    }
    if t.rotation != 0.0 {
        if !attr.is_empty() {
            attr.push(' ');
        }
        let _ = write!(
            attr,
            "rotate({} {} {})",
            t.rotation,
            t.scaled_width() / 2.0,
            t.scaled_height() / 2.0,
        );
    }
    let sx = if t.flip_x { -t.scale_x } else { t.scale_x };
    let sy = if t.flip_y { -t.scale_y } else { t.scale_y };
    if sx != 1.0 || sy != 1.0 {
        if !attr.is_empty() {
            attr.push(' ');
        }
        let _ = write!(attr, "scale({sx} {sy})");
    }
    if t.flip_x || t.flip_y {
        let ox = if t.flip_x { -t.width } else { 0.0 };
        let oy = if t.flip_y { -t.height } else { 0.0 };
        if !attr.is_empty() {
            attr.push(' ');
        }
        let _ = write!(attr, "translate({ox} {oy})");
    }
    attr
}

/// Compile a filter descriptor list to an SVG `<filter>` definition.
pub(crate) fn filter_def(svg: &mut String, id: &str, filters: &[Filter]) {
    let _ = write!(
        svg,
        "<filter id=\"{id}\" color-interpolation-filters=\"sRGB\">",
    );
    for filter in filters {
        match filter {
            Filter::HueRotate { rotation } => {
                let _ = write!(
                    svg,
                    "<feColorMatrix type=\"hueRotate\" values=\"{}\"/>",
                    rotation * 180.0,
                );
            }
            Filter::Saturation { amount } => {
                let _ = write!(
                    svg,
                    "<feColorMatrix type=\"saturate\" values=\"{}\"/>",
                    (1.0 + amount).max(0.0),
                );
            }
            Filter::Brightness { amount } => {
                component_transfer(svg, "linear", &format!("slope=\"1\" intercept=\"{amount}\""));
            }
            Filter::Contrast { amount } => {
                let slope = 1.0 + amount;
                let intercept = -amount / 2.0;
                component_transfer(
                    svg,
                    "linear",
                    &format!("slope=\"{slope}\" intercept=\"{intercept}\""),
                );
            }
            Filter::Grayscale => {
                svg.push_str("<feColorMatrix type=\"saturate\" values=\"0\"/>");
            }
            Filter::Sepia => {
                svg.push_str(
                    "<feColorMatrix type=\"matrix\" values=\"\
                     0.393 0.769 0.189 0 0 \
                     0.349 0.686 0.168 0 0 \
                     0.272 0.534 0.131 0 0 \
                     0 0 0 1 0\"/>",
                );
            }
            Filter::Invert => {
                component_transfer(svg, "table", "tableValues=\"1 0\"");
            }
        }
    }
    svg.push_str("</filter>");
}

/// Emit an `feComponentTransfer` applying the same function to R, G, and B.
fn component_transfer(svg: &mut String, kind: &str, params: &str) {
    svg.push_str("<feComponentTransfer>");
    for channel in ["R", "G", "B"] {
        let _ = write!(svg, "<feFunc{channel} type=\"{kind}\" {params}/>");
    }
    svg.push_str("</feComponentTransfer>");
}

/// Rasterize an SVG document to a pixmap of the given output size, scaling
/// the viewBox by `factor`.
pub(crate) fn rasterize(
    svg: &str,
    out_w: u32,
    out_h: u32,
    factor: f32,
) -> ExportResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| ExportError::Svg(format!("SVG parsing failed: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(out_w, out_h)
        .ok_or_else(|| ExportError::Svg("Failed to create pixmap".to_string()))?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(factor, factor),
        &mut pixmap.as_mut(),
    );

    Ok(pixmap)
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorcraft_core::{Adjustments, ColorController, Drawable, ImageFormat, TextStyle};

    fn text_drawable(content: &str, x: f32, y: f32) -> Drawable {
        Drawable::new(DrawableKind::Text {
            content: content.to_string(),
            style: TextStyle {
                font_size: 16.0,
                fill: "#000000".to_string(),
                ..Default::default()
            },
        })
        .with_transform(Transform {
            x,
            y,
            width: 200.0,
            height: 30.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_svg_export_empty_scene() {
        let scene = Scene::new(800.0, 600.0);
        let svg = SceneExporter::new().to_svg(&scene).expect("svg export");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_svg_export_with_text() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(text_drawable("Hello World", 10.0, 20.0));

        let svg = SceneExporter::new().to_svg(&scene).expect("svg export");
        assert!(svg.contains("Hello World"));
        assert!(svg.contains("font-size=\"16\""));
        assert!(svg.contains("translate(10 20)"));
    }

    #[test]
    fn test_xml_escaping() {
        let mut scene = Scene::new(200.0, 100.0);
        scene.add(text_drawable("A < B & C > D", 10.0, 20.0));

        let svg = SceneExporter::new().to_svg(&scene).expect("svg");
        assert!(svg.contains("A &lt; B &amp; C &gt; D"));
    }

    #[test]
    fn test_hidden_drawables_are_skipped() {
        let mut scene = Scene::new(200.0, 100.0);
        scene.add(text_drawable("ghost", 0.0, 0.0));
        scene
            .drawables_mut()
            .for_each(|drawable| drawable.visible = false);

        let svg = SceneExporter::new().to_svg(&scene).expect("svg");
        assert!(!svg.contains("ghost"));
    }

    #[test]
    fn test_flip_is_negative_scale() {
        let mut scene = Scene::new(200.0, 200.0);
        let mut drawable = text_drawable("flipped", 10.0, 10.0);
        drawable.transform.flip_x = true;
        scene.add(drawable);

        let svg = SceneExporter::new().to_svg(&scene).expect("svg");
        assert!(svg.contains("scale(-1 1)"));
        assert!(svg.contains("translate(-200 0)"));
    }

    #[test]
    fn test_filter_defs_emitted_for_filtered_images() {
        let mut scene = Scene::new(200.0, 200.0);
        scene.add(Drawable::new(DrawableKind::Image {
            src: "data:image/png;base64,".to_string(),
            format: ImageFormat::Png,
            filters: Vec::new(),
        }));
        let id = scene.drawable_at(10.0, 10.0).expect("hit");
        ColorController::new(&mut scene).apply_adjustments(
            Some(&id),
            &Adjustments {
                hue_degrees: 90.0,
                contrast: 0.2,
                ..Default::default()
            },
        );

        let svg = SceneExporter::new().to_svg(&scene).expect("svg");
        assert!(svg.contains("<defs>"));
        assert!(svg.contains("type=\"hueRotate\" values=\"90\""));
        assert!(svg.contains("filter=\"url(#filt0)\""));
        assert!(svg.contains("feComponentTransfer"));
    }

    #[test]
    fn test_unfiltered_images_have_no_defs() {
        let mut scene = Scene::new(200.0, 200.0);
        scene.add(Drawable::new(DrawableKind::Image {
            src: "data:image/png;base64,".to_string(),
            format: ImageFormat::Png,
            filters: Vec::new(),
        }));

        let svg = SceneExporter::new().to_svg(&scene).expect("svg");
        assert!(!svg.contains("<defs>"));
        assert!(!svg.contains("filter="));
    }

    #[test]
    fn test_png_export_produces_valid_bytes() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.add(text_drawable("Test", 10.0, 20.0));

        let png = SceneExporter::new()
            .to_png(&scene, ExportScale::X1)
            .expect("png export");
        // PNG magic bytes: \x89PNG
        assert!(png.len() > 8);
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_png_multiplier_scales_output() {
        let scene = Scene::new(100.0, 50.0);
        let exporter = SceneExporter::new();

        for (scale, expected) in [
            (ExportScale::X1, (100, 50)),
            (ExportScale::X2, (200, 100)),
            (ExportScale::X4, (400, 200)),
        ] {
            let png = exporter.to_png(&scene, scale).expect("png");
            let decoded = image::load_from_memory(&png).expect("decodable");
            assert_eq!(
                (decoded.width(), decoded.height()),
                expected,
                "wrong dimensions at {scale:?}"
            );
        }
    }

    #[test]
    fn test_png_data_url_prefix() {
        let scene = Scene::new(50.0, 50.0);
        let url = SceneExporter::new()
            .png_data_url(&scene, ExportScale::X1)
            .expect("data url");
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_snapshot_contains_custom_name_and_geometry() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(text_drawable("Headline", 10.0, 20.0));
        let id = scene.drawable_at(15.0, 25.0).expect("hit");
        scene.get_mut(&id).expect("present").name = Some("Campaign title".to_string());

        let json = SceneExporter::new().snapshot_json(&scene).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        let drawable = &value["drawables"][0];
        assert_eq!(drawable["name"], "Campaign title");
        assert_eq!(drawable["transform"]["x"], 10.0);
        assert!(drawable["id"].is_string());
        assert_eq!(value["width"], 800.0);
    }
}
