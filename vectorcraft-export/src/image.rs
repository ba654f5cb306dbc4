//! Image input boundary and layer thumbnails.
//!
//! A scene is seeded with image drawables from two sources: raw bytes from
//! a user file upload, or a base64 data URL handed over by the generation
//! collaborator. Both paths decode the pixels once to size the drawable,
//! then keep the encoded source as a data URL.

use std::fmt::Write;

use base64::Engine as _;
use vectorcraft_core::{
    Drawable, DrawableId, DrawableKind, ImageFormat, LayerManager, LayerView, Scene, Transform,
};

use crate::error::{ExportError, ExportResult};
use crate::export;

/// Detect an image format from magic bytes.
#[must_use]
pub fn detect_format(data: &[u8]) -> ImageFormat {
    if data.len() < 4 {
        return ImageFormat::Unknown;
    }

    // PNG: 89 50 4E 47
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return ImageFormat::Png;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return ImageFormat::Jpeg;
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return ImageFormat::WebP;
    }

    ImageFormat::Unknown
}

/// Detect an image format from a MIME type.
#[must_use]
pub fn format_from_mime(mime: &str) -> ImageFormat {
    match mime.to_lowercase().as_str() {
        "image/png" => ImageFormat::Png,
        "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
        "image/webp" => ImageFormat::WebP,
        _ => ImageFormat::Unknown,
    }
}

/// Detect an image format from a file extension.
#[must_use]
pub fn format_from_extension(ext: &str) -> ImageFormat {
    match ext.to_lowercase().as_str() {
        "png" => ImageFormat::Png,
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "webp" => ImageFormat::WebP,
        _ => ImageFormat::Unknown,
    }
}

/// MIME type for a format, used when re-encoding as a data URL.
fn mime_of(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Unknown => "application/octet-stream",
    }
}

/// Build an image drawable from uploaded raw bytes.
///
/// The drawable is sized to the image's intrinsic dimensions and positioned
/// at the origin; the caller inserts it into the scene.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
#[allow(clippy::cast_precision_loss)]
pub fn image_from_bytes(data: &[u8]) -> ExportResult<Drawable> {
    let format = detect_format(data);
    let decoded = image::load_from_memory(data)
        .map_err(|e| ExportError::Decode(format!("not a decodable image: {e}")))?;
    let (width, height) = (decoded.width(), decoded.height());

    let src = format!(
        "data:{};base64,{}",
        mime_of(format),
        base64::engine::general_purpose::STANDARD.encode(data)
    );

    tracing::debug!("Decoded {width}x{height} upload ({format:?})");
    Ok(Drawable::new(DrawableKind::Image {
        src,
        format,
        filters: Vec::new(),
    })
    .with_transform(Transform {
        width: width as f32,
        height: height as f32,
        ..Default::default()
    }))
}

/// Build an image drawable from a base64 data URL, the hand-off format of
/// the generation collaborator.
///
/// # Errors
///
/// Returns an error if the URL is not a `data:` URL with a base64 payload,
/// or the payload is not a decodable image.
pub fn image_from_data_url(url: &str) -> ExportResult<Drawable> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::Decode("not a data URL".to_string()))?;
    let (_mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ExportError::Decode("missing base64 payload".to_string()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ExportError::Decode(format!("invalid base64 payload: {e}")))?;

    image_from_bytes(&bytes)
}

/// Rasterize a single drawable at low resolution and return it as a PNG
/// data URL. Regenerated on every call; nothing is cached.
///
/// # Errors
///
/// Returns an error if the drawable is unknown or rasterization fails.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn layer_thumbnail(scene: &Scene, id: &DrawableId, max_px: u32) -> ExportResult<String> {
    let drawable = scene
        .get(id)
        .ok_or_else(|| ExportError::NotFound(id.to_string()))?;

    let bounds = drawable.bounds();
    let (w, h) = (bounds.width().max(1.0), bounds.height().max(1.0));
    #[allow(clippy::cast_precision_loss)]
    let factor = (max_px as f32 / w.max(h)).min(1.0);
    let out_w = ((w * factor) as u32).max(1);
    let out_h = ((h * factor) as u32).max(1);

    // Mini document framing just this drawable, even when hidden in the
    // scene: the panel still shows a preview for hidden layers.
    let mut shown = drawable.clone();
    shown.visible = true;
    let mut svg = String::with_capacity(1024);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"{} {} {w} {h}\">",
        bounds.left, bounds.top,
    );
    let filter_id = match &shown.kind {
        DrawableKind::Image { filters, .. } if !filters.is_empty() => {
            let mut defs = String::new();
            export::filter_def(&mut defs, "thumb", filters);
            let _ = write!(svg, "<defs>{defs}</defs>");
            Some("thumb")
        }
        _ => None,
    };
    export::drawable_svg(&mut svg, &shown, filter_id);
    svg.push_str("</svg>");

    let pixmap = export::rasterize(&svg, out_w, out_h, factor)?;
    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))?;

    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// The layer list with thumbnails filled in.
///
/// # Errors
///
/// Returns an error if any thumbnail fails to rasterize.
pub fn list_with_thumbnails(scene: &mut Scene, max_px: u32) -> ExportResult<Vec<LayerView>> {
    let mut layers = LayerManager::new(scene).list();
    for layer in &mut layers {
        layer.thumbnail = Some(layer_thumbnail(scene, &layer.id, max_px)?);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest valid 1x1 PNG, generated once with the image crate.
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode");
        buf.into_inner()
    }

    #[test]
    fn test_format_sniffing() {
        assert_eq!(detect_format(&tiny_png()), ImageFormat::Png);
        assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(detect_format(b"RIFF\x00\x00\x00\x00WEBP"), ImageFormat::WebP);
        assert_eq!(detect_format(b"xx"), ImageFormat::Unknown);

        assert_eq!(format_from_mime("image/PNG"), ImageFormat::Png);
        assert_eq!(format_from_extension("JPEG"), ImageFormat::Jpeg);
        assert_eq!(format_from_extension("gif"), ImageFormat::Unknown);
    }

    #[test]
    fn test_image_from_bytes_sizes_drawable() {
        let drawable = image_from_bytes(&tiny_png()).expect("decoded");
        assert!(drawable.is_image());
        assert_eq!(drawable.transform.width, 1.0);
        assert_eq!(drawable.transform.height, 1.0);

        let DrawableKind::Image { src, format, filters } = &drawable.kind else {
            panic!("expected image");
        };
        assert!(src.starts_with("data:image/png;base64,"));
        assert_eq!(*format, ImageFormat::Png);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_data_url_round_in() {
        let url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(tiny_png())
        );
        let drawable = image_from_data_url(&url).expect("decoded");
        assert!(drawable.is_image());
    }

    #[test]
    fn test_malformed_inputs_error_without_panic() {
        assert!(matches!(
            image_from_data_url("http://example.com/x.png"),
            Err(ExportError::Decode(_))
        ));
        assert!(matches!(
            image_from_data_url("data:image/png;base64,@@@"),
            Err(ExportError::Decode(_))
        ));
        assert!(matches!(
            image_from_bytes(b"not an image"),
            Err(ExportError::Decode(_))
        ));
    }

    #[test]
    fn test_thumbnail_is_png_data_url() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add(image_from_bytes(&tiny_png()).expect("decoded"));
        let id = scene.drawable_at(0.5, 0.5).expect("hit");

        let thumb = layer_thumbnail(&scene, &id, 64).expect("thumbnail");
        assert!(thumb.starts_with("data:image/png;base64,"));

        let ghost = DrawableId::new();
        assert!(matches!(
            layer_thumbnail(&scene, &ghost, 64),
            Err(ExportError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_with_thumbnails_fills_every_layer() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add(image_from_bytes(&tiny_png()).expect("decoded"));
        scene.add(image_from_bytes(&tiny_png()).expect("decoded"));

        let layers = list_with_thumbnails(&mut scene, 32).expect("layers");
        assert_eq!(layers.len(), 2);
        assert!(layers.iter().all(|l| l.thumbnail.is_some()));
    }
}
