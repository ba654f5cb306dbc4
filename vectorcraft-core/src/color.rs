//! Color adjustment controller for image drawables.
//!
//! Adjustments replace the image's filter list wholesale on every apply;
//! there is no incremental stacking across separate applications. Clearing
//! restores the unfiltered appearance.

use serde::{Deserialize, Serialize};

use crate::{DrawableId, DrawableKind, Scene};

/// A named image-processing operation with parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Hue rotation. `rotation` is normalized to [-1, 1], where 1 maps to
    /// 180 degrees.
    HueRotate {
        /// Normalized rotation amount.
        rotation: f32,
    },
    /// Saturation adjustment in [-1, 1].
    Saturation {
        /// Adjustment amount.
        amount: f32,
    },
    /// Brightness adjustment in [-1, 1].
    Brightness {
        /// Adjustment amount.
        amount: f32,
    },
    /// Contrast adjustment in [-1, 1].
    Contrast {
        /// Adjustment amount.
        amount: f32,
    },
    /// Full desaturation.
    Grayscale,
    /// Sepia tone.
    Sepia,
    /// Channel inversion.
    Invert,
}

/// Slider values for a custom adjustment pass.
///
/// Hue is a rotation in degrees ([-180, 180]); the rest are in [-1, 1].
/// Zero means "leave unchanged" and contributes no filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Hue rotation in degrees.
    pub hue_degrees: f32,
    /// Saturation adjustment.
    pub saturation: f32,
    /// Brightness adjustment.
    pub brightness: f32,
    /// Contrast adjustment.
    pub contrast: f32,
}

impl Adjustments {
    /// Whether every parameter is at its neutral value.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.hue_degrees == 0.0
            && self.saturation == 0.0
            && self.brightness == 0.0
            && self.contrast == 0.0
    }

    /// Compile to a filter list in the fixed pipeline order
    /// [hue, saturation, brightness, contrast], skipping neutral values.
    #[must_use]
    pub fn to_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if self.hue_degrees != 0.0 {
            filters.push(Filter::HueRotate {
                rotation: (self.hue_degrees / 180.0).clamp(-1.0, 1.0),
            });
        }
        if self.saturation != 0.0 {
            filters.push(Filter::Saturation {
                amount: self.saturation.clamp(-1.0, 1.0),
            });
        }
        if self.brightness != 0.0 {
            filters.push(Filter::Brightness {
                amount: self.brightness.clamp(-1.0, 1.0),
            });
        }
        if self.contrast != 0.0 {
            filters.push(Filter::Contrast {
                amount: self.contrast.clamp(-1.0, 1.0),
            });
        }
        filters
    }
}

/// Applies filter pipelines to image drawables in an explicitly injected
/// scene.
///
/// Non-image, locked, and unknown targets are rejected as silent no-ops.
pub struct ColorController<'a> {
    scene: &'a mut Scene,
}

impl<'a> ColorController<'a> {
    /// Create a controller over the given scene.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    /// Replace the target image's filters with the compiled adjustment
    /// pipeline. An all-neutral adjustment yields an empty list.
    pub fn apply_adjustments(
        &mut self,
        target: Option<&DrawableId>,
        adjustments: &Adjustments,
    ) -> bool {
        self.set_filters(target, adjustments.to_filters())
    }

    /// Replace the target image's filters with a grayscale pass.
    pub fn grayscale(&mut self, target: Option<&DrawableId>) -> bool {
        self.set_filters(target, vec![Filter::Grayscale])
    }

    /// Replace the target image's filters with a sepia pass.
    pub fn sepia(&mut self, target: Option<&DrawableId>) -> bool {
        self.set_filters(target, vec![Filter::Sepia])
    }

    /// Replace the target image's filters with an inversion pass.
    pub fn invert(&mut self, target: Option<&DrawableId>) -> bool {
        self.set_filters(target, vec![Filter::Invert])
    }

    /// Replace the target image's filters with the vintage combination:
    /// sepia, brightness -0.1, contrast +0.1.
    pub fn vintage(&mut self, target: Option<&DrawableId>) -> bool {
        self.set_filters(
            target,
            vec![
                Filter::Sepia,
                Filter::Brightness { amount: -0.1 },
                Filter::Contrast { amount: 0.1 },
            ],
        )
    }

    /// Empty the target image's filter list.
    pub fn clear_filters(&mut self, target: Option<&DrawableId>) -> bool {
        self.set_filters(target, Vec::new())
    }

    /// The target image's current filter list, if the target resolves to an
    /// image.
    #[must_use]
    pub fn filters_of(&self, target: Option<&DrawableId>) -> Option<&[Filter]> {
        let id = target.copied().or_else(|| self.scene.primary_selection())?;
        match &self.scene.get(&id)?.kind {
            DrawableKind::Image { filters, .. } => Some(filters),
            _ => None,
        }
    }

    fn set_filters(&mut self, target: Option<&DrawableId>, new_filters: Vec<Filter>) -> bool {
        let Some(id) = target.copied().or_else(|| self.scene.primary_selection()) else {
            return false;
        };
        let replaced = match self.scene.get_mut(&id) {
            Some(drawable) if !drawable.locked => match &mut drawable.kind {
                DrawableKind::Image { filters, .. } => {
                    *filters = new_filters;
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if replaced {
            tracing::debug!("Replaced filter list on {id}");
            self.scene.mark_dirty();
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Drawable, ImageFormat};

    fn image_scene() -> (Scene, DrawableId) {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add(Drawable::new(DrawableKind::Image {
            src: "data:image/png;base64,".to_string(),
            format: ImageFormat::Png,
            filters: Vec::new(),
        }));
        let id = scene.drawable_at(10.0, 10.0).expect("hit");
        (scene, id)
    }

    #[test]
    fn test_hue_only_adjustment_yields_single_filter() {
        let (mut scene, id) = image_scene();
        let mut color = ColorController::new(&mut scene);

        let applied = color.apply_adjustments(
            Some(&id),
            &Adjustments {
                hue_degrees: 90.0,
                ..Default::default()
            },
        );
        assert!(applied);
        assert_eq!(
            color.filters_of(Some(&id)),
            Some(&[Filter::HueRotate { rotation: 0.5 }][..])
        );

        // Re-applying with all zeros empties the list.
        assert!(color.apply_adjustments(Some(&id), &Adjustments::default()));
        assert_eq!(color.filters_of(Some(&id)), Some(&[][..]));
    }

    #[test]
    fn test_pipeline_order_is_fixed() {
        let adj = Adjustments {
            hue_degrees: -180.0,
            saturation: 0.5,
            brightness: -0.2,
            contrast: 0.3,
        };
        let filters = adj.to_filters();
        assert!(matches!(filters[0], Filter::HueRotate { rotation } if rotation == -1.0));
        assert!(matches!(filters[1], Filter::Saturation { .. }));
        assert!(matches!(filters[2], Filter::Brightness { .. }));
        assert!(matches!(filters[3], Filter::Contrast { .. }));
    }

    #[test]
    fn test_presets_replace_wholesale() {
        let (mut scene, id) = image_scene();
        let mut color = ColorController::new(&mut scene);

        color.apply_adjustments(
            Some(&id),
            &Adjustments {
                saturation: 0.8,
                ..Default::default()
            },
        );
        color.vintage(Some(&id));
        assert_eq!(
            color.filters_of(Some(&id)),
            Some(
                &[
                    Filter::Sepia,
                    Filter::Brightness { amount: -0.1 },
                    Filter::Contrast { amount: 0.1 },
                ][..]
            )
        );

        color.grayscale(Some(&id));
        assert_eq!(color.filters_of(Some(&id)), Some(&[Filter::Grayscale][..]));
    }

    #[test]
    fn test_clear_after_preset_restores_empty_list() {
        let (mut scene, id) = image_scene();
        let mut color = ColorController::new(&mut scene);

        color.sepia(Some(&id));
        assert!(color.clear_filters(Some(&id)));
        assert_eq!(color.filters_of(Some(&id)), Some(&[][..]));
    }

    #[test]
    fn test_non_image_and_locked_targets_are_noops() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add(Drawable::new(DrawableKind::Text {
            content: "hi".to_string(),
            style: crate::TextStyle::default(),
        }));
        let text_id = scene.drawable_at(10.0, 10.0).expect("hit");

        let mut color = ColorController::new(&mut scene);
        assert!(!color.grayscale(Some(&text_id)));

        let (mut scene, id) = image_scene();
        scene.get_mut(&id).expect("present").locked = true;
        let mut color = ColorController::new(&mut scene);
        assert!(!color.invert(Some(&id)));
    }

    #[test]
    fn test_defaults_to_primary_selection() {
        let (mut scene, id) = image_scene();
        scene.select(&id);

        let mut color = ColorController::new(&mut scene);
        assert!(color.grayscale(None));
        assert_eq!(color.filters_of(None), Some(&[Filter::Grayscale][..]));
    }
}
