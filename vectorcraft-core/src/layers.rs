//! Layer manager - the UI-facing projection of the scene's drawable stack.
//!
//! This component is stateless: every listing is re-derived from the scene,
//! and mutations go straight through to it. Operations on unknown IDs are
//! silent no-ops, never errors - the UI only offers IDs it obtained from
//! [`LayerManager::list`].

use serde::{Deserialize, Serialize};

use crate::graph;
use crate::{BlendMode, DrawableId, DrawableKind, Scene};

/// Pixel offset applied to duplicated drawables, in both axes.
pub const DUPLICATE_OFFSET: f32 = 10.0;

/// Coarse layer type shown in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Raster image layer.
    Image,
    /// Text layer.
    Text,
    /// Vector shape layer.
    Shape,
}

impl From<&DrawableKind> for LayerKind {
    fn from(kind: &DrawableKind) -> Self {
        match kind {
            DrawableKind::Image { .. } => Self::Image,
            DrawableKind::Text { .. } => Self::Text,
            DrawableKind::Shape { .. } => Self::Shape,
        }
    }
}

/// Read-only projection of one drawable for list display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerView {
    /// Stable drawable identity.
    pub id: DrawableId,
    /// Display name (custom or positional default).
    pub name: String,
    /// Coarse layer type.
    pub kind: LayerKind,
    /// Whether the layer is rendered.
    pub visible: bool,
    /// Whether the layer is locked.
    pub locked: bool,
    /// Opacity in percent.
    pub opacity: f32,
    /// Compositing blend mode.
    pub blend_mode: BlendMode,
    /// Position in the scene's stack (0 = bottom).
    pub z_index: usize,
    /// Low-resolution preview as a data URL. Filled on demand by the export
    /// crate; never cached.
    pub thumbnail: Option<String>,
}

/// Enumerates and mutates the scene's drawables as an ordered layer list.
pub struct LayerManager<'a> {
    scene: &'a mut Scene,
}

impl<'a> LayerManager<'a> {
    /// Create a manager over the given scene.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    /// List layers top-to-bottom for display.
    ///
    /// Listing counts as an external reference, so identities are minted
    /// here for any drawable that does not have one yet.
    pub fn list(&mut self) -> Vec<LayerView> {
        let count = self.scene.len();
        (0..count)
            .rev()
            .filter_map(|z_index| {
                let drawable = self.scene.get_at_mut(z_index)?;
                let id = graph::identity_of(drawable);
                Some(LayerView {
                    id,
                    name: drawable.display_name(z_index),
                    kind: LayerKind::from(&drawable.kind),
                    visible: drawable.visible,
                    locked: drawable.locked,
                    opacity: drawable.opacity,
                    blend_mode: drawable.blend_mode,
                    z_index,
                    thumbnail: None,
                })
            })
            .collect()
    }

    /// Make the layer the sole selection. No-op on locked or unknown IDs.
    pub fn select(&mut self, id: &DrawableId) -> bool {
        self.scene.select_only(id)
    }

    /// Set a custom display name. No-op on unknown IDs.
    pub fn rename(&mut self, id: &DrawableId, name: &str) -> bool {
        if let Some(drawable) = self.scene.get_mut(id) {
            drawable.name = Some(name.to_string());
            self.scene.mark_dirty();
            true
        } else {
            false
        }
    }

    /// Toggle layer visibility. Returns the new state, or `None` for
    /// unknown IDs.
    pub fn toggle_visibility(&mut self, id: &DrawableId) -> Option<bool> {
        let visible = {
            let drawable = self.scene.get_mut(id)?;
            drawable.visible = !drawable.visible;
            drawable.visible
        };
        self.scene.mark_dirty();
        Some(visible)
    }

    /// Toggle the lock state. Locking a selected layer removes it from the
    /// selection. Returns the new state, or `None` for unknown IDs.
    pub fn toggle_lock(&mut self, id: &DrawableId) -> Option<bool> {
        let locked = {
            let drawable = self.scene.get_mut(id)?;
            drawable.locked = !drawable.locked;
            drawable.locked
        };
        if locked && self.scene.is_selected(id) {
            let keep: Vec<_> = self
                .scene
                .selected_ids()
                .iter()
                .copied()
                .filter(|sid| sid != id)
                .collect();
            self.scene.deselect_all();
            for sid in &keep {
                self.scene.select(sid);
            }
        }
        self.scene.mark_dirty();
        Some(locked)
    }

    /// Remove the layer from the scene, clearing it from the selection if
    /// selected. No-op on unknown IDs.
    pub fn delete(&mut self, id: &DrawableId) -> bool {
        self.scene.remove(id).is_some()
    }

    /// Deep-copy the layer: fresh identity, position offset by
    /// [`DUPLICATE_OFFSET`] in both axes, name suffixed with `" copy"`,
    /// inserted immediately above the source, and selected.
    ///
    /// Returns the new layer's ID, or `None` for unknown IDs.
    pub fn duplicate(&mut self, id: &DrawableId) -> Option<DrawableId> {
        let z_index = self.scene.index_of(id)?;
        let source = self.scene.get_at(z_index)?;

        let mut copy = source.clone();
        let copy_id = DrawableId::new();
        copy.id = Some(copy_id);
        copy.name = Some(format!("{} copy", source.display_name(z_index)));
        copy.transform.x += DUPLICATE_OFFSET;
        copy.transform.y += DUPLICATE_OFFSET;

        self.scene.insert(z_index + 1, copy);
        self.scene.select_only(&copy_id);
        tracing::debug!("Duplicated {id} as {copy_id}");
        Some(copy_id)
    }
}
