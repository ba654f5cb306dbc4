//! Transform controller - flips, transform reset, and multi-object
//! alignment on the active selection.

use serde::{Deserialize, Serialize};

use crate::{DrawableId, Scene};

/// Edge or center an alignment snaps to, relative to the union bounding box
/// of the target set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left edges coincide.
    Left,
    /// Horizontal centers coincide.
    Center,
    /// Right edges coincide.
    Right,
    /// Top edges coincide.
    Top,
    /// Vertical centers coincide.
    Middle,
    /// Bottom edges coincide.
    Bottom,
}

/// Geometric operations on drawables in an explicitly injected scene.
///
/// Targets default to the primary selection; locked and unknown targets are
/// silent no-ops.
pub struct TransformController<'a> {
    scene: &'a mut Scene,
}

impl<'a> TransformController<'a> {
    /// Create a controller over the given scene.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    /// Toggle the horizontal flip flag. Applying twice is the identity.
    pub fn flip_horizontal(&mut self, target: Option<&DrawableId>) -> bool {
        self.with_target(target, |t| t.flip_x = !t.flip_x)
    }

    /// Toggle the vertical flip flag. Applying twice is the identity.
    pub fn flip_vertical(&mut self, target: Option<&DrawableId>) -> bool {
        self.with_target(target, |t| t.flip_y = !t.flip_y)
    }

    /// Reset scale to (1, 1), rotation to 0, and both flip flags to false.
    /// Position is left untouched.
    pub fn reset(&mut self, target: Option<&DrawableId>) -> bool {
        self.with_target(target, |t| {
            t.scale_x = 1.0;
            t.scale_y = 1.0;
            t.rotation = 0.0;
            t.flip_x = false;
            t.flip_y = false;
        })
    }

    /// Align the targets against their union bounding box.
    ///
    /// Targets default to the current selection. Requires at least two
    /// resolvable, unlocked targets; otherwise a no-op returning `false`.
    /// Horizontal alignments leave `y` untouched and vice versa.
    pub fn align(&mut self, targets: Option<&[DrawableId]>, alignment: Alignment) -> bool {
        let ids: Vec<DrawableId> = match targets {
            Some(ids) => ids.to_vec(),
            None => self.scene.selected_ids().to_vec(),
        };

        let members: Vec<DrawableId> = ids
            .into_iter()
            .filter(|id| matches!(self.scene.get(id), Some(d) if !d.locked))
            .collect();
        if members.len() < 2 {
            return false;
        }

        let Some(union) = members
            .iter()
            .filter_map(|id| self.scene.get(id))
            .map(crate::Drawable::bounds)
            .reduce(|acc, b| acc.union(&b))
        else {
            return false;
        };

        for id in &members {
            let Some(drawable) = self.scene.get_mut(id) else {
                continue;
            };
            let bounds = drawable.bounds();
            let t = &mut drawable.transform;
            match alignment {
                Alignment::Left => t.x = union.left,
                Alignment::Center => t.x = union.center_x() - bounds.width() / 2.0,
                Alignment::Right => t.x = union.right - bounds.width(),
                Alignment::Top => t.y = union.top,
                Alignment::Middle => t.y = union.center_y() - bounds.height() / 2.0,
                Alignment::Bottom => t.y = union.bottom - bounds.height(),
            }
        }

        tracing::debug!("Aligned {} drawables: {alignment:?}", members.len());
        self.scene.mark_dirty();
        true
    }

    fn with_target(
        &mut self,
        target: Option<&DrawableId>,
        apply: impl FnOnce(&mut crate::Transform),
    ) -> bool {
        let Some(id) = target.copied().or_else(|| self.scene.primary_selection()) else {
            return false;
        };
        let applied = match self.scene.get_mut(&id) {
            Some(drawable) if !drawable.locked => {
                apply(&mut drawable.transform);
                true
            }
            _ => false,
        };
        if applied {
            self.scene.mark_dirty();
        }
        applied
    }
}
