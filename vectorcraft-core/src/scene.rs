//! The scene - an ordered document of drawables.

use serde::{Deserialize, Serialize};

use crate::error::SceneResult;
use crate::graph;
use crate::{Bounds, Drawable, DrawableId};

/// The mutable canvas document.
///
/// Drawables are kept in z-order: index 0 is the bottom of the stack. The
/// scene is exclusively owned by one editing session; all mutations go
/// through `&mut Scene`, so there is no locking discipline.
///
/// Change notification is a dirty flag plus a monotonic revision counter:
/// the UI calls [`Scene::take_dirty`] once per render tick and re-derives
/// its layer list when it returns `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Drawables in z-order, bottom first.
    drawables: Vec<Drawable>,
    /// Currently selected drawable IDs.
    selected: Vec<DrawableId>,
    /// Logical canvas width in pixels.
    pub width: f32,
    /// Logical canvas height in pixels.
    pub height: f32,
    /// Background color as hex.
    pub background: String,
    #[serde(skip)]
    revision: u64,
    #[serde(skip)]
    dirty: bool,
}

impl Scene {
    /// Create a new empty scene with the given logical canvas size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            drawables: Vec::new(),
            selected: Vec::new(),
            width,
            height,
            background: "#ffffff".to_string(),
            revision: 0,
            dirty: false,
        }
    }

    /// Mark the scene as changed.
    pub(crate) fn mark_dirty(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    /// Consume the dirty flag, returning whether the scene changed since the
    /// last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Monotonic revision counter, bumped on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a drawable on top of the stack. Returns its z-index.
    pub fn add(&mut self, drawable: Drawable) -> usize {
        self.drawables.push(drawable);
        self.mark_dirty();
        self.drawables.len() - 1
    }

    /// Insert a drawable at the given z-index, shifting the stack above it.
    pub fn insert(&mut self, z_index: usize, drawable: Drawable) {
        let z_index = z_index.min(self.drawables.len());
        self.drawables.insert(z_index, drawable);
        self.mark_dirty();
    }

    /// Remove a drawable by ID, clearing it from the selection.
    ///
    /// Returns `None` (no-op) if the ID is not in the scene.
    pub fn remove(&mut self, id: &DrawableId) -> Option<Drawable> {
        let index = self.index_of(id)?;
        let removed = self.drawables.remove(index);
        self.selected.retain(|sid| sid != id);
        self.mark_dirty();
        tracing::debug!("Removed drawable {id}");
        Some(removed)
    }

    /// Z-index of the drawable with the given ID.
    #[must_use]
    pub fn index_of(&self, id: &DrawableId) -> Option<usize> {
        self.drawables.iter().position(|d| d.id == Some(*id))
    }

    /// Get a drawable by ID.
    #[must_use]
    pub fn get(&self, id: &DrawableId) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.id == Some(*id))
    }

    /// Get a mutable reference to a drawable by ID.
    ///
    /// The caller is responsible for calling [`Scene::mark_dirty`] via a
    /// controller after mutating.
    pub fn get_mut(&mut self, id: &DrawableId) -> Option<&mut Drawable> {
        self.drawables.iter_mut().find(|d| d.id == Some(*id))
    }

    /// Get a drawable by z-index.
    #[must_use]
    pub fn get_at(&self, z_index: usize) -> Option<&Drawable> {
        self.drawables.get(z_index)
    }

    /// Get a mutable reference to a drawable by z-index.
    pub fn get_at_mut(&mut self, z_index: usize) -> Option<&mut Drawable> {
        self.drawables.get_mut(z_index)
    }

    /// All drawables, bottom-to-top.
    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter()
    }

    /// Mutable access to all drawables, bottom-to-top.
    pub fn drawables_mut(&mut self) -> impl Iterator<Item = &mut Drawable> {
        self.drawables.iter_mut()
    }

    /// Number of drawables in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Find the topmost drawable at the given canvas coordinates.
    ///
    /// Locked and hidden drawables are excluded from hit-testing. Minting an
    /// ID for the hit counts as its first external reference.
    pub fn drawable_at(&mut self, x: f32, y: f32) -> Option<DrawableId> {
        let index = self
            .drawables
            .iter()
            .rposition(|d| d.visible && !d.locked && d.contains_point(x, y))?;
        Some(graph::identity_of(&mut self.drawables[index]))
    }

    /// Add a drawable to the selection.
    ///
    /// Locked drawables cannot be selected; returns `false` without effect
    /// for locked or unknown IDs.
    pub fn select(&mut self, id: &DrawableId) -> bool {
        match self.get(id) {
            Some(d) if !d.locked => {
                if !self.selected.contains(id) {
                    self.selected.push(*id);
                    self.mark_dirty();
                }
                true
            }
            _ => false,
        }
    }

    /// Replace the selection with a single drawable.
    pub fn select_only(&mut self, id: &DrawableId) -> bool {
        if matches!(self.get(id), Some(d) if !d.locked) {
            self.selected.clear();
            self.selected.push(*id);
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.mark_dirty();
        }
    }

    /// Currently selected IDs, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[DrawableId] {
        &self.selected
    }

    /// The primary (first-selected) drawable ID.
    #[must_use]
    pub fn primary_selection(&self) -> Option<DrawableId> {
        self.selected.first().copied()
    }

    /// Check whether a drawable is selected.
    #[must_use]
    pub fn is_selected(&self, id: &DrawableId) -> bool {
        self.selected.contains(id)
    }

    /// Union bounding box of the current selection.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        self.selected
            .iter()
            .filter_map(|id| self.get(id))
            .map(Drawable::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawableKind, ShapeKind, Transform};

    fn shape(x: f32, y: f32, w: f32, h: f32) -> Drawable {
        Drawable::new(DrawableKind::Shape {
            shape: ShapeKind::Rect { corner_radius: 0.0 },
            fill: "#336699".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
        })
        .with_transform(Transform {
            x,
            y,
            width: w,
            height: h,
            ..Default::default()
        })
    }

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new(800.0, 600.0);
        assert!(scene.is_empty());

        scene.add(shape(0.0, 0.0, 50.0, 50.0));
        assert_eq!(scene.len(), 1);

        let id = scene.drawable_at(10.0, 10.0).expect("hit");
        assert!(scene.remove(&id).is_some());
        assert!(scene.is_empty());

        // Removing again is a no-op, not an error.
        assert!(scene.remove(&id).is_none());
    }

    #[test]
    fn test_z_order_is_index() {
        let mut scene = Scene::new(800.0, 600.0);
        assert_eq!(scene.add(shape(0.0, 0.0, 10.0, 10.0)), 0);
        assert_eq!(scene.add(shape(0.0, 0.0, 10.0, 10.0)), 1);
        scene.insert(1, shape(0.0, 0.0, 10.0, 10.0));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_hit_testing_topmost_wins() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(shape(0.0, 0.0, 100.0, 100.0));
        scene.add(shape(0.0, 0.0, 100.0, 100.0));

        let hit = scene.drawable_at(50.0, 50.0).expect("hit");
        assert_eq!(scene.index_of(&hit), Some(1));
        assert!(scene.drawable_at(500.0, 500.0).is_none());
    }

    #[test]
    fn test_locked_excluded_from_hits_and_selection() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(shape(0.0, 0.0, 100.0, 100.0));
        let id = scene.drawable_at(10.0, 10.0).expect("hit");

        scene.get_mut(&id).expect("present").locked = true;
        assert!(scene.drawable_at(10.0, 10.0).is_none());
        assert!(!scene.select(&id));
        assert!(scene.selected_ids().is_empty());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(shape(0.0, 0.0, 100.0, 100.0));
        let id = scene.drawable_at(10.0, 10.0).expect("hit");

        assert!(scene.select(&id));
        assert!(scene.is_selected(&id));
        scene.remove(&id);
        assert!(scene.selected_ids().is_empty());
    }

    #[test]
    fn test_selection_bounds_union() {
        let mut scene = Scene::new(800.0, 600.0);
        scene.add(shape(10.0, 10.0, 20.0, 20.0));
        scene.add(shape(50.0, 40.0, 20.0, 20.0));
        let a = scene.drawable_at(15.0, 15.0).expect("a");
        let b = scene.drawable_at(55.0, 45.0).expect("b");
        scene.select(&a);
        scene.select(&b);

        let bounds = scene.selection_bounds().expect("bounds");
        assert_eq!(bounds.left, 10.0);
        assert_eq!(bounds.top, 10.0);
        assert_eq!(bounds.right, 70.0);
        assert_eq!(bounds.bottom, 60.0);
    }

    #[test]
    fn test_dirty_flag_and_revision() {
        let mut scene = Scene::new(800.0, 600.0);
        assert!(!scene.take_dirty());
        let r0 = scene.revision();

        scene.add(shape(0.0, 0.0, 10.0, 10.0));
        assert!(scene.take_dirty());
        assert!(!scene.take_dirty());
        assert!(scene.revision() > r0);
    }

    #[test]
    fn test_json_round_trip_for_tests_only() {
        let mut scene = Scene::new(640.0, 480.0);
        scene.add(shape(1.0, 2.0, 3.0, 4.0));

        let json = scene.to_json().expect("serialize");
        let back = Scene::from_json(&json).expect("deserialize");
        assert_eq!(back.len(), 1);
        assert_eq!(back.width, 640.0);
    }
}
