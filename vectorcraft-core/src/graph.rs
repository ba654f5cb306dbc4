//! Scene graph adapter: stable identities for otherwise anonymous drawables.
//!
//! IDs are minted lazily, on the first external reference to a drawable
//! (layer listing, hit-testing, selection, duplication) and never before.
//! Once minted an ID is stable for the drawable's lifetime and is never
//! reused within a session.

use crate::{Drawable, DrawableId, Scene};

/// Return the drawable's stable identity, minting one if absent.
pub fn identity_of(drawable: &mut Drawable) -> DrawableId {
    if let Some(id) = drawable.id {
        id
    } else {
        let id = DrawableId::new();
        drawable.id = Some(id);
        tracing::debug!("Minted identity {id}");
        id
    }
}

/// Enumerate the scene's drawables bottom-to-top.
pub fn enumerate(scene: &Scene) -> impl Iterator<Item = &Drawable> {
    scene.drawables()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawableKind, ShapeKind};

    fn shape() -> Drawable {
        Drawable::new(DrawableKind::Shape {
            shape: ShapeKind::Ellipse,
            fill: "#ffffff".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
        })
    }

    #[test]
    fn test_identity_minted_lazily_and_stable() {
        let mut d = shape();
        assert!(d.id().is_none());

        let id = identity_of(&mut d);
        assert_eq!(d.id(), Some(id));
        assert_eq!(identity_of(&mut d), id);
    }

    #[test]
    fn test_identities_unique_across_drawables() {
        let mut a = shape();
        let mut b = shape();
        assert_ne!(identity_of(&mut a), identity_of(&mut b));
    }

    #[test]
    fn test_enumerate_is_bottom_to_top() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.add(shape().with_name("bottom"));
        scene.add(shape().with_name("top"));

        let names: Vec<_> = enumerate(&scene)
            .map(|d| d.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["bottom", "top"]);
    }
}
