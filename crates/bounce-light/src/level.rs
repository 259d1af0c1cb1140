use std::collections::BTreeMap;

use bounce_geom::{Aabb, Vec3, Winding};

/// Light style identifier. Style 0 is the always-on style.
pub type LightStyle = u8;

/// Linear color per light style. Ordered so that folding over styles is
/// reproducible.
pub type StyleColors = BTreeMap<LightStyle, Vec3>;

/// Texture name that marks a face as never rendered.
pub const SKIP_TEXTURE: &str = "skip";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceFlags {
    /// Set by `_bounce -1` style overrides on the texture.
    pub no_bounce: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Model {
    pub shadow: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self { shadow: true }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Face {
    pub points: Vec<Vec3>,
    pub texture: String,
    /// Index into [`Level::models`].
    pub model: usize,
    pub lightmapped: bool,
    pub flags: SurfaceFlags,
}

impl Face {
    pub fn winding(&self) -> Winding {
        Winding::new(self.points.clone())
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().copied())
    }
}

/// Faces and models of a compiled level. A face's number is its index in
/// `faces`.
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub faces: Vec<Face>,
    pub models: Vec<Model>,
}

impl Level {
    #[inline]
    pub fn model_for_face(&self, face: &Face) -> Option<&Model> {
        self.models.get(face.model)
    }
}

/// Direct illumination at a point, per light style, on a 0..255 scale.
/// Called concurrently from the bake workers.
pub trait DirectLighting: Sync {
    fn direct_lighting(&self, pos: Vec3, normal: Vec3) -> StyleColors;
}

/// Average texel color of a texture, `None` when it cannot be resolved.
pub trait TextureColors: Sync {
    fn average_color(&self, name: &str) -> Option<[u8; 3]>;
}

/// Visibility helpers used to precompute a bounce light's reach.
pub trait Visibility: Sync {
    /// Leaf containing `pos`, if any.
    fn point_in_leaf(&self, pos: Vec3) -> Option<usize>;
    /// Rough bounds of everything visible from `pos`.
    fn estimate_visible_bounds(&self, pos: Vec3) -> Aabb;
}

impl<F> DirectLighting for F
where
    F: Fn(Vec3, Vec3) -> StyleColors + Sync,
{
    fn direct_lighting(&self, pos: Vec3, normal: Vec3) -> StyleColors {
        self(pos, normal)
    }
}

impl TextureColors for BTreeMap<String, [u8; 3]> {
    fn average_color(&self, name: &str) -> Option<[u8; 3]> {
        self.get(name).copied()
    }
}

/// Collaborator for bakes that skip visibility precomputation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVisibility;

impl Visibility for NoVisibility {
    fn point_in_leaf(&self, _pos: Vec3) -> Option<usize> {
        None
    }

    fn estimate_visible_bounds(&self, pos: Vec3) -> Aabb {
        Aabb::from_point(pos)
    }
}
