use std::sync::Mutex;

use bounce_geom::{Aabb, Plane, Vec3, make_inward_edge_planes};
use bounce_octree::{Octree, make_octree};
use hashbrown::HashMap;

use crate::level::{StyleColors, Visibility};
use crate::settings::VisApprox;

/// Visibility data precomputed for a bounce light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BounceVisibility {
    None,
    Leaf(Option<usize>),
    Bounds(Aabb),
}

/// A face re-emitting the light it received, as seen by the final gather.
#[derive(Clone, Debug)]
pub struct BounceLight {
    /// Face number this light was made from.
    pub face: usize,
    pub poly: Vec<Vec3>,
    pub poly_edge_planes: Vec<Plane>,
    pub pos: Vec3,
    pub color_by_style: StyleColors,
    /// Componentwise max over all styles; an upper bound for culling.
    pub componentwise_max_color: Vec3,
    pub surf_normal: Vec3,
    /// Area of the undiced face.
    pub area: f32,
    pub visibility: BounceVisibility,
}

impl BounceLight {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.poly.iter().copied()).unwrap_or_else(|| Aabb::from_point(self.pos))
    }
}

/// Everything needed to register one bounce light.
#[derive(Clone, Debug)]
pub struct BounceSource<'a> {
    pub face: usize,
    pub poly: &'a [Vec3],
    pub pos: Vec3,
    pub color_by_style: StyleColors,
    pub surf_normal: Vec3,
    pub area: f32,
}

#[derive(Default)]
struct Inner {
    lights: Vec<BounceLight>,
    by_face: HashMap<usize, Vec<usize>>,
}

/// Bake-session store the face workers append to. The lock covers only the
/// push and the face index update, so a face index never points past the
/// end of the light list.
pub struct BounceRegistry {
    visapprox: VisApprox,
    inner: Mutex<Inner>,
}

impl BounceRegistry {
    pub fn new(visapprox: VisApprox) -> Self {
        Self {
            visapprox,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Builds the light record and appends it.
    ///
    /// # Panics
    /// On a negative color component or a non-positive area.
    pub fn add<V: Visibility + ?Sized>(&self, src: BounceSource<'_>, vis: &V) -> usize {
        for color in src.color_by_style.values() {
            assert!(
                color.x >= 0.0 && color.y >= 0.0 && color.z >= 0.0,
                "negative bounce color {:?} on face {}",
                color,
                src.face
            );
        }
        assert!(src.area > 0.0, "bounce light with area {} on face {}", src.area, src.face);

        let componentwise_max_color = src
            .color_by_style
            .values()
            .fold(Vec3::ZERO, |acc, &c| acc.max_elem(c));
        let visibility = match self.visapprox {
            VisApprox::None => BounceVisibility::None,
            VisApprox::Vis => BounceVisibility::Leaf(vis.point_in_leaf(src.pos)),
            VisApprox::Rays => BounceVisibility::Bounds(vis.estimate_visible_bounds(src.pos)),
        };
        let light = BounceLight {
            face: src.face,
            poly: src.poly.to_vec(),
            poly_edge_planes: make_inward_edge_planes(src.poly),
            pos: src.pos,
            color_by_style: src.color_by_style,
            componentwise_max_color,
            surf_normal: src.surf_normal,
            area: src.area,
            visibility,
        };

        let mut inner = self.inner.lock().unwrap();
        inner.lights.push(light);
        let index = inner.lights.len() - 1;
        inner.by_face.entry(src.face).or_default().push(index);
        index
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ends the session; the result is read-only.
    pub fn finish(self) -> BounceLights {
        let inner = self.inner.into_inner().unwrap();
        BounceLights {
            lights: inner.lights,
            by_face: inner.by_face,
        }
    }
}

/// Frozen output of a bake.
#[derive(Clone, Debug, Default)]
pub struct BounceLights {
    lights: Vec<BounceLight>,
    by_face: HashMap<usize, Vec<usize>>,
}

impl BounceLights {
    #[inline]
    pub fn lights(&self) -> &[BounceLight] {
        &self.lights
    }

    /// Indices into [`BounceLights::lights`] made from `face`; empty when the
    /// face produced none.
    pub fn for_face(&self, face: usize) -> &[usize] {
        self.by_face.get(&face).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Faces that produced at least one light.
    pub fn faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_face.keys().copied()
    }

    pub fn total_area(&self) -> f32 {
        self.lights.iter().map(|l| l.area).sum()
    }

    /// Octree over the lights' polygon bounds, payload = light index.
    pub fn spatial_index(&self) -> Octree<usize> {
        let objects: Vec<(Aabb, usize)> = self
            .lights
            .iter()
            .enumerate()
            .map(|(i, l)| (l.bounds(), i))
            .collect();
        make_octree(&objects)
    }
}
