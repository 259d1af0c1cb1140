use bounce_geom::{Plane, Vec3, Winding};

use crate::level::{DirectLighting, StyleColors};

/// One diced piece of an emitting face and the direct light sampled just
/// above it. Lives only until its contribution is folded into the face sum.
#[derive(Clone, Debug)]
pub struct Patch {
    pub winding: Winding,
    pub center: Vec3,
    /// `center` nudged one unit along the normal, off the surface.
    pub sample_point: Vec3,
    pub plane: Plane,
    pub light_by_style: StyleColors,
}

impl Patch {
    #[inline]
    pub fn area(&self) -> f32 {
        self.winding.area()
    }
}

/// Samples the light above `winding`. `None` when the fragment has no
/// usable normal, which also means it has no area.
pub fn make_patch<L: DirectLighting + ?Sized>(winding: Winding, lighting: &L) -> Option<Patch> {
    let plane = winding.surface_plane()?;
    let center = winding.center();
    let sample_point = center + plane.normal;
    let light_by_style = lighting.direct_lighting(sample_point, plane.normal);
    Some(Patch {
        winding,
        center,
        sample_point,
        plane,
        light_by_style,
    })
}
