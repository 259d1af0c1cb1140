use crate::Vec3;

/// Plane `normal . p = dist`. The normal is expected to be unit length; a
/// plane fitted from collinear points carries a zero normal instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub dist: f32,
}

impl Plane {
    #[inline]
    pub const fn new(normal: Vec3, dist: f32) -> Self {
        Self { normal, dist }
    }

    /// Plane through three points, facing along `(b - a) x (c - a)`.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalized();
        Self {
            normal,
            dist: normal.dot(a),
        }
    }

    /// Signed distance, positive on the side the normal points to.
    #[inline]
    pub fn distance_to(&self, p: Vec3) -> f32 {
        self.normal.dot(p) - self.dist
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        (self.normal.length() - 1.0).abs() > crate::EQUAL_EPSILON
    }

    #[inline]
    pub fn flipped(&self) -> Plane {
        Plane::new(-self.normal, -self.dist)
    }
}
