use crate::Vec3;

/// Axis-aligned box. `maxs` is clamped to be at least `mins` on every axis
/// when the box is built, so an inverted input collapses to a flat box.
///
/// Touching on a side, edge or corner counts as touching.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    mins: Vec3,
    maxs: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(mins: Vec3, maxs: Vec3) -> Self {
        let mut maxs = maxs;
        for i in 0..3 {
            if maxs[i] < mins[i] {
                maxs[i] = mins[i];
            }
        }
        Self { mins, maxs }
    }

    #[inline]
    pub fn from_point(p: Vec3) -> Self {
        Self { mins: p, maxs: p }
    }

    /// Bounds of a point set; `None` when the set is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        Some(it.fold(Self::from_point(first), |b, p| b.expand(p)))
    }

    #[inline]
    pub fn mins(&self) -> Vec3 {
        self.mins
    }

    #[inline]
    pub fn maxs(&self) -> Vec3 {
        self.maxs
    }

    pub fn disjoint(&self, other: &Aabb) -> bool {
        for i in 0..3 {
            if self.maxs[i] < other.mins[i] || self.mins[i] > other.maxs[i] {
                return true;
            }
        }
        false
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        for i in 0..3 {
            if other.mins[i] < self.mins[i] || other.maxs[i] > self.maxs[i] {
                return false;
            }
        }
        true
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.mins[i] && p[i] <= self.maxs[i])
    }

    #[inline]
    pub fn expand(&self, p: Vec3) -> Aabb {
        Aabb::new(self.mins.min_elem(p), self.maxs.max_elem(p))
    }

    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        self.expand(other.mins).expand(other.maxs)
    }

    /// Overlap of the two boxes, or `None` when some axis ends up with
    /// `min > max`.
    pub fn intersect(&self, other: &Aabb) -> Option<Aabb> {
        let mins = self.mins.max_elem(other.mins);
        let maxs = self.maxs.min_elem(other.maxs);
        for i in 0..3 {
            if mins[i] > maxs[i] {
                return None;
            }
        }
        Some(Aabb { mins, maxs })
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.maxs - self.mins
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }

    /// Grows the box by `margin` on both sides of every axis.
    #[inline]
    pub fn grow(&self, margin: Vec3) -> Aabb {
        Aabb::new(self.mins - margin, self.maxs + margin)
    }

    /// One of the eight equal sub-boxes. Bit 0 of `i` picks the upper half on
    /// x, bit 1 on y, bit 2 on z.
    pub fn octant(&self, i: usize) -> Aabb {
        debug_assert!(i < 8);
        let mid = self.center();
        let mut mins = self.mins;
        let mut maxs = self.maxs;
        for axis in 0..3 {
            if i & (1 << axis) != 0 {
                mins[axis] = mid[axis];
            } else {
                maxs[axis] = mid[axis];
            }
        }
        Aabb::new(mins, maxs)
    }
}
