use crate::{Aabb, Plane, Vec3, face_normal};

/// Distance within which a vertex counts as lying on a clip plane.
pub const ON_EPSILON: f32 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Front,
    Back,
    On,
}

/// Planar polygon stored as an ordered vertex loop. Treated as convex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Winding {
    points: Vec<Vec3>,
}

impl Winding {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unsigned area from a triangle fan around vertex 0. Zero for fewer than
    /// three vertices or collinear loops.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let p0 = self.points[0];
        let mut total = 0.0;
        for i in 2..self.points.len() {
            let d1 = self.points[i - 1] - p0;
            let d2 = self.points[i] - p0;
            total += d1.cross(d2).length();
        }
        total * 0.5
    }

    /// Mean of the vertices.
    pub fn center(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self.points.iter().fold(Vec3::ZERO, |acc, &p| acc + p);
        sum / self.points.len() as f32
    }

    /// Area-weighted centroid of the fan triangles. Falls back to
    /// [`Winding::center`] when the area is zero.
    pub fn centroid(&self) -> Vec3 {
        if self.points.len() < 3 {
            return self.center();
        }
        let p0 = self.points[0];
        let mut weighted = Vec3::ZERO;
        let mut total = 0.0;
        for i in 2..self.points.len() {
            let p1 = self.points[i - 1];
            let p2 = self.points[i];
            let a = (p1 - p0).cross(p2 - p0).length() * 0.5;
            weighted += (p0 + p1 + p2) * (a / 3.0);
            total += a;
        }
        if total > 0.0 {
            weighted / total
        } else {
            self.center()
        }
    }

    /// Plane through the first three vertices. Near-collinear leading
    /// vertices give an unreliable or zero normal.
    pub fn plane(&self) -> Plane {
        if self.points.len() < 3 {
            return Plane::default();
        }
        Plane::from_points(self.points[0], self.points[1], self.points[2])
    }

    /// Plane with a unit normal. Falls back to the first non-collinear
    /// vertex triple when the leading three are collinear; `None` when every
    /// triple is.
    pub fn surface_plane(&self) -> Option<Plane> {
        let plane = self.plane();
        if !plane.is_degenerate() {
            return Some(plane);
        }
        let normal = face_normal(&self.points);
        if normal.is_zero_exact() {
            return None;
        }
        Some(Plane::new(normal, normal.dot(self.points[0])))
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().copied())
    }

    /// Splits against `plane`, returning `(front, back)`. A side is `None`
    /// when nothing of the winding lies there. Vertices within `epsilon` of
    /// the plane go to both fragments.
    pub fn clip(&self, plane: &Plane, epsilon: f32) -> (Option<Winding>, Option<Winding>) {
        let n = self.points.len();
        let mut dists = Vec::with_capacity(n + 1);
        let mut sides = Vec::with_capacity(n + 1);
        let (mut front, mut back) = (0usize, 0usize);
        for &p in &self.points {
            let d = plane.distance_to(p);
            let side = if d > epsilon {
                front += 1;
                Side::Front
            } else if d < -epsilon {
                back += 1;
                Side::Back
            } else {
                Side::On
            };
            dists.push(d);
            sides.push(side);
        }

        if front == 0 && back == 0 {
            // coplanar
            return (Some(self.clone()), None);
        }
        if front == 0 {
            return (None, Some(self.clone()));
        }
        if back == 0 {
            return (Some(self.clone()), None);
        }

        let mut f = Vec::with_capacity(n + 4);
        let mut b = Vec::with_capacity(n + 4);
        for i in 0..n {
            let p1 = self.points[i];
            match sides[i] {
                Side::On => {
                    f.push(p1);
                    b.push(p1);
                    continue;
                }
                Side::Front => f.push(p1),
                Side::Back => b.push(p1),
            }

            let j = (i + 1) % n;
            if sides[j] == Side::On || sides[j] == sides[i] {
                continue;
            }

            let p2 = self.points[j];
            let t = dists[i] / (dists[i] - dists[j]);
            let mut mid = Vec3::ZERO;
            for axis in 0..3 {
                // exact on axial planes
                mid[axis] = if plane.normal[axis] == 1.0 {
                    plane.dist
                } else if plane.normal[axis] == -1.0 {
                    -plane.dist
                } else {
                    p1[axis] + t * (p2[axis] - p1[axis])
                };
            }
            f.push(mid);
            b.push(mid);
        }

        (Some(Winding::new(f)), Some(Winding::new(b)))
    }

    /// Cuts the winding along an axis-aligned world grid of cell edge
    /// `subdiv`, calling `save` once per resulting fragment.
    ///
    /// A split happens on the first axis that crosses a grid line with at
    /// least one unit to spare on each side. Front fragments are visited
    /// before back fragments, so the order only depends on the input.
    pub fn dice<F>(&self, subdiv: f32, save: &mut F)
    where
        F: FnMut(Winding),
    {
        assert!(subdiv > 0.0, "dice subdivision must be positive");
        let Some(bounds) = self.bounds() else {
            return;
        };

        let mins = bounds.mins();
        let maxs = bounds.maxs();
        let split_axis = (0..3).find(|&i| {
            ((mins[i] + 1.0) / subdiv).floor() < ((maxs[i] - 1.0) / subdiv).floor()
        });

        let Some(axis) = split_axis else {
            save(self.clone());
            return;
        };

        let dist = subdiv * (1.0 + ((mins[axis] + 1.0) / subdiv).floor());
        let (front, back) = self.clip(&Plane::new(Vec3::axis(axis), dist), ON_EPSILON);
        if let Some(w) = front {
            w.dice(subdiv, save);
        }
        if let Some(w) = back {
            w.dice(subdiv, save);
        }
    }

    /// Collects the fragments of [`Winding::dice`].
    pub fn diced(&self, subdiv: f32) -> Vec<Winding> {
        let mut out = Vec::new();
        self.dice(subdiv, &mut |w| out.push(w));
        out
    }
}
