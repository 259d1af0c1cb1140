use bounce_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}
fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}
fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (arb_vec3(), arb_vec3()).prop_map(|(min, max)| Aabb::new(min, max))
}

proptest! {
    // maxs >= mins on every axis, whatever order the corners came in
    #[test]
    fn aabb_fixed_on_construction(a in arb_vec3(), b in arb_vec3()) {
        let bx = Aabb::new(a, b);
        for i in 0..3 {
            prop_assert!(bx.maxs()[i] >= bx.mins()[i]);
        }
        let g = bx.grow(Vec3::new(-1e7, 0.0, 5.0));
        for i in 0..3 {
            prop_assert!(g.maxs()[i] >= g.mins()[i]);
        }
    }

    // Union contains both inputs
    #[test]
    fn aabb_union_contains_both(a in arb_aabb(), b in arb_aabb()) {
        let u = a.union(&b);
        prop_assert!(u.contains(&a));
        prop_assert!(u.contains(&b));
    }

    // Intersection exists iff boxes are not disjoint, and lies within both
    #[test]
    fn aabb_intersect_matches_disjoint(a in arb_aabb(), b in arb_aabb()) {
        match a.intersect(&b) {
            Some(i) => {
                prop_assert!(!a.disjoint(&b));
                prop_assert!(a.contains(&i));
                prop_assert!(b.contains(&i));
            }
            None => prop_assert!(a.disjoint(&b)),
        }
        prop_assert_eq!(a.disjoint(&b), b.disjoint(&a));
    }

    // Expanding by a point makes the point contained
    #[test]
    fn aabb_expand_contains_point(a in arb_aabb(), p in arb_vec3()) {
        let e = a.expand(p);
        prop_assert!(e.contains_point(p));
        prop_assert!(e.contains(&a));
    }

    // Octants stay inside the parent and their union is the parent
    #[test]
    fn aabb_octants_cover_parent(a in arb_aabb()) {
        let mut u = a.octant(0);
        for i in 0..8 {
            let o = a.octant(i);
            prop_assert!(a.contains(&o));
            u = u.union(&o);
        }
        prop_assert_eq!(u, a);
    }
}
