use bounce_geom::{Aabb, Plane, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert_eq!(c, Vec3::new(-3.0, 7.0, -3.0));
    assert_eq!(c - a, b);
    assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
}

#[test]
fn vec3_assign_ops() {
    let mut v = Vec3::splat(1.0);
    v += Vec3::new(2.0, 3.0, 4.0);
    assert_eq!(v, Vec3::new(3.0, 4.0, 5.0));
    v -= Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(v, Vec3::splat(2.0));
    v *= 3.0;
    assert_eq!(v, Vec3::splat(6.0));
    v /= 2.0;
    assert_eq!(v, Vec3::splat(3.0));
}

#[test]
fn vec3_equality_is_exact_but_approx_eq_is_not() {
    let a = Vec3::new(1.0, 1.0, 1.0);
    let b = Vec3::new(1.0005, 1.0, 0.9995);
    assert_ne!(a, b);
    assert!(a.approx_eq(b));
    assert!(!a.approx_eq(Vec3::new(1.01, 1.0, 1.0)));
}

#[test]
fn vec3_elementwise_helpers() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    let b = Vec3::new(0.5, 4.0, -1.0);
    assert_eq!(a.mul_elem(b), Vec3::new(0.5, -8.0, -3.0));
    assert_eq!(a.min_elem(b), Vec3::new(0.5, -2.0, -1.0));
    assert_eq!(a.max_elem(b), Vec3::new(1.0, 4.0, 3.0));
    assert_eq!(a.max_component(), 3.0);
    assert!(Vec3::ZERO.is_zero_exact());
    assert!(!Vec3::new(0.0, -0.0, 1e-30).is_zero_exact());
    assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
}

#[test]
fn vec3_dot_length_normalized() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(approx_eq(v.dot(v), 25.0, 1e-6));
    assert!(approx_eq(v.length(), 5.0, 1e-6));
    assert!(vec3_approx_eq(v.normalized(), Vec3::new(0.6, 0.8, 0.0), 1e-6));

    // Zero vector normalization is a no-op
    assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
}

#[test]
fn vec3_cross_basis() {
    assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
    assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
    assert_eq!(Vec3::axis(1), Vec3::Y);
}

#[test]
fn aabb_fixes_inverted_input() {
    let b = Aabb::new(Vec3::new(0.0, 5.0, -1.0), Vec3::new(2.0, 1.0, -3.0));
    assert_eq!(b.mins(), Vec3::new(0.0, 5.0, -1.0));
    assert_eq!(b.maxs(), Vec3::new(2.0, 5.0, -1.0));
}

#[test]
fn aabb_touching_is_not_disjoint() {
    let a = Aabb::new(Vec3::ZERO, Vec3::splat(1.0));
    let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    let c = Aabb::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    assert!(!a.disjoint(&b));
    assert!(a.disjoint(&c));
    assert!(c.disjoint(&a));
}

#[test]
fn aabb_intersect_and_union() {
    let a = Aabb::new(Vec3::ZERO, Vec3::splat(4.0));
    let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(6.0));
    let i = a.intersect(&b).expect("overlap");
    assert_eq!(i, Aabb::new(Vec3::splat(2.0), Vec3::splat(4.0)));

    let u = a.union(&b);
    assert_eq!(u, Aabb::new(Vec3::ZERO, Vec3::splat(6.0)));
    assert!(u.contains(&a) && u.contains(&b));

    let far = Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0));
    assert!(a.intersect(&far).is_none());
}

#[test]
fn aabb_point_queries_and_growth() {
    let a = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
    assert!(a.contains_point(Vec3::new(2.0, 0.0, 3.0)));
    assert!(!a.contains_point(Vec3::new(2.1, 0.0, 3.0)));
    assert_eq!(a.size(), Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(a.center(), Vec3::new(1.0, 2.0, 3.0));

    let g = a.grow(Vec3::splat(1.0));
    assert_eq!(g.mins(), Vec3::splat(-1.0));
    assert_eq!(g.maxs(), Vec3::new(3.0, 5.0, 7.0));

    let e = a.expand(Vec3::new(-1.0, 10.0, 0.0));
    assert_eq!(e, Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 10.0, 6.0)));
}

#[test]
fn aabb_from_points() {
    assert!(Aabb::from_points(std::iter::empty::<Vec3>()).is_none());
    let b = Aabb::from_points([Vec3::new(1.0, -1.0, 0.0), Vec3::new(-2.0, 3.0, 5.0)]).unwrap();
    assert_eq!(b, Aabb::new(Vec3::new(-2.0, -1.0, 0.0), Vec3::new(1.0, 3.0, 5.0)));
}

#[test]
fn aabb_octants_partition_parent() {
    let a = Aabb::new(Vec3::ZERO, Vec3::splat(8.0));
    let mut total = 0.0;
    for i in 0..8 {
        let o = a.octant(i);
        assert!(a.contains(&o));
        assert_eq!(o.size(), Vec3::splat(4.0));
        total += o.size().x * o.size().y * o.size().z;
    }
    assert_eq!(total, 512.0);
    assert_eq!(a.octant(0).mins(), Vec3::ZERO);
    assert_eq!(a.octant(7).maxs(), Vec3::splat(8.0));
    assert_eq!(a.octant(1).mins(), Vec3::new(4.0, 0.0, 0.0));
    assert_eq!(a.octant(4).mins(), Vec3::new(0.0, 0.0, 4.0));
}

#[test]
fn plane_from_points_and_distance() {
    let p = Plane::from_points(
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(1.0, 0.0, 2.0),
        Vec3::new(0.0, 1.0, 2.0),
    );
    assert_eq!(p.normal, Vec3::Z);
    assert!(approx_eq(p.dist, 2.0, 1e-6));
    assert!(approx_eq(p.distance_to(Vec3::new(5.0, 5.0, 3.0)), 1.0, 1e-6));
    assert!(!p.is_degenerate());
    assert_eq!(p.flipped().distance_to(Vec3::new(0.0, 0.0, 3.0)), -1.0);

    let collinear = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
    assert!(collinear.is_degenerate());
}
