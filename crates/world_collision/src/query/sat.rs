//! Separating Axis Theorem tests
//!
//! Every routine walks its full candidate axis list and reports overlap only
//! when none of them separates. Comparisons are written so that NaN input
//! (the degenerate triangle sentinel) always counts as separated.

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, OrientedBox, Triangle};

/// Projection interval of a point set onto an axis
#[inline]
fn project(points: &[Vec3], axis: &Vec3) -> (f32, f32) {
    points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// True when two intervals do not overlap (NaN counts as disjoint)
#[inline]
fn disjoint(a: (f32, f32), b: (f32, f32)) -> bool {
    !(a.1 >= b.0 && b.1 >= a.0)
}

/// Projected radius of a box with `half_extents` along `axes`
#[inline]
fn box_radius(axes: &[Vec3; 3], half_extents: &Vec3, axis: &Vec3) -> f32 {
    half_extents[0] * axes[0].dot(axis).abs()
        + half_extents[1] * axes[1].dot(axis).abs()
        + half_extents[2] * axes[2].dot(axis).abs()
}

#[inline]
fn world_axes() -> [Vec3; 3] {
    [Vec3::x(), Vec3::y(), Vec3::z()]
}

/// Axis-aligned box against axis-aligned box
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|i| !disjoint((a.min[i], a.max[i]), (b.min[i], b.max[i])))
}

/// Oriented box against oriented box (15 axes)
pub fn obb_obb(a: &OrientedBox, b: &OrientedBox) -> bool {
    let axes_a = a.axes();
    let axes_b = b.axes();
    let t = b.center - a.center;

    let separates = |axis: &Vec3| {
        let ra = box_radius(&axes_a, &a.half_extents, axis);
        let rb = box_radius(&axes_b, &b.half_extents, axis);
        !(t.dot(axis).abs() <= ra + rb)
    };

    // Face normals of both boxes
    if axes_a.iter().chain(axes_b.iter()).any(separates) {
        return false;
    }

    // Edge-edge cross products; parallel edges give a zero axis that cannot separate
    for ea in &axes_a {
        for eb in &axes_b {
            let axis = ea.cross(eb);
            if axis.norm_squared() > f32::EPSILON && separates(&axis) {
                return false;
            }
        }
    }

    true
}

/// Axis-aligned box against oriented box
pub fn aabb_obb(a: &Aabb, b: &OrientedBox) -> bool {
    obb_obb(&OrientedBox::from_aabb(a), b)
}

/// Triangle against a box centered at the origin with the world axes (13 axes)
fn triangle_centered_box(verts: &[Vec3; 3], half_extents: &Vec3) -> bool {
    let edges = [verts[1] - verts[0], verts[2] - verts[1], verts[0] - verts[2]];
    let box_axes = world_axes();

    let separates = |axis: &Vec3| {
        let r = box_radius(&box_axes, half_extents, axis);
        disjoint(project(verts, axis), (-r, r))
    };

    // Box face normals
    if box_axes.iter().any(separates) {
        return false;
    }

    // Triangle face normal
    let normal = edges[0].cross(&edges[1]);
    if separates(&normal) {
        return false;
    }

    // Box axes crossed with triangle edges
    for axis in &box_axes {
        for edge in &edges {
            let candidate = axis.cross(edge);
            if !(candidate.norm_squared() <= f32::EPSILON * edge.norm_squared()) && separates(&candidate) {
                return false;
            }
        }
    }

    true
}

/// Triangle against axis-aligned box
pub fn triangle_aabb(tri: &Triangle, aabb: &Aabb) -> bool {
    let c = aabb.center();
    let verts = [tri.a - c, tri.b - c, tri.c - c];
    triangle_centered_box(&verts, &aabb.extents())
}

/// Triangle against oriented box, tested in the box's frame
pub fn triangle_obb(tri: &Triangle, obb: &OrientedBox) -> bool {
    let verts = [obb.to_local(&tri.a), obb.to_local(&tri.b), obb.to_local(&tri.c)];
    triangle_centered_box(&verts, &obb.half_extents)
}

/// Triangle against triangle
///
/// Candidate axes: both face normals, the nine edge cross products, and each
/// face normal crossed with every edge of both triangles (needed when the
/// triangles are coplanar).
pub fn triangle_triangle(t1: &Triangle, t2: &Triangle) -> bool {
    let p1 = t1.vertices();
    let p2 = t2.vertices();
    let e1 = t1.edges();
    let e2 = t2.edges();
    let n1 = t1.scaled_normal();
    let n2 = t2.scaled_normal();

    let separates = |axis: &Vec3| disjoint(project(&p1, axis), project(&p2, axis));

    if separates(&n1) || separates(&n2) {
        return false;
    }

    let usable = |axis: &Vec3| axis.norm_squared() > f32::EPSILON * n1.norm_squared().min(n2.norm_squared());

    for a in &e1 {
        for b in &e2 {
            let axis = a.cross(b);
            if usable(&axis) && separates(&axis) {
                return false;
            }
        }
    }

    for n in [&n1, &n2] {
        for edge in e1.iter().chain(e2.iter()) {
            let axis = n.cross(edge);
            if usable(&axis) && separates(&axis) {
                return false;
            }
        }
    }

    true
}
