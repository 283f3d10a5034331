//! Closest-point queries
//!
//! Solid shapes return the query point itself when it lies inside them.

use crate::foundation::math::{vmax, vmin, Vec3};
use crate::geometry::{Aabb, OrientedBox, Plane, Segment, Sphere, Triangle};

/// Closest point inside an axis-aligned box
pub fn point_aabb(p: &Vec3, aabb: &Aabb) -> Vec3 {
    vmin(&vmax(p, &aabb.min), &aabb.max)
}

/// Closest point inside an oriented box
pub fn point_obb(p: &Vec3, obb: &OrientedBox) -> Vec3 {
    let local = obb.to_local(p);
    let clamped = vmin(&vmax(&local, &(-obb.half_extents)), &obb.half_extents);
    obb.point_to_world(&clamped)
}

/// Closest point inside a sphere
pub fn point_sphere(p: &Vec3, sphere: &Sphere) -> Vec3 {
    let offset = p - sphere.center;
    let distance = offset.magnitude();
    if distance <= sphere.radius {
        return *p;
    }
    sphere.center + offset * (sphere.radius / distance)
}

/// Orthogonal projection onto a plane
pub fn point_plane(p: &Vec3, plane: &Plane) -> Vec3 {
    plane.project(p)
}

/// Parameter in `[0, 1]` of the closest point on a segment
pub fn segment_parameter(p: &Vec3, segment: &Segment) -> f32 {
    let d = segment.end - segment.start;
    let len_sq = d.norm_squared();
    if len_sq <= 0.0 {
        return 0.0;
    }
    ((p - segment.start).dot(&d) / len_sq).clamp(0.0, 1.0)
}

/// Closest point on a segment
pub fn point_segment(p: &Vec3, segment: &Segment) -> Vec3 {
    let t = segment_parameter(p, segment);
    segment.start + (segment.end - segment.start) * t
}

/// Closest point on a triangle (Voronoi region walk)
///
/// The sentinel triangle yields a NaN point.
pub fn point_triangle(p: &Vec3, tri: &Triangle) -> Vec3 {
    let (a, b, c) = (tri.a, tri.b, tri.c);
    let ab = b - a;
    let ac = c - a;

    // Vertex region A
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    // Vertex region B
    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    // Vertex region C
    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
