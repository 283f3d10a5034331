//! Triangle primitive and the degenerate sentinel

use super::{Aabb, Plane};
use crate::foundation::math::{nan_vec, Iso, Vec3, EPSILON};

/// A triangle in 3D space
///
/// Front faces are wound clockwise when seen from the front, so the face
/// normal is `(c - a) × (b - a)`.
///
/// Degenerate triangles (collinear or coincident vertices) are stored as the
/// [`Triangle::nan`] sentinel: every vertex is NaN, which makes every numeric
/// test on them fail without a dedicated branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
}

impl Triangle {
    /// Creates a triangle from three vertices as given
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Creates a triangle, substituting the NaN sentinel when degenerate
    pub fn from_vertices(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let triangle = Self::new(a, b, c);
        if triangle.is_degenerate() {
            Self::nan()
        } else {
            triangle
        }
    }

    /// The degenerate sentinel
    pub fn nan() -> Self {
        let n = nan_vec();
        Self { a: n, b: n, c: n }
    }

    /// True for the sentinel produced by [`Triangle::nan`]
    pub fn is_nan(&self) -> bool {
        self.a.x.is_nan()
    }

    /// True when the spanning edges are (nearly) parallel or any vertex is NaN
    ///
    /// Compares `|e1 × e2|` against `EPSILON * |e1| * |e2|`, i.e. the sine of
    /// the angle between the edges against `EPSILON`. Both sides are squared.
    pub fn is_degenerate(&self) -> bool {
        let e1 = self.c - self.a;
        let e2 = self.b - self.a;
        let cross = e1.cross(&e2).norm_squared();
        let scale = e1.norm_squared() * e2.norm_squared();
        !(cross > EPSILON * EPSILON * scale)
    }

    /// The three vertices in order
    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Edge vectors `b - a`, `c - b`, `a - c`
    #[inline]
    pub fn edges(&self) -> [Vec3; 3] {
        [self.b - self.a, self.c - self.b, self.a - self.c]
    }

    /// Unnormalized face normal
    #[inline]
    pub fn scaled_normal(&self) -> Vec3 {
        (self.c - self.a).cross(&(self.b - self.a))
    }

    /// Unit face normal (NaN for the sentinel)
    pub fn normal(&self) -> Vec3 {
        self.scaled_normal().normalize()
    }

    /// Plane through vertex `a` along the face normal
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(&self.a, &self.scaled_normal())
    }

    /// Centroid of the three vertices
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Area of the triangle
    pub fn area(&self) -> f32 {
        self.scaled_normal().magnitude() * 0.5
    }

    /// Axis-aligned box around the triangle (empty for the sentinel)
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.a, self.b, self.c])
    }

    /// This triangle after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        let t = |v: &Vec3| iso.transform_point(&(*v).into()).coords;
        Self::new(t(&self.a), t(&self.b), t(&self.c))
    }
}
