use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::math::{sgn, Mat3, Vec3, EPSILON};
use crate::render::Renderer;

/// Spacing (world units) between ground-contact samples along a box edge.
///
/// A tuning constant: finer spacing gives smoother ground contact on large
/// boxes at the cost of more samples to test per step.
pub const COLLISION_SAMPLE_SPACING: f32 = 0.1;

/// Upper bound on the segments a single box edge is split into.
///
/// Boxes whose edges are longer than this many spacings get coarser samples.
pub const MAX_EDGE_SUBDIVISIONS: usize = 256;

/// The kind of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A sphere
    Sphere,
    /// A box (cuboid)
    Box,
}

/// A collision shape owned by a rigid body.
///
/// Both variants are centered on the body's center of mass and aligned with
/// its principal axes, so the inertia tensor is always diagonal.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A sphere defined by its radius
    Sphere(Sphere),
    /// A box (cuboid) defined by half-extents
    Box(BoxShape),
}

/// Result of a point query against a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointQuery {
    /// Signed distance from the surface; negative inside
    pub distance: f32,
    /// Outward surface normal closest to the query point
    pub normal: Vec3,
}

impl PointQuery {
    /// True when the query point lies strictly inside the shape
    #[inline]
    pub fn is_penetrating(&self) -> bool {
        self.distance < 0.0
    }
}

/// Result of a ray query, expressed in the frame the ray was given in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the (normalized) ray direction
    pub distance: f32,
    /// Hit point
    pub point: Vec3,
    /// Outward surface normal at the hit point
    pub normal: Vec3,
}

impl Shape {
    /// Creates a sphere shape
    pub fn sphere(radius: f32) -> Result<Self, ConfigurationError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigurationError::InvalidRadius(radius));
        }
        Ok(Self::Sphere(Sphere::new(radius)))
    }

    /// Creates a box shape from half-extents, generating its ground samples
    pub fn cuboid(half_extents: Vec3) -> Result<Self, ConfigurationError> {
        if !(half_extents.is_finite() && half_extents.min_element() > 0.0) {
            return Err(ConfigurationError::InvalidHalfExtents(half_extents));
        }
        Ok(Self::Box(BoxShape::new(half_extents)))
    }

    /// Returns the shape kind
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Box(_) => ShapeKind::Box,
        }
    }

    /// Inertia tensor for unit mass; multiply by the body mass for `I_body`.
    #[inline]
    pub fn moment_of_inertia(&self) -> Mat3 {
        match self {
            Shape::Sphere(s) => s.moment_of_inertia(),
            Shape::Box(b) => b.moment_of_inertia(),
        }
    }

    /// Signed distance and outward normal of a point given in the local frame
    #[inline]
    pub fn collision_test(&self, point: Vec3) -> PointQuery {
        match self {
            Shape::Sphere(s) => s.collision_test(point),
            Shape::Box(b) => b.collision_test(point),
        }
    }

    /// Surface points used for ground contact (empty for spheres)
    #[inline]
    pub fn collision_samples(&self) -> &[Vec3] {
        match self {
            Shape::Sphere(_) => &[],
            Shape::Box(b) => &b.samples,
        }
    }

    /// Casts a ray given in the local frame.
    ///
    /// Rays starting inside the shape report no hit.
    #[inline]
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let hit = match self {
            Shape::Sphere(s) => s.ray_cast(origin, direction),
            Shape::Box(b) => b.ray_cast(origin, direction),
        }?;
        (hit.distance <= max_distance).then_some(hit)
    }

    /// Issues the draw call for this shape in its local frame
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R, surface: bool) {
        match self {
            Shape::Sphere(s) => renderer.draw_sphere(Vec3::ZERO, s.radius, surface),
            Shape::Box(b) => renderer.draw_box(-b.half_extents, b.half_extents, surface),
        }
    }

    /// Returns the sphere description, if this is a sphere
    #[inline]
    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Box(_) => None,
        }
    }

    /// Returns the box description, if this is a box
    #[inline]
    pub fn as_box(&self) -> Option<&BoxShape> {
        match self {
            Shape::Box(b) => Some(b),
            Shape::Sphere(_) => None,
        }
    }
}

/// A sphere collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given radius (not validated)
    #[inline]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// `2/5 r²` on the diagonal
    #[inline]
    pub fn moment_of_inertia(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(0.4 * self.radius * self.radius))
    }

    /// Distance from the surface; the normal points away from the center
    #[inline]
    pub fn collision_test(&self, point: Vec3) -> PointQuery {
        PointQuery {
            distance: point.length() - self.radius,
            normal: point.normalize_or_zero(),
        }
    }

    /// Ray against a sphere centered at the origin; `direction` is unit length
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let b = origin.dot(direction);
        let c = origin.length_squared() - self.radius * self.radius;
        if c < 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -b - discriminant.sqrt();
        if t < 0.0 {
            return None;
        }
        let point = origin + direction * t;
        Some(RayHit {
            distance: t,
            point,
            normal: point.normalize_or_zero(),
        })
    }
}

/// A box (cuboid) collision shape with precomputed ground samples
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    /// Half-extents (half the size in each dimension)
    pub half_extents: Vec3,
    samples: Vec<Vec3>,
}

impl BoxShape {
    /// Creates a new box with the given half-extents (not validated)
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            samples: edge_samples(half_extents, COLLISION_SAMPLE_SPACING),
        }
    }

    /// Ground-contact samples in the local frame; the first 8 are the corners
    #[inline]
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    /// The 8 corners of the box in the local frame
    #[inline]
    pub fn corners(&self) -> &[Vec3] {
        &self.samples[..8]
    }

    /// `(hy²+hz²)/3`, `(hx²+hz²)/3`, `(hx²+hy²)/3` on the diagonal
    #[inline]
    pub fn moment_of_inertia(&self) -> Mat3 {
        let h2 = self.half_extents * self.half_extents;
        Mat3::from_diagonal(Vec3::new(h2.y + h2.z, h2.x + h2.z, h2.x + h2.y) / 3.0)
    }

    /// Distance to the nearest face from inside, or to the clamped closest
    /// surface point from outside.
    pub fn collision_test(&self, point: Vec3) -> PointQuery {
        let h = self.half_extents;
        let mut distance = f32::NEG_INFINITY;
        let mut normal = Vec3::ZERO;
        for axis in 0..3 {
            let violation = point[axis].abs() - h[axis];
            if violation > distance {
                distance = violation;
                normal = Vec3::ZERO;
                normal[axis] = sgn(point[axis]);
            }
        }

        if distance > 0.0 {
            let offset = point - point.clamp(-h, h);
            distance = offset.length();
            normal = offset.normalize_or_zero();
        }

        PointQuery { distance, normal }
    }

    /// Slab test against the box; `direction` is unit length
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let h = self.half_extents;
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = 0;

        for axis in 0..3 {
            if direction[axis].abs() < EPSILON {
                if origin[axis].abs() > h[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction[axis];
            let t1 = (-h[axis] - origin[axis]) * inv;
            let t2 = (h[axis] - origin[axis]) * inv;
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            if near > t_enter {
                t_enter = near;
                enter_axis = axis;
            }
            t_exit = t_exit.min(far);
        }

        if t_enter > t_exit || t_enter < 0.0 {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[enter_axis] = -sgn(direction[enter_axis]);
        Some(RayHit {
            distance: t_enter,
            point: origin + direction * t_enter,
            normal,
        })
    }
}

/// Corners first, then interior points along each of the 12 edges.
fn edge_samples(half_extents: Vec3, spacing: f32) -> Vec<Vec3> {
    let o = -half_extents;
    let x = Vec3::new(2.0 * half_extents.x, 0.0, 0.0);
    let y = Vec3::new(0.0, 2.0 * half_extents.y, 0.0);
    let z = Vec3::new(0.0, 0.0, 2.0 * half_extents.z);

    let mut samples = vec![
        o,
        o + x,
        o + y,
        o + z,
        o + x + y,
        o + y + z,
        o + z + x,
        o + x + y + z,
    ];

    // Each axis owns four parallel edges, offset by the other two axes
    for (edge, a, b) in [(x, y, z), (y, x, z), (z, x, y)] {
        let n = (edge.length() / spacing)
            .ceil()
            .min(MAX_EDGE_SUBDIVISIONS as f32) as usize;
        for i in 1..n {
            let t = i as f32 / n as f32;
            let p = o + edge * t;
            samples.extend_from_slice(&[p, p + a, p + b, p + a + b]);
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPSILON
    }

    fn diagonal(m: Mat3) -> Vec3 {
        Vec3::new(m.x_axis.x, m.y_axis.y, m.z_axis.z)
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert_eq!(
            Shape::sphere(0.0),
            Err(ConfigurationError::InvalidRadius(0.0))
        );
        assert!(Shape::sphere(f32::NAN).is_err());
        assert!(matches!(
            Shape::cuboid(Vec3::new(1.0, -1.0, 1.0)),
            Err(ConfigurationError::InvalidHalfExtents(_))
        ));
        assert!(Shape::cuboid(Vec3::new(1.0, f32::INFINITY, 1.0)).is_err());
    }

    #[test]
    fn test_sphere_moment() {
        let shape = Shape::sphere(0.5).unwrap();
        let m = shape.moment_of_inertia();
        assert!(vec3_approx_eq(diagonal(m), Vec3::splat(0.1)));
        assert_eq!(m.x_axis.y, 0.0);
    }

    #[test]
    fn test_box_moment() {
        let shape = Shape::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let d = diagonal(shape.moment_of_inertia());
        assert!(approx_eq(d.x, 13.0 / 3.0));
        assert!(approx_eq(d.y, 10.0 / 3.0));
        assert!(approx_eq(d.z, 5.0 / 3.0));
    }

    #[test]
    fn test_sphere_collision_test() {
        let shape = Shape::sphere(1.0).unwrap();

        let q = shape.collision_test(Vec3::new(0.0, 0.5, 0.0));
        assert!(q.is_penetrating());
        assert!(approx_eq(q.distance, -0.5));
        assert!(vec3_approx_eq(q.normal, Vec3::Y));

        let q = shape.collision_test(Vec3::new(3.0, 0.0, 4.0));
        assert!(!q.is_penetrating());
        assert!(approx_eq(q.distance, 4.0));
        assert!(vec3_approx_eq(q.normal, Vec3::new(0.6, 0.0, 0.8)));
    }

    #[test]
    fn test_box_collision_test_inside_picks_closest_face() {
        let shape = Shape::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();

        let q = shape.collision_test(Vec3::new(0.2, -1.8, 0.0));
        assert!(q.is_penetrating());
        assert!(approx_eq(q.distance, -0.2));
        assert!(vec3_approx_eq(q.normal, -Vec3::Y));
    }

    #[test]
    fn test_box_collision_test_outside_face_and_corner() {
        let shape = Shape::cuboid(Vec3::ONE).unwrap();

        // Straight out of the +X face
        let q = shape.collision_test(Vec3::new(1.5, 0.2, -0.3));
        assert!(!q.is_penetrating());
        assert!(approx_eq(q.distance, 0.5));
        assert!(vec3_approx_eq(q.normal, Vec3::X));

        // Diagonally past a corner: distance to the clamped corner point
        let q = shape.collision_test(Vec3::new(2.0, 2.0, 1.0));
        assert!(approx_eq(q.distance, 2.0_f32.sqrt()));
        assert!(vec3_approx_eq(q.normal, Vec3::new(1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_box_samples() {
        let shape = Shape::cuboid(Vec3::splat(0.1)).unwrap();
        let samples = shape.collision_samples();

        // 8 corners plus one midpoint on each of the 12 edges
        assert_eq!(samples.len(), 20);
        for corner in &samples[..8] {
            assert!(vec3_approx_eq(corner.abs(), Vec3::splat(0.1)));
        }

        // Every sample lies on the surface
        for &s in samples {
            assert!(shape.collision_test(s).distance.abs() < EPSILON);
        }
    }

    #[test]
    fn test_box_samples_scale_with_edge_length() {
        let b = BoxShape::new(Vec3::new(0.2, 0.4, 0.2));
        // x and z edges split in 4, y edges split in 8
        let expected = 8 + 4 * (3 + 7 + 3);
        assert_eq!(b.samples().len(), expected);
        assert_eq!(b.corners().len(), 8);
    }

    #[test]
    fn test_sphere_has_no_samples() {
        assert!(Shape::sphere(1.0).unwrap().collision_samples().is_empty());
    }

    #[test]
    fn test_huge_box_sample_count_bounded() {
        let shape = Shape::cuboid(Vec3::new(1e9, 0.5, 1e9)).unwrap();
        let samples = shape.collision_samples();

        // 8 corners plus at most 4 interior points per subdivision on each axis
        assert!(samples.len() <= 8 + 3 * 4 * (MAX_EDGE_SUBDIVISIONS - 1));
        assert!(samples.iter().all(|p| p.is_finite()));
        assert!(samples.iter().any(|p| p.x == 0.0 && p.z == -1e9));
    }

    #[test]
    fn test_ray_cast_sphere() {
        let shape = Shape::sphere(1.0).unwrap();

        let hit = shape
            .ray_cast(Vec3::new(-5.0, 0.0, 0.0), Vec3::X * 2.0, 100.0)
            .unwrap();
        assert!(approx_eq(hit.distance, 4.0));
        assert!(vec3_approx_eq(hit.normal, -Vec3::X));

        assert!(shape
            .ray_cast(Vec3::new(-5.0, 2.0, 0.0), Vec3::X, 100.0)
            .is_none());
        assert!(shape.ray_cast(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 3.0).is_none());
        assert!(shape.ray_cast(Vec3::ZERO, Vec3::X, 3.0).is_none());
    }

    #[test]
    fn test_ray_cast_box() {
        let shape = Shape::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();

        let hit = shape
            .ray_cast(Vec3::new(0.5, 10.0, 0.0), -Vec3::Y, 100.0)
            .unwrap();
        assert!(approx_eq(hit.distance, 8.0));
        assert!(vec3_approx_eq(hit.point, Vec3::new(0.5, 2.0, 0.0)));
        assert!(vec3_approx_eq(hit.normal, Vec3::Y));

        // Parallel to a slab and outside it
        assert!(shape
            .ray_cast(Vec3::new(5.0, 10.0, 0.0), -Vec3::Y, 100.0)
            .is_none());
    }
}
