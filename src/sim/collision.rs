//! Hit-sphere collision detection
//!
//! Every collidable entity is reduced to a sphere. Touching spheres
//! (`distance == r1 + r2`) count as colliding; the comparison is done on
//! squared lengths so the boundary is exact for representable inputs.

use glam::Vec3;

/// Simplified collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSphere {
    pub position: Vec3,
    pub radius: f32,
}

impl HitSphere {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Finite center and a finite, non-negative radius
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}

/// Anything that can take part in a collision check.
///
/// Returns `None` while the entity cannot collide (destroyed, mid-teardown).
pub trait HitSphereProvider {
    fn hit_sphere(&self) -> Option<HitSphere>;
}

impl HitSphereProvider for HitSphere {
    fn hit_sphere(&self) -> Option<HitSphere> {
        Some(*self)
    }
}

/// Result of a sphere-sphere check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Impact point between the two surfaces (if hit)
    pub point: Vec3,
    /// Unit direction from the first sphere toward the second
    pub normal: Vec3,
    /// Overlap depth (0 when just touching)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Do the two spheres overlap or touch? Invalid spheres never collide.
pub fn intersects(a: &HitSphere, b: &HitSphere) -> bool {
    if !a.is_valid() || !b.is_valid() {
        log::debug!("ignoring collision check with invalid hit sphere: {a:?} vs {b:?}");
        return false;
    }
    let reach = a.radius + b.radius;
    a.position.distance_squared(b.position) <= reach * reach
}

/// Collision check between two providers; a missing sphere is a miss
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: HitSphereProvider + ?Sized,
    B: HitSphereProvider + ?Sized,
{
    match (a.hit_sphere(), b.hit_sphere()) {
        (Some(a), Some(b)) => intersects(&a, &b),
        _ => false,
    }
}

/// Point on the line between centers where the two surfaces meet, weighted
/// by radius. For touching spheres this is the contact point; for overlapping
/// spheres it splits the overlap proportionally so neither entity appears to
/// emit the effect from its own center.
pub fn impact_point(a: &HitSphere, b: &HitSphere) -> Vec3 {
    let offset = b.position - a.position;
    let total = a.radius + b.radius;
    if total <= f32::EPSILON {
        return a.position.lerp(b.position, 0.5);
    }
    a.position + offset * a.radius / total
}

/// Full sphere-sphere test with contact information
pub fn sphere_collision(a: &HitSphere, b: &HitSphere) -> CollisionResult {
    if !intersects(a, b) {
        return CollisionResult::miss();
    }

    let offset = b.position - a.position;
    let distance = offset.length();
    // Coincident centers have no direction; pick +X
    let normal = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec3::X
    };

    CollisionResult {
        hit: true,
        point: impact_point(a, b),
        normal,
        penetration: (a.radius + b.radius - distance).max(0.0),
    }
}
