//! Geometric types shared by the raycasters and the field-of-view fan.

use glam::{Vec2, Vec3};

/// A ray in world coordinates.
///
/// `direction` is not required to be unit length; marching scales by its raw
/// magnitude unless normalization is requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2 {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray2 {
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Build a ray from an origin that may carry a third coordinate.
    /// The z component is dropped.
    pub fn from_point(origin: Vec3, direction: Vec2) -> Self {
        Self::new(origin.truncate(), direction)
    }

    /// Unit-length ray pointing at `angle` radians counter-clockwise from +x.
    pub fn from_angle(origin: Vec2, angle: f32) -> Self {
        Self::new(origin, Vec2::from_angle(angle))
    }

    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn from_angle_is_unit() {
        let ray = Ray2::from_angle(Vec2::ZERO, FRAC_PI_2);
        assert_relative_eq!(ray.direction.length(), 1.0);
        assert_relative_eq!(ray.direction.y, 1.0);
    }

    #[test]
    fn from_point_drops_z() {
        let ray = Ray2::from_point(Vec3::new(1.0, 2.0, 9.0), Vec2::X);
        assert_eq!(ray.origin, Vec2::new(1.0, 2.0));
        assert!(ray.is_finite());
        assert!(!Ray2::new(Vec2::NAN, Vec2::X).is_finite());
    }
}
