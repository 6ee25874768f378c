use glam::Vec3;

/// World-space position of an entity. The z component is optional in the
/// data model (spec: "position (x,y[,z])"); we store it as a full `Vec3`
/// with `z = 0.0` for purely 2D content so every geometry computation can
/// share one vector path instead of branching on dimensionality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec3::new(x, y, 0.0))
    }

    pub fn new_3d(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn distance(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Vector from `self` to `other`, normalized. Returns the zero vector
    /// when the two positions coincide (spec: "zero-division in
    /// normalization returns the zero vector").
    pub fn direction_to(&self, other: &Position) -> Vec3 {
        let delta = other.0 - self.0;
        if delta.length_squared() < f32::EPSILON {
            Vec3::ZERO
        } else {
            delta.normalize()
        }
    }

    /// Signed bearing in radians of `target` relative to the `forward`
    /// direction, both measured from `self`. Zero when `self == target`.
    pub fn bearing(&self, forward: Vec3, target: &Position) -> f32 {
        if forward.length_squared() < f32::EPSILON {
            return 0.0;
        }
        let to_target = self.direction_to(target);
        if to_target == Vec3::ZERO {
            return 0.0;
        }
        let forward = forward.normalize();
        let cos_angle = forward.dot(to_target).clamp(-1.0, 1.0);
        cos_angle.acos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_to_self_is_zero_vector() {
        let p = Position::new(3.0, 4.0);
        assert_eq!(p.direction_to(&p), Vec3::ZERO);
    }

    #[test]
    fn bearing_straight_ahead_is_zero() {
        let source = Position::new(0.0, 0.0);
        let target = Position::new(5.0, 0.0);
        let bearing = source.bearing(Vec3::X, &target);
        assert!(bearing.abs() < 1e-4);
    }

    #[test]
    fn bearing_behind_is_pi() {
        let source = Position::new(0.0, 0.0);
        let target = Position::new(-5.0, 0.0);
        let bearing = source.bearing(Vec3::X, &target);
        assert!((bearing - std::f32::consts::PI).abs() < 1e-4);
    }
}
