//! Directional light

use crate::renderer::math::Vec3;

/// A single directional light; the direction is normalized (and
/// mirrored in X to match the view handedness) on set.
pub struct Light {
    dir: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        let mut light = Self { dir: Vec3::ZERO };
        light.set_dir(direction);
        light
    }

    pub fn set_dir(&mut self, direction: Vec3) {
        self.dir = Vec3::new(-direction.x, direction.y, direction.z).normalize();
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_normalized() {
        let light = Light::new(Vec3::new(0.8, 1.0, -0.5));
        assert!((light.dir().length() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_x_mirrored() {
        let light = Light::new(Vec3::new(1.0, 0.0, 0.0));
        assert!(light.dir().x < 0.0);
    }

    #[test]
    fn test_zero_direction_degrades_to_zero() {
        let light = Light::new(Vec3::ZERO);
        assert_eq!(light.dir(), Vec3::ZERO);
    }
}
