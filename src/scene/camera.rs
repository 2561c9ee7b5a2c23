//! Free-look camera
//!
//! Owns position, yaw and pitch; the pipeline reads position and
//! forward-direction snapshots once per frame and never mutates them.

use crate::renderer::math::Vec3;

/// Pitch stops just short of straight up/down so the view basis never
/// degenerates
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.00001;

pub struct Camera {
    pos: Vec3,
    dir: Vec3,
    yaw: f32,
    pitch: f32,
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            pos: Vec3::ZERO,
            dir: Vec3::new(0.0, 0.0, 1.0),
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
        };
        camera.update_dir();
        camera
    }

    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    /// Move along the view direction
    pub fn translate_forward(&mut self, offset: f32) {
        self.pos += self.dir * offset;
    }

    pub fn translate_back(&mut self, offset: f32) {
        self.pos -= self.dir * offset;
    }

    /// Move along the view direction with Y locked (walking)
    pub fn translate_forward_no_y(&mut self, offset: f32) {
        self.pos += Vec3::new(self.dir.x, 0.0, self.dir.z).normalize() * offset;
    }

    pub fn translate_back_no_y(&mut self, offset: f32) {
        self.pos -= Vec3::new(self.dir.x, 0.0, self.dir.z).normalize() * offset;
    }

    pub fn translate_left(&mut self, offset: f32) {
        self.pos -= self.dir.cross(Vec3::UP).normalize() * offset;
    }

    pub fn translate_right(&mut self, offset: f32) {
        self.pos += self.dir.cross(Vec3::UP).normalize() * offset;
    }

    pub fn translate_up(&mut self, offset: f32) {
        self.pos.y += offset;
    }

    pub fn translate_down(&mut self, offset: f32) {
        self.pos.y -= offset;
    }

    pub fn rotate_horizontal(&mut self, offset: f32) {
        self.yaw += offset;
        self.update_dir();
    }

    pub fn rotate_vertical(&mut self, offset: f32) {
        self.pitch = (self.pitch + offset).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_dir();
    }

    fn update_dir(&mut self) {
        self.dir = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.0001;

    #[test]
    fn test_default_looks_along_positive_z() {
        let camera = Camera::new();
        assert!((camera.dir().z - 1.0).abs() < EPS);
        assert!(camera.dir().x.abs() < EPS);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::new();
        camera.rotate_vertical(10.0);
        // Looking almost straight up, but the direction stays finite
        assert!(camera.dir().y < 1.0);
        assert!(camera.dir().length() > 0.99);
    }

    #[test]
    fn test_forward_no_y_keeps_height() {
        let mut camera = Camera::new();
        camera.rotate_vertical(0.5);
        camera.translate_forward_no_y(2.0);
        assert!(camera.pos().y.abs() < EPS);
        assert!((camera.pos().z - 2.0).abs() < EPS);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let mut camera = Camera::new();
        camera.translate_right(1.0);
        assert!(camera.pos().dot(camera.dir()).abs() < EPS);
    }
}
