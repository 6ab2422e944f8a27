//! Dead-zone follow camera. Each frame it produces the world shift that
//! keeps the target at its lead distance; the shift is then applied to the
//! target and every non-frozen entity alike.

use glam::Vec2;

pub struct Camera {
    pub pos: Vec2,
    /// Lead distance while the target faces right.
    pub lead_right: f32,
    /// Lead distance while the target faces left.
    pub lead_left: f32,
    /// Height kept between the target's feet and the anchor.
    pub lead_y: f32,
}

impl Camera {
    pub fn new(pos: Vec2, lead_right: f32, lead_left: f32, lead_y: f32) -> Self {
        Self {
            pos,
            lead_right,
            lead_left,
            lead_y,
        }
    }

    /// World shift that re-centers the target this frame.
    pub fn offset(&self, target_pos: Vec2, target_size: Vec2, facing_right: bool) -> Vec2 {
        let delta = target_pos - self.pos;
        let off_x = if facing_right {
            delta.x - self.lead_right
        } else {
            delta.x - self.lead_left
        };
        let off_y = delta.y + target_size.y - self.lead_y;
        Vec2::new(-off_x, -off_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_at_the_lead_point_needs_no_shift() {
        let camera = Camera::new(Vec2::ZERO, 100.0, 300.0, 160.0);
        let size = Vec2::new(60.0, 60.0);
        let offset = camera.offset(Vec2::new(100.0, 100.0), size, true);
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn target_ahead_of_the_lead_pulls_the_world_back() {
        let camera = Camera::new(Vec2::ZERO, 100.0, 300.0, 160.0);
        let size = Vec2::new(60.0, 60.0);
        let offset = camera.offset(Vec2::new(150.0, 100.0), size, true);
        assert_eq!(offset.x, -50.0);
    }

    #[test]
    fn facing_flips_the_lead_distance() {
        let camera = Camera::new(Vec2::ZERO, 100.0, 300.0, 160.0);
        let size = Vec2::new(60.0, 60.0);
        let right = camera.offset(Vec2::new(200.0, 100.0), size, true);
        let left = camera.offset(Vec2::new(200.0, 100.0), size, false);
        assert_eq!(right.x, -100.0);
        assert_eq!(left.x, 100.0);
    }
}
