//! Compound trajectories: bounded patrol, angular orbit, angle-resolved
//! projectile arcs and the looping rain drip. Out-of-range constructor
//! inputs are clamped, not rejected; the engine has no fatal path.

use crate::motion::{signed_toward, Delta};
use crate::rect::Rect;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Back-and-forth movement along one axis between `begin` and
/// `begin + length`. `forward` means rightward when horizontal and downward
/// when vertical.
pub struct Patrol {
    speed: Delta,
    begin: f32,
    end: f32,
    vertical: bool,
    forward: bool,
    first_leg: bool,
}

impl Patrol {
    pub fn new(rate: f32, limit: f32, length: f32, initial: f32, vertical: bool) -> Self {
        Self {
            speed: Delta::new(rate, limit),
            begin: initial,
            end: initial + length,
            vertical,
            forward: true,
            first_leg: true,
        }
    }

    pub fn move_rect(&mut self, rect: &mut Rect) -> f32 {
        let offset = self.step(rect);
        if self.vertical {
            rect.translate(Vec2::new(0.0, offset));
        } else {
            rect.translate(Vec2::new(offset, 0.0));
        }
        offset
    }

    fn step(&mut self, rect: &Rect) -> f32 {
        let pos = self.axis_pos(rect);
        let mut stuck = false;
        if pos <= self.begin && self.first_leg {
            self.forward = true;
        } else if pos >= self.begin && pos < self.end && self.first_leg {
            self.forward = true;
        } else if pos >= self.end && self.first_leg {
            self.forward = true;
            self.first_leg = false;
        } else if pos >= self.end && !self.first_leg {
            self.forward = false;
        } else if pos <= self.end && pos > self.begin && !self.first_leg {
            self.forward = false;
        } else if pos <= self.begin && !self.first_leg {
            self.forward = false;
            self.first_leg = true;
        } else {
            stuck = true;
        }
        let offset = signed_toward(self.speed.current(), self.forward);
        if stuck {
            0.0
        } else {
            offset
        }
    }

    fn axis_pos(&self, rect: &Rect) -> f32 {
        if self.vertical {
            rect.center().y
        } else {
            rect.center().x
        }
    }

    /// Keeps the patrol interval anchored to the world when it shifts.
    pub fn shift(&mut self, offset: Vec2) {
        if self.vertical {
            self.begin += offset.y;
            self.end += offset.y;
        } else {
            self.begin += offset.x;
            self.end += offset.x;
        }
    }

    pub fn limit(&self) -> f32 {
        self.speed.limit()
    }

    pub fn forward(&self) -> bool {
        self.forward
    }

    pub fn span(&self) -> (f32, f32) {
        (self.begin, self.end)
    }

    pub fn bank(&mut self, secs: f32) {
        self.speed.bank(secs);
    }
}

/// Angular orbit around a center point. `clockwise` means the sampled angle
/// increment is kept positive.
pub struct Circle {
    speed: Delta,
    radius: f32,
    clockwise: bool,
    center: Vec2,
    angle: f32,
}

impl Circle {
    pub fn new(
        rate: f32,
        limit: f32,
        radius: f32,
        center: Vec2,
        initial_angle: f32,
        clockwise: bool,
    ) -> Self {
        let rate = clamp_angular(rate);
        let limit = clamp_angular(limit);
        let angle = if initial_angle.abs() >= TAU {
            log::warn!("orbit initial angle {initial_angle} out of range, reset to 0");
            0.0
        } else {
            initial_angle
        };
        Self {
            speed: Delta::new(rate, limit),
            radius,
            clockwise,
            center,
            angle,
        }
    }

    pub fn move_rect(&mut self, rect: &mut Rect) -> Vec2 {
        let offset = self.offset(rect);
        rect.translate(offset);
        offset
    }

    fn offset(&mut self, rect: &Rect) -> Vec2 {
        self.advance_angle();
        let target = self.center + self.radius * Vec2::new(self.angle.cos(), self.angle.sin());
        target - rect.center()
    }

    fn advance_angle(&mut self) {
        let da = signed_toward(self.speed.current(), self.clockwise);
        // Wrap before the increment, matching one-full-turn precision.
        if self.angle.abs() >= TAU {
            self.angle = 0.0;
        }
        self.angle += da;
    }

    pub fn shift_center(&mut self, offset: Vec2) {
        self.center += offset;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn limit(&self) -> f32 {
        self.speed.limit()
    }

    pub fn bank(&mut self, secs: f32) {
        self.speed.bank(secs);
    }
}

fn clamp_angular(speed: f32) -> f32 {
    if speed.abs() > TAU {
        log::warn!("angular speed {speed} out of range, clamped to pi/64");
        PI / 64.0
    } else {
        speed
    }
}

/// Angle-resolved projectile motion. The launch angle is given in degrees;
/// `right`/`down` pick the quadrant at sample time, so flipping the flags
/// mid-flight mirrors the arc.
pub struct Parabola {
    speed: Delta,
    fly_angle: f32,
    pub right: bool,
    pub down: bool,
}

impl Parabola {
    pub fn new(rate: f32, limit: f32, fly_angle_deg: f32, right: bool, down: bool) -> Self {
        Self {
            speed: Delta::new(rate, limit),
            fly_angle: fly_angle_deg.to_radians(),
            right,
            down,
        }
    }

    /// `mirrored` selects the mirrored-launch resolution used by fired
    /// projectiles, as opposed to gliding platforms.
    pub fn move_rect(&mut self, rect: &mut Rect, mirrored: bool) -> Vec2 {
        let offset = self.offset(mirrored);
        rect.translate(offset);
        offset
    }

    fn offset(&mut self, mirrored: bool) -> Vec2 {
        let angle = self.resolve_angle(mirrored);
        let speed = self.speed.current();
        let dx = speed * angle.cos();
        let dy = signed_toward(speed * angle.sin(), self.down);
        Vec2::new(dx, dy)
    }

    fn resolve_angle(&self, mirrored: bool) -> f32 {
        let mut angle = self.fly_angle;
        if self.fly_angle > FRAC_PI_2 && self.right {
            angle -= FRAC_PI_2;
        }
        if self.fly_angle < FRAC_PI_2 && !mirrored && !self.right {
            angle += FRAC_PI_2;
        }
        if mirrored && !self.right {
            angle += FRAC_PI_2;
        }
        angle
    }

    pub fn limit(&self) -> f32 {
        self.speed.limit()
    }

    pub fn bank(&mut self, secs: f32) {
        self.speed.bank(secs);
    }
}

/// Looping vertical fall: teleport to a random point in the upper spawn
/// band, fall past the lower bound, repeat. One per rain drop.
pub struct Drip {
    speed: Delta,
    middle_line: f32,
    span_x: (f32, f32),
    span_y: (f32, f32),
    falling: bool,
}

impl Drip {
    pub fn new(
        rate: f32,
        limit: f32,
        middle_line: f32,
        span_x: (f32, f32),
        span_y: (f32, f32),
    ) -> Self {
        Self {
            speed: Delta::new(rate.abs(), limit.abs()),
            middle_line,
            span_x,
            span_y,
            falling: false,
        }
    }

    pub fn move_rect(&mut self, rect: &mut Rect, rng: &mut impl Rng) {
        self.start_fall(rect, rng);
        let fall = self.speed.current();
        rect.translate(Vec2::new(0.0, fall));
        self.end_fall(rect);
    }

    fn start_fall(&mut self, rect: &mut Rect, rng: &mut impl Rng) {
        if !self.falling {
            rect.set_center(self.spawn_point(rng));
            self.falling = true;
        }
    }

    fn end_fall(&mut self, rect: &Rect) {
        if rect.center().y >= self.span_y.1 {
            self.falling = false;
        }
    }

    fn spawn_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rand_between(rng, self.span_x.0, self.span_x.1),
            rand_between(rng, self.span_y.0, self.middle_line),
        )
    }

    pub fn bank(&mut self, secs: f32) {
        self.speed.bank(secs);
    }
}

fn rand_between(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn drive_patrol(patrol: &mut Patrol, rect: &mut Rect, steps: usize) {
        for _ in 0..steps {
            patrol.bank(0.05);
            patrol.move_rect(rect);
        }
    }

    #[test]
    fn patrol_reverses_at_far_bound() {
        let mut patrol = Patrol::new(10.0, 10.0, 40.0, 0.0, false);
        // Drop the rect past the far bound: the first step retires the
        // first leg, the second runs backward.
        let mut rect = Rect::new(Vec2::new(40.0, 0.0), Vec2::new(10.0, 10.0));
        drive_patrol(&mut patrol, &mut rect, 2);
        assert!(
            !patrol.forward(),
            "after crossing the far bound the patrol must run backward"
        );
    }

    #[test]
    fn patrol_stays_near_its_interval() {
        let mut patrol = Patrol::new(5.0, 5.0, 30.0, 0.0, false);
        let mut rect = Rect::new(Vec2::new(-5.0, 0.0), Vec2::new(10.0, 10.0));
        for _ in 0..500 {
            patrol.bank(0.05);
            patrol.move_rect(&mut rect);
            let (begin, end) = patrol.span();
            let pos = rect.center().x;
            // Reversal takes effect one step after a bound is crossed, so
            // the legal overshoot is bounded by two capped steps.
            let slack = 2.0 * 5.0 * 0.75 + 0.001;
            assert!(
                pos >= begin - slack && pos <= end + slack,
                "pos {pos} escaped the patrol interval"
            );
        }
    }

    #[test]
    fn vertical_patrol_moves_y_only() {
        let mut patrol = Patrol::new(10.0, 10.0, 40.0, 0.0, true);
        let mut rect = Rect::new(Vec2::new(7.0, -5.0), Vec2::new(10.0, 10.0));
        drive_patrol(&mut patrol, &mut rect, 5);
        assert_eq!(rect.pos.x, 7.0);
        assert!(rect.pos.y != -5.0);
    }

    #[test]
    fn patrol_shift_translates_bounds() {
        let mut patrol = Patrol::new(10.0, 10.0, 40.0, 0.0, false);
        patrol.shift(Vec2::new(100.0, 0.0));
        assert_eq!(patrol.span(), (100.0, 140.0));
    }

    #[test]
    fn circle_clamps_excessive_angular_speed() {
        let circle = Circle::new(100.0, 100.0, 20.0, Vec2::ZERO, 0.0, true);
        assert_eq!(circle.limit(), PI / 64.0);
    }

    #[test]
    fn circle_resets_excessive_initial_angle() {
        let circle = Circle::new(0.1, 0.1, 20.0, Vec2::ZERO, 10.0, true);
        assert_eq!(circle.angle(), 0.0);
    }

    #[test]
    fn circle_keeps_rect_on_orbit() {
        let center = Vec2::new(50.0, 50.0);
        let mut circle = Circle::new(0.2, 0.2, 20.0, center, 0.0, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        for _ in 0..100 {
            circle.bank(0.1);
            circle.move_rect(&mut rect);
            let distance = (rect.center() - center).length();
            assert!(
                (distance - 20.0).abs() < 0.001,
                "rect center must sit on the orbit, got distance {distance}"
            );
        }
    }

    #[test]
    fn parabola_dy_sign_follows_down_flag() {
        let mut up = Parabola::new(10.0, 10.0, 45.0, true, false);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(4.0, 4.0));
        up.move_rect(&mut rect, false);
        assert!(rect.pos.y < 0.0, "down=false must rise");

        let mut down = Parabola::new(10.0, 10.0, 45.0, true, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(4.0, 4.0));
        down.move_rect(&mut rect, false);
        assert!(rect.pos.y > 0.0, "down=true must fall");
    }

    #[test]
    fn mirrored_launch_flips_horizontal_direction() {
        let mut right = Parabola::new(10.0, 10.0, 100.0, true, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(4.0, 4.0));
        right.move_rect(&mut rect, true);
        assert!(rect.pos.x > 0.0, "rightward launch must move right");

        let mut left = Parabola::new(10.0, 10.0, 100.0, false, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(4.0, 4.0));
        left.move_rect(&mut rect, true);
        assert!(rect.pos.x < 0.0, "mirrored launch must move left");
    }

    #[test]
    fn drip_respawns_in_upper_band_and_falls() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut drip = Drip::new(10.0, 10.0, 50.0, (0.0, 100.0), (0.0, 200.0));
        let mut rect = Rect::new(Vec2::new(500.0, 500.0), Vec2::new(2.0, 4.0));
        drip.move_rect(&mut rect, &mut rng);
        let center = rect.center();
        assert!(center.x >= 0.0 && center.x <= 100.0);
        assert!(
            center.y <= 50.0 + 7.5 + 0.001,
            "first step starts in the upper band, then falls at most one cap"
        );
        let before = rect.center().y;
        drip.move_rect(&mut rect, &mut rng);
        assert!(rect.center().y >= before, "a drip only ever falls");
    }
}
