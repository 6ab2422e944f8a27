//! Rate generators and the directional wrappers built on them.
//!
//! `Delta` is the foundation of all motion: it samples its own stopwatch and
//! turns wall-clock time into a bounded per-tick magnitude. The policy is
//! **snap, not clamp**: a raw value above 75% of the hard limiter (or a zero
//! raw value, as happens on the very first sample) snaps to the 75% cap
//! itself. Output is therefore either a small scaled value or exactly the
//! cap, never anything in between.

use crate::rect::Rect;
use crate::time::{Cooldown, Stopwatch};
use glam::Vec2;

/// Flips `magnitude` so its sign agrees with the requested direction.
pub(crate) fn signed_toward(magnitude: f32, positive: bool) -> f32 {
    if magnitude < 0.0 && positive {
        -magnitude
    } else if magnitude > 0.0 && !positive {
        -magnitude
    } else {
        magnitude
    }
}

pub struct Delta {
    rate: f32,
    /// The snap cap: 75% of the hard limiter. Both the threshold and the
    /// value returned when the threshold is crossed.
    cap: f32,
    /// Hard limiter. Collision callers use it as the anti-tunneling margin
    /// and it rescales with entity size; the cap does not follow it.
    limit: f32,
    watch: Stopwatch,
}

impl Delta {
    pub fn new(rate: f32, limit: f32) -> Self {
        Self {
            rate,
            cap: limit * 0.75,
            limit,
            watch: Stopwatch::new(),
        }
    }

    /// Magnitude for the elapsed time since the previous call.
    pub fn current(&mut self) -> f32 {
        let elapsed = self.watch.restart();
        self.fix(self.rate * elapsed)
    }

    /// Ordinary clamp-to-cap, for callers that want plain capping instead
    /// of the snap policy.
    pub fn clamp(&self, value: f32) -> f32 {
        if value > self.cap {
            self.cap
        } else {
            value
        }
    }

    fn fix(&self, value: f32) -> f32 {
        if value > self.cap || value == 0.0 {
            self.cap
        } else {
            value
        }
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn rescale_limit(&mut self, factor: f32) {
        self.limit *= factor;
    }

    pub fn cap(&self) -> f32 {
        self.cap
    }

    pub fn bank(&mut self, secs: f32) {
        self.watch.bank(secs);
    }
}

/// Directional speed: a `Delta` plus the facing flags. The direction
/// *argument* of a move decides the sign of the displacement; the stored
/// flag is updated to match afterwards.
pub struct Speed {
    delta: Delta,
    pub right: bool,
    pub down: bool,
}

impl Speed {
    pub fn new(rate: f32, limit: f32, right: bool) -> Self {
        Self {
            delta: Delta::new(rate, limit),
            right,
            down: true,
        }
    }

    pub fn move_x(&mut self, rect: &mut Rect, to_right: bool) {
        let shift = signed_toward(self.delta.current(), to_right);
        self.right = to_right;
        self.down = true;
        rect.translate(Vec2::new(shift, 0.0));
    }

    pub fn move_y(&mut self, rect: &mut Rect, down: bool) {
        let shift = signed_toward(self.delta.current(), down);
        self.down = down;
        rect.translate(Vec2::new(0.0, shift));
    }

    pub fn limit(&self) -> f32 {
        self.delta.limit()
    }

    pub fn rescale_limit(&mut self, factor: f32) {
        self.delta.rescale_limit(factor);
    }

    pub fn bank(&mut self, secs: f32) {
        self.delta.bank(secs);
    }
}

/// Downward pull with a grounded latch. While grounded the pull is zero and
/// the internal stopwatch is left running; the first airborne sample will
/// therefore snap to the cap.
pub struct Gravity {
    delta: Delta,
    pub grounded: bool,
    controlled: bool,
    release: Cooldown,
}

/// Interval after which controlled gravity force-releases the grounded
/// latch. Anti-stick safeguard for walkers that never jump.
const RELEASE_INTERVAL: f32 = 0.16;

impl Gravity {
    pub fn new(rate: f32, limit: f32, grounded: bool) -> Self {
        Self {
            delta: Delta::new(rate, limit),
            grounded,
            controlled: false,
            release: Cooldown::new(RELEASE_INTERVAL),
        }
    }

    /// Controlled mode: the grounded latch auto-releases after a fixed
    /// interval. The release fires only through `apply`, never passively.
    pub fn controlled(rate: f32, limit: f32, grounded: bool) -> Self {
        Self {
            controlled: true,
            ..Self::new(rate, limit, grounded)
        }
    }

    pub fn apply(&mut self, rect: &mut Rect) {
        if self.controlled {
            self.auto_release();
        }
        let fall = self.pull();
        rect.translate(Vec2::new(0.0, fall));
    }

    fn auto_release(&mut self) {
        if self.release.ready() {
            self.grounded = false;
            self.release.reset();
        }
    }

    /// Zero while grounded, otherwise the sampled magnitude.
    pub fn pull(&mut self) -> f32 {
        if self.grounded {
            0.0
        } else {
            self.delta.current()
        }
    }

    pub fn bank(&mut self, secs: f32) {
        self.delta.bank(secs);
    }
}

/// Capped rise. Constructed with a *negative* limit so every sample snaps
/// to a constant upward step; the rise ends when the rect crosses `height`
/// above the `ground` reference line recorded at the last landing.
pub struct Jump {
    delta: Delta,
    pub ground: f32,
    pub height: f32,
    pub jumped: bool,
    pub in_jumping: bool,
}

impl Jump {
    pub fn new(rate: f32, limit: f32, ground: f32, height: f32) -> Self {
        Self {
            delta: Delta::new(rate, limit),
            ground,
            height,
            jumped: false,
            in_jumping: true,
        }
    }

    pub fn jumping(&mut self, rect: &mut Rect) {
        if self.jumped {
            return;
        }
        self.in_jumping = true;
        let rise = self.delta.current();
        rect.translate(Vec2::new(0.0, rise));
        self.limit_height(rect);
    }

    fn limit_height(&mut self, rect: &mut Rect) {
        if (rect.top() - self.ground).abs() >= self.height {
            rect.pos.y = self.ground - self.height;
            self.stop();
        }
    }

    /// Consumes the jump: no further rise until a landing resets `jumped`.
    pub fn stop(&mut self) {
        self.in_jumping = false;
        self.jumped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_never_lands_between_cap_and_limit() {
        let mut delta = Delta::new(40.0, 100.0);
        delta.bank(0.5);
        for _ in 0..200 {
            let value = delta.current();
            assert!(
                value <= delta.cap(),
                "output {value} must never exceed the 75% cap {}",
                delta.cap()
            );
            delta.bank(0.01);
        }
    }

    #[test]
    fn delta_snaps_to_cap_on_zero_and_overshoot() {
        let mut delta = Delta::new(10.0, 8.0);
        // First sample: effectively zero elapsed time snaps to the cap.
        let first = delta.current();
        assert_eq!(first, delta.cap());
        // Huge elapsed time overshoots and snaps to the cap as well.
        delta.bank(100.0);
        assert_eq!(delta.current(), delta.cap());
    }

    #[test]
    fn delta_passes_small_values_through() {
        let mut delta = Delta::new(10.0, 100.0);
        let _ = delta.current();
        delta.bank(0.1);
        let value = delta.current();
        assert!(value >= 1.0, "banked 0.1s at rate 10 should yield >= 1.0");
        assert!(value < delta.cap());
    }

    #[test]
    fn clamp_is_a_plain_cap() {
        let delta = Delta::new(10.0, 100.0);
        assert_eq!(delta.clamp(200.0), 75.0);
        assert_eq!(delta.clamp(10.0), 10.0);
        assert_eq!(delta.clamp(0.0), 0.0);
    }

    #[test]
    fn rescale_limit_leaves_cap_alone() {
        let mut delta = Delta::new(10.0, 100.0);
        delta.rescale_limit(2.0);
        assert_eq!(delta.limit(), 200.0);
        assert_eq!(delta.cap(), 75.0);
    }

    #[test]
    fn speed_move_x_updates_facing_from_argument() {
        let mut speed = Speed::new(10.0, 100.0, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        speed.move_x(&mut rect, false);
        assert!(!speed.right);
        assert!(rect.pos.x < 0.0, "moving left must decrease x");
        speed.move_x(&mut rect, true);
        assert!(speed.right);
    }

    #[test]
    fn speed_move_y_direction_follows_argument() {
        let mut speed = Speed::new(10.0, 100.0, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        speed.move_y(&mut rect, false);
        assert!(!speed.down);
        assert!(rect.pos.y < 0.0, "moving up must decrease y");
    }

    #[test]
    fn grounded_gravity_never_displaces() {
        let mut gravity = Gravity::new(50.0, 100.0, true);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        for _ in 0..50 {
            gravity.bank(10.0);
            gravity.apply(&mut rect);
            assert_eq!(rect.pos.y, 0.0, "grounded gravity must be inert");
        }
    }

    #[test]
    fn airborne_gravity_falls() {
        let mut gravity = Gravity::new(50.0, 100.0, false);
        let mut rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        gravity.apply(&mut rect);
        assert!(rect.pos.y > 0.0);
    }

    #[test]
    fn jump_height_never_exceeds_configured_height() {
        let ground = 100.0;
        let height = 30.0;
        let mut jump = Jump::new(10.0, -12.0, ground, height);
        let mut rect = Rect::new(Vec2::new(0.0, 90.0), Vec2::new(8.0, 10.0));
        for _ in 0..100 {
            jump.jumping(&mut rect);
            assert!(
                (rect.top() - ground).abs() <= height,
                "rise must stay within the configured height"
            );
        }
        assert!(jump.jumped, "crossing the limit must consume the jump");
        assert!(!jump.in_jumping);
        assert_eq!(rect.pos.y, ground - height);
    }

    #[test]
    fn consumed_jump_is_inert() {
        let mut jump = Jump::new(10.0, -12.0, 100.0, 30.0);
        jump.stop();
        let mut rect = Rect::new(Vec2::new(0.0, 90.0), Vec2::new(8.0, 10.0));
        jump.jumping(&mut rect);
        assert_eq!(rect.pos.y, 90.0);
    }
}
