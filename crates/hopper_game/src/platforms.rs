//! Ride-on transport platforms. Every platform records the displacement its
//! motion produced this frame; the collision pass propagates it onto any
//! rider standing close enough (the "ride" heuristic), independent of full
//! rectangle overlap.

use crate::entity::{Body, Durability, Entity, EntityTag};
use crate::services::{AudioQueue, Canvas, ImageId, OneShot, SoundId};
use glam::Vec2;
use hopper_core::bounds::{Bounds, Metrics};
use hopper_core::trajectory::{Circle, Parabola, Patrol};

pub enum PlatformMotion {
    Fixed,
    /// Horizontal back-and-forth.
    Boat(Patrol),
    /// Vertical back-and-forth.
    Lift(Patrol),
    Orbit(Circle),
    Glide(Parabola),
}

pub struct Platform {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    image: ImageId,
    thump: SoundId,
    smash: OneShot,
    motion: PlatformMotion,
    /// Displacement produced by the last update; what riders inherit.
    offset: Vec2,
}

impl Platform {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: ImageId,
        thump: SoundId,
        smash: SoundId,
        pos: Vec2,
        size: Vec2,
        motion: PlatformMotion,
        metrics: &Metrics,
    ) -> Self {
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(false, false),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            image,
            thump,
            smash: OneShot::new(smash),
            motion,
            offset: Vec2::ZERO,
        }
    }

    /// Propagates this frame's displacement onto a rider. Bypasses the
    /// frozen gate on purpose: the ride moves the rider's position the way
    /// the platform itself moved.
    pub fn carry(&self, rider: &mut Body) {
        rider.pos += self.offset;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Same bonk rules as a brick; platforms are just non-destructible by
    /// default, so the usual answer is a thump.
    pub fn bonk(&mut self, hitter_big: bool, audio: &mut AudioQueue) {
        if !self.active.inside || self.durability.destroyed {
            return;
        }
        if hitter_big && self.durability.destructible {
            self.smash.play(audio);
            self.durability.destroyed = true;
        } else {
            audio.play(&self.thump);
        }
    }

    fn advance_motion(&mut self) {
        let mut rect = self.body.rect();
        self.offset = match &mut self.motion {
            PlatformMotion::Fixed => Vec2::ZERO,
            PlatformMotion::Boat(patrol) => Vec2::new(patrol.move_rect(&mut rect), 0.0),
            PlatformMotion::Lift(patrol) => Vec2::new(0.0, patrol.move_rect(&mut rect)),
            PlatformMotion::Orbit(circle) => circle.move_rect(&mut rect),
            PlatformMotion::Glide(parabola) => {
                parabola.right = self.body.facing_right;
                parabola.move_rect(&mut rect, false)
            }
        };
        self.body.sync_from(rect);
    }

    /// Hard speed cap of the underlying motion, for collision margins.
    #[allow(dead_code)]
    pub fn speed_limit(&self) -> f32 {
        match &self.motion {
            PlatformMotion::Fixed => 0.0,
            PlatformMotion::Boat(patrol) | PlatformMotion::Lift(patrol) => patrol.limit(),
            PlatformMotion::Orbit(circle) => circle.limit(),
            PlatformMotion::Glide(parabola) => parabola.limit(),
        }
    }

    #[cfg(test)]
    pub fn bank(&mut self, secs: f32) {
        match &mut self.motion {
            PlatformMotion::Fixed => {}
            PlatformMotion::Boat(patrol) | PlatformMotion::Lift(patrol) => patrol.bank(secs),
            PlatformMotion::Orbit(circle) => circle.bank(secs),
            PlatformMotion::Glide(parabola) => parabola.bank(secs),
        }
    }
}

impl Entity for Platform {
    fn update(&mut self, _audio: &mut AudioQueue) {
        let pos = self.body.pos;
        self.active.check(pos);
        self.durability.settle(&mut self.body.frozen);
        if self.active.inside && !self.durability.destroyed {
            self.visible.check(pos);
            self.advance_motion();
        } else {
            // A halted platform moves nothing, so it carries nothing.
            self.offset = Vec2::ZERO;
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.image, self.body.rect(), !self.body.facing_right);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if self.durability.destroyed {
            return;
        }
        self.body.shift(offset);
        match &mut self.motion {
            PlatformMotion::Boat(patrol) | PlatformMotion::Lift(patrol) => patrol.shift(offset),
            PlatformMotion::Orbit(circle) => circle.shift_center(offset),
            PlatformMotion::Fixed | PlatformMotion::Glide(_) => {}
        }
    }
}
