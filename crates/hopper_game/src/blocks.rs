//! The block family: solid bricks, walking crates, pickups and the
//! surprise block. Each kind composes a `Body`, a `Durability` and the
//! motion it needs; the old idea of a block class chain is gone.

use crate::entity::{Body, Collector, Durability, Entity, EntityTag};
use crate::groups::Collection;
use crate::services::{AudioQueue, Canvas, ImageId, OneShot, SoundId};
use crate::spawn::{PickupSpawner, Spawner};
use crate::sprite::Frames;
use glam::Vec2;
use hopper_core::bounds::{Bounds, Metrics};
use hopper_core::motion::{Gravity, Speed};

/// Ground and brick blocks. Destructible bricks break when bonked from
/// below by a grown hitter; everything else answers with a thump.
pub struct Brick {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    image: ImageId,
    thump: SoundId,
    smash: OneShot,
}

impl Brick {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: ImageId,
        thump: SoundId,
        smash: SoundId,
        pos: Vec2,
        size: Vec2,
        destructible: bool,
        physical: bool,
        metrics: &Metrics,
    ) -> Self {
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(destructible, physical),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            image,
            thump,
            smash: OneShot::new(smash),
        }
    }

    /// Ceiling-bonk hook, fired by the collision resolver at the moment a
    /// rising mover hits the underside.
    pub fn bonk(&mut self, hitter_big: bool, audio: &mut AudioQueue) {
        if !self.active.inside || self.durability.destroyed {
            return;
        }
        if hitter_big && self.durability.destructible {
            self.break_open(audio);
        } else {
            audio.play(&self.thump);
        }
    }

    /// Unconditional break, the projectile path. A non-destructible brick
    /// still shrugs the flag off on its next settle.
    pub fn break_open(&mut self, audio: &mut AudioQueue) {
        self.smash.play(audio);
        self.durability.destroyed = true;
    }
}

impl Entity for Brick {
    fn update(&mut self, _audio: &mut AudioQueue) {
        let pos = self.body.pos;
        self.active.check(pos);
        self.durability.settle(&mut self.body.frozen);
        if self.active.inside && !self.durability.destroyed {
            self.visible.check(pos);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.image, self.body.rect(), !self.body.facing_right);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if !self.durability.destroyed {
            self.body.shift(offset);
        }
    }
}

/// Ground motion shared by crates and the walking shrooms: capped speed
/// plus controlled gravity, halted for good on destruction.
pub struct Walker {
    pub speed: Speed,
    pub gravity: Gravity,
    pub moving: bool,
}

impl Walker {
    pub fn new(rate: f32, limit: f32, mass: f32, fall_limit: f32) -> Self {
        Self {
            speed: Speed::new(rate, limit, true),
            gravity: Gravity::controlled(mass, fall_limit, false),
            moving: true,
        }
    }

    pub fn step(&mut self, body: &mut Body) {
        let mut rect = body.rect();
        self.gravity.apply(&mut rect);
        if self.moving {
            self.speed.move_x(&mut rect, body.facing_right);
        }
        body.sync_from(rect);
    }

    pub fn halt(&mut self) {
        self.moving = false;
        self.gravity.grounded = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Coin { value: u32 },
    FireFlower { ammo: u32 },
    LifeShroom { lives: u32 },
    SuperShroom { marker: u32 },
}

/// Collectible items. Coins and fire flowers sit in place and animate;
/// shroom kinds carry a `Walker` and wander until collected.
pub struct Pickup {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    frames: Frames,
    current: ImageId,
    sound: OneShot,
    pub kind: PickupKind,
    pub walker: Option<Walker>,
}

impl Pickup {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        images: Vec<ImageId>,
        sound: SoundId,
        pos: Vec2,
        size: Vec2,
        frame_step: f32,
        kind: PickupKind,
        walker: Option<Walker>,
        metrics: &Metrics,
    ) -> Self {
        let physical = walker.is_some();
        let frames = Frames::new(images, frame_step);
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(true, physical),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            current: frames.first().clone(),
            frames,
            sound: OneShot::new(sound),
            kind,
            walker,
        }
    }

    /// One-directional interaction: this pickup acts on the target. The
    /// consume sound is guarded, so a second overlapping call after the
    /// pickup died is silent.
    pub fn collect(&mut self, target: &mut dyn Collector, audio: &mut AudioQueue) {
        let engaged = target.rect().overlaps(&self.body.rect()) && self.active.inside;
        if !engaged || self.durability.destroyed {
            return;
        }
        match self.kind {
            PickupKind::Coin { value } => {
                target.add_coins(value);
                self.consume(audio);
            }
            PickupKind::LifeShroom { lives } => {
                target.add_lives(lives);
                self.consume(audio);
            }
            PickupKind::SuperShroom { marker } => {
                if target.grow(marker) {
                    self.consume(audio);
                }
            }
            PickupKind::FireFlower { ammo } => {
                target.ignite(ammo);
                self.consume(audio);
            }
        }
    }

    fn consume(&mut self, audio: &mut AudioQueue) {
        self.durability.destroyed = true;
        self.sound.play(audio);
    }

    fn settle(&mut self) {
        if !self.durability.destructible {
            self.durability.destroyed = false;
        }
        if self.durability.destroyed {
            self.body.frozen = true;
            if let Some(walker) = self.walker.as_mut() {
                walker.halt();
            }
        }
    }
}

impl Entity for Pickup {
    fn update(&mut self, _audio: &mut AudioQueue) {
        self.active.check(self.body.pos);
        self.settle();
        if self.active.inside && !self.durability.destroyed {
            if let Some(walker) = self.walker.as_mut() {
                walker.step(&mut self.body);
            }
            self.visible.check(self.body.pos);
            self.current = self.frames.advance().clone();
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.current, self.body.rect(), !self.body.facing_right);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if !self.durability.destroyed {
            self.body.shift(offset);
        }
    }
}

/// A pushable walking box: a solid mover with no gameplay effects.
pub struct CrateBox {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    image: ImageId,
    pub walker: Walker,
}

impl CrateBox {
    pub fn new(
        image: ImageId,
        pos: Vec2,
        size: Vec2,
        walker: Walker,
        metrics: &Metrics,
    ) -> Self {
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(true, true),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            image,
            walker,
        }
    }
}

impl Entity for CrateBox {
    fn update(&mut self, _audio: &mut AudioQueue) {
        self.active.check(self.body.pos);
        if !self.durability.destructible {
            self.durability.destroyed = false;
        }
        if self.durability.destroyed {
            self.body.frozen = true;
            self.walker.halt();
        }
        if self.active.inside && !self.durability.destroyed {
            self.walker.step(&mut self.body);
            self.visible.check(self.body.pos);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.image, self.body.rect(), !self.body.facing_right);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if !self.durability.destroyed {
            self.body.shift(offset);
        }
    }
}

/// Bonk it from below once and it spends itself on a single weighted
/// reward; afterwards only the spent face and the collision sound remain.
pub struct SurpriseBlock {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    face: ImageId,
    spent_face: ImageId,
    thump: SoundId,
    pub unleashed: bool,
    reward: PickupSpawner,
}

impl SurpriseBlock {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        face: ImageId,
        spent_face: ImageId,
        thump: SoundId,
        pos: Vec2,
        size: Vec2,
        reward: PickupSpawner,
        metrics: &Metrics,
    ) -> Self {
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(false, true),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            face,
            spent_face,
            thump,
            unleashed: false,
            reward,
        }
    }

    /// Ceiling-bonk hook: replays the collision sound every time, spawns
    /// the reward exactly once.
    pub fn bonk(&mut self, rewards: &mut Collection<Pickup>, audio: &mut AudioQueue) {
        if !self.active.inside || self.durability.destroyed {
            return;
        }
        audio.play(&self.thump);
        if !self.unleashed {
            let pos = Vec2::new(self.body.pos.x, self.body.pos.y - self.reward.size().y);
            rewards.enqueue(self.reward.spawn(pos));
            self.unleashed = true;
        }
    }
}

impl Entity for SurpriseBlock {
    fn update(&mut self, _audio: &mut AudioQueue) {
        let pos = self.body.pos;
        self.active.check(pos);
        self.durability.settle(&mut self.body.frozen);
        if self.active.inside && !self.durability.destroyed {
            self.visible.check(pos);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.durability.destroyed || !self.visible.inside {
            return;
        }
        let face = if self.unleashed {
            &self.spent_face
        } else {
            &self.face
        };
        canvas.blit(face, self.body.rect(), !self.body.facing_right);
    }

    fn shift(&mut self, offset: Vec2) {
        if !self.durability.destroyed {
            self.body.shift(offset);
        }
    }
}
