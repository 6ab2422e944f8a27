//! Patrol monsters. An enemy walks its beat under gravity, bounces off
//! walls through the collision pass (horizontal repulse), and sits on the
//! health rung of the damage ladder: no forms, just hit points and then
//! death.

use crate::entity::{Body, Durability, Entity, EntityTag, Vulnerable};
use crate::services::{AudioQueue, Canvas, ImageId};
use crate::sprite::Skin;
use glam::Vec2;
use hopper_core::bounds::{Bounds, Metrics};
use hopper_core::counter::Health;
use hopper_core::motion::Gravity;
use hopper_core::rect::Rect;
use hopper_core::trajectory::Patrol;

pub struct Enemy {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    skin: Skin,
    current: ImageId,
    mirrored: bool,
    pub patrol: Patrol,
    pub gravity: Gravity,
    pub health: Health,
    pub alive: bool,
}

impl Enemy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        images: Vec<ImageId>,
        pos: Vec2,
        size: Vec2,
        patrol: Patrol,
        mass: f32,
        hp: f32,
        frame_step: f32,
        metrics: &Metrics,
    ) -> Self {
        let skin = Skin::new(images, frame_step, true);
        let current = skin.idle().clone();
        Self {
            body: Body::new(pos, size, EntityTag::Monster),
            durability: Durability::new(true, true),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            skin,
            current,
            mirrored: false,
            patrol,
            gravity: Gravity::controlled(mass, size.y * 0.5, false),
            health: Health::new(hp, hp),
            alive: true,
        }
    }

    fn settle(&mut self) {
        if self.health.depleted() {
            self.alive = false;
        }
        if !self.alive {
            self.durability.destroyed = true;
        }
        self.durability.settle(&mut self.body.frozen);
    }
}

impl Entity for Enemy {
    fn update(&mut self, _audio: &mut AudioQueue) {
        self.active.check(self.body.pos);
        self.settle();
        if !self.active.inside || self.durability.destroyed {
            return;
        }
        let mut rect = self.body.rect();
        self.patrol.move_rect(&mut rect);
        self.gravity.apply(&mut rect);
        self.body.sync_from(rect);
        self.body.facing_right = self.patrol.forward();
        self.visible.check(self.body.pos);
        self.skin.right = self.body.facing_right;
        let (image, mirrored) = self.skin.image(true);
        self.current = image;
        self.mirrored = mirrored;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.current, self.body.rect(), self.mirrored);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if self.durability.destroyed {
            return;
        }
        self.body.shift(offset);
        self.patrol.shift(offset);
    }
}

impl Vulnerable for Enemy {
    fn tag(&self) -> EntityTag {
        self.body.tag
    }

    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn health_mut(&mut self) -> Option<&mut Health> {
        Some(&mut self.health)
    }

    fn kill(&mut self) {
        self.alive = false;
    }
}
