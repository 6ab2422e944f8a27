//! Projectiles and the guns that fire them.
//!
//! A hit applies exactly one rung of the damage ladder, in priority order:
//! an invulnerable target blocks everything (and keeps the bullet alive),
//! then grown targets shrink, fire forms are stripped, health is
//! decremented, and a target with none of those concepts simply dies.

use crate::blocks::Brick;
use crate::entity::{Body, Durability, Entity, EntityTag, Vulnerable};
use crate::groups::Collection;
use crate::services::{AudioQueue, Canvas, ImageId};
use crate::spawn::{BulletSpawner, Spawner};
use glam::Vec2;
use hopper_core::bounds::{Bounds, Metrics};
use hopper_core::motion::Speed;
use hopper_core::rect::Rect;
use hopper_core::time::Cooldown;
use hopper_core::trajectory::Parabola;

pub enum BulletMotion {
    Straight(Speed),
    Arc(Parabola),
}

pub struct Bullet {
    pub body: Body,
    pub durability: Durability,
    pub active: Bounds,
    pub visible: Bounds,
    image: ImageId,
    /// Only targets wearing this tag are ever hit.
    pub enemy_tag: EntityTag,
    pub damage: f32,
    life: Cooldown,
    /// Unarmed bullets neither draw, move nor hit.
    pub armed: bool,
    pub moving: bool,
    motion: BulletMotion,
}

impl Bullet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: ImageId,
        pos: Vec2,
        size: Vec2,
        enemy_tag: EntityTag,
        damage: f32,
        life_time: f32,
        physical: bool,
        motion: BulletMotion,
        metrics: &Metrics,
    ) -> Self {
        Self {
            body: Body::new(pos, size, EntityTag::Other),
            durability: Durability::new(true, physical),
            active: metrics.update_bounds(),
            visible: metrics.draw_bounds(),
            image,
            enemy_tag,
            damage,
            life: Cooldown::new(life_time),
            armed: false,
            moving: true,
            motion,
        }
    }

    /// One-directional hit dispatch; overlap and arming are checked here,
    /// so callers can spray the whole target list.
    pub fn strike(&mut self, target: &mut dyn Vulnerable) {
        if !self.body.rect().overlaps(&target.rect()) {
            return;
        }
        if !self.armed || self.durability.destroyed {
            return;
        }
        if target.tag() != self.enemy_tag {
            return;
        }
        if target.invulnerable() {
            return;
        }
        if !target.shrink() && !target.douse() {
            if let Some(health) = target.health_mut() {
                health.decrease(self.damage);
            } else {
                target.kill();
            }
        }
        self.life.reset();
        self.durability.destroyed = true;
        self.body.frozen = true;
    }

    /// Projectile-vs-block dispatch: breakable solids take the break sound
    /// and the destroy flag; the bullet always dies on impact.
    pub fn smash(&mut self, block: &mut Brick, audio: &mut AudioQueue) {
        if block.durability.destroyed {
            return;
        }
        if !self.body.rect().overlaps(&block.body.rect()) {
            return;
        }
        if self.armed && !self.durability.destroyed {
            block.break_open(audio);
            self.durability.destroyed = true;
            self.body.frozen = true;
        }
    }

    #[cfg(test)]
    pub fn bank_life(&mut self, secs: f32) {
        self.life.bank(secs);
    }
}

impl Entity for Bullet {
    fn update(&mut self, _audio: &mut AudioQueue) {
        if self.armed && !self.durability.destroyed && self.life.ready() {
            self.durability.destroyed = true;
        }
        self.active.check(self.body.pos);
        self.durability.settle(&mut self.body.frozen);
        if self.active.inside && !self.durability.destroyed {
            if self.armed && self.moving {
                let mut rect = self.body.rect();
                match &mut self.motion {
                    BulletMotion::Straight(speed) => {
                        speed.move_x(&mut rect, self.body.facing_right);
                    }
                    BulletMotion::Arc(parabola) => {
                        parabola.right = self.body.facing_right;
                        parabola.move_rect(&mut rect, true);
                    }
                }
                self.body.sync_from(rect);
            }
            self.visible.check(self.body.pos);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.armed && !self.durability.destroyed && self.visible.inside {
            canvas.blit(&self.image, self.body.rect(), !self.body.facing_right);
        }
    }

    fn shift(&mut self, offset: Vec2) {
        if !self.durability.destroyed {
            self.body.shift(offset);
        }
    }
}

/// A spawner-backed gun: ammo, a charge window between shots, and a muzzle
/// offset that follows the owner's facing. Fired bullets go through the
/// deferred queue, never straight into the live list.
pub struct Gun {
    spawner: BulletSpawner,
    pub ammo: u32,
    pub equipped: bool,
    charged: bool,
    charge: Cooldown,
    pub right: bool,
}

impl Gun {
    pub fn new(spawner: BulletSpawner, ammo: u32, charge_time: f32, right: bool) -> Self {
        Self {
            spawner,
            ammo,
            equipped: true,
            charged: true,
            charge: Cooldown::new(charge_time),
            right,
        }
    }

    /// Re-arms once the charge window has passed. Called on every trigger
    /// pull, so holding fire produces a steady cadence.
    pub fn recharge(&mut self) {
        if !self.charged && self.charge.ready() {
            self.charged = true;
            self.charge.reset();
        }
    }

    pub fn shoot(&mut self, owner: Rect, out: &mut Collection<Bullet>) {
        if !self.equipped || self.ammo == 0 || !self.charged {
            return;
        }
        let mut bullet = self.spawner.spawn(self.muzzle(owner));
        bullet.body.facing_right = self.right;
        bullet.armed = true;
        self.ammo -= 1;
        out.enqueue(bullet);
        self.charged = false;
    }

    fn muzzle(&self, owner: Rect) -> Vec2 {
        if self.right {
            owner.pos
        } else {
            Vec2::new(
                owner.left() - owner.size.x * 0.1 - self.spawner.size().x,
                owner.top(),
            )
        }
    }

    #[cfg(test)]
    pub fn bank_charge(&mut self, secs: f32) {
        self.charge.bank(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SoundId;
    use hopper_core::counter::Health;

    fn metrics() -> Metrics {
        Metrics::new(720.0)
    }

    /// Ladder test double covering every capability combination.
    struct Dummy {
        tag: EntityTag,
        rect: Rect,
        invulnerable: bool,
        big: bool,
        fire: bool,
        health: Option<Health>,
        alive: bool,
    }

    impl Dummy {
        fn monster() -> Self {
            Self {
                tag: EntityTag::Monster,
                rect: Rect::new(Vec2::ZERO, Vec2::new(60.0, 60.0)),
                invulnerable: false,
                big: false,
                fire: false,
                health: None,
                alive: true,
            }
        }
    }

    impl Vulnerable for Dummy {
        fn tag(&self) -> EntityTag {
            self.tag
        }
        fn rect(&self) -> Rect {
            self.rect
        }
        fn invulnerable(&self) -> bool {
            self.invulnerable
        }
        fn shrink(&mut self) -> bool {
            if self.big {
                self.big = false;
                true
            } else {
                false
            }
        }
        fn douse(&mut self) -> bool {
            if self.fire {
                self.fire = false;
                true
            } else {
                false
            }
        }
        fn health_mut(&mut self) -> Option<&mut Health> {
            self.health.as_mut()
        }
        fn kill(&mut self) {
            self.alive = false;
        }
    }

    fn slug() -> Bullet {
        Bullet::new(
            ImageId::from("bullet"),
            Vec2::new(10.0, 10.0),
            Vec2::new(15.0, 15.0),
            EntityTag::Monster,
            1.0,
            8.0,
            true,
            BulletMotion::Straight(Speed::new(48.0, 48.0, true)),
            &metrics(),
        )
    }

    #[test]
    fn invulnerable_target_blocks_everything_and_keeps_the_bullet() {
        let mut bullet = slug();
        bullet.armed = true;
        let mut target = Dummy::monster();
        target.invulnerable = true;
        target.big = true;
        bullet.strike(&mut target);
        assert!(target.big, "no rung may fire through invulnerability");
        assert!(target.alive);
        assert!(!bullet.durability.destroyed, "the bullet flies on");
    }

    #[test]
    fn grown_target_only_shrinks() {
        let mut bullet = slug();
        bullet.armed = true;
        let mut target = Dummy::monster();
        target.big = true;
        target.fire = true;
        target.health = Some(Health::new(3.0, 3.0));
        bullet.strike(&mut target);
        assert!(!target.big);
        assert!(target.fire, "lower rungs must not fire");
        assert_eq!(target.health.as_ref().map(|h| h.current()), Some(3.0));
        assert!(target.alive);
        assert!(bullet.durability.destroyed);
        assert!(bullet.body.frozen);
    }

    #[test]
    fn fire_form_strips_before_health() {
        let mut bullet = slug();
        bullet.armed = true;
        let mut target = Dummy::monster();
        target.fire = true;
        target.health = Some(Health::new(3.0, 3.0));
        bullet.strike(&mut target);
        assert!(!target.fire);
        assert_eq!(target.health.as_ref().map(|h| h.current()), Some(3.0));
    }

    #[test]
    fn health_rung_decrements_by_damage() {
        let mut bullet = slug();
        bullet.armed = true;
        bullet.damage = 2.0;
        let mut target = Dummy::monster();
        target.health = Some(Health::new(3.0, 3.0));
        bullet.strike(&mut target);
        assert_eq!(target.health.as_ref().map(|h| h.current()), Some(1.0));
        assert!(target.alive, "health absorbs the hit");
    }

    #[test]
    fn bare_target_dies_outright() {
        let mut bullet = slug();
        bullet.armed = true;
        let mut target = Dummy::monster();
        bullet.strike(&mut target);
        assert!(!target.alive);
    }

    #[test]
    fn wrong_tag_is_never_hit() {
        let mut bullet = slug();
        bullet.armed = true;
        let mut target = Dummy::monster();
        target.tag = EntityTag::Player;
        bullet.strike(&mut target);
        assert!(target.alive);
        assert!(!bullet.durability.destroyed);
    }

    #[test]
    fn unarmed_bullet_is_inert() {
        let mut bullet = slug();
        let mut target = Dummy::monster();
        bullet.strike(&mut target);
        assert!(target.alive);
    }

    #[test]
    fn bullet_expires_after_its_life_window() {
        let mut audio = AudioQueue::new();
        let mut bullet = slug();
        bullet.armed = true;
        bullet.update(&mut audio);
        assert!(!bullet.durability.destroyed);
        bullet.bank_life(10.0);
        bullet.update(&mut audio);
        assert!(bullet.durability.destroyed);
    }

    #[test]
    fn smash_breaks_the_block_and_spends_the_bullet() {
        let mut audio = AudioQueue::new();
        let mut bullet = slug();
        bullet.armed = true;
        let mut block = Brick::new(
            ImageId::from("blocks/brick"),
            SoundId::from("brick"),
            SoundId::from("breakblock"),
            Vec2::new(0.0, 0.0),
            Vec2::new(60.0, 60.0),
            true,
            true,
            &metrics(),
        );
        bullet.smash(&mut block, &mut audio);
        assert!(block.durability.destroyed);
        assert!(bullet.durability.destroyed);
        assert_eq!(audio.len(), 1, "break sound plays");
    }

    #[test]
    fn gun_fires_through_the_deferred_queue() {
        let spawner = BulletSpawner::straight(
            ImageId::from("bullet"),
            Vec2::new(15.0, 15.0),
            48.0,
            EntityTag::Monster,
            1.0,
            8.0,
            true,
            metrics(),
        );
        let mut gun = Gun::new(spawner, 2, 100.0, true);
        let mut bullets: Collection<Bullet> = Collection::new();
        let owner = Rect::new(Vec2::new(50.0, 50.0), Vec2::new(60.0, 60.0));

        gun.shoot(owner, &mut bullets);
        assert_eq!(bullets.len(), 0, "the shot waits in the deferred queue");
        bullets.flush();
        assert_eq!(bullets.len(), 1);
        assert_eq!(gun.ammo, 1);

        // Not recharged yet: the trigger does nothing.
        gun.shoot(owner, &mut bullets);
        bullets.flush();
        assert_eq!(bullets.len(), 1);

        gun.bank_charge(200.0);
        gun.recharge();
        gun.shoot(owner, &mut bullets);
        bullets.flush();
        assert_eq!(bullets.len(), 2);
        assert_eq!(gun.ammo, 0);

        // Dry gun.
        gun.bank_charge(200.0);
        gun.recharge();
        gun.shoot(owner, &mut bullets);
        bullets.flush();
        assert_eq!(bullets.len(), 2);
    }

    #[test]
    fn left_facing_muzzle_sits_left_of_the_owner() {
        let spawner = BulletSpawner::straight(
            ImageId::from("bullet"),
            Vec2::new(15.0, 15.0),
            48.0,
            EntityTag::Monster,
            1.0,
            8.0,
            true,
            metrics(),
        );
        let mut gun = Gun::new(spawner, 1, 0.0, false);
        let mut bullets: Collection<Bullet> = Collection::new();
        let owner = Rect::new(Vec2::new(100.0, 50.0), Vec2::new(60.0, 60.0));
        gun.shoot(owner, &mut bullets);
        bullets.flush();
        let bullet = bullets.get(0).expect("one bullet fired");
        assert!(bullet.body.pos.x < 100.0);
        assert!(!bullet.body.facing_right);
    }
}
