//! Spawner factories: creation-time indirection between gameplay dispatch
//! and concrete construction parameters (asset ids, metric sizes, sounds).
//! Interaction code asks a spawner for an entity at a position and never
//! learns how it was put together.

use crate::blocks::{Brick, CrateBox, Pickup, PickupKind, SurpriseBlock, Walker};
use crate::bullet::{Bullet, BulletMotion, Gun};
use crate::entity::EntityTag;
use crate::platforms::{Platform, PlatformMotion};
use crate::services::{ImageId, SoundId};
use glam::Vec2;
use hopper_core::bounds::Metrics;
use hopper_core::motion::Speed;
use hopper_core::trajectory::{Circle, Parabola, Patrol};
use rand::Rng;
use std::f32::consts::PI;

pub trait Spawner {
    type Output;
    fn spawn(&self, pos: Vec2) -> Self::Output;
}

// Conventional asset ids; the renderer and mixer resolve them to real
// files. Kept in one place so a reskin touches nothing but this table.
const BRICK_IMAGE: &str = "blocks/bricks";
const GROUND_IMAGE: &str = "blocks/ground";
const PLATFORM_IMAGE: &str = "blocks/platform";
const CRATE_IMAGE: &str = "blocks/crate";
const SURPRISE_IMAGE: &str = "blocks/surprise/0";
const SURPRISE_SPENT_IMAGE: &str = "blocks/surprise/1";
const LIFE_SHROOM_IMAGE: &str = "items/lifeshroom";
const SUPER_SHROOM_IMAGE: &str = "items/supershroom";
const FIREBALL_IMAGE: &str = "items/fireball";
const THUMP_SOUND: &str = "brick";
const SMASH_SOUND: &str = "breakblock";
const COIN_SOUND: &str = "coin";
const BONUS_SOUND: &str = "bonus";
const LIFE_SOUND: &str = "extra_health";

const FRAME_STEP: f32 = 0.15;

/// Walking-item tuning, in cells: the shroom shuffle.
const WALK_RATE: f32 = 0.05;
const WALK_LIMIT: f32 = 0.15;
const WALK_MASS: f32 = 0.2;

#[derive(Clone)]
pub struct BulletSpawner {
    image: ImageId,
    size: Vec2,
    speed: f32,
    enemy_tag: EntityTag,
    damage: f32,
    life_time: f32,
    physical: bool,
    arc: Option<ArcShot>,
    metrics: Metrics,
}

#[derive(Clone, Copy)]
pub struct ArcShot {
    pub angle_deg: f32,
    pub down: bool,
}

impl BulletSpawner {
    #[allow(clippy::too_many_arguments)]
    pub fn straight(
        image: ImageId,
        size: Vec2,
        speed: f32,
        enemy_tag: EntityTag,
        damage: f32,
        life_time: f32,
        physical: bool,
        metrics: Metrics,
    ) -> Self {
        Self {
            image,
            size,
            speed,
            enemy_tag,
            damage,
            life_time,
            physical,
            arc: None,
            metrics,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        image: ImageId,
        size: Vec2,
        speed: f32,
        angle_deg: f32,
        down: bool,
        enemy_tag: EntityTag,
        damage: f32,
        life_time: f32,
        physical: bool,
        metrics: Metrics,
    ) -> Self {
        Self {
            arc: Some(ArcShot { angle_deg, down }),
            ..Self::straight(image, size, speed, enemy_tag, damage, life_time, physical, metrics)
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

impl Spawner for BulletSpawner {
    type Output = Bullet;

    fn spawn(&self, pos: Vec2) -> Bullet {
        let motion = match self.arc {
            None => BulletMotion::Straight(Speed::new(self.speed, self.speed, true)),
            Some(shot) => BulletMotion::Arc(Parabola::new(
                self.speed,
                self.speed,
                shot.angle_deg,
                true,
                shot.down,
            )),
        };
        Bullet::new(
            self.image.clone(),
            pos,
            self.size,
            self.enemy_tag,
            self.damage,
            self.life_time,
            self.physical,
            motion,
            &self.metrics,
        )
    }
}

#[derive(Clone, Copy)]
struct WalkerSeed {
    rate: f32,
    limit: f32,
    mass: f32,
    fall_limit: f32,
}

#[derive(Clone)]
pub struct PickupSpawner {
    images: Vec<ImageId>,
    sound: SoundId,
    size: Vec2,
    frame_step: f32,
    kind: PickupKind,
    walker: Option<WalkerSeed>,
    metrics: Metrics,
}

impl PickupSpawner {
    /// An item that sits in place and animates (coins, fire flowers).
    pub fn still(
        images: Vec<ImageId>,
        sound: SoundId,
        size: Vec2,
        frame_step: f32,
        kind: PickupKind,
        metrics: Metrics,
    ) -> Self {
        Self {
            images,
            sound,
            size,
            frame_step,
            kind,
            walker: None,
            metrics,
        }
    }

    /// A wandering item under gravity (the shrooms).
    #[allow(clippy::too_many_arguments)]
    pub fn walking(
        images: Vec<ImageId>,
        sound: SoundId,
        size: Vec2,
        frame_step: f32,
        kind: PickupKind,
        rate: f32,
        limit: f32,
        mass: f32,
        metrics: Metrics,
    ) -> Self {
        Self {
            walker: Some(WalkerSeed {
                rate,
                limit,
                mass,
                fall_limit: size.y * 0.5,
            }),
            ..Self::still(images, sound, size, frame_step, kind, metrics)
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[allow(dead_code)]
    pub fn kind(&self) -> PickupKind {
        self.kind
    }
}

impl Spawner for PickupSpawner {
    type Output = Pickup;

    fn spawn(&self, pos: Vec2) -> Pickup {
        let walker = self
            .walker
            .map(|seed| Walker::new(seed.rate, seed.limit, seed.mass, seed.fall_limit));
        Pickup::new(
            self.images.clone(),
            self.sound.clone(),
            pos,
            self.size,
            self.frame_step,
            self.kind,
            walker,
            &self.metrics,
        )
    }
}

pub fn coin_spawner(metrics: Metrics) -> PickupSpawner {
    let cell = metrics.cell();
    let images = (0..3)
        .map(|i| ImageId::from(format!("items/coin/{i}").as_str()))
        .collect();
    PickupSpawner::still(
        images,
        SoundId::from(COIN_SOUND),
        Vec2::splat(cell),
        FRAME_STEP,
        PickupKind::Coin { value: 1 },
        metrics,
    )
}

pub fn fire_flower_spawner(metrics: Metrics) -> PickupSpawner {
    let cell = metrics.cell();
    let images = (0..4)
        .map(|i| ImageId::from(format!("items/fireflower/{i}").as_str()))
        .collect();
    PickupSpawner::still(
        images,
        SoundId::from(BONUS_SOUND),
        Vec2::splat(cell),
        FRAME_STEP,
        PickupKind::FireFlower { ammo: 10 },
        metrics,
    )
}

pub fn life_shroom_spawner(metrics: Metrics) -> PickupSpawner {
    let cell = metrics.cell();
    PickupSpawner::walking(
        vec![ImageId::from(LIFE_SHROOM_IMAGE)],
        SoundId::from(LIFE_SOUND),
        Vec2::splat(cell),
        FRAME_STEP,
        PickupKind::LifeShroom { lives: 1 },
        cell * WALK_RATE,
        cell * WALK_LIMIT,
        cell * WALK_MASS,
        metrics,
    )
}

pub fn super_shroom_spawner(metrics: Metrics) -> PickupSpawner {
    let cell = metrics.cell();
    PickupSpawner::walking(
        vec![ImageId::from(SUPER_SHROOM_IMAGE)],
        SoundId::from(BONUS_SOUND),
        Vec2::splat(cell),
        FRAME_STEP,
        PickupKind::SuperShroom { marker: 1 },
        cell * WALK_RATE,
        cell * WALK_LIMIT,
        cell * WALK_MASS,
        metrics,
    )
}

#[derive(Clone)]
pub struct BrickSpawner {
    image: ImageId,
    size: Vec2,
    destructible: bool,
    physical: bool,
    metrics: Metrics,
}

impl BrickSpawner {
    /// Breakable one-cell bricks.
    pub fn bricks(metrics: Metrics) -> Self {
        Self {
            image: ImageId::from(BRICK_IMAGE),
            size: Vec2::splat(metrics.cell()),
            destructible: true,
            physical: true,
            metrics,
        }
    }

    /// Indestructible terrain.
    pub fn ground(metrics: Metrics) -> Self {
        Self {
            image: ImageId::from(GROUND_IMAGE),
            size: Vec2::splat(metrics.cell()),
            destructible: false,
            physical: true,
            metrics,
        }
    }

    pub fn sized(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

impl Spawner for BrickSpawner {
    type Output = Brick;

    fn spawn(&self, pos: Vec2) -> Brick {
        Brick::new(
            self.image.clone(),
            SoundId::from(THUMP_SOUND),
            SoundId::from(SMASH_SOUND),
            pos,
            self.size,
            self.destructible,
            self.physical,
            &self.metrics,
        )
    }
}

#[derive(Clone, Copy)]
pub enum PlatformKind {
    Fixed,
    Boat { length: f32 },
    Lift { length: f32 },
    Orbit { radius: f32, clockwise: bool },
    Glide { angle_deg: f32, right: bool, down: bool },
}

#[derive(Clone)]
pub struct PlatformSpawner {
    image: ImageId,
    size: Vec2,
    kind: PlatformKind,
    metrics: Metrics,
}

impl PlatformSpawner {
    /// Platforms are three cells wide and ride-on by convention.
    pub fn new(kind: PlatformKind, metrics: Metrics) -> Self {
        let cell = metrics.cell();
        Self {
            image: ImageId::from(PLATFORM_IMAGE),
            size: Vec2::new(cell * 3.0, cell),
            kind,
            metrics,
        }
    }
}

impl Spawner for PlatformSpawner {
    type Output = Platform;

    fn spawn(&self, pos: Vec2) -> Platform {
        let cell = self.metrics.cell();
        let mut facing_right = true;
        let motion = match self.kind {
            PlatformKind::Fixed => PlatformMotion::Fixed,
            PlatformKind::Boat { length } => {
                PlatformMotion::Boat(Patrol::new(cell * 0.05, cell * 0.2, length, pos.x, false))
            }
            PlatformKind::Lift { length } => {
                PlatformMotion::Lift(Patrol::new(cell * 0.05, cell * 0.2, length, pos.y, true))
            }
            PlatformKind::Orbit { radius, clockwise } => PlatformMotion::Orbit(Circle::new(
                PI / 32.0,
                PI / 32.0,
                radius,
                pos,
                0.0,
                clockwise,
            )),
            PlatformKind::Glide {
                angle_deg,
                right,
                down,
            } => {
                facing_right = right;
                PlatformMotion::Glide(Parabola::new(cell * 0.15, cell * 0.6, angle_deg, right, down))
            }
        };
        let mut platform = Platform::new(
            self.image.clone(),
            SoundId::from(THUMP_SOUND),
            SoundId::from(SMASH_SOUND),
            pos,
            self.size,
            motion,
            &self.metrics,
        );
        platform.body.facing_right = facing_right;
        platform
    }
}

#[derive(Clone)]
pub struct CrateSpawner {
    image: ImageId,
    size: Vec2,
    metrics: Metrics,
}

impl CrateSpawner {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            image: ImageId::from(CRATE_IMAGE),
            size: Vec2::splat(metrics.cell()),
            metrics,
        }
    }
}

impl Spawner for CrateSpawner {
    type Output = CrateBox;

    fn spawn(&self, pos: Vec2) -> CrateBox {
        let cell = self.metrics.cell();
        let walker = Walker::new(
            cell * WALK_RATE,
            cell * WALK_LIMIT,
            cell * WALK_MASS,
            self.size.y * 0.5,
        );
        CrateBox::new(self.image.clone(), pos, self.size, walker, &self.metrics)
    }
}

/// Surprise blocks pick their reward at construction from the weighted
/// table: 65% coin, 10% fire flower, 10% super shroom, 15% life shroom.
#[derive(Clone)]
pub struct SurpriseSpawner {
    face: ImageId,
    spent: ImageId,
    thump: SoundId,
    size: Vec2,
    metrics: Metrics,
}

impl SurpriseSpawner {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            face: ImageId::from(SURPRISE_IMAGE),
            spent: ImageId::from(SURPRISE_SPENT_IMAGE),
            thump: SoundId::from(THUMP_SOUND),
            size: Vec2::splat(metrics.cell()),
            metrics,
        }
    }

    pub fn spawn(&self, pos: Vec2, rng: &mut impl Rng) -> SurpriseBlock {
        SurpriseBlock::new(
            self.face.clone(),
            self.spent.clone(),
            self.thump.clone(),
            pos,
            self.size,
            self.pick_reward(rng),
            &self.metrics,
        )
    }

    fn pick_reward(&self, rng: &mut impl Rng) -> PickupSpawner {
        let roll: u32 = rng.random_range(0..=100);
        match roll {
            0..=65 => coin_spawner(self.metrics),
            66..=75 => fire_flower_spawner(self.metrics),
            76..=85 => super_shroom_spawner(self.metrics),
            _ => life_shroom_spawner(self.metrics),
        }
    }
}

/// The fire-flower gun: ten lobbed shots at a steep launch angle, strong
/// against monsters, passing through blocks.
pub fn fire_gun(metrics: Metrics, right: bool) -> Gun {
    let cell = metrics.cell();
    let spawner = BulletSpawner::arc(
        ImageId::from(FIREBALL_IMAGE),
        Vec2::splat(cell * 0.25),
        cell * 0.8,
        100.0,
        true,
        EntityTag::Monster,
        2.0,
        8.0,
        false,
        metrics,
    );
    Gun::new(spawner, 10, 0.5, right)
}
