//! World assembly and the per-frame pipeline.
//!
//! A frame is one full synchronous pass in a fixed order: player control
//! and motion, the composite update/draw/shift pass over every group,
//! solid-collision resolution for each mover, interaction dispatch, bullet
//! dispatch, then queue flushes. There are no suspension points inside a
//! frame.

use crate::blocks::{Brick, CrateBox, Pickup, SurpriseBlock};
use crate::bullet::Bullet;
use crate::camera::Camera;
use crate::collision::{self, MoverView};
use crate::enemy::Enemy;
use crate::entity::Entity;
use crate::groups::{self, Collection};
use crate::level::{LevelFile, MotionSpec, PickupKindSpec};
use crate::platforms::Platform;
use crate::player::{Player, PlayerAssets, PlayerConfig};
use crate::services::{AudioQueue, Canvas, Hud, ImageId, SoundId, Turntable};
use crate::spawn::{
    coin_spawner, fire_flower_spawner, life_shroom_spawner, super_shroom_spawner, BrickSpawner,
    CrateSpawner, PlatformKind, PlatformSpawner, Spawner, SurpriseSpawner,
};
use crate::weather::{Clouds, Lightning, Rain};
use glam::Vec2;
use hopper_core::bounds::{Metrics, Span};
use hopper_core::input::InputState;
use hopper_core::trajectory::Patrol;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const RAIN_DROPS: usize = 100;
const CLOUD_PUFFS: usize = 6;
const LIGHTNING_PERIOD: f32 = 7.0;

pub struct World {
    pub metrics: Metrics,
    pub player: Player,
    /// Ground and bricks: one container, resolved in append order.
    pub blocks: Collection<Brick>,
    pub platforms: Collection<Platform>,
    pub surprises: Collection<SurpriseBlock>,
    pub pickups: Collection<Pickup>,
    pub crates: Collection<CrateBox>,
    pub enemies: Collection<Enemy>,
    pub bullets: Collection<Bullet>,
    pub rain: Option<Rain>,
    pub clouds: Option<Clouds>,
    pub lightning: Option<Lightning>,
    pub music: Turntable,
    pub camera: Camera,
    pub frame_count: u64,
}

impl World {
    pub fn from_level(level: &LevelFile) -> Self {
        let metrics = Metrics::new(level.window_height);
        let cell = metrics.cell();
        let mut rng = Pcg32::seed_from_u64(level.seed);
        let to_px = |x: f32, y: f32| Vec2::new(x * cell, y * cell);

        let mut blocks = Collection::new();
        let ground = BrickSpawner::ground(metrics);
        for spec in &level.ground {
            for col in 0..spec.cols {
                blocks.push(ground.spawn(to_px(spec.x + col as f32, spec.y)));
            }
        }
        let bricks = BrickSpawner::bricks(metrics);
        for spec in &level.bricks {
            for col in 0..spec.cols {
                blocks.push(bricks.spawn(to_px(spec.x + col as f32, spec.y)));
            }
        }

        let mut platforms = Collection::new();
        for spec in &level.platforms {
            let kind = match spec.motion {
                MotionSpec::Fixed => PlatformKind::Fixed,
                MotionSpec::Boat { length } => PlatformKind::Boat {
                    length: length * cell,
                },
                MotionSpec::Lift { length } => PlatformKind::Lift {
                    length: length * cell,
                },
                MotionSpec::Orbit { radius, clockwise } => PlatformKind::Orbit {
                    radius: radius * cell,
                    clockwise,
                },
                MotionSpec::Glide {
                    angle_deg,
                    right,
                    down,
                } => PlatformKind::Glide {
                    angle_deg,
                    right,
                    down,
                },
            };
            platforms.push(PlatformSpawner::new(kind, metrics).spawn(to_px(spec.x, spec.y)));
        }

        let mut surprises = Collection::new();
        let surprise = SurpriseSpawner::new(metrics);
        for spec in &level.surprises {
            for col in 0..spec.cols {
                surprises.push(surprise.spawn(to_px(spec.x + col as f32, spec.y), &mut rng));
            }
        }

        let mut pickups = Collection::new();
        for spec in &level.pickups {
            let spawner = match spec.kind {
                PickupKindSpec::Coin => coin_spawner(metrics),
                PickupKindSpec::FireFlower => fire_flower_spawner(metrics),
                PickupKindSpec::LifeShroom => life_shroom_spawner(metrics),
                PickupKindSpec::SuperShroom => super_shroom_spawner(metrics),
            };
            pickups.push(spawner.spawn(to_px(spec.x, spec.y)));
        }

        let mut crates = Collection::new();
        let crate_spawner = CrateSpawner::new(metrics);
        for spec in &level.crates {
            for col in 0..spec.cols {
                crates.push(crate_spawner.spawn(to_px(spec.x + col as f32, spec.y)));
            }
        }

        let mut enemies = Collection::new();
        for spec in &level.enemies {
            let pos = to_px(spec.x, spec.y);
            enemies.push(Enemy::new(
                vec![ImageId::from("monster/0"), ImageId::from("monster/1")],
                pos,
                Vec2::splat(cell),
                Patrol::new(cell * 0.1, cell * 0.3, spec.range * cell, pos.x, false),
                cell * 0.2,
                spec.hp,
                0.15,
                &metrics,
            ));
        }

        let player_pos = to_px(level.player.x, level.player.y);
        let mut config = PlayerConfig::standard(&metrics, player_pos);
        config.lives = level.player.lives;
        config.coin_limit = level.player.coin_limit;
        let player = Player::new(
            PlayerAssets {
                base: vec![ImageId::from("avatar/0"), ImageId::from("avatar/1")],
                fire: vec![ImageId::from("avatar/fire/0"), ImageId::from("avatar/fire/1")],
                death_sound: Some(SoundId::from("death")),
            },
            config,
            &metrics,
        );

        // Anchor the camera so the opening frame needs no shift.
        let lead_right = cell * 5.0;
        let lead_left = cell * 14.0;
        let lead_y = cell * 4.0;
        let camera = Camera::new(
            Vec2::new(
                player_pos.x - lead_right,
                player_pos.y + cell - lead_y,
            ),
            lead_right,
            lead_left,
            lead_y,
        );

        let rain = level.weather.rain.then(|| {
            Rain::new(
                ImageId::from("weather/drip"),
                RAIN_DROPS,
                &metrics,
                Pcg32::seed_from_u64(level.seed.wrapping_add(1)),
            )
        });
        let clouds = level.weather.clouds.then(|| {
            Clouds::new(
                ImageId::from("weather/cloud"),
                CLOUD_PUFFS,
                cell * 0.05,
                cell * 0.2,
                Span::new(cell * 0.5, cell * 2.5),
                &metrics,
                true,
                &mut rng,
            )
        });
        let lightning = level.weather.lightning.then(|| {
            Lightning::new(
                ImageId::from("weather/bolt"),
                SoundId::from("thunder"),
                LIGHTNING_PERIOD,
                cell * 0.7,
                &metrics,
                Pcg32::seed_from_u64(level.seed.wrapping_add(2)),
            )
        });

        log::info!(
            "level '{}' built: {} blocks, {} platforms, {} surprises, {} pickups, {} enemies",
            level.level_id,
            blocks.len(),
            platforms.len(),
            surprises.len(),
            pickups.len(),
            enemies.len()
        );

        Self {
            metrics,
            player,
            blocks,
            platforms,
            surprises,
            pickups,
            crates,
            enemies,
            bullets: Collection::new(),
            rain,
            clouds,
            lightning,
            music: Turntable::new(SoundId::from("overworld_theme")),
            camera,
            frame_count: 0,
        }
    }

    /// One full frame in the documented order.
    pub fn frame(
        &mut self,
        input: &InputState,
        canvas: &mut dyn Canvas,
        audio: &mut AudioQueue,
        hud: &mut dyn Hud,
    ) {
        let offset = self.camera.offset(
            self.player.body.pos,
            self.player.body.size,
            self.player.body.facing_right,
        );

        self.music.update(audio);

        // Far background first.
        if let Some(clouds) = &mut self.clouds {
            clouds.update(audio);
            clouds.draw(canvas);
        }
        if let Some(rain) = &mut self.rain {
            rain.update(audio);
            rain.draw(canvas);
        }
        if let Some(storm) = &mut self.lightning {
            storm.update(audio);
            storm.draw(canvas);
        }

        // Player pass.
        self.player.update(input, audio, hud);
        self.player.shoot(input, &mut self.bullets);
        self.player.draw(canvas);
        self.player.shift(offset);

        // Solid groups.
        self.blocks.pass(canvas, audio, offset, |_, _| {});
        self.platforms.pass(canvas, audio, offset, |_, _| {});
        self.surprises.pass(canvas, audio, offset, |_, _| {});

        // Player against every solid container.
        if self.player.alive {
            let mut mover = self.player.mover();
            collision::resolve_blocks(&mut mover, &mut self.blocks, audio);
            collision::resolve_platforms(&mut mover, &mut self.platforms, audio);
            collision::resolve_surprises(&mut mover, &mut self.surprises, &mut self.pickups, audio);
        }

        // Pickups: interact with the player, walkers collide with solids.
        {
            let player = &mut self.player;
            let blocks = &mut self.blocks;
            self.pickups.pass(canvas, audio, offset, |pickup, audio| {
                pickup.collect(player, audio);
                if pickup.durability.physical && !pickup.durability.destroyed {
                    if let Some(walker) = pickup.walker.as_mut() {
                        let mut view = MoverView::new(&mut pickup.body, &mut walker.gravity);
                        view.limiter = walker.speed.limit();
                        view.repulse = true;
                        collision::resolve_blocks(&mut view, blocks, audio);
                    }
                }
            });
        }

        // Crates: plain physical movers.
        {
            let blocks = &mut self.blocks;
            self.crates.pass(canvas, audio, offset, |crate_box, audio| {
                if !crate_box.durability.destroyed {
                    let mut view =
                        MoverView::new(&mut crate_box.body, &mut crate_box.walker.gravity);
                    view.limiter = crate_box.walker.speed.limit();
                    view.repulse = true;
                    collision::resolve_blocks(&mut view, blocks, audio);
                }
            });
        }

        // Enemies walk their patrols; the patrol turns them, not the wall.
        {
            let blocks = &mut self.blocks;
            self.enemies.pass(canvas, audio, offset, |enemy, audio| {
                if enemy.durability.physical && !enemy.durability.destroyed {
                    let limiter = enemy.patrol.limit();
                    let mut view = MoverView::new(&mut enemy.body, &mut enemy.gravity);
                    view.limiter = limiter;
                    collision::resolve_blocks(&mut view, blocks, audio);
                }
            });
        }

        // Bullets fly, then dispatch against targets and blocks.
        self.bullets.pass(canvas, audio, offset, |_, _| {});
        groups::strike_targets(&mut self.bullets, &mut self.enemies);
        groups::smash_blocks(&mut self.bullets, &mut self.blocks, audio);

        self.frame_count += 1;
    }

    pub fn status(&self) -> String {
        format!(
            "frame {} lives {} coins {} pos ({:.1}, {:.1}) bullets {}",
            self.frame_count,
            self.player.lives,
            self.player.coins,
            self.player.body.pos.x,
            self.player.body.pos.y,
            self.bullets.len()
        )
    }
}
