//! The playable character: keyboard-driven motion, growth and fire forms
//! layered over the alive/dead machine, lives/coins/ammo counters reported
//! to the HUD, and a non-blocking death pause before respawn.

use crate::bullet::{Bullet, Gun};
use crate::collision::MoverView;
use crate::entity::{Body, Collector, EntityTag, Vulnerable};
use crate::groups::Collection;
use crate::services::{AudioQueue, Canvas, Counter, CounterBar, Hud, ImageId, SoundId};
use crate::spawn::fire_gun;
use crate::sprite::Skin;
use glam::Vec2;
use hopper_core::bounds::{Bounds, Metrics};
use hopper_core::input::{InputState, Key};
use hopper_core::motion::{Gravity, Jump, Speed};
use hopper_core::rect::Rect;
use hopper_core::time::Cooldown;

pub struct PlayerConfig {
    pub pos: Vec2,
    pub size: Vec2,
    /// Ground reference line for the jump cap (bottom edge at rest).
    pub ground: f32,
    pub jump_height: f32,
    pub speed_rate: f32,
    pub jump_rate: f32,
    pub mass: f32,
    pub lives: u32,
    pub coin_limit: u32,
    /// Real-time hold between death and respawn.
    pub death_pause: f32,
    pub frame_step: f32,
}

impl PlayerConfig {
    pub fn standard(metrics: &Metrics, pos: Vec2) -> Self {
        let cell = metrics.cell();
        let size = Vec2::splat(cell);
        Self {
            pos,
            size,
            ground: pos.y + size.y,
            jump_height: cell * 2.5,
            speed_rate: cell * 0.6,
            jump_rate: cell * 0.5,
            mass: cell * 0.25,
            lives: 3,
            coin_limit: 10,
            death_pause: 2.0,
            frame_step: 0.15,
        }
    }
}

pub struct PlayerAssets {
    pub base: Vec<ImageId>,
    pub fire: Vec<ImageId>,
    pub death_sound: Option<SoundId>,
}

pub struct Player {
    pub body: Body,
    visible: Bounds,
    base_skin: Skin,
    fire_skin: Skin,
    current: ImageId,
    mirrored: bool,
    pub speed: Speed,
    pub gravity: Gravity,
    pub jump: Jump,
    pub jumpable: bool,
    pub can_move: bool,
    moving: bool,
    on_key_jump: bool,
    pub lives: u32,
    pub coins: u32,
    coin_limit: u32,
    pub alive: bool,
    /// Grown-state token from the super shroom; `None` is the small form.
    pub big: Option<u32>,
    normal_size: Vec2,
    pub fireform: bool,
    pub superform: bool,
    pub gun: Gun,
    spawn_point: Vec2,
    death_sound: Option<SoundId>,
    death_pause: Cooldown,
    mourning: bool,
    live_bar: CounterBar,
    coin_bar: CounterBar,
    ammo_bar: CounterBar,
}

impl Player {
    pub fn new(assets: PlayerAssets, config: PlayerConfig, metrics: &Metrics) -> Self {
        let base_skin = Skin::new(assets.base, config.frame_step, true);
        let current = base_skin.idle().clone();
        Self {
            body: Body::new(config.pos, config.size, EntityTag::Player),
            visible: metrics.draw_bounds(),
            fire_skin: Skin::new(assets.fire, config.frame_step, true),
            base_skin,
            current,
            mirrored: false,
            speed: Speed::new(config.speed_rate, config.size.x * 0.7, true),
            gravity: Gravity::new(config.mass, config.size.y * 0.5, false),
            jump: Jump::new(
                config.jump_rate,
                -config.size.y * 0.3,
                config.ground,
                config.jump_height,
            ),
            jumpable: true,
            can_move: true,
            moving: false,
            on_key_jump: false,
            lives: config.lives,
            coins: 0,
            coin_limit: config.coin_limit,
            alive: config.lives > 0,
            big: None,
            normal_size: config.size,
            fireform: false,
            superform: false,
            gun: fire_gun(*metrics, true),
            spawn_point: config.pos,
            death_sound: assets.death_sound,
            death_pause: Cooldown::new(config.death_pause),
            mourning: false,
            live_bar: CounterBar::new(Counter::Lives),
            coin_bar: CounterBar::new(Counter::Coins),
            ammo_bar: CounterBar::new(Counter::Ammo),
        }
    }

    pub fn update(&mut self, input: &InputState, audio: &mut AudioQueue, hud: &mut dyn Hud) {
        self.respawn(audio);
        if !self.alive {
            return;
        }
        self.visible.check(self.body.pos);
        self.motion(input);
        self.apply_gravity();
        self.sync_facing();
        self.pick_image();
        self.restore_size();
        self.convert_coins();
        self.refresh_bars(hud);
    }

    /// Dead with lives left: wait out the pause, then pay a life, clear
    /// transient forms and return to the spawn point. Dead at zero lives
    /// is terminal.
    pub fn respawn(&mut self, audio: &mut AudioQueue) {
        if self.alive || self.lives == 0 {
            return;
        }
        if !self.mourning {
            self.mourning = true;
            self.death_pause.reset();
            if let Some(sound) = &self.death_sound {
                audio.play(sound);
            }
        }
        if !self.death_pause.ready() {
            return;
        }
        self.mourning = false;
        self.lives -= 1;
        self.big = None;
        self.fireform = false;
        self.gun.ammo = 0;
        self.alive = true;
        self.body.pos = self.spawn_point;
    }

    fn motion(&mut self, input: &InputState) {
        self.moving = false;
        if self.can_move {
            self.motion_x(input);
        }
        if self.jumpable {
            self.motion_up(input);
        }
    }

    fn motion_x(&mut self, input: &InputState) {
        let left = input.is_held(Key::Left);
        let right = input.is_held(Key::Right);
        // Opposite keys cancel.
        if left && right {
            return;
        }
        if left {
            self.moving = true;
            let mut rect = self.body.rect();
            self.speed.move_x(&mut rect, false);
            self.body.sync_from(rect);
        }
        if right {
            self.moving = true;
            let mut rect = self.body.rect();
            self.speed.move_x(&mut rect, true);
            self.body.sync_from(rect);
        }
    }

    fn motion_up(&mut self, input: &InputState) {
        self.on_key_jump = false;
        if input.is_held(Key::Up) {
            self.on_key_jump = true;
            self.rise();
        }
        // Letting go of the key mid-rise ends the jump early.
        if self.jump.in_jumping && !self.on_key_jump {
            self.release_jump();
        }
    }

    fn rise(&mut self) {
        if self.gravity.grounded {
            let mut rect = self.body.rect();
            self.jump.jumping(&mut rect);
            self.body.sync_from(rect);
        }
        if self.jump.jumped {
            self.gravity.grounded = false;
        }
    }

    fn release_jump(&mut self) {
        self.jump.stop();
        self.gravity.grounded = false;
    }

    fn apply_gravity(&mut self) {
        let mut rect = self.body.rect();
        self.gravity.apply(&mut rect);
        self.body.sync_from(rect);
    }

    fn sync_facing(&mut self) {
        self.body.facing_right = self.speed.right;
        self.gun.right = self.body.facing_right;
        self.base_skin.right = self.body.facing_right;
        self.fire_skin.right = self.body.facing_right;
    }

    fn pick_image(&mut self) {
        if !self.visible.inside {
            return;
        }
        let skin = if self.fireform {
            &mut self.fire_skin
        } else {
            &mut self.base_skin
        };
        let (image, mirrored) = skin.image(self.moving);
        self.current = image;
        self.mirrored = mirrored;
    }

    /// Back to the small form whenever the grown token is gone.
    fn restore_size(&mut self) {
        if self.big.is_none() {
            self.resize(self.normal_size);
        }
    }

    fn resize(&mut self, new: Vec2) {
        if new == self.body.size {
            return;
        }
        let width_factor = new.x / self.body.size.x;
        let height_delta = new.y - self.body.size.y;
        self.speed.rescale_limit(width_factor);
        self.jump.height += height_delta;
        // Grow and shrink around the feet, not the head.
        self.body.pos.y -= height_delta;
        self.body.size = new;
    }

    fn convert_coins(&mut self) {
        if self.coins >= self.coin_limit {
            self.lives += 1;
            self.coins -= self.coin_limit;
        }
    }

    fn refresh_bars(&mut self, hud: &mut dyn Hud) {
        self.live_bar.push(&self.lives.to_string(), hud);
        self.coin_bar.push(&self.coins.to_string(), hud);
        if self.fireform {
            self.ammo_bar.push(&self.gun.ammo.to_string(), hud);
        }
    }

    /// Space fires the equipped gun while the fire form holds; spending
    /// the last shot drops the form.
    pub fn shoot(&mut self, input: &InputState, bullets: &mut Collection<Bullet>) {
        if !self.alive || !self.fireform {
            return;
        }
        if input.is_held(Key::Space) {
            self.gun.recharge();
            self.gun.shoot(self.body.rect(), bullets);
            if self.gun.ammo == 0 {
                self.fireform = false;
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.alive && self.visible.inside {
            canvas.blit(&self.current, self.body.rect(), self.mirrored);
        }
    }

    pub fn shift(&mut self, offset: Vec2) {
        self.body.shift(offset);
        self.jump.ground += offset.y;
        self.spawn_point += offset;
    }

    /// Collision-pass view: the player jumps, never repulses, and breaks
    /// bricks while grown.
    pub fn mover(&mut self) -> MoverView<'_> {
        MoverView {
            limiter: self.speed.limit(),
            bonk_power: self.big.is_some(),
            body: &mut self.body,
            gravity: &mut self.gravity,
            jump: Some(&mut self.jump),
            repulse: false,
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    #[cfg(test)]
    pub fn bank_death_pause(&mut self, secs: f32) {
        self.death_pause.bank(secs);
    }
}

impl Collector for Player {
    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn add_coins(&mut self, value: u32) {
        self.coins += value;
    }

    fn add_lives(&mut self, lives: u32) {
        self.lives += lives;
    }

    fn grow(&mut self, marker: u32) -> bool {
        if self.big.is_some() {
            return false;
        }
        let grown = self.body.size * 2.0;
        self.resize(grown);
        self.big = Some(marker);
        true
    }

    fn ignite(&mut self, ammo: u32) {
        if self.fireform {
            self.gun.ammo += ammo;
        } else {
            self.fireform = true;
            self.gun.ammo = ammo;
        }
        self.gun.equipped = true;
    }
}

impl Vulnerable for Player {
    fn tag(&self) -> EntityTag {
        self.body.tag
    }

    fn rect(&self) -> Rect {
        self.body.rect()
    }

    fn invulnerable(&self) -> bool {
        self.superform
    }

    fn shrink(&mut self) -> bool {
        // The size itself snaps back on the next update.
        self.big.take().is_some()
    }

    fn douse(&mut self) -> bool {
        if self.fireform {
            self.fireform = false;
            true
        } else {
            false
        }
    }

    fn kill(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NullHud;

    fn metrics() -> Metrics {
        Metrics::new(720.0)
    }

    fn assets() -> PlayerAssets {
        PlayerAssets {
            base: vec![ImageId::from("avatar/0"), ImageId::from("avatar/1")],
            fire: vec![ImageId::from("avatar/fire/0"), ImageId::from("avatar/fire/1")],
            death_sound: Some(SoundId::from("death")),
        }
    }

    fn player_with_pause(pause: f32) -> Player {
        let m = metrics();
        let mut config = PlayerConfig::standard(&m, Vec2::new(120.0, 300.0));
        config.death_pause = pause;
        Player::new(assets(), config, &m)
    }

    fn player() -> Player {
        player_with_pause(0.0)
    }

    #[test]
    fn respawn_pays_a_life_and_returns_to_spawn() {
        let mut audio = AudioQueue::new();
        let mut avatar = player();
        avatar.body.pos = Vec2::new(900.0, 900.0);
        avatar.fireform = true;
        avatar.big = Some(1);
        avatar.alive = false;

        avatar.respawn(&mut audio);
        assert!(avatar.alive);
        assert_eq!(avatar.lives, 2);
        assert_eq!(avatar.body.pos, avatar.spawn_point());
        assert!(avatar.big.is_none(), "growth does not survive death");
        assert!(!avatar.fireform, "fire form does not survive death");
        assert_eq!(avatar.gun.ammo, 0);
        assert_eq!(audio.len(), 1, "the death sound played");
    }

    #[test]
    fn respawn_waits_out_the_pause() {
        let mut audio = AudioQueue::new();
        let mut avatar = player_with_pause(60.0);
        avatar.alive = false;
        avatar.respawn(&mut audio);
        assert!(!avatar.alive, "the pause gates the respawn");
        assert_eq!(avatar.lives, 3);
        avatar.bank_death_pause(61.0);
        avatar.respawn(&mut audio);
        assert!(avatar.alive);
        assert_eq!(avatar.lives, 2);
        assert_eq!(audio.len(), 1, "death sound plays once per death");
    }

    #[test]
    fn zero_lives_is_terminal() {
        let mut audio = AudioQueue::new();
        let mut avatar = player();
        avatar.lives = 0;
        avatar.alive = false;
        avatar.respawn(&mut audio);
        assert!(!avatar.alive);
        assert!(audio.is_empty());
    }

    #[test]
    fn left_key_moves_left_and_faces_left() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        let mut input = InputState::new();
        input.key_down(Key::Left);
        let x_before = avatar.body.pos.x;
        avatar.update(&input, &mut audio, &mut hud);
        assert!(avatar.body.pos.x < x_before);
        assert!(!avatar.body.facing_right);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        let x_before = avatar.body.pos.x;
        avatar.update(&input, &mut audio, &mut hud);
        assert_eq!(avatar.body.pos.x, x_before);
    }

    #[test]
    fn grounded_jump_rises() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        avatar.gravity.grounded = true;
        let mut input = InputState::new();
        input.key_down(Key::Up);
        let y_before = avatar.body.pos.y;
        avatar.update(&input, &mut audio, &mut hud);
        assert!(avatar.body.pos.y < y_before, "a grounded jump rises");
    }

    #[test]
    fn releasing_the_key_ends_the_rise() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        avatar.gravity.grounded = true;
        let mut input = InputState::new();
        input.key_down(Key::Up);
        avatar.update(&input, &mut audio, &mut hud);
        input.key_up(Key::Up);
        avatar.update(&input, &mut audio, &mut hud);
        assert!(avatar.jump.jumped, "early release consumes the jump");
        assert!(!avatar.gravity.grounded);
    }

    #[test]
    fn growth_doubles_and_shrink_restores() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        let small = avatar.body.size;
        assert!(avatar.grow(1));
        assert_eq!(avatar.body.size, small * 2.0);
        assert!(!avatar.grow(1), "a grown target refuses another shroom");

        assert!(avatar.shrink());
        let input = InputState::new();
        avatar.update(&input, &mut audio, &mut hud);
        assert_eq!(avatar.body.size, small, "size restores after the hit");
        assert!(!avatar.shrink(), "nothing left to shrink");
    }

    #[test]
    fn growth_raises_the_jump_ceiling_and_speed_cap() {
        let mut avatar = player();
        let limit_before = avatar.speed.limit();
        let height_before = avatar.jump.height;
        avatar.grow(1);
        assert_eq!(avatar.speed.limit(), limit_before * 2.0);
        assert_eq!(avatar.jump.height, height_before + avatar.normal_size.y);
    }

    #[test]
    fn coins_convert_to_lives_at_the_limit() {
        let mut audio = AudioQueue::new();
        let mut hud = NullHud;
        let mut avatar = player();
        avatar.add_coins(10);
        let input = InputState::new();
        avatar.update(&input, &mut audio, &mut hud);
        assert_eq!(avatar.lives, 4);
        assert_eq!(avatar.coins, 0);
    }

    #[test]
    fn superform_blocks_the_ladder() {
        let mut avatar = player();
        avatar.superform = true;
        assert!(avatar.invulnerable());
    }

    #[test]
    fn shooting_spends_ammo_and_drops_the_form_when_dry() {
        let mut avatar = player();
        avatar.ignite(1);
        assert!(avatar.fireform);
        let mut input = InputState::new();
        input.key_down(Key::Space);
        let mut bullets: Collection<Bullet> = Collection::new();
        avatar.shoot(&input, &mut bullets);
        bullets.flush();
        assert_eq!(bullets.len(), 1);
        assert_eq!(avatar.gun.ammo, 0);
        assert!(!avatar.fireform, "dry gun drops the fire form");
    }

    #[test]
    fn ignite_tops_up_an_existing_form() {
        let mut avatar = player();
        avatar.ignite(10);
        avatar.ignite(10);
        assert_eq!(avatar.gun.ammo, 20);
        assert!(avatar.fireform);
    }

    #[test]
    fn shift_moves_spawn_point_and_ground_line() {
        let mut avatar = player();
        let spawn_before = avatar.spawn_point();
        let ground_before = avatar.jump.ground;
        avatar.shift(Vec2::new(-30.0, 10.0));
        assert_eq!(avatar.spawn_point(), spawn_before + Vec2::new(-30.0, 10.0));
        assert_eq!(avatar.jump.ground, ground_before + 10.0);
    }
}
