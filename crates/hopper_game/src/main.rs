//! hopper -- a 2D platformer engine, demo shell.
//!
//! The engine core is frame-stepped and synchronous: every frame runs
//! player control, the composite update/draw/shift pass over each entity
//! group, axis-separated solid-collision resolution, interaction dispatch
//! and bullet dispatch, in that order (see `world.rs`).
//!
//! This binary is the headless shell around it: it loads a level, drives
//! the world with a scripted input sequence (or idle input), renders into
//! a counting null canvas and drains the audio queue into the log. The
//! real renderer, mixer and keyboard live behind the `Canvas`, audio-queue
//! and `InputState` seams and can be swapped in without touching the core.

mod blocks;
mod bullet;
mod camera;
mod collision;
mod enemy;
mod entity;
mod groups;
mod level;
mod platforms;
mod player;
mod script;
mod services;
mod spawn;
mod sprite;
mod weather;
mod world;

use hopper_core::input::InputState;
use level::load_level_from_path;
use script::{load_script_from_path, FrameKeys};
use services::{AudioEvent, AudioQueue, NullCanvas, NullHud};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use world::World;

const DEFAULT_LEVEL: &str = "assets/levels/meadow.json";
const DEFAULT_SCRIPT: &str = "assets/scripts/autoplay.json";
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let level_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL));
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(600);

    let level = match load_level_from_path(&level_path) {
        Ok(level) => level,
        Err(message) => {
            log::error!("{message}");
            std::process::exit(1);
        }
    };

    let keys = match load_script_from_path(&PathBuf::from(DEFAULT_SCRIPT)) {
        Ok(script) => script.expanded(),
        Err(message) => {
            log::warn!("no input script ({message}); running idle");
            Vec::new()
        }
    };

    let mut world = World::from_level(&level);
    let mut input = InputState::new();
    let mut canvas = NullCanvas::default();
    let mut audio = AudioQueue::new();
    let mut hud = NullHud;

    log::info!(
        "running '{}' for {} frames ({} scripted)",
        level.level_id,
        frames,
        keys.len()
    );

    let mut last_status = Instant::now();
    for index in 0..frames {
        let frame_keys = keys
            .get(index as usize)
            .copied()
            .unwrap_or(FrameKeys::default());
        script::drive(&mut input, frame_keys);

        let started = Instant::now();
        world.frame(&input, &mut canvas, &mut audio, &mut hud);
        input.end_frame();

        for event in audio.drain() {
            match &event {
                AudioEvent::Play(sound) => log::debug!("audio: play {}", sound.as_str()),
                AudioEvent::PlayLooping(sound) => log::debug!("audio: loop {}", sound.as_str()),
                AudioEvent::Stop(sound) => log::debug!("audio: stop {}", sound.as_str()),
            }
        }

        if last_status.elapsed() >= Duration::from_secs(1) {
            log::info!("{} blits {}", world.status(), canvas.blits);
            last_status = Instant::now();
        }

        // Pace the loop at roughly 60 Hz; the motion samplers read the
        // wall clock, so running unpaced would fast-forward the world.
        let spent = started.elapsed();
        if spent < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - spent);
        }
    }

    log::info!("done: {}", world.status());
}
