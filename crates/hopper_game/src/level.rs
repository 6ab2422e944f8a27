//! Level files: the JSON description of a playable stage. Coordinates are
//! in grid cells (the window is rows x cols cells), so levels survive any
//! window size. Validation is strict on identifiers and dimensions so the
//! world builder can assume a well-formed file.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub player: PlayerSpec,
    #[serde(default)]
    pub ground: Vec<BlockSpec>,
    #[serde(default)]
    pub bricks: Vec<BlockSpec>,
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub pickups: Vec<PickupSpec>,
    #[serde(default)]
    pub crates: Vec<BlockSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub surprises: Vec<BlockSpec>,
    #[serde(default)]
    pub weather: WeatherSpec,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlayerSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_lives")]
    pub lives: u32,
    #[serde(default = "default_coin_limit")]
    pub coin_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlockSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Width in cells; lets one entry describe a run of ground.
    #[serde(default = "default_span")]
    pub cols: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub motion: MotionSpec,
}

/// Platform trajectories, lengths and radii in cells.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MotionSpec {
    Fixed,
    Boat {
        length: f32,
    },
    Lift {
        length: f32,
    },
    Orbit {
        radius: f32,
        #[serde(default = "default_clockwise")]
        clockwise: bool,
    },
    Glide {
        angle_deg: f32,
        #[serde(default = "default_clockwise")]
        right: bool,
        #[serde(default = "default_clockwise")]
        down: bool,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct PickupSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub kind: PickupKindSpec,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PickupKindSpec {
    Coin,
    FireFlower,
    LifeShroom,
    SuperShroom,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnemySpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Patrol range in cells.
    pub range: f32,
    #[serde(default = "default_hp")]
    pub hp: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct WeatherSpec {
    #[serde(default)]
    pub rain: bool,
    #[serde(default)]
    pub clouds: bool,
    #[serde(default)]
    pub lightning: bool,
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.window_height <= 0.0 {
        return Err("Level validation failed: window_height must be > 0".to_string());
    }
    if level.player.lives == 0 {
        log::warn!(
            "Level '{}' starts the player with zero lives. This is allowed but unplayable.",
            level.level_id
        );
    }

    let mut ids = HashSet::new();
    let mut check_id = |id: &str| -> Result<(), String> {
        if !ids.insert(id.to_string()) {
            return Err(format!("Level validation failed: duplicate id '{id}'"));
        }
        Ok(())
    };

    for spec in level.ground.iter().chain(&level.bricks).chain(&level.crates).chain(&level.surprises) {
        check_id(&spec.id)?;
        if spec.cols == 0 {
            return Err(format!(
                "Level validation failed: block '{}' has zero cols",
                spec.id
            ));
        }
    }
    for spec in &level.platforms {
        check_id(&spec.id)?;
        validate_motion(&spec.id, &spec.motion)?;
    }
    for spec in &level.pickups {
        check_id(&spec.id)?;
    }
    for spec in &level.enemies {
        check_id(&spec.id)?;
        if spec.range <= 0.0 {
            return Err(format!(
                "Level validation failed: enemy '{}' has non-positive patrol range",
                spec.id
            ));
        }
        if spec.hp <= 0.0 {
            return Err(format!(
                "Level validation failed: enemy '{}' has non-positive hp",
                spec.id
            ));
        }
    }

    if level.ground.is_empty() {
        log::warn!(
            "Level '{}' has no ground. This is allowed but often accidental.",
            level.level_id
        );
    }
    Ok(())
}

fn validate_motion(id: &str, motion: &MotionSpec) -> Result<(), String> {
    match motion {
        MotionSpec::Boat { length } | MotionSpec::Lift { length } if *length <= 0.0 => Err(
            format!("Level validation failed: platform '{id}' has non-positive length"),
        ),
        MotionSpec::Orbit { radius, .. } if *radius <= 0.0 => Err(format!(
            "Level validation failed: platform '{id}' has non-positive radius"
        )),
        _ => Ok(()),
    }
}

const fn default_window_height() -> f32 {
    720.0
}

const fn default_seed() -> u64 {
    0
}

const fn default_lives() -> u32 {
    3
}

const fn default_coin_limit() -> u32 {
    10
}

const fn default_span() -> u32 {
    1
}

const fn default_clockwise() -> bool {
    true
}

const fn default_hp() -> f32 {
    1.0
}
