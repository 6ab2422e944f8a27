//! Scripted input sequences: JSON frame lists that stand in for a
//! keyboard. The demo binary autoplays with one, and end-to-end tests use
//! them to drive deterministic runs.

use hopper_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ScriptFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub fire: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Key state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub fire: bool,
}

impl InputScript {
    pub fn expanded(&self) -> Vec<FrameKeys> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(FrameKeys {
                    left: frame.left,
                    right: frame.right,
                    up: frame.up,
                    fire: frame.fire,
                });
            }
        }
        out
    }
}

/// Presses and releases whatever differs from the current input state.
pub fn drive(input: &mut InputState, keys: FrameKeys) {
    set_key(input, Key::Left, keys.left);
    set_key(input, Key::Right, keys.right);
    set_key(input, Key::Up, keys.up);
    set_key(input, Key::Space, keys.fire);
}

fn set_key(input: &mut InputState, key: Key, held: bool) {
    if held {
        input.key_down(key);
    } else {
        input.key_up(key);
    }
}

pub fn load_script_from_path(path: &Path) -> Result<InputScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let script: InputScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse script JSON {}: {e}", path.display()))?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &InputScript) -> Result<(), String> {
    if script.frames.is_empty() {
        return Err("Script validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hopper_script_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn frame(left: bool, right: bool, up: bool, repeat: u32) -> ScriptFrame {
        ScriptFrame {
            left,
            right,
            up,
            fire: false,
            repeat,
        }
    }

    #[test]
    fn expansion_honors_repeat_counts() {
        let script = InputScript {
            frames: vec![frame(false, true, false, 3), frame(false, true, true, 1)],
        };
        let frames = script.expanded();
        assert_eq!(frames.len(), 4);
        assert!(frames[0].right && !frames[0].up);
        assert!(frames[3].right && frames[3].up);
    }

    #[test]
    fn zero_repeat_still_plays_once() {
        let script = InputScript {
            frames: vec![frame(true, false, false, 0)],
        };
        assert_eq!(script.expanded().len(), 1);
    }

    #[test]
    fn drive_presses_and_releases() {
        let mut input = InputState::new();
        drive(
            &mut input,
            FrameKeys {
                right: true,
                up: true,
                ..FrameKeys::default()
            },
        );
        assert!(input.is_held(Key::Right));
        assert!(input.is_held(Key::Up));
        drive(&mut input, FrameKeys::default());
        assert!(!input.is_held(Key::Right));
        assert!(!input.is_held(Key::Up));
    }

    #[test]
    fn load_script_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write temp file");
        let err = load_script_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_script_parses_defaults() {
        let path = temp_file_path("defaults");
        fs::write(
            &path,
            r#"{ "frames": [ { "right": true, "repeat": 10 }, { "up": true } ] }"#,
        )
        .expect("write temp file");
        let script = load_script_from_path(&path).expect("script should load");
        assert_eq!(script.expanded().len(), 11);
        let _ = fs::remove_file(path);
    }
}
