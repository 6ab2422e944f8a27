//! The engine's external collaborators, reduced to narrow interfaces: the
//! renderer, the audio backend and the HUD text sink. The core never learns
//! what an image or sound actually is; it passes opaque handles through.

use hopper_core::rect::Rect;
use std::fmt;
use std::sync::Arc;

/// Opaque drawable handle. Cheap to clone; resolution to pixels happens on
/// the renderer side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(Arc<str>);

impl ImageId {
    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque sound handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundId(Arc<str>);

impl SoundId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoundId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendering surface. `mirrored` asks the backend for a horizontal flip, so
/// a sprite needs only one handle per pose.
pub trait Canvas {
    fn blit(&mut self, image: &ImageId, rect: Rect, mirrored: bool);
    /// Solid color overlay (the lightning flash).
    fn fill(&mut self, rect: Rect, color: [u8; 3], alpha: u8);
}

/// Headless canvas: counts draw calls and discards them. The demo binary
/// and the end-to-end tests run against this.
#[derive(Debug, Default)]
pub struct NullCanvas {
    pub blits: usize,
    pub fills: usize,
}

impl Canvas for NullCanvas {
    fn blit(&mut self, _image: &ImageId, _rect: Rect, _mirrored: bool) {
        self.blits += 1;
    }

    fn fill(&mut self, _rect: Rect, _color: [u8; 3], _alpha: u8) {
        self.fills += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Play(SoundId),
    PlayLooping(SoundId),
    Stop(SoundId),
}

/// Fire-and-forget audio: entities push events during the frame, the shell
/// drains them into the real backend afterwards. No completion callbacks.
#[derive(Debug, Default)]
pub struct AudioQueue {
    events: Vec<AudioEvent>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sound: &SoundId) {
        self.events.push(AudioEvent::Play(sound.clone()));
    }

    pub fn play_looping(&mut self, sound: &SoundId) {
        self.events.push(AudioEvent::PlayLooping(sound.clone()));
    }

    pub fn stop(&mut self, sound: &SoundId) {
        self.events.push(AudioEvent::Stop(sound.clone()));
    }

    pub fn drain(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.events)
    }

    #[allow(dead_code)]
    pub fn events(&self) -> &[AudioEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Plays its sound exactly once, no matter how often it is poked.
#[derive(Debug, Clone)]
pub struct OneShot {
    sound: SoundId,
    played: bool,
}

impl OneShot {
    pub fn new(sound: SoundId) -> Self {
        Self {
            sound,
            played: false,
        }
    }

    pub fn play(&mut self, audio: &mut AudioQueue) {
        if !self.played {
            audio.play(&self.sound);
            self.played = true;
        }
    }

    #[allow(dead_code)]
    pub fn played(&self) -> bool {
        self.played
    }
}

/// Background-music switch: starts the loop once, stops it on mute, resumes
/// from the top.
#[derive(Debug)]
pub struct Turntable {
    track: SoundId,
    start: bool,
    muted: bool,
}

impl Turntable {
    pub fn new(track: SoundId) -> Self {
        Self {
            track,
            start: true,
            muted: false,
        }
    }

    pub fn update(&mut self, audio: &mut AudioQueue) {
        if self.start {
            audio.play_looping(&self.track);
            self.start = false;
            self.muted = false;
        }
        if self.muted {
            audio.stop(&self.track);
            self.muted = false;
        }
    }

    #[allow(dead_code)]
    pub fn mute(&mut self) {
        self.muted = true;
    }

    #[allow(dead_code)]
    pub fn resume(&mut self) {
        if self.muted {
            self.muted = false;
            self.start = true;
        }
    }
}

/// The HUD counters the player reports into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Lives,
    Coins,
    Ammo,
}

/// One-way display sink; never read back by the core.
pub trait Hud {
    fn change_text(&mut self, counter: Counter, text: &str);
}

#[derive(Debug, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn change_text(&mut self, _counter: Counter, _text: &str) {}
}

/// Caches the last pushed string so the sink only hears actual changes.
#[derive(Debug)]
pub struct CounterBar {
    counter: Counter,
    last: String,
}

impl CounterBar {
    pub fn new(counter: Counter) -> Self {
        Self {
            counter,
            last: String::new(),
        }
    }

    pub fn push(&mut self, value: &str, hud: &mut dyn Hud) {
        if self.last != value {
            self.last.clear();
            self.last.push_str(value);
            hud.change_text(self.counter, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingHud(Vec<(Counter, String)>);

    impl Hud for RecordingHud {
        fn change_text(&mut self, counter: Counter, text: &str) {
            self.0.push((counter, text.to_string()));
        }
    }

    #[test]
    fn one_shot_plays_exactly_once() {
        let mut audio = AudioQueue::new();
        let mut shot = OneShot::new(SoundId::from("coin"));
        shot.play(&mut audio);
        shot.play(&mut audio);
        shot.play(&mut audio);
        assert_eq!(audio.len(), 1);
        assert!(shot.played());
    }

    #[test]
    fn audio_drain_empties_the_queue() {
        let mut audio = AudioQueue::new();
        audio.play(&SoundId::from("a"));
        audio.stop(&SoundId::from("b"));
        let events = audio.drain();
        assert_eq!(events.len(), 2);
        assert!(audio.is_empty());
        assert_eq!(events[0], AudioEvent::Play(SoundId::from("a")));
    }

    #[test]
    fn turntable_starts_looping_once() {
        let mut audio = AudioQueue::new();
        let mut deck = Turntable::new(SoundId::from("theme"));
        deck.update(&mut audio);
        deck.update(&mut audio);
        assert_eq!(audio.len(), 1);
        assert_eq!(
            audio.events()[0],
            AudioEvent::PlayLooping(SoundId::from("theme"))
        );
    }

    #[test]
    fn turntable_mute_then_resume_restarts() {
        let mut audio = AudioQueue::new();
        let mut deck = Turntable::new(SoundId::from("theme"));
        deck.update(&mut audio);
        deck.mute();
        deck.update(&mut audio);
        deck.resume();
        deck.update(&mut audio);
        let events = audio.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], AudioEvent::Stop(SoundId::from("theme")));
        assert_eq!(events[2], AudioEvent::PlayLooping(SoundId::from("theme")));
    }

    #[test]
    fn counter_bar_pushes_only_on_change() {
        let mut hud = RecordingHud(Vec::new());
        let mut bar = CounterBar::new(Counter::Coins);
        bar.push("3", &mut hud);
        bar.push("3", &mut hud);
        bar.push("4", &mut hud);
        assert_eq!(hud.0.len(), 2);
        assert_eq!(hud.0[1], (Counter::Coins, "4".to_string()));
    }
}
