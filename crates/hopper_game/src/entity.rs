//! The entity capability set: placement, destruction state, the per-frame
//! dispatch contract and the capability traits gameplay dispatch runs on.
//!
//! The taxonomy is fixed and enumerable. Instead of a deep class chain,
//! each concrete kind composes the orthogonal pieces it needs: a `Body`,
//! usually a `Durability`, and whichever motion components apply.

use crate::services::{AudioQueue, Canvas};
use glam::Vec2;
use hopper_core::counter::Health;
use hopper_core::rect::Rect;

/// Closed name set used for bullet-target matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTag {
    Player,
    Monster,
    Other,
}

/// Placement and identity. The bounding rectangle is always derived from
/// `pos` + `size` on demand; a stale stored rectangle cannot exist.
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing_right: bool,
    /// Frozen bodies ignore world shifts.
    pub frozen: bool,
    pub tag: EntityTag,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, tag: EntityTag) -> Self {
        Self {
            pos,
            size,
            facing_right: true,
            frozen: false,
            tag,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Writes back a rect a motion component has moved.
    pub fn sync_from(&mut self, rect: Rect) {
        self.pos = rect.pos;
        self.size = rect.size;
    }

    pub fn shift(&mut self, offset: Vec2) {
        if !self.frozen {
            self.pos += offset;
        }
    }
}

/// Removal-by-flag state. `settle` runs every update, not just on the
/// transition: a non-destructible entity shrugs off any destroy request,
/// and a destroyed one stays frozen until reset externally.
#[derive(Debug, Clone, Copy)]
pub struct Durability {
    pub destructible: bool,
    pub destroyed: bool,
    /// Participates in solid-block collision resolution.
    pub physical: bool,
}

impl Durability {
    pub fn new(destructible: bool, physical: bool) -> Self {
        Self {
            destructible,
            destroyed: false,
            physical,
        }
    }

    pub fn settle(&mut self, frozen: &mut bool) {
        if !self.destructible {
            self.destroyed = false;
        }
        if self.destroyed {
            *frozen = true;
        }
    }
}

/// The per-frame dispatch contract every collection member satisfies.
pub trait Entity {
    fn update(&mut self, audio: &mut AudioQueue);
    fn draw(&self, canvas: &mut dyn Canvas);
    fn shift(&mut self, offset: Vec2);
}

/// Pickup receiver. The one implementor today is the player, but the
/// dispatch code never needs to know that.
pub trait Collector {
    fn rect(&self) -> Rect;
    fn add_coins(&mut self, value: u32);
    fn add_lives(&mut self, lives: u32);
    /// Doubles the target's size and stores `marker` as the grown-state
    /// token. Returns false when the target is already grown.
    fn grow(&mut self, marker: u32) -> bool;
    /// Grants the fire form, or tops up ammo when it is already lit.
    fn ignite(&mut self, ammo: u32);
}

/// Damage ladder target. Exactly one rung applies per hit, checked in
/// priority order: invulnerable > grown > fire form > health > alive. The
/// defaults make every rung explicit at the implementor, so a target with
/// no form concept simply falls through to `kill`.
pub trait Vulnerable {
    fn tag(&self) -> EntityTag;
    fn rect(&self) -> Rect;
    fn invulnerable(&self) -> bool {
        false
    }
    /// Drops the grown form. False when there was nothing to shrink.
    fn shrink(&mut self) -> bool {
        false
    }
    /// Strips the fire form. False when there was nothing to strip.
    fn douse(&mut self) -> bool {
        false
    }
    fn health_mut(&mut self) -> Option<&mut Health> {
        None
    }
    /// Last rung: no form or health concept left.
    fn kill(&mut self);
}
