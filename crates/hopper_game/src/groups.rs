//! Ordered entity collections and the per-frame dispatch passes.
//!
//! A `Collection` is a plain ordered list with an explicit append and a
//! deferred-append queue: anything spawned while a pass is iterating goes
//! into the queue and joins the live list when the pass flushes. Removal
//! during iteration is unsupported; removal is by index, between frames.

use crate::blocks::Brick;
use crate::bullet::Bullet;
use crate::entity::{Entity, Vulnerable};
use crate::services::{AudioQueue, Canvas};
use glam::Vec2;

pub struct Collection<T> {
    items: Vec<T>,
    pending: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Immediate append; only safe between passes.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Deferred append, safe at any time; the item joins on `flush`.
    pub fn enqueue(&mut self, item: T) {
        self.pending.push(item);
    }

    /// Moves queued items into the live list, preserving order. Returns
    /// how many joined.
    pub fn flush(&mut self) -> usize {
        let joined = self.pending.len();
        self.items.append(&mut self.pending);
        joined
    }

    #[allow(dead_code)]
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.items.clear();
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[allow(dead_code)]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[allow(dead_code)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Collection<T> {
    #[allow(dead_code)]
    pub fn update_all(&mut self, audio: &mut AudioQueue) {
        for item in &mut self.items {
            item.update(audio);
        }
    }

    #[allow(dead_code)]
    pub fn draw_all(&self, canvas: &mut dyn Canvas) {
        for item in &self.items {
            item.draw(canvas);
        }
    }

    #[allow(dead_code)]
    pub fn shift_all(&mut self, offset: Vec2) {
        for item in &mut self.items {
            item.shift(offset);
        }
    }

    /// The composite frame pass: update, draw and shift each member in
    /// container order, then run the caller's extra step (interaction,
    /// collision) on it. Queued spawns join after the loop.
    pub fn pass(
        &mut self,
        canvas: &mut dyn Canvas,
        audio: &mut AudioQueue,
        offset: Vec2,
        mut extra: impl FnMut(&mut T, &mut AudioQueue),
    ) {
        for item in &mut self.items {
            item.update(audio);
            item.draw(canvas);
            item.shift(offset);
            extra(item, audio);
        }
        self.flush();
    }
}

/// Bullet-vs-target dispatch: every armed live bullet is offered every
/// target; the bullet's own gates (overlap, tag, ladder) decide.
pub fn strike_targets<T: Vulnerable>(bullets: &mut Collection<Bullet>, targets: &mut Collection<T>) {
    for bullet in bullets.iter_mut() {
        if !bullet.armed || bullet.durability.destroyed {
            continue;
        }
        for target in targets.iter_mut() {
            bullet.strike(target);
        }
    }
}

/// Bullet-vs-block dispatch for physical bullets.
pub fn smash_blocks(
    bullets: &mut Collection<Bullet>,
    blocks: &mut Collection<Brick>,
    audio: &mut AudioQueue,
) {
    for bullet in bullets.iter_mut() {
        if !bullet.durability.physical || bullet.durability.destroyed {
            continue;
        }
        for block in blocks.iter_mut() {
            bullet.smash(block, audio);
        }
    }
}
