//! Axis-separated solid-collision resolution.
//!
//! Per mover, per solid container, once a frame: a pre-pass releases the
//! grounded latch for movers that are not mid-jump, then every overlapping
//! solid is resolved in container order — horizontal correction first,
//! gated by vertical proximity, then the vertical branch. Later items in
//! the same pass may override earlier corrections; there is no batching or
//! averaging.
//!
//! Three container variants layer gameplay on the shared algorithm:
//! plain blocks fire their bonk hook at the ceiling-bonk moment, transports
//! additionally run the ride heuristic for every item each frame, and
//! surprise blocks get a spawn queue for their reward.

use crate::blocks::{Brick, Pickup, SurpriseBlock};
use crate::entity::Body;
use crate::groups::Collection;
use crate::platforms::Platform;
use crate::services::AudioQueue;
use hopper_core::motion::{Gravity, Jump};
use hopper_core::rect::Rect;

/// Gate for horizontal correction: applies only while the mover's top edge
/// is within this fraction of the item's height. Stops sideways pushback
/// when the mover is really standing on top.
const HOR_GATE: f32 = 0.63;
/// Flush-reposition margin, as a fraction of the item's width.
const HOR_MARGIN: f32 = 0.2;
/// Vertical un-stick nudge, as a fraction of the gated height.
const UNSTICK: f32 = 0.1;
/// Resting gap above a solid, as a fraction of the mover's height.
const REST_GAP: f32 = 1.01;
/// Ride heuristic: horizontal reach as a fraction of the platform width.
const RIDE_X: f32 = 0.6;
/// Ride heuristic: vertical reach fractions of platform and rider heights.
const RIDE_Y_ITEM: f32 = 0.5;
const RIDE_Y_RIDER: f32 = 0.6;

/// Borrowed view of a moving entity for one resolution pass. Bundles the
/// pieces the resolver mutates plus the per-pass parameters.
pub struct MoverView<'a> {
    pub body: &'a mut Body,
    pub gravity: &'a mut Gravity,
    pub jump: Option<&'a mut Jump>,
    /// The mover's hard speed cap, used as an anti-tunneling margin.
    pub limiter: f32,
    /// Reflect facing on horizontal hits (patrol enemies bouncing off
    /// walls).
    pub repulse: bool,
    /// Whether a ceiling bonk from this mover breaks destructible bricks.
    pub bonk_power: bool,
}

impl<'a> MoverView<'a> {
    pub fn new(body: &'a mut Body, gravity: &'a mut Gravity) -> Self {
        Self {
            body,
            gravity,
            jump: None,
            limiter: 0.0,
            repulse: false,
            bonk_power: false,
        }
    }

    fn mid_jump(&self) -> bool {
        self.jump.as_ref().is_some_and(|jump| jump.in_jumping)
    }
}

/// Pre-pass: a mover with a jump component that is not actively rising
/// must not keep a stale grounded latch, or it would stick to thin air.
fn release_airborne(mover: &mut MoverView) {
    if let Some(jump) = mover.jump.as_ref() {
        if !jump.in_jumping {
            mover.gravity.grounded = false;
        }
    }
}

/// Reposition flush against the item's near edge, offset by the margin and
/// the caller's limiter, optionally reflecting the facing.
fn horizontal_collide(mover: &mut MoverView, item: Rect) {
    let margin = item.size.x * HOR_MARGIN;
    mover.body.pos.x = if mover.body.facing_right {
        item.left() - mover.limiter - margin
    } else {
        item.right() + mover.limiter + margin
    };
    if mover.repulse {
        mover.body.facing_right = !mover.body.facing_right;
    }
}

/// Un-stick after a horizontal correction: nudge non-jumping movers up a
/// little and drop the grounded latch so gravity re-settles them.
fn settle_after_horizontal(mover: &mut MoverView, gate: f32) {
    if !mover.mid_jump() {
        mover.body.pos.y -= gate * UNSTICK;
    }
    mover.gravity.grounded = false;
}

/// Vertical branch. A mover whose top is above the item's top and is
/// airborne lands on it; a mover whose top is below bonks its underside,
/// firing `on_bonk` exactly at that moment.
fn vertical_collide(mover: &mut MoverView, item: Rect, on_bonk: impl FnOnce()) {
    if mover.body.pos.y < item.top() && !mover.gravity.grounded {
        // Ground line is recorded from the pre-snap position.
        let ground = mover.body.pos.y + mover.body.size.y;
        mover.body.pos.y = item.top() - mover.body.size.y * REST_GAP;
        mover.gravity.grounded = true;
        if let Some(jump) = mover.jump.as_deref_mut() {
            jump.jumped = false;
            jump.ground = ground;
        }
    }
    if mover.body.pos.y > item.top() {
        on_bonk();
        mover.body.pos.y = item.bottom();
        if let Some(jump) = mover.jump.as_deref_mut() {
            jump.jumped = true;
            mover.gravity.grounded = false;
        }
    }
}

/// One mover against one solid rectangle; overlap has been established.
fn resolve_one(mover: &mut MoverView, item: Rect, on_bonk: impl FnOnce()) {
    let gate = item.size.y * HOR_GATE;
    if (mover.body.pos.y - item.pos.y).abs() <= gate {
        horizontal_collide(mover, item);
        settle_after_horizontal(mover, gate);
    }
    vertical_collide(mover, item, on_bonk);
}

/// Solid blocks (ground and bricks). Destroyed items are skipped; ceiling
/// bonks reach the brick's interaction hook.
pub fn resolve_blocks(mover: &mut MoverView, blocks: &mut Collection<Brick>, audio: &mut AudioQueue) {
    release_airborne(mover);
    let power = mover.bonk_power;
    for block in blocks.iter_mut() {
        if block.durability.destroyed {
            continue;
        }
        let item = block.body.rect();
        if !mover.body.rect().overlaps(&item) {
            continue;
        }
        resolve_one(mover, item, || block.bonk(power, audio));
    }
}

/// Transport platforms: the ride heuristic runs for every platform every
/// frame, independent of whether a full overlap triggered the other
/// branches.
pub fn resolve_platforms(
    mover: &mut MoverView,
    platforms: &mut Collection<Platform>,
    audio: &mut AudioQueue,
) {
    release_airborne(mover);
    let power = mover.bonk_power;
    for platform in platforms.iter_mut() {
        ride_check(mover, platform);
        if platform.durability.destroyed {
            continue;
        }
        let item = platform.body.rect();
        if !mover.body.rect().overlaps(&item) {
            continue;
        }
        resolve_one(mover, item, || platform.bonk(power, audio));
    }
}

/// Close-enough-to-ride test: the platform's displacement propagates onto
/// the mover while it stands in the ride zone above the platform.
fn ride_check(mover: &mut MoverView, platform: &Platform) {
    let item = platform.body.rect();
    let mover_rect = mover.body.rect();
    let dx = (item.center().x - mover_rect.center().x).abs();
    let dy = item.center().y - mover_rect.center().y;
    let reach_x = item.size.x * RIDE_X;
    let reach_y = item.size.y * RIDE_Y_ITEM + mover_rect.size.y * RIDE_Y_RIDER;
    if dx <= reach_x && dy > 0.0 && dy <= reach_y {
        platform.carry(mover.body);
    }
}

/// Surprise blocks need the extra dispatch context: a bonk may spawn the
/// block's reward into the queue.
pub fn resolve_surprises(
    mover: &mut MoverView,
    surprises: &mut Collection<SurpriseBlock>,
    rewards: &mut Collection<Pickup>,
    audio: &mut AudioQueue,
) {
    release_airborne(mover);
    for surprise in surprises.iter_mut() {
        let item = surprise.body.rect();
        if !mover.body.rect().overlaps(&item) {
            continue;
        }
        resolve_one(mover, item, || surprise.bonk(rewards, audio));
    }
}
