//! Weather props: rain, drifting clouds and the lightning cycle. Pure
//! atmosphere — none of it participates in collision or interaction, and
//! all of it ignores world shifts like any other far-background layer.

use crate::entity::{Body, Entity, EntityTag};
use crate::services::{AudioQueue, Canvas, ImageId, SoundId};
use glam::Vec2;
use hopper_core::bounds::{Metrics, Span};
use hopper_core::motion::Speed;
use hopper_core::time::Stopwatch;
use hopper_core::trajectory::Drip;
use rand::Rng;
use rand_pcg::Pcg32;

/// A sheet of drips, each looping independently through the drip cycle.
pub struct Rain {
    drops: Vec<(Body, Drip)>,
    image: ImageId,
    pub on: bool,
    rng: Pcg32,
}

impl Rain {
    pub fn new(image: ImageId, quantity: usize, metrics: &Metrics, rng: Pcg32) -> Self {
        let cell = metrics.cell();
        let draw = metrics.draw_bounds();
        let span_x = (draw.x.min, draw.x.max);
        let span_y = (draw.y.min, draw.y.max);
        let size = Vec2::new(cell * 0.125, cell * 0.25);
        let drops = (0..quantity)
            .map(|_| {
                let body = Body::new(Vec2::ZERO, size, EntityTag::Other);
                let drip = Drip::new(cell, cell, span_y.1, span_x, span_y);
                (body, drip)
            })
            .collect();
        Self {
            drops,
            image,
            on: true,
            rng,
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

impl Entity for Rain {
    fn update(&mut self, _audio: &mut AudioQueue) {
        if !self.on {
            return;
        }
        for (body, drip) in &mut self.drops {
            let mut rect = body.rect();
            drip.move_rect(&mut rect, &mut self.rng);
            body.sync_from(rect);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for (body, _) in &self.drops {
            canvas.blit(&self.image, body.rect(), false);
        }
    }

    fn shift(&mut self, _offset: Vec2) {}
}

/// A band of puffs drifting one way, wrapping back to the far edge when
/// they leave the band.
pub struct Clouds {
    puffs: Vec<(Body, Speed)>,
    image: ImageId,
    span_x: Span,
    pub right: bool,
    pub stopped: bool,
}

impl Clouds {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image: ImageId,
        quantity: usize,
        rate: f32,
        limit: f32,
        band_y: Span,
        metrics: &Metrics,
        to_right: bool,
        rng: &mut Pcg32,
    ) -> Self {
        let cell = metrics.cell();
        let draw = metrics.draw_bounds();
        let span_x = Span::new(draw.x.min, draw.x.max);
        let size = Vec2::new(cell * 2.0, cell);
        let puffs = (0..quantity)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random_range(span_x.min..=span_x.max),
                    rng.random_range(band_y.min..=band_y.max),
                );
                let mut body = Body::new(pos, size, EntityTag::Other);
                body.frozen = true;
                (body, Speed::new(rate, limit, to_right))
            })
            .collect();
        Self {
            puffs,
            image,
            span_x,
            right: to_right,
            stopped: false,
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.puffs.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.puffs.is_empty()
    }
}

impl Entity for Clouds {
    fn update(&mut self, _audio: &mut AudioQueue) {
        if self.stopped {
            return;
        }
        let right = self.right;
        let span = self.span_x;
        for (body, speed) in &mut self.puffs {
            let mut rect = body.rect();
            speed.move_x(&mut rect, right);
            body.pos = rect.pos;
            if right && body.pos.x >= span.max {
                body.pos.x = span.min;
            } else if !right && body.pos.x <= span.min {
                body.pos.x = span.max;
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        for (body, _) in &self.puffs {
            canvas.blit(&self.image, body.rect(), false);
        }
    }

    fn shift(&mut self, _offset: Vec2) {}
}

/// Bolt, flash, thunder, repeat. The flash is a timed window the renderer
/// fills with a translucent overlay; nothing in the pipeline stalls for it.
pub struct Lightning {
    bolt: Body,
    image: ImageId,
    thunder: SoundId,
    span_x: Span,
    timer: Stopwatch,
    /// The cycle in seconds: quiet until `time_bolt`, bolt visible until
    /// `time_flash`, flash until `time_end`, then thunder and restart.
    time_bolt: f32,
    time_flash: f32,
    time_end: f32,
    pub bolt_visible: bool,
    pub flashing: bool,
    alpha: u8,
    window: Vec2,
    rng: Pcg32,
}

impl Lightning {
    pub fn new(
        image: ImageId,
        thunder: SoundId,
        period: f32,
        bolt_width: f32,
        metrics: &Metrics,
        rng: Pcg32,
    ) -> Self {
        let window = metrics.window();
        let mut bolt = Body::new(
            Vec2::ZERO,
            Vec2::new(bolt_width, window.y),
            EntityTag::Other,
        );
        bolt.frozen = true;
        Self {
            bolt,
            image,
            thunder,
            span_x: Span::new(0.0, window.x),
            timer: Stopwatch::new(),
            time_bolt: period,
            time_flash: period + 1.0,
            time_end: period + 1.3,
            bolt_visible: false,
            flashing: false,
            alpha: 200,
            window,
            rng,
        }
    }

    fn place_bolt(&mut self) {
        if !self.bolt_visible {
            self.bolt.pos.x = self.rng.random_range(self.span_x.min..=self.span_x.max);
            self.bolt_visible = true;
        }
    }

    #[cfg(test)]
    pub fn bank(&mut self, secs: f32) {
        self.timer.bank(secs);
    }
}

impl Entity for Lightning {
    fn update(&mut self, audio: &mut AudioQueue) {
        let time = self.timer.elapsed();
        if time >= self.time_bolt && time <= self.time_flash {
            self.place_bolt();
            self.flashing = false;
        }
        if time > self.time_flash && time <= self.time_end {
            self.flashing = true;
            self.bolt_visible = false;
        }
        if time > self.time_end {
            audio.play(&self.thunder);
            self.flashing = false;
            self.timer.restart();
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.bolt_visible {
            canvas.blit(&self.image, self.bolt.rect(), false);
        }
        if self.flashing {
            canvas.fill(
                hopper_core::rect::Rect::new(Vec2::ZERO, self.window),
                [255, 255, 255],
                self.alpha,
            );
        }
    }

    fn shift(&mut self, _offset: Vec2) {}
}
