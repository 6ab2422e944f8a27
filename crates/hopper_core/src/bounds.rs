//! Axis-aligned region predicates used for draw and update culling, and the
//! metrics table the standard regions are derived from. The window is a
//! rows x cols grid of square cells; every gameplay size in the engine is a
//! multiple of the cell.

use glam::Vec2;

/// Closed 1-D interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 2-D region with an `inside` latch refreshed by `check`. Entities keep
/// one for update culling and one for draw culling.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub x: Span,
    pub y: Span,
    pub inside: bool,
}

impl Bounds {
    pub fn new(x: Span, y: Span) -> Self {
        Self {
            x,
            y,
            inside: true,
        }
    }

    pub fn check(&mut self, pos: Vec2) {
        self.inside = self.x.contains(pos.x) && self.y.contains(pos.y);
    }
}

/// The basic sizes table: a rows x cols window grid with square cells sized
/// from the window height.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    rows: u32,
    cols: u32,
    cell: f32,
    window: Vec2,
}

const GRID_ROWS: u32 = 12;
const GRID_COLS: u32 = 22;

impl Metrics {
    pub fn new(window_height: f32) -> Self {
        let cell = window_height / GRID_ROWS as f32;
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cell,
            window: Vec2::new(GRID_COLS as f32 * cell, GRID_ROWS as f32 * cell),
        }
    }

    pub fn cell(&self) -> f32 {
        self.cell
    }

    pub fn window(&self) -> Vec2 {
        self.window
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Drawing region: the window padded by five cells on every side.
    pub fn draw_bounds(&self) -> Bounds {
        let pad = self.cell * 5.0;
        Bounds::new(
            Span::new(-pad, self.window.x + pad),
            Span::new(-pad, self.window.y + pad),
        )
    }

    /// Activity region: a window width on either side horizontally, five
    /// cells vertically. Entities outside it skip their main update.
    pub fn update_bounds(&self) -> Bounds {
        let pad = self.cell * 5.0;
        Bounds::new(
            Span::new(-self.window.x, self.window.x * 2.0),
            Span::new(-pad, self.window.y + pad),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_contains_is_inclusive() {
        let span = Span::new(-1.0, 1.0);
        assert!(span.contains(-1.0));
        assert!(span.contains(1.0));
        assert!(!span.contains(1.0001));
    }

    #[test]
    fn bounds_latch_follows_checks() {
        let mut bounds = Bounds::new(Span::new(0.0, 10.0), Span::new(0.0, 10.0));
        assert!(bounds.inside, "fresh bounds start inside");
        bounds.check(Vec2::new(20.0, 5.0));
        assert!(!bounds.inside);
        bounds.check(Vec2::new(5.0, 5.0));
        assert!(bounds.inside);
    }

    #[test]
    fn metrics_cell_divides_window_height() {
        let metrics = Metrics::new(720.0);
        assert_eq!(metrics.cell(), 60.0);
        assert_eq!(metrics.window(), Vec2::new(1320.0, 720.0));
    }

    #[test]
    fn draw_bounds_pad_the_window_by_five_cells() {
        let metrics = Metrics::new(720.0);
        let bounds = metrics.draw_bounds();
        assert_eq!(bounds.x.min, -300.0);
        assert_eq!(bounds.x.max, 1320.0 + 300.0);
        assert_eq!(bounds.y.max, 720.0 + 300.0);
    }

    #[test]
    fn update_bounds_reach_a_window_width_sideways() {
        let metrics = Metrics::new(720.0);
        let bounds = metrics.update_bounds();
        assert_eq!(bounds.x.min, -1320.0);
        assert_eq!(bounds.x.max, 2640.0);
    }
}
