use std::sync::atomic::{AtomicBool, Ordering};

use rayon::{
    iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use serde::Deserialize;

use crate::{
    camera::Camera,
    raycast::{ColumnHit, Raycaster, Side},
    world::Grid,
};

/// Glyph tiers by distance, nearest first. `thresholds[i]` is the upper bound
/// (exclusive) of tier `i`; anything beyond the last threshold uses tier 3.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Shading {
    pub x_side: [char; 4],
    pub y_side: [char; 4],
    pub thresholds: [f64; 3],
    pub floor: char,
    pub ceiling: char,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            x_side: ['#', 'O', '=', '-'],
            y_side: ['@', 'o', '~', '-'],
            thresholds: [4.0, 8.0, 14.0],
            floor: '.',
            ceiling: ' ',
        }
    }
}

impl Shading {
    pub fn wall_glyph(&self, distance: f64, side: Side) -> char {
        let tier = self
            .thresholds
            .iter()
            .position(|&t| distance < t)
            .unwrap_or(self.thresholds.len());
        match side {
            Side::X => self.x_side[tier],
            Side::Y => self.y_side[tier],
        }
    }
}

/// A finished frame: `height` rows of `width` glyphs, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: char) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ch;
        }
    }

    pub fn row(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .collect()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row(y)).collect()
    }

    /// Write `text` starting at (x, y), clipped to the frame.
    pub fn put_str(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i, y, ch);
        }
    }

    /// Copy `src` into this frame with its top-left corner at (x, y).
    pub fn blit(&mut self, src: &Frame, x: usize, y: usize) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                self.set(x + sx, y + sy, src.cells[sy * src.width + sx]);
            }
        }
    }
}

/// Vertical run of one column: rows `start..=end` are wall.
#[derive(Debug, Clone, Copy)]
struct ColumnSpan {
    start: usize,
    end: usize,
    glyph: Option<char>,
}

impl ColumnSpan {
    fn from_hit(hit: ColumnHit, height: usize, shading: &Shading) -> Self {
        let h = height as i64;
        if hit.escaped() {
            // Nothing in sight: ceiling down to the horizon, floor below.
            let horizon = height / 2;
            return Self {
                start: horizon,
                end: horizon.wrapping_sub(1),
                glyph: None,
            };
        }

        let line_height = (height as f64 / hit.distance) as i64;
        let start = (-line_height / 2 + h / 2).max(0);
        let end = (line_height / 2 + h / 2).min(h - 1);
        Self {
            start: start as usize,
            end: end as usize,
            glyph: Some(shading.wall_glyph(hit.distance, hit.side)),
        }
    }

    #[inline]
    fn glyph_at(&self, y: usize, shading: &Shading) -> char {
        match self.glyph {
            Some(g) if y >= self.start && y <= self.end => g,
            Some(_) if y > self.end => shading.floor,
            None if y >= self.start => shading.floor,
            _ => shading.ceiling,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub shading: Shading,
    /// Overrides the map-derived DDA step cap.
    pub max_steps: Option<usize>,
    /// Cast columns and fill rows on the rayon pool.
    pub parallel: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            shading: Shading::default(),
            max_steps: None,
            parallel: true,
        }
    }
}

impl Renderer {
    fn raycaster<'a>(&self, grid: &'a Grid) -> Raycaster<'a> {
        match self.max_steps {
            Some(n) => Raycaster::with_max_steps(grid, n),
            None => Raycaster::new(grid),
        }
    }

    /// One hit per screen column, left to right.
    pub fn cast_columns(&self, grid: &Grid, camera: &Camera, width: usize) -> Vec<ColumnHit> {
        let caster = self.raycaster(grid);
        if self.parallel {
            (0..width)
                .into_par_iter()
                .map(|x| caster.cast_column(camera, x, width))
                .collect()
        } else {
            (0..width)
                .map(|x| caster.cast_column(camera, x, width))
                .collect()
        }
    }

    pub fn render(&self, grid: &Grid, camera: &Camera, width: usize, height: usize) -> Frame {
        let hits = self.cast_columns(grid, camera, width);
        self.shade(&hits, width, height)
    }

    /// Like [`Renderer::render`], but gives up and returns `None` once
    /// `cancel` is raised.
    pub fn render_cancellable(
        &self,
        grid: &Grid,
        camera: &Camera,
        width: usize,
        height: usize,
        cancel: &AtomicBool,
    ) -> Option<Frame> {
        let caster = self.raycaster(grid);
        let cast = |x: usize| {
            if cancel.load(Ordering::Relaxed) {
                None
            } else {
                Some(caster.cast_column(camera, x, width))
            }
        };
        let hits: Option<Vec<ColumnHit>> = if self.parallel {
            (0..width).into_par_iter().map(cast).collect()
        } else {
            (0..width).map(cast).collect()
        };
        let hits = hits?;

        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        Some(self.shade(&hits, width, height))
    }

    fn shade(&self, hits: &[ColumnHit], width: usize, height: usize) -> Frame {
        let shading = &self.shading;

        // Fresh buffer every frame.
        let mut frame = Frame::new(width, height, shading.ceiling);
        if width == 0 || height == 0 {
            return frame;
        }

        let spans: Vec<ColumnSpan> = hits
            .iter()
            .map(|&hit| ColumnSpan::from_hit(hit, height, shading))
            .collect();

        let fill_row = |(y, row): (usize, &mut [char])| {
            for (cell, span) in row.iter_mut().zip(&spans) {
                *cell = span.glyph_at(y, shading);
            }
        };
        if self.parallel {
            frame.cells.par_chunks_mut(width).enumerate().for_each(fill_row);
        } else {
            frame.cells.chunks_mut(width).enumerate().for_each(fill_row);
        }
        frame
    }
}
