//! Grid traversal (DDA) from the camera to the first wall, one ray per column.

use crate::{camera::Camera, world::Grid};

/// Stand-in for `1/0` on axis-aligned rays. Large enough that the axis is
/// never the nearer boundary.
const NO_CROSSING: f64 = 1e30;

/// Distance reported for a ray that exceeded the step cap.
pub const ESCAPED_DISTANCE: f64 = 1e30;

/// Floor for the perpendicular distance. A camera sitting exactly on a cell
/// boundary can otherwise produce zero.
pub const MIN_DISTANCE: f64 = 1e-4;

/// Which family of grid lines the ray crossed when it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A vertical boundary (constant X), i.e. the ray stepped along X.
    X,
    /// A horizontal boundary (constant Y).
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnHit {
    /// Distance projected onto the facing direction (no fisheye).
    pub distance: f64,
    pub side: Side,
}

impl ColumnHit {
    #[inline]
    pub fn escaped(&self) -> bool {
        self.distance >= ESCAPED_DISTANCE
    }
}

/// Normalized screen offset of a column: -1 at the left edge, 0 at the center.
#[inline]
pub fn camera_x(column: usize, screen_width: usize) -> f64 {
    2.0 * column as f64 / screen_width as f64 - 1.0
}

#[derive(Debug, Clone, Copy)]
pub struct Raycaster<'a> {
    grid: &'a Grid,
    max_steps: usize,
}

impl<'a> Raycaster<'a> {
    /// Cap derived from the map: a ray starting inside the grid crosses at
    /// most `width + height` cells before it leaves, and leaving is a hit.
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            max_steps: grid.width() + grid.height() + 2,
        }
    }

    pub fn with_max_steps(grid: &'a Grid, max_steps: usize) -> Self {
        Self { grid, max_steps }
    }

    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn cast_column(&self, camera: &Camera, column: usize, screen_width: usize) -> ColumnHit {
        self.cast(camera, camera.ray_dir(camera_x(column, screen_width)))
    }

    pub fn cast(&self, camera: &Camera, ray_dir: [f64; 2]) -> ColumnHit {
        let [px, py] = camera.pos;
        let [rx, ry] = ray_dir;

        let mut map_x = px.floor() as i64;
        let mut map_y = py.floor() as i64;

        let delta_x = if rx == 0.0 { NO_CROSSING } else { (1.0 / rx).abs() };
        let delta_y = if ry == 0.0 { NO_CROSSING } else { (1.0 / ry).abs() };

        let (step_x, mut side_x) = if rx < 0.0 {
            (-1, (px - map_x as f64) * delta_x)
        } else {
            (1, (map_x as f64 + 1.0 - px) * delta_x)
        };
        let (step_y, mut side_y) = if ry < 0.0 {
            (-1, (py - map_y as f64) * delta_y)
        } else {
            (1, (map_y as f64 + 1.0 - py) * delta_y)
        };

        let mut side = Side::X;
        for _ in 0..self.max_steps {
            if side_x < side_y {
                side_x += delta_x;
                map_x += step_x;
                side = Side::X;
            } else {
                side_y += delta_y;
                map_y += step_y;
                side = Side::Y;
            }

            if self.grid.is_wall(map_x, map_y) {
                let perp = match side {
                    Side::X => side_x - delta_x,
                    Side::Y => side_y - delta_y,
                };
                return ColumnHit {
                    distance: perp.max(MIN_DISTANCE),
                    side,
                };
            }
        }

        tracing::trace!(max_steps = self.max_steps, ?ray_dir, "ray escaped");
        ColumnHit {
            distance: ESCAPED_DISTANCE,
            side,
        }
    }
}
