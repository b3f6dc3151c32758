use crate::world::Grid;

/// Plane length of the reference camera, roughly a 66 degree field of view.
pub const DEFAULT_PLANE_LEN: f64 = 0.66;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: [f64; 2],   // (x, y) position in grid space
    pub dir: [f64; 2],   // facing direction, unit length
    pub plane: [f64; 2], // camera plane, perpendicular to dir; length sets the FOV
}

impl Camera {
    /// Reference pose: looking down -X with a 0.66 plane.
    pub fn new(pos: [f64; 2]) -> Self {
        Self {
            pos,
            dir: [-1.0, 0.0],
            plane: [0.0, DEFAULT_PLANE_LEN],
        }
    }

    /// Pose facing `dir` (normalized here). The plane is `dir` turned a
    /// quarter clockwise, scaled to `plane_len`.
    pub fn looking(pos: [f64; 2], dir: [f64; 2], plane_len: f64) -> Self {
        let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt();
        let dir = if len > f64::EPSILON {
            [dir[0] / len, dir[1] / len]
        } else {
            [-1.0, 0.0]
        };
        Self {
            pos,
            dir,
            plane: [dir[1] * plane_len, -dir[0] * plane_len],
        }
    }

    #[inline]
    pub fn plane_len(&self) -> f64 {
        (self.plane[0] * self.plane[0] + self.plane[1] * self.plane[1]).sqrt()
    }

    /// Rescale the plane so the horizontal field of view is `fov_x_deg`.
    pub fn set_fov_from_horizontal(&mut self, fov_x_deg: f64) {
        let target = (0.5 * fov_x_deg.to_radians()).tan();
        let current = self.plane_len();
        if current > f64::EPSILON {
            let k = target / current;
            self.plane = [self.plane[0] * k, self.plane[1] * k];
        } else {
            self.plane = [self.dir[1] * target, -self.dir[0] * target];
        }
    }

    /// Ray direction for a normalized screen offset in `-1..1`.
    #[inline]
    pub fn ray_dir(&self, camera_x: f64) -> [f64; 2] {
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }

    /// Step along the facing direction. Each axis commits only when its own
    /// target cell is open, so a diagonal push into a wall slides along it.
    /// Returns whether the position changed.
    pub fn try_translate(&mut self, grid: &Grid, forward: bool, speed: f64) -> bool {
        let sign = if forward { 1.0 } else { -1.0 };
        let [x, y] = self.pos;
        let new_x = x + self.dir[0] * speed * sign;
        let new_y = y + self.dir[1] * speed * sign;

        let mut moved = false;
        if !grid.is_wall_at(new_x, y) {
            self.pos[0] = new_x;
            moved |= new_x != x;
        }
        if !grid.is_wall_at(x, new_y) {
            self.pos[1] = new_y;
            moved |= new_y != y;
        }
        moved
    }

    /// Rotate direction and plane together by `angle` radians
    /// (counter-clockwise in grid space).
    pub fn rotate(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        let [dx, dy] = self.dir;
        let [px, py] = self.plane;
        self.dir = [dx * c - dy * s, dx * s + dy * c];
        self.plane = [px * c - py * s, px * s + py * c];
    }
}
