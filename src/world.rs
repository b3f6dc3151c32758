use std::path::Path;

use thiserror::Error;

/// The level shipped with the game, `#` for walls.
pub const DEFAULT_LEVEL: [&str; 12] = [
    "####################",
    "#..................#",
    "#..#..............##",
    "#..#...............#",
    "#..#####....########",
    "#........#.........#",
    "#........#.........#",
    "#........#.........#",
    "##########.........#",
    "#..................#",
    "#..................#",
    "####################",
];

pub const DEFAULT_WALL_GLYPH: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("map row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("failed to read map file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Row-major tile map. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from equal-width rows. `wall` marks Wall cells, every
    /// other glyph is Open.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], wall: char) -> Result<Self, MapError> {
        let first = rows.first().ok_or(MapError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(line.as_ref().chars().map(|ch| {
                if ch == wall { Cell::Wall } else { Cell::Open }
            }));
            let found = cells.len() - before;
            if found != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let grid = Self {
            width,
            height: rows.len(),
            cells,
        };
        if !grid.is_enclosed() {
            tracing::warn!(
                width = grid.width,
                height = grid.height,
                "map border is not fully walled; rays rely on the out-of-bounds policy"
            );
        }
        Ok(grid)
    }

    /// Parse newline-separated rows. Trailing blank lines and `\r` are ignored.
    pub fn parse(text: &str, wall: char) -> Result<Self, MapError> {
        let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Self::from_rows(&rows, wall)
    }

    pub fn load(path: &Path, wall: char) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let grid = Self::parse(&text, wall)?;
        tracing::info!(path = %path.display(), width = grid.width, height = grid.height, "loaded map");
        Ok(grid)
    }

    pub fn default_level() -> Self {
        match Self::from_rows(&DEFAULT_LEVEL, DEFAULT_WALL_GLYPH) {
            Ok(grid) => grid,
            Err(err) => unreachable!("built-in level is rectangular: {err}"),
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

    /// Total lookup: anything outside the grid is a wall.
    #[inline]
    pub fn get_tile(&self, x: i64, y: i64) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Cell::Wall;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        self.get_tile(x, y) == Cell::Wall
    }

    /// Wall cell containing the world-space point.
    #[inline]
    pub fn is_wall_at(&self, x: f64, y: f64) -> bool {
        self.is_wall(x.floor() as i64, y.floor() as i64)
    }

    /// True when every border cell is a wall.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as i64, self.height as i64);
        (0..w).all(|x| self.is_wall(x, 0) && self.is_wall(x, h - 1))
            && (0..h).all(|y| self.is_wall(0, y) && self.is_wall(w - 1, y))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::default_level()
    }
}
