use crate::{
    camera::Camera,
    config::{Config, ConfigError, MovementConfig, ScreenConfig},
    hud,
    renderer::{Frame, Renderer},
    world::Grid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Quit,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Backward),
            'a' => Some(Self::TurnLeft),
            'd' => Some(Self::TurnRight),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// One play-through: the map, the viewer, and the move counter.
pub struct Session {
    pub grid: Grid,
    pub camera: Camera,
    pub renderer: Renderer,
    screen: ScreenConfig,
    movement: MovementConfig,
    score: u32,
    over: bool,
}

impl Session {
    pub fn new(
        grid: Grid,
        camera: Camera,
        renderer: Renderer,
        screen: ScreenConfig,
        movement: MovementConfig,
    ) -> Self {
        if grid.is_wall_at(camera.pos[0], camera.pos[1]) {
            tracing::warn!(pos = ?camera.pos, "camera starts inside a wall");
        }
        tracing::info!(
            map_width = grid.width(),
            map_height = grid.height(),
            screen_width = screen.width,
            screen_height = screen.height,
            "session started"
        );
        Self {
            grid,
            camera,
            renderer,
            screen,
            movement,
            score: 0,
            over: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.map.build()?;
        Ok(Self::new(
            grid,
            config.camera.build(),
            config.render.build(),
            config.screen.clone(),
            config.movement.clone(),
        ))
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    #[inline]
    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }

    /// Apply one command. Every move or turn counts toward the score, even
    /// when a wall blocks it. Returns whether the view should be redrawn.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.over {
            return false;
        }
        let speed = self.movement.move_speed;
        let turn = self.movement.rot_speed;
        match command {
            Command::Forward => {
                self.camera.try_translate(&self.grid, true, speed);
            }
            Command::Backward => {
                self.camera.try_translate(&self.grid, false, speed);
            }
            Command::TurnLeft => self.camera.rotate(turn),
            Command::TurnRight => self.camera.rotate(-turn),
            Command::Quit => {
                tracing::info!(score = self.score, "session over");
                self.over = true;
                return false;
            }
        }
        self.score += 1;
        tracing::debug!(?command, pos = ?self.camera.pos, dir = ?self.camera.dir, "applied command");
        true
    }

    /// Only the 3-D view, at an arbitrary size.
    pub fn view(&self, width: usize, height: usize) -> Frame {
        self.renderer.render(&self.grid, &self.camera, width, height)
    }

    /// Full screen: view plus HUD panel.
    pub fn frame(&self) -> Frame {
        let view = self.view(self.screen.view_width(), self.screen.height);
        hud::compose(
            &view,
            self.screen.panel_width,
            self.score,
            self.renderer.shading.ceiling,
        )
    }
}
