//! Windowed display sink: paints each glyph cell as a shaded block.

use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::scaler::{CELL_H, CELL_W, Palette, ScaleLut, blit_cells, build_scale_lut};
use crate::session::{Command, Session};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    session: Session,
    palette: Palette,

    // Glyph grid derived from the window size
    cols: usize,
    rows: usize,

    scale_lut: ScaleLut,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(session: Session) -> Self {
        let palette = Palette::from_shading(&session.renderer.shading);
        Self {
            window: None,
            surface: None,
            session,
            palette,
            cols: 0,
            rows: 0,
            scale_lut: ScaleLut::empty(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let screen = self.session.screen();
        let attributes = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(LogicalSize::new(
                (screen.view_width() * CELL_W) as f64,
                (screen.height * CELL_H) as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("create window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.rebuild_grid_and_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn title(&self) -> String {
        format!("ASCII Raycaster - score {}", self.session.score())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!(error = %err, "window sink failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let command = match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Command::Forward,
            KeyCode::KeyS | KeyCode::ArrowDown => Command::Backward,
            KeyCode::KeyA | KeyCode::ArrowLeft => Command::TurnLeft,
            KeyCode::KeyD | KeyCode::ArrowRight => Command::TurnRight,
            KeyCode::KeyQ | KeyCode::Escape => Command::Quit,
            _ => return,
        };

        let redraw = self.session.apply(command);
        if self.session.is_over() {
            event_loop.exit();
            return;
        }
        if redraw {
            if let Some(window) = &self.window {
                window.set_title(&self.title());
                window.request_redraw();
            }
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(window) = &self.window else {
            return Ok(());
        };
        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);
        if self.scale_lut.dst_size() != (dw, dh) {
            self.rebuild_grid_and_lut(dw, dh);
        }

        let frame = self.session.view(self.cols, self.rows);
        let colors = self.palette.frame_colors(&frame);

        let Some(surface) = &mut self.surface else {
            return Ok(());
        };
        surface
            .resize(nw, nh)
            .map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;
        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("buffer_mut: {e}"))?;
        blit_cells(&mut buf, dw, &colors, self.cols, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow::anyhow!("present: {e}"))?;
        Ok(())
    }

    fn rebuild_grid_and_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.cols = (dst_w / CELL_W).max(1);
        self.rows = (dst_h / CELL_H).max(1);
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.cols, self.rows);
        tracing::debug!(cols = self.cols, rows = self.rows, "window glyph grid");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.session.apply(Command::Quit);
                event_loop.exit();
            }

            // One command per press; auto-repeat is ignored to keep turns discrete.
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_grid_and_lut(new_size.width as usize, new_size.height as usize);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

pub fn run(session: Session) -> Result<()> {
    let event_loop = EventLoop::new().context("create event loop")?;

    // Turn-based: only wake up for input and redraw requests.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(session);
    event_loop.run_app(&mut app).context("event loop")?;
    if let Some(err) = app.error.take() {
        return Err(err);
    }

    println!("Game Over! Final Score: {}", app.session.score());
    Ok(())
}
