//! Grid raycaster that renders a first-person view as rows of ASCII glyphs.
//!
//! Data flow per turn: a [`session::Command`] mutates the [`camera::Camera`],
//! the [`raycast::Raycaster`] walks the [`world::Grid`] once per screen column,
//! and the [`renderer::Renderer`] shades each column into a fresh
//! [`renderer::Frame`] that a display sink prints.

pub mod camera;
pub mod config;
pub mod hud;
pub mod raycast;
pub mod renderer;
pub mod scaler;
pub mod session;
pub mod term;
pub mod window;
pub mod world;

pub use camera::Camera;
pub use raycast::{ColumnHit, Raycaster, Side};
pub use renderer::{Frame, Renderer, Shading};
pub use world::{Cell, Grid};
