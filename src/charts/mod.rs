//! Charts module - Chart rendering and drawing surfaces

pub mod bitmap;
pub mod export;
pub mod geometry;
pub mod path;
mod renderer;
pub mod style;
pub mod surface;

pub use renderer::ChartRenderer;
pub use surface::{DrawingSurface, SurfaceHost};
