//! GUI module - User interface components

mod app;
mod canvas;
mod control_panel;

pub use app::NoiseChartApp;
pub use canvas::ChartCanvas;
pub use control_panel::{ChartReadout, ControlPanel, ControlPanelAction};
