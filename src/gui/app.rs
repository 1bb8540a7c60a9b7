//! Noise Chart Main Application
//! Main window with control panel and the animated chart canvas.

use crate::animation::AnimationLoop;
use crate::charts::export;
use crate::charts::geometry::Size;
use crate::charts::{ChartRenderer, DrawingSurface};
use crate::config::{ChartConfig, DEFAULT_TARGET_ID};
use crate::gui::{ChartCanvas, ChartReadout, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::collections::HashMap;

/// Main application window.
pub struct NoiseChartApp {
    /// `None` when the configured target does not name the window's canvas.
    renderer: Option<ChartRenderer<ChartCanvas>>,
    animation: AnimationLoop,
    control_panel: ControlPanel,
}

impl NoiseChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ChartConfig) -> Self {
        let mut host = HashMap::from([(DEFAULT_TARGET_ID.to_string(), ChartCanvas::new())]);
        let renderer = ChartRenderer::mount(&mut host, config);
        Self {
            renderer,
            animation: AnimationLoop::start(),
            control_panel: ControlPanel::new(),
        }
    }

    fn readout(&self) -> ChartReadout {
        let Some(renderer) = &self.renderer else {
            return ChartReadout::default();
        };
        let state = renderer.state();
        let threshold = renderer.config().threshold;
        ChartReadout {
            mounted: true,
            running: self.animation.is_running(),
            phase: state.phase,
            frames: self.animation.frames(),
            min: state.series.min(),
            max: state.series.max(),
            above_threshold: state.series.count_above(threshold),
            sample_count: state.series.len(),
            threshold,
        }
    }

    /// Export the frame currently on screen, at the canvas size.
    fn handle_export_png(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("noise_chart.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let mut size = renderer.surface().client_size();
        if size.width <= 0.0 || size.height <= 0.0 {
            size = Size::new(800.0, 400.0);
        }
        let settings = self.control_panel.export.clone();
        match export::export_png(
            renderer.config(),
            renderer.state(),
            size,
            settings.scale,
            &output_path,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if settings.open_after_export {
                    if let Err(e) = open::that(&output_path) {
                        log::warn!("Could not open {}: {}", output_path.display(), e);
                    }
                }
            }
            Err(e) => {
                log::error!("PNG export failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Resize and animation handling for one UI frame.
    fn drive_chart(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let resized = renderer
            .surface_mut()
            .set_viewport(rect.size(), ctx.pixels_per_point());

        let result = if self.animation.is_running() {
            self.animation.tick(renderer, ctx).map(|_| ())
        } else if resized {
            renderer.render_frame()
        } else {
            Ok(())
        };
        if let Err(e) = result {
            log::error!("Chart render failed: {e}");
            self.animation.stop();
            self.control_panel.set_status(&format!("Error: {e}"));
        }

        renderer.surface().paint(&ui.painter_at(rect), rect.min);
    }
}

impl eframe::App for NoiseChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let readout = self.readout();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, &readout) {
                        ControlPanelAction::Pause => {
                            self.animation.stop();
                            self.control_panel.set_status("Paused");
                        }
                        ControlPanelAction::Resume => {
                            self.animation.resume();
                            self.control_panel.set_status("Running");
                            ctx.request_repaint();
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.drive_chart(ctx, ui);
            });
    }
}

impl Drop for NoiseChartApp {
    fn drop(&mut self) {
        self.animation.stop();
        log::info!("Animation stopped after {} frames", self.animation.frames());
    }
}
