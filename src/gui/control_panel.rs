//! Control Panel Widget
//! Left side panel with animation controls, live readouts and PNG export.

use egui::{Color32, RichText};

/// Snapshot of the chart shown in the readout section.
#[derive(Debug, Clone, Default)]
pub struct ChartReadout {
    pub mounted: bool,
    pub running: bool,
    pub phase: f64,
    pub frames: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub above_threshold: usize,
    pub sample_count: usize,
    pub threshold: f64,
}

/// User settings for PNG export
#[derive(Clone)]
pub struct ExportSettings {
    /// Device pixel ratio used for the exported bitmap
    pub scale: f64,
    pub open_after_export: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            open_after_export: false,
        }
    }
}

/// Left side control panel with playback and export controls.
pub struct ControlPanel {
    pub export: ExportSettings,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, readout: &ChartReadout) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🔊 Noise Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(194, 244, 103)),
            );
            ui.label(
                RichText::new("Live noise level (dB)")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Playback Section =====
        ui.label(RichText::new("⏯ Animation").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(readout.mounted, |ui| {
                let (label, next) = if readout.running {
                    ("⏸ Pause", ControlPanelAction::Pause)
                } else {
                    ("▶ Resume", ControlPanelAction::Resume)
                };
                let button = egui::Button::new(RichText::new(label).size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = next;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Readout Section =====
        ui.label(RichText::new("📈 Readout").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if !readout.mounted {
                    ui.label(RichText::new("No chart surface").color(Color32::GRAY));
                    return;
                }
                let fmt_db = |v: Option<f64>| {
                    v.map(|v| format!("{v:.1} dB"))
                        .unwrap_or_else(|| "-".to_string())
                };
                egui::Grid::new("chart_readout")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Phase:");
                        ui.label(format!("{:.2}", readout.phase));
                        ui.end_row();

                        ui.label("Frames:");
                        ui.label(readout.frames.to_string());
                        ui.end_row();

                        ui.label("Min:");
                        ui.label(fmt_db(readout.min));
                        ui.end_row();

                        ui.label("Max:");
                        ui.label(fmt_db(readout.max));
                        ui.end_row();

                        ui.label(format!("Over {:.0} dB:", readout.threshold));
                        let over = format!("{} / {}", readout.above_threshold, readout.sample_count);
                        if readout.above_threshold > 0 {
                            ui.label(RichText::new(over).color(Color32::from_rgb(255, 58, 58)));
                        } else {
                            ui.label(over);
                        }
                        ui.end_row();
                    });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("🖼 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Pixel ratio:");
            ui.add(egui::Slider::new(&mut self.export.scale, 1.0..=4.0).step_by(0.5));
        });
        ui.checkbox(&mut self.export.open_after_export, "Open after export");
        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(readout.mounted, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Pause,
    Resume,
    ExportPng,
}
