//! Noise Chart - Animated Noise Level Chart Viewer & PNG Exporter
//!
//! Opens a window with the live noise-level chart, or renders it headless to
//! PNG with `--export`.

mod animation;
mod charts;
mod config;
mod data;
mod error;
mod gui;

use anyhow::{Context, Result};
use charts::bitmap::BitmapSurface;
use charts::export;
use charts::geometry::Size;
use charts::ChartRenderer;
use clap::Parser;
use config::ChartConfig;
use eframe::egui;
use gui::NoiseChartApp;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "noise-chart")]
#[command(about = "Animated noise level chart viewer and PNG exporter", long_about = None)]
struct Args {
    /// JSON chart configuration; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Identifier of the drawing target to mount on
    #[arg(long)]
    target: Option<String>,

    /// Render headless to this PNG file instead of opening a window
    #[arg(long)]
    export: Option<PathBuf>,

    /// Number of animation frames to export (more than 1 writes numbered files)
    #[arg(long, default_value_t = 1)]
    frames: usize,

    /// Logical width of the exported chart
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Logical height of the exported chart
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Device pixel ratio of the exported chart
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(target) = &args.target {
        config.target_id = target.clone();
    }

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    if let Some(output) = &args.export {
        return run_export(&args, config, output);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 520.0])
            .with_min_inner_size([640.0, 360.0])
            .with_title("Noise Chart"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Noise Chart",
        options,
        Box::new(move |cc| Ok(Box::new(NoiseChartApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Headless rendering: the bitmap exporter is the only surface the host offers.
fn run_export(args: &Args, config: ChartConfig, output: &std::path::Path) -> Result<()> {
    let size = Size::new(args.width, args.height);
    let mut host = HashMap::from([(
        config::DEFAULT_TARGET_ID.to_string(),
        BitmapSurface::new(size, args.scale),
    )]);
    let Some(renderer) = ChartRenderer::mount(&mut host, config) else {
        return Ok(());
    };

    if args.frames <= 1 {
        let mut renderer = renderer;
        renderer.render_frame()?;
        let (w, h) = renderer.surface().backing_size();
        log::debug!("Rendered {w}x{h} px");
        let bytes = renderer.surface().to_png_bytes()?;
        std::fs::write(output, bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!("Exported chart to {}", output.display());
    } else {
        export::export_sequence(
            renderer.config(),
            renderer.state(),
            args.frames,
            size,
            args.scale,
            output,
        )?;
    }
    Ok(())
}
