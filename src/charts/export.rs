//! Chart Export
//! Headless PNG rendering of single frames and animation sequences.

use crate::charts::bitmap::BitmapSurface;
use crate::charts::geometry::Size;
use crate::charts::ChartRenderer;
use crate::config::ChartConfig;
use crate::data::ChartState;
use crate::error::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Render `state` as one PNG at logical `size` and `device_pixel_ratio`.
pub fn render_png(
    config: &ChartConfig,
    state: &ChartState,
    size: Size,
    device_pixel_ratio: f64,
) -> Result<Vec<u8>> {
    let surface = BitmapSurface::new(size, device_pixel_ratio);
    let mut renderer = ChartRenderer::with_state(surface, config.clone(), state.clone());
    renderer.render_frame()?;
    renderer.surface().to_png_bytes()
}

pub fn export_png(
    config: &ChartConfig,
    state: &ChartState,
    size: Size,
    device_pixel_ratio: f64,
    output: &Path,
) -> Result<()> {
    let bytes = render_png(config, state, size, device_pixel_ratio)?;
    std::fs::write(output, bytes)?;
    log::info!("Exported chart to {}", output.display());
    Ok(())
}

/// States for frames `0..count`: frame 0 is `initial`, frame k follows k steps.
pub fn animation_states(config: &ChartConfig, initial: &ChartState, count: usize) -> Vec<ChartState> {
    let mut state = initial.clone();
    let mut states = Vec::with_capacity(count);
    for i in 0..count {
        if i > 0 {
            state.advance(&config.animation);
        }
        states.push(state.clone());
    }
    states
}

/// `chart.png`, 3 → `chart_0003.png`
pub fn sequence_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = output
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    output.with_file_name(format!("{stem}_{index:04}.{ext}"))
}

/// Render `count` animation frames in parallel; returns the written paths in
/// frame order.
pub fn export_sequence(
    config: &ChartConfig,
    initial: &ChartState,
    count: usize,
    size: Size,
    device_pixel_ratio: f64,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let states = animation_states(config, initial, count);
    let paths = states
        .par_iter()
        .enumerate()
        .map(|(i, state)| -> Result<PathBuf> {
            let path = sequence_path(output, i);
            let bytes = render_png(config, state, size, device_pixel_ratio)?;
            std::fs::write(&path, bytes)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;
    log::info!("Exported {} frames next to {}", paths.len(), output.display());
    Ok(paths)
}
