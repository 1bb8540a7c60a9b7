//! Animation loop with explicit start/stop.
//!
//! The host drives the loop by calling [`AnimationLoop::tick`] once per frame
//! callback; each tick advances the chart and asks the host's
//! [`FrameScheduler`] for the next frame. Cancelling the [`CancelToken`] ends
//! the loop at the next tick.

use crate::charts::{ChartRenderer, DrawingSurface};
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host primitive that schedules the next frame callback.
pub trait FrameScheduler {
    fn request_frame(&self);
}

impl FrameScheduler for egui::Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

/// Cloneable stop flag shared between the loop and whoever may tear it down.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct AnimationLoop {
    token: CancelToken,
    frames: u64,
}

impl AnimationLoop {
    /// A running loop with a fresh token.
    pub fn start() -> Self {
        Self {
            token: CancelToken::new(),
            frames: 0,
        }
    }

    /// A loop that is already stopped.
    #[cfg(test)]
    pub fn stopped() -> Self {
        let animation = Self::start();
        animation.stop();
        animation
    }

    #[cfg(test)]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Restart after a stop. Tokens handed out earlier stay cancelled.
    pub fn resume(&mut self) {
        if self.token.is_cancelled() {
            self.token = CancelToken::new();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Steps taken since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one animation step and schedule the next. Returns `false` without
    /// touching the chart once the loop has been stopped.
    pub fn tick<S, F>(&mut self, renderer: &mut ChartRenderer<S>, scheduler: &F) -> Result<bool>
    where
        S: DrawingSurface,
        F: FrameScheduler + ?Sized,
    {
        if self.token.is_cancelled() {
            return Ok(false);
        }
        renderer.animation_step()?;
        self.frames += 1;
        scheduler.request_frame();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::surface::recording::RecordingSurface;
    use crate::config::ChartConfig;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingScheduler(Cell<usize>);

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn renderer() -> ChartRenderer<RecordingSurface> {
        ChartRenderer::new(
            RecordingSurface::new(800.0, 400.0, 1.0),
            ChartConfig::default(),
        )
    }

    #[test]
    fn tick_steps_and_schedules_next_frame() {
        let mut r = renderer();
        let scheduler = CountingScheduler::default();
        let mut animation = AnimationLoop::start();
        for _ in 0..3 {
            assert!(animation.tick(&mut r, &scheduler).unwrap());
        }
        assert_eq!(scheduler.0.get(), 3);
        assert_eq!(animation.frames(), 3);
        assert!((r.state().phase - 0.06).abs() < 1e-12);
    }

    #[test]
    fn cancelled_token_stops_the_loop() {
        let mut r = renderer();
        let scheduler = CountingScheduler::default();
        let mut animation = AnimationLoop::start();
        let token = animation.token();
        animation.tick(&mut r, &scheduler).unwrap();

        token.cancel();
        let calls_before = r.surface().calls.len();
        assert!(!animation.tick(&mut r, &scheduler).unwrap());
        assert!(!animation.is_running());
        assert_eq!(r.surface().calls.len(), calls_before);
        assert_eq!(scheduler.0.get(), 1);
    }

    #[test]
    fn resume_issues_a_fresh_token() {
        let mut animation = AnimationLoop::stopped();
        let old = animation.token();
        assert!(!animation.is_running());
        animation.resume();
        assert!(animation.is_running());
        assert!(old.is_cancelled());
        assert!(!animation.token().is_cancelled());
    }
}
