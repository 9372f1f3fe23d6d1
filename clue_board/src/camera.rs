//! Camera - smoothed pan and zoom over the board content.
//!
//! Viewport space has its origin at the viewport centre. A board-local point
//! `p` appears on screen at `p * zoom + pan`, so centring `p` means
//! `pan = -p * zoom`.
//!
//! Zoom and pan chase explicit targets with frame-rate independent
//! exponential smoothing, `value += (target - value) * (1 - exp(-k * dt))`.
//! `dt` is wall-clock time, so pausing the game does not freeze the camera.

use clue_model::Vec2;

use crate::config::CameraConfig;

/// Pan/zoom state of the board view.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    content: Vec2,
    zoom: f32,
    target_zoom: f32,
    pan: Vec2,
    target_pan: Vec2,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        let zoom = clamp_zoom(&config, config.default_zoom);
        Self {
            content: config.content,
            config,
            zoom,
            target_zoom: zoom,
            pan: Vec2::ZERO,
            target_pan: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn target_pan(&self) -> Vec2 {
        self.target_pan
    }

    pub fn content_size(&self) -> Vec2 {
        self.content
    }

    /// Resize the content; never below the configured minimum.
    pub fn set_content_size(&mut self, size: Vec2) {
        self.content = Vec2::new(
            size.x.max(self.config.content.x),
            size.y.max(self.config.content.y),
        );
        self.target_pan = self.clamp_pan(self.target_pan, self.target_zoom);
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.config.viewport = viewport;
        self.target_pan = self.clamp_pan(self.target_pan, self.target_zoom);
    }

    /// Where a board-local point appears in viewport space.
    pub fn project(&self, point: Vec2) -> Vec2 {
        point * self.zoom + self.pan
    }

    /// The board-local point under a viewport-space point.
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    /// The board-local point at the viewport centre.
    pub fn view_center(&self) -> Vec2 {
        self.unproject(Vec2::ZERO)
    }

    /// Advance smoothing by `dt` seconds of unscaled time.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let zoom_t = 1.0 - (-self.config.zoom_rate * dt).exp();
        let pan_t = 1.0 - (-self.config.pan_rate * dt).exp();
        self.zoom += (self.target_zoom - self.zoom) * zoom_t;
        self.pan = self.pan.lerp(self.target_pan, pan_t);
    }

    /// Whether current values have reached their targets.
    pub fn is_settled(&self) -> bool {
        (self.zoom - self.target_zoom).abs() < 1e-3 && self.pan.distance(self.target_pan) < 0.05
    }

    /// Jump straight to the targets.
    pub fn snap(&mut self) {
        self.zoom = self.target_zoom;
        self.pan = self.target_pan;
    }

    /// Centre a board-local point in the viewport at the current target zoom.
    pub fn focus_on(&mut self, point: Vec2, immediate: bool) {
        let pan = self.clamp_pan(-point * self.target_zoom, self.target_zoom);
        self.target_pan = pan;
        if immediate {
            self.pan = pan;
            self.zoom = self.target_zoom;
        }
    }

    /// Scale the target zoom by `factor`, keeping the board point under
    /// `focal` (viewport space) stationary on screen.
    pub fn zoom_around(&mut self, factor: f32, focal: Vec2) {
        self.apply_zoom(self.target_zoom * factor, focal, false);
    }

    /// Set zoom to an absolute value around the viewport centre.
    ///
    /// `immediate` applies the zoom at once; pan still follows its target
    /// with smoothing, so a pending focus keeps easing in.
    pub fn set_zoom(&mut self, zoom: f32, immediate: bool) {
        self.apply_zoom(zoom, Vec2::ZERO, immediate);
    }

    fn apply_zoom(&mut self, zoom: f32, focal: Vec2, immediate: bool) {
        if !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        let new_zoom = clamp_zoom(&self.config, zoom);
        let anchor = (focal - self.target_pan) / self.target_zoom;
        let pan = focal - anchor * new_zoom;

        self.target_zoom = new_zoom;
        self.target_pan = self.clamp_pan(pan, new_zoom);
        if immediate {
            self.zoom = self.target_zoom;
        }
    }

    /// Unsmoothed pan by a viewport-space delta, for free look.
    pub fn nudge(&mut self, delta: Vec2) {
        self.pan = self.clamp_pan(self.pan + delta, self.zoom);
        self.target_pan = self.pan;
    }

    /// Restore a saved camera without animation.
    pub fn restore(&mut self, pan: Vec2, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.target_zoom = clamp_zoom(&self.config, zoom);
        }
        if pan.is_finite() {
            self.target_pan = self.clamp_pan(pan, self.target_zoom);
        }
        self.snap();
    }

    /// Keep the padded, scaled content covering the viewport. An axis whose
    /// padded content is smaller than the viewport is locked to centre.
    pub fn clamp_pan(&self, pan: Vec2, zoom: f32) -> Vec2 {
        let padded = self.content * zoom + Vec2::new(self.config.padding, self.config.padding) * 2.0;
        let half_view = self.config.viewport * 0.5;
        Vec2::new(
            clamp_axis(pan.x, padded.x * 0.5, half_view.x),
            clamp_axis(pan.y, padded.y * 0.5, half_view.y),
        )
    }
}

/// Never panics: inverted bounds resolve to `max_zoom`.
fn clamp_zoom(config: &CameraConfig, zoom: f32) -> f32 {
    let zoom = zoom.max(config.min_zoom).min(config.max_zoom);
    if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    }
}

fn clamp_axis(value: f32, half_content: f32, half_view: f32) -> f32 {
    let limit = half_content - half_view;
    if limit.is_nan() || limit <= 0.0 {
        0.0
    } else {
        value.clamp(-limit, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraController {
        CameraController::new(CameraConfig::default())
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_focus_centres_point() {
        let mut cam = camera();
        let node = Vec2::new(300.0, -120.0);
        cam.focus_on(node, true);
        assert!(close(cam.project(node), Vec2::ZERO));
    }

    #[test]
    fn test_unit_zoom_keeps_pan() {
        let mut cam = camera();
        cam.focus_on(Vec2::new(200.0, 100.0), true);
        let before = cam.target_pan();
        cam.zoom_around(1.0, Vec2::new(150.0, -80.0));
        assert!(close(cam.target_pan(), before));
    }

    #[test]
    fn test_focus_then_unit_zoom_preserves_projection() {
        let mut cam = camera();
        let node = Vec2::new(-250.0, 180.0);
        cam.focus_on(node, true);
        let before = cam.project(node);
        cam.zoom_around(1.0, Vec2::ZERO);
        cam.snap();
        assert!(close(cam.project(node), before));
    }

    #[test]
    fn test_zoom_around_keeps_focal_point() {
        let mut cam = camera();
        let focal = Vec2::new(100.0, 50.0);
        let under = cam.unproject(focal);
        cam.zoom_around(1.5, focal);
        cam.snap();
        assert!((cam.zoom() - 1.5).abs() < 1e-5);
        assert!(close(cam.project(under), focal));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = camera();
        cam.zoom_around(100.0, Vec2::ZERO);
        assert_eq!(cam.target_zoom(), 2.5);
        cam.zoom_around(0.0001, Vec2::ZERO);
        assert_eq!(cam.target_zoom(), 0.4);
    }

    #[test]
    fn test_inverted_zoom_bounds_do_not_panic() {
        let config = CameraConfig {
            min_zoom: 3.0,
            max_zoom: 2.0,
            ..CameraConfig::default()
        };
        let mut cam = CameraController::new(config);
        assert_eq!(cam.zoom(), 2.0);

        cam.zoom_around(0.5, Vec2::new(40.0, 10.0));
        cam.restore(Vec2::new(10.0, 10.0), 1.2);
        assert!(cam.zoom().is_finite() && cam.zoom() > 0.0);
        assert!(cam.pan().is_finite());
    }

    #[test]
    fn test_immediate_zoom_keeps_pan_smoothing() {
        let mut cam = camera();
        cam.focus_on(Vec2::new(400.0, 0.0), false);
        cam.set_zoom(1.5, true);

        assert_eq!(cam.zoom(), 1.5);
        assert_eq!(cam.pan(), Vec2::ZERO);
        assert!(!close(cam.pan(), cam.target_pan()));

        cam.tick(1.0 / 60.0);
        assert!(cam.pan().x < 0.0);
        assert!(cam.pan().x > cam.target_pan().x);
    }

    #[test]
    fn test_pan_clamped_to_content() {
        let mut cam = camera();
        // content 2400 + 2*160 padding = 2720, half 1360; view half 640.
        cam.nudge(Vec2::new(5000.0, 0.0));
        assert!((cam.pan().x - 720.0).abs() < 1e-3);
        cam.nudge(Vec2::new(-10000.0, 0.0));
        assert!((cam.pan().x + 720.0).abs() < 1e-3);
    }

    #[test]
    fn test_small_content_locks_axis() {
        let config = CameraConfig {
            content: Vec2::new(400.0, 200.0),
            padding: 10.0,
            ..CameraConfig::default()
        };
        let mut cam = CameraController::new(config);
        cam.nudge(Vec2::new(300.0, 300.0));
        assert_eq!(cam.pan(), Vec2::ZERO);
    }

    #[test]
    fn test_smoothing_converges() {
        let mut cam = camera();
        cam.focus_on(Vec2::new(400.0, 0.0), false);
        assert_eq!(cam.pan(), Vec2::ZERO);

        cam.tick(1.0 / 60.0);
        let after_one = cam.pan();
        assert!(after_one.x < 0.0 && after_one.x > -400.0);

        for _ in 0..240 {
            cam.tick(1.0 / 60.0);
        }
        assert!(cam.is_settled());
        assert!(close(cam.pan(), Vec2::new(-400.0, 0.0)));
    }

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let mut a = camera();
        let mut b = camera();
        a.focus_on(Vec2::new(400.0, 0.0), false);
        b.focus_on(Vec2::new(400.0, 0.0), false);

        a.tick(0.1);
        for _ in 0..10 {
            b.tick(0.01);
        }
        assert!((a.pan().x - b.pan().x).abs() < 1e-2);
    }

    #[test]
    fn test_content_growth_never_shrinks() {
        let mut cam = camera();
        cam.set_content_size(Vec2::new(100.0, 5000.0));
        assert_eq!(cam.content_size(), Vec2::new(2400.0, 5000.0));
    }
}
