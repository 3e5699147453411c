use std::time::Instant;

use crate::systems;
use crate::Camera;
use crate::Config;
use crate::Scene;
use crate::Time;
use crate::TweenEngine;

/// # Engine
///
/// Frame driver owning the clock, the tween registry, the scene and its cameras. Each frame runs
/// the clock, then the tweens, then every root, and rendering brackets each enabled camera with
/// [Camera::render_update] and [Camera::after_update].
///
/// The scene event log holds the events of the last [Engine::step] and each camera's log the
/// events of the last [Engine::render]. Read them before the next frame.
pub struct Engine {
    /// Frame clock.
    pub time: Time,
    /// Running tweens.
    pub tweens: TweenEngine,
    /// Game objects.
    pub scene: Scene,
    /// Cameras, rendered in order.
    pub cameras: Vec<Camera>,
}

impl Engine {
    /// Returns an engine with an empty scene.
    pub fn new(config: Config) -> Self {
        Self {
            time: Time::new(),
            tweens: TweenEngine::new(),
            scene: Scene::with_config(config),
            cameras: Vec::new(),
        }
    }

    /// Samples the clock and advances the frame. Returns false while the clock is stopped.
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Same as [Engine::update] with the clock sampled at `now`.
    pub fn update_at(&mut self, now: Instant) -> bool {
        if !self.time.update_at(now) {
            return false;
        }

        self.step(self.time.frame_delay_scaled());
        true
    }

    /// Advances tweens then every root by `dt` milliseconds, without touching the clock.
    pub fn step(&mut self, dt: f32) {
        self.scene.clear_events();
        // Tweens write over the resting position.
        self.scene.undo_shakes();
        self.tweens.update(&mut self.scene, dt);
        systems::update_roots(&mut self.scene, dt);
    }

    /// Renders every enabled camera. `quality_ratio` scales camera limits.
    pub fn render(&mut self, quality_ratio: f32, mut draw: impl FnMut(&Camera, &Scene)) {
        let dt = self.time.frame_delay_scaled();
        for camera in &mut self.cameras {
            camera.clear_events();
        }

        for camera in self.cameras.iter_mut().filter(|camera| camera.enabled()) {
            camera.render_update(&mut self.scene, dt, quality_ratio);
            draw(camera, &self.scene);
            camera.after_update(&mut self.scene);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
