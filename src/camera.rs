use glam::Affine2;
use glam::Vec2;

use crate::components::Ramp;
use crate::components::ShakeState;
use crate::FocusOptions;
use crate::Node;
use crate::Scene;

/// # Camera Limits
///
/// Bounds of the camera pivot in scene units at quality 1 and scale 1. Unset bounds don't clamp.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraLimits {
    /// Lowest pivot x.
    pub min_x: Option<f32>,
    /// Highest pivot x.
    pub max_x: Option<f32>,
    /// Lowest pivot y.
    pub min_y: Option<f32>,
    /// Highest pivot y.
    pub max_y: Option<f32>,
}

/// # Camera Event
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CameraEvent {
    /// A fade of the camera finished.
    FadeEnd,
    /// A shake of the camera finished.
    ShakeEnd,
}

#[derive(Copy, Clone, Debug)]
struct CameraFocus {
    target: Node,
    options: FocusOptions,
}

/// # Camera
///
/// Views a scene node from `pivot`, the scene point drawn at the center of the viewport.
///
/// With perspective on, children of the viewed node whose `z_scale` differs from 1 are pushed away
/// from or toward the pivot while rendering. [Camera::render_update] applies the displacement and
/// [Camera::after_update] restores every saved position, so game logic never observes it.
pub struct Camera {
    name: String,
    viewport: Vec2,
    pivot: Vec2,
    scale: Vec2,
    rotation: f32,
    alpha: f32,
    visible: bool,
    renderable: bool,
    scene: Option<Node>,
    background: Option<Node>,
    limits: CameraLimits,
    perspective: bool,
    focus: Option<CameraFocus>,
    fade: Option<Ramp>,
    shake: Option<ShakeState>,
    saved_positions: Vec<(Node, Vec2)>,
    events: Vec<CameraEvent>,
}

impl Camera {
    /// Returns a camera with the given viewport size, looking at the origin.
    pub fn new(name: impl Into<String>, viewport: Vec2) -> Self {
        Self {
            name: name.into(),
            viewport,
            pivot: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            alpha: 1.0,
            visible: true,
            renderable: true,
            scene: None,
            background: None,
            limits: CameraLimits::default(),
            perspective: true,
            focus: None,
            fade: None,
            shake: None,
            saved_positions: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Returns the camera name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the viewport size.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Returns the viewed scene point.
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Sets the viewed scene point.
    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.pivot = pivot;
    }

    /// Returns the zoom.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sets the zoom.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Returns the view rotation.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Sets the view rotation.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Returns the opacity of the rendered view.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Sets the opacity of the rendered view.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Returns true if the camera is visible and renderable.
    pub fn enabled(&self) -> bool {
        self.visible && self.renderable
    }

    /// Shows or hides the camera.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.visible = enabled;
        self.renderable = enabled;
    }

    /// Keeps the camera visible but skips its rendering.
    pub fn set_renderable(&mut self, renderable: bool) {
        self.renderable = renderable;
    }

    /// Returns the viewed node.
    pub fn scene(&self) -> Option<Node> {
        self.scene
    }

    /// Views a scene node.
    pub fn set_scene(&mut self, scene: Option<Node>) {
        self.scene = scene;
    }

    /// Returns the background node.
    pub fn background(&self) -> Option<Node> {
        self.background
    }

    /// Sets a background node, drawn behind the scene and never displaced by perspective.
    pub fn set_background(&mut self, background: Option<Node>) {
        self.background = background;
    }

    /// Returns the pivot limits.
    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    /// Sets the pivot limits.
    pub fn set_limits(&mut self, limits: CameraLimits) {
        self.limits = limits;
    }

    /// Returns true if perspective is on.
    pub fn perspective(&self) -> bool {
        self.perspective
    }

    /// Turns perspective on or off.
    pub fn set_perspective(&mut self, perspective: bool) {
        self.perspective = perspective;
    }

    /// Returns the followed node.
    pub fn focus_target(&self) -> Option<Node> {
        self.focus.map(|focus| focus.target)
    }

    /// Follows a node. Locked axes of the options stay where they are.
    pub fn focus(&mut self, target: Node, options: FocusOptions) {
        self.focus = Some(CameraFocus { target, options });
    }

    /// Stops following.
    pub fn stop_focus(&mut self) {
        self.focus = None;
    }

    /// Fades the view to `to` over `duration` milliseconds, emitting [CameraEvent::FadeEnd].
    pub fn fade_to(&mut self, to: f32, duration: f32) {
        self.fade = Some(Ramp::new(self.alpha, to.clamp(0.0, 1.0), duration));
    }

    /// Fades the view in.
    pub fn fade_in(&mut self, duration: f32) {
        self.fade_to(1.0, duration);
    }

    /// Fades the view out.
    pub fn fade_out(&mut self, duration: f32) {
        self.fade_to(0.0, duration);
    }

    /// Shakes the view, emitting [CameraEvent::ShakeEnd]. Shaking again restarts the shake.
    pub fn shake(&mut self, range: Vec2, duration: f32) {
        self.shake = Some(match self.shake {
            Some(shake) => shake.restart(range, duration),
            None => ShakeState::new(range, duration),
        });
    }

    /// Returns the events emitted since the last [Camera::clear_events].
    pub fn events(&self) -> &[CameraEvent] {
        &self.events
    }

    /// Clears the event log.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Returns the transform from scene space to viewport space.
    pub fn view_transform(&self) -> Affine2 {
        Affine2::from_translation(self.viewport / 2.0)
            * Affine2::from_scale_angle_translation(self.scale, self.rotation, Vec2::ZERO)
            * Affine2::from_translation(-self.pivot)
    }

    /// Prepares the camera for the render pass: focus, fade, shake, limits, then perspective.
    ///
    /// The shake offset of the previous frame is taken out of the pivot before focus runs, so a
    /// followed target and a shake combine without drifting.
    pub fn render_update(&mut self, scene: &mut Scene, dt: f32, quality_ratio: f32) {
        if let Some(shake) = self.shake.as_mut() {
            self.pivot -= shake.take_offset();
        }

        self.apply_focus(scene);
        self.apply_fade(dt);

        let resting = self.limited(self.pivot, quality_ratio);
        self.apply_shake(scene, dt);
        self.pivot = self.limited(self.pivot, quality_ratio);
        // Limits may swallow part of the offset; only what is left gets taken out next frame.
        if let Some(shake) = self.shake.as_mut() {
            shake.set_offset(self.pivot - resting);
        }

        self.calculate_perspective(scene);
    }

    /// Restores every position displaced by the last [Camera::render_update].
    pub fn after_update(&mut self, scene: &mut Scene) {
        for (node, position) in self.saved_positions.drain(..) {
            if let Some(object) = scene.get_mut(node) {
                object.place(position);
            }
        }
    }

    fn apply_focus(&mut self, scene: &Scene) {
        let Some(focus) = self.focus else {
            return;
        };
        let Some(world) = scene.world_transform(focus.target) else {
            log::debug!("camera {} lost its focus target {:?}", self.name, focus.target);
            self.focus = None;
            return;
        };

        let position = world.position() + focus.options.offset;
        if focus.options.x {
            self.pivot.x = position.x;
        }
        if focus.options.y {
            self.pivot.y = position.y;
        }
        if focus.options.rotation {
            self.rotation = -world.rotation;
        }
    }

    fn apply_fade(&mut self, dt: f32) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        let (alpha, done) = fade.step(self.alpha, dt);
        self.alpha = alpha.clamp(0.0, 1.0);
        if done {
            self.fade = None;
            self.events.push(CameraEvent::FadeEnd);
        }
    }

    fn apply_shake(&mut self, scene: &mut Scene, dt: f32) {
        let Some(shake) = self.shake.as_mut() else {
            return;
        };

        let (pivot, done) = shake.step(self.pivot, dt, scene.rng());
        self.pivot = pivot;
        if done {
            self.shake = None;
            self.events.push(CameraEvent::ShakeEnd);
        }
    }

    fn limited(&self, mut pivot: Vec2, quality_ratio: f32) -> Vec2 {
        let scale = self.scale * quality_ratio;
        let limits = self.limits;

        if let Some(min_x) = limits.min_x {
            pivot.x = pivot.x.max(min_x * scale.x);
        }
        if let Some(max_x) = limits.max_x {
            pivot.x = pivot.x.min(max_x * scale.x);
        }
        if let Some(min_y) = limits.min_y {
            pivot.y = pivot.y.max(min_y * scale.y);
        }
        if let Some(max_y) = limits.max_y {
            pivot.y = pivot.y.min(max_y * scale.y);
        }

        pivot
    }

    fn calculate_perspective(&mut self, scene: &mut Scene) {
        if !self.perspective {
            return;
        }
        let Some(root) = self.scene else {
            return;
        };
        let children = scene
            .children(root)
            .map(|children| children.to_vec())
            .unwrap_or_default();

        for child in children {
            if Some(child) == self.background {
                continue;
            }
            let Some(object) = scene.get_mut(child) else {
                continue;
            };

            let position = object.position();
            self.saved_positions.push((child, position));

            let z_scale = object.z_scale();
            if z_scale != 1.0 {
                let displacement = ((position - self.pivot) * -(1.0 - z_scale)).trunc();
                object.place(position + displacement);
            }
        }
    }
}
