use crate::components::ComponentId;
use crate::components::ComponentKind;
use crate::components::EffectOptions;
use crate::components::Outcome;
use crate::components::Ramp;
use crate::EventKind;
use crate::Node;
use crate::Scene;
use crate::SceneError;

/// # Fade
///
/// Moves the alpha of its node toward a target, emitting `fadeEnd` when done.
pub struct Fade {
    ramp: Ramp,
    done: bool,
    options: EffectOptions,
}

impl Fade {
    /// Returns a fade from `from` to `to`, both clamped to `[0, 1]`.
    pub fn new(from: f32, to: f32, duration: f32, options: EffectOptions) -> Self {
        Self {
            ramp: Ramp::new(from.clamp(0.0, 1.0), to.clamp(0.0, 1.0), duration),
            done: false,
            options,
        }
    }

    /// Returns true once the target is reached.
    pub fn done(&self) -> bool {
        self.done
    }

    pub(crate) fn update(&mut self, scene: &mut Scene, node: Node, dt: f32) -> Outcome {
        if self.done {
            return Outcome::Running;
        }
        let Some(object) = scene.get_mut(node) else {
            return Outcome::Running;
        };

        let (alpha, done) = self.ramp.step(object.alpha(), dt);
        object.set_alpha(alpha.clamp(0.0, 1.0));

        if !done {
            return Outcome::Running;
        }

        self.done = true;
        self.options.finish(EventKind::FadeEnd)
    }
}

impl Scene {
    /// Fades the node's alpha to `to` over `duration` milliseconds, replacing any running fade.
    pub fn fade_to(
        &mut self,
        node: Node,
        to: f32,
        duration: f32,
        options: EffectOptions,
    ) -> Result<ComponentId, SceneError> {
        let from = self
            .get(node)
            .ok_or(SceneError::UnknownNode(node))?
            .alpha();

        self.upsert_component(
            node,
            ComponentKind::Fade(Fade::new(from, to, duration, options)),
        )
    }

    /// Fades the node's alpha to 1.
    pub fn fade_in(
        &mut self,
        node: Node,
        duration: f32,
        options: EffectOptions,
    ) -> Result<ComponentId, SceneError> {
        self.fade_to(node, 1.0, duration, options)
    }

    /// Fades the node's alpha to 0.
    pub fn fade_out(
        &mut self,
        node: Node,
        duration: f32,
        options: EffectOptions,
    ) -> Result<ComponentId, SceneError> {
        self.fade_to(node, 0.0, duration, options)
    }
}
