use glam::Vec2;

use crate::components::ComponentId;
use crate::components::ComponentKind;
use crate::components::EffectOptions;
use crate::components::Outcome;
use crate::components::Ramp;
use crate::EventKind;
use crate::Node;
use crate::Scene;
use crate::SceneError;

/// # Scale To
///
/// Moves the local scale of its node toward a target, emitting `scale-end` when done. The world
/// scale cache isn't refreshed.
pub struct ScaleTo {
    x: Ramp,
    y: Ramp,
    done: bool,
    options: EffectOptions,
}

impl ScaleTo {
    /// Returns a scale animation from `from` to `to`.
    pub fn new(from: Vec2, to: Vec2, duration: f32, options: EffectOptions) -> Self {
        Self {
            x: Ramp::new(from.x, to.x, duration),
            y: Ramp::new(from.y, to.y, duration),
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

        let scale = object.scale();
        let (x, x_done) = self.x.step(scale.x, dt);
        let (y, y_done) = self.y.step(scale.y, dt);
        object.set_scale(Vec2::new(x, y));

        if !(x_done && y_done) {
            return Outcome::Running;
        }

        self.done = true;
        self.options.finish(EventKind::ScaleEnd)
    }
}

impl Scene {
    /// Scales the node to `to` over `duration` milliseconds, replacing any running scale
    /// animation.
    pub fn scale_to(
        &mut self,
        node: Node,
        to: Vec2,
        duration: f32,
        options: EffectOptions,
    ) -> Result<ComponentId, SceneError> {
        let from = self
            .get(node)
            .ok_or(SceneError::UnknownNode(node))?
            .scale();

        self.upsert_component(
            node,
            ComponentKind::Scale(ScaleTo::new(from, to, duration, options)),
        )
    }
}
