use glam::Vec2;
use rand::Rng;

use crate::components::ComponentId;
use crate::components::ComponentKind;
use crate::components::ComponentTag;
use crate::components::EffectOptions;
use crate::components::Outcome;
use crate::EventKind;
use crate::GameObject;
use crate::Node;
use crate::Scene;
use crate::SceneError;

/// # Shake State
///
/// Random whole-unit jitter. Every step first removes the previous offset, so the shaken
/// position ends exactly where it started.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShakeState {
    range: Vec2,
    duration: f32,
    prev: Vec2,
}

impl ShakeState {
    /// Returns a shake of up to `range` units per axis lasting `duration` milliseconds.
    pub fn new(range: Vec2, duration: f32) -> Self {
        Self {
            range: range.abs(),
            duration,
            prev: Vec2::ZERO,
        }
    }

    /// Returns the offset currently applied.
    pub fn offset(&self) -> Vec2 {
        self.prev
    }

    /// Returns the state restarted with new parameters, keeping the pending offset so it is still
    /// removed on the next step.
    pub fn restart(&self, range: Vec2, duration: f32) -> Self {
        Self {
            prev: self.prev,
            ..Self::new(range, duration)
        }
    }

    /// Returns the offset currently applied and forgets it. Subtract it from the shaken value
    /// before anything else writes that value this frame.
    pub fn take_offset(&mut self) -> Vec2 {
        std::mem::replace(&mut self.prev, Vec2::ZERO)
    }

    // Records the part of the offset that was actually applied.
    pub(crate) fn set_offset(&mut self, offset: Vec2) {
        self.prev = offset;
    }

    /// Advances the shake. Returns the new position and true once the duration is exhausted.
    pub fn step(&mut self, position: Vec2, dt: f32, rng: &mut impl Rng) -> (Vec2, bool) {
        let mut position = position - self.take_offset();
        self.duration -= dt;

        if self.duration <= 0.0 {
            return (position, true);
        }

        let offset = Vec2::new(
            rng.gen_range(-self.range.x..=self.range.x).trunc(),
            rng.gen_range(-self.range.y..=self.range.y).trunc(),
        );
        position += offset;
        self.prev = offset;

        (position, false)
    }
}

/// # Shake
///
/// Shakes the position of its node, emitting `shakeEnd` when done.
pub struct Shake {
    state: ShakeState,
    done: bool,
    options: EffectOptions,
}

impl Shake {
    /// Returns a shake with the given state.
    pub fn new(state: ShakeState, options: EffectOptions) -> Self {
        Self {
            state,
            done: false,
            options,
        }
    }

    /// Returns the shake state.
    pub fn state(&self) -> &ShakeState {
        &self.state
    }

    /// Returns true once the shake is over.
    pub fn done(&self) -> bool {
        self.done
    }

    pub(crate) fn update(&mut self, scene: &mut Scene, node: Node, dt: f32) -> Outcome {
        if self.done {
            return Outcome::Running;
        }
        let Some((object, rng)) = scene.object_and_rng(node) else {
            return Outcome::Running;
        };

        let (position, done) = self.state.step(object.position(), dt, rng);
        object.set_position(position);

        if !done {
            return Outcome::Running;
        }

        self.done = true;
        self.options.finish(EventKind::ShakeEnd)
    }
}

impl GameObject {
    // Moves the object back to where its shake found it.
    pub(crate) fn undo_shake(&mut self) {
        let offset = self
            .components
            .iter_mut()
            .filter_map(|slot| slot.component.as_mut())
            .find_map(|component| match &mut component.kind {
                ComponentKind::Shake(shake) => Some(shake.state.take_offset()),
                _ => None,
            });

        if let Some(offset) = offset.filter(|offset| *offset != Vec2::ZERO) {
            self.set_position(self.position() - offset);
        }
    }
}

impl Scene {
    /// Shakes the node by up to `range` units per axis for `duration` milliseconds. Shaking again
    /// restarts the shake.
    pub fn shake(
        &mut self,
        node: Node,
        range: Vec2,
        duration: f32,
        options: EffectOptions,
    ) -> Result<ComponentId, SceneError> {
        let previous = self
            .find_component(node, ComponentTag::Shake)
            .and_then(|id| self.component(node, id))
            .and_then(|component| match component.kind() {
                ComponentKind::Shake(shake) => Some(shake.state),
                _ => None,
            });

        let state = match previous {
            Some(previous) => previous.restart(range, duration),
            None => ShakeState::new(range, duration),
        };

        self.upsert_component(node, ComponentKind::Shake(Shake::new(state, options)))
    }
}
