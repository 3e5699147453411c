//! # Tweens
//!
//! Time-bounded interpolation of one game object property.

use crate::Node;
use crate::Property;
use crate::Scene;
use crate::SceneError;

pub use self::chained::ChainedTween;
pub use self::easing::Easing;
pub use self::engine::TweenEngine;
pub use self::engine::TweenId;

mod chained;
mod easing;
mod engine;

/// Called with the new value after every tween step. Wait tweens report their eased progress.
pub type UpdateCallback = Box<dyn FnMut(&mut Scene, f32)>;

/// Called each time a tween completes.
pub type CompleteCallback = Box<dyn FnMut(&mut Scene)>;

/// # Tween Target
#[derive(Clone, Debug, PartialEq)]
pub enum TweenTarget {
    /// A property of a game object.
    Property {
        /// Node owning the property.
        node: Node,
        /// Property driven by the tween.
        property: Property,
    },
    /// No property; the tween only takes time.
    Wait,
}

/// # Tween
///
/// Drives a property from the value it has when the tween first updates after being started, to
/// `to`, over `duration` milliseconds.
pub struct Tween {
    target: TweenTarget,
    start: Option<f32>,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    active: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
}

impl Tween {
    /// Returns an active tween of the property at `path` of `node`. An empty path builds a wait.
    pub fn new(node: Node, path: &str, to: f32, duration: f32) -> Result<Self, SceneError> {
        let target = if path.is_empty() {
            TweenTarget::Wait
        } else {
            TweenTarget::Property {
                node,
                property: Property::parse(path)?,
            }
        };

        Ok(Self::with_target(target, to, duration))
    }

    /// Returns an active tween doing nothing for `duration` milliseconds.
    pub fn wait(duration: f32) -> Self {
        Self::with_target(TweenTarget::Wait, 1.0, duration)
    }

    fn with_target(target: TweenTarget, to: f32, duration: f32) -> Self {
        Self {
            target,
            start: None,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing: Easing::Linear,
            active: true,
            on_update: None,
            on_complete: None,
        }
    }

    /// Returns the tween with the given easing.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Returns the tween inactive. It does nothing until [Tween::start] is called.
    pub fn paused(mut self) -> Self {
        self.active = false;
        self
    }

    /// Returns the tween with an update callback.
    pub fn on_update(mut self, callback: impl FnMut(&mut Scene, f32) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Returns the tween with a completion callback.
    pub fn on_complete(mut self, callback: impl FnMut(&mut Scene) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Returns the driven target.
    pub fn target(&self) -> &TweenTarget {
        &self.target
    }

    /// Returns the start value, once captured.
    pub fn start_value(&self) -> Option<f32> {
        self.start
    }

    /// Returns the target value.
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Returns the linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Returns true while the tween runs.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (Re)starts the tween. The start value is captured again on the next update.
    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
        self.start = None;
    }

    /// Stops the tween where it is.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advances the tween by `dt` milliseconds. Returns true on the update it completes, including
    /// when its node no longer exists.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> bool {
        if !self.active {
            return false;
        }

        if let TweenTarget::Property { node, property } = &self.target {
            if self.start.is_none() {
                match scene.get(*node) {
                    Some(object) => self.start = Some(object.property(property).unwrap_or(0.0)),
                    None => {
                        log::debug!("tween target {node:?} is gone");
                        self.active = false;
                        return true;
                    }
                }
            }
        }

        self.elapsed += dt;
        let progress = self.progress();
        let eased = self.easing.apply(progress);
        let done = progress >= 1.0;

        let reported = match (&self.target, self.start) {
            (TweenTarget::Property { node, property }, Some(start)) => {
                let value = if done {
                    self.to
                } else {
                    start + (self.to - start) * eased
                };
                if let Some(object) = scene.get_mut(*node) {
                    object.set_property(property, value);
                }
                value
            }
            _ => eased,
        };

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(scene, reported);
        }

        if !done {
            return false;
        }

        self.active = false;
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete(scene);
        }

        true
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("start", &self.start)
            .field("to", &self.to)
            .field("elapsed", &self.elapsed)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
